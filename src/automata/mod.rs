pub mod compiler;
pub mod program;
