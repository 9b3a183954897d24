//! Random strings that match a regular expression.
//!
//! A pattern is parsed into an [`ast::Ast`], compiled into a small
//! instruction [`automata::program::Program`] and then walked at random by a
//! [`Generator`]. Every completed walk spells out a string the pattern
//! accepts.
//!
//! ```
//! use regexfuzz::{Generator, SyntaxOptions};
//!
//! let gen = Generator::new("(foo|bar){1,3}", SyntaxOptions::default()).unwrap();
//! let s = gen.generate_retrying(10).unwrap();
//! assert!(s.len() % 3 == 0);
//! ```

pub mod ast;
pub mod automata;
pub mod errors;
pub mod executor;
pub mod generator;
pub mod options;
pub mod regex;

pub use crate::errors::{Error, GenerateError};
pub use crate::generator::{Bounds, Generator, GeneratorConfig};
pub use crate::options::SyntaxOptions;
pub use crate::regex::Regex;
