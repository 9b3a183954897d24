use crate::ast::parser::Parser;
use crate::automata::compiler::Compiler;
use crate::automata::program::Program;
use crate::errors::Error;
use crate::executor::Executor;
use crate::options::SyntaxOptions;

/// A compiled pattern that checks whole strings.
///
/// Uses the same parser and compiler as [`Generator`](crate::Generator), so it
/// can confirm that generated strings belong to the pattern.
#[derive(Debug)]
pub struct Regex {
    program: Program,
}

impl Regex {
    pub fn new(pat: &str) -> Result<Regex, Error> {
        Regex::with_options(pat, SyntaxOptions::default())
    }

    pub fn with_options(pat: &str, options: SyntaxOptions) -> Result<Regex, Error> {
        let ast = Parser::with_options(pat.to_owned(), options).parse()?;
        let program = Compiler::new().compile(&ast)?;
        Ok(Regex { program })
    }

    /// Reports whether all of `s` matches, as if the pattern were wrapped in
    /// `^(?:...)$`.
    pub fn is_match(&self, s: &str) -> bool {
        Executor::new(&self.program).matches(s)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }
}
