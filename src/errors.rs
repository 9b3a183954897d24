use crate::ast;
use crate::automata::program::InstPtr;
use std::fmt;

/// Errors raised while turning a pattern into a program.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    Syntax(ast::Error),
    CompiledTooBig(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Syntax(ref err) => err.fmt(f),
            Error::CompiledTooBig(limit) => write!(
                f,
                "compiled program exceeds the size limit of {} instructions",
                limit
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Syntax(ref err) => Some(err),
            Error::CompiledTooBig(_) => None,
        }
    }
}

impl From<ast::Error> for Error {
    fn from(value: ast::Error) -> Self {
        Error::Syntax(value)
    }
}

/// Outcome of a single random walk that did not produce a match.
///
/// The repeat errors come from an approximate bound check and only mean that
/// this particular walk went astray; calling again is expected to succeed
/// sooner or later. See [`GenerateError::is_retryable`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum GenerateError {
    /// The walk accepted before visiting enough capture positions.
    TooFewRepeat { partial: String },
    /// The walk visited more capture positions than the bounds allow.
    TooManyRepeat { partial: String },
    /// The walk visited more instructions than the configured cap.
    StepLimit { partial: String, steps: usize },
    /// The walk reached a `Fail` instruction at `pc`.
    Dead { pc: InstPtr },
}

impl GenerateError {
    pub fn is_retryable(&self) -> bool {
        !matches!(*self, GenerateError::Dead { .. })
    }

    /// Output produced before the walk stopped, if any.
    pub fn partial(&self) -> Option<&str> {
        match *self {
            GenerateError::TooFewRepeat { ref partial }
            | GenerateError::TooManyRepeat { ref partial }
            | GenerateError::StepLimit { ref partial, .. } => Some(partial),
            GenerateError::Dead { .. } => None,
        }
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GenerateError::TooFewRepeat { ref partial } => {
                write!(f, "counted too few repeat after {:?}", partial)
            }
            GenerateError::TooManyRepeat { ref partial } => {
                write!(f, "counted too many repeat after {:?}", partial)
            }
            GenerateError::StepLimit { ref partial, steps } => {
                write!(f, "gave up after {} steps at {:?}", steps, partial)
            }
            GenerateError::Dead { pc } => {
                write!(f, "reached fail instruction at {}", pc)
            }
        }
    }
}

impl std::error::Error for GenerateError {}
