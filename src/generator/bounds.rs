use crate::ast::Ast;

/// Repetition bounds of the outermost repetition of a pattern.
///
/// The walker has no per-loop counters, so it uses the number of capture
/// positions visited as a stand-in for the repeat count: each pass through a
/// group visits two of them. This is a rough check over the whole walk, not
/// a per-loop one, and nested or sibling groups skew it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Bounds {
    pub min: u32,
    /// `None` means unbounded.
    pub max: Option<u32>,
}

impl Bounds {
    pub fn new(min: u32, max: Option<u32>) -> Bounds {
        Bounds { min, max }
    }

    pub fn unbounded() -> Bounds {
        Bounds { min: 0, max: None }
    }

    /// `{m,n}` gives `(m, n)`, `*` gives `(0, unbounded)` and so on. Patterns
    /// that are not a repetition at the top are unbounded.
    pub fn from_ast(ast: &Ast) -> Bounds {
        match *ast {
            Ast::Repetition(ref repetition) => {
                let (min, max) = repetition.kind().bounds();
                Bounds { min, max }
            }
            _ => Bounds::unbounded(),
        }
    }

    /// Most capture positions a walk may visit before it is cut off.
    pub fn max_captures(&self) -> Option<usize> {
        self.max.map(|max| (max as usize + 1) * 2)
    }

    /// Fewest capture positions a walk must visit to be accepted.
    pub fn min_captures(&self) -> usize {
        self.min as usize * 2
    }
}

impl Default for Bounds {
    fn default() -> Bounds {
        Bounds::unbounded()
    }
}
