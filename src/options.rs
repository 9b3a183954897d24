/// Syntax dialect switches applied while parsing a pattern.
///
/// The generator never looks at these directly; they only change how a
/// pattern is parsed into an [`Ast`](crate::ast::Ast) and therefore which
/// program gets compiled.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SyntaxOptions {
    /// Letters match both cases, like `(?i)`.
    pub case_insensitive: bool,
    /// `.` also matches `\n`, like `(?s)`.
    pub dot_matches_new_line: bool,
    /// Allow `\d \s \w` and their negations.
    pub perl_classes: bool,
    /// Allow `[[:alpha:]]` style classes inside brackets.
    pub posix_classes: bool,
    /// Allow Unicode classes `\pL`, `\p{Greek}` and their negations.
    pub unicode_groups: bool,
    /// `^` and `$` only match at the beginning and end of text.
    pub one_line: bool,
    /// Treat the whole pattern as a literal string.
    pub literal: bool,
    /// Swap the greediness of all repetitions, like `(?U)`.
    pub non_greedy: bool,
}

impl SyntaxOptions {
    /// Perl-like syntax, the default.
    pub fn perl() -> SyntaxOptions {
        SyntaxOptions {
            case_insensitive: false,
            dot_matches_new_line: false,
            perl_classes: true,
            posix_classes: true,
            unicode_groups: true,
            one_line: true,
            literal: false,
            non_greedy: false,
        }
    }

    /// POSIX ERE-like syntax: no Perl or Unicode classes, multi-line anchors.
    pub fn posix() -> SyntaxOptions {
        SyntaxOptions {
            perl_classes: false,
            unicode_groups: false,
            one_line: false,
            ..SyntaxOptions::perl()
        }
    }

    pub fn case_insensitive(mut self, yes: bool) -> SyntaxOptions {
        self.case_insensitive = yes;
        self
    }

    pub fn dot_matches_new_line(mut self, yes: bool) -> SyntaxOptions {
        self.dot_matches_new_line = yes;
        self
    }

    pub fn perl_classes(mut self, yes: bool) -> SyntaxOptions {
        self.perl_classes = yes;
        self
    }

    pub fn posix_classes(mut self, yes: bool) -> SyntaxOptions {
        self.posix_classes = yes;
        self
    }

    pub fn unicode_groups(mut self, yes: bool) -> SyntaxOptions {
        self.unicode_groups = yes;
        self
    }

    pub fn one_line(mut self, yes: bool) -> SyntaxOptions {
        self.one_line = yes;
        self
    }

    pub fn literal(mut self, yes: bool) -> SyntaxOptions {
        self.literal = yes;
        self
    }

    pub fn non_greedy(mut self, yes: bool) -> SyntaxOptions {
        self.non_greedy = yes;
        self
    }
}

impl Default for SyntaxOptions {
    fn default() -> SyntaxOptions {
        SyntaxOptions::perl()
    }
}
