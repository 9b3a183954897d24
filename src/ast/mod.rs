use std::fmt;
pub mod class;
pub mod parser;

pub use class::{ClassRange, ClassSet};

#[derive(Debug, PartialEq, Eq)]
pub enum Ast {
    Empty(Empty),
    Concat(Concat),
    Repetition(Repetition),
    Literal(Literal),
    Class(Class),
    Assertion(Assertion),
    Group(Group),
    Alternation(Alternation),
}

impl Ast {
    pub fn span(&self) -> &Span {
        match *self {
            Ast::Empty(ref x) => &x.span,
            Ast::Concat(ref x) => &x.span,
            Ast::Repetition(ref x) => &x.op.span,
            Ast::Literal(ref x) => &x.span,
            Ast::Class(ref x) => &x.span,
            Ast::Assertion(ref x) => &x.span,
            Ast::Group(ref x) => &x.span,
            Ast::Alternation(ref x) => &x.span,
        }
    }
}

#[derive(PartialEq, Debug, Eq)]
pub struct Alternation {
    span: Span,
    pub asts: Vec<Ast>,
}

impl Alternation {
    pub fn into_ast(mut self) -> Ast {
        match self.asts.len() {
            0 => Ast::Empty(Empty { span: self.span }),
            1 => self.asts.pop().expect("exists"),
            _ => Ast::Alternation(self),
        }
    }
}

#[derive(PartialEq, Debug, Eq)]
pub struct Group {
    span: Span,
    pub kind: GroupKind,
    pub ast: Box<Ast>,
}

impl Group {
    /// Capture index of this group, `None` for `(?:...)`.
    pub fn capture_index(&self) -> Option<u32> {
        match self.kind {
            GroupKind::CaptureIndex(index) => Some(index),
            GroupKind::CaptureName { index, .. } => Some(index),
            GroupKind::NonCapturing => None,
        }
    }
}

#[derive(PartialEq, Debug, Eq, Clone)]
pub enum GroupKind {
    CaptureIndex(u32),
    CaptureName { name: String, index: u32 },
    NonCapturing,
}

#[derive(PartialEq, Debug, Eq)]
pub struct Empty {
    span: Span,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Concat {
    pub span: Span,
    pub asts: Vec<Ast>,
}
impl Concat {
    fn new(span: Span) -> Concat {
        Concat { span, asts: vec![] }
    }

    fn into_ast(mut self) -> Ast {
        match self.asts.len() {
            0 => Ast::Empty(Empty { span: self.span }),
            1 => self.asts.pop().expect("exists"),
            _ => Ast::Concat(self),
        }
    }

    pub fn asts(&self) -> &[Ast] {
        self.asts.as_ref()
    }
}

#[derive(PartialEq, Debug, Eq)]
pub struct Literal {
    span: Span,
    pub kind: LiteralKind,
    pub char: char,
    /// Set when the literal was parsed under `(?i)`.
    pub case_insensitive: bool,
}

#[derive(PartialEq, Debug, Eq)]
pub enum LiteralKind {
    Verbatim,    // `a` or `0`
    Punctuation, // escaped `\*` or `\[`
    Special,     // `\n`, `\t`, ...
    HexCode,     // `\x41` or `\x{263a}`
}

#[derive(PartialEq, Debug, Eq)]
pub struct Class {
    span: Span,
    pub kind: ClassKind,
    /// Final set of matched chars, negation and case folding already applied.
    pub set: ClassSet,
}

#[derive(PartialEq, Debug, Eq, Clone, Copy)]
pub enum ClassKind {
    Dot,
    Perl,
    Unicode,
    Bracket,
}

#[derive(PartialEq, Debug, Eq)]
pub struct Assertion {
    span: Span,
    pub kind: AssertionKind,
}

impl Assertion {
    pub fn is_start(&self) -> bool {
        matches!(self.kind, AssertionKind::StartText | AssertionKind::StartLine)
    }

    pub fn is_end(&self) -> bool {
        matches!(self.kind, AssertionKind::EndText | AssertionKind::EndLine)
    }
}

#[derive(PartialEq, Debug, Eq, Clone, Copy)]
pub enum AssertionKind {
    StartText, // `\A`, or `^` in one-line mode
    EndText,   // `\z`, or `$` in one-line mode
    StartLine, // `^` in multi-line mode
    EndLine,   // `$` in multi-line mode
}

#[derive(Debug, PartialEq, Eq)]
pub struct Repetition {
    pub op: RepetitionOp,
    pub greedy: bool,
    pub ast: Box<Ast>,
}
impl Repetition {
    pub fn kind(&self) -> RepetitionKind {
        self.op.kind
    }
}

#[derive(PartialEq, Debug, Eq)]
pub struct RepetitionOp {
    span: Span,
    pub kind: RepetitionKind,
}

#[derive(PartialEq, Debug, Eq, Copy, Clone)]
pub enum RepetitionKind {
    ZeroOrOne,
    ZeroOrMore,
    OneOrMore,
    Range(RepetitionRange),
}

impl RepetitionKind {
    /// Minimum and maximum number of times the operand must/may occur.
    /// `None` as maximum means unbounded.
    pub fn bounds(&self) -> (u32, Option<u32>) {
        match *self {
            RepetitionKind::ZeroOrOne => (0, Some(1)),
            RepetitionKind::ZeroOrMore => (0, None),
            RepetitionKind::OneOrMore => (1, None),
            RepetitionKind::Range(RepetitionRange::Exactly(n)) => (n, Some(n)),
            RepetitionKind::Range(RepetitionRange::AtLeast(n)) => (n, None),
            RepetitionKind::Range(RepetitionRange::Bounded(m, n)) => (m, Some(n)),
        }
    }
}

#[derive(PartialEq, Debug, Eq, Copy, Clone)]
pub enum RepetitionRange {
    Exactly(u32),      // `{m}`
    AtLeast(u32),      // `{m,}`
    Bounded(u32, u32), // `{m,n}`
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Position {
    pub offset: usize,
}
impl Position {
    pub fn new(offset: usize) -> Position {
        Position { offset }
    }
}

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Span {
    start: Position,
    end: Position,
}

impl Span {
    pub fn point(pos: Position) -> Span {
        Span {
            start: pos,
            end: pos,
        }
    }

    pub(crate) fn new(start: Position, end: Position) -> Span {
        Span { start, end }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({:?}, {:?})", self.start, self.end)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    pattern: String,
    span: Span,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at offset {} in `{}`",
            self.kind, self.span.start.offset, self.pattern
        )
    }
}

impl std::error::Error for Error {}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    RepetitionMissing,
    RepetitionNested,
    RepetitionCountInvalid,
    RepetitionCountTooLarge,
    GroupUnopened,
    GroupUnclosed,
    GroupNameInvalid,
    GroupNameUnexpectedEof,
    FlagUnrecognized,
    FlagUnexpectedEof,
    ClassUnclosed,
    ClassRangeInvalid,
    ClassRangeLiteral,
    ClassPosixUnrecognized,
    ClassUnicodeUnrecognized,
    EscapeUnexpectedEof,
    EscapeUnrecognized,
    EscapeHexInvalid,
    AssertionUnsupported,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::ErrorKind::*;
        let msg = match *self {
            RepetitionMissing => "missing argument to repetition operator",
            RepetitionNested => "invalid nested repetition operator",
            RepetitionCountInvalid => "invalid repeat count, min is greater than max",
            RepetitionCountTooLarge => "repeat count exceeds 1000",
            GroupUnopened => "unopened group",
            GroupUnclosed => "unclosed group",
            GroupNameInvalid => "invalid capture group name",
            GroupNameUnexpectedEof => "unclosed capture group name",
            FlagUnrecognized => "unrecognized flag",
            FlagUnexpectedEof => "missing closing ) for flag group",
            ClassUnclosed => "unclosed character class",
            ClassRangeInvalid => "invalid character class range, start is greater than end",
            ClassRangeLiteral => "invalid character class range, end is a class",
            ClassPosixUnrecognized => "unrecognized POSIX character class",
            ClassUnicodeUnrecognized => "unrecognized Unicode class",
            EscapeUnexpectedEof => "trailing backslash at end of pattern",
            EscapeUnrecognized => "unrecognized escape sequence",
            EscapeHexInvalid => "invalid hexadecimal escape",
            AssertionUnsupported => "assertion is only supported at the start or end of the pattern",
        };
        f.write_str(msg)
    }
}
