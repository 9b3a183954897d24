use crate::ast::{self, Ast, ClassRange, ClassSet, Position, Span};
use crate::options::SyntaxOptions;
use std::{borrow::Borrow, cell::Cell, result};

use super::Literal;

type Result<T> = result::Result<T, ast::Error>;

/// Largest count accepted in `{m,n}`.
const MAX_REPEAT: u32 = 1000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Flags {
    case_insensitive: bool,
    dot_matches_new_line: bool,
    multi_line: bool,
    swap_greed: bool,
}

pub struct Parser {
    p: String,
    pos: Cell<Position>,
    stack: Vec<GroupState>,
    options: SyntaxOptions,
    flags: Cell<Flags>,
    capture_index: Cell<u32>,
}

enum GroupState {
    Group {
        concat: ast::Concat,
        group: ast::Group,
        // flags in effect before the group opened
        flags: Flags,
    },
    Alternation {
        alt: ast::Alternation,
    },
}

enum GroupPrefix {
    Kind(ast::GroupKind),
    Flags,
}

enum ClassItem {
    Char(char),
    Set(ClassSet),
}

impl Parser {
    pub fn new(p: String) -> Self {
        Parser::with_options(p, SyntaxOptions::perl())
    }

    pub fn with_options(p: String, options: SyntaxOptions) -> Self {
        Parser {
            p,
            pos: Cell::new(Position::new(0)),
            stack: vec![],
            options,
            flags: Cell::new(Flags {
                case_insensitive: options.case_insensitive,
                dot_matches_new_line: options.dot_matches_new_line,
                multi_line: !options.one_line,
                swap_greed: options.non_greedy,
            }),
            capture_index: Cell::new(0),
        }
    }

    fn pattern(&self) -> &str {
        self.p.borrow()
    }

    fn pos(&self) -> Position {
        self.pos.get()
    }

    fn span(&self) -> Span {
        Span::point(self.pos())
    }

    fn span_char(&self) -> Span {
        Span::new(
            self.pos(),
            Position {
                offset: self.offset() + self.char().len_utf8(),
            },
        )
    }

    fn error(&self, span: Span, kind: ast::ErrorKind) -> ast::Error {
        ast::Error {
            kind,
            pattern: self.pattern().to_string(),
            span,
        }
    }

    fn offset(&self) -> usize {
        self.pos().offset
    }

    fn bump(&self) -> bool {
        if self.is_eof() {
            return false;
        }
        self.pos
            .set(Position::new(self.pos().offset + self.char().len_utf8()));
        self.pattern()[self.offset()..].chars().next().is_some()
    }

    fn is_eof(&self) -> bool {
        self.offset() == self.p.len()
    }

    /// Current char, or `'\0'` at the end of the pattern. Callers check
    /// [`Parser::is_eof`] first wherever a NUL would be ambiguous.
    fn char(&self) -> char {
        self.char_at(self.offset()).unwrap_or('\0')
    }

    fn char_at(&self, i: usize) -> Option<char> {
        self.pattern().get(i..)?.chars().next()
    }

    fn peek(&self) -> Option<char> {
        if self.is_eof() {
            return None;
        }
        let next = self.offset() + self.char().len_utf8();
        self.char_at(next)
    }

    fn is_char(&self, c: char) -> bool {
        !self.is_eof() && self.char() == c
    }

    fn next_capture_index(&self) -> u32 {
        let index = self.capture_index.get() + 1;
        self.capture_index.set(index);
        index
    }

    pub fn parse(&mut self) -> Result<Ast> {
        if self.options.literal {
            return self.parse_literal_pattern();
        }

        let mut concat = ast::Concat::new(self.span());
        loop {
            if self.is_eof() {
                break;
            }

            match self.char() {
                '(' => concat = self.push_group(concat)?,
                ')' => concat = self.pop_group(concat)?,
                '|' => concat = self.push_alternate(concat)?,
                '?' => concat = self.parse_repetition(concat, ast::RepetitionKind::ZeroOrOne)?,
                '*' => concat = self.parse_repetition(concat, ast::RepetitionKind::ZeroOrMore)?,
                '+' => concat = self.parse_repetition(concat, ast::RepetitionKind::OneOrMore)?,
                '{' => concat = self.parse_counted_repetition(concat)?,
                '[' => concat.asts.push(Ast::Class(self.parse_class()?)),
                '.' => concat.asts.push(Ast::Class(self.parse_dot())),
                '^' | '$' => concat.asts.push(Ast::Assertion(self.parse_anchor())),
                '\\' => concat.asts.push(self.parse_escape()?),
                _ => concat.asts.push(Ast::Literal(self.parse_primitive()?)),
            }
        }

        let ast = self.pop_end(concat)?;
        self.check_assertions(&ast)?;
        Ok(ast)
    }

    fn parse_literal_pattern(&self) -> Result<Ast> {
        let mut concat = ast::Concat::new(self.span());
        while !self.is_eof() {
            concat.asts.push(Ast::Literal(self.parse_primitive()?));
        }
        concat.span.end = self.pos();
        Ok(concat.into_ast())
    }

    fn parse_primitive(&self) -> Result<Literal> {
        let l = Literal {
            span: self.span_char(),
            kind: ast::LiteralKind::Verbatim,
            char: self.char(),
            case_insensitive: self.flags.get().case_insensitive,
        };
        self.bump();
        Ok(l)
    }

    fn parse_repetition(
        &self,
        concat: ast::Concat,
        kind: ast::RepetitionKind,
    ) -> Result<ast::Concat> {
        assert!(self.char() == '?' || self.char() == '*' || self.char() == '+');

        let start = self.pos();
        self.bump();
        self.push_repetition(concat, start, kind)
    }

    fn parse_counted_repetition(&self, mut concat: ast::Concat) -> Result<ast::Concat> {
        assert!(self.char() == '{');

        let start = self.pos();
        match self.parse_counted_range(start)? {
            Some(range) => {
                self.push_repetition(concat, start, ast::RepetitionKind::Range(range))
            }
            None => {
                // not a counted repetition, so `{` is just a literal
                self.pos.set(start);
                concat.asts.push(Ast::Literal(self.parse_primitive()?));
                Ok(concat)
            }
        }
    }

    fn parse_counted_range(&self, start: Position) -> Result<Option<ast::RepetitionRange>> {
        use ast::RepetitionRange::*;

        self.bump();
        let min = match self.parse_decimal() {
            Some(min) => min,
            None => return Ok(None),
        };
        let range = if self.is_char('}') {
            Exactly(min)
        } else if self.is_char(',') {
            self.bump();
            if self.is_char('}') {
                AtLeast(min)
            } else {
                match self.parse_decimal() {
                    Some(max) if self.is_char('}') => Bounded(min, max),
                    _ => return Ok(None),
                }
            }
        } else {
            return Ok(None);
        };
        self.bump();

        let span = Span::new(start, self.pos());
        let (min, max) = ast::RepetitionKind::Range(range).bounds();
        if min > MAX_REPEAT || max.map_or(false, |max| max > MAX_REPEAT) {
            return Err(self.error(span, ast::ErrorKind::RepetitionCountTooLarge));
        }
        if max.map_or(false, |max| min > max) {
            return Err(self.error(span, ast::ErrorKind::RepetitionCountInvalid));
        }
        Ok(Some(range))
    }

    fn parse_decimal(&self) -> Option<u32> {
        let start = self.offset();
        while !self.is_eof() && self.char().is_ascii_digit() {
            self.bump();
        }
        let digits = &self.pattern()[start..self.offset()];
        if digits.is_empty() {
            return None;
        }
        Some(digits.parse::<u32>().unwrap_or(u32::MAX))
    }

    /// Wraps the last item of `concat` into a repetition. The parser must sit
    /// right after the operator.
    fn push_repetition(
        &self,
        mut concat: ast::Concat,
        start: Position,
        kind: ast::RepetitionKind,
    ) -> Result<ast::Concat> {
        let ast = match concat.asts.pop() {
            None => {
                return Err(self.error(
                    Span::new(start, self.pos()),
                    ast::ErrorKind::RepetitionMissing,
                ))
            }
            Some(Ast::Repetition(_)) => {
                return Err(self.error(
                    Span::new(start, self.pos()),
                    ast::ErrorKind::RepetitionNested,
                ))
            }
            Some(ast) => ast,
        };

        let mut greedy = true;
        if self.is_char('?') {
            greedy = false;
            self.bump();
        }
        concat.asts.push(Ast::Repetition(ast::Repetition {
            op: ast::RepetitionOp {
                span: Span::new(start, self.pos()),
                kind,
            },
            greedy: greedy != self.flags.get().swap_greed,
            ast: Box::new(ast),
        }));
        Ok(concat)
    }

    fn parse_dot(&self) -> ast::Class {
        assert!(self.char() == '.');
        let span = self.span_char();
        self.bump();
        let set = if self.flags.get().dot_matches_new_line {
            ClassSet::any()
        } else {
            ClassSet::any_except_new_line()
        };
        ast::Class {
            span,
            kind: ast::ClassKind::Dot,
            set,
        }
    }

    fn parse_anchor(&self) -> ast::Assertion {
        use ast::AssertionKind::*;

        let span = self.span_char();
        let multi_line = self.flags.get().multi_line;
        let kind = match self.char() {
            '^' if multi_line => StartLine,
            '^' => StartText,
            _ if multi_line => EndLine,
            _ => EndText,
        };
        self.bump();
        ast::Assertion { span, kind }
    }

    fn parse_escape(&self) -> Result<Ast> {
        assert!(self.char() == '\\');

        let start = self.pos();
        if !self.bump() {
            return Err(self.error(
                Span::new(start, self.pos()),
                ast::ErrorKind::EscapeUnexpectedEof,
            ));
        }
        match self.char() {
            c @ ('A' | 'z') => {
                self.bump();
                Ok(Ast::Assertion(ast::Assertion {
                    span: Span::new(start, self.pos()),
                    kind: if c == 'A' {
                        ast::AssertionKind::StartText
                    } else {
                        ast::AssertionKind::EndText
                    },
                }))
            }
            'b' | 'B' => Err(self.error(
                Span::new(start, self.span_char().end),
                ast::ErrorKind::AssertionUnsupported,
            )),
            c @ ('d' | 'D' | 's' | 'S' | 'w' | 'W') if self.options.perl_classes => {
                self.bump();
                Ok(Ast::Class(ast::Class {
                    span: Span::new(start, self.pos()),
                    kind: ast::ClassKind::Perl,
                    set: self.perl_class(c),
                }))
            }
            'p' | 'P' if self.options.unicode_groups => {
                let set = self.parse_unicode_class(start)?;
                Ok(Ast::Class(ast::Class {
                    span: Span::new(start, self.pos()),
                    kind: ast::ClassKind::Unicode,
                    set,
                }))
            }
            _ => Ok(Ast::Literal(self.parse_escaped_char(start)?)),
        }
    }

    /// Parses the char after a backslash; `start` points at the backslash.
    fn parse_escaped_char(&self, start: Position) -> Result<Literal> {
        use ast::LiteralKind::*;

        let (kind, c) = match self.char() {
            'n' => (Special, '\n'),
            't' => (Special, '\t'),
            'r' => (Special, '\r'),
            'f' => (Special, '\x0C'),
            'v' => (Special, '\x0B'),
            'a' => (Special, '\x07'),
            'x' => return self.parse_hex(start),
            c if c.is_ascii() && !c.is_ascii_alphanumeric() => (Punctuation, c),
            _ => {
                return Err(self.error(
                    Span::new(start, self.span_char().end),
                    ast::ErrorKind::EscapeUnrecognized,
                ))
            }
        };
        self.bump();
        Ok(Literal {
            span: Span::new(start, self.pos()),
            kind,
            char: c,
            case_insensitive: self.flags.get().case_insensitive,
        })
    }

    fn parse_hex(&self, start: Position) -> Result<Literal> {
        assert!(self.char() == 'x');

        let invalid = || self.error(Span::new(start, self.pos()), ast::ErrorKind::EscapeHexInvalid);
        if !self.bump() {
            return Err(invalid());
        }
        let (digits_start, digits_end) = if self.char() == '{' {
            if !self.bump() {
                return Err(invalid());
            }
            let digits_start = self.offset();
            while self.char() != '}' {
                if !self.char().is_ascii_hexdigit() || !self.bump() {
                    return Err(invalid());
                }
            }
            let digits_end = self.offset();
            self.bump();
            (digits_start, digits_end)
        } else {
            let digits_start = self.offset();
            for _ in 0..2 {
                if self.is_eof() || !self.char().is_ascii_hexdigit() {
                    return Err(invalid());
                }
                self.bump();
            }
            (digits_start, self.offset())
        };

        let digits = &self.pattern()[digits_start..digits_end];
        let c = u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(invalid)?;
        Ok(Literal {
            span: Span::new(start, self.pos()),
            kind: ast::LiteralKind::HexCode,
            char: c,
            case_insensitive: self.flags.get().case_insensitive,
        })
    }

    fn perl_class(&self, c: char) -> ClassSet {
        let mut set = match c.to_ascii_lowercase() {
            'd' => ClassSet::perl_digit(),
            's' => ClassSet::perl_space(),
            _ => ClassSet::perl_word(),
        };
        if self.flags.get().case_insensitive {
            set.case_fold_simple();
        }
        if c.is_ascii_uppercase() {
            set.negate();
        }
        set
    }

    /// Parses `\pX`, `\p{Name}` or `\p{^Name}` and the `\P` negations.
    /// `start` points at the backslash, the parser sits on the `p`.
    fn parse_unicode_class(&self, start: Position) -> Result<ClassSet> {
        assert!(self.char() == 'p' || self.char() == 'P');

        let mut negated = self.char() == 'P';
        let unrecognized =
            || self.error(Span::new(start, self.pos()), ast::ErrorKind::ClassUnicodeUnrecognized);
        if !self.bump() {
            return Err(self.error(
                Span::new(start, self.pos()),
                ast::ErrorKind::EscapeUnexpectedEof,
            ));
        }
        let name = if self.char() == '{' {
            let name_start = self.offset() + 1;
            loop {
                if !self.bump() {
                    return Err(unrecognized());
                }
                if self.char() == '}' {
                    break;
                }
            }
            let name = &self.pattern()[name_start..self.offset()];
            self.bump();
            name
        } else {
            let name_start = self.offset();
            self.bump();
            &self.pattern()[name_start..self.offset()]
        };
        let name = match name.strip_prefix('^') {
            Some(name) => {
                negated = !negated;
                name
            }
            None => name,
        };

        let mut set = ClassSet::unicode(name).ok_or_else(unrecognized)?;
        if self.flags.get().case_insensitive {
            set.case_fold_simple();
        }
        if negated {
            set.negate();
        }
        Ok(set)
    }

    fn parse_class(&self) -> Result<ast::Class> {
        assert!(self.char() == '[');

        let start = self.pos();
        let unclosed = || self.error(Span::new(start, self.pos()), ast::ErrorKind::ClassUnclosed);
        if !self.bump() {
            return Err(unclosed());
        }
        let negated = self.char() == '^';
        if negated && !self.bump() {
            return Err(unclosed());
        }

        let mut ranges = vec![];
        let mut first = true;
        loop {
            if self.is_eof() {
                return Err(unclosed());
            }
            if self.char() == ']' && !first {
                self.bump();
                break;
            }
            first = false;

            let item_start = self.pos();
            match self.parse_class_item()? {
                ClassItem::Set(set) => ranges.extend_from_slice(set.ranges()),
                ClassItem::Char(lo) if self.is_char('-') && !matches!(self.peek(), Some(']') | None) => {
                    self.bump();
                    let span = Span::new(item_start, self.pos());
                    match self.parse_class_item()? {
                        ClassItem::Char(hi) if lo <= hi => ranges.push(ClassRange::new(lo, hi)),
                        ClassItem::Char(_) => {
                            return Err(self.error(
                                Span::new(item_start, self.pos()),
                                ast::ErrorKind::ClassRangeInvalid,
                            ))
                        }
                        ClassItem::Set(_) => {
                            return Err(self.error(span, ast::ErrorKind::ClassRangeLiteral))
                        }
                    }
                }
                ClassItem::Char(c) => ranges.push(ClassRange::single(c)),
            }
        }

        let mut set = ClassSet::new(ranges);
        if self.flags.get().case_insensitive {
            set.case_fold_simple();
        }
        if negated {
            set.negate();
        }
        Ok(ast::Class {
            span: Span::new(start, self.pos()),
            kind: ast::ClassKind::Bracket,
            set,
        })
    }

    fn parse_class_item(&self) -> Result<ClassItem> {
        let start = self.pos();
        match self.char() {
            '[' if self.options.posix_classes && self.peek() == Some(':') => {
                match self.parse_posix_class()? {
                    Some(set) => Ok(ClassItem::Set(set)),
                    None => {
                        self.bump();
                        Ok(ClassItem::Char('['))
                    }
                }
            }
            '\\' => {
                if !self.bump() {
                    return Err(self.error(
                        Span::new(start, self.pos()),
                        ast::ErrorKind::EscapeUnexpectedEof,
                    ));
                }
                match self.char() {
                    c @ ('d' | 'D' | 's' | 'S' | 'w' | 'W') if self.options.perl_classes => {
                        self.bump();
                        Ok(ClassItem::Set(self.perl_class(c)))
                    }
                    'p' | 'P' if self.options.unicode_groups => {
                        Ok(ClassItem::Set(self.parse_unicode_class(start)?))
                    }
                    _ => Ok(ClassItem::Char(self.parse_escaped_char(start)?.char)),
                }
            }
            c => {
                self.bump();
                Ok(ClassItem::Char(c))
            }
        }
    }

    /// Parses `[:name:]` or `[:^name:]`. Returns `None`, without moving,
    /// when the text is not shaped like a POSIX class.
    fn parse_posix_class(&self) -> Result<Option<ClassSet>> {
        let start = self.pos();
        let rest = &self.pattern()[self.offset() + 2..];
        let end = match rest.find(":]") {
            Some(end) => end,
            None => return Ok(None),
        };
        let (negated, name) = match rest[..end].strip_prefix('^') {
            Some(name) => (true, name),
            None => (false, &rest[..end]),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok(None);
        }

        let span = Span::new(start, Position::new(self.offset() + 2 + end + 2));
        let mut set = ClassSet::posix(name)
            .ok_or_else(|| self.error(span, ast::ErrorKind::ClassPosixUnrecognized))?;
        if negated {
            set.negate();
        }
        self.pos.set(span.end);
        Ok(Some(set))
    }

    fn push_group(&mut self, concat: ast::Concat) -> Result<ast::Concat> {
        assert!(self.char() == '(');

        let start = self.pos();
        let flags = self.flags.get();
        self.bump();
        let kind = if self.is_char('?') {
            self.bump();
            match self.parse_group_prefix(start)? {
                GroupPrefix::Kind(kind) => kind,
                // `(?i)` only changes the flags of the enclosing group
                GroupPrefix::Flags => return Ok(concat),
            }
        } else {
            ast::GroupKind::CaptureIndex(self.next_capture_index())
        };

        self.stack.push(GroupState::Group {
            concat,
            group: ast::Group {
                span: Span::new(start, self.pos()),
                kind,
                ast: Box::new(Ast::Empty(ast::Empty { span: self.span() })),
            },
            flags,
        });
        Ok(ast::Concat::new(self.span()))
    }

    /// Parses what follows `(?`.
    fn parse_group_prefix(&self, start: Position) -> Result<GroupPrefix> {
        if self.is_eof() {
            return Err(self.error(
                Span::new(start, self.pos()),
                ast::ErrorKind::FlagUnexpectedEof,
            ));
        }
        match self.char() {
            ':' => {
                self.bump();
                Ok(GroupPrefix::Kind(ast::GroupKind::NonCapturing))
            }
            'P' if self.peek() == Some('<') => {
                self.bump();
                self.bump();
                self.parse_capture_name(start)
            }
            '<' => {
                self.bump();
                self.parse_capture_name(start)
            }
            _ => self.parse_flags(start),
        }
    }

    fn parse_capture_name(&self, start: Position) -> Result<GroupPrefix> {
        let name_start = self.offset();
        loop {
            if self.is_eof() {
                return Err(self.error(
                    Span::new(start, self.pos()),
                    ast::ErrorKind::GroupNameUnexpectedEof,
                ));
            }
            if self.char() == '>' {
                break;
            }
            self.bump();
        }
        let name = &self.pattern()[name_start..self.offset()];
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(self.error(
                Span::new(Position::new(name_start), self.pos()),
                ast::ErrorKind::GroupNameInvalid,
            ));
        }
        let name = name.to_string();
        self.bump();
        Ok(GroupPrefix::Kind(ast::GroupKind::CaptureName {
            name,
            index: self.next_capture_index(),
        }))
    }

    fn parse_flags(&self, start: Position) -> Result<GroupPrefix> {
        let mut flags = self.flags.get();
        let mut negate = false;
        let mut seen = false;
        loop {
            if self.is_eof() {
                return Err(self.error(
                    Span::new(start, self.pos()),
                    ast::ErrorKind::FlagUnexpectedEof,
                ));
            }
            match self.char() {
                'i' => flags.case_insensitive = !negate,
                's' => flags.dot_matches_new_line = !negate,
                'm' => flags.multi_line = !negate,
                'U' => flags.swap_greed = !negate,
                '-' if !negate => negate = true,
                c @ (':' | ')') if seen => {
                    self.bump();
                    self.flags.set(flags);
                    return Ok(if c == ':' {
                        GroupPrefix::Kind(ast::GroupKind::NonCapturing)
                    } else {
                        GroupPrefix::Flags
                    });
                }
                _ => return Err(self.error(self.span_char(), ast::ErrorKind::FlagUnrecognized)),
            }
            seen = true;
            self.bump();
        }
    }

    fn pop_group(&mut self, mut group_concat: ast::Concat) -> Result<ast::Concat> {
        use self::GroupState::*;

        assert!(self.char() == ')');
        let err = Err(self.error(self.span(), ast::ErrorKind::GroupUnopened));
        let (mut before_concat, mut group, alt, flags) = match self.stack.pop() {
            None => return err,
            Some(Group {
                concat,
                group,
                flags,
            }) => (concat, group, None, flags),
            Some(Alternation { alt }) => match self.stack.pop() {
                Some(Group {
                    concat,
                    group,
                    flags,
                }) => (concat, group, Some(alt), flags),
                Some(Alternation { alt: _ }) => return err,
                None => return err,
            },
        };
        group_concat.span.end = self.pos();
        self.bump();
        group.span.end = self.pos();
        self.flags.set(flags);

        match alt {
            Some(mut alt) => {
                alt.span.end = group_concat.span.end;
                alt.asts.push(group_concat.into_ast());
                group.ast = Box::new(alt.into_ast());
            }
            None => {
                group.ast = Box::new(group_concat.into_ast());
            }
        }

        before_concat.asts.push(Ast::Group(group));
        Ok(before_concat)
    }

    fn push_alternate(&mut self, mut concat: ast::Concat) -> Result<ast::Concat> {
        assert_eq!(self.char(), '|');
        concat.span.end = self.pos();
        match self.stack.last_mut() {
            Some(GroupState::Alternation { ref mut alt }) => {
                alt.asts.push(concat.into_ast());
            }
            _ => {
                let alt = ast::Alternation {
                    span: Span::new(concat.span.start, self.pos()),
                    asts: vec![concat.into_ast()],
                };
                self.stack.push(GroupState::Alternation { alt })
            }
        };

        self.bump();
        Ok(ast::Concat {
            span: self.span(),
            asts: vec![],
        })
    }

    fn pop_end(&mut self, mut concat: ast::Concat) -> Result<Ast> {
        concat.span.end = self.pos();
        let ast = match self.stack.pop() {
            Some(GroupState::Alternation { mut alt }) => {
                alt.span.end = self.pos();
                alt.asts.push(concat.into_ast());
                Ok(Ast::Alternation(alt))
            }
            Some(GroupState::Group { group, .. }) => {
                return Err(self.error(group.span, ast::ErrorKind::GroupUnclosed))
            }
            None => Ok(concat.into_ast()),
        };
        match self.stack.pop() {
            Some(GroupState::Alternation { alt: _ }) => unreachable!(),
            Some(GroupState::Group { group, .. }) => {
                Err(self.error(group.span, ast::ErrorKind::GroupUnclosed))
            }
            None => ast,
        }
    }

    /// Zero-width assertions can't be honoured by a random walk, so they are
    /// only accepted where they hold trivially: as a prefix (`^`, `\A`) or
    /// suffix (`$`, `\z`) of a top-level branch.
    fn check_assertions(&self, ast: &Ast) -> Result<()> {
        match *ast {
            Ast::Assertion(_) => Ok(()),
            Ast::Alternation(ref alt) => alt
                .asts
                .iter()
                .try_for_each(|ast| self.check_assertions(ast)),
            Ast::Concat(ref concat) => {
                let asts = concat.asts();
                let lead = asts
                    .iter()
                    .take_while(|ast| matches!(ast, Ast::Assertion(a) if a.is_start()))
                    .count();
                let trail = asts[lead..]
                    .iter()
                    .rev()
                    .take_while(|ast| matches!(ast, Ast::Assertion(a) if a.is_end()))
                    .count();
                asts[lead..asts.len() - trail]
                    .iter()
                    .try_for_each(|ast| self.reject_assertions(ast))
            }
            _ => self.reject_assertions(ast),
        }
    }

    fn reject_assertions(&self, ast: &Ast) -> Result<()> {
        match *ast {
            Ast::Assertion(ref assertion) => Err(self.error(
                assertion.span,
                ast::ErrorKind::AssertionUnsupported,
            )),
            Ast::Concat(ref concat) => concat
                .asts()
                .iter()
                .try_for_each(|ast| self.reject_assertions(ast)),
            Ast::Alternation(ref alt) => alt
                .asts
                .iter()
                .try_for_each(|ast| self.reject_assertions(ast)),
            Ast::Group(ref group) => self.reject_assertions(&group.ast),
            Ast::Repetition(ref rep) => self.reject_assertions(&rep.ast),
            Ast::Empty(_) | Ast::Literal(_) | Ast::Class(_) => Ok(()),
        }
    }
}
