use std::cmp::Ordering;

use regex_syntax::hir::{Class, HirKind};

/// An inclusive range of chars, `start <= end`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct ClassRange {
    pub start: char,
    pub end: char,
}

impl ClassRange {
    pub fn new(start: char, end: char) -> ClassRange {
        if start <= end {
            ClassRange { start, end }
        } else {
            ClassRange {
                start: end,
                end: start,
            }
        }
    }

    pub fn single(c: char) -> ClassRange {
        ClassRange { start: c, end: c }
    }

    pub fn contains(&self, c: char) -> bool {
        self.start <= c && c <= self.end
    }
}

/// A set of chars kept as sorted, non-overlapping, non-adjacent ranges.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClassSet {
    ranges: Vec<ClassRange>,
}

impl ClassSet {
    pub fn new<I: IntoIterator<Item = ClassRange>>(ranges: I) -> ClassSet {
        let mut set = ClassSet {
            ranges: ranges.into_iter().collect(),
        };
        set.canonicalize();
        set
    }

    pub fn empty() -> ClassSet {
        ClassSet { ranges: vec![] }
    }

    pub fn any() -> ClassSet {
        ClassSet::new([ClassRange::new('\0', char::MAX)])
    }

    pub fn any_except_new_line() -> ClassSet {
        ClassSet::new([
            ClassRange::new('\0', '\x09'),
            ClassRange::new('\x0B', char::MAX),
        ])
    }

    pub fn ranges(&self) -> &[ClassRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.ranges
            .binary_search_by(|r| {
                if r.end < c {
                    Ordering::Less
                } else if r.start > c {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn push(&mut self, range: ClassRange) {
        self.ranges.push(range);
        self.canonicalize();
    }

    pub fn union(&mut self, other: &ClassSet) {
        self.ranges.extend_from_slice(&other.ranges);
        self.canonicalize();
    }

    pub fn negate(&mut self) {
        if self.ranges.is_empty() {
            self.ranges.push(ClassRange::new('\0', char::MAX));
            return;
        }
        let mut negated = Vec::with_capacity(self.ranges.len() + 1);
        let first = self.ranges[0].start;
        if let Some(end) = decrement(first) {
            negated.push(ClassRange::new('\0', end));
        }
        for pair in self.ranges.windows(2) {
            // canonical ranges always leave a gap of at least one char
            if let (Some(start), Some(end)) = (increment(pair[0].end), decrement(pair[1].start)) {
                negated.push(ClassRange::new(start, end));
            }
        }
        let last = self.ranges[self.ranges.len() - 1].end;
        if let Some(start) = increment(last) {
            negated.push(ClassRange::new(start, char::MAX));
        }
        self.ranges = negated;
    }

    /// Adds the simple upper/lower case counterpart of every char in the set.
    pub fn case_fold_simple(&mut self) {
        let mut folded = vec![];
        for range in &self.ranges {
            for c in range.start..=range.end {
                for f in simple_fold(c) {
                    if !range.contains(f) {
                        folded.push(ClassRange::single(f));
                    }
                }
            }
        }
        if !folded.is_empty() {
            self.ranges.extend(folded);
            self.canonicalize();
        }
    }

    fn canonicalize(&mut self) {
        self.ranges.sort();
        let mut merged: Vec<ClassRange> = Vec::with_capacity(self.ranges.len());
        for range in self.ranges.drain(..) {
            match merged.last_mut() {
                Some(last) if increment(last.end).map_or(true, |next| range.start <= next) => {
                    if range.end > last.end {
                        last.end = range.end;
                    }
                }
                _ => merged.push(range),
            }
        }
        self.ranges = merged;
    }

    pub fn perl_digit() -> ClassSet {
        ClassSet::new([ClassRange::new('0', '9')])
    }

    pub fn perl_space() -> ClassSet {
        ClassSet::new([
            ClassRange::new('\t', '\n'),
            ClassRange::new('\x0C', '\r'),
            ClassRange::single(' '),
        ])
    }

    pub fn perl_word() -> ClassSet {
        ClassSet::new([
            ClassRange::new('0', '9'),
            ClassRange::new('A', 'Z'),
            ClassRange::single('_'),
            ClassRange::new('a', 'z'),
        ])
    }

    /// ASCII POSIX class by name, e.g. `alpha` for `[:alpha:]`.
    pub fn posix(name: &str) -> Option<ClassSet> {
        let ranges: &[(char, char)] = match name {
            "alnum" => &[('0', '9'), ('A', 'Z'), ('a', 'z')],
            "alpha" => &[('A', 'Z'), ('a', 'z')],
            "ascii" => &[('\0', '\x7F')],
            "blank" => &[('\t', '\t'), (' ', ' ')],
            "cntrl" => &[('\0', '\x1F'), ('\x7F', '\x7F')],
            "digit" => &[('0', '9')],
            "graph" => &[('!', '~')],
            "lower" => &[('a', 'z')],
            "print" => &[(' ', '~')],
            "punct" => &[('!', '/'), (':', '@'), ('[', '`'), ('{', '~')],
            "space" => &[('\t', '\r'), (' ', ' ')],
            "upper" => &[('A', 'Z')],
            "word" => &[('0', '9'), ('A', 'Z'), ('_', '_'), ('a', 'z')],
            "xdigit" => &[('0', '9'), ('A', 'F'), ('a', 'f')],
            _ => return None,
        };
        Some(ClassSet::new(
            ranges.iter().map(|&(start, end)| ClassRange::new(start, end)),
        ))
    }

    /// Unicode general category or script by name, e.g. `L`, `Lu` or
    /// `Greek`, as written inside `\p{...}`.
    pub fn unicode(name: &str) -> Option<ClassSet> {
        let valid = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '=' | ' ');
        if name.is_empty() || !name.chars().all(valid) {
            return None;
        }
        let hir = regex_syntax::Parser::new()
            .parse(&format!(r"\p{{{}}}", name))
            .ok()?;
        match *hir.kind() {
            HirKind::Class(Class::Unicode(ref class)) => Some(ClassSet::new(
                class.iter().map(|r| ClassRange::new(r.start(), r.end())),
            )),
            // single char classes come back as a literal
            HirKind::Literal(ref literal) => {
                let s = std::str::from_utf8(&literal.0).ok()?;
                Some(ClassSet::new(s.chars().map(ClassRange::single)))
            }
            _ => None,
        }
    }
}

/// Simple (one char to one char) case counterparts of `c`, excluding `c`.
///
/// A candidate is only kept when it lowercases to the same thing as `c`, so
/// one-way mappings such as `ı` to `I` are left out.
pub fn simple_fold(c: char) -> impl Iterator<Item = char> {
    let lower = single(c.to_lowercase());
    let upper = single(c.to_uppercase());
    lower
        .into_iter()
        .chain(upper)
        .filter(move |&f| f != c && f.to_lowercase().eq(c.to_lowercase()))
}

fn single<I: Iterator<Item = char>>(mut it: I) -> Option<char> {
    let c = it.next()?;
    match it.next() {
        None => Some(c),
        Some(_) => None,
    }
}

fn increment(c: char) -> Option<char> {
    match c {
        '\u{D7FF}' => Some('\u{E000}'),
        char::MAX => None,
        c => char::from_u32(c as u32 + 1),
    }
}

fn decrement(c: char) -> Option<char> {
    match c {
        '\u{E000}' => Some('\u{D7FF}'),
        '\0' => None,
        c => char::from_u32(c as u32 - 1),
    }
}
