use std::fmt;

pub type InstPtr = usize;

/// One step of a compiled program.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Inst {
    /// Accepts the walk or match.
    Match,
    /// Exactly one fixed char.
    Char(InstChar),
    /// One char out of a union of ranges.
    Ranges(InstRanges),
    /// Branch point of an alternation or a loop.
    Split(InstSplit),
    /// Start or end of a capture group.
    Save(InstSave),
    /// Never matches. Emitted for classes that contain no chars.
    Fail,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstSave {
    pub slot: usize,
    pub goto: InstPtr,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstChar {
    pub c: char,
    pub goto: InstPtr,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstRanges {
    /// Sorted, non-empty list of inclusive ranges.
    pub ranges: Vec<(char, char)>,
    pub goto: InstPtr,
}

impl InstRanges {
    pub fn matches(&self, c: char) -> bool {
        self.ranges.iter().any(|&(lo, hi)| lo <= c && c <= hi)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstSplit {
    pub goto1: InstPtr,
    pub goto2: InstPtr,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Program {
    pub insts: Vec<Inst>,
    pub start: InstPtr,
    /// Number of capture slots, two per group including the implicit
    /// group 0 that spans the whole match.
    pub slots: usize,
}

impl Program {
    pub fn len(&self) -> usize {
        self.insts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }

    /// Number of explicit capture groups in the pattern.
    pub fn captures(&self) -> usize {
        (self.slots / 2).saturating_sub(1)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (pc, inst) in self.insts.iter().enumerate() {
            let marker = if pc == self.start { "*" } else { " " };
            write!(f, "{}{:>3}: ", marker, pc)?;
            match *inst {
                Inst::Match => writeln!(f, "match")?,
                Inst::Char(InstChar { c, goto }) => writeln!(f, "char {:?} -> {}", c, goto)?,
                Inst::Ranges(ref ranges) => {
                    write!(f, "ranges")?;
                    for &(lo, hi) in &ranges.ranges {
                        write!(f, " {:?}-{:?}", lo, hi)?;
                    }
                    writeln!(f, " -> {}", ranges.goto)?
                }
                Inst::Split(InstSplit { goto1, goto2 }) => {
                    writeln!(f, "split {}, {}", goto1, goto2)?
                }
                Inst::Save(InstSave { slot, goto }) => writeln!(f, "save {} -> {}", slot, goto)?,
                Inst::Fail => writeln!(f, "fail")?,
            }
        }
        Ok(())
    }
}
