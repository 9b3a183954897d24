use std::{iter, mem, result};

use crate::{
    ast::{self, class, ClassRange, ClassSet},
    automata::program::{Inst, InstChar, InstPtr, InstRanges, InstSave, InstSplit, Program},
    errors::Error,
};

/// Default cap on the number of instructions in a compiled program.
pub const DEFAULT_SIZE_LIMIT: usize = 1 << 18;

#[derive(Debug, Eq, PartialEq)]
enum MaybeInst {
    Compiled(Inst),
    Uncompiled(InstHole),
    Split {
        goto1: Option<InstPtr>,
        goto2: Option<InstPtr>,
    },
}

impl MaybeInst {
    fn split(goto1: Option<InstPtr>, goto2: Option<InstPtr>) -> MaybeInst {
        match (goto1, goto2) {
            (Some(goto1), Some(goto2)) => MaybeInst::Compiled(Inst::Split(InstSplit { goto1, goto2 })),
            _ => MaybeInst::Split { goto1, goto2 },
        }
    }

    fn unwrap(self) -> Inst {
        match self {
            MaybeInst::Compiled(inst) => inst,
            _ => unreachable!(
                "must be called on a compiled instruction, \
                 instead it was called on: {:?}",
                self
            ),
        }
    }

    fn fill_split_goto1(&mut self, goto1: InstPtr) {
        let goto2 = match *self {
            MaybeInst::Split { goto1: None, goto2 } => goto2,
            _ => unreachable!(
                "must be called on Split instruction with an open goto1, \
                 instead it was called on: {:?}",
                self
            ),
        };
        *self = MaybeInst::split(Some(goto1), goto2);
    }

    fn fill_split_goto2(&mut self, goto2: InstPtr) {
        let goto1 = match *self {
            MaybeInst::Split { goto1, goto2: None } => goto1,
            _ => unreachable!(
                "must be called on Split instruction with an open goto2, \
                 instead it was called on: {:?}",
                self
            ),
        };
        *self = MaybeInst::split(goto1, Some(goto2));
    }

    fn fill(&mut self, goto: InstPtr) {
        let hole = match mem::replace(self, MaybeInst::split(None, None)) {
            MaybeInst::Uncompiled(hole) => hole,
            other => unreachable!("compiled cant be filled: {:?}", other),
        };
        *self = MaybeInst::Compiled(hole.fill(goto));
    }
}

#[derive(Debug, Eq, PartialEq)]
enum InstHole {
    Char { c: char },
    Ranges { ranges: Vec<(char, char)> },
    Save { slot: usize },
}

impl InstHole {
    fn fill(self, goto: InstPtr) -> Inst {
        match self {
            InstHole::Char { c } => Inst::Char(InstChar { c, goto }),
            InstHole::Ranges { ranges } => Inst::Ranges(InstRanges { ranges, goto }),
            InstHole::Save { slot } => Inst::Save(InstSave { slot, goto }),
        }
    }
}

struct Patch {
    hole: Hole,
    entry: InstPtr,
}

enum Hole {
    None,
    One(InstPtr),
    Goto1(InstPtr),
    Goto2(InstPtr),
    Many(Vec<Hole>),
}

impl Hole {
    fn new(holes: Vec<Hole>) -> Hole {
        match holes.len() {
            0 => Hole::None,
            1 => holes.into_iter().next().expect("exists"),
            _ => Hole::Many(holes),
        }
    }
}

type ResultOrEmpty = result::Result<Option<Patch>, Error>;

/// Thompson construction of a [`Program`] from an [`ast::Ast`].
///
/// Counted repetitions are unrolled: `x{2,4}` becomes `xx(x(x)?)?` and
/// `x{3,}` becomes `xxx+`, so every loop left in the program is a plain
/// `*` or `+` loop.
pub struct Compiler {
    insts: Vec<MaybeInst>,
    size_limit: usize,
    slots: usize,
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new()
    }
}

impl Compiler {
    pub fn new() -> Compiler {
        Compiler {
            insts: vec![],
            size_limit: DEFAULT_SIZE_LIMIT,
            slots: 2,
        }
    }

    /// Maximum number of instructions the program may grow to.
    pub fn size_limit(mut self, limit: usize) -> Compiler {
        self.size_limit = limit;
        self
    }

    pub fn compile(mut self, ast: &ast::Ast) -> result::Result<Program, Error> {
        let start = match self.c(ast)? {
            Some(Patch { hole, entry }) => {
                self.fill_to_next(hole);
                entry
            }
            None => self.insts.len(),
        };

        self.push_compiled(Inst::Match);
        self.check_size()?;
        let insts = self
            .insts
            .into_iter()
            .map(|i| i.unwrap())
            .collect::<Vec<_>>();
        Ok(Program {
            insts,
            start,
            slots: self.slots,
        })
    }

    fn check_size(&self) -> result::Result<(), Error> {
        if self.insts.len() > self.size_limit {
            return Err(Error::CompiledTooBig(self.size_limit));
        }
        Ok(())
    }

    fn push_compiled(&mut self, inst: Inst) {
        self.insts.push(MaybeInst::Compiled(inst));
    }

    fn push_hole(&mut self, hole: InstHole) -> ResultOrEmpty {
        let pc = self.insts.len();
        self.insts.push(MaybeInst::Uncompiled(hole));
        Ok(Some(Patch {
            hole: Hole::One(pc),
            entry: pc,
        }))
    }

    fn push_split_hole(&mut self) -> InstPtr {
        let pc = self.insts.len();
        self.insts.push(MaybeInst::split(None, None));
        pc
    }

    fn pop_split_hole(&mut self) -> ResultOrEmpty {
        self.insts.pop();
        Ok(None)
    }

    /// Sends the preferred branch of the split at `split` to `entry` and
    /// returns the still open, non-preferred branch.
    fn fill_split_preferred(&mut self, split: InstPtr, entry: InstPtr, greedy: bool) -> Hole {
        if greedy {
            self.fill(Hole::Goto1(split), entry);
            Hole::Goto2(split)
        } else {
            self.fill(Hole::Goto2(split), entry);
            Hole::Goto1(split)
        }
    }

    fn fill_to_next(&mut self, hole: Hole) {
        let next = self.insts.len();
        self.fill(hole, next);
    }

    fn fill(&mut self, hole: Hole, goto: InstPtr) {
        match hole {
            Hole::None => {}
            Hole::One(pc) => self.insts[pc].fill(goto),
            Hole::Goto1(pc) => self.insts[pc].fill_split_goto1(goto),
            Hole::Goto2(pc) => self.insts[pc].fill_split_goto2(goto),
            Hole::Many(holes) => {
                for hole in holes {
                    self.fill(hole, goto)
                }
            }
        }
    }

    /// Chains two fragments, either of which may be empty.
    fn join(&mut self, first: Option<Patch>, second: Option<Patch>) -> Option<Patch> {
        match (first, second) {
            (Some(first), Some(second)) => {
                self.fill(first.hole, second.entry);
                Some(Patch {
                    hole: second.hole,
                    entry: first.entry,
                })
            }
            (first, None) => first,
            (None, second) => second,
        }
    }

    fn c(&mut self, ast: &ast::Ast) -> ResultOrEmpty {
        self.check_size()?;
        match *ast {
            ast::Ast::Empty(_) => self.c_empty(),
            // position was validated by the parser, nothing to emit
            ast::Ast::Assertion(_) => self.c_empty(),
            ast::Ast::Concat(ref concat) => self.c_concat(concat.asts()),
            ast::Ast::Repetition(ref repetition) => self.c_repetition(
                repetition.kind(),
                repetition.greedy,
                repetition.ast.as_ref(),
            ),
            ast::Ast::Literal(ref literal) => self.c_literal(literal),
            ast::Ast::Class(ref class) => self.c_class(&class.set),
            ast::Ast::Group(ref group) => self.c_group(group),
            ast::Ast::Alternation(ref alteration) => self.c_alternation(&alteration.asts),
        }
    }

    fn c_empty(&mut self) -> ResultOrEmpty {
        Ok(None)
    }

    fn c_concat(&mut self, concat: &[ast::Ast]) -> ResultOrEmpty {
        let mut patch = None;
        for ast in concat {
            let next = self.c(ast)?;
            patch = self.join(patch, next);
        }
        Ok(patch)
    }

    fn c_char(&mut self, c: char) -> ResultOrEmpty {
        self.push_hole(InstHole::Char { c })
    }

    fn c_literal(&mut self, literal: &ast::Literal) -> ResultOrEmpty {
        if literal.case_insensitive {
            let mut folds = class::simple_fold(literal.char).peekable();
            if folds.peek().is_some() {
                let set = ClassSet::new(
                    iter::once(literal.char)
                        .chain(folds)
                        .map(ClassRange::single),
                );
                return self.c_class(&set);
            }
        }
        self.c_char(literal.char)
    }

    fn c_class(&mut self, set: &ClassSet) -> ResultOrEmpty {
        match set.ranges() {
            [] => {
                let pc = self.insts.len();
                self.push_compiled(Inst::Fail);
                Ok(Some(Patch {
                    hole: Hole::None,
                    entry: pc,
                }))
            }
            [range] if range.start == range.end => self.c_char(range.start),
            ranges => self.push_hole(InstHole::Ranges {
                ranges: ranges.iter().map(|r| (r.start, r.end)).collect(),
            }),
        }
    }

    fn c_group(&mut self, group: &ast::Group) -> ResultOrEmpty {
        match group.capture_index() {
            Some(index) => self.c_capture(2 * index as usize, group.ast.as_ref()),
            None => self.c(group.ast.as_ref()),
        }
    }

    fn c_capture(&mut self, first_slot: usize, ast: &ast::Ast) -> ResultOrEmpty {
        self.slots = self.slots.max(first_slot + 2);
        let open = self.push_hole(InstHole::Save { slot: first_slot })?;
        let body = self.c(ast)?;
        let open_body = self.join(open, body);
        let close = self.push_hole(InstHole::Save {
            slot: first_slot + 1,
        })?;
        Ok(self.join(open_body, close))
    }

    /// Counts the capture slots of `ast` without emitting anything.
    fn c_slots(&mut self, ast: &ast::Ast) {
        match *ast {
            ast::Ast::Group(ref group) => {
                if let Some(index) = group.capture_index() {
                    self.slots = self.slots.max(2 * index as usize + 2);
                }
                self.c_slots(&group.ast);
            }
            ast::Ast::Repetition(ref repetition) => self.c_slots(&repetition.ast),
            ast::Ast::Concat(ref concat) => concat.asts().iter().for_each(|ast| self.c_slots(ast)),
            ast::Ast::Alternation(ref alt) => alt.asts.iter().for_each(|ast| self.c_slots(ast)),
            ast::Ast::Empty(_)
            | ast::Ast::Literal(_)
            | ast::Ast::Class(_)
            | ast::Ast::Assertion(_) => {}
        }
    }

    fn c_alternation(&mut self, alt: &[ast::Ast]) -> ResultOrEmpty {
        // alternatives that match nothing are left out, unless all of them do
        let (dead, live): (Vec<&ast::Ast>, Vec<&ast::Ast>) =
            alt.iter().partition(|ast| matches_nothing(ast));
        let alt = if live.is_empty() {
            dead
        } else {
            for ast in dead {
                self.c_slots(ast);
            }
            live
        };

        let (last, init) = match alt.split_last() {
            Some(split) => split,
            None => return self.c_empty(),
        };

        let mut holes: Vec<Hole> = vec![];
        let mut entry = None;
        // goto2 of the previous split, pointing at the next alternative
        let mut pending: Option<Hole> = None;

        for ast in init {
            let split = self.push_split_hole();
            if let Some(hole) = pending.take() {
                self.fill(hole, split);
            }
            entry.get_or_insert(split);

            match self.c(ast)? {
                Some(Patch { hole, entry }) => {
                    self.fill(Hole::Goto1(split), entry);
                    holes.push(hole);
                }
                None => holes.push(Hole::Goto1(split)),
            }
            pending = Some(Hole::Goto2(split));
        }

        match self.c(last)? {
            Some(Patch { hole, entry: last_entry }) => {
                if let Some(pending) = pending.take() {
                    self.fill(pending, last_entry);
                }
                entry.get_or_insert(last_entry);
                holes.push(hole);
            }
            None => holes.extend(pending.take()),
        }

        Ok(entry.map(|entry| Patch {
            hole: Hole::new(holes),
            entry,
        }))
    }

    fn c_repetition(
        &mut self,
        kind: ast::RepetitionKind,
        greedy: bool,
        ast: &ast::Ast,
    ) -> ResultOrEmpty {
        // an operand that matches nothing can only be skipped
        if kind.bounds().0 == 0 && matches_nothing(ast) {
            self.c_slots(ast);
            return self.c_empty();
        }
        match kind {
            ast::RepetitionKind::ZeroOrOne => self.c_zero_or_one(ast, greedy),
            ast::RepetitionKind::ZeroOrMore => self.c_zero_or_more(ast, greedy),
            ast::RepetitionKind::OneOrMore => self.c_one_or_more(ast, greedy),
            ast::RepetitionKind::Range(_) => {
                let (min, max) = kind.bounds();
                self.c_range(ast, greedy, min, max)
            }
        }
    }

    fn c_zero_or_one(&mut self, ast: &ast::Ast, greedy: bool) -> ResultOrEmpty {
        let split = self.push_split_hole();
        match self.c(ast)? {
            Some(Patch { hole, entry }) => {
                let skip = self.fill_split_preferred(split, entry, greedy);
                Ok(Some(Patch {
                    hole: Hole::new(vec![skip, hole]),
                    entry: split,
                }))
            }
            None => self.pop_split_hole(),
        }
    }

    fn c_zero_or_more(&mut self, ast: &ast::Ast, greedy: bool) -> ResultOrEmpty {
        let split = self.push_split_hole();
        match self.c(ast)? {
            Some(Patch { hole, entry }) => {
                self.fill(hole, split);
                let exit = self.fill_split_preferred(split, entry, greedy);
                Ok(Some(Patch {
                    hole: exit,
                    entry: split,
                }))
            }
            None => self.pop_split_hole(),
        }
    }

    fn c_one_or_more(&mut self, ast: &ast::Ast, greedy: bool) -> ResultOrEmpty {
        match self.c(ast)? {
            Some(Patch { hole, entry }) => {
                self.fill_to_next(hole);
                let split = self.push_split_hole();
                let exit = self.fill_split_preferred(split, entry, greedy);
                Ok(Some(Patch { hole: exit, entry }))
            }
            None => Ok(None),
        }
    }

    fn c_range(
        &mut self,
        ast: &ast::Ast,
        greedy: bool,
        min: u32,
        max: Option<u32>,
    ) -> ResultOrEmpty {
        // `x{m,}` keeps one copy back for the trailing `x+`
        let required = match max {
            None if min > 0 => min - 1,
            _ => min,
        };
        let mut patch = None;
        for _ in 0..required {
            let next = self.c(ast)?;
            patch = self.join(patch, next);
        }

        let tail = match max {
            None if min == 0 => self.c_zero_or_more(ast, greedy)?,
            None => self.c_one_or_more(ast, greedy)?,
            Some(max) => self.c_optional_chain(ast, greedy, max - min)?,
        };
        Ok(self.join(patch, tail))
    }

    /// `count` nested optionals: `(x(x(x)?)?)?` for a count of three.
    fn c_optional_chain(&mut self, ast: &ast::Ast, greedy: bool, count: u32) -> ResultOrEmpty {
        if count == 0 {
            return self.c_empty();
        }
        let split = self.push_split_hole();
        let body = match self.c(ast)? {
            Some(body) => body,
            None => return self.pop_split_hole(),
        };
        let skip = self.fill_split_preferred(split, body.entry, greedy);
        let hole = match self.c_optional_chain(ast, greedy, count - 1)? {
            Some(rest) => {
                self.fill(body.hole, rest.entry);
                rest.hole
            }
            None => body.hole,
        };
        Ok(Some(Patch {
            hole: Hole::new(vec![skip, hole]),
            entry: split,
        }))
    }
}

/// Reports whether no string at all matches `ast`.
fn matches_nothing(ast: &ast::Ast) -> bool {
    match *ast {
        ast::Ast::Class(ref class) => class.set.is_empty(),
        ast::Ast::Concat(ref concat) => concat.asts().iter().any(matches_nothing),
        ast::Ast::Alternation(ref alt) => alt.asts.iter().all(matches_nothing),
        ast::Ast::Group(ref group) => matches_nothing(&group.ast),
        ast::Ast::Repetition(ref repetition) => {
            repetition.kind().bounds().0 > 0 && matches_nothing(&repetition.ast)
        }
        ast::Ast::Empty(_) | ast::Ast::Literal(_) | ast::Ast::Assertion(_) => false,
    }
}
