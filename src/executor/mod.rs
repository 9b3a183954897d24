use std::collections::HashSet;
use std::mem;

use crate::automata::program::{Inst, InstChar, InstPtr, InstSave, InstSplit, Program};

/// Whole-string matcher over a [`Program`].
///
/// Runs as a Pike VM: every live thread advances in lock step over the input,
/// so each char is read once and empty loops cannot spin.
pub struct Executor<'a> {
    program: &'a Program,
    stack: Vec<InstPtr>,
}

/// Threads alive at one input position, in the order they were added.
#[derive(Default)]
struct Threads {
    seen: HashSet<InstPtr>,
    order: Vec<InstPtr>,
}

impl Threads {
    fn insert(&mut self, pc: InstPtr) -> bool {
        if !self.seen.insert(pc) {
            return false;
        }
        self.order.push(pc);
        true
    }

    fn clear(&mut self) {
        self.seen.clear();
        self.order.clear();
    }
}

impl<'a> Executor<'a> {
    pub fn new(program: &'a Program) -> Executor<'a> {
        Executor {
            program,
            stack: vec![],
        }
    }

    /// Reports whether the program accepts all of `s`.
    pub fn matches(&mut self, s: &str) -> bool {
        let prog = self.program;
        let mut clist = Threads::default();
        let mut nlist = Threads::default();
        self.add(&mut clist, prog.start);

        for c in s.chars() {
            if clist.order.is_empty() {
                return false;
            }
            for &pc in &clist.order {
                match prog.insts.get(pc) {
                    Some(Inst::Char(InstChar { c: want, goto })) if *want == c => {
                        self.add(&mut nlist, *goto)
                    }
                    Some(Inst::Ranges(ranges)) if ranges.matches(c) => {
                        self.add(&mut nlist, ranges.goto)
                    }
                    _ => {}
                }
            }
            mem::swap(&mut clist, &mut nlist);
            nlist.clear();
        }
        clist
            .order
            .iter()
            .any(|&pc| prog.insts.get(pc) == Some(&Inst::Match))
    }

    /// Adds `pc` and everything reachable from it without reading input.
    fn add(&mut self, threads: &mut Threads, pc: InstPtr) {
        let prog = self.program;
        self.stack.push(pc);
        while let Some(pc) = self.stack.pop() {
            if !threads.insert(pc) {
                continue;
            }
            match prog.insts.get(pc) {
                Some(Inst::Split(InstSplit { goto1, goto2 })) => {
                    self.stack.push(*goto2);
                    self.stack.push(*goto1);
                }
                Some(Inst::Save(InstSave { goto, .. })) => self.stack.push(*goto),
                Some(Inst::Match | Inst::Char(_) | Inst::Ranges(_) | Inst::Fail) | None => {}
            }
        }
    }
}
