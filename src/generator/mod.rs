//! Random walks over a compiled program.
//!
//! A walk starts at the program's entry and follows one path through it,
//! emitting a char at every `Char` or `Ranges` instruction. When it reaches
//! `Match` the emitted chars form a string the pattern accepts.

pub mod bounds;
pub mod branch;
pub mod sampler;

use rand::Rng;
use tracing::{debug, trace, warn};

use crate::ast::parser::Parser;
use crate::automata::compiler::{self, Compiler};
use crate::automata::program::{Inst, InstChar, InstPtr, InstSave, InstSplit, Program};
use crate::errors::{Error, GenerateError};
use crate::options::SyntaxOptions;

pub use self::bounds::Bounds;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GeneratorConfig {
    /// Instructions a single walk may visit before it gives up.
    pub max_steps: usize,
    /// Passed on to the compiler.
    pub size_limit: usize,
}

impl Default for GeneratorConfig {
    fn default() -> GeneratorConfig {
        GeneratorConfig {
            max_steps: 1 << 16,
            size_limit: compiler::DEFAULT_SIZE_LIMIT,
        }
    }
}

/// Produces random strings accepted by a pattern.
///
/// Compiling happens once in [`Generator::new`]; afterwards the generator is
/// read only and may be shared between threads, each walk keeping its own
/// state.
#[derive(Debug)]
pub struct Generator {
    pattern: Option<String>,
    program: Program,
    bounds: Bounds,
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(pattern: &str, options: SyntaxOptions) -> Result<Generator, Error> {
        Generator::with_config(pattern, options, GeneratorConfig::default())
    }

    pub fn with_config(
        pattern: &str,
        options: SyntaxOptions,
        config: GeneratorConfig,
    ) -> Result<Generator, Error> {
        let ast = Parser::with_options(pattern.to_owned(), options).parse()?;
        let program = Compiler::new().size_limit(config.size_limit).compile(&ast)?;
        let bounds = Bounds::from_ast(&ast);
        debug!(
            pattern,
            insts = program.len(),
            slots = program.slots,
            min = bounds.min,
            max = ?bounds.max,
            "compiled generator"
        );
        Ok(Generator {
            pattern: Some(pattern.to_owned()),
            program,
            bounds,
            config,
        })
    }

    /// Wraps an already compiled program.
    pub fn from_program(program: Program, bounds: Bounds) -> Generator {
        Generator {
            pattern: None,
            program,
            bounds,
            config: GeneratorConfig::default(),
        }
    }

    pub fn config(mut self, config: GeneratorConfig) -> Generator {
        self.config = config;
        self
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Runs one walk using the thread local random source.
    pub fn generate(&self) -> Result<String, GenerateError> {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Runs one walk drawing every decision from `rng`. A seeded `rng` makes
    /// the result reproducible.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String, GenerateError> {
        Walk::new(self).run(rng)
    }

    /// Walks until one succeeds, up to `attempts` times.
    ///
    /// A non retryable error is returned at once. When every attempt fails the
    /// last error is returned.
    pub fn generate_retrying(&self, attempts: usize) -> Result<String, GenerateError> {
        self.generate_retrying_with(&mut rand::thread_rng(), attempts)
    }

    pub fn generate_retrying_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        attempts: usize,
    ) -> Result<String, GenerateError> {
        let mut attempt = 1;
        loop {
            match self.generate_with(rng) {
                Ok(s) => return Ok(s),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    trace!(attempt, %err, "retrying walk");
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

struct Walk<'g> {
    generator: &'g Generator,
    output: String,
    /// Capture positions visited so far, in order.
    captures: Vec<InstPtr>,
}

impl<'g> Walk<'g> {
    fn new(generator: &'g Generator) -> Walk<'g> {
        Walk {
            generator,
            output: String::new(),
            captures: vec![],
        }
    }

    fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<String, GenerateError> {
        let generator = self.generator;
        let prog = &generator.program;
        let max_captures = generator.bounds.max_captures();
        let mut pc = prog.start;

        for _ in 0..generator.config.max_steps {
            let inst = match prog.insts.get(pc) {
                Some(inst) => inst,
                None => return Err(self.dead(pc)),
            };
            match *inst {
                Inst::Char(InstChar { c, goto }) => {
                    self.output.push(c);
                    pc = goto;
                }
                Inst::Ranges(ref ranges) => {
                    match sampler::sample_rune(rng, &ranges.ranges) {
                        Some(c) => self.output.push(c),
                        None => return Err(self.dead(pc)),
                    }
                    pc = ranges.goto;
                }
                Inst::Split(InstSplit { goto1, goto2 }) => {
                    pc = branch::choose_path(rng, goto1, goto2, &self.captures);
                }
                Inst::Save(InstSave { goto, .. }) => {
                    self.captures.push(pc);
                    if max_captures.map_or(false, |max| self.captures.len() > max) {
                        trace!(pc, captures = self.captures.len(), "too many repeats");
                        return Err(GenerateError::TooManyRepeat {
                            partial: self.output,
                        });
                    }
                    // one real successor, offered as both candidates
                    pc = branch::choose_path(rng, goto, goto, &self.captures);
                }
                Inst::Match => {
                    if prog.slots > 2 && self.captures.len() < generator.bounds.min_captures() {
                        trace!(pc, captures = self.captures.len(), "too few repeats");
                        return Err(GenerateError::TooFewRepeat {
                            partial: self.output,
                        });
                    }
                    return Ok(self.output);
                }
                Inst::Fail => return Err(self.dead(pc)),
            }
        }
        trace!(steps = generator.config.max_steps, "step limit reached");
        Err(GenerateError::StepLimit {
            partial: self.output,
            steps: generator.config.max_steps,
        })
    }

    fn dead(&self, pc: InstPtr) -> GenerateError {
        warn!(pc, pattern = ?self.generator.pattern, "walk reached a dead instruction");
        GenerateError::Dead { pc }
    }
}

#[cfg(test)]
mod tests {
    use super::{Bounds, Generator, GeneratorConfig};
    use crate::automata::program::{Inst, InstChar, InstRanges, Program};
    use crate::errors::GenerateError;
    use crate::options::SyntaxOptions;
    use crate::regex::Regex;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn generator(pattern: &str) -> Generator {
        Generator::new(pattern, SyntaxOptions::default()).expect("should compile")
    }

    fn compiled(pattern: &str) -> Program {
        generator(pattern).program
    }

    fn assert_generates(pattern: &str) {
        let g = generator(pattern);
        let ours = Regex::new(pattern).expect("should compile");
        let reference = ::regex::Regex::new(&format!("^(?:{})$", pattern)).expect("valid regex");
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let s = g
                .generate_retrying_with(&mut rng, 100)
                .expect("should generate");
            assert!(reference.is_match(&s), "{:?} does not match {:?}", s, pattern);
            assert!(ours.is_match(&s), "{:?} does not match {:?}", s, pattern);
        }
    }

    #[test]
    fn generates_matching_strings() {
        for pattern in [
            "aaa",
            "a+",
            "abc*",
            "a|c",
            "(foo|bar){1,10}",
            "[a-zA-Z]{1,3}",
            "foo(bar)?buz",
            "[[:alpha:]]{4}",
            r"\d{3}-\d{4}",
            r"(?i)hello",
            "x(a|bc)*y",
            "[^a-y]{2}",
            "(a*)*b",
            "a{2,}",
        ] {
            assert_generates(pattern);
        }
    }

    #[test]
    fn literal_is_deterministic() {
        let g = generator("aaa");
        for _ in 0..20 {
            assert_eq!(g.generate(), Ok("aaa".to_string()));
        }
    }

    #[test]
    fn empty_language() {
        assert_eq!(generator("").generate(), Ok(String::new()));
        assert_eq!(generator("()?").generate(), Ok(String::new()));
    }

    #[test]
    fn alternatives_vary() {
        let g = generator("a|c");
        let mut rng = StdRng::seed_from_u64(3);
        let seen = (0..100)
            .map(|_| g.generate_with(&mut rng).expect("should generate"))
            .collect::<HashSet<_>>();
        assert_eq!(
            seen,
            ["a", "c"]
                .iter()
                .map(|s| s.to_string())
                .collect::<HashSet<_>>()
        );
    }

    #[test]
    fn counted_repeat_stays_in_range() {
        let g = generator("(foo|bar){1,10}");
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let s = g.generate_with(&mut rng).expect("should generate");
            assert_eq!(s.len() % 3, 0);
            assert!((1..=10).contains(&(s.len() / 3)), "{:?}", s);
        }
    }

    #[test]
    fn same_seed_same_output() {
        let g = generator(r"[a-z]{5,20}\d+");
        let a = g.generate_with(&mut StdRng::seed_from_u64(77));
        let b = g.generate_with(&mut StdRng::seed_from_u64(77));
        assert_eq!(a, b);
    }

    #[test]
    fn too_many_repeat() {
        let g = Generator::from_program(compiled("(a)(b)"), Bounds::new(0, Some(0)));
        let err = g.generate().expect_err("two groups exceed the bound");
        assert_eq!(
            err,
            GenerateError::TooManyRepeat {
                partial: "a".to_string()
            }
        );
        assert!(err.is_retryable());
        assert_eq!(err.partial(), Some("a"));
        assert_eq!(g.generate_retrying(5), Err(err));
    }

    #[test]
    fn nested_group_counts_twice() {
        // each pass through `(a(b))` visits four capture positions, so the
        // second pass runs over the bound of six
        let g = generator("(a(b)){1,2}");
        assert_eq!(g.bounds(), Bounds::new(1, Some(2)));
        let mut rng = StdRng::seed_from_u64(17);
        let outcomes = (0..200)
            .map(|_| g.generate_with(&mut rng))
            .collect::<HashSet<_>>();
        assert_eq!(
            outcomes,
            HashSet::from([
                Ok("ab".to_string()),
                Err(GenerateError::TooManyRepeat {
                    partial: "abab".to_string()
                }),
            ])
        );
    }

    #[test]
    fn sibling_groups_always_exceed_exact_repeat() {
        let g = generator("((a|b)(c|d)){2}");
        let check = Regex::new("[ab][cd]").expect("should compile");
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..100 {
            match g.generate_with(&mut rng) {
                Err(GenerateError::TooManyRepeat { partial }) => {
                    assert!(check.is_match(&partial), "{:?}", partial)
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        assert!(matches!(
            g.generate_retrying_with(&mut rng, 10),
            Err(GenerateError::TooManyRepeat { .. })
        ));
    }

    #[test]
    fn too_few_repeat() {
        let g = Generator::from_program(compiled("(a)"), Bounds::new(2, None));
        assert_eq!(
            g.generate(),
            Err(GenerateError::TooFewRepeat {
                partial: "a".to_string()
            })
        );
    }

    #[test]
    fn no_min_check_without_groups() {
        let g = Generator::from_program(compiled("a"), Bounds::new(5, None));
        assert_eq!(g.generate(), Ok("a".to_string()));
    }

    #[test]
    fn dead_instruction() {
        let g = generator(r"a[^\x00-\x{10FFFF}]");
        let err = g.generate().expect_err("class is empty");
        assert_eq!(err, GenerateError::Dead { pc: 1 });
        assert!(!err.is_retryable());
        assert_eq!(g.generate_retrying(100), Err(err));
    }

    #[test]
    fn malformed_program_is_dead() {
        let program = Program {
            insts: vec![
                Inst::Char(InstChar { c: 'a', goto: 7 }),
                Inst::Match,
            ],
            start: 0,
            slots: 2,
        };
        let g = Generator::from_program(program, Bounds::unbounded());
        assert_eq!(g.generate(), Err(GenerateError::Dead { pc: 7 }));

        let program = Program {
            insts: vec![
                Inst::Ranges(InstRanges {
                    ranges: vec![],
                    goto: 1,
                }),
                Inst::Match,
            ],
            start: 0,
            slots: 2,
        };
        let g = Generator::from_program(program, Bounds::unbounded());
        assert_eq!(g.generate(), Err(GenerateError::Dead { pc: 0 }));
    }

    #[test]
    fn step_limit() {
        let g = Generator::with_config(
            "aaa",
            SyntaxOptions::default(),
            GeneratorConfig {
                max_steps: 2,
                ..GeneratorConfig::default()
            },
        )
        .expect("should compile");
        assert_eq!(
            g.generate(),
            Err(GenerateError::StepLimit {
                partial: "aa".to_string(),
                steps: 2
            })
        );
    }

    #[test]
    fn options_change_the_language() {
        let g = Generator::new("a.b", SyntaxOptions::default().literal(true)).expect("should compile");
        assert_eq!(g.generate(), Ok("a.b".to_string()));

        let g = Generator::new("ab", SyntaxOptions::default().case_insensitive(true))
            .expect("should compile");
        let mut rng = StdRng::seed_from_u64(5);
        let seen = (0..200)
            .map(|_| g.generate_with(&mut rng).expect("should generate"))
            .collect::<HashSet<_>>();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn shared_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Generator>();

        let g = std::sync::Arc::new(generator("[0-9]{8}"));
        let handles = (0..4)
            .map(|_| {
                let g = g.clone();
                std::thread::spawn(move || g.generate().expect("should generate"))
            })
            .collect::<Vec<_>>();
        for h in handles {
            let s = h.join().expect("thread should finish");
            assert_eq!(s.len(), 8);
            assert!(s.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
