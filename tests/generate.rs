use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regexfuzz::{Bounds, Error, GenerateError, Generator, Regex, SyntaxOptions};

fn reference(pattern: &str) -> regex::Regex {
    regex::Regex::new(&format!("^(?:{})$", pattern)).expect("valid regex")
}

fn check(pattern: &str, options: SyntaxOptions, runs: usize) {
    let gen = Generator::new(pattern, options).expect("should compile");
    let ours = Regex::with_options(pattern, options).expect("should compile");
    let reference = reference(pattern);
    let mut rng = StdRng::seed_from_u64(pattern.len() as u64);
    for _ in 0..runs {
        let s = gen
            .generate_retrying_with(&mut rng, 100)
            .expect("should generate");
        assert!(ours.is_match(&s), "{:?} does not match {:?}", s, pattern);
        if !options.literal {
            assert!(
                reference.is_match(&s),
                "{:?} does not match {:?}",
                s,
                pattern
            );
        }
    }
}

#[test]
fn outputs_match_their_pattern() {
    for pattern in [
        "aaa",
        "a+",
        "abc*",
        "a|c",
        "(foo|bar){1,10}",
        "[a-zA-Z]{1,3}",
        "foo(bar)?buz",
        "[[:alpha:]]{4}",
        r"[[:digit:][:upper:]]{2,5}",
        r"\w+@\w+\.(com|org)",
        r"(?P<year>\d{4})-(?P<month>\d{2})",
        r"^ab$",
        r"\Aab\z",
        r"(?s).{3}",
        r"[^\n]{1,4}",
        r"\x{1F600}+",
        r"(?i:ab)c",
    ] {
        check(pattern, SyntaxOptions::default(), 100);
    }
}

#[test]
fn posix_syntax() {
    check("[[:space:]x]+", SyntaxOptions::posix(), 50);
    let err = Generator::new(r"\d", SyntaxOptions::posix()).expect_err("perl class disabled");
    assert!(matches!(err, Error::Syntax(_)));
}

#[test]
fn literal_patterns() {
    let gen = Generator::new("(a|b)*", SyntaxOptions::default().literal(true))
        .expect("should compile");
    assert_eq!(gen.generate(), Ok("(a|b)*".to_string()));
}

#[test]
fn exact_repeat_length() {
    let gen = Generator::new("[[:alpha:]]{4}", SyntaxOptions::default()).expect("should compile");
    for _ in 0..50 {
        let s = gen.generate().expect("should generate");
        assert_eq!(s.chars().count(), 4);
        assert!(s.chars().all(|c| c.is_ascii_alphabetic()));
    }
}

#[test]
fn unbounded_repeat_grows() {
    let gen = Generator::new("a+", SyntaxOptions::default()).expect("should compile");
    let mut rng = StdRng::seed_from_u64(1);
    let longest = (0..500)
        .map(|_| gen.generate_with(&mut rng).expect("should generate").len())
        .max();
    assert!(longest > Some(1));
}

#[test]
fn syntax_errors() {
    for pattern in ["(ab", "ab)", "a**", "[b-a]", "a{5,2}", r"\q", "a^b", r"\bfoo"] {
        let err = Generator::new(pattern, SyntaxOptions::default())
            .expect_err(&format!("{:?} should not compile", pattern));
        assert!(matches!(err, Error::Syntax(_)), "{:?}: {}", pattern, err);
    }
}

#[test]
fn size_limit() {
    let config = regexfuzz::GeneratorConfig {
        size_limit: 10,
        ..Default::default()
    };
    let err = Generator::with_config("a{20}", SyntaxOptions::default(), config)
        .expect_err("program is too big");
    assert_eq!(err, Error::CompiledTooBig(10));
}

#[test]
fn retry_gives_up_with_last_error() {
    let gen = Generator::new("(a)(b)(c)", SyntaxOptions::default()).expect("should compile");
    assert_eq!(gen.generate(), Ok("abc".to_string()));

    // at most four capture positions, the third group is the fifth
    let tight = Generator::from_program(gen.program().clone(), Bounds::new(0, Some(1)));
    assert_eq!(
        tight.generate_retrying(3),
        Err(GenerateError::TooManyRepeat {
            partial: "ab".to_string()
        })
    );
}

#[test]
fn dead_end_is_not_retried() {
    let gen = Generator::new(r"x[^\x00-\x{10FFFF}]y", SyntaxOptions::default())
        .expect("should compile");
    let err = gen.generate_retrying(1000).expect_err("no string matches");
    assert!(matches!(err, GenerateError::Dead { .. }));
    assert!(!err.is_retryable());
    assert_eq!(err.partial(), None);
}

#[test]
fn dead_alternative_is_never_taken() {
    let gen = Generator::new(r"a|[^\x00-\x{10FFFF}]", SyntaxOptions::default())
        .expect("should compile");
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..100 {
        assert_eq!(gen.generate_retrying_with(&mut rng, 1), Ok("a".to_string()));
    }
    check(r"(x|[^\x00-\x{10FFFF}]y)+z", SyntaxOptions::default(), 50);
}

#[test]
fn case_folding_is_one_to_one() {
    // dotless i has an uppercase form but is not its lowercase
    let gen = Generator::new("(?i)ı", SyntaxOptions::default()).expect("should compile");
    for _ in 0..50 {
        assert_eq!(gen.generate(), Ok("ı".to_string()));
    }
    check("(?i)ı", SyntaxOptions::default(), 50);
    check("(?i)[ıK]", SyntaxOptions::default(), 100);
    check("(?i)[a-fı]{3}", SyntaxOptions::default(), 100);
}

#[test]
fn unicode_classes() {
    for pattern in [
        r"\pL{3}",
        r"\p{Greek}+",
        r"\PN{2}",
        r"[\p{Lu}\d]{1,4}",
        r"\p{^Greek}",
    ] {
        check(pattern, SyntaxOptions::default(), 100);
    }
    let err = Generator::new(r"\pL", SyntaxOptions::default().unicode_groups(false))
        .expect_err("unicode classes disabled");
    assert!(matches!(err, Error::Syntax(_)));
}
