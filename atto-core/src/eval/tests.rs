use std::io::Cursor;

use super::prelude::{EvalError, Evaluator, RuntimeError, RuntimeErrorType, MAX_TRACEBACK_FRAMES};
use crate::interpreter::corelib_table;
use crate::parser::prelude::parse;
use crate::utils::prelude::Source;

fn run_with_input(text: &str, input: &str) -> (Result<i32, EvalError>, String) {
    let src = Source::new("test.at", text);
    let funcs = parse(&src, corelib_table().clone()).expect("program parses");

    let mut output = Vec::new();
    let result = Evaluator::new(&funcs, Cursor::new(input.to_string()), &mut output).run();

    (result, String::from_utf8(output).expect("output is utf8"))
}

fn run(text: &str) -> (Result<i32, EvalError>, String) {
    run_with_input(text, "")
}

fn runtime_error(text: &str) -> RuntimeError {
    match run(text).0 {
        Err(EvalError::Runtime(error)) => error,
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

#[test]
fn test_hello_world() {
    let (result, output) = run(r#"fn main is __print "Hello, world!""#);

    assert_eq!(result, Ok(0));
    assert_eq!(output, "Hello, world!\n");
}

#[test]
fn test_exit_codes() {
    assert_eq!(run("fn main is 42").0, Ok(42));
    assert_eq!(run("fn main is __neg 3").0, Ok(-3));
    assert_eq!(run(r#"fn main is "12.9""#).0, Ok(12));
    assert_eq!(run(r#"fn main is "not a code""#).0, Ok(0));
    assert_eq!(run("fn main is null").0, Ok(0));
    assert_eq!(run("fn main is true").0, Ok(0));
}

#[test]
fn test_arithmetic() {
    let (result, output) = run("fn main is __print __add 1 __mul 2 3");

    assert_eq!(result, Ok(0));
    assert_eq!(output, "7\n");
}

#[test]
fn test_corelib_aliases() {
    let (result, output) = run(r#"fn main is print str + 1 2"#);

    assert_eq!(result, Ok(0));
    assert_eq!(output, "3\n");
}

#[test]
fn test_string_concatenation() {
    let (_, output) = run(r#"fn main is __print __add "foo" "bar""#);

    assert_eq!(output, "foobar\n");
}

#[test]
fn test_if_evaluates_one_branch() {
    // the untaken branch would divide by zero
    assert_eq!(run("fn main is if true 1 __div 1 0").0, Ok(1));
    assert_eq!(run("fn main is if false __div 1 0 2").0, Ok(2));
}

#[test]
fn test_truthiness() {
    assert_eq!(run("fn main is if 0 1 2").0, Ok(2));
    assert_eq!(run("fn main is if null 1 2").0, Ok(2));
    assert_eq!(run("fn main is if false 1 2").0, Ok(2));
    // everything else is truthy, the empty string included
    assert_eq!(run(r#"fn main is if "" 1 2"#).0, Ok(1));
    assert_eq!(run("fn main is if __pair 0 0 1 2").0, Ok(1));
}

#[test]
fn test_division_by_zero() {
    assert_eq!(runtime_error("fn main is __div 1 0").error, RuntimeErrorType::DivisionByZero);
    assert_eq!(runtime_error("fn main is __rem 1 0").error, RuntimeErrorType::DivisionByZero);
    assert_eq!(runtime_error("fn main is __inv 0").error, RuntimeErrorType::DivisionByZero);
}

#[test]
fn test_structural_equality() {
    assert_eq!(run("fn main is if __eq __pair 1 2 __pair 1 2 10 20").0, Ok(10));
    assert_eq!(run(r#"fn main is if __eq 1 "1" 10 20"#).0, Ok(20));
    assert_eq!(run("fn main is if __eq null null 10 20").0, Ok(10));
}

#[test]
fn test_pair_head_tail() {
    assert_eq!(run("fn main is __print __head __pair 1 2").1, "1\n");
    assert_eq!(run("fn main is __print __tail __pair 1 2").1, "2\n");
    assert_eq!(run(r#"fn main is __print __head "abc""#).1, "a\n");
    assert_eq!(run(r#"fn main is __print __tail "abc""#).1, "bc\n");
}

#[test]
fn test_head_tail_fall_through_to_null() {
    // tail of a single element, and head of anything non-indexable
    assert_eq!(run(r#"fn main is if __eq __tail "x" null 1 2"#).0, Ok(1));
    assert_eq!(run("fn main is if __eq __head 5 null 1 2").0, Ok(1));
    assert_eq!(run("fn main is if __eq __tail true null 1 2").0, Ok(1));
}

#[test]
fn test_fuse() {
    assert_eq!(run("fn main is __print __fuse __pair 1 2 __pair 3 4").1, "1 2 3 4\n");
    assert_eq!(run("fn main is __print __fuse 0 __pair 1 2").1, "0 1 2\n");
    assert_eq!(run("fn main is __print __fuse __pair 1 2 3").1, "1 2 3\n");
    assert_eq!(run("fn main is __print __fuse 1 2").1, "1 2\n");
}

#[test]
fn test_litr_and_str() {
    assert_eq!(run(r#"fn main is __print __litr "3.5""#).1, "3.5\n");
    assert_eq!(run("fn main is __print __str 42").1, "42\n");
    assert_eq!(run(r#"fn main is __print __add __str 4 __str 2"#).1, "42\n");

    assert_eq!(
        runtime_error(r#"fn main is __litr "nope""#).error,
        RuntimeErrorType::NotANumber { text: "nope".to_string() }
    );
}

#[test]
fn test_malformed_number_fails_at_decode() {
    assert_eq!(
        runtime_error("fn main is 1.2.3").error,
        RuntimeErrorType::NotANumber { text: "1.2.3".to_string() }
    );
}

#[test]
fn test_words() {
    assert_eq!(run(r#"fn main is __print __words "a b  c""#).1, "a b c\n");

    let error = runtime_error("fn main is __words 5").error;
    assert!(matches!(error, RuntimeErrorType::InvalidOperand { op: "__words", .. }));
}

#[test]
fn test_input_echo() {
    let (result, output) = run_with_input("fn main is __print __input", "hi\n");

    assert_eq!(result, Ok(0));
    assert_eq!(output, "hi\n");
}

#[test]
fn test_input_prompt() {
    let input = r#"
        fn ask q is __input q
        fn main is __print ask "? "
    "#;

    let (result, output) = run_with_input(input, "hi\n");

    assert_eq!(result, Ok(0));
    assert_eq!(output, "? hi\n");
}

#[test]
fn test_recursive_count() {
    let input = "
        fn count_to n is if __eq n 300 n count_to __add n 1
        fn main is count_to 0
    ";

    assert_eq!(run(input).0, Ok(300));
}

#[test]
fn test_missing_entry_point() {
    let (result, _) = run("fn id x is x");

    assert_eq!(result, Err(EvalError::MissingEntryPoint));
}

#[test]
fn test_traceback_innermost_first() {
    let input = r#"
        fn boom x is __litr x
        fn mid x is boom x
        fn main is mid "a"
    "#;

    let error = runtime_error(input);

    assert_eq!(error.error, RuntimeErrorType::NotANumber { text: "a".to_string() });

    assert_eq!(error.trace.frames.len(), 2);
    assert_eq!(error.trace.frames[0].call, "boom");
    assert_eq!(error.trace.frames[0].within, "mid");
    assert_eq!(error.trace.frames[1].call, "mid");
    assert_eq!(error.trace.frames[1].within, "main");
    assert!(!error.trace.truncated);
}

#[test]
fn test_traceback_truncation() {
    let input = "
        fn down n is if __eq n 0 __div 1 0 down __add n __neg 1
        fn main is down 20
    ";

    let error = runtime_error(input);

    assert_eq!(error.error, RuntimeErrorType::DivisionByZero);
    assert_eq!(error.trace.frames.len(), MAX_TRACEBACK_FRAMES);
    assert!(error.trace.truncated);
    assert_eq!(error.trace.render().last().map(String::as_str), Some("..."));
}

#[test]
fn test_operand_type_mismatch() {
    let error = runtime_error(r#"fn main is __add 1 "one""#).error;

    assert!(matches!(error, RuntimeErrorType::InvalidOperands { op: "__add", .. }));
}
