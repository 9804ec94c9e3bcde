use super::prelude::{parse, FuncTable, ParseError, ParseErrorType};
use crate::lexer::prelude::TokenKind;
use crate::utils::prelude::Source;

fn table(text: &str) -> Result<FuncTable, ParseError> {
    parse(&Source::new("test.at", text), FuncTable::new())
}

#[test]
fn test_forward_reference() -> Result<(), ParseError> {
    let funcs = table("fn main is helper 1 fn helper x is x")?;

    assert!(funcs["main"].body.is_some());
    assert!(funcs["helper"].body.is_some());
    assert!(funcs.values().all(|func| func.deferred_start.is_none()));

    Ok(())
}

#[test]
fn test_mutual_recursion() -> Result<(), ParseError> {
    let input = "
        fn even n is if __eq n 0 true odd __add n __neg 1
        fn odd n is if __eq n 0 false even __add n __neg 1
    ";

    let funcs = table(input)?;

    assert_eq!(funcs.len(), 2);
    assert!(funcs["even"].body.is_some());
    assert!(funcs["odd"].body.is_some());

    Ok(())
}

#[test]
fn test_unknown_identifier() {
    let err = table("fn main is wibble").expect_err("unknown name rejected");

    assert_eq!(err.error, ParseErrorType::UnknownIdentifier {
        name: "wibble".to_string(),
    });
}

#[test]
fn test_expected_fn() {
    let err = table("main is 0").expect_err("stray tokens rejected");

    assert_eq!(err.error, ParseErrorType::ExpectedFn { got: TokenKind::Ident });
}

#[test]
fn test_expected_is() {
    let err = table("fn main 0").expect_err("signature without `is` rejected");

    assert_eq!(err.error, ParseErrorType::ExpectedIs);
}

#[test]
fn test_missing_if_branch() {
    let err = table("fn main is if true 1").expect_err("two-armed if rejected");

    assert_eq!(err.error, ParseErrorType::ExpectedIfFalsy);
}

#[test]
fn test_missing_if_branch_before_next_fn() {
    let err = table("fn main is if true 1 fn other is 0").expect_err("body cannot run into the next fn");

    assert_eq!(err.error, ParseErrorType::ExpectedIfFalsy);
}

#[test]
fn test_redefinition_overwrites() -> Result<(), ParseError> {
    let funcs = table("fn f is 1 fn f is 2 fn main is f")?;

    let body = funcs["f"].body.as_ref().expect("f is bound");

    assert_eq!(format!("{body}"), "2");

    Ok(())
}

#[test]
fn test_call_argument_order() -> Result<(), ParseError> {
    let funcs = table("fn three a b c is c fn main is three 1 2 3")?;

    let body = funcs["main"].body.as_ref().expect("main is bound");

    assert_eq!(format!("{body}"), "three 1 2 3");

    Ok(())
}

#[test]
fn test_input_prompt_is_optional() -> Result<(), ParseError> {
    let funcs = table("fn ask q is __input q fn main is __print __input")?;

    assert_eq!(format!("{}", funcs["ask"]), "fn ask q is __input q");
    assert_eq!(
        format!("{}", funcs["main"].body.as_ref().expect("main is bound")),
        "__print __input"
    );

    Ok(())
}

#[test]
fn test_parse_extends_base_table() -> Result<(), ParseError> {
    let base = table("fn twice x is __mul 2 x")?;

    let funcs = parse(&Source::new("prog.at", "fn main is twice 21"), base)?;

    assert_eq!(funcs.len(), 2);
    assert_eq!(
        format!("{}", funcs["main"].body.as_ref().expect("main is bound")),
        "twice 21"
    );

    Ok(())
}
