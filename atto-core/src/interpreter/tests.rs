use std::io::Cursor;
use std::path::PathBuf;

use super::{corelib_table, Interpreter};
use crate::utils::prelude::Error;

#[test]
fn test_corelib_is_fully_bound() {
    let table = corelib_table();

    for name in [
        "print", "input", "words", "litr", "str",
        "+", "-", "neg", "*", "/", "%", "inv",
        "not", "=", "!=", "<", ">", "<=", ">=",
        "head", "tail", "pair", "fuse",
    ] {
        let func = table.get(name).unwrap_or_else(|| panic!("corelib defines `{name}`"));

        assert!(func.body.is_some(), "`{name}` has a bound body");
        assert!(func.deferred_start.is_none());
    }
}

#[test]
fn test_exit_code() {
    let result = Interpreter::new().run_source(PathBuf::from("test.at"), "fn main is 42".into());

    assert_eq!(result, Ok(42));
}

#[test]
fn test_missing_main() {
    let result = Interpreter::new().run_source(PathBuf::from("test.at"), "fn id x is x".into());

    assert!(matches!(result, Err(Error::MissingEntryPoint { .. })));
}

#[test]
fn test_parse_error_is_reported() {
    let result = Interpreter::new().run_source(PathBuf::from("test.at"), "fn main is wibble".into());

    let err = match result {
        Err(err @ Error::Parse { .. }) => err,
        other => panic!("expected a parse error, got {other:?}"),
    };

    let rendered = err.pretty_string();

    assert!(rendered.contains("Syntax error"));
    assert!(rendered.contains("wibble"));
}

#[test]
fn test_program_shadows_corelib() {
    // last definition wins, even over a corelib alias
    let text = "fn print x is 7 fn main is print 1".to_string();
    let result = Interpreter::new().run_source(PathBuf::from("test.at"), text);

    assert_eq!(result, Ok(7));
}

#[test]
fn test_without_corelib() {
    let text = "fn main is print 1".to_string();
    let result = Interpreter::without_corelib().run_source(PathBuf::from("test.at"), text);

    assert!(matches!(result, Err(Error::Parse { .. })));
}

#[test]
fn test_run_reader() {
    let reader = Cursor::new("fn main is 5");
    let result = Interpreter::new().run_reader(PathBuf::from("<stdin>"), reader);

    assert_eq!(result, Ok(5));
}
