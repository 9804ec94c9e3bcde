use super::prelude::{tokenize, LexicalErrorType, TokenKind};
use crate::utils::prelude::Source;

fn kinds(text: &str) -> Vec<TokenKind> {
    tokenize(&Source::new("test.at", text))
        .expect("input lexes")
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_function_tokens() {
    let input = "fn add x y is __add x y";

    assert_eq!(kinds(input), vec![
        TokenKind::Fn,
        TokenKind::Ident,
        TokenKind::Ident,
        TokenKind::Ident,
        TokenKind::Is,
        TokenKind::Add,
        TokenKind::Ident,
        TokenKind::Ident,
    ]);
}

#[test]
fn test_keyword_reclassification() {
    let input = "if true false null __head __tail __input __print";

    assert_eq!(kinds(input), vec![
        TokenKind::If,
        TokenKind::True,
        TokenKind::False,
        TokenKind::Null,
        TokenKind::Head,
        TokenKind::Tail,
        TokenKind::In,
        TokenKind::Out,
    ]);
}

#[test]
fn test_almost_keywords_stay_identifiers() {
    // only exact matches reclassify
    let input = "iff truee __addx fnord";

    assert_eq!(kinds(input), vec![
        TokenKind::Ident,
        TokenKind::Ident,
        TokenKind::Ident,
        TokenKind::Ident,
    ]);
}

#[test]
fn test_string_with_escaped_quotes() {
    let input = r#""say \"hi\" now""#;

    let tokens = tokenize(&Source::new("test.at", input)).expect("input lexes");

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text(), input);
    assert_eq!(tokens[0].string_content(), r#"say \"hi\" now"#);
}

#[test]
fn test_dangling_string_closes_at_eof() {
    let tokens = tokenize(&Source::new("test.at", r#""unterminated"#)).expect("input lexes");

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].string_content(), "unterminated");
}

#[test]
fn test_number_shapes() {
    let tokens = tokenize(&Source::new("test.at", "3.14 1.2.3 007")).expect("input lexes");

    assert_eq!(
        tokens.iter().map(|token| token.kind).collect::<Vec<_>>(),
        vec![TokenKind::Number, TokenKind::Number, TokenKind::Number]
    );

    // malformed literals lex fine and only fail at decoding
    assert_eq!(tokens[0].number().expect("valid literal"), 3.14);
    assert!(tokens[1].number().is_err());
    assert_eq!(tokens[2].number().expect("valid literal"), 7.0);
}

#[test]
fn test_number_ends_at_identifier() {
    assert_eq!(kinds("10x"), vec![TokenKind::Number, TokenKind::Ident]);
}

#[test]
fn test_unrecognized_char() {
    let err = tokenize(&Source::new("test.at", "\u{1}")).expect_err("control byte rejected");

    assert_eq!(err.error, LexicalErrorType::UnrecognizedChar { ch: '\u{1}' });
    assert_eq!(err.location.start, 0);
}

#[test]
fn test_line_col() {
    let tokens = tokenize(&Source::new("test.at", "fn main is\n  0")).expect("input lexes");

    let number = tokens.last().expect("has tokens");

    assert_eq!(number.kind, TokenKind::Number);
    assert_eq!(number.line_col(), (2, 2));
}
