use crate::{lexer::prelude::{LexicalError, TokenKind}, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    UnexpectedEof,
    ExpectedIdent,
    ExpectedFn { got: TokenKind },
    ExpectedIs,
    ExpectedExpression,
    ExpectedIfCondition,
    ExpectedIfTruthy,
    ExpectedIfFalsy,
    UnknownIdentifier { name: String },
    UnexpectedToken { token: TokenKind },
    LexError { error: LexicalError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

impl ParseError {
    /// Re-labels a ran-out-of-body error with a structural one, keeping
    /// anything more specific intact.
    pub fn at_missing(self, error: ParseErrorType, span: SrcSpan) -> Self {
        match self.error {
            ParseErrorType::ExpectedExpression
            | ParseErrorType::UnexpectedEof => ParseError { error, span },
            _ => self,
        }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::UnexpectedEof => ("Unexpected end of file", vec![]),
            ParseErrorType::ExpectedIdent => ("Expected an identifier", vec![]),
            ParseErrorType::ExpectedFn { got } => {
                ("Expected `fn`", vec![format!("Found {}", got.describe())])
            },
            ParseErrorType::ExpectedIs => ("Expected `is` after the function signature", vec![]),
            ParseErrorType::ExpectedExpression => ("Expected an expression", vec![]),
            ParseErrorType::ExpectedIfCondition => ("This `if` is missing its condition", vec![]),
            ParseErrorType::ExpectedIfTruthy => ("This `if` is missing its first branch", vec![]),
            ParseErrorType::ExpectedIfFalsy => ("This `if` is missing its second branch", vec![]),
            ParseErrorType::UnknownIdentifier { name } => {
                ("Unknown identifier", vec![format!(
                    "`{name}` is neither a parameter of the enclosing function nor a known function"
                )])
            },
            ParseErrorType::UnexpectedToken { token } => {
                ("Expected an expression", vec![format!("Found {}", token.describe())])
            },
            ParseErrorType::LexError { error } => error.details()
        }
    }
}
