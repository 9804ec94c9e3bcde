use crate::utils::prelude::{SourceRef, SrcSpan};

/// Reclassification table applied when an identifier token is closed.
///
/// Anything not listed here stays a generic identifier (a user function
/// name or a parameter name).
pub fn str_to_keyword(word: &str) -> Option<TokenKind> {
    Some(match word {
        "fn" => TokenKind::Fn,
        "is" => TokenKind::Is,
        "if" => TokenKind::If,

        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,

        "__add" => TokenKind::Add,
        "__neg" => TokenKind::Neg,
        "__mul" => TokenKind::Mul,
        "__div" => TokenKind::Div,
        "__inv" => TokenKind::Inv,
        "__rem" => TokenKind::Rem,

        "__eq" => TokenKind::Eq,
        "__lt" => TokenKind::Less,

        "__head" => TokenKind::Head,
        "__tail" => TokenKind::Tail,
        "__pair" => TokenKind::Pair,
        "__fuse" => TokenKind::Fuse,

        "__litr" => TokenKind::Litr,
        "__str" => TokenKind::Str,
        "__words" => TokenKind::Words,

        "__input" => TokenKind::In,
        "__print" => TokenKind::Out,

        _ => return None
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structure
    Fn,
    Is,

    // Identifiers (function names, parameter names)
    Ident,

    // Literals
    Number,
    String,
    True,
    False,
    Null,

    // Flow control
    If,

    // Arithmetic
    Add,
    Neg,
    Mul,
    Div,
    Inv,
    Rem,

    // Comparison
    Eq,
    Less,

    // List manipulation
    Head,
    Tail,
    Pair,
    Fuse,

    // String manipulation
    Litr,
    Str,
    Words,

    // I/O
    In,
    Out,

    // Assigned by the parser when an identifier resolves to a function
    Call,
}

impl TokenKind {
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Fn => "`fn`",
            TokenKind::Is => "`is`",
            TokenKind::Ident => "an identifier",
            TokenKind::Number => "a number",
            TokenKind::String => "a string",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::Null => "`null`",
            TokenKind::If => "`if`",
            TokenKind::Add => "`__add`",
            TokenKind::Neg => "`__neg`",
            TokenKind::Mul => "`__mul`",
            TokenKind::Div => "`__div`",
            TokenKind::Inv => "`__inv`",
            TokenKind::Rem => "`__rem`",
            TokenKind::Eq => "`__eq`",
            TokenKind::Less => "`__lt`",
            TokenKind::Head => "`__head`",
            TokenKind::Tail => "`__tail`",
            TokenKind::Pair => "`__pair`",
            TokenKind::Fuse => "`__fuse`",
            TokenKind::Litr => "`__litr`",
            TokenKind::Str => "`__str`",
            TokenKind::Words => "`__words`",
            TokenKind::In => "`__input`",
            TokenKind::Out => "`__print`",
            TokenKind::Call => "a call",
        }
    }
}

/// One lexical token. The token owns a handle to its source so its text
/// and position can be recovered on demand; nothing is decoded at lex
/// time.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: SrcSpan,
    pub src: SourceRef,
}

impl Token {
    pub fn new(kind: TokenKind, span: SrcSpan, src: SourceRef) -> Self {
        Self { kind, span, src }
    }

    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// The raw source text covered by this token.
    pub fn text(&self) -> &str {
        &self.src.text[self.span.start as usize..self.span.end as usize]
    }

    /// Decodes a `Number` token. Malformed literals (e.g. `1.2.3`) are
    /// accepted by the lexer and only fail here.
    pub fn number(&self) -> Result<f64, std::num::ParseFloatError> {
        self.text().parse::<f64>()
    }

    /// The content of a `String` token with the surrounding quotes
    /// stripped. Escapes are kept as written.
    pub fn string_content(&self) -> &str {
        let text = self.text();
        let text = text.strip_prefix('"').unwrap_or(text);
        text.strip_suffix('"').unwrap_or(text)
    }

    /// Line and column of the token start, recomputed from the source.
    pub fn line_col(&self) -> (usize, usize) {
        self.src.line_col(self.span.start)
    }
}
