use super::error::{LexicalError, LexicalErrorType};
use super::token::{str_to_keyword, Token, TokenKind};
use crate::utils::prelude::{SourceRef, SrcSpan};

pub type LexResult = std::result::Result<Vec<Token>, LexicalError>;

/// The states of the character scanner. Each non-default state returns
/// to `Default` on its close condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Default,
    Number,
    String,
    Ident,
}

/// Tokenizes a whole source into a flat token sequence.
///
/// Fails only on a byte that is neither whitespace, digit, quote nor
/// printable-above-space. Everything else is deferred: number tokens
/// are not validated here and only fail at value decoding.
pub fn tokenize(src: &SourceRef) -> LexResult {
    Lexer::new(src.clone()).run()
}

#[derive(Debug)]
struct Lexer {
    src: SourceRef,
    state: LexState,
    token: Option<(TokenKind, u32)>,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(src: SourceRef) -> Self {
        Self {
            src,
            state: LexState::Default,
            token: None,
            tokens: vec![],
        }
    }

    fn run(mut self) -> LexResult {
        let mut prev: Option<char> = None;

        let src = self.src.clone();
        for (i, c) in src.text.char_indices() {
            let pos = i as u32;

            match self.state {
                LexState::Default => {
                    if c.is_ascii_digit() {
                        self.begin_token(LexState::Number, TokenKind::Number, pos);
                    } else if c.is_whitespace() {
                        // skipped
                    } else if c == '"' {
                        self.begin_token(LexState::String, TokenKind::String, pos);
                    } else if c > ' ' {
                        self.begin_token(LexState::Ident, TokenKind::Ident, pos);
                    } else {
                        return Err(LexicalError {
                            error: LexicalErrorType::UnrecognizedChar { ch: c },
                            location: SrcSpan::from(pos, pos + c.len_utf8() as u32),
                        });
                    }
                },
                LexState::Number => {
                    if !c.is_ascii_digit() && c != '.' {
                        self.end_token(pos);
                    }
                },
                LexState::Ident => {
                    if c.is_whitespace() {
                        self.end_token(pos);
                    }
                },
                LexState::String => {
                    if c == '"' && prev != Some('\\') {
                        self.end_token(pos + 1);
                    }
                }
            }

            prev = Some(c);
        }

        // end of input force-closes a dangling token
        if self.token.is_some() {
            self.end_token(src.text.len() as u32);
        }

        Ok(self.tokens)
    }

    fn begin_token(&mut self, state: LexState, kind: TokenKind, pos: u32) {
        self.state = state;
        self.token = Some((kind, pos));
    }

    fn end_token(&mut self, end_pos: u32) {
        if let Some((kind, start_pos)) = self.token.take() {
            let span = SrcSpan::from(start_pos, end_pos);
            let mut token = Token::new(kind, span, self.src.clone());

            // identifiers are reclassified at close time
            if kind == TokenKind::Ident {
                if let Some(keyword) = str_to_keyword(token.text()) {
                    token.kind = keyword;
                }
            }

            self.tokens.push(token);
        }

        self.state = LexState::Default;
    }
}
