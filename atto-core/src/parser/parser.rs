use crate::{
    lexer::prelude::{tokenize, Token, TokenKind},
    utils::prelude::{SourceRef, SrcSpan},
};
use super::ast::{AstNode, Func, FuncTable};
use super::error::{ParseError, ParseErrorType};

/// Parses a whole source on top of an existing function table (empty,
/// or the corelib base) and returns the extended table.
///
/// Parsing is two-phase: pass 1 discovers every signature and records
/// each body's token range without interpreting it; pass 2 parses the
/// bodies against the completed table, which is what permits forward
/// references and mutual recursion.
pub fn parse(src: &SourceRef, funcs: FuncTable) -> Result<FuncTable, ParseError> {
    let tokens = tokenize(src).map_err(|error| ParseError {
        span: error.location,
        error: ParseErrorType::LexError { error },
    })?;

    let mut parser = Parser::new(tokens, funcs);
    parser.parse_signatures()?;
    parser.bind_bodies()?;

    Ok(parser.funcs)
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    pub funcs: FuncTable,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, funcs: FuncTable) -> Self {
        Self { tokens, pos: 0, funcs }
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();

        if token.is_some() {
            self.pos += 1;
        }

        token
    }

    fn back(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// The zero-width span just past the last token, for end-of-input
    /// errors.
    fn eof_span(&self) -> SrcSpan {
        match self.tokens.last() {
            Some(token) => SrcSpan::from(token.span.end, token.span.end),
            None => SrcSpan::from(0, 0),
        }
    }

    fn expect_ident(&mut self) -> Result<Token, ParseError> {
        match self.next() {
            Some(token) if token.is_kind(TokenKind::Ident) => Ok(token),
            Some(token) => Err(ParseError {
                error: ParseErrorType::ExpectedIdent,
                span: token.span,
            }),
            None => Err(ParseError {
                error: ParseErrorType::UnexpectedEof,
                span: self.eof_span(),
            }),
        }
    }

    /// Pass 1: signature discovery. End of input terminates the loop
    /// normally.
    pub fn parse_signatures(&mut self) -> Result<(), ParseError> {
        while let Some(token) = self.next() {
            if !token.is_kind(TokenKind::Fn) {
                return Err(ParseError {
                    error: ParseErrorType::ExpectedFn { got: token.kind },
                    span: token.span,
                });
            }

            self.parse_signature()?;
        }

        Ok(())
    }

    fn parse_signature(&mut self) -> Result<(), ParseError> {
        let mut func = Func::new(self.expect_ident()?);

        while let Some(token) = self.next() {
            if token.is_kind(TokenKind::Ident) {
                func.params.push(token);
            } else {
                self.back();
                break;
            }
        }

        match self.next() {
            Some(token) if token.is_kind(TokenKind::Is) => {},
            Some(token) => {
                return Err(ParseError {
                    error: ParseErrorType::ExpectedIs,
                    span: token.span,
                })
            },
            None => {
                // point at the last token of the broken signature
                let last = func.params.last().unwrap_or(&func.name);

                return Err(ParseError {
                    error: ParseErrorType::ExpectedIs,
                    span: last.span,
                });
            }
        }

        func.deferred_start = Some(self.pos);
        self.skip_body();

        // redefinition overwrites, last one wins; this is how a program
        // shadows a corelib alias
        self.funcs.insert(func.name.text().to_string(), func);

        Ok(())
    }

    /// Scans forward to the next `fn` or end of input without
    /// interpreting the body tokens.
    fn skip_body(&mut self) {
        while let Some(token) = self.next() {
            if token.is_kind(TokenKind::Fn) {
                self.back();
                break;
            }
        }
    }

    /// Pass 2: late binding. Reseats the cursor on every deferred body
    /// and parses exactly one expression per function.
    pub fn bind_bodies(&mut self) -> Result<(), ParseError> {
        let mut names = self.funcs.keys().cloned().collect::<Vec<String>>();
        names.sort();

        for name in names {
            let (start, params) = match self.funcs.get(&name) {
                Some(func) => match func.deferred_start {
                    Some(start) => (start, func.params.clone()),
                    // already bound, came in with the base table
                    None => continue,
                },
                None => continue,
            };

            self.pos = start;
            let body = self.parse_expr(&params)?;

            if let Some(func) = self.funcs.get_mut(&name) {
                func.body = Some(body);
                func.deferred_start = None;
            }
        }

        Ok(())
    }

    /// One token dispatches the whole production. `params` is the
    /// enclosing function's parameter list, passed explicitly.
    fn parse_expr(&mut self, params: &[Token]) -> Result<AstNode, ParseError> {
        let token = match self.next() {
            Some(token) => token,
            None => {
                return Err(ParseError {
                    error: ParseErrorType::ExpectedExpression,
                    span: self.eof_span(),
                })
            }
        };

        match token.kind {
            // ran off the end of the enclosing body
            TokenKind::Fn => {
                self.back();

                Err(ParseError {
                    error: ParseErrorType::ExpectedExpression,
                    span: token.span,
                })
            },
            TokenKind::Ident => {
                if params.iter().any(|p| p.text() == token.text()) {
                    Ok(AstNode::leaf(token))
                } else if self.funcs.contains_key(token.text()) {
                    self.parse_call(token, params)
                } else {
                    Err(ParseError {
                        error: ParseErrorType::UnknownIdentifier {
                            name: token.text().to_string(),
                        },
                        span: token.span,
                    })
                }
            },
            TokenKind::Number
            | TokenKind::String
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => Ok(AstNode::leaf(token)),
            TokenKind::If => self.parse_if(token, params),
            TokenKind::Neg
            | TokenKind::Inv
            | TokenKind::Head
            | TokenKind::Tail
            | TokenKind::Litr
            | TokenKind::Str
            | TokenKind::Words
            | TokenKind::Out => {
                let operand = self.parse_expr(params)?;

                Ok(AstNode::unary(token, operand))
            },
            TokenKind::Add
            | TokenKind::Mul
            | TokenKind::Div
            | TokenKind::Rem
            | TokenKind::Eq
            | TokenKind::Less
            | TokenKind::Pair
            | TokenKind::Fuse => {
                let left = self.parse_expr(params)?;
                let right = self.parse_expr(params)?;

                Ok(AstNode::binary(token, left, right))
            },
            TokenKind::In => {
                // optional prompt; only a parameter identifier qualifies
                let has_prompt = matches!(
                    self.peek(),
                    Some(next) if next.is_kind(TokenKind::Ident)
                        && params.iter().any(|p| p.text() == next.text())
                );

                match has_prompt.then(|| self.next()).flatten() {
                    Some(prompt) => Ok(AstNode::unary(token, AstNode::leaf(prompt))),
                    None => Ok(AstNode::leaf(token)),
                }
            },
            _ => Err(ParseError {
                error: ParseErrorType::UnexpectedToken { token: token.kind },
                span: token.span,
            }),
        }
    }

    fn parse_if(&mut self, token: Token, params: &[Token]) -> Result<AstNode, ParseError> {
        let condition = self
            .parse_expr(params)
            .map_err(|err| err.at_missing(ParseErrorType::ExpectedIfCondition, token.span))?;
        let truthy = self
            .parse_expr(params)
            .map_err(|err| err.at_missing(ParseErrorType::ExpectedIfTruthy, token.span))?;
        let falsy = self
            .parse_expr(params)
            .map_err(|err| err.at_missing(ParseErrorType::ExpectedIfFalsy, token.span))?;

        Ok(AstNode::binary(token, condition, AstNode::synthetic(truthy, falsy)))
    }

    /// Grabs exactly as many argument expressions as the callee has
    /// parameters and threads them into a right-holding chain.
    fn parse_call(&mut self, token: Token, params: &[Token]) -> Result<AstNode, ParseError> {
        let arity = self
            .funcs
            .get(token.text())
            .map(Func::arity)
            .unwrap_or_default();

        let mut args = Vec::with_capacity(arity);
        for _ in 0..arity {
            args.push(self.parse_expr(params)?);
        }

        let mut token = token;
        token.kind = TokenKind::Call;
        let mut node = AstNode::leaf(token);

        let mut chain: Option<Box<AstNode>> = None;
        for arg in args.into_iter().rev() {
            chain = Some(Box::new(AstNode {
                token: None,
                left: chain,
                right: Some(Box::new(arg)),
            }));
        }
        node.left = chain;

        Ok(node)
    }
}
