use std::collections::HashMap;
use std::fmt::Display;

use crate::lexer::prelude::{Token, TokenKind};

/// A node in the abstract syntax tree.
///
/// Shapes are operator-specific: unary operators use `left` only,
/// binary operators use both children, a call threads its arguments
/// through a chain of token-less holders in `left` (argument in each
/// holder's `right`), and `if` packages its two branches in a synthetic
/// token-less node stored in `right`.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub token: Option<Token>,
    pub left: Option<Box<AstNode>>,
    pub right: Option<Box<AstNode>>,
}

impl AstNode {
    pub fn leaf(token: Token) -> Self {
        Self { token: Some(token), left: None, right: None }
    }

    pub fn unary(token: Token, left: AstNode) -> Self {
        Self {
            token: Some(token),
            left: Some(Box::new(left)),
            right: None,
        }
    }

    pub fn binary(token: Token, left: AstNode, right: AstNode) -> Self {
        Self {
            token: Some(token),
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    /// A token-less branch holder, used by `if`.
    pub fn synthetic(left: AstNode, right: AstNode) -> Self {
        Self {
            token: None,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }
}

impl Display for AstNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(TokenKind::Call) = self.token.as_ref().map(|t| t.kind) {
            write!(f, "{}", self.token.as_ref().map(|t| t.text()).unwrap_or_default())?;

            let mut holder = self.left.as_deref();
            while let Some(node) = holder {
                if let Some(arg) = node.right.as_deref() {
                    write!(f, " {}", arg)?;
                }
                holder = node.left.as_deref();
            }

            return Ok(());
        }

        let mut separate = false;

        if let Some(token) = &self.token {
            write!(f, "{}", token.text())?;
            separate = true;
        }

        if let Some(left) = &self.left {
            if separate {
                write!(f, " ")?;
            }
            write!(f, "{left}")?;
            separate = true;
        }

        if let Some(right) = &self.right {
            if separate {
                write!(f, " ")?;
            }
            write!(f, "{right}")?;
        }

        Ok(())
    }
}

/// A parsed function: fixed arity, single scope, immutable once its
/// body has been bound in the parser's second pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Func {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Option<AstNode>,
    /// Token index of the body start, recorded during signature
    /// discovery and cleared once the body is parsed.
    pub deferred_start: Option<usize>,
}

impl Func {
    pub fn new(name: Token) -> Self {
        Self {
            name,
            params: vec![],
            body: None,
            deferred_start: None,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Position of a parameter by name, if this function declares it.
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.text() == name)
    }
}

impl Display for Func {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fn {}", self.name.text())?;

        for param in &self.params {
            write!(f, " {}", param.text())?;
        }

        write!(f, " is ")?;

        match &self.body {
            Some(body) => write!(f, "{body}"),
            None => write!(f, "<unbound>"),
        }
    }
}

/// All functions visible to a program, keyed by name. A program's table
/// is seeded with the corelib base and then extended (or shadowed) by
/// the program's own definitions.
pub type FuncTable = HashMap<String, Func>;
