use std::path::PathBuf;

use crate::lexer::prelude::TokenKind;
use crate::utils::prelude::{SourceRef, SrcSpan};
use super::frame::Frame;
use super::value::ValueType;

/// How many call sites a rendered traceback keeps before the ellipsis.
pub const MAX_TRACEBACK_FRAMES: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeErrorType {
    InvalidOperands {
        op: &'static str,
        expected: &'static str,
        left: ValueType,
        right: ValueType,
    },
    InvalidOperand {
        op: &'static str,
        expected: &'static str,
        got: ValueType,
    },
    DivisionByZero,
    NotANumber { text: String },
    UnboundParameter { name: String },
    UnknownFunction { name: String },
    UnboundBody { name: String },
    UnhandledNode { kind: Option<TokenKind> },
    Io { err: std::io::ErrorKind },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub src: SourceRef,
    pub span: SrcSpan,
    pub trace: Traceback,
}

impl RuntimeError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            RuntimeErrorType::InvalidOperands { op, expected, left, right } => {
                ("Operand type mismatch", vec![format!(
                    "`{op}` expects {expected}, got `{left}` and `{right}`"
                )])
            },
            RuntimeErrorType::InvalidOperand { op, expected, got } => {
                ("Operand type mismatch", vec![format!(
                    "`{op}` expects {expected}, got `{got}`"
                )])
            },
            RuntimeErrorType::DivisionByZero => ("Division by zero", vec![]),
            RuntimeErrorType::NotANumber { text } => {
                ("Invalid number", vec![format!("`{text}` cannot be converted to a number")])
            },
            RuntimeErrorType::UnboundParameter { name } => {
                ("Unbound parameter", vec![format!("`{name}` has no argument in this call")])
            },
            RuntimeErrorType::UnknownFunction { name } => {
                ("Unknown function", vec![format!("`{name}` is not in the function table")])
            },
            RuntimeErrorType::UnboundBody { name } => {
                ("Unbound function body", vec![format!("`{name}` has no parsed body")])
            },
            RuntimeErrorType::UnhandledNode { kind } => {
                let found = match kind {
                    Some(kind) => format!("Found {}", kind.describe()),
                    None => "Found a synthetic node".to_string(),
                };

                ("Unhandled node", vec![found])
            },
            RuntimeErrorType::Io { err } => {
                ("IO failed during evaluation", vec![format!("{err}")])
            }
        }
    }
}

/// One rendered level of the call chain.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceFrame {
    pub call: String,
    pub within: String,
    pub path: PathBuf,
    pub line: usize,
    pub col: usize,
}

/// An owned snapshot of the live frame chain, captured at the point of
/// failure so the error can outlive the frames themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct Traceback {
    pub frames: Vec<TraceFrame>,
    pub truncated: bool,
}

impl Traceback {
    pub fn capture(frame: &Frame<'_>) -> Self {
        let mut frames = vec![];
        let mut truncated = false;
        let mut current: Option<&Frame> = Some(frame);

        while let Some(frame) = current {
            let (caller, call_site) = match (frame.caller, frame.call_site) {
                (Some(caller), Some(call_site)) => (caller, call_site),
                _ => break,
            };

            if frames.len() == MAX_TRACEBACK_FRAMES {
                truncated = true;
                break;
            }

            let (line, col) = call_site.line_col();

            frames.push(TraceFrame {
                call: call_site.text().to_string(),
                within: caller.func.name.text().to_string(),
                path: call_site.src.path.clone(),
                line,
                col,
            });

            current = Some(caller);
        }

        Self { frames, truncated }
    }

    /// Innermost call site first, outermost last.
    pub fn render(&self) -> Vec<String> {
        let mut lines = self.frames.iter()
            .map(|frame| format!(
                "calling `{}` from within `{}` at {}:{}:{}",
                frame.call, frame.within, frame.path.display(), frame.line, frame.col
            ))
            .collect::<Vec<String>>();

        if self.truncated {
            lines.push("...".to_string());
        }

        lines
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    MissingEntryPoint,
    Runtime(RuntimeError),
}

impl From<RuntimeError> for EvalError {
    fn from(error: RuntimeError) -> Self {
        EvalError::Runtime(error)
    }
}
