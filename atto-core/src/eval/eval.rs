use std::io::{BufRead, Write};

use crate::{
    lexer::prelude::{Token, TokenKind},
    parser::prelude::{AstNode, Func, FuncTable},
};
use super::error::{EvalError, RuntimeError, RuntimeErrorType, Traceback};
use super::frame::Frame;
use super::value::Value;

pub const ENTRY_POINT: &str = "main";

/// Stack reserve for the evaluator thread.
///
/// The language has no loop construct, so iteration is expressed as
/// tail-position recursion and the evaluator recurses once per call
/// frame. 256 MiB of reserved stack is the documented headroom
/// contract; blowing past it aborts the process like any other stack
/// overflow.
pub const EVAL_STACK_SIZE: usize = 256 * 1024 * 1024;

/// Evaluates `main` against the process's own stdin/stdout and maps the
/// result to an exit code.
pub fn eval(funcs: &FuncTable) -> Result<i32, EvalError> {
    Evaluator::new(funcs, std::io::stdin().lock(), std::io::stdout()).run()
}

fn runtime_error(error: RuntimeErrorType, token: &Token, frame: &Frame<'_>) -> RuntimeError {
    RuntimeError {
        error,
        src: token.src.clone(),
        span: token.span,
        trace: Traceback::capture(frame),
    }
}

fn left_of<'n>(node: &'n AstNode, token: &Token, frame: &Frame<'_>) -> Result<&'n AstNode, RuntimeError> {
    node.left.as_deref().ok_or_else(|| {
        runtime_error(RuntimeErrorType::UnhandledNode { kind: Some(token.kind) }, token, frame)
    })
}

fn right_of<'n>(node: &'n AstNode, token: &Token, frame: &Frame<'_>) -> Result<&'n AstNode, RuntimeError> {
    node.right.as_deref().ok_or_else(|| {
        runtime_error(RuntimeErrorType::UnhandledNode { kind: Some(token.kind) }, token, frame)
    })
}

/// A tree-walking evaluator over a finished function table.
///
/// Generic over its input/output handles so `__input`/`__print` can be
/// driven from tests; production use goes through [`eval`].
pub struct Evaluator<'a, R, W> {
    funcs: &'a FuncTable,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Evaluator<'a, R, W> {
    pub fn new(funcs: &'a FuncTable, input: R, output: W) -> Self {
        Self { funcs, input, output }
    }

    pub fn run(&mut self) -> Result<i32, EvalError> {
        let main = self.funcs.get(ENTRY_POINT).ok_or(EvalError::MissingEntryPoint)?;
        let frame = Frame::root(main);

        let body = match &main.body {
            Some(body) => body,
            None => {
                return Err(EvalError::Runtime(runtime_error(
                    RuntimeErrorType::UnboundBody { name: ENTRY_POINT.to_string() },
                    &main.name,
                    &frame,
                )))
            }
        };

        let value = self.eval_node(body, &frame)?;

        Ok(exit_code(&value))
    }

    /// One recursive dispatch keyed on the node's token kind.
    pub fn eval_node(&mut self, node: &AstNode, frame: &Frame<'_>) -> Result<Value, RuntimeError> {
        let token = match &node.token {
            Some(token) => token,
            None => {
                // synthetic nodes are traversed by their `if`, never
                // evaluated directly
                return Err(runtime_error(
                    RuntimeErrorType::UnhandledNode { kind: None },
                    &frame.func.name,
                    frame,
                ));
            }
        };

        match token.kind {
            TokenKind::Ident => {
                let name = token.text();

                match frame.lookup(name) {
                    Some(value) => Ok(value.clone()),
                    None => Err(runtime_error(
                        RuntimeErrorType::UnboundParameter { name: name.to_string() },
                        token,
                        frame,
                    )),
                }
            },
            TokenKind::Number => match token.number() {
                Ok(number) => Ok(Value::Number(number)),
                Err(_) => Err(runtime_error(
                    RuntimeErrorType::NotANumber { text: token.text().to_string() },
                    token,
                    frame,
                )),
            },
            TokenKind::String => Ok(Value::String(token.string_content().to_string())),
            TokenKind::True => Ok(Value::Bool(true)),
            TokenKind::False => Ok(Value::Bool(false)),
            TokenKind::Null => Ok(Value::Null),
            TokenKind::If => {
                let condition = self.eval_node(left_of(node, token, frame)?, frame)?;
                let branches = right_of(node, token, frame)?;

                // only the chosen branch is evaluated
                if condition.is_truthy() {
                    self.eval_node(left_of(branches, token, frame)?, frame)
                } else {
                    self.eval_node(right_of(branches, token, frame)?, frame)
                }
            },
            TokenKind::Add => {
                match self.eval_operands(node, token, frame)? {
                    (Value::Number(left), Value::Number(right)) => Ok(Value::Number(left + right)),
                    (Value::String(left), Value::String(right)) => {
                        Ok(Value::String(format!("{left}{right}")))
                    },
                    (left, right) => Err(runtime_error(
                        RuntimeErrorType::InvalidOperands {
                            op: "__add",
                            expected: "two numbers or two strings",
                            left: left.value_type(),
                            right: right.value_type(),
                        },
                        token,
                        frame,
                    )),
                }
            },
            TokenKind::Mul => {
                let (left, right) = self.eval_numbers(node, token, frame, "__mul")?;

                Ok(Value::Number(left * right))
            },
            TokenKind::Div => {
                let (left, right) = self.eval_numbers(node, token, frame, "__div")?;

                if right == 0.0 {
                    return Err(runtime_error(RuntimeErrorType::DivisionByZero, token, frame));
                }

                Ok(Value::Number(left / right))
            },
            TokenKind::Rem => {
                let (left, right) = self.eval_numbers(node, token, frame, "__rem")?;

                if right == 0.0 {
                    return Err(runtime_error(RuntimeErrorType::DivisionByZero, token, frame));
                }

                Ok(Value::Number(left % right))
            },
            TokenKind::Neg => {
                let number = self.eval_number(node, token, frame, "__neg")?;

                Ok(Value::Number(-number))
            },
            TokenKind::Inv => {
                let number = self.eval_number(node, token, frame, "__inv")?;

                if number == 0.0 {
                    return Err(runtime_error(RuntimeErrorType::DivisionByZero, token, frame));
                }

                Ok(Value::Number(1.0 / number))
            },
            TokenKind::Eq => {
                // structural equality, any types, no coercion
                let (left, right) = self.eval_operands(node, token, frame)?;

                Ok(Value::Bool(left == right))
            },
            TokenKind::Less => {
                match self.eval_operands(node, token, frame)? {
                    (Value::Number(left), Value::Number(right)) => Ok(Value::Bool(left < right)),
                    (Value::String(left), Value::String(right)) => Ok(Value::Bool(left < right)),
                    (left, right) => Err(runtime_error(
                        RuntimeErrorType::InvalidOperands {
                            op: "__lt",
                            expected: "two numbers or two strings",
                            left: left.value_type(),
                            right: right.value_type(),
                        },
                        token,
                        frame,
                    )),
                }
            },
            TokenKind::Head => {
                match self.eval_node(left_of(node, token, frame)?, frame)? {
                    Value::List(items) => Ok(items.first().cloned().unwrap_or(Value::Null)),
                    Value::String(text) => Ok(text
                        .chars()
                        .next()
                        .map(|c| Value::String(c.to_string()))
                        .unwrap_or(Value::Null)),
                    // non-indexable falls through to null
                    _ => Ok(Value::Null),
                }
            },
            TokenKind::Tail => {
                match self.eval_node(left_of(node, token, frame)?, frame)? {
                    Value::List(items) => {
                        if items.len() <= 1 {
                            Ok(Value::Null)
                        } else {
                            Ok(Value::List(items[1..].to_vec()))
                        }
                    },
                    Value::String(text) => {
                        match text.char_indices().nth(1) {
                            Some((offset, _)) => Ok(Value::String(text[offset..].to_string())),
                            None => Ok(Value::Null),
                        }
                    },
                    _ => Ok(Value::Null),
                }
            },
            TokenKind::Pair => {
                let (left, right) = self.eval_operands(node, token, frame)?;

                Ok(Value::List(vec![left, right]))
            },
            TokenKind::Fuse => {
                let (left, right) = self.eval_operands(node, token, frame)?;

                Ok(Value::List(match (left, right) {
                    (Value::List(mut left), Value::List(right)) => {
                        left.extend(right);
                        left
                    },
                    // scalar append fast path, reuses the left list
                    (Value::List(mut left), right) => {
                        left.push(right);
                        left
                    },
                    (left, Value::List(mut right)) => {
                        right.insert(0, left);
                        right
                    },
                    (left, right) => vec![left, right],
                }))
            },
            TokenKind::Litr => {
                match self.eval_node(left_of(node, token, frame)?, frame)? {
                    Value::Number(number) => Ok(Value::Number(number)),
                    Value::String(text) => match text.trim().parse::<f64>() {
                        Ok(number) => Ok(Value::Number(number)),
                        Err(_) => Err(runtime_error(
                            RuntimeErrorType::NotANumber { text },
                            token,
                            frame,
                        )),
                    },
                    other => Err(runtime_error(
                        RuntimeErrorType::InvalidOperand {
                            op: "__litr",
                            expected: "a number or a string",
                            got: other.value_type(),
                        },
                        token,
                        frame,
                    )),
                }
            },
            TokenKind::Str => {
                let value = self.eval_node(left_of(node, token, frame)?, frame)?;

                Ok(Value::String(format!("{value}")))
            },
            TokenKind::Words => {
                match self.eval_node(left_of(node, token, frame)?, frame)? {
                    Value::String(text) => Ok(Value::List(
                        text.split_whitespace()
                            .map(|word| Value::String(word.to_string()))
                            .collect(),
                    )),
                    other => Err(runtime_error(
                        RuntimeErrorType::InvalidOperand {
                            op: "__words",
                            expected: "a string",
                            got: other.value_type(),
                        },
                        token,
                        frame,
                    )),
                }
            },
            TokenKind::In => {
                if let Some(prompt) = node.left.as_deref() {
                    let prompt = self.eval_node(prompt, frame)?;

                    write!(self.output, "{prompt}")
                        .and_then(|_| self.output.flush())
                        .map_err(|err| {
                            runtime_error(RuntimeErrorType::Io { err: err.kind() }, token, frame)
                        })?;
                }

                let mut line = String::new();
                self.input
                    .read_line(&mut line)
                    .map_err(|err| {
                        runtime_error(RuntimeErrorType::Io { err: err.kind() }, token, frame)
                    })?;

                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }

                Ok(Value::String(line))
            },
            TokenKind::Out => {
                let value = self.eval_node(left_of(node, token, frame)?, frame)?;

                writeln!(self.output, "{value}").map_err(|err| {
                    runtime_error(RuntimeErrorType::Io { err: err.kind() }, token, frame)
                })?;

                Ok(Value::Null)
            },
            TokenKind::Call => {
                let func: &'a Func = self.funcs.get(token.text()).ok_or_else(|| {
                    runtime_error(
                        RuntimeErrorType::UnknownFunction { name: token.text().to_string() },
                        token,
                        frame,
                    )
                })?;

                // arguments evaluate left to right in the caller's frame
                let mut args = Vec::with_capacity(func.arity());
                let mut holder = node.left.as_deref();
                while let Some(chain) = holder {
                    if let Some(arg) = chain.right.as_deref() {
                        args.push(self.eval_node(arg, frame)?);
                    }
                    holder = chain.left.as_deref();
                }

                let body = func.body.as_ref().ok_or_else(|| {
                    runtime_error(
                        RuntimeErrorType::UnboundBody { name: token.text().to_string() },
                        token,
                        frame,
                    )
                })?;

                let call_frame = Frame::call(frame, token, args, func);

                self.eval_node(body, &call_frame)
            },
            _ => Err(runtime_error(
                RuntimeErrorType::UnhandledNode { kind: Some(token.kind) },
                token,
                frame,
            )),
        }
    }

    fn eval_operands(
        &mut self,
        node: &AstNode,
        token: &Token,
        frame: &Frame<'_>,
    ) -> Result<(Value, Value), RuntimeError> {
        let left = self.eval_node(left_of(node, token, frame)?, frame)?;
        let right = self.eval_node(right_of(node, token, frame)?, frame)?;

        Ok((left, right))
    }

    fn eval_numbers(
        &mut self,
        node: &AstNode,
        token: &Token,
        frame: &Frame<'_>,
        op: &'static str,
    ) -> Result<(f64, f64), RuntimeError> {
        match self.eval_operands(node, token, frame)? {
            (Value::Number(left), Value::Number(right)) => Ok((left, right)),
            (left, right) => Err(runtime_error(
                RuntimeErrorType::InvalidOperands {
                    op,
                    expected: "two numbers",
                    left: left.value_type(),
                    right: right.value_type(),
                },
                token,
                frame,
            )),
        }
    }

    fn eval_number(
        &mut self,
        node: &AstNode,
        token: &Token,
        frame: &Frame<'_>,
        op: &'static str,
    ) -> Result<f64, RuntimeError> {
        match self.eval_node(left_of(node, token, frame)?, frame)? {
            Value::Number(number) => Ok(number),
            other => Err(runtime_error(
                RuntimeErrorType::InvalidOperand {
                    op,
                    expected: "a number",
                    got: other.value_type(),
                },
                token,
                frame,
            )),
        }
    }
}

/// The `main` body's result, converted per contract: numbers truncate,
/// numeric strings parse and truncate, everything else is 0.
fn exit_code(value: &Value) -> i32 {
    match value {
        Value::Number(number) => *number as i32,
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map(|number| number as i32)
            .unwrap_or(0),
        _ => 0,
    }
}
