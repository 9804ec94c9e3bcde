use crate::lexer::prelude::Token;
use crate::parser::prelude::Func;
use super::value::Value;

/// The runtime record of one active function call.
///
/// Frames form an explicit immutable chain through `caller`; the chain
/// exists only for traceback reconstruction. Parameter lookup is
/// positional against the function's own declared parameters, so a
/// function sees nothing but its own arguments.
#[derive(Debug)]
pub struct Frame<'a> {
    pub caller: Option<&'a Frame<'a>>,
    pub call_site: Option<&'a Token>,
    pub args: Vec<Value>,
    pub func: &'a Func,
}

impl<'a> Frame<'a> {
    pub fn root(func: &'a Func) -> Self {
        Self {
            caller: None,
            call_site: None,
            args: vec![],
            func,
        }
    }

    pub fn call(
        caller: &'a Frame<'a>,
        call_site: &'a Token,
        args: Vec<Value>,
        func: &'a Func,
    ) -> Self {
        Self {
            caller: Some(caller),
            call_site: Some(call_site),
            args,
            func,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.func
            .param_index(name)
            .and_then(|position| self.args.get(position))
    }
}
