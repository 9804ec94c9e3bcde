use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use utf8_chars::BufReadCharsExt;

use crate::{
    eval::prelude::{eval, EvalError, EVAL_STACK_SIZE},
    parser::prelude::{parse, FuncTable},
    utils::prelude::{Error, Source, SourceRef},
};

pub const CORELIB_PATH: &str = "corelib/core.at";
const CORELIB_SOURCE: &str = include_str!("../../corelib/core.at");

static CORELIB: OnceLock<FuncTable> = OnceLock::new();

/// The standard-library base: a plain atto program defining friendlier
/// aliases over the intrinsics. Parsed once per process; every
/// execution clones the table, so independent programs never share
/// `Func` state.
pub fn corelib_table() -> &'static FuncTable {
    CORELIB.get_or_init(|| {
        let src = Source::new(CORELIB_PATH, CORELIB_SOURCE);

        parse(&src, FuncTable::new()).expect("corelib parses")
    })
}

/// The front-to-back pipeline: source text → tokens → two-pass parse →
/// evaluation of `main`.
pub struct Interpreter {
    use_corelib: bool,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self { use_corelib: true }
    }

    pub fn without_corelib() -> Self {
        Self { use_corelib: false }
    }

    fn base_table(&self) -> FuncTable {
        if self.use_corelib {
            corelib_table().clone()
        } else {
            FuncTable::new()
        }
    }

    pub fn run_file(&self, path: &Path) -> Result<i32, Error> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| Error::StdIo { err: err.kind() })?;

        self.run_source(path.to_path_buf(), text)
    }

    /// Streams a script out of any reader (e.g. stdin). UTF-8 decoding
    /// failures surface at the offending character.
    pub fn run_reader(&self, path: PathBuf, mut reader: impl BufRead) -> Result<i32, Error> {
        let mut text = String::new();

        for c in reader.chars() {
            text.push(c.map_err(|err| Error::StdIo { err: err.kind() })?);
        }

        self.run_source(path, text)
    }

    pub fn run_source(&self, path: PathBuf, text: String) -> Result<i32, Error> {
        let src = Source::new(path, text);

        let funcs = parse(&src, self.base_table())
            .map_err(|error| Error::Parse { src: src.clone(), error })?;

        run_with_stack(funcs, src)
    }
}

/// Runs the evaluator on a dedicated thread with [`EVAL_STACK_SIZE`] of
/// reserved stack, far above the default, since recursion is the only
/// iteration construct.
fn run_with_stack(funcs: FuncTable, src: SourceRef) -> Result<i32, Error> {
    let handle = std::thread::Builder::new()
        .name("atto-eval".into())
        .stack_size(EVAL_STACK_SIZE)
        .spawn(move || eval(&funcs))
        .map_err(|err| Error::StdIo { err: err.kind() })?;

    match handle.join() {
        Ok(Ok(code)) => Ok(code),
        Ok(Err(EvalError::MissingEntryPoint)) => Err(Error::MissingEntryPoint { src }),
        Ok(Err(EvalError::Runtime(error))) => Err(Error::Runtime { error }),
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

#[cfg(test)]
mod tests;
