use termcolor::Buffer;
use thiserror::Error;

use crate::{
    eval::prelude::RuntimeError,
    parser::prelude::{ParseError, ParseErrorType},
    utils::prelude::{SourceRef, SrcSpan},
};
use super::diagnostic::{Diagnostic, Label, Level, Location};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to parse source code")]
    Parse {
        src: SourceRef,
        error: ParseError
    },
    #[error("no entry point")]
    MissingEntryPoint {
        src: SourceRef
    },
    #[error("evaluation failed")]
    Runtime {
        error: RuntimeError
    },
    #[error("IO operation failed")]
    StdIo {
        err: std::io::ErrorKind
    }
}

impl Error {
    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8(nocolor.into_inner()).expect("Error printing produced invalid utf8")
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf);
            writeln!(buf).expect("write new line diagnostic");
        }
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::Parse { src, error } => {
                let (label, extra) = error.details();
                let text = extra.join("\n");

                // Eof errors carry no useful span, point at the end of input
                let adjusted_location = if matches!(error.error, ParseErrorType::UnexpectedEof) {
                    SrcSpan {
                        start: src.text.len() as u32,
                        end: src.text.len() as u32,
                    }
                } else {
                    error.span
                };

                vec![Diagnostic {
                    title: "Syntax error".into(),
                    text,
                    level: Level::Error,
                    location: Some(Location {
                        src: &src.text,
                        path: src.path.clone(),
                        label: Label {
                            text: Some(label.to_string()),
                            span: adjusted_location,
                        },
                        extra_labels: vec![],
                    }),
                }]
            },
            Error::MissingEntryPoint { src } => {
                vec![Diagnostic {
                    title: "Missing entry point".into(),
                    text: format!(
                        "Function `main` is not found in {}.",
                        src.path.display()
                    ),
                    level: Level::Error,
                    location: None,
                }]
            },
            Error::Runtime { error } => {
                let (label, mut extra) = error.details();
                extra.extend(error.trace.render());
                let text = extra.join("\n");

                vec![Diagnostic {
                    title: "Runtime error".into(),
                    text,
                    level: Level::Error,
                    location: Some(Location {
                        src: &error.src.text,
                        path: error.src.path.clone(),
                        label: Label {
                            text: Some(label.to_string()),
                            span: error.span,
                        },
                        extra_labels: vec![],
                    }),
                }]
            },
            Error::StdIo { err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("{err}"),
                    level: Level::Error,
                    location: None,
                }]
            }
        }
    }
}
