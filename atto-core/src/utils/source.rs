use std::path::PathBuf;
use std::sync::Arc;

/// A unit of source text together with the path it was loaded from.
///
/// Tokens keep a handle to their source so that text slicing and
/// line/column reporting work after the lexer is gone, and so that a
/// function table can mix functions from several sources (user program
/// plus corelib).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub path: PathBuf,
    pub text: String,
}

pub type SourceRef = Arc<Source>;

impl Source {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> SourceRef {
        Arc::new(Self {
            path: path.into(),
            text: text.into(),
        })
    }

    /// Line and column of a byte offset, computed by re-scanning the
    /// text up to the offset. Lines are 1-based, columns 0-based.
    pub fn line_col(&self, offset: u32) -> (usize, usize) {
        let (mut line, mut col) = (1, 0);

        for (i, c) in self.text.char_indices() {
            if i as u32 >= offset {
                break;
            }

            if c == '\n' {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }

        (line, col)
    }
}
