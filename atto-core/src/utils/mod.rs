pub mod diagnostic;
pub mod src_span;
pub mod source;
pub mod error;

pub mod prelude {
    pub use super::{
        diagnostic::*,
        src_span::*,
        source::*,
        error::*
    };
}
