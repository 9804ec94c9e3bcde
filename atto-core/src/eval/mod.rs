pub mod error;
pub mod value;
pub mod frame;
pub mod eval;

pub mod prelude {
    pub use super::{
        error::*,
        value::*,
        frame::*,
        eval::*
    };
}

#[cfg(test)]
mod tests;
