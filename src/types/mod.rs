//! Shared types for the MA'AT engine

pub mod error;

pub use error::{MaatError, Result};
