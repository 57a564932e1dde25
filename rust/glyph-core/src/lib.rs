//! Glyph Core
//!
//! Session configuration and the error taxonomy shared by the evaluator and its callers.

pub mod config;
pub mod error;

pub use config::{Config, ConfigError, MAX_FLOAT_PREC};
pub use error::{ErrorKind, EvalError, Limit, Result};
