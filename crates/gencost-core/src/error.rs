//! Unified error type for the gencost crates
//!
//! [`GencostError`] is the error returned at API boundaries. Domain errors of
//! the compiler (see `gencost-algo`) convert into it so callers that drive a
//! whole OPF preparation can use a single `?` chain.
//!
//! # Example
//!
//! ```
//! use gencost_core::{CostTables, GencostError, GencostResult};
//!
//! fn load_costs(json: &str) -> GencostResult<CostTables> {
//!     let tables = CostTables::from_json(json)?;
//!     if tables.is_empty() {
//!         return Err("cost tables are empty".into());
//!     }
//!     Ok(tables)
//! }
//!
//! assert!(matches!(load_costs("{"), Err(GencostError::Parse(_))));
//! assert!(matches!(load_costs("{}"), Err(GencostError::Other(_))));
//! ```

use thiserror::Error;

/// Unified error type for all gencost operations.
#[derive(Error, Debug)]
pub enum GencostError {
    /// I/O errors (fixture files, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Input data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cost model compilation errors
    #[error("Cost model error: {0}")]
    Model(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using GencostError.
pub type GencostResult<T> = Result<T, GencostError>;

impl From<String> for GencostError {
    fn from(s: String) -> Self {
        GencostError::Other(s)
    }
}

impl From<&str> for GencostError {
    fn from(s: &str) -> Self {
        GencostError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for GencostError {
    fn from(err: serde_json::Error) -> Self {
        GencostError::Parse(err.to_string())
    }
}
