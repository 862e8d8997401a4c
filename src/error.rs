//! Error types.
//!
//! [`ComputeError`] covers the numeric core (cascade and conversions) and is
//! cheap to clone so conversion states can hold it. [`Error`] is the crate-level
//! error for everything around the core: chain files, reports and the CLI.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a cascade or power-unit computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputeError {
    /// The stage sequence was empty, so there is no result to compute.
    #[error("cascade has no stages")]
    EmptyInput,

    /// A step would take `log10` of a non-positive value, divide by a zero
    /// linear gain, or otherwise produce a non-finite number.
    #[error("numeric domain error in {operation}: {detail}")]
    NumericDomain {
        operation: &'static str,
        detail: String,
    },

    /// A field carried NaN or an infinity.
    #[error("invalid value for {field}: {value}")]
    InvalidFieldValue { field: String, value: f64 },
}

impl ComputeError {
    pub(crate) fn domain(operation: &'static str, detail: impl Into<String>) -> Self {
        ComputeError::NumericDomain {
            operation,
            detail: detail.into(),
        }
    }
}

/// Errors raised while loading chain files, exporting reports or running the CLI.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Compute(#[from] ComputeError),

    #[error("cascade has not been computed yet, calculate it before exporting a report")]
    NotComputed,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("include cycle detected at {0}")]
    IncludeCycle(PathBuf),

    #[error("failed to format report: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Result alias for crate-level operations.
pub type Result<T> = std::result::Result<T, Error>;
