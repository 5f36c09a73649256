//! Centralized error handling for dfx.
//!
//! Errors are grouped by how callers are expected to react to them:
//!
//! - [`DfxError::InvalidInput`] is raised while *constructing* a describer
//!   (unknown column, row out of range). It is never deferred to evaluation.
//! - [`DfxError::NotFound`] and [`DfxError::EmptyStore`] are recoverable cache
//!   conditions. Caching code falls through to fresh computation on either.
//! - Everything else (I/O, serialization, polars conversion) is propagated.
//!
//! Analysis failures (wrong column type, a statistical test that cannot be
//! computed) are not errors at all: they become an `Invalid` describer state
//! with an explanatory description.
//!
//! ```
//! use dfx::error::DfxError;
//!
//! fn is_cache_miss(err: &DfxError) -> bool {
//!     matches!(err, DfxError::NotFound(_) | DfxError::EmptyStore)
//! }
//!
//! assert!(is_cache_miss(&DfxError::EmptyStore));
//! ```

use std::fmt;

/// Main error type for dfx operations.
#[derive(Debug)]
pub enum DfxError {
    /// I/O errors (store files, config files)
    Io(std::io::Error),

    /// Bad describer subject or dataset shape, raised at construction
    InvalidInput(String),

    /// Key absent from an initialized cache store
    NotFound(String),

    /// Cache store was never initialized (nothing has been saved yet)
    EmptyStore,

    /// Stored entry exists but holds something other than what was asked for
    CorruptEntry(String),

    /// JSON (de)serialization errors
    Serialization(String),

    /// Dataframe conversion errors
    DataProcessing(String),

    /// Configuration errors
    Config(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for DfxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::NotFound(key) => write!(f, "Not found in cache store: {key}"),
            Self::EmptyStore => write!(f, "Cache store has not been initialized"),
            Self::CorruptEntry(msg) => write!(f, "Corrupt cache entry: {msg}"),
            Self::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for DfxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl DfxError {
    /// True for the two conditions a cache lookup may recover from by recomputing.
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::EmptyStore)
    }
}

impl From<std::io::Error> for DfxError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for DfxError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for DfxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<polars::error::PolarsError> for DfxError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for dfx operations.
pub type Result<T> = std::result::Result<T, DfxError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<DfxError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: DfxError = e.into();
            DfxError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: DfxError = e.into();
            DfxError::Other(format!("{}: {}", f(), err))
        })
    }
}
