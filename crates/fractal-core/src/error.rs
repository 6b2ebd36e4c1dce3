//! Error types for fractal
//!
//! Errors are structured: a kind, the path that was being accessed,
//! the underlying cause and an actionable help message.

use std::fmt;

/// Result type alias for fractal operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for fractal operations
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The kind of error that occurred
    pub kind: ErrorKind,
    /// Path being accessed when the error occurred (e.g., "items.3")
    pub path: Option<String>,
    /// Actionable help message
    pub help: Option<String>,
    /// Underlying cause (as string for Clone compatibility)
    pub cause: Option<String>,
}

/// Categories of errors that can occur
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// A map key is missing, or a scalar was asked for children
    #[error("Path not found")]
    PathNotFound,
    /// A list segment is not an integer
    #[error("Invalid list index")]
    InvalidIndex,
    /// A list index is outside `[0, len)`
    #[error("Index out of range")]
    IndexOutOfRange,
    /// A map was requested but the value has another shape
    #[error("Value is not a map")]
    NotAMap,
    /// A list was requested but the value has another shape
    #[error("Value is not a list")]
    NotAList,
    /// Input bytes could not be decoded
    #[error("Deserialization failed")]
    Deserialization,
    /// A value could not be encoded or converted
    #[error("Serialization failed")]
    Serialization,
}

impl Error {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            path: None,
            help: None,
            cause: None,
        }
    }

    /// Create a path not found error
    pub fn path_not_found(path: impl Into<String>, segment: &str) -> Self {
        let path_str = path.into();
        Self {
            help: Some(format!("Check that '{}' exists in the data", path_str)),
            cause: Some(format!("No child named '{}'", segment)),
            path: Some(path_str),
            ..Self::new(ErrorKind::PathNotFound)
        }
    }

    /// Create an invalid index error
    pub fn invalid_index(path: impl Into<String>, segment: &str) -> Self {
        Self {
            path: Some(path.into()),
            help: Some("List segments must be integers or length()".into()),
            cause: Some(format!("'{}' is not an integer", segment)),
            ..Self::new(ErrorKind::InvalidIndex)
        }
    }

    /// Create an index out of range error
    pub fn index_out_of_range(path: impl Into<String>, index: i64, len: usize) -> Self {
        Self {
            path: Some(path.into()),
            help: Some(format!("Use an index between 0 and {}", len.saturating_sub(1))),
            cause: Some(format!("Index {} with length {}", index, len)),
            ..Self::new(ErrorKind::IndexOutOfRange)
        }
    }

    /// Create a not-a-map error
    pub fn not_a_map(path: impl Into<String>, got: &str) -> Self {
        Self {
            path: Some(path.into()),
            cause: Some(format!("Got: {}", got)),
            ..Self::new(ErrorKind::NotAMap)
        }
    }

    /// Create a not-a-list error
    pub fn not_a_list(path: impl Into<String>, got: &str) -> Self {
        Self {
            path: Some(path.into()),
            cause: Some(format!("Got: {}", got)),
            ..Self::new(ErrorKind::NotAList)
        }
    }

    /// Create a deserialization error
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self {
            cause: Some(message.into()),
            ..Self::new(ErrorKind::Deserialization)
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self {
            help: Some("Map keys must be strings, integers or booleans".into()),
            cause: Some(message.into()),
            ..Self::new(ErrorKind::Serialization)
        }
    }

    /// Add path context to the error
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add help message to the error
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(path) = &self.path {
            write!(f, "\n  Path: {}", path)?;
        }

        if let Some(cause) = &self.cause {
            write!(f, "\n  {}", cause)?;
        }

        if let Some(help) = &self.help {
            write!(f, "\n  Help: {}", help)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}
