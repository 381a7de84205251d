use std::fmt;

/// Result type for qoelog-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while running a query
#[derive(Debug)]
pub enum Error {
    /// A search pattern is not a valid regular expression
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    /// A criterion value cannot be used for its field
    InvalidCriterion { field: String, message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPattern { pattern, source } => {
                write!(f, "Invalid search pattern {:?}: {}", pattern, source)
            }
            Error::InvalidCriterion { field, message } => {
                write!(f, "Invalid criterion for field '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidPattern { source, .. } => Some(source),
            Error::InvalidCriterion { .. } => None,
        }
    }
}
