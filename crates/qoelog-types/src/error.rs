use serde::{Deserialize, Serialize};
use std::fmt;

use crate::diagnostic::Diagnostic;

/// Result type for qoelog-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Position of a line inside a source file (base name, 1-based line number)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} of {}", self.line, self.file)
    }
}

/// Error types that can occur while building or amending a log index
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// A structural marker was found where another one was required
    Sequence { at: Location, message: String },

    /// Amendment names a field the entry does not have
    UnknownField { at: Location, name: String },

    /// Amendment tries to change a fixed field
    ImmutableField { at: Location, name: String },

    /// Lookup by date (and operation) matched nothing
    NotFound { at: Location, key: String },

    /// Lookup by date (and operation) matched more than one entry
    AmbiguousMatch {
        at: Location,
        key: String,
        count: usize,
    },

    /// Entry was already patched by an earlier addendum packet
    AlreadyAmended {
        at: Location,
        key: String,
        previous: String,
    },

    /// Packet header is not `<operation> at <date>`
    InvalidHeader { at: Location, line: String },

    /// Timestamp does not follow `DD-Mon-YYYY HH:MM:SS`
    InvalidDate { at: Location, text: String },

    /// Scanner diagnostic escalated by the `Error` parse policy
    Diagnostic(Diagnostic),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Sequence { at, message } => write!(f, "Sequence error at {}: {}", at, message),
            Error::UnknownField { at, name } => {
                write!(f, "Unknown field {:?} at {}", name, at)
            }
            Error::ImmutableField { at, name } => {
                write!(f, "At {}: field {:?} is not amendable", at, name)
            }
            Error::NotFound { at, key } => {
                write!(f, "No matching entry found for '{}' at {}", key, at)
            }
            Error::AmbiguousMatch { at, key, count } => write!(
                f,
                "{} matching entries found for '{}' at {}",
                count, key, at
            ),
            Error::AlreadyAmended { at, key, previous } => write!(
                f,
                "Entry '{}' already amended by {} (again at {})",
                key, previous, at
            ),
            Error::InvalidHeader { at, line } => {
                write!(f, "Malformed packet header at {}: {:?}", at, line)
            }
            Error::InvalidDate { at, text } => {
                write!(f, "Invalid timestamp {:?} at {}", text, at)
            }
            Error::Diagnostic(diag) => write!(f, "Log parse error: {}", diag),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<Diagnostic> for Error {
    fn from(diag: Diagnostic) -> Self {
        Error::Diagnostic(diag)
    }
}
