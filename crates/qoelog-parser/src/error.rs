use std::fmt;

/// Result type for qoelog-parser operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading log sources
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// Walkdir error
    WalkDir(walkdir::Error),

    /// Structural or lookup failure inside a log, addendum or group file
    Log(qoelog_types::Error),

    /// Path given as a log source does not exist
    MissingSource(std::path::PathBuf),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::WalkDir(err) => write!(f, "Directory traversal error: {}", err),
            Error::Log(err) => write!(f, "{}", err),
            Error::MissingSource(path) => write!(f, "Log source not found: {}", path.display()),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Log(err) => Some(err),
            Error::MissingSource(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDir(err)
    }
}

impl From<qoelog_types::Error> for Error {
    fn from(err: qoelog_types::Error) -> Self {
        match err {
            qoelog_types::Error::Io(err) => Error::Io(err),
            other => Error::Log(other),
        }
    }
}

impl Error {
    /// Domain error behind this one, if any
    pub fn as_log_error(&self) -> Option<&qoelog_types::Error> {
        match self {
            Error::Log(err) => Some(err),
            _ => None,
        }
    }
}
