use std::fmt;
use std::path::PathBuf;

/// Result type for qoelog-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Log loading failed
    Parser(qoelog_parser::Error),

    /// Query failed
    Engine(qoelog_engine::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Glob pattern could not be built
    Glob(glob::PatternError),

    /// External version-control command failed
    ExternalTool {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    /// Entry operation has no file-resolution rule
    UnknownOperation(String),

    /// Requested data file category is not in the resolution table
    UnknownFileType(String),

    /// Sync finished without any usable local file
    NoFilesFound(PathBuf),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parser(err) => write!(f, "{}", err),
            Error::Engine(err) => write!(f, "Query error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Glob(err) => write!(f, "Glob pattern error: {}", err),
            Error::ExternalTool {
                command,
                status,
                stderr,
            } => {
                match status {
                    Some(code) => write!(f, "'{}' exited with status {}", command, code)?,
                    None => write!(f, "'{}' was terminated", command)?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }
                Ok(())
            }
            Error::UnknownOperation(op) => write!(f, "Unknown operation '{}'", op),
            Error::UnknownFileType(name) => write!(f, "Unknown file type '{}'", name),
            Error::NoFilesFound(root) => write!(
                f,
                "Could not find any files meeting search criteria in {}",
                root.display()
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parser(err) => Some(err),
            Error::Engine(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Glob(err) => Some(err),
            Error::Config(_)
            | Error::ExternalTool { .. }
            | Error::UnknownOperation(_)
            | Error::UnknownFileType(_)
            | Error::NoFilesFound(_) => None,
        }
    }
}

impl From<qoelog_parser::Error> for Error {
    fn from(err: qoelog_parser::Error) -> Self {
        Error::Parser(err)
    }
}

impl From<qoelog_engine::Error> for Error {
    fn from(err: qoelog_engine::Error) -> Self {
        Error::Engine(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<glob::PatternError> for Error {
    fn from(err: glob::PatternError) -> Self {
        Error::Glob(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
