use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

pub const LOG_EXTENSION: &str = "log";
pub const ADDENDUM_EXTENSION: &str = "ad-log";
pub const GROUP_EXTENSION: &str = "gr-log";

/// The files one index is built from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFiles {
    /// Directory data files are resolved against
    pub search_path: PathBuf,
    pub logs: Vec<PathBuf>,
    pub addenda: Vec<PathBuf>,
    pub groups: Vec<PathBuf>,
}

impl SourceFiles {
    /// Collect every log, addendum and group file directly inside `dir`
    pub fn discover(dir: &Path) -> Result<Self> {
        let mut sources = Self {
            search_path: dir.to_path_buf(),
            ..Self::default()
        };

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            match path.extension().and_then(|e| e.to_str()) {
                Some(LOG_EXTENSION) => sources.logs.push(path),
                Some(ADDENDUM_EXTENSION) => sources.addenda.push(path),
                Some(GROUP_EXTENSION) => sources.groups.push(path),
                _ => {}
            }
        }

        tracing::debug!(
            dir = %dir.display(),
            logs = sources.logs.len(),
            addenda = sources.addenda.len(),
            groups = sources.groups.len(),
            "discovered log sources"
        );
        Ok(sources)
    }

    /// Explicit list of log files; data files resolve next to the first one
    pub fn from_files<I, P>(logs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let logs: Vec<PathBuf> = logs.into_iter().map(Into::into).collect();
        let search_path = logs
            .first()
            .and_then(|p| p.parent())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            search_path,
            logs,
            ..Self::default()
        }
    }

    /// A directory is discovered, a file is used as the only log
    pub fn resolve(path: &Path) -> Result<Self> {
        if path.is_dir() {
            Self::discover(path)
        } else if path.is_file() {
            Ok(Self::from_files([path]))
        } else {
            Err(Error::MissingSource(path.to_path_buf()))
        }
    }

    pub fn with_addendum(mut self, path: impl Into<PathBuf>) -> Self {
        self.addenda.push(path.into());
        self
    }

    pub fn with_group(mut self, path: impl Into<PathBuf>) -> Self {
        self.groups.push(path.into());
        self
    }
}
