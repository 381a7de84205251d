//! Mirror resolved data files from a remote search root into a local cache

use filetime::FileTime;
use qoelog_types::LogEntry;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::resolver::{FileOutcome, FileResolver, ResolvedFiles, ResolverTable};
use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Local paths created by this sync
    pub copied: Vec<PathBuf>,
    /// Local files for every entry that resolved
    pub files: Vec<PathBuf>,
}

/// Copy every remote data file missing from `local`, then resolve locally
///
/// Error, incomplete and unresolved entries are skipped. Files keep the
/// remote modification time. Fails when nothing resolves locally.
pub fn sync_files<'e, I>(
    table: &ResolverTable,
    entries: I,
    remote: &Path,
    local: &Path,
    file_type: &str,
) -> Result<SyncReport>
where
    I: IntoIterator<Item = (usize, &'e LogEntry)>,
{
    let entries: Vec<(usize, &LogEntry)> = entries.into_iter().collect();

    let remote_resolved =
        FileResolver::new(table, remote).resolve(entries.iter().copied(), file_type)?;
    let unresolved = remote_resolved
        .iter()
        .filter(|r| r.outcome == FileOutcome::NoMatch)
        .count();
    if unresolved > 0 {
        tracing::warn!(count = unresolved, root = %remote.display(), "files not found on remote");
    }

    let present: BTreeSet<PathBuf> = if local.is_dir() {
        let local_resolved =
            FileResolver::new(table, local).resolve(entries.iter().copied(), file_type)?;
        relative_files(&local_resolved, local).collect()
    } else {
        BTreeSet::new()
    };

    let mut copied = Vec::new();
    for relative in relative_files(&remote_resolved, remote) {
        if present.contains(&relative) {
            continue;
        }
        let source = remote.join(&relative);
        let target = local.join(&relative);
        tracing::info!(from = %source.display(), to = %target.display(), "copying data file");
        copy_preserving_mtime(&source, &target)?;
        copied.push(target);
    }

    let files: Vec<PathBuf> = FileResolver::new(table, local)
        .resolve(entries, file_type)?
        .into_iter()
        .flat_map(|r| match r.outcome {
            FileOutcome::Files(paths) => paths,
            _ => Vec::new(),
        })
        .collect();

    if files.is_empty() {
        return Err(Error::NoFilesFound(local.to_path_buf()));
    }
    Ok(SyncReport { copied, files })
}

fn relative_files<'a>(
    resolved: &'a [ResolvedFiles],
    root: &'a Path,
) -> impl Iterator<Item = PathBuf> + 'a {
    resolved
        .iter()
        .flat_map(|r| r.outcome.files())
        .filter_map(move |path| path.strip_prefix(root).ok().map(Path::to_path_buf))
}

/// Copy a file, or a directory tree, keeping modification times
fn copy_preserving_mtime(source: &Path, target: &Path) -> Result<()> {
    if source.is_dir() {
        for item in WalkDir::new(source).sort_by_file_name() {
            let item = item.map_err(|err| Error::Io(err.into()))?;
            let Ok(relative) = item.path().strip_prefix(source) else {
                continue;
            };
            let dest = target.join(relative);
            if item.file_type().is_dir() {
                fs::create_dir_all(&dest)?;
            } else {
                copy_file(item.path(), &dest)?;
            }
        }
        return Ok(());
    }
    copy_file(source, target)
}

fn copy_file(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, target)?;
    let metadata = fs::metadata(source)?;
    filetime::set_file_mtime(target, FileTime::from_last_modification_time(&metadata))?;
    Ok(())
}
