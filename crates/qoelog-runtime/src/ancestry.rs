//! Restrict results to runs made with an ancestor of some revision
//!
//! Each entry records the commit it ran with in `Git Hash` (older logs use
//! `GitHash`). An entry matches when that commit is the merge base of
//! itself and the reference revision, i.e. it is reachable from it.

use qoelog_types::{LogEntry, LogIndex};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::{Error, Result};

/// Field holding the commit hash of a run
pub const HASH_FIELD: &str = "Git Hash";
const LEGACY_HASH_FIELD: &str = "GitHash";

/// Version-control operations the ancestry filter needs
pub trait VersionControl {
    /// Full commit id for `rev`
    fn resolve_commit(&self, repo: &Path, rev: &str) -> Result<String>;

    /// Fails when `hash` names no object in the repository
    fn verify_object(&self, repo: &Path, hash: &str) -> Result<()>;

    fn merge_base(&self, repo: &Path, a: &str, b: &str) -> Result<String>;

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Runs the `git` command line tool
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl GitCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, repo: Option<&Path>, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        if let Some(repo) = repo {
            cmd.arg("-C").arg(repo);
        }
        cmd.args(args);
        tracing::debug!(?cmd, "running git");

        let output = cmd.output()?;
        if !output.status.success() {
            return Err(Error::ExternalTool {
                command: format!("{} {}", self.program.display(), args.join(" ")),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl VersionControl for GitCli {
    fn resolve_commit(&self, repo: &Path, rev: &str) -> Result<String> {
        self.run(Some(repo), &["rev-parse", "--verify", &format!("{}^{{commit}}", rev)])
    }

    fn verify_object(&self, repo: &Path, hash: &str) -> Result<()> {
        self.run(Some(repo), &["cat-file", "-t", hash]).map(|_| ())
    }

    fn merge_base(&self, repo: &Path, a: &str, b: &str) -> Result<String> {
        self.run(Some(repo), &["merge-base", a, b])
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let dest = dest.to_string_lossy();
        self.run(None, &["clone", "--quiet", url, &dest]).map(|_| ())
    }
}

/// True for locations that must be cloned rather than opened in place
pub fn is_git_url(location: &str) -> bool {
    ["git@", "https://", "http://", "ssh://", "git://"]
        .iter()
        .any(|scheme| location.starts_with(scheme))
}

/// Temporary clone, removed on drop
///
/// Object files in `.git` are read-only on some platforms, which makes a
/// plain recursive delete fail; permissions are relaxed first.
struct CloneGuard {
    dir: Option<TempDir>,
}

impl CloneGuard {
    fn new() -> Result<Self> {
        Ok(Self {
            dir: Some(tempfile::Builder::new().prefix("qoelog-clone-").tempdir()?),
        })
    }

    fn path(&self) -> &Path {
        self.dir.as_ref().map_or(Path::new(""), TempDir::path)
    }
}

impl Drop for CloneGuard {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        make_writable(dir.path());
        if let Err(err) = dir.close() {
            tracing::warn!(error = %err, "failed to remove temporary clone");
        }
    }
}

fn make_writable(root: &Path) {
    for item in WalkDir::new(root).into_iter().filter_map(|item| item.ok()) {
        let Ok(metadata) = item.metadata() else {
            continue;
        };
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            let _ = std::fs::set_permissions(item.path(), permissions);
        }
    }
}

/// First token of the entry's commit hash; the dirty marker is dropped
pub fn entry_hash(entry: &LogEntry) -> Option<&str> {
    entry
        .fields
        .get(HASH_FIELD)
        .or_else(|| entry.fields.get(LEGACY_HASH_FIELD))
        .and_then(|value| value.split_whitespace().next())
}

/// Indices of entries whose commit is an ancestor of, or equal to, `rev`
///
/// `repo` is a local checkout or a URL that gets cloned into a temporary
/// directory for the duration of the call. Entries without a hash, or with
/// one the repository does not know, are skipped with a warning.
pub fn ancestor_matches(
    index: &LogIndex,
    vcs: &dyn VersionControl,
    rev: &str,
    repo: &str,
) -> Result<BTreeSet<usize>> {
    let clone = if is_git_url(repo) {
        let guard = CloneGuard::new()?;
        tracing::info!(url = repo, "cloning repository");
        vcs.clone_repo(repo, guard.path())?;
        Some(guard)
    } else {
        None
    };
    let repo_path = clone
        .as_ref()
        .map_or_else(|| Path::new(repo), CloneGuard::path);

    let target = vcs.resolve_commit(repo_path, rev)?;
    let mut cache: HashMap<&str, bool> = HashMap::new();
    let mut matches = BTreeSet::new();

    for (i, entry) in index.iter().enumerate() {
        let Some(hash) = entry_hash(entry) else {
            continue;
        };
        let is_ancestor = match cache.get(hash) {
            Some(&known) => known,
            None => {
                let known = check_ancestor(vcs, repo_path, &target, hash, i);
                cache.insert(hash, known);
                known
            }
        };
        if is_ancestor {
            matches.insert(i);
        }
    }

    tracing::debug!(rev, target = %target, matches = matches.len(), "ancestry filter");
    Ok(matches)
}

fn check_ancestor(
    vcs: &dyn VersionControl,
    repo: &Path,
    target: &str,
    hash: &str,
    entry: usize,
) -> bool {
    if let Err(err) = vcs.verify_object(repo, hash) {
        tracing::warn!(entry, hash, error = %err, "could not find commit");
        return false;
    }
    let Ok(full) = vcs.resolve_commit(repo, hash) else {
        tracing::warn!(entry, hash, "could not resolve commit");
        return false;
    };
    match vcs.merge_base(repo, target, &full) {
        Ok(base) => base == full,
        Err(err) => {
            tracing::warn!(entry, hash, error = %err, "could not compute merge base");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qoelog_types::parse_log_date;
    use std::cell::{Cell, RefCell};

    /// Linear history a <- b <- c plus a side branch a <- x
    #[derive(Default)]
    struct FakeGit {
        checks: Cell<usize>,
        cloned_into: RefCell<Option<PathBuf>>,
    }

    impl FakeGit {
        fn parents(hash: &str) -> &'static [&'static str] {
            match hash {
                "c" => &["c", "b", "a"],
                "b" => &["b", "a"],
                "x" => &["x", "a"],
                "a" => &["a"],
                _ => &[],
            }
        }
    }

    impl VersionControl for FakeGit {
        fn resolve_commit(&self, _repo: &Path, rev: &str) -> Result<String> {
            let full = match rev {
                "main" => "c",
                "feature" => "x",
                other => other,
            };
            if FakeGit::parents(full).is_empty() {
                return Err(Error::ExternalTool {
                    command: "rev-parse".to_string(),
                    status: Some(128),
                    stderr: format!("unknown revision {}", rev),
                });
            }
            Ok(full.to_string())
        }

        fn verify_object(&self, repo: &Path, hash: &str) -> Result<()> {
            self.checks.set(self.checks.get() + 1);
            self.resolve_commit(repo, hash).map(|_| ())
        }

        fn merge_base(&self, _repo: &Path, a: &str, b: &str) -> Result<String> {
            let ours = FakeGit::parents(a);
            FakeGit::parents(b)
                .iter()
                .find(|h| ours.contains(h))
                .map(|h| h.to_string())
                .ok_or_else(|| Error::ExternalTool {
                    command: "merge-base".to_string(),
                    status: Some(1),
                    stderr: String::new(),
                })
        }

        fn clone_repo(&self, _url: &str, dest: &Path) -> Result<()> {
            assert!(dest.is_dir());
            std::fs::create_dir_all(dest.join(".git/objects"))?;
            let object = dest.join(".git/objects/pack");
            std::fs::write(&object, "packed")?;
            let mut permissions = std::fs::metadata(&object)?.permissions();
            permissions.set_readonly(true);
            std::fs::set_permissions(&object, permissions)?;
            *self.cloned_into.borrow_mut() = Some(dest.to_path_buf());
            Ok(())
        }
    }

    fn index(hashes: &[Option<&str>]) -> LogIndex {
        let date = parse_log_date("01-Jan-2022 10:00:00").unwrap();
        LogIndex::new(
            hashes
                .iter()
                .map(|hash| {
                    let mut e = LogEntry::new("Test", date, "a.log");
                    if let Some(hash) = hash {
                        e.fields.insert(HASH_FIELD.to_string(), hash.to_string());
                    }
                    e
                })
                .collect(),
        )
    }

    #[test]
    fn test_ancestors_and_self_match() {
        let idx = index(&[Some("a"), Some("b dty"), Some("c"), Some("x")]);
        let git = FakeGit::default();

        let found = ancestor_matches(&idx, &git, "b", "/repo").unwrap();

        assert_eq!(found, BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_side_branch_excluded_from_main() {
        let idx = index(&[Some("a"), Some("x"), Some("c")]);
        let git = FakeGit::default();

        let found = ancestor_matches(&idx, &git, "main", "/repo").unwrap();

        assert_eq!(found, BTreeSet::from([0, 2]));
    }

    #[test]
    fn test_unknown_and_missing_hashes_are_skipped() {
        let idx = index(&[None, Some("deadbeef"), Some("  "), Some("a")]);
        let git = FakeGit::default();

        let found = ancestor_matches(&idx, &git, "main", "/repo").unwrap();

        assert_eq!(found, BTreeSet::from([3]));
    }

    #[test]
    fn test_each_hash_checked_once() {
        let idx = index(&[Some("a"), Some("a"), Some("a dty"), Some("b")]);
        let git = FakeGit::default();

        ancestor_matches(&idx, &git, "main", "/repo").unwrap();

        assert_eq!(git.checks.get(), 2);
    }

    #[test]
    fn test_bad_reference_revision_fails() {
        let idx = index(&[Some("a")]);
        let git = FakeGit::default();

        let err = ancestor_matches(&idx, &git, "nope", "/repo").unwrap_err();

        assert!(matches!(err, Error::ExternalTool { status: Some(128), .. }));
    }

    #[test]
    fn test_legacy_hash_field() {
        let mut idx = index(&[None]);
        idx.entries[0]
            .fields
            .insert("GitHash".to_string(), "a".to_string());

        assert_eq!(entry_hash(&idx.entries[0]), Some("a"));
    }

    #[test]
    fn test_clone_removed_even_with_readonly_objects() {
        let idx = index(&[Some("a")]);
        let git = FakeGit::default();

        let found = ancestor_matches(&idx, &git, "main", "https://example.com/repo.git").unwrap();

        assert_eq!(found.len(), 1);
        let clone = git.cloned_into.borrow().clone().unwrap();
        assert!(!clone.exists());
    }

    #[test]
    fn test_clone_removed_on_failure() {
        let idx = index(&[Some("a")]);
        let git = FakeGit::default();

        assert!(ancestor_matches(&idx, &git, "nope", "git@example.com:repo.git").is_err());

        let clone = git.cloned_into.borrow().clone().unwrap();
        assert!(!clone.exists());
    }

    #[test]
    fn test_git_url_detection() {
        assert!(is_git_url("git@github.com:org/repo.git"));
        assert!(is_git_url("https://github.com/org/repo"));
        assert!(!is_git_url("/home/me/repo"));
        assert!(!is_git_url("C:\\repos\\thing"));
    }
}
