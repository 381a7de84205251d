use qoelog_engine::LogSearch;
use qoelog_parser::SourceFiles;
use std::collections::BTreeSet;
use std::path::Path;

use crate::Result;
use crate::ancestry::{GitCli, VersionControl, ancestor_matches};
use crate::config::Config;
use crate::resolver::{FileResolver, ResolvedFiles};
use crate::sync::{SyncReport, sync_files};

/// A loaded log set, its query state and the configuration it was opened with
///
/// File resolution, sync and the ancestry filter all act on the current
/// found set of [`LogWorkspace::search`].
#[derive(Debug)]
pub struct LogWorkspace {
    search: LogSearch,
    config: Config,
}

impl LogWorkspace {
    /// Load `sources` with the configured parse policy and search modes
    pub fn open(sources: &SourceFiles, config: Config) -> Result<Self> {
        let index = qoelog_parser::load(sources, config.search.parse_policy)?;
        tracing::info!(
            entries = index.len(),
            diagnostics = index.diagnostics.len(),
            path = %index.search_path.display(),
            "log set loaded"
        );
        let search = LogSearch::new(index)
            .with_modes(config.search.update_mode, config.search.string_mode);
        Ok(Self { search, config })
    }

    /// Open a directory of logs, or a single log file
    pub fn open_path(path: &Path, config: Config) -> Result<Self> {
        Self::open(&SourceFiles::resolve(path)?, config)
    }

    pub fn search(&self) -> &LogSearch {
        &self.search
    }

    pub fn search_mut(&mut self) -> &mut LogSearch {
        &mut self.search
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Data files of the found entries below the search path
    pub fn resolve_files(
        &self,
        file_type: &str,
        ignore_incomplete: bool,
    ) -> Result<Vec<ResolvedFiles>> {
        FileResolver::new(&self.config.resolver, self.search.search_path())
            .ignore_incomplete(ignore_incomplete)
            .resolve(self.search.found_entries(), file_type)
    }

    /// Copy the found entries' data files into `local` and list them there
    pub fn sync(&self, local: &Path, file_type: &str) -> Result<SyncReport> {
        sync_files(
            &self.config.resolver,
            self.search.found_entries(),
            self.search.search_path(),
            local,
            file_type,
        )
    }

    /// Ancestry filter using the configured git executable
    pub fn filter_ancestors(&mut self, rev: &str, repo: &str) -> Result<BTreeSet<usize>> {
        let git = GitCli::new(&self.config.git.program);
        self.filter_ancestors_with(&git, rev, repo)
    }

    /// Match every entry against `rev` and fold the result into the found set
    pub fn filter_ancestors_with(
        &mut self,
        vcs: &dyn VersionControl,
        rev: &str,
        repo: &str,
    ) -> Result<BTreeSet<usize>> {
        let matches = ancestor_matches(self.search.index(), vcs, rev, repo)?;
        self.search.apply_result(matches.clone());
        Ok(matches)
    }
}
