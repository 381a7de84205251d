use qoelog_types::{ArgValue, LogEntry, LogIndex};
use std::collections::BTreeSet;
use std::path::Path;

use crate::args::match_arguments;
use crate::criteria::{Criteria, Criterion};
use crate::error::Result;
use crate::found::{FoundSet, UpdateMode};
use crate::matcher::{StringSearchMode, match_entries};

/// A parsed log index plus the query state over it
///
/// Every search returns its own matches and folds them into the found set
/// according to `update_mode`.
#[derive(Debug, Clone)]
pub struct LogSearch {
    index: LogIndex,
    found: FoundSet,
    pub update_mode: UpdateMode,
    pub string_mode: StringSearchMode,
}

impl LogSearch {
    pub fn new(index: LogIndex) -> Self {
        Self {
            index,
            found: FoundSet::default(),
            update_mode: UpdateMode::default(),
            string_mode: StringSearchMode::default(),
        }
    }

    pub fn with_modes(mut self, update_mode: UpdateMode, string_mode: StringSearchMode) -> Self {
        self.update_mode = update_mode;
        self.string_mode = string_mode;
        self
    }

    /// Search a single field
    pub fn quick_search(&mut self, field: &str, criterion: Criterion) -> Result<BTreeSet<usize>> {
        self.multi_search(&Criteria::new().with(field, criterion))
    }

    /// Search several fields at once; all of them must match
    pub fn multi_search(&mut self, criteria: &Criteria) -> Result<BTreeSet<usize>> {
        let matches = match_entries(&self.index, criteria, self.string_mode)?;
        tracing::debug!(
            criteria = criteria.len(),
            matches = matches.len(),
            "field search"
        );
        self.apply_result(matches.clone());
        Ok(matches)
    }

    /// Search the parsed `Arguments` field
    pub fn arg_search(&mut self, name: &str, value: &ArgValue) -> Result<BTreeSet<usize>> {
        let matches = match_arguments(&self.index, name, value)?;
        tracing::debug!(argument = name, matches = matches.len(), "argument search");
        self.apply_result(matches.clone());
        Ok(matches)
    }

    /// Value of argument `name` for each found entry, in index order
    pub fn arg_query(&self, name: &str) -> Vec<Option<&ArgValue>> {
        self.found_entries()
            .map(|(_, entry)| entry.arguments.as_ref().and_then(|args| args.get(name)))
            .collect()
    }

    /// Fold an externally computed match set into the found set
    pub fn apply_result(&mut self, matches: BTreeSet<usize>) {
        self.found.apply(matches, self.update_mode);
    }

    pub fn clear(&mut self) {
        self.found.clear();
    }

    pub fn found(&self) -> &BTreeSet<usize> {
        self.found.ids()
    }

    pub fn is_cleared(&self) -> bool {
        self.found.is_cleared()
    }

    /// Found entries with their indices, ascending
    pub fn found_entries(&self) -> impl Iterator<Item = (usize, &LogEntry)> {
        self.found
            .ids()
            .iter()
            .filter_map(|&i| self.index.get(i).map(|entry| (i, entry)))
    }

    pub fn index(&self) -> &LogIndex {
        &self.index
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.index.entries
    }

    /// Number of entries in the index
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn field_names(&self) -> BTreeSet<String> {
        self.index.field_names()
    }

    pub fn search_path(&self) -> &Path {
        &self.index.search_path
    }
}

impl From<LogIndex> for LogSearch {
    fn from(index: LogIndex) -> Self {
        Self::new(index)
    }
}
