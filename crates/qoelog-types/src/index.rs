use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::diagnostic::Diagnostic;
use crate::entry::LogEntry;
use crate::error::{Error, Location, Result};

/// Ordered, index-stable list of parsed entries
///
/// Entries are only ever appended while scanning; addenda and group files
/// mutate them in place by position.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LogIndex {
    pub entries: Vec<LogEntry>,
    pub groups: GroupRegistry,
    /// Directory the logs were loaded from, used to resolve data files
    pub search_path: PathBuf,
    /// Non-fatal scanner diagnostics kept under the `Warn` policy
    pub diagnostics: Vec<Diagnostic>,
}

impl LogIndex {
    pub fn new(entries: Vec<LogEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LogEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Indices of entries with this exact date (and operation, if given)
    pub fn lookup(&self, date: &NaiveDateTime, operation: Option<&str>) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.date == *date && operation.is_none_or(|op| e.operation == op))
            .map(|(i, _)| i)
            .collect()
    }

    /// Like [`LogIndex::lookup`] but exactly one entry must match
    pub fn lookup_unique(
        &self,
        date: &NaiveDateTime,
        operation: Option<&str>,
        at: &Location,
        key: &str,
    ) -> Result<usize> {
        let found = self.lookup(date, operation);
        match found.as_slice() {
            [index] => Ok(*index),
            [] => Err(Error::NotFound {
                at: at.clone(),
                key: key.to_string(),
            }),
            _ => Err(Error::AmbiguousMatch {
                at: at.clone(),
                key: key.to_string(),
                count: found.len(),
            }),
        }
    }

    /// Union of field names over all entries
    pub fn field_names(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .flat_map(|e| e.field_names())
            .map(str::to_string)
            .collect()
    }
}

/// Groups defined by group files
///
/// Group identifiers are composite: `<group file base name>:<group name>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupRegistry {
    files: BTreeMap<String, BTreeSet<String>>,
    members: BTreeMap<String, BTreeSet<usize>>,
}

impl GroupRegistry {
    pub fn composite_id(file: &str, group: &str) -> String {
        format!("{}:{}", file, group)
    }

    /// Make sure `file` is known even if it defines no group
    pub fn register_file(&mut self, file: &str) {
        self.files.entry(file.to_string()).or_default();
    }

    pub fn add(&mut self, file: &str, group_id: &str, index: usize) {
        self.files
            .entry(file.to_string())
            .or_default()
            .insert(group_id.to_string());
        self.members
            .entry(group_id.to_string())
            .or_default()
            .insert(index);
    }

    /// Group identifiers defined by one group file
    pub fn groups_in_file(&self, file: &str) -> Option<&BTreeSet<String>> {
        self.files.get(file)
    }

    /// Entry indices belonging to a group identifier
    pub fn members(&self, group_id: &str) -> Option<&BTreeSet<usize>> {
        self.members.get(group_id)
    }

    /// Every known group identifier
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::parse_log_date;

    fn index() -> LogIndex {
        let d1 = parse_log_date("01-Jan-2022 10:00:00").unwrap();
        let d2 = parse_log_date("02-Jan-2022 10:00:00").unwrap();
        LogIndex::new(vec![
            LogEntry::new("Test", d1, "a.log"),
            LogEntry::new("Access", d1, "a.log"),
            LogEntry::new("Test", d2, "a.log"),
        ])
    }

    #[test]
    fn test_lookup_by_date_and_operation() {
        let idx = index();
        let d1 = parse_log_date("01-Jan-2022 10:00:00").unwrap();

        assert_eq!(idx.lookup(&d1, None), vec![0, 1]);
        assert_eq!(idx.lookup(&d1, Some("Access")), vec![1]);
    }

    #[test]
    fn test_lookup_unique_reports_zero_and_many() {
        let idx = index();
        let at = Location::new("x.gr-log", 2);
        let d1 = parse_log_date("01-Jan-2022 10:00:00").unwrap();
        let d3 = parse_log_date("03-Jan-2022 10:00:00").unwrap();

        assert_eq!(idx.lookup_unique(&d1, Some("Test"), &at, "k").unwrap(), 0);
        assert!(matches!(
            idx.lookup_unique(&d1, None, &at, "k"),
            Err(Error::AmbiguousMatch { count: 2, .. })
        ));
        assert!(matches!(
            idx.lookup_unique(&d3, None, &at, "k"),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_registry_tracks_files_and_members() {
        let mut reg = GroupRegistry::default();
        reg.register_file("empty.gr-log");
        let id = GroupRegistry::composite_id("runs.gr-log", "runA");
        reg.add("runs.gr-log", &id, 0);
        reg.add("runs.gr-log", &id, 2);

        assert_eq!(id, "runs.gr-log:runA");
        assert!(reg.groups_in_file("empty.gr-log").unwrap().is_empty());
        assert_eq!(reg.members(&id).unwrap().len(), 2);
        assert_eq!(reg.all().collect::<Vec<_>>(), vec!["runs.gr-log:runA"]);
    }

    #[test]
    fn test_field_names_union() {
        let mut idx = index();
        idx.entries[2]
            .fields
            .insert("MOS".to_string(), "4.5".to_string());

        let names = idx.field_names();
        assert!(names.contains("MOS"));
        assert!(names.contains("logFile"));
        assert!(!names.contains("pre_notes"));
    }
}
