//! Map log entries back to the data files a run left on disk
//!
//! Which folder and file name pattern belong to an entry depends on its
//! operation and on the requested file category. Both live in a
//! [`ResolverTable`] so new operation types only need configuration.

use qoelog_types::{LogEntry, format_file_date};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Extension, singularity and exclusion applied when matching file names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFormat {
    /// Required file name suffix; empty matches anything
    #[serde(default)]
    pub extension: String,
    /// Exactly one file is expected per entry
    #[serde(default)]
    pub singular: bool,
    /// File names containing this text are skipped
    #[serde(default)]
    pub exclude: Option<String>,
}

/// One requestable data file category (`csv`, `wav`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTypeSpec {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Folder below the search root, `/` separated
    pub folder: String,
    #[serde(default)]
    pub extension: String,
    #[serde(default)]
    pub singular: bool,
    #[serde(default)]
    pub exclude: Option<String>,
}

impl FileTypeSpec {
    fn new(name: &str, extension: &str, folder: &str, singular: bool) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            folder: folder.to_string(),
            extension: extension.to_string(),
            singular,
            exclude: None,
        }
    }

    fn exclude(mut self, text: &str) -> Self {
        self.exclude = Some(text.to_string());
        self
    }

    fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn format(&self) -> FileFormat {
        FileFormat {
            extension: self.extension.clone(),
            singular: self.singular,
            exclude: self.exclude.clone(),
        }
    }

    fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

/// A `prefix*` glob tried in one folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStep {
    pub prefix: String,
    /// Folder below the search root; the category folder when absent
    #[serde(default)]
    pub folder: Option<String>,
}

impl SearchStep {
    fn in_category(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            folder: None,
        }
    }

    fn in_folder(prefix: &str, folder: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            folder: Some(folder.to_string()),
        }
    }
}

/// How entries of some operations find their files
///
/// Steps are tried in order; the first one that produces a result wins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperationRule {
    /// Operation names this rule applies to exactly
    #[serde(default)]
    pub operations: Vec<String>,
    /// Applies to every operation starting with this text
    #[serde(default)]
    pub operation_prefix: Option<String>,
    #[serde(default)]
    pub steps: Vec<SearchStep>,
    /// Replaces the category's format when present
    #[serde(default)]
    pub format: Option<FileFormat>,
    /// Entries of these operations never have data files
    #[serde(default)]
    pub not_applicable: bool,
}

impl OperationRule {
    fn applies_to(&self, operation: &str) -> bool {
        self.operations.iter().any(|op| op == operation)
            || self
                .operation_prefix
                .as_deref()
                .is_some_and(|prefix| operation.starts_with(prefix))
    }
}

/// File categories plus per-operation rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverTable {
    pub file_types: Vec<FileTypeSpec>,
    pub operations: Vec<OperationRule>,
}

impl Default for ResolverTable {
    fn default() -> Self {
        let capture_mat = |prefixes: [&str; 2], folder: &str| OperationRule {
            steps: prefixes
                .iter()
                .map(|p| SearchStep::in_folder(p, folder))
                .collect(),
            format: Some(FileFormat {
                extension: ".mat".to_string(),
                singular: true,
                exclude: None,
            }),
            ..Default::default()
        };

        let mut tx = capture_mat(["Tx_capture", "capture"], "tx-data");
        tx.operations = vec!["Tx Two Loc Test".to_string()];
        let mut rx = capture_mat(["Rx_capture", "capture"], "rx-data");
        rx.operations = vec!["Rx Two Loc Test".to_string()];
        let mut training = capture_mat(["Training_", "Training_"], "training");
        training.operations = vec!["Training".to_string()];
        training.steps[1].folder = Some("data".to_string());

        Self {
            file_types: vec![
                FileTypeSpec::new("csv", ".csv", "data/csv", false).exclude("_BAD.csv"),
                FileTypeSpec::new("mat", ".mat", "data_matfiles", true),
                FileTypeSpec::new("bad_csv", "_BAD.csv", "post-processed data/csv", false),
                FileTypeSpec::new("wav", "", "data/wav", true),
                FileTypeSpec::new("sm_mat", ".mat", "post-processed data/mat", true)
                    .alias("small_mat"),
            ],
            operations: vec![
                OperationRule {
                    operations: ["Test", "Intelligibility", "PSuD", "Access", "M2E"]
                        .map(String::from)
                        .to_vec(),
                    steps: vec![
                        SearchStep::in_category("Rcapture_"),
                        SearchStep::in_category("capture_"),
                    ],
                    ..Default::default()
                },
                training,
                tx,
                rx,
                OperationRule {
                    operation_prefix: Some("Copy".to_string()),
                    not_applicable: true,
                    ..Default::default()
                },
            ],
        }
    }
}

impl ResolverTable {
    /// Look up a category; accepts a leading `.` and any letter case
    pub fn file_type(&self, name: &str) -> Result<&FileTypeSpec> {
        let wanted = name.trim();
        let wanted = wanted.strip_prefix('.').unwrap_or(wanted);
        self.file_types
            .iter()
            .find(|spec| spec.answers_to(wanted))
            .ok_or_else(|| Error::UnknownFileType(name.to_string()))
    }

    pub fn rule_for(&self, operation: &str) -> Option<&OperationRule> {
        self.operations.iter().find(|rule| rule.applies_to(operation))
    }
}

/// What resolution found for one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// One path for singular categories, one or more otherwise
    Files(Vec<PathBuf>),
    Incomplete,
    Error,
    NoMatch,
    Multiple,
    NotApplicable,
}

impl FileOutcome {
    pub fn files(&self) -> &[PathBuf] {
        match self {
            FileOutcome::Files(paths) => paths,
            _ => &[],
        }
    }

    /// Text shown in place of a path for the sentinel outcomes
    pub fn label(&self) -> &'static str {
        match self {
            FileOutcome::Files(_) => "file",
            FileOutcome::Incomplete => ":Incomplete",
            FileOutcome::Error => ":Error",
            FileOutcome::NoMatch => ":NoMatch",
            FileOutcome::Multiple => ":Multiple",
            FileOutcome::NotApplicable => ":None",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFiles {
    pub index: usize,
    pub outcome: FileOutcome,
}

/// Resolves entries against one search root
#[derive(Debug, Clone)]
pub struct FileResolver<'a> {
    table: &'a ResolverTable,
    root: PathBuf,
    ignore_incomplete: bool,
}

impl<'a> FileResolver<'a> {
    pub fn new(table: &'a ResolverTable, root: impl Into<PathBuf>) -> Self {
        Self {
            table,
            root: root.into(),
            ignore_incomplete: false,
        }
    }

    /// Resolve incomplete entries instead of reporting them as incomplete
    pub fn ignore_incomplete(mut self, ignore: bool) -> Self {
        self.ignore_incomplete = ignore;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve every entry; an operation without a rule aborts the batch
    pub fn resolve<'e, I>(&self, entries: I, file_type: &str) -> Result<Vec<ResolvedFiles>>
    where
        I: IntoIterator<Item = (usize, &'e LogEntry)>,
    {
        let spec = self.table.file_type(file_type)?;
        entries
            .into_iter()
            .map(|(index, entry)| {
                Ok(ResolvedFiles {
                    index,
                    outcome: self.resolve_entry(entry, spec)?,
                })
            })
            .collect()
    }

    pub fn resolve_entry(&self, entry: &LogEntry, spec: &FileTypeSpec) -> Result<FileOutcome> {
        let rule = self
            .table
            .rule_for(&entry.operation)
            .ok_or_else(|| Error::UnknownOperation(entry.operation.clone()))?;

        if rule.not_applicable {
            return Ok(FileOutcome::NotApplicable);
        }
        if !self.ignore_incomplete && !entry.complete {
            return Ok(FileOutcome::Incomplete);
        }
        if entry.error {
            return Ok(FileOutcome::Error);
        }

        let format = rule.format.clone().unwrap_or_else(|| spec.format());
        let date = format_file_date(&entry.date);

        for step in &rule.steps {
            let folder = folder_path(&self.root, step.folder.as_deref().unwrap_or(&spec.folder));
            let mut matches = matching_files(&folder, &step.prefix, &format, &date)?;

            if matches.is_empty() {
                continue;
            }
            if !format.singular {
                matches.sort();
                return Ok(FileOutcome::Files(matches));
            }
            if matches.len() > 1 {
                tracing::warn!(
                    date = %date,
                    folder = %folder.display(),
                    count = matches.len(),
                    "more than one file matches"
                );
                return Ok(FileOutcome::Multiple);
            }
            return Ok(FileOutcome::Files(matches));
        }

        tracing::warn!(
            date = %date,
            root = %self.root.display(),
            operation = %entry.operation,
            "no matching files"
        );
        Ok(FileOutcome::NoMatch)
    }
}

fn folder_path(root: &Path, folder: &str) -> PathBuf {
    folder
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

fn matching_files(
    folder: &Path,
    prefix: &str,
    format: &FileFormat,
    date: &str,
) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = format!(
        "{}{}{}*{}",
        glob::Pattern::escape(&folder.to_string_lossy()),
        std::path::MAIN_SEPARATOR,
        glob::Pattern::escape(prefix),
        glob::Pattern::escape(&format.extension)
    );

    let mut matches = Vec::new();
    for path in glob::glob(&pattern)? {
        let path = match path {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable path");
                continue;
            }
        };
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            continue;
        };
        let excluded = format
            .exclude
            .as_deref()
            .is_some_and(|text| !text.is_empty() && name.contains(text));
        if name.contains(date) && !excluded {
            matches.push(path);
        }
    }
    Ok(matches)
}
