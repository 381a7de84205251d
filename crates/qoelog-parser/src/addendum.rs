//! Addendum (`*.ad-log`) merger
//!
//! An addendum packet names an existing entry by its header and overwrites
//! some of its free-form fields. Addenda are trusted input, so every anomaly
//! is fatal.

use qoelog_types::{Error, Location, LogIndex, Result, base_name, is_fixed_field};
use std::path::Path;

use crate::header::{START_MARKER, parse_header};

const END_MARKER: &str = "<<";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddendumState {
    Searching,
    /// Patching the entry at this index
    Preamble(usize),
}

impl AddendumState {
    fn name(&self) -> &'static str {
        match self {
            AddendumState::Searching => "searching",
            AddendumState::Preamble(_) => "preamble",
        }
    }
}

pub fn apply_addendum_file(index: &mut LogIndex, path: &Path) -> Result<()> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    tracing::info!(path = %path.display(), "applying addendum");
    apply_addendum(index, &base_name(path), &text)
}

/// Apply addendum text that came from a file called `file_name`
pub fn apply_addendum(index: &mut LogIndex, file_name: &str, text: &str) -> Result<()> {
    let mut state = AddendumState::Searching;
    let mut line_count = 0;

    for (i, line) in text.lines().enumerate() {
        let at = Location::new(file_name, i + 1);
        line_count = i + 1;

        if line.starts_with(START_MARKER) {
            if state != AddendumState::Searching {
                return Err(Error::Sequence {
                    at,
                    message: format!("start of addendum found while in {} mode", state.name()),
                });
            }
            state = AddendumState::Preamble(open_entry(index, file_name, line, at)?);
            continue;
        }

        let AddendumState::Preamble(target) = state else {
            continue;
        };

        if line.starts_with('\t') {
            patch_field(index, target, line, at)?;
        } else if line.starts_with(END_MARKER) {
            state = AddendumState::Searching;
        } else {
            return Err(Error::Sequence {
                at,
                message: format!("expected a tab-indented field or '<<', found {:?}", line),
            });
        }
    }

    if state != AddendumState::Searching {
        return Err(Error::Sequence {
            at: Location::new(file_name, line_count + 1),
            message: "end of file before '<<'".to_string(),
        });
    }
    Ok(())
}

/// Find the entry named by a `>>` line and claim it for this addendum
fn open_entry(index: &mut LogIndex, file_name: &str, line: &str, at: Location) -> Result<usize> {
    let header = parse_header(line).map_err(|e| e.into_error(at.clone(), line))?;
    let key = line.trim();
    let target = index.lookup_unique(&header.date, Some(&header.operation), &at, key)?;

    let entry = &mut index.entries[target];
    if !entry.amended_by.is_empty() {
        return Err(Error::AlreadyAmended {
            at,
            key: key.to_string(),
            previous: entry.amended_by.clone(),
        });
    }
    entry.amended_by = file_name.to_string();
    Ok(target)
}

fn patch_field(index: &mut LogIndex, target: usize, line: &str, at: Location) -> Result<()> {
    let (name, value) = line.split_once(':').unwrap_or((line, ""));
    let name = name.trim();

    if is_fixed_field(name) {
        return Err(Error::ImmutableField {
            at,
            name: name.to_string(),
        });
    }
    if !index.entries[target].replace_text_field(name, value) {
        return Err(Error::UnknownField {
            at,
            name: name.to_string(),
        });
    }
    Ok(())
}
