use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::arguments::Arguments;
use crate::util::format_log_date;

/// Fields an addendum may never change
pub const FIXED_FIELDS: [&str; 11] = [
    "error",
    "complete",
    "operation",
    "GitHash",
    "logFile",
    "amendedBy",
    "date",
    "Arguments",
    "filename",
    "InputFile",
    "OutputFile",
];

/// Typed core fields that only the scanner and group loader write
const STRUCTURED_FIELDS: [&str; 2] = ["groups", "_Arguments"];

/// Whether `name` is protected against amendment
pub fn is_fixed_field(name: &str) -> bool {
    FIXED_FIELDS.contains(&name) || STRUCTURED_FIELDS.contains(&name)
}

/// Multi-line note sections of a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesField {
    Pre,
    Post,
    Error,
}

impl NotesField {
    pub fn name(&self) -> &'static str {
        match self {
            NotesField::Pre => "pre_notes",
            NotesField::Post => "post_notes",
            NotesField::Error => "error_notes",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pre_notes" => Some(NotesField::Pre),
            "post_notes" => Some(NotesField::Post),
            "error_notes" => Some(NotesField::Error),
            _ => None,
        }
    }
}

/// Borrowed view of one field of a [`LogEntry`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Flag(bool),
    Date(NaiveDateTime),
    Set(&'a BTreeSet<String>),
}

/// One parsed test run
///
/// The fixed core is typed; free-form preamble fields live in `fields`.
/// Field names used by queries are the on-disk names (`logFile`,
/// `amendedBy`, `pre_notes`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub date: NaiveDateTime,
    pub operation: String,
    pub complete: bool,
    pub error: bool,
    #[serde(rename = "logFile")]
    pub log_file: String,
    #[serde(rename = "amendedBy")]
    pub amended_by: String,
    pub groups: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_notes: Option<String>,
    #[serde(rename = "_Arguments", skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Arguments>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl LogEntry {
    /// Fresh, incomplete entry as created by a packet start line
    pub fn new(
        operation: impl Into<String>,
        date: NaiveDateTime,
        log_file: impl Into<String>,
    ) -> Self {
        Self {
            date,
            operation: operation.into(),
            complete: false,
            error: false,
            log_file: log_file.into(),
            amended_by: String::new(),
            groups: BTreeSet::new(),
            pre_notes: None,
            post_notes: None,
            error_notes: None,
            arguments: None,
            fields: BTreeMap::new(),
        }
    }

    /// Look a field up by its on-disk name
    pub fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        match name {
            "date" => Some(FieldValue::Date(self.date)),
            "operation" => Some(FieldValue::Text(&self.operation)),
            "complete" => Some(FieldValue::Flag(self.complete)),
            "error" => Some(FieldValue::Flag(self.error)),
            "logFile" => Some(FieldValue::Text(&self.log_file)),
            "amendedBy" => Some(FieldValue::Text(&self.amended_by)),
            "groups" => Some(FieldValue::Set(&self.groups)),
            "pre_notes" => self.pre_notes.as_deref().map(FieldValue::Text),
            "post_notes" => self.post_notes.as_deref().map(FieldValue::Text),
            "error_notes" => self.error_notes.as_deref().map(FieldValue::Text),
            _ => self.fields.get(name).map(|v| FieldValue::Text(v.as_str())),
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        if name == "_Arguments" {
            return self.arguments.is_some();
        }
        self.field(name).is_some()
    }

    /// All field names present on this entry
    pub fn field_names(&self) -> Vec<&str> {
        let mut names = vec![
            "date",
            "operation",
            "complete",
            "error",
            "logFile",
            "amendedBy",
            "groups",
        ];
        for notes in [NotesField::Pre, NotesField::Post, NotesField::Error] {
            if self.notes(notes).is_some() {
                names.push(notes.name());
            }
        }
        if self.arguments.is_some() {
            names.push("_Arguments");
        }
        names.extend(self.fields.keys().map(String::as_str));
        names
    }

    pub fn notes(&self, which: NotesField) -> Option<&str> {
        match which {
            NotesField::Pre => self.pre_notes.as_deref(),
            NotesField::Post => self.post_notes.as_deref(),
            NotesField::Error => self.error_notes.as_deref(),
        }
    }

    fn notes_slot(&mut self, which: NotesField) -> &mut Option<String> {
        match which {
            NotesField::Pre => &mut self.pre_notes,
            NotesField::Post => &mut self.post_notes,
            NotesField::Error => &mut self.error_notes,
        }
    }

    /// Open (or reset) a notes section
    pub fn start_notes(&mut self, which: NotesField) {
        *self.notes_slot(which) = Some(String::new());
    }

    /// Append one line to a notes section, newline separated
    pub fn append_note(&mut self, which: NotesField, line: &str) {
        let slot = self.notes_slot(which).get_or_insert_with(String::new);
        if !slot.is_empty() {
            slot.push('\n');
        }
        slot.push_str(line);
    }

    /// Overwrite an existing free-text field; returns false if there is none
    ///
    /// Core fields are not reachable through here, only notes and preamble
    /// fields.
    pub fn replace_text_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        let slot = match name {
            "pre_notes" => self.pre_notes.as_mut(),
            "post_notes" => self.post_notes.as_mut(),
            "error_notes" => self.error_notes.as_mut(),
            _ => self.fields.get_mut(name),
        };
        match slot {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// `<operation> at <date>`, the packet header text
    pub fn header(&self) -> String {
        format!("{} at {}", self.operation, format_log_date(&self.date))
    }
}
