//! Record scanner for primary `*.log` files
//!
//! Each file is walked line by line through an explicit [`ScanState`]. Every
//! state has its own transition function that returns the next state plus the
//! diagnostics raised by the line; the [`Scanner`] routes those diagnostics
//! through the configured [`DiagnosticHandler`].
//!
//! Entries accumulate across files, so several logs can be scanned back to
//! back into one index. The state itself is reset for every file.

use qoelog_types::{
    Diagnostic, DiagnosticKind, Location, LogEntry, NotesField, ParsePolicy, Result, base_name,
};
use std::fmt;
use std::path::Path;

use crate::arguments::parse_arguments;
use crate::header::{START_MARKER, parse_header};
use crate::policy::{DiagnosticHandler, handler_for};

const SEPARATOR: &str = "===";
const END_SEPARATOR: &str = "===End";
const PRE_NOTES_SEPARATOR: &str = "===Pre-Test Notes===";
const POST_NOTES_SEPARATOR: &str = "===Post-Test Notes===";
const ERROR_NOTES_SEPARATOR: &str = "===Test-Error Notes===";
const PARSED_ARGUMENTS: &str = "_Arguments";

/// Scanner position inside the current packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Searching,
    PreambleStart,
    Preamble,
    PreNotes,
    /// Inside post-test or test-error notes
    PostNotes(NotesField),
}

impl ScanState {
    pub fn name(&self) -> &'static str {
        match self {
            ScanState::Searching => "searching",
            ScanState::PreambleStart => "preamble-start",
            ScanState::Preamble => "preamble",
            ScanState::PreNotes => "pre-notes",
            ScanState::PostNotes(_) => "post-notes",
        }
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of feeding one line to a state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: ScanState,
    pub diagnostics: Vec<DiagnosticKind>,
}

impl Transition {
    fn to(next: ScanState) -> Self {
        Self {
            next,
            diagnostics: Vec::new(),
        }
    }

    fn with(next: ScanState, diagnostic: DiagnosticKind) -> Self {
        Self {
            next,
            diagnostics: vec![diagnostic],
        }
    }
}

/// Everything collected by a [`Scanner`]
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    pub entries: Vec<LogEntry>,
    /// Diagnostics the handler chose to keep
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Scanner {
    handler: Box<dyn DiagnosticHandler>,
    output: ScanOutput,
}

impl Scanner {
    pub fn new(policy: ParsePolicy) -> Self {
        Self::with_handler(handler_for(policy))
    }

    pub fn with_handler(handler: Box<dyn DiagnosticHandler>) -> Self {
        Self {
            handler,
            output: ScanOutput::default(),
        }
    }

    /// Scan one log file from disk, appending its packets
    pub fn scan_file(&mut self, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        tracing::info!(path = %path.display(), "scanning log file");
        self.scan_text(&base_name(path), &text)
    }

    /// Scan log text that came from a file called `file_name`
    pub fn scan_text(&mut self, file_name: &str, text: &str) -> Result<()> {
        let first_new = self.output.entries.len();
        let mut state = ScanState::Searching;

        for (i, line) in text.lines().enumerate() {
            let mut diagnostics = Vec::new();

            if line.starts_with(START_MARKER) {
                if state != ScanState::Searching {
                    diagnostics.push(DiagnosticKind::StartOutOfSequence {
                        state: state.name().to_string(),
                    });
                }
                state = ScanState::PreambleStart;
            }

            let transition = self.step(state, file_name, line);
            diagnostics.extend(transition.diagnostics);
            state = transition.next;

            for kind in diagnostics {
                self.report(Diagnostic::new(Location::new(file_name, i + 1), kind))?;
            }
        }

        tracing::debug!(
            file = file_name,
            entries = self.output.entries.len() - first_new,
            final_state = %state,
            "finished log file"
        );
        Ok(())
    }

    pub fn finish(self) -> ScanOutput {
        self.output
    }

    fn step(&mut self, state: ScanState, file_name: &str, line: &str) -> Transition {
        let entries = &mut self.output.entries;
        if state == ScanState::PreambleStart {
            return start_packet(entries, file_name, line);
        }

        // every other non-searching state was entered after a packet was appended
        let Some(entry) = entries.last_mut() else {
            return Transition::to(ScanState::Searching);
        };
        match state {
            ScanState::Searching | ScanState::PreambleStart => Transition::to(ScanState::Searching),
            ScanState::Preamble => preamble(entry, line),
            ScanState::PreNotes => pre_notes(entry, line),
            ScanState::PostNotes(active) => post_notes(entry, active, line),
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) -> Result<()> {
        if let Some(kept) = self.handler.handle(diagnostic)? {
            self.output.diagnostics.push(kept);
        }
        Ok(())
    }
}

fn start_packet(entries: &mut Vec<LogEntry>, file_name: &str, line: &str) -> Transition {
    match parse_header(line) {
        Ok(header) => {
            entries.push(LogEntry::new(header.operation, header.date, file_name));
            Transition::to(ScanState::Preamble)
        }
        Err(_) => Transition::with(
            ScanState::Searching,
            DiagnosticKind::MalformedHeader {
                line: line.to_string(),
            },
        ),
    }
}

fn preamble(entry: &mut LogEntry, line: &str) -> Transition {
    if line.starts_with('\t') {
        return store_field(entry, line);
    }
    if line.is_empty() {
        return Transition::with(ScanState::Preamble, DiagnosticKind::EmptyPreambleLine);
    }
    if !line.starts_with(SEPARATOR) {
        if line.contains(':') {
            return store_field(entry, line);
        }
        return unknown_sequence(line);
    }

    match line.trim_end() {
        l if l.starts_with(END_SEPARATOR) => complete(entry),
        PRE_NOTES_SEPARATOR => {
            entry.start_notes(NotesField::Pre);
            Transition::to(ScanState::PreNotes)
        }
        POST_NOTES_SEPARATOR => {
            entry.start_notes(NotesField::Post);
            Transition::to(ScanState::PostNotes(NotesField::Post))
        }
        _ => unknown_separator(line),
    }
}

fn pre_notes(entry: &mut LogEntry, line: &str) -> Transition {
    if let Some(note) = line.strip_prefix('\t') {
        entry.append_note(NotesField::Pre, note);
        return Transition::to(ScanState::PreNotes);
    }
    if !line.starts_with(SEPARATOR) {
        return unknown_sequence(line);
    }

    match line.trim_end() {
        l if l.starts_with(END_SEPARATOR) => complete(entry),
        POST_NOTES_SEPARATOR => {
            entry.start_notes(NotesField::Post);
            Transition::to(ScanState::PostNotes(NotesField::Post))
        }
        ERROR_NOTES_SEPARATOR => {
            entry.start_notes(NotesField::Error);
            entry.error = true;
            Transition::to(ScanState::PostNotes(NotesField::Error))
        }
        _ => unknown_separator(line),
    }
}

fn post_notes(entry: &mut LogEntry, active: NotesField, line: &str) -> Transition {
    if let Some(note) = line.strip_prefix('\t') {
        entry.append_note(active, note);
        return Transition::to(ScanState::PostNotes(active));
    }
    if !line.starts_with(SEPARATOR) {
        return unknown_sequence(line);
    }
    if line.starts_with(END_SEPARATOR) {
        return complete(entry);
    }
    unknown_separator(line)
}

/// `name:value` preamble line; the first value of a name wins
///
/// Note names fill their typed slot, which a later section of the same name
/// starts over. `_Arguments` only ever comes from parsing `Arguments`.
fn store_field(entry: &mut LogEntry, line: &str) -> Transition {
    let (name, value) = line.split_once(':').unwrap_or((line, ""));
    let name = name.trim();

    if name == PARSED_ARGUMENTS {
        return Transition::with(
            ScanState::Preamble,
            DiagnosticKind::ReservedField {
                name: name.to_string(),
            },
        );
    }
    if entry.has_field(name) {
        return Transition::with(
            ScanState::Preamble,
            DiagnosticKind::DuplicateField {
                name: name.to_string(),
            },
        );
    }
    if let Some(notes) = NotesField::from_name(name) {
        entry.start_notes(notes);
        entry.append_note(notes, value);
        return Transition::to(ScanState::Preamble);
    }

    let mut transition = Transition::to(ScanState::Preamble);
    if name == "Arguments" {
        let parsed = parse_arguments(value);
        entry.arguments = Some(parsed.values);
        transition.diagnostics = parsed
            .warnings
            .into_iter()
            .map(|w| DiagnosticKind::ConversionWarning { token: w.token })
            .collect();
    }
    entry.fields.insert(name.to_string(), value.to_string());
    transition
}

fn complete(entry: &mut LogEntry) -> Transition {
    entry.complete = true;
    Transition::to(ScanState::Searching)
}

fn unknown_sequence(line: &str) -> Transition {
    Transition::with(
        ScanState::Searching,
        DiagnosticKind::UnknownSequence {
            line: line.to_string(),
        },
    )
}

fn unknown_separator(line: &str) -> Transition {
    Transition::with(
        ScanState::Searching,
        DiagnosticKind::UnknownSeparator {
            line: line.to_string(),
        },
    )
}
