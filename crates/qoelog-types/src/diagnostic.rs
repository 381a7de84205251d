use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Location;

/// Line-level anomaly found while scanning a primary log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub at: Location,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(at: Location, kind: DiagnosticKind) -> Self {
        Self { at, kind }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// `>>` seen while a packet was still open
    StartOutOfSequence { state: String },
    /// Non-separator line that is neither a field nor a note
    UnknownSequence { line: String },
    /// `===...===` marker not valid in the current section
    UnknownSeparator { line: String },
    EmptyPreambleLine,
    DuplicateField { name: String },
    /// Start line without a parsable `<operation> at <date>`
    MalformedHeader { line: String },
    /// Preamble line naming a field only note sections or the scanner set
    ReservedField { name: String },
    /// `Arguments` token kept as raw text
    ConversionWarning { token: String },
}

impl DiagnosticKind {
    /// Short machine name, used as a structured log field
    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticKind::StartOutOfSequence { .. } => "start_out_of_sequence",
            DiagnosticKind::UnknownSequence { .. } => "unknown_sequence",
            DiagnosticKind::UnknownSeparator { .. } => "unknown_separator",
            DiagnosticKind::EmptyPreambleLine => "empty_preamble_line",
            DiagnosticKind::DuplicateField { .. } => "duplicate_field",
            DiagnosticKind::MalformedHeader { .. } => "malformed_header",
            DiagnosticKind::ReservedField { .. } => "reserved_field",
            DiagnosticKind::ConversionWarning { .. } => "conversion_warning",
        }
    }

    /// Whether the `Error` policy may turn this into a fatal error
    ///
    /// Argument conversion is best effort and never aborts a parse.
    pub fn escalates(&self) -> bool {
        !matches!(self, DiagnosticKind::ConversionWarning { .. })
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::StartOutOfSequence { state } => {
                write!(f, "Start of packet found while in {} mode", state)
            }
            DiagnosticKind::UnknownSequence { line } => {
                write!(f, "Unknown sequence {:?}", line)
            }
            DiagnosticKind::UnknownSeparator { line } => {
                write!(f, "Unknown separator {:?}", line)
            }
            DiagnosticKind::EmptyPreambleLine => write!(f, "Empty line in preamble"),
            DiagnosticKind::DuplicateField { name } => write!(f, "Duplicate field {:?}", name),
            DiagnosticKind::MalformedHeader { line } => {
                write!(f, "Malformed packet header {:?}", line)
            }
            DiagnosticKind::ReservedField { name } => {
                write!(f, "Reserved field {:?} in preamble", name)
            }
            DiagnosticKind::ConversionWarning { token } => {
                write!(f, "Could not convert argument '{}'", token)
            }
        }
    }
}

/// What the scanner does with a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Log a warning, keep it in the index report and continue
    #[default]
    Warn,
    /// Abort the whole parse
    Error,
    /// Drop it silently
    Ignore,
}

impl fmt::Display for ParsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsePolicy::Warn => write!(f, "warn"),
            ParsePolicy::Error => write!(f, "error"),
            ParsePolicy::Ignore => write!(f, "ignore"),
        }
    }
}

impl FromStr for ParsePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "warn" => Ok(ParsePolicy::Warn),
            "error" => Ok(ParsePolicy::Error),
            "ignore" => Ok(ParsePolicy::Ignore),
            _ => Err(format!("invalid parse policy '{}'", s)),
        }
    }
}
