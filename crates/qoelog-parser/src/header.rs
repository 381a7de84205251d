use chrono::NaiveDateTime;
use qoelog_types::{Error, Location, parse_log_date};

/// Marker that opens a packet in logs and addenda
pub const START_MARKER: &str = ">>";

const STARTED_SUFFIX: &str = " started";

/// `>>` line split into operation and timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketHeader {
    pub operation: String,
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// No ` at ` separator
    MissingDate,
    /// Text after ` at ` is not a `DD-Mon-YYYY HH:MM:SS` timestamp
    BadDate(String),
}

impl HeaderError {
    pub fn into_error(self, at: Location, line: &str) -> Error {
        match self {
            HeaderError::MissingDate => Error::InvalidHeader {
                at,
                line: line.to_string(),
            },
            HeaderError::BadDate(text) => Error::InvalidDate { at, text },
        }
    }
}

/// Parse `>><operation>[ started] at <DD-Mon-YYYY HH:MM:SS>`
pub fn parse_header(line: &str) -> Result<PacketHeader, HeaderError> {
    let line = line.trim();
    let (op, date_text) = line.rsplit_once(" at ").ok_or(HeaderError::MissingDate)?;
    let date =
        parse_log_date(date_text).ok_or_else(|| HeaderError::BadDate(date_text.to_string()))?;

    // two-character start marker
    let op = op.get(START_MARKER.len()..).unwrap_or_default();
    let op = op.strip_suffix(STARTED_SUFFIX).unwrap_or(op);

    Ok(PacketHeader {
        operation: op.to_string(),
        date,
    })
}
