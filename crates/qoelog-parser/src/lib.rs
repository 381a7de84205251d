//! Readers for the three packet-log file kinds
//!
//! - `*.log`: primary logs, scanned by [`Scanner`]
//! - `*.ad-log`: addenda that patch scanned entries
//! - `*.gr-log`: group definitions
//!
//! [`load`] runs all three in that order over a [`SourceFiles`] set.

pub mod error;

pub mod addendum;
pub mod arguments;
pub mod discovery;
pub mod groups;
pub mod header;
pub mod load;
pub mod policy;
pub mod scanner;

pub use addendum::{apply_addendum, apply_addendum_file};
pub use arguments::{ParsedArguments, parse_arguments, parse_scalar};
pub use discovery::SourceFiles;
pub use error::{Error, Result};
pub use groups::{load_group_file, load_groups};
pub use header::{PacketHeader, parse_header};
pub use load::{load, load_with_handler};
pub use policy::{DiagnosticHandler, IgnoreHandler, StrictHandler, WarnHandler, handler_for};
pub use scanner::{ScanOutput, ScanState, Scanner, Transition};
