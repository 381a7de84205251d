pub mod arguments;
pub mod diagnostic;
pub mod entry;
pub mod error;
pub mod index;
mod util;

pub use arguments::{ArgValue, Arguments, ConversionWarning};
pub use diagnostic::{Diagnostic, DiagnosticKind, ParsePolicy};
pub use entry::{FIXED_FIELDS, FieldValue, LogEntry, NotesField, is_fixed_field};
pub use error::{Error, Location, Result};
pub use index::{GroupRegistry, LogIndex};
pub use util::*;
