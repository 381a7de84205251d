// Query layer over a parsed log index
// Sits between the parser (which builds the index) and the runtime/CLI

pub mod args;
pub mod criteria;
pub mod error;
pub mod found;
pub mod matcher;
pub mod search;

pub use args::match_arguments;
pub use criteria::{Criteria, Criterion, DATE_AFTER, DATE_BEFORE};
pub use error::{Error, Result};
pub use found::{FoundSet, UpdateMode};
pub use matcher::{StringSearchMode, match_entries};
pub use search::LogSearch;
