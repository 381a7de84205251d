mod args;
mod commands;
mod handlers;
pub mod logging;
pub mod output;
pub mod query;
pub mod types;

pub use args::{Cli, Commands, QueryArgs, SourceArgs};
pub use commands::run;
