use crate::types::{LogLevel, OutputFormat};
use clap::{Args, Parser, Subcommand};
use qoelog_engine::StringSearchMode;
use qoelog_types::ParsePolicy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qoelog")]
#[command(about = "Search, resolve and filter measurement-run packet logs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to $QOELOG_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List entries matching the query
    Search {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// Also print the parsed value of this argument for each entry
        #[arg(long, value_name = "NAME")]
        show_arg: Option<String>,
    },

    /// List every field name present in the logs
    Fields {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Resolve the data files of matching entries
    Files {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// Data file category: csv, mat, bad_csv, wav, sm_mat
        #[arg(long = "type", default_value = "csv")]
        file_type: String,

        /// Resolve incomplete entries instead of reporting them
        #[arg(long)]
        ignore_incomplete: bool,
    },

    /// Copy the data files of matching entries into a local cache
    Sync {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// Local cache directory
        #[arg(long)]
        local: PathBuf,

        #[arg(long = "type", default_value = "csv")]
        file_type: String,
    },

    /// Keep matching entries whose commit is an ancestor of a revision
    Ancestors {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        query: QueryArgs,

        /// Branch, tag or commit to compare against
        #[arg(long)]
        rev: String,

        /// Local checkout or clonable URL
        #[arg(long)]
        repo: String,

        /// git executable, overriding the configuration
        #[arg(long)]
        git: Option<PathBuf>,
    },
}

/// Which files to load
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory of *.log / *.ad-log / *.gr-log files, or one log file
    pub path: PathBuf,

    /// Extra addendum file, applied after discovered ones
    #[arg(long)]
    pub addendum: Vec<PathBuf>,

    /// Extra group file, applied after discovered ones
    #[arg(long)]
    pub group: Vec<PathBuf>,

    /// What to do with malformed log lines: warn, error, ignore
    #[arg(long)]
    pub policy: Option<ParsePolicy>,
}

/// Which entries to keep; every option must match
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// FIELD=PATTERN; repeat a field to give several patterns
    #[arg(long = "where", value_name = "FIELD=PATTERN")]
    pub filters: Vec<String>,

    /// Only entries strictly before this date (DD-Mon-YYYY HH:MM:SS)
    #[arg(long)]
    pub before: Option<String>,

    /// Only entries strictly after this date (DD-Mon-YYYY HH:MM:SS)
    #[arg(long)]
    pub after: Option<String>,

    /// Group identifier as FILE:GROUP; all given groups are required
    #[arg(long = "in-group", value_name = "FILE:GROUP")]
    pub groups: Vec<String>,

    /// NAME=VALUE against the parsed Arguments field
    #[arg(long = "arg", value_name = "NAME=VALUE")]
    pub args: Vec<String>,

    /// How repeated patterns for one field combine: and, or, xor
    #[arg(long)]
    pub string_mode: Option<StringSearchMode>,
}
