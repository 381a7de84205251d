//! Everything around a parsed log set that touches the outside world:
//! data file resolution, the local cache sync, the git ancestry filter and
//! the TOML configuration.

pub mod ancestry;
pub mod config;
pub mod error;
pub mod resolver;
pub mod sync;
pub mod workspace;

pub use ancestry::{GitCli, HASH_FIELD, VersionControl, ancestor_matches, entry_hash, is_git_url};
pub use config::{CONFIG_ENV, Config, GitConfig, SearchConfig, expand_tilde, resolve_config_path};
pub use error::{Error, Result};
pub use resolver::{
    FileFormat, FileOutcome, FileResolver, FileTypeSpec, OperationRule, ResolvedFiles,
    ResolverTable, SearchStep,
};
pub use sync::{SyncReport, sync_files};
pub use workspace::LogWorkspace;
