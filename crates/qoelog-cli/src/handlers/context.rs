use crate::args::{QueryArgs, SourceArgs};
use crate::query::Query;
use crate::types::OutputFormat;
use anyhow::Result;
use qoelog_parser::SourceFiles;
use qoelog_runtime::{Config, LogWorkspace};
use std::path::PathBuf;

/// Configuration and output settings shared by every handler
pub struct HandlerContext {
    pub config: Config,
    pub format: OutputFormat,
}

impl HandlerContext {
    pub fn new(config: Config, format: OutputFormat) -> Self {
        Self { config, format }
    }

    pub fn with_git(mut self, program: Option<PathBuf>) -> Self {
        if let Some(program) = program {
            self.config.git.program = program;
        }
        self
    }

    /// Load the sources with command-line overrides applied
    pub fn open(&self, source: &SourceArgs, query: Option<&QueryArgs>) -> Result<LogWorkspace> {
        let mut config = self.config.clone();
        if let Some(policy) = source.policy {
            config.search.parse_policy = policy;
        }
        if let Some(mode) = query.and_then(|q| q.string_mode) {
            config.search.string_mode = mode;
        }

        let sources = source
            .addendum
            .iter()
            .fold(SourceFiles::resolve(&source.path)?, |s, p| s.with_addendum(p));
        let sources = source.group.iter().fold(sources, |s, p| s.with_group(p));

        Ok(LogWorkspace::open(&sources, config)?)
    }

    /// Load the sources and run the query over them
    pub fn query(&self, source: &SourceArgs, query: &QueryArgs) -> Result<LogWorkspace> {
        let parsed = Query::from_args(query)?;
        let mut workspace = self.open(source, Some(query))?;
        parsed.run(workspace.search_mut())?;
        Ok(workspace)
    }
}
