use qoelog_types::{LogIndex, ParsePolicy};

use crate::addendum::apply_addendum_file;
use crate::discovery::SourceFiles;
use crate::error::Result;
use crate::groups::load_group_file;
use crate::policy::{DiagnosticHandler, handler_for};
use crate::scanner::Scanner;

/// Scan all logs, then apply addenda, then group files
pub fn load(sources: &SourceFiles, policy: ParsePolicy) -> Result<LogIndex> {
    load_with_handler(sources, handler_for(policy))
}

pub fn load_with_handler(
    sources: &SourceFiles,
    handler: Box<dyn DiagnosticHandler>,
) -> Result<LogIndex> {
    let mut scanner = Scanner::with_handler(handler);
    for path in &sources.logs {
        scanner.scan_file(path)?;
    }
    let output = scanner.finish();

    let mut index = LogIndex::new(output.entries);
    index.diagnostics = output.diagnostics;
    index.search_path = sources.search_path.clone();

    for path in &sources.addenda {
        apply_addendum_file(&mut index, path)?;
    }
    for path in &sources.groups {
        load_group_file(&mut index, path)?;
    }

    tracing::debug!(
        entries = index.len(),
        diagnostics = index.diagnostics.len(),
        "log index ready"
    );
    Ok(index)
}
