use super::HandlerContext;
use crate::args::{QueryArgs, SourceArgs};
use crate::output;
use anyhow::Result;
use qoelog_runtime::expand_tilde;
use std::path::Path;

pub fn handle(
    ctx: &HandlerContext,
    source: &SourceArgs,
    query: &QueryArgs,
    local: &Path,
    file_type: &str,
) -> Result<()> {
    let workspace = ctx.query(source, query)?;
    let local = expand_tilde(&local.to_string_lossy());
    let report = workspace.sync(&local, file_type)?;
    output::print_sync(&report, ctx.format)
}
