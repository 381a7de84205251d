use super::HandlerContext;
use crate::args::{QueryArgs, SourceArgs};
use crate::output;
use anyhow::Result;

pub fn handle(
    ctx: &HandlerContext,
    source: &SourceArgs,
    query: &QueryArgs,
    file_type: &str,
    ignore_incomplete: bool,
) -> Result<()> {
    let workspace = ctx.query(source, query)?;
    let resolved = workspace.resolve_files(file_type, ignore_incomplete)?;
    output::print_files(&resolved, ctx.format)
}
