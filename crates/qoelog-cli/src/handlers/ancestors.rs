use super::HandlerContext;
use crate::args::{QueryArgs, SourceArgs};
use crate::output;
use anyhow::Result;
use qoelog_engine::UpdateMode;

/// Narrow the query result to runs made with an ancestor of `rev`
pub fn handle(
    ctx: HandlerContext,
    source: &SourceArgs,
    query: &QueryArgs,
    rev: &str,
    repo: &str,
) -> Result<()> {
    let mut workspace = ctx.query(source, query)?;
    workspace.search_mut().update_mode = UpdateMode::And;
    workspace.filter_ancestors(rev, repo)?;
    output::print_found(workspace.search(), None, ctx.format)
}
