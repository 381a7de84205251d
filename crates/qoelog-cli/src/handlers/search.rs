use super::HandlerContext;
use crate::args::{QueryArgs, SourceArgs};
use crate::output;
use anyhow::Result;

pub fn handle(
    ctx: &HandlerContext,
    source: &SourceArgs,
    query: &QueryArgs,
    show_arg: Option<&str>,
) -> Result<()> {
    let workspace = ctx.query(source, query)?;
    output::print_found(workspace.search(), show_arg, ctx.format)
}
