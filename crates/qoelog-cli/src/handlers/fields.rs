use super::HandlerContext;
use crate::args::SourceArgs;
use crate::output;
use anyhow::Result;

pub fn handle(ctx: &HandlerContext, source: &SourceArgs) -> Result<()> {
    let workspace = ctx.open(source, None)?;
    output::print_fields(&workspace.search().field_names(), ctx.format)
}
