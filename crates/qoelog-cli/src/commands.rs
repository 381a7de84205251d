use super::args::{Cli, Commands};
use super::handlers::{self, HandlerContext};
use crate::logging;
use anyhow::Result;
use qoelog_runtime::{Config, resolve_config_path};

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let config_path = resolve_config_path(cli.config.as_deref())?;
    let config = Config::load_from(&config_path)?;
    let ctx = HandlerContext::new(config, cli.format);

    match cli.command {
        Commands::Search {
            source,
            query,
            show_arg,
        } => handlers::search::handle(&ctx, &source, &query, show_arg.as_deref()),

        Commands::Fields { source } => handlers::fields::handle(&ctx, &source),

        Commands::Files {
            source,
            query,
            file_type,
            ignore_incomplete,
        } => handlers::files::handle(&ctx, &source, &query, &file_type, ignore_incomplete),

        Commands::Sync {
            source,
            query,
            local,
            file_type,
        } => handlers::sync::handle(&ctx, &source, &query, &local, &file_type),

        Commands::Ancestors {
            source,
            query,
            rev,
            repo,
            git,
        } => handlers::ancestors::handle(ctx.with_git(git), &source, &query, &rev, &repo),
    }
}
