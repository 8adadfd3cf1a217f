use anyhow::Result;
use kbgraph_core::{KnowledgeConfig, KnowledgeStore};
use tracing::debug;

use crate::cli::{Cli, Commands};

mod guide;
mod handlers;
mod support;
mod validation;


use self::handlers::{
    handle_commands, handle_fields, handle_filters, handle_flags, handle_metapath,
    handle_neighbors, handle_relations, handle_resource, handle_resources, handle_search,
    handle_summaries,
};
use self::support::Output;
use self::validation::validate_command_preflight;

pub(crate) fn run(cli: Cli) -> Result<()> {
    validate_command_preflight(&cli.command)?;

    let db = cli.db;
    let output = run_command(cli.command, cli.json, || {
        let config = KnowledgeConfig::from_env();
        let location = config.location(db.as_deref());
        debug!(
            path = %location.path.display(),
            source = location.source.as_str(),
            "resolved knowledge store location"
        );
        Ok(KnowledgeStore::open(&location, &config)?)
    })?;
    output.emit()
}

/// Dispatches one command. The store is opened only by commands that read it,
/// so `guide` works without a snapshot.
fn run_command<F>(command: Commands, json: bool, open_store: F) -> Result<Output>
where
    F: FnOnce() -> Result<KnowledgeStore>,
{
    let mut out = Output::default();
    match command {
        Commands::Guide => out.line(guide::GUIDE.trim_end())?,
        Commands::Search(args) => handle_search(&open_store()?, args, json, &mut out)?,
        Commands::Resource(args) => handle_resource(&open_store()?, args, json, &mut out)?,
        Commands::Resources(args) => handle_resources(&open_store()?, args, json, &mut out)?,
        Commands::CommandList(args) => handle_commands(&open_store()?, args, json, &mut out)?,
        Commands::Fields(args) => handle_fields(&open_store()?, args, json, &mut out)?,
        Commands::Flags(args) => handle_flags(&open_store()?, args, json, &mut out)?,
        Commands::Relations(args) => handle_relations(&open_store()?, args, json, &mut out)?,
        Commands::Summaries(args) => handle_summaries(&open_store()?, args, json, &mut out)?,
        Commands::Neighbors(args) => handle_neighbors(&open_store()?, args, json, &mut out)?,
        Commands::Metapath(args) => handle_metapath(&open_store()?, args, json, &mut out)?,
        Commands::Filters(args) => handle_filters(&open_store()?, args, json, &mut out)?,
    }
    Ok(out)
}
