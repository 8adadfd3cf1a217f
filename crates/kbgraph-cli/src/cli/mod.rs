use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;
mod parsers;

#[cfg(test)]
mod tests;

pub use args::{
    CommandsArgs, FieldsArgs, FiltersArgs, FlagsArgs, MetapathArgs, NeighborsArgs, RelationsArgs,
    ResourceArgs, ResourcesArgs, SearchArgs, SummariesArgs,
};

#[derive(Debug, Parser)]
#[command(name = "kbgraph")]
#[command(
    about = "Explore the local knowledge snapshot",
    long_about = "Explore the local knowledge snapshot: map resources, commands, fields, summaries, filter paths and neighborhood relationships without prior context.",
    version
)]
pub struct Cli {
    /// Internal override for the knowledge database path.
    #[arg(long, global = true, hide = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Print JSON instead of tables.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print a first-run guide.
    Guide,
    /// Search resources, commands, fields, flags and summaries.
    Search(SearchArgs),
    /// Show details about a resource.
    Resource(ResourceArgs),
    /// List resources.
    Resources(ResourcesArgs),
    /// List commands.
    #[command(name = "commands")]
    CommandList(CommandsArgs),
    /// List resource fields.
    Fields(FieldsArgs),
    /// List command flags.
    Flags(FlagsArgs),
    /// List relationship and summary edges.
    Relations(RelationsArgs),
    /// List summary resources and what they summarize.
    Summaries(SummariesArgs),
    /// Rank neighbors of a resource by precomputed score.
    Neighbors(NeighborsArgs),
    /// Rank resources sharing structural features with a resource.
    Metapath(MetapathArgs),
    /// Show multi-hop filter paths inferred from commands.
    Filters(FiltersArgs),
}
