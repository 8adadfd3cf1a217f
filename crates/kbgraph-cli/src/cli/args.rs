use clap::Args;
use kbgraph_core::Page;
use kbgraph_core::catalog::FieldKind;
use kbgraph_core::metapath::PathKind;

use super::parsers::{parse_field_kind, parse_min_one_usize, parse_path_kind};

/// Shared `--limit` / `--offset` window; the default limit depends on the
/// command.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct PageArgs {
    /// Maximum results to return.
    #[arg(long, value_parser = parse_min_one_usize)]
    pub limit: Option<usize>,
    /// Number of results to skip.
    #[arg(long, default_value_t = 0)]
    pub offset: usize,
}

impl PageArgs {
    pub fn page(self, default_limit: usize) -> Page {
        Page::new(self.offset, self.limit.unwrap_or(default_limit))
    }
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(allow_hyphen_values = true)]
    pub query: String,
    /// Comma-separated kinds (resources,commands,fields,flags,relationships,summaries,dimensions,metrics).
    #[arg(long)]
    pub kind: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args)]
pub struct ResourceArgs {
    pub name: String,
    /// Comma-separated sections (fields,relationships,summaries,summary-features,commands).
    #[arg(long)]
    pub sections: Option<String>,
}

#[derive(Debug, Args)]
pub struct ResourcesArgs {
    /// Substring of the resource name.
    #[arg(long)]
    pub query: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args)]
pub struct CommandsArgs {
    /// Only commands linked to this resource.
    #[arg(long)]
    pub resource: Option<String>,
    /// Substring of the command path or description.
    #[arg(long)]
    pub query: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args)]
pub struct FieldsArgs {
    #[arg(long)]
    pub resource: Option<String>,
    /// Substring of the field name.
    #[arg(long)]
    pub query: Option<String>,
    /// Field kind (attribute, relationship).
    #[arg(long, value_parser = parse_field_kind)]
    pub kind: Option<FieldKind>,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args)]
pub struct FlagsArgs {
    /// Substring of the owning command path.
    #[arg(long)]
    pub command: Option<String>,
    /// Substring of the flag name or description.
    #[arg(long)]
    pub query: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args)]
pub struct RelationsArgs {
    #[arg(long)]
    pub resource: Option<String>,
    #[arg(long)]
    pub target: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args)]
pub struct SummariesArgs {
    /// Summary resource (e.g. `transport-summary`).
    #[arg(long)]
    pub summary: Option<String>,
    /// Primary resource being summarized.
    #[arg(long)]
    pub resource: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args)]
pub struct NeighborsArgs {
    pub resource: String,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args)]
pub struct MetapathArgs {
    pub resource: String,
    /// Path kind (command_field, summary_dimension, summary_metric, filter_target).
    #[arg(long, value_parser = parse_path_kind)]
    pub kind: Option<PathKind>,
    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Args)]
pub struct FiltersArgs {
    #[arg(long)]
    pub resource: Option<String>,
    /// Substring that must select exactly one command.
    #[arg(long)]
    pub command: Option<String>,
    /// Substring of the flag name.
    #[arg(long)]
    pub flag: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}
