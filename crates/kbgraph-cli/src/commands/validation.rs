use anyhow::Result;
use kbgraph_core::catalog::ResourceSection;
use kbgraph_core::search::SearchKind;

use crate::cli::Commands;

/// Checks that need no snapshot: required positionals and comma-separated
/// enum lists. Runs before the store is opened.
pub(super) fn validate_command_preflight(command: &Commands) -> Result<()> {
    match command {
        Commands::Search(args) => {
            ensure_not_blank(&args.query, "search query")?;
            let _ = SearchKind::parse_list(args.kind.as_deref().unwrap_or_default())?;
            Ok(())
        }
        Commands::Resource(args) => {
            ensure_not_blank(&args.name, "resource name")?;
            let _ = ResourceSection::parse_list(args.sections.as_deref().unwrap_or_default())?;
            Ok(())
        }
        Commands::Neighbors(args) => ensure_not_blank(&args.resource, "resource"),
        Commands::Metapath(args) => ensure_not_blank(&args.resource, "resource"),
        _ => Ok(()),
    }
}

fn ensure_not_blank(value: &str, label: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{label} is required");
    }
    Ok(())
}
