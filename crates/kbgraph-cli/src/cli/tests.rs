use super::*;
use clap::Parser;
use kbgraph_core::catalog::FieldKind;
use kbgraph_core::metapath::PathKind;
use kbgraph_core::page::DEFAULT_LIMIT;

#[test]
fn search_parses_query_kinds_and_page() {
    let cli = Cli::try_parse_from([
        "kbgraph", "search", "job", "--kind", "resources,fields", "--limit", "5", "--offset", "10",
    ])
    .expect("parse");
    match cli.command {
        Commands::Search(SearchArgs { query, kind, page }) => {
            assert_eq!(query, "job");
            assert_eq!(kind.as_deref(), Some("resources,fields"));
            assert_eq!(page.page(DEFAULT_LIMIT), kbgraph_core::Page::new(10, 5));
        }
        _ => panic!("expected search command"),
    }
}

#[test]
fn limit_must_be_at_least_one() {
    let parsed = Cli::try_parse_from(["kbgraph", "resources", "--limit", "0"]);
    assert!(parsed.is_err(), "--limit 0 must be rejected");
}

#[test]
fn missing_limit_uses_command_default() {
    let cli = Cli::try_parse_from(["kbgraph", "neighbors", "jobs"]).expect("parse");
    match cli.command {
        Commands::Neighbors(NeighborsArgs { resource, page }) => {
            assert_eq!(resource, "jobs");
            assert_eq!(page.page(20), kbgraph_core::Page::new(0, 20));
        }
        _ => panic!("expected neighbors command"),
    }
}

#[test]
fn global_flags_are_accepted_after_subcommand() {
    let cli = Cli::try_parse_from(["kbgraph", "resources", "--json", "--db", "/tmp/kb.sqlite"])
        .expect("parse");
    assert!(cli.json);
    assert_eq!(
        cli.db.as_deref(),
        Some(std::path::Path::new("/tmp/kb.sqlite"))
    );
}

#[test]
fn field_and_path_kinds_are_validated_at_parse_time() {
    let cli = Cli::try_parse_from(["kbgraph", "fields", "--kind", "relationship"]).expect("parse");
    match cli.command {
        Commands::Fields(args) => assert_eq!(args.kind, Some(FieldKind::Relationship)),
        _ => panic!("expected fields command"),
    }

    let cli = Cli::try_parse_from(["kbgraph", "metapath", "jobs", "--kind", "filter_target"])
        .expect("parse");
    match cli.command {
        Commands::Metapath(args) => assert_eq!(args.kind, Some(PathKind::FilterTarget)),
        _ => panic!("expected metapath command"),
    }

    assert!(Cli::try_parse_from(["kbgraph", "fields", "--kind", "computed"]).is_err());
}

#[test]
fn commands_subcommand_keeps_its_name() {
    let cli = Cli::try_parse_from(["kbgraph", "commands", "--resource", "jobs"]).expect("parse");
    match cli.command {
        Commands::CommandList(args) => assert_eq!(args.resource.as_deref(), Some("jobs")),
        _ => panic!("expected commands listing"),
    }
}

#[test]
fn client_routes_is_not_a_subcommand() {
    assert!(Cli::try_parse_from(["kbgraph", "client-routes"]).is_err());
}
