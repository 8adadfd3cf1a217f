use anyhow::Result;
use kbgraph_core::KnowledgeStore;
use kbgraph_core::catalog::{
    self, FieldQuery, ResourceDetail, ResourceSection, SummaryFeature, SummaryLink,
};
use kbgraph_core::filters::{FilterPathQuery, filter_paths};
use kbgraph_core::metapath::metapath;
use kbgraph_core::neighbors::{DEFAULT_NEIGHBOR_LIMIT, neighbors};
use kbgraph_core::page::{DEFAULT_CATALOG_LIMIT, DEFAULT_LIMIT};
use kbgraph_core::resolve::{resolve_resource_flag, resolve_summary_flag};
use kbgraph_core::search::{SearchKind, search};
use tabled::Tabled;

use crate::cli::{
    CommandsArgs, FieldsArgs, FiltersArgs, FlagsArgs, MetapathArgs, NeighborsArgs, RelationsArgs,
    ResourceArgs, ResourcesArgs, SearchArgs, SummariesArgs,
};

use super::support::{Output, join_or_dash, or_dash, yes_or_blank};

pub(super) fn handle_search(
    store: &KnowledgeStore,
    args: SearchArgs,
    json: bool,
    out: &mut Output,
) -> Result<()> {
    let kinds = SearchKind::parse_list(args.kind.as_deref().unwrap_or_default())?;
    let page = args.page.page(DEFAULT_LIMIT);
    let results = search(store, &args.query, &kinds, page)?;
    if json {
        return out.json(&results);
    }
    if results.total == 0 {
        return out.line(format!("No matches for \"{}\".", results.query));
    }
    if results.is_empty() {
        return out.line(format!(
            "No results at offset {} (total {}).",
            page.offset, results.total
        ));
    }

    #[derive(Tabled)]
    struct HitRow {
        #[tabled(rename = "KIND")]
        kind: &'static str,
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "DETAIL")]
        detail: String,
    }

    out.table(
        results
            .hits
            .into_iter()
            .map(|hit| HitRow {
                kind: hit.kind.label(),
                name: hit.name,
                detail: hit.detail,
            })
            .collect(),
    )
}

pub(super) fn handle_resource(
    store: &KnowledgeStore,
    args: ResourceArgs,
    json: bool,
    out: &mut Output,
) -> Result<()> {
    let sections = ResourceSection::parse_list(args.sections.as_deref().unwrap_or_default())?;
    let detail = catalog::resource_detail(store, &args.name, &sections)?;
    out.notice(Some(&detail.resolved));
    if json {
        return out.json(&detail);
    }
    render_resource_detail(&detail, out)
}

fn render_resource_detail(detail: &ResourceDetail, out: &mut Output) -> Result<()> {
    out.line(format!("Resource: {}", detail.name))?;
    if !detail.label_fields.is_empty() {
        out.line(format!("Label fields: {}", detail.label_fields.join(", ")))?;
    }
    if !detail.server_types.is_empty() {
        out.line(format!("Server types: {}", detail.server_types.join(", ")))?;
    }

    if !detail.fields.is_empty() {
        #[derive(Tabled)]
        struct FieldRow<'a> {
            #[tabled(rename = "NAME")]
            name: &'a str,
            #[tabled(rename = "KIND")]
            kind: &'a str,
            #[tabled(rename = "LABEL")]
            label: String,
        }

        out.blank_line()?;
        out.line("Fields:")?;
        out.table(
            detail
                .fields
                .iter()
                .map(|field| FieldRow {
                    name: &field.name,
                    kind: &field.kind,
                    label: yes_or_blank(field.is_label),
                })
                .collect(),
        )?;
    }

    if !detail.relationships.is_empty() {
        #[derive(Tabled)]
        struct RelationshipRow<'a> {
            #[tabled(rename = "NAME")]
            name: &'a str,
            #[tabled(rename = "TARGET")]
            target: &'a str,
        }

        out.blank_line()?;
        out.line("Relationships:")?;
        out.table(
            detail
                .relationships
                .iter()
                .map(|rel| RelationshipRow {
                    name: &rel.name,
                    target: &rel.target,
                })
                .collect(),
        )?;
    }

    if !detail.summary_targets.is_empty() || !detail.summary_sources.is_empty() {
        out.blank_line()?;
        out.line("Summary links:")?;
        render_summary_links(out, "As summary for:", &detail.summary_targets)?;
        render_summary_links(out, "Summaries available:", &detail.summary_sources)?;
    }

    if !detail.summary_dimensions.is_empty() || !detail.summary_metrics.is_empty() {
        out.blank_line()?;
        out.line("Summary features:")?;
        render_summary_features(out, "Dimensions:", &detail.summary_dimensions)?;
        render_summary_features(out, "Metrics:", &detail.summary_metrics)?;
    }

    if !detail.commands.is_empty() {
        #[derive(Tabled)]
        struct CommandRow<'a> {
            #[tabled(rename = "COMMAND")]
            path: &'a str,
            #[tabled(rename = "KIND")]
            kind: &'a str,
            #[tabled(rename = "VERB")]
            verb: &'a str,
        }

        out.blank_line()?;
        out.line("Commands:")?;
        out.table(
            detail
                .commands
                .iter()
                .map(|command| CommandRow {
                    path: &command.path,
                    kind: &command.kind,
                    verb: &command.verb,
                })
                .collect(),
        )?;
    }
    Ok(())
}

fn render_summary_links(out: &mut Output, heading: &str, links: &[SummaryLink]) -> Result<()> {
    if links.is_empty() {
        return Ok(());
    }
    out.line(format!("  {heading}"))?;
    for link in links {
        match &link.condition {
            Some(condition) => out.line(format!("    {} (condition: {condition})", link.resource))?,
            None => out.line(format!("    {}", link.resource))?,
        }
    }
    Ok(())
}

fn render_summary_features(
    out: &mut Output,
    heading: &str,
    features: &[SummaryFeature],
) -> Result<()> {
    if features.is_empty() {
        return Ok(());
    }
    out.line(format!("  {heading}"))?;
    for feature in features {
        out.line(format!("    {}", feature.display_name()))?;
    }
    Ok(())
}

pub(super) fn handle_resources(
    store: &KnowledgeStore,
    args: ResourcesArgs,
    json: bool,
    out: &mut Output,
) -> Result<()> {
    let rows = catalog::resources(
        store,
        args.query.as_deref(),
        args.page.page(DEFAULT_CATALOG_LIMIT),
    )?;
    if json {
        return out.json(&rows);
    }
    if rows.is_empty() {
        return out.line("No resources found.");
    }

    #[derive(Tabled)]
    struct ResourceRow {
        #[tabled(rename = "RESOURCE")]
        name: String,
        #[tabled(rename = "LABEL FIELDS")]
        labels: String,
    }

    out.table(
        rows.into_iter()
            .map(|row| ResourceRow {
                labels: join_or_dash(&row.label_fields),
                name: row.name,
            })
            .collect(),
    )
}

pub(super) fn handle_commands(
    store: &KnowledgeStore,
    args: CommandsArgs,
    json: bool,
    out: &mut Output,
) -> Result<()> {
    let resource = resolve_resource_flag(store, args.resource.as_deref(), "--resource")?;
    out.notice(resource.as_ref());
    let rows = catalog::commands(
        store,
        resource.as_ref().map(|r| r.name.as_str()),
        args.query.as_deref(),
        args.page.page(DEFAULT_CATALOG_LIMIT),
    )?;
    if json {
        return out.json(&rows);
    }
    if rows.is_empty() {
        return out.line("No commands found.");
    }

    #[derive(Tabled)]
    struct CommandRow {
        #[tabled(rename = "COMMAND")]
        path: String,
        #[tabled(rename = "DESCRIPTION")]
        description: String,
    }

    out.table(
        rows.into_iter()
            .map(|row| CommandRow {
                path: row.path,
                description: row.description,
            })
            .collect(),
    )
}

pub(super) fn handle_fields(
    store: &KnowledgeStore,
    args: FieldsArgs,
    json: bool,
    out: &mut Output,
) -> Result<()> {
    let resource = resolve_resource_flag(store, args.resource.as_deref(), "--resource")?;
    out.notice(resource.as_ref());
    let query = FieldQuery {
        resource: resource.map(|r| r.name),
        query: args.query,
        kind: args.kind,
    };
    let rows = catalog::fields(store, &query, args.page.page(DEFAULT_LIMIT))?;
    if json {
        return out.json(&rows);
    }
    if rows.is_empty() {
        return out.line("No fields found.");
    }

    #[derive(Tabled)]
    struct FieldRow {
        #[tabled(rename = "RESOURCE")]
        resource: String,
        #[tabled(rename = "FIELD")]
        name: String,
        #[tabled(rename = "KIND")]
        kind: String,
        #[tabled(rename = "LABEL")]
        label: String,
    }

    out.table(
        rows.into_iter()
            .map(|row| FieldRow {
                label: yes_or_blank(row.is_label),
                resource: row.resource,
                name: row.name,
                kind: row.kind,
            })
            .collect(),
    )
}

pub(super) fn handle_flags(
    store: &KnowledgeStore,
    args: FlagsArgs,
    json: bool,
    out: &mut Output,
) -> Result<()> {
    let rows = catalog::flags(
        store,
        args.command.as_deref(),
        args.query.as_deref(),
        args.page.page(DEFAULT_LIMIT),
    )?;
    if json {
        return out.json(&rows);
    }
    if rows.is_empty() {
        return out.line("No flags found.");
    }

    #[derive(Tabled)]
    struct FlagRow {
        #[tabled(rename = "COMMAND")]
        command: String,
        #[tabled(rename = "FLAG")]
        name: String,
        #[tabled(rename = "DESCRIPTION")]
        description: String,
    }

    out.table(
        rows.into_iter()
            .map(|row| FlagRow {
                command: row.command,
                name: format!("--{}", row.name),
                description: row.description,
            })
            .collect(),
    )
}

pub(super) fn handle_relations(
    store: &KnowledgeStore,
    args: RelationsArgs,
    json: bool,
    out: &mut Output,
) -> Result<()> {
    let resource = resolve_resource_flag(store, args.resource.as_deref(), "--resource")?;
    let target = resolve_resource_flag(store, args.target.as_deref(), "--target")?;
    out.notice(resource.as_ref());
    out.notice(target.as_ref());
    let rows = catalog::relations(
        store,
        resource.as_ref().map(|r| r.name.as_str()),
        target.as_ref().map(|r| r.name.as_str()),
        args.page.page(DEFAULT_LIMIT),
    )?;
    if json {
        return out.json(&rows);
    }
    if rows.is_empty() {
        return out.line("No relations found.");
    }

    #[derive(Tabled)]
    struct RelationRow {
        #[tabled(rename = "RESOURCE")]
        resource: String,
        #[tabled(rename = "RELATIONSHIP")]
        relationship: String,
        #[tabled(rename = "TARGET")]
        target: String,
        #[tabled(rename = "KIND")]
        edge: &'static str,
        #[tabled(rename = "CONDITION")]
        condition: String,
    }

    out.table(
        rows.into_iter()
            .map(|row| RelationRow {
                condition: or_dash(row.condition.as_deref()),
                edge: row.edge.as_str(),
                resource: row.resource,
                relationship: row.relationship,
                target: row.target,
            })
            .collect(),
    )
}

pub(super) fn handle_summaries(
    store: &KnowledgeStore,
    args: SummariesArgs,
    json: bool,
    out: &mut Output,
) -> Result<()> {
    let summary = resolve_summary_flag(store, args.summary.as_deref(), "--summary")?;
    let resource = resolve_resource_flag(store, args.resource.as_deref(), "--resource")?;
    out.notice(summary.as_ref());
    out.notice(resource.as_ref());
    let rows = catalog::summaries(
        store,
        summary.as_ref().map(|s| s.name.as_str()),
        resource.as_ref().map(|r| r.name.as_str()),
        args.page.page(DEFAULT_LIMIT),
    )?;
    if json {
        return out.json(&rows);
    }
    if rows.is_empty() {
        return out.line("No summaries found.");
    }

    #[derive(Tabled)]
    struct SummaryRow {
        #[tabled(rename = "SUMMARY")]
        summary: String,
        #[tabled(rename = "RESOURCE")]
        primary: String,
        #[tabled(rename = "CONDITION")]
        condition: String,
    }

    out.table(
        rows.into_iter()
            .map(|row| SummaryRow {
                condition: or_dash(row.condition.as_deref()),
                summary: row.summary,
                primary: row.primary_resource,
            })
            .collect(),
    )
}

pub(super) fn handle_neighbors(
    store: &KnowledgeStore,
    args: NeighborsArgs,
    json: bool,
    out: &mut Output,
) -> Result<()> {
    let result = neighbors(store, &args.resource, args.page.page(DEFAULT_NEIGHBOR_LIMIT))?;
    out.notice(Some(&result.resource));
    if json {
        return out.json(&result);
    }
    if result.is_empty() {
        return out.line(result.empty_message());
    }

    #[derive(Tabled)]
    struct NeighborRow {
        #[tabled(rename = "RESOURCE")]
        resource: String,
        #[tabled(rename = "SCORE")]
        score: String,
        #[tabled(rename = "EVIDENCE")]
        evidence: i64,
        #[tabled(rename = "RELATIONSHIPS")]
        relationships: i64,
        #[tabled(rename = "SUMMARIES")]
        summaries: i64,
        #[tabled(rename = "FILTER PATHS")]
        filter_paths: i64,
    }

    out.table(
        result
            .rows
            .into_iter()
            .map(|row| NeighborRow {
                resource: row.resource,
                score: format!("{:.2}", row.score),
                evidence: row.evidence_count,
                relationships: row.relationship_count,
                summaries: row.summary_count,
                filter_paths: row.filter_path_count,
            })
            .collect(),
    )
}

pub(super) fn handle_metapath(
    store: &KnowledgeStore,
    args: MetapathArgs,
    json: bool,
    out: &mut Output,
) -> Result<()> {
    let result = metapath(store, &args.resource, args.kind, args.page.page(DEFAULT_LIMIT))?;
    out.notice(Some(&result.resource));
    if json {
        return out.json(&result);
    }
    if result.is_empty() {
        return out.line(result.empty_message());
    }

    #[derive(Tabled)]
    struct MetapathRow {
        #[tabled(rename = "RESOURCE")]
        resource: String,
        #[tabled(rename = "KIND")]
        kind: String,
        #[tabled(rename = "SHARED")]
        shared: i64,
    }

    out.table(
        result
            .rows
            .into_iter()
            .map(|row| MetapathRow {
                resource: row.resource,
                kind: row.kind,
                shared: row.shared_features,
            })
            .collect(),
    )
}

pub(super) fn handle_filters(
    store: &KnowledgeStore,
    args: FiltersArgs,
    json: bool,
    out: &mut Output,
) -> Result<()> {
    let resource = resolve_resource_flag(store, args.resource.as_deref(), "--resource")?;
    out.notice(resource.as_ref());
    let query = FilterPathQuery {
        command: args.command,
        resource: resource.map(|r| r.name),
        flag: args.flag,
    };
    let paths = filter_paths(store, &query, args.page.page(DEFAULT_LIMIT))?;
    if json {
        return out.json(&paths);
    }
    if paths.is_empty() {
        return out.line(paths.empty_message());
    }

    #[derive(Tabled)]
    struct FilterRow {
        #[tabled(rename = "COMMAND")]
        command: String,
        #[tabled(rename = "FLAG")]
        flag: String,
        #[tabled(rename = "PATH")]
        path: String,
        #[tabled(rename = "TARGET")]
        target: String,
        #[tabled(rename = "HOPS")]
        hops: i64,
        #[tabled(rename = "MATCH")]
        match_label: String,
    }

    out.table(
        paths
            .rows
            .into_iter()
            .map(|row| {
                let target = match &row.target_field {
                    Some(field) => format!("{}.{field}", row.target_resource),
                    None => row.target_resource.clone(),
                };
                FilterRow {
                    match_label: row.match_label(),
                    command: or_dash(Some(row.command.as_str())),
                    flag: format!("--{}", row.flag),
                    path: row.hop_chain().join(" -> "),
                    hops: row.hop_count,
                    target,
                }
            })
            .collect(),
    )
}
