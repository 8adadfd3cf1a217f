use crate::fixtures::SnapshotBuilder;
use crate::page::DEFAULT_CATALOG_LIMIT;

use super::*;

fn catalog_page() -> Page {
    Page::first(DEFAULT_CATALOG_LIMIT)
}

#[test]
fn resources_list_sorted_with_labels() {
    let store = SnapshotBuilder::sample().into_store();

    let rows = resources(&store, None, catalog_page()).expect("resources");
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "customers",
            "job-sites",
            "jobs",
            "material-transactions",
            "transport-summaries"
        ]
    );
    assert_eq!(rows[0].label_fields, vec!["company-name"]);
    assert!(rows[3].label_fields.is_empty());

    let filtered = resources(&store, Some("JOB"), catalog_page()).expect("resources");
    assert_eq!(filtered.len(), 2);
}

#[test]
fn commands_filter_by_linked_resource_and_query() {
    let store = SnapshotBuilder::sample().into_store();

    let for_jobs = commands(&store, Some("jobs"), None, catalog_page()).expect("commands");
    let paths: Vec<&str> = for_jobs.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(paths, vec!["view jobs list", "view jobs show"]);

    let by_description =
        commands(&store, None, Some("details"), catalog_page()).expect("commands");
    assert_eq!(by_description.len(), 1);
    assert_eq!(by_description[0].path, "view jobs show");

    let combined = commands(&store, Some("jobs"), Some("list"), catalog_page()).expect("commands");
    assert_eq!(combined.len(), 1);
}

#[test]
fn fields_filter_by_kind() {
    let store = SnapshotBuilder::sample().into_store();

    let rows = fields(
        &store,
        &FieldQuery {
            resource: Some("jobs".to_string()),
            kind: Some(FieldKind::Relationship),
            ..FieldQuery::default()
        },
        Page::default(),
    )
    .expect("fields");
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["customer", "job-site"]);

    let labels = fields(
        &store,
        &FieldQuery {
            query: Some("name".to_string()),
            ..FieldQuery::default()
        },
        Page::default(),
    )
    .expect("fields");
    assert!(labels.iter().all(|r| r.is_label));
    assert_eq!(labels.len(), 3);
}

#[test]
fn field_kind_rejects_unknown_values() {
    let err = "computed".parse::<FieldKind>().expect_err("invalid kind");
    assert_eq!(
        err.to_string(),
        "validation failed: invalid --kind value \"computed\" (valid: attribute, relationship)"
    );
    assert_eq!(
        " Attribute ".parse::<FieldKind>().expect("kind"),
        FieldKind::Attribute
    );
}

#[test]
fn flags_filter_by_command_and_description() {
    let store = SnapshotBuilder::sample().into_store();

    let rows = flags(&store, Some("jobs list"), None, Page::default()).expect("flags");
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["customer", "job-site", "status"]);

    let by_description = flags(&store, None, Some("company"), Page::default()).expect("flags");
    assert_eq!(by_description.len(), 1);
    assert_eq!(by_description[0].command, "view customers list");
}

#[test]
fn relations_merge_relationship_and_summary_edges() {
    let mut builder = SnapshotBuilder::sample();
    builder.summary_target("transport-summaries", "jobs", Some("status = 'complete'"));
    let store = builder.into_store();

    let into_jobs = relations(&store, None, Some("jobs"), Page::default()).expect("relations");
    assert_eq!(into_jobs.len(), 1);
    assert_eq!(into_jobs[0].edge, EdgeKind::Summary);
    assert_eq!(into_jobs[0].relationship, "summarizes");
    assert_eq!(
        into_jobs[0].condition.as_deref(),
        Some("status = 'complete'")
    );

    let from_jobs = relations(&store, Some("jobs"), None, Page::default()).expect("relations");
    let targets: Vec<&str> = from_jobs.iter().map(|r| r.target.as_str()).collect();
    assert_eq!(targets, vec!["customers", "job-sites"]);
    assert!(from_jobs.iter().all(|r| r.edge == EdgeKind::Relationship));
}

#[test]
fn summaries_filter_by_summary_or_primary() {
    let store = SnapshotBuilder::sample().into_store();

    let rows = summaries(&store, Some("transport-summaries"), None, Page::default())
        .expect("summaries");
    assert_eq!(
        rows,
        vec![SummaryRow {
            summary: "transport-summaries".to_string(),
            primary_resource: "material-transactions".to_string(),
            condition: None,
        }]
    );
    assert!(
        summaries(&store, None, Some("jobs"), Page::default())
            .expect("summaries")
            .is_empty()
    );
}

#[test]
fn resource_detail_collects_every_section_by_default() {
    let store = SnapshotBuilder::sample().into_store();

    let detail = resource_detail(&store, "job", &[]).expect("detail");
    assert_eq!(detail.name, "jobs");
    assert!(detail.resolved.rewritten);
    assert_eq!(detail.label_fields, vec!["name"]);
    assert_eq!(detail.fields.len(), 4);
    // attribute sorts before relationship
    assert_eq!(detail.fields[0].kind, "attribute");
    assert_eq!(detail.relationships.len(), 2);
    assert_eq!(detail.commands.len(), 2);
    assert_eq!(detail.commands[0].verb, "list");
}

#[test]
fn resource_detail_respects_sections() {
    let store = SnapshotBuilder::sample().into_store();

    let sections = ResourceSection::parse_list("summaries,summary-features").expect("sections");
    let detail = resource_detail(&store, "transport-summaries", &sections).expect("detail");
    assert!(detail.fields.is_empty());
    assert!(detail.commands.is_empty());
    assert_eq!(detail.summary_targets[0].resource, "material-transactions");
    let dims: Vec<String> = detail
        .summary_dimensions
        .iter()
        .map(SummaryFeature::display_name)
        .collect();
    assert_eq!(dims, vec!["customer (relationship)", "date (date)"]);
    assert_eq!(detail.summary_metrics.len(), 2);

    let primary = resource_detail(&store, "material-transactions", &[ResourceSection::Summaries])
        .expect("detail");
    assert_eq!(primary.summary_sources[0].resource, "transport-summaries");
}

#[test]
fn section_list_defaults_to_all_and_rejects_unknown() {
    assert_eq!(
        ResourceSection::parse_list(" ").expect("sections"),
        ResourceSection::ALL.to_vec()
    );
    let err = ResourceSection::parse_list("fields,history").expect_err("unknown section");
    assert!(err.to_string().contains("summary-features"), "{err}");
}

#[test]
fn detail_serializes_without_empty_sections() {
    let store = SnapshotBuilder::sample().into_store();

    let detail = resource_detail(&store, "customers", &[ResourceSection::Fields]).expect("detail");
    let value = serde_json::to_value(&detail).expect("json");
    assert_eq!(value["name"], "customers");
    assert!(value.get("commands").is_none());
    assert!(value.get("resolved").is_none());
    assert_eq!(value["fields"][0]["name"], "company-name");
}
