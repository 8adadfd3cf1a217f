use crate::fixtures::SnapshotBuilder;

use super::*;

fn resolved(name: &str, rewritten: bool) -> Resolution {
    Resolution::Resolved {
        name: name.to_string(),
        rewritten,
    }
}

#[test]
fn exact_name_is_not_rewritten() {
    let store = SnapshotBuilder::sample().into_store();

    assert_eq!(
        resolve_resource(&store, "jobs").expect("resolve"),
        resolved("jobs", false)
    );
    assert_eq!(
        resolve_resource(&store, "  JOBS ").expect("resolve"),
        resolved("jobs", false)
    );
}

#[test]
fn singular_name_resolves_to_plural_with_notice() {
    let store = SnapshotBuilder::sample().into_store();

    let name = resolve_resource(&store, "job-site")
        .expect("resolve")
        .require("resource", "job-site")
        .expect("resolved");
    assert_eq!(name.name, "job-sites");
    assert!(name.rewritten);
    assert_eq!(
        name.notice().as_deref(),
        Some("Interpreting resource \"job-site\" as \"job-sites\".")
    );
}

#[test]
fn exact_match_has_no_notice() {
    let store = SnapshotBuilder::sample().into_store();

    let name = require_resource(&store, "customers", "resource").expect("resolved");
    assert_eq!(name.notice(), None);
}

#[test]
fn summarize_command_name_maps_to_summary_resource() {
    let store = SnapshotBuilder::sample().into_store();

    assert_eq!(
        summary_resources_for_command(&store, "transport-summary").expect("mapping"),
        vec!["transport-summaries"]
    );
    assert_eq!(
        resolve_resource(&store, "transport-summary").expect("resolve"),
        resolved("transport-summaries", true)
    );
}

#[test]
fn trailing_y_resolves_to_ies_plural() {
    let mut builder = SnapshotBuilder::in_memory();
    builder.resource("parties", &["name"]);
    let store = builder.into_store();

    assert_eq!(
        resolve_resource(&store, "party").expect("resolve"),
        resolved("parties", true)
    );
}

#[test]
fn competing_variants_are_ambiguous() {
    let mut builder = SnapshotBuilder::in_memory();
    builder
        .resource("partys", &[])
        .resource("parties", &["name"]);
    let store = builder.into_store();

    let resolution = resolve_resource(&store, "party").expect("resolve");
    assert_eq!(
        resolution,
        Resolution::Ambiguous {
            candidates: vec!["partys".to_string(), "parties".to_string()],
        }
    );

    let err = resolution
        .require("resource", "party")
        .expect_err("ambiguous must fail");
    assert_eq!(err.code(), "RESOURCE_AMBIGUOUS");
    assert!(err.to_string().contains("partys, parties"), "{err}");
}

#[test]
fn unknown_name_reports_token_suggestions() {
    let store = SnapshotBuilder::sample().into_store();

    let resolution = resolve_resource(&store, "job-sitez").expect("resolve");
    assert_eq!(
        resolution,
        Resolution::NotFound {
            suggestions: vec!["jobs".to_string(), "job-sites".to_string()],
        }
    );

    let err = resolution
        .require("resource", "job-sitez")
        .expect_err("unknown must fail");
    assert_eq!(
        err.to_string(),
        "resource \"job-sitez\" not found; closest matches: jobs, job-sites"
    );
}

#[test]
fn exact_name_ranks_first_in_suggestions() {
    let store = SnapshotBuilder::sample().into_store();

    let suggestions = suggest_resources(&store, "jobs", DEFAULT_SUGGESTION_LIMIT).expect("suggest");
    assert_eq!(suggestions.first().map(String::as_str), Some("jobs"));

    let suggestions = suggest_resources(&store, "job", DEFAULT_SUGGESTION_LIMIT).expect("suggest");
    assert_eq!(suggestions, vec!["jobs", "job-sites"]);
}

#[test]
fn zero_suggestion_limit_uses_fallback() {
    let mut builder = SnapshotBuilder::in_memory();
    for idx in 0..8 {
        builder.resource(&format!("widget-{idx}"), &[]);
    }
    let store = builder.into_store();

    assert_eq!(
        suggest_resources(&store, "widget", 0).expect("suggest").len(),
        5
    );
    assert_eq!(
        suggest_resources(&store, "widget", DEFAULT_SUGGESTION_LIMIT)
            .expect("suggest")
            .len(),
        6
    );
}

#[test]
fn suggestion_needle_wildcards_are_literal() {
    let store = SnapshotBuilder::sample().into_store();

    assert!(suggest_resources(&store, "j_bs", 5).expect("suggest").is_empty());
    assert!(suggest_resources(&store, "%", 5).expect("suggest").is_empty());
}

#[test]
fn blank_input_requires_a_value() {
    let store = SnapshotBuilder::sample().into_store();

    assert_eq!(resolve_resource(&store, "  ").expect("resolve"), resolved("", false));
    let err = require_resource(&store, " ", "resource").expect_err("blank must fail");
    assert_eq!(err.code(), "VALIDATION_FAILED");
    assert_eq!(err.to_string(), "validation failed: resource is required");
}

#[test]
fn blank_flag_means_no_filter() {
    let store = SnapshotBuilder::sample().into_store();

    assert!(resolve_resource_flag(&store, None, "resource").expect("flag").is_none());
    assert!(
        resolve_resource_flag(&store, Some("  "), "resource")
            .expect("flag")
            .is_none()
    );
    let flag = resolve_resource_flag(&store, Some("customer"), "resource")
        .expect("flag")
        .expect("resolved");
    assert_eq!(flag.name, "customers");
}

#[test]
fn summary_namespace_resolves_exact_command_and_suffix() {
    let mut builder = SnapshotBuilder::sample();
    builder.summary_metric("fuel-summaries", "gallons");
    let store = builder.into_store();

    assert_eq!(
        resolve_summary_resource(&store, "transport-summaries").expect("resolve"),
        resolved("transport-summaries", false)
    );
    assert_eq!(
        resolve_summary_resource(&store, "transport-summary").expect("resolve"),
        resolved("transport-summaries", true)
    );
    assert_eq!(
        resolve_summary_resource(&store, "fuel-summary").expect("resolve"),
        resolved("fuel-summaries", true)
    );
}

#[test]
fn plain_resource_is_not_a_summary() {
    let store = SnapshotBuilder::sample().into_store();

    assert!(summary_resource_exists(&store, "transport-summaries").expect("exists"));
    assert!(!summary_resource_exists(&store, "jobs").expect("exists"));

    let resolution = resolve_summary_resource(&store, "transport").expect("resolve");
    assert_eq!(
        resolution,
        Resolution::NotFound {
            suggestions: vec!["transport-summaries".to_string()],
        }
    );
}

#[test]
fn resolution_serializes_with_status_tag() {
    let value = serde_json::to_value(resolved("jobs", true)).expect("json");
    assert_eq!(value["status"], "resolved");
    assert_eq!(value["name"], "jobs");
}
