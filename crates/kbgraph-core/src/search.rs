//! Substring search across every entity kind in the snapshot.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rusqlite::params;
use serde::Serialize;
use tracing::debug;

use crate::error::{KnowledgeError, Result};
use crate::page::Page;
use crate::store::KnowledgeStore;
use crate::text::{contains_pattern, parse_json_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Resources,
    Commands,
    Fields,
    Flags,
    Relationships,
    Summaries,
    Dimensions,
    Metrics,
}

impl SearchKind {
    pub const ALL: [Self; 8] = [
        Self::Resources,
        Self::Commands,
        Self::Fields,
        Self::Flags,
        Self::Relationships,
        Self::Summaries,
        Self::Dimensions,
        Self::Metrics,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resources => "resources",
            Self::Commands => "commands",
            Self::Fields => "fields",
            Self::Flags => "flags",
            Self::Relationships => "relationships",
            Self::Summaries => "summaries",
            Self::Dimensions => "dimensions",
            Self::Metrics => "metrics",
        }
    }

    /// Parses a comma-separated kind list; blank input means every kind.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>> {
        let mut kinds = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let kind = part.parse::<Self>()?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(kinds)
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = KnowledgeError;

    fn from_str(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        let kind = match normalized.as_str() {
            "resources" | "resource" => Self::Resources,
            "commands" | "command" => Self::Commands,
            "fields" | "field" => Self::Fields,
            "flags" | "flag" => Self::Flags,
            "relationships" | "relationship" => Self::Relationships,
            "summaries" | "summary" => Self::Summaries,
            "dimensions" | "dimension" => Self::Dimensions,
            "metrics" | "metric" => Self::Metrics,
            _ => {
                let allowed = Self::ALL.map(Self::as_str).join(", ");
                return Err(KnowledgeError::Validation(format!(
                    "unknown search kind \"{raw}\" (allowed: {allowed})"
                )));
            }
        };
        Ok(kind)
    }
}

/// Label attached to a single hit; hits sort by this label first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    Resource,
    Command,
    Field,
    Flag,
    FlagDesc,
    Relationship,
    Summary,
    Dimension,
    Metric,
}

impl HitKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Resource => "resource",
            Self::Command => "command",
            Self::Field => "field",
            Self::Flag => "flag",
            Self::FlagDesc => "flag_desc",
            Self::Relationship => "relationship",
            Self::Summary => "summary",
            Self::Dimension => "dimension",
            Self::Metric => "metric",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub kind: HitKind,
    pub name: String,
    pub detail: String,
}

impl SearchHit {
    fn new(kind: HitKind, name: String, detail: String) -> Self {
        Self { kind, name, detail }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub query: String,
    /// Hits before pagination.
    pub total: usize,
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Runs the query against each requested kind (every kind when `kinds` is
/// empty), merges the hits in `(kind, name, detail)` order and pages them.
pub fn search(
    store: &KnowledgeStore,
    query: &str,
    kinds: &[SearchKind],
    page: Page,
) -> Result<SearchResults> {
    let query = query.trim();
    if query.is_empty() {
        return Err(KnowledgeError::Validation(
            "search query is required".to_string(),
        ));
    }
    let pattern = contains_pattern(&query.to_lowercase());
    let kinds: &[SearchKind] = if kinds.is_empty() {
        &SearchKind::ALL
    } else {
        kinds
    };

    let mut hits = Vec::new();
    for kind in kinds {
        let found = search_kind(store, *kind, &pattern)?;
        debug!(kind = kind.as_str(), hits = found.len(), "search kind scanned");
        hits.extend(found);
    }
    hits.sort_by(|a, b| {
        a.kind
            .label()
            .cmp(b.kind.label())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.detail.cmp(&b.detail))
    });
    hits.dedup();

    let total = hits.len();
    Ok(SearchResults {
        query: query.to_string(),
        total,
        hits: page.apply(hits),
    })
}

fn search_kind(store: &KnowledgeStore, kind: SearchKind, pattern: &str) -> Result<Vec<SearchHit>> {
    match kind {
        SearchKind::Resources => search_resources(store, pattern),
        SearchKind::Commands => store.query(
            r"
            SELECT full_path, description
            FROM commands
            WHERE LOWER(full_path) LIKE ?1 ESCAPE '\'
               OR LOWER(description) LIKE ?1 ESCAPE '\'
            ",
            params![pattern],
            |row| Ok(SearchHit::new(HitKind::Command, row.get(0)?, row.get(1)?)),
        ),
        SearchKind::Fields => store.query(
            r"
            SELECT resource || '.' || name, kind
            FROM resource_fields
            WHERE LOWER(resource || '.' || name) LIKE ?1 ESCAPE '\'
            ",
            params![pattern],
            |row| Ok(SearchHit::new(HitKind::Field, row.get(0)?, row.get(1)?)),
        ),
        SearchKind::Flags => search_flags(store, pattern),
        SearchKind::Relationships => store.query(
            r"
            SELECT resource || '.' || field, target_resource
            FROM resource_field_targets
            WHERE LOWER(resource || '.' || field) LIKE ?1 ESCAPE '\'
            ",
            params![pattern],
            |row| {
                Ok(SearchHit::new(
                    HitKind::Relationship,
                    row.get(0)?,
                    row.get(1)?,
                ))
            },
        ),
        SearchKind::Summaries => search_summaries(store, pattern),
        SearchKind::Dimensions => store.query(
            r"
            SELECT summary_resource || '.' || name, kind
            FROM summary_dimensions
            WHERE LOWER(summary_resource || '.' || name) LIKE ?1 ESCAPE '\'
            ",
            params![pattern],
            |row| Ok(SearchHit::new(HitKind::Dimension, row.get(0)?, row.get(1)?)),
        ),
        SearchKind::Metrics => store.query(
            r"
            SELECT summary_resource || '.' || name, summary_resource
            FROM summary_metrics
            WHERE LOWER(summary_resource || '.' || name) LIKE ?1 ESCAPE '\'
            ",
            params![pattern],
            |row| Ok(SearchHit::new(HitKind::Metric, row.get(0)?, row.get(1)?)),
        ),
    }
}

fn search_resources(store: &KnowledgeStore, pattern: &str) -> Result<Vec<SearchHit>> {
    store.query(
        r"
        SELECT name, label_fields
        FROM resources
        WHERE LOWER(name) LIKE ?1 ESCAPE '\'
        ",
        params![pattern],
        |row| {
            let labels: Option<String> = row.get(1)?;
            Ok(SearchHit::new(
                HitKind::Resource,
                row.get(0)?,
                parse_json_list(labels.as_deref()).join(", "),
            ))
        },
    )
}

/// A flag whose name matches yields a `flag` hit; a matching description
/// yields a separate `flag_desc` hit.
fn search_flags(store: &KnowledgeStore, pattern: &str) -> Result<Vec<SearchHit>> {
    let rows = store.query(
        r"
        SELECT f.name, f.description, COALESCE(c.full_path, ''),
               LOWER(f.name) LIKE ?1 ESCAPE '\',
               LOWER(f.description) LIKE ?1 ESCAPE '\'
        FROM flags f
        LEFT JOIN commands c ON c.id = f.command_id
        WHERE LOWER(f.name) LIKE ?1 ESCAPE '\'
           OR LOWER(f.description) LIKE ?1 ESCAPE '\'
        ",
        params![pattern],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, bool>(3)?,
                row.get::<_, bool>(4)?,
            ))
        },
    )?;

    let mut hits = Vec::new();
    for (name, description, command_path, name_hit, desc_hit) in rows {
        if name_hit {
            hits.push(SearchHit::new(HitKind::Flag, name.clone(), command_path));
        }
        if desc_hit {
            hits.push(SearchHit::new(HitKind::FlagDesc, name, description));
        }
    }
    Ok(hits)
}

fn search_summaries(store: &KnowledgeStore, pattern: &str) -> Result<Vec<SearchHit>> {
    let rows = store.query(
        r"
        WITH names(name) AS (
            SELECT summary_resource FROM summary_resource_targets
            UNION SELECT summary_resource FROM summary_dimensions
            UNION SELECT summary_resource FROM summary_metrics
        )
        SELECT n.name, t.primary_resource
        FROM names n
        LEFT JOIN summary_resource_targets t ON t.summary_resource = n.name
        WHERE LOWER(n.name) LIKE ?1 ESCAPE '\'
        ORDER BY n.name, t.primary_resource
        ",
        params![pattern],
        |row| Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?)),
    )?;

    let mut primaries: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (summary, primary) in rows {
        let entry = primaries.entry(summary).or_default();
        if let Some(primary) = primary
            && !entry.contains(&primary)
        {
            entry.push(primary);
        }
    }
    Ok(primaries
        .into_iter()
        .map(|(summary, targets)| SearchHit::new(HitKind::Summary, summary, targets.join(", ")))
        .collect())
}

#[cfg(test)]
mod tests {
    use crate::fixtures::SnapshotBuilder;

    use super::*;

    fn everything() -> Page {
        Page::first(usize::MAX)
    }

    fn labels(results: &SearchResults) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = results.hits.iter().map(|h| h.kind.label()).collect();
        labels.dedup();
        labels
    }

    #[test]
    fn job_query_orders_hits_by_kind_label() {
        let store = SnapshotBuilder::sample().into_store();

        let results = search(&store, "job", &[], everything()).expect("search");
        assert_eq!(
            labels(&results),
            vec![
                "command",
                "field",
                "flag",
                "flag_desc",
                "relationship",
                "resource"
            ]
        );
        assert_eq!(results.total, results.hits.len());
        assert_eq!(
            results.hits.first().map(|h| h.name.as_str()),
            Some("view job-sites list")
        );
    }

    #[test]
    fn all_kinds_equals_union_of_single_kinds() {
        let store = SnapshotBuilder::sample().into_store();

        let combined = search(&store, "customer", &[], everything()).expect("search");
        let mut union = Vec::new();
        for kind in SearchKind::ALL {
            union.extend(search(&store, "customer", &[kind], everything()).expect("search").hits);
        }
        union.sort_by(|a, b| {
            (a.kind.label(), &a.name, &a.detail).cmp(&(b.kind.label(), &b.name, &b.detail))
        });
        assert_eq!(combined.hits, union);
        assert!(!combined.is_empty());
    }

    #[test]
    fn repeated_search_is_identical() {
        let store = SnapshotBuilder::sample().into_store();

        let first = search(&store, "site", &[], Page::default()).expect("search");
        let second = search(&store, "site", &[], Page::default()).expect("search");
        assert_eq!(first.hits, second.hits);
    }

    #[test]
    fn pages_partition_the_full_result() {
        let store = SnapshotBuilder::sample().into_store();

        let full = search(&store, "job", &[], everything()).expect("search").hits;
        let head = search(&store, "job", &[], Page::new(0, 5)).expect("search").hits;
        let tail = search(&store, "job", &[], Page::new(5, usize::MAX)).expect("search").hits;
        assert_eq!(head.len(), 5);
        assert_eq!([head, tail].concat(), full);

        let past_end = search(&store, "job", &[], Page::new(full.len(), 10)).expect("search");
        assert!(past_end.is_empty());
        assert_eq!(past_end.total, full.len());
    }

    #[test]
    fn flag_description_match_is_a_separate_hit() {
        let store = SnapshotBuilder::sample().into_store();

        let results = search(&store, "status", &[SearchKind::Flags], everything()).expect("search");
        assert_eq!(
            results.hits,
            vec![
                SearchHit::new(HitKind::Flag, "status".into(), "view jobs list".into()),
                SearchHit::new(HitKind::FlagDesc, "status".into(), "Filter by job status".into()),
            ]
        );
    }

    #[test]
    fn summary_kinds_report_owner_details() {
        let store = SnapshotBuilder::sample().into_store();

        let summaries = search(&store, "transport", &[SearchKind::Summaries], everything())
            .expect("search");
        assert_eq!(
            summaries.hits,
            vec![SearchHit::new(
                HitKind::Summary,
                "transport-summaries".into(),
                "material-transactions".into()
            )]
        );

        let metrics = search(&store, "tons", &[SearchKind::Metrics], everything()).expect("search");
        assert_eq!(
            metrics.hits,
            vec![SearchHit::new(
                HitKind::Metric,
                "transport-summaries.tons".into(),
                "transport-summaries".into()
            )]
        );

        let dims = search(&store, "date", &[SearchKind::Dimensions], everything()).expect("search");
        assert_eq!(dims.hits[0].detail, "date");
    }

    #[test]
    fn resource_hit_detail_lists_label_fields() {
        let store = SnapshotBuilder::sample().into_store();

        let results =
            search(&store, "customers", &[SearchKind::Resources], everything()).expect("search");
        assert_eq!(
            results.hits,
            vec![SearchHit::new(
                HitKind::Resource,
                "customers".into(),
                "company-name".into()
            )]
        );
    }

    #[test]
    fn like_wildcards_in_query_are_literal() {
        let store = SnapshotBuilder::sample().into_store();

        assert!(search(&store, "%", &[], everything()).expect("search").is_empty());
        assert!(search(&store, "j_b", &[], everything()).expect("search").is_empty());
    }

    #[test]
    fn blank_query_is_rejected() {
        let store = SnapshotBuilder::sample().into_store();

        let err = search(&store, "  ", &[], Page::default()).expect_err("blank");
        assert_eq!(err.code(), "VALIDATION_FAILED");
    }

    #[test]
    fn kind_list_parses_aliases_and_rejects_unknown() {
        assert_eq!(
            SearchKind::parse_list("resource, flags,resources").expect("parse"),
            vec![SearchKind::Resources, SearchKind::Flags]
        );
        assert!(SearchKind::parse_list("").expect("parse").is_empty());

        let err = SearchKind::parse_list("widgets").expect_err("unknown kind");
        assert!(err.to_string().contains("allowed: resources, commands"), "{err}");
    }
}
