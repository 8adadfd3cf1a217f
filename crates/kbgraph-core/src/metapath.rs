//! Resources ranked by how many structural features they share with a source
//! resource, per metapath kind.

use std::fmt;
use std::str::FromStr;

use rusqlite::params;
use serde::Serialize;

use crate::error::{KnowledgeError, Result};
use crate::page::Page;
use crate::resolve::{ResolvedName, require_resource};
use crate::store::KnowledgeStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    CommandField,
    SummaryDimension,
    SummaryMetric,
    FilterTarget,
}

impl PathKind {
    pub const ALL: [Self; 4] = [
        Self::CommandField,
        Self::SummaryDimension,
        Self::SummaryMetric,
        Self::FilterTarget,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CommandField => "command_field",
            Self::SummaryDimension => "summary_dimension",
            Self::SummaryMetric => "summary_metric",
            Self::FilterTarget => "filter_target",
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathKind {
    type Err = KnowledgeError;

    fn from_str(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                let allowed = Self::ALL.map(Self::as_str).join(", ");
                KnowledgeError::Validation(format!(
                    "unknown metapath kind \"{raw}\" (allowed: {allowed})"
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetapathRow {
    pub resource: String,
    pub kind: String,
    pub shared_features: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Metapath {
    pub resource: ResolvedName,
    pub kind: Option<PathKind>,
    pub rows: Vec<MetapathRow>,
}

impl Metapath {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn empty_message(&self) -> String {
        format!("no metapath matches for `{}`", self.resource.name)
    }
}

/// Similarity rows are stored once per pair with `source < target`, so the
/// source is looked up on both sides and the other side reported.
pub fn metapath(
    store: &KnowledgeStore,
    resource: &str,
    kind: Option<PathKind>,
    page: Page,
) -> Result<Metapath> {
    let resolved = require_resource(store, resource, "resource")?;
    let (limit, offset) = page.sql_bounds();

    let rows = store.query(
        r"
        WITH pairs(resource, kind, shared) AS (
            SELECT target_resource, path_kind, shared_features
            FROM resource_metapath_similarity
            WHERE source_resource = ?1
            UNION ALL
            SELECT source_resource, path_kind, shared_features
            FROM resource_metapath_similarity
            WHERE target_resource = ?1
        )
        SELECT resource, kind, shared
        FROM pairs
        WHERE resource <> ?1
          AND (?2 IS NULL OR kind = ?2)
        ORDER BY shared DESC, resource ASC, kind ASC
        LIMIT ?3 OFFSET ?4
        ",
        params![resolved.name, kind.map(PathKind::as_str), limit, offset],
        |row| {
            Ok(MetapathRow {
                resource: row.get(0)?,
                kind: row.get(1)?,
                shared_features: row.get(2)?,
            })
        },
    )?;

    Ok(Metapath {
        resource: resolved,
        kind,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use crate::fixtures::SnapshotBuilder;

    use super::*;

    #[test]
    fn reads_both_stored_directions() {
        let store = SnapshotBuilder::sample().into_store();

        let result = metapath(&store, "jobs", None, Page::default()).expect("metapath");
        let rows: Vec<(&str, &str, i64)> = result
            .rows
            .iter()
            .map(|r| (r.resource.as_str(), r.kind.as_str(), r.shared_features))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("customers", "command_field", 5),
                ("job-sites", "command_field", 5),
                ("customers", "filter_target", 2),
                ("job-sites", "filter_target", 1),
                ("transport-summaries", "summary_dimension", 1),
            ]
        );
    }

    #[test]
    fn kind_filter_keeps_only_that_kind() {
        let store = SnapshotBuilder::sample().into_store();

        let result = metapath(
            &store,
            "jobs",
            Some(PathKind::SummaryDimension),
            Page::default(),
        )
        .expect("metapath");
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].resource, "transport-summaries");
        assert!(result.rows.iter().all(|r| r.kind == "summary_dimension"));
    }

    #[test]
    fn source_name_goes_through_resolver() {
        let store = SnapshotBuilder::sample().into_store();

        let result = metapath(&store, "customer", None, Page::default()).expect("metapath");
        assert_eq!(result.resource.name, "customers");
        assert!(result.resource.notice().is_some());
        assert_eq!(result.rows[0].resource, "jobs");

        let err = metapath(&store, "invoices", None, Page::default()).expect_err("unknown");
        assert_eq!(err.code(), "RESOURCE_NOT_FOUND");
    }

    #[test]
    fn empty_result_has_message() {
        let store = SnapshotBuilder::sample().into_store();

        let result = metapath(&store, "material-transactions", None, Page::default())
            .expect("metapath");
        assert!(result.is_empty());
        assert_eq!(
            result.empty_message(),
            "no metapath matches for `material-transactions`"
        );
    }

    #[test]
    fn path_kind_parses_known_values() {
        assert_eq!(
            "summary-metric".parse::<PathKind>().expect("kind"),
            PathKind::SummaryMetric
        );
        let err = "shared".parse::<PathKind>().expect_err("unknown");
        assert!(err.to_string().contains("command_field"), "{err}");
    }

    #[test]
    fn pagination_applies_after_ordering() {
        let store = SnapshotBuilder::sample().into_store();

        let page = metapath(&store, "jobs", None, Page::new(1, 2)).expect("metapath");
        let names: Vec<&str> = page.rows.iter().map(|r| r.resource.as_str()).collect();
        assert_eq!(names, vec!["job-sites", "customers"]);
    }
}
