use rusqlite::params;
use serde::Serialize;

use crate::error::Result;
use crate::page::Page;
use crate::resolve::{ResolvedName, require_resource};
use crate::store::KnowledgeStore;

pub const DEFAULT_NEIGHBOR_LIMIT: usize = 20;

/// Evidence breakdown behind one neighbor score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborRow {
    pub resource: String,
    pub score: f64,
    pub evidence_count: i64,
    pub relationship_count: i64,
    pub summary_count: i64,
    pub filter_path_count: i64,
    pub shared_command_field_count: i64,
    pub shared_summary_dimension_count: i64,
    pub shared_summary_metric_count: i64,
    pub shared_filter_target_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Neighbors {
    pub resource: ResolvedName,
    pub rows: Vec<NeighborRow>,
}

impl Neighbors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn empty_message(&self) -> String {
        format!("no neighbors for `{}`", self.resource.name)
    }
}

pub fn neighbors(store: &KnowledgeStore, resource: &str, page: Page) -> Result<Neighbors> {
    let resolved = require_resource(store, resource, "resource")?;
    let (limit, offset) = page.sql_bounds();

    let rows = store.query(
        r"
        SELECT target_resource, score, evidence_count,
               relationship_count, summary_count, filter_path_count,
               shared_command_field_count, shared_summary_dimension_count,
               shared_summary_metric_count, shared_filter_target_count
        FROM resource_neighbor_scores
        WHERE source_resource = ?1
        ORDER BY score DESC, target_resource ASC
        LIMIT ?2 OFFSET ?3
        ",
        params![resolved.name, limit, offset],
        |row| {
            Ok(NeighborRow {
                resource: row.get(0)?,
                score: row.get(1)?,
                evidence_count: row.get(2)?,
                relationship_count: row.get(3)?,
                summary_count: row.get(4)?,
                filter_path_count: row.get(5)?,
                shared_command_field_count: row.get(6)?,
                shared_summary_dimension_count: row.get(7)?,
                shared_summary_metric_count: row.get(8)?,
                shared_filter_target_count: row.get(9)?,
            })
        },
    )?;

    Ok(Neighbors {
        resource: resolved,
        rows,
    })
}
