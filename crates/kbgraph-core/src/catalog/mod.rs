//! Flat listings over the snapshot tables.
//!
//! Filters are optional and combinable. Resource filters expect canonical names
//! (the CLI runs them through the resolver first); `query` filters are
//! case-insensitive substrings.

use std::fmt;
use std::str::FromStr;

use rusqlite::params;
use serde::Serialize;

use crate::error::{KnowledgeError, Result};
use crate::page::Page;
use crate::store::KnowledgeStore;
use crate::text::{contains_pattern, normalize_name, parse_json_list};

mod detail;

pub use detail::{
    DetailCommand, DetailField, DetailRelationship, ResourceDetail, ResourceSection,
    SummaryFeature, SummaryLink, resource_detail,
};

fn like_filter(raw: Option<&str>) -> Option<String> {
    raw.map(normalize_name)
        .filter(|value| !value.is_empty())
        .map(|value| contains_pattern(&value))
}

fn exact_filter(raw: Option<&str>) -> Option<String> {
    raw.map(normalize_name).filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRow {
    pub name: String,
    pub label_fields: Vec<String>,
}

pub fn resources(store: &KnowledgeStore, query: Option<&str>, page: Page) -> Result<Vec<ResourceRow>> {
    let (limit, offset) = page.sql_bounds();
    store.query(
        r"
        SELECT name, label_fields
        FROM resources
        WHERE ?1 IS NULL OR LOWER(name) LIKE ?1 ESCAPE '\'
        ORDER BY name
        LIMIT ?2 OFFSET ?3
        ",
        params![like_filter(query), limit, offset],
        |row| {
            let labels: Option<String> = row.get(1)?;
            Ok(ResourceRow {
                name: row.get(0)?,
                label_fields: parse_json_list(labels.as_deref()),
            })
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRow {
    pub path: String,
    pub description: String,
}

/// Commands, optionally restricted to those linked to `resource` and to paths
/// or descriptions containing `query`.
pub fn commands(
    store: &KnowledgeStore,
    resource: Option<&str>,
    query: Option<&str>,
    page: Page,
) -> Result<Vec<CommandRow>> {
    let (limit, offset) = page.sql_bounds();
    store.query(
        r"
        SELECT c.full_path, c.description
        FROM commands c
        WHERE (?1 IS NULL OR EXISTS (
                 SELECT 1 FROM command_resource_links crl
                 WHERE crl.command_id = c.id AND crl.resource = ?1
               ))
          AND (?2 IS NULL
               OR LOWER(c.full_path) LIKE ?2 ESCAPE '\'
               OR LOWER(c.description) LIKE ?2 ESCAPE '\')
        ORDER BY c.full_path
        LIMIT ?3 OFFSET ?4
        ",
        params![exact_filter(resource), like_filter(query), limit, offset],
        |row| {
            Ok(CommandRow {
                path: row.get(0)?,
                description: row.get(1)?,
            })
        },
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Attribute,
    Relationship,
}

impl FieldKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attribute => "attribute",
            Self::Relationship => "relationship",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = KnowledgeError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "attribute" => Ok(Self::Attribute),
            "relationship" => Ok(Self::Relationship),
            _ => Err(KnowledgeError::Validation(format!(
                "invalid --kind value \"{raw}\" (valid: attribute, relationship)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FieldQuery {
    pub resource: Option<String>,
    pub query: Option<String>,
    pub kind: Option<FieldKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRow {
    pub resource: String,
    pub name: String,
    pub kind: String,
    pub is_label: bool,
}

pub fn fields(store: &KnowledgeStore, filter: &FieldQuery, page: Page) -> Result<Vec<FieldRow>> {
    let (limit, offset) = page.sql_bounds();
    store.query(
        r"
        SELECT resource, name, kind, is_label
        FROM resource_fields
        WHERE (?1 IS NULL OR resource = ?1)
          AND (?2 IS NULL OR LOWER(name) LIKE ?2 ESCAPE '\')
          AND (?3 IS NULL OR kind = ?3)
        ORDER BY resource, name
        LIMIT ?4 OFFSET ?5
        ",
        params![
            exact_filter(filter.resource.as_deref()),
            like_filter(filter.query.as_deref()),
            filter.kind.map(FieldKind::as_str),
            limit,
            offset
        ],
        |row| {
            Ok(FieldRow {
                resource: row.get(0)?,
                name: row.get(1)?,
                kind: row.get(2)?,
                is_label: row.get::<_, i64>(3)? != 0,
            })
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagRow {
    pub command: String,
    pub name: String,
    pub description: String,
}

/// `command` is a substring of the owning command path; `query` matches the
/// flag name or its description.
pub fn flags(
    store: &KnowledgeStore,
    command: Option<&str>,
    query: Option<&str>,
    page: Page,
) -> Result<Vec<FlagRow>> {
    let (limit, offset) = page.sql_bounds();
    store.query(
        r"
        SELECT COALESCE(c.full_path, ''), f.name, f.description
        FROM flags f
        LEFT JOIN commands c ON c.id = f.command_id
        WHERE (?1 IS NULL OR LOWER(c.full_path) LIKE ?1 ESCAPE '\')
          AND (?2 IS NULL
               OR LOWER(f.name) LIKE ?2 ESCAPE '\'
               OR LOWER(f.description) LIKE ?2 ESCAPE '\')
        ORDER BY 1, f.name
        LIMIT ?3 OFFSET ?4
        ",
        params![like_filter(command), like_filter(query), limit, offset],
        |row| {
            Ok(FlagRow {
                command: row.get(0)?,
                name: row.get(1)?,
                description: row.get(2)?,
            })
        },
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Relationship,
    Summary,
}

impl EdgeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relationship => "relationship",
            Self::Summary => "summary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationRow {
    pub resource: String,
    /// Field name for relationship edges; `summarizes` for summary edges.
    pub relationship: String,
    pub target: String,
    pub edge: EdgeKind,
    pub condition: Option<String>,
}

const SUMMARY_EDGE_LABEL: &str = "summarizes";

/// Relationship edges from field targets plus summary edges from summary
/// resources to the resources they summarize.
pub fn relations(
    store: &KnowledgeStore,
    resource: Option<&str>,
    target: Option<&str>,
    page: Page,
) -> Result<Vec<RelationRow>> {
    let (limit, offset) = page.sql_bounds();
    store.query(
        r"
        WITH edges(resource, relationship, target, edge, condition) AS (
            SELECT resource, field, target_resource, 'relationship', NULL
            FROM resource_field_targets
            UNION ALL
            SELECT summary_resource, ?5, primary_resource, 'summary', condition
            FROM summary_resource_targets
        )
        SELECT resource, relationship, target, edge, condition
        FROM edges
        WHERE (?1 IS NULL OR resource = ?1)
          AND (?2 IS NULL OR target = ?2)
        ORDER BY resource, relationship, target
        LIMIT ?3 OFFSET ?4
        ",
        params![
            exact_filter(resource),
            exact_filter(target),
            limit,
            offset,
            SUMMARY_EDGE_LABEL
        ],
        |row| {
            let edge = match row.get::<_, String>(3)?.as_str() {
                "summary" => EdgeKind::Summary,
                _ => EdgeKind::Relationship,
            };
            Ok(RelationRow {
                resource: row.get(0)?,
                relationship: row.get(1)?,
                target: row.get(2)?,
                edge,
                condition: row
                    .get::<_, Option<String>>(4)?
                    .filter(|value| !value.trim().is_empty()),
            })
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub summary: String,
    pub primary_resource: String,
    pub condition: Option<String>,
}

pub fn summaries(
    store: &KnowledgeStore,
    summary: Option<&str>,
    primary_resource: Option<&str>,
    page: Page,
) -> Result<Vec<SummaryRow>> {
    let (limit, offset) = page.sql_bounds();
    store.query(
        r"
        SELECT summary_resource, primary_resource, condition
        FROM summary_resource_targets
        WHERE (?1 IS NULL OR summary_resource = ?1)
          AND (?2 IS NULL OR primary_resource = ?2)
        ORDER BY summary_resource, primary_resource
        LIMIT ?3 OFFSET ?4
        ",
        params![
            exact_filter(summary),
            exact_filter(primary_resource),
            limit,
            offset
        ],
        |row| {
            Ok(SummaryRow {
                summary: row.get(0)?,
                primary_resource: row.get(1)?,
                condition: row
                    .get::<_, Option<String>>(2)?
                    .filter(|value| !value.trim().is_empty()),
            })
        },
    )
}

#[cfg(test)]
mod tests;
