use std::fmt;
use std::str::FromStr;

use rusqlite::params;
use serde::Serialize;

use crate::error::{KnowledgeError, Result};
use crate::resolve::{ResolvedName, require_resource};
use crate::store::KnowledgeStore;
use crate::text::parse_json_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceSection {
    Fields,
    Relationships,
    Summaries,
    SummaryFeatures,
    Commands,
}

impl ResourceSection {
    pub const ALL: [Self; 5] = [
        Self::Fields,
        Self::Relationships,
        Self::Summaries,
        Self::SummaryFeatures,
        Self::Commands,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fields => "fields",
            Self::Relationships => "relationships",
            Self::Summaries => "summaries",
            Self::SummaryFeatures => "summary-features",
            Self::Commands => "commands",
        }
    }

    /// Comma-separated section names; blank input selects every section.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>> {
        let mut sections = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let section = part.parse::<Self>()?;
            if !sections.contains(&section) {
                sections.push(section);
            }
        }
        if sections.is_empty() {
            return Ok(Self::ALL.to_vec());
        }
        Ok(sections)
    }
}

impl fmt::Display for ResourceSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceSection {
    type Err = KnowledgeError;

    fn from_str(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == normalized)
            .ok_or_else(|| {
                let valid = Self::ALL.map(Self::as_str).join(", ");
                KnowledgeError::Validation(format!(
                    "invalid --sections value \"{raw}\" (valid: {valid})"
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailField {
    pub name: String,
    pub kind: String,
    pub is_label: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRelationship {
    pub name: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLink {
    pub resource: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryFeature {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl SummaryFeature {
    /// `date (date)` for dimensions, the bare name for metrics.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.kind {
            Some(kind) => format!("{} ({kind})", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailCommand {
    pub path: String,
    pub kind: String,
    pub verb: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceDetail {
    #[serde(skip)]
    pub resolved: ResolvedName,
    pub name: String,
    pub label_fields: Vec<String>,
    pub server_types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<DetailField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<DetailRelationship>,
    /// Resources this one summarizes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub summary_targets: Vec<SummaryLink>,
    /// Summary resources available for this one.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub summary_sources: Vec<SummaryLink>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub summary_dimensions: Vec<SummaryFeature>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub summary_metrics: Vec<SummaryFeature>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<DetailCommand>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn resource_detail(
    store: &KnowledgeStore,
    raw: &str,
    sections: &[ResourceSection],
) -> Result<ResourceDetail> {
    let resolved = require_resource(store, raw, "resource")?;
    let name = resolved.name.clone();

    let (label_raw, server_raw) = store
        .query_opt(
            "SELECT label_fields, server_types FROM resources WHERE name = ?1",
            params![name],
            |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<String>>(1)?,
                ))
            },
        )?
        .unwrap_or_default();

    let mut detail = ResourceDetail {
        resolved,
        label_fields: parse_json_list(label_raw.as_deref()),
        server_types: parse_json_list(server_raw.as_deref()),
        name,
        fields: Vec::new(),
        relationships: Vec::new(),
        summary_targets: Vec::new(),
        summary_sources: Vec::new(),
        summary_dimensions: Vec::new(),
        summary_metrics: Vec::new(),
        commands: Vec::new(),
    };
    let wants = |section| sections.is_empty() || sections.contains(&section);

    if wants(ResourceSection::Fields) {
        detail.fields = store.query(
            "SELECT name, kind, is_label FROM resource_fields WHERE resource = ?1 ORDER BY kind, name",
            params![detail.name],
            |row| {
                Ok(DetailField {
                    name: row.get(0)?,
                    kind: row.get(1)?,
                    is_label: row.get::<_, i64>(2)? != 0,
                })
            },
        )?;
    }

    if wants(ResourceSection::Relationships) {
        detail.relationships = store.query(
            "SELECT field, target_resource FROM resource_field_targets WHERE resource = ?1 ORDER BY field, target_resource",
            params![detail.name],
            |row| {
                Ok(DetailRelationship {
                    name: row.get(0)?,
                    target: row.get(1)?,
                })
            },
        )?;
    }

    if wants(ResourceSection::Summaries) {
        detail.summary_targets = store.query(
            "SELECT primary_resource, condition FROM summary_resource_targets WHERE summary_resource = ?1 ORDER BY primary_resource",
            params![detail.name],
            |row| {
                Ok(SummaryLink {
                    resource: row.get(0)?,
                    condition: non_blank(row.get(1)?),
                })
            },
        )?;
        detail.summary_sources = store.query(
            "SELECT summary_resource, condition FROM summary_resource_targets WHERE primary_resource = ?1 ORDER BY summary_resource",
            params![detail.name],
            |row| {
                Ok(SummaryLink {
                    resource: row.get(0)?,
                    condition: non_blank(row.get(1)?),
                })
            },
        )?;
    }

    if wants(ResourceSection::SummaryFeatures) {
        detail.summary_dimensions = store.query(
            "SELECT name, kind FROM summary_dimensions WHERE summary_resource = ?1 ORDER BY name, kind",
            params![detail.name],
            |row| {
                Ok(SummaryFeature {
                    name: row.get(0)?,
                    kind: non_blank(row.get(1)?),
                })
            },
        )?;
        detail.summary_metrics = store.query(
            "SELECT name FROM summary_metrics WHERE summary_resource = ?1 ORDER BY name",
            params![detail.name],
            |row| {
                Ok(SummaryFeature {
                    name: row.get(0)?,
                    kind: None,
                })
            },
        )?;
    }

    if wants(ResourceSection::Commands) {
        detail.commands = store.query(
            r"
            SELECT c.full_path, crl.command_kind, crl.verb
            FROM command_resource_links crl
            JOIN commands c ON c.id = crl.command_id
            WHERE crl.resource = ?1
            ORDER BY c.full_path
            ",
            params![detail.name],
            |row| {
                Ok(DetailCommand {
                    path: row.get(0)?,
                    kind: row.get(1)?,
                    verb: row.get(2)?,
                })
            },
        )?;
    }

    Ok(detail)
}
