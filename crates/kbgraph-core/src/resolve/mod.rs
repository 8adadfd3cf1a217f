//! Maps loosely-typed names onto exactly one canonical resource.
//!
//! Resolution never guesses: a name either resolves to one catalog entry, or
//! comes back as [`Resolution::NotFound`] with ranked suggestions, or as
//! [`Resolution::Ambiguous`] with every candidate that matched.

use rusqlite::params;
use serde::Serialize;
use tracing::debug;

use crate::error::{KnowledgeError, Result};
use crate::store::KnowledgeStore;
use crate::text::{contains_pattern, normalize_name, prefix_pattern};

mod variants;

pub use variants::{name_variants, singularize_word};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 6;
const FALLBACK_SUGGESTION_LIMIT: usize = 5;
const MIN_SUGGESTION_TOKEN_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// `name` is empty only when the input was blank.
    Resolved { name: String, rewritten: bool },
    NotFound { suggestions: Vec<String> },
    Ambiguous { candidates: Vec<String> },
}

impl Resolution {
    fn from_matches(matches: Vec<String>) -> Option<Self> {
        match matches.len() {
            0 => None,
            1 => matches.into_iter().next().map(|name| Self::Resolved {
                name,
                rewritten: true,
            }),
            _ => Some(Self::Ambiguous {
                candidates: matches,
            }),
        }
    }

    /// Converts the two failure variants (and blank input) into errors that
    /// name `label` and the raw input.
    pub fn require(self, label: &str, raw: &str) -> Result<ResolvedName> {
        let original = raw.trim().to_string();
        match self {
            Self::Resolved { name, .. } if name.is_empty() => {
                Err(KnowledgeError::Validation(format!("{label} is required")))
            }
            Self::Resolved { name, rewritten } => Ok(ResolvedName {
                name,
                original,
                label: label.to_string(),
                rewritten,
            }),
            Self::NotFound { suggestions } => Err(KnowledgeError::NotFound {
                label: label.to_string(),
                name: original,
                suggestions,
            }),
            Self::Ambiguous { candidates } => Err(KnowledgeError::Ambiguous {
                label: label.to_string(),
                name: original,
                matches: candidates,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedName {
    pub name: String,
    pub original: String,
    pub label: String,
    pub rewritten: bool,
}

impl ResolvedName {
    /// One-line note shown to the user when the name was rewritten.
    #[must_use]
    pub fn notice(&self) -> Option<String> {
        self.rewritten.then(|| {
            format!(
                "Interpreting {} \"{}\" as \"{}\".",
                self.label, self.original, self.name
            )
        })
    }
}

pub fn resource_exists(store: &KnowledgeStore, name: &str) -> Result<bool> {
    store.exists(
        "SELECT 1 FROM resources WHERE name = ?1 LIMIT 1",
        params![name],
    )
}

pub fn summary_resource_exists(store: &KnowledgeStore, name: &str) -> Result<bool> {
    store.exists(
        r"
        SELECT 1 FROM summary_resource_targets WHERE summary_resource = ?1
        UNION ALL
        SELECT 1 FROM summary_dimensions WHERE summary_resource = ?1
        UNION ALL
        SELECT 1 FROM summary_metrics WHERE summary_resource = ?1
        LIMIT 1
        ",
        params![name],
    )
}

/// Summary resources linked through a `summarize` command whose path is
/// either the name itself or `summarize <name> ...`.
pub fn summary_resources_for_command(
    store: &KnowledgeStore,
    command_name: &str,
) -> Result<Vec<String>> {
    let command_name = normalize_name(command_name);
    if command_name.is_empty() {
        return Ok(Vec::new());
    }
    store.query(
        r"
        SELECT DISTINCT crl.resource
        FROM commands c
        JOIN command_resource_links crl ON crl.command_id = c.id
        WHERE crl.command_kind = 'summarize'
          AND (c.full_path = ?1 OR c.full_path LIKE ?2 ESCAPE '\')
        ORDER BY crl.resource
        ",
        params![command_name, prefix_pattern(&format!("summarize {command_name} "))],
        |row| row.get::<_, String>(0),
    )
}

pub fn resolve_resource(store: &KnowledgeStore, raw: &str) -> Result<Resolution> {
    let name = normalize_name(raw);
    if name.is_empty() || resource_exists(store, &name)? {
        return Ok(Resolution::Resolved {
            name,
            rewritten: false,
        });
    }

    if let Some(resolution) =
        Resolution::from_matches(summary_resources_for_command(store, &name)?)
    {
        debug!(input = %name, ?resolution, "resolved resource through summarize command");
        return Ok(resolution);
    }

    let mut matches = Vec::new();
    for candidate in name_variants(&name) {
        if resource_exists(store, &candidate)? {
            matches.push(candidate);
        }
    }
    if let Some(resolution) = Resolution::from_matches(matches) {
        debug!(input = %name, ?resolution, "resolved resource through name variants");
        return Ok(resolution);
    }

    Ok(Resolution::NotFound {
        suggestions: suggest_resources(store, &name, DEFAULT_SUGGESTION_LIMIT)?,
    })
}

/// Resolution inside the summary namespace; never tries resource plurals.
pub fn resolve_summary_resource(store: &KnowledgeStore, raw: &str) -> Result<Resolution> {
    let name = normalize_name(raw);
    if name.is_empty() || summary_resource_exists(store, &name)? {
        return Ok(Resolution::Resolved {
            name,
            rewritten: false,
        });
    }

    if let Some(resolution) =
        Resolution::from_matches(summary_resources_for_command(store, &name)?)
    {
        return Ok(resolution);
    }

    if let Some(candidate) = variants::summary_to_summaries(&name)
        && summary_resource_exists(store, &candidate)?
    {
        return Ok(Resolution::Resolved {
            name: candidate,
            rewritten: true,
        });
    }

    Ok(Resolution::NotFound {
        suggestions: suggest_summary_resources(store, &name, DEFAULT_SUGGESTION_LIMIT)?,
    })
}

/// Resolves a required positional resource argument.
pub fn require_resource(store: &KnowledgeStore, raw: &str, label: &str) -> Result<ResolvedName> {
    resolve_resource(store, raw)?.require(label, raw)
}

/// Resolves an optional resource flag; blank values mean "no filter".
pub fn resolve_resource_flag(
    store: &KnowledgeStore,
    raw: Option<&str>,
    label: &str,
) -> Result<Option<ResolvedName>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => require_resource(store, value, label).map(Some),
    }
}

pub fn resolve_summary_flag(
    store: &KnowledgeStore,
    raw: Option<&str>,
    label: &str,
) -> Result<Option<ResolvedName>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => resolve_summary_resource(store, value)?
            .require(label, value)
            .map(Some),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Namespace {
    Resources,
    Summaries,
}

impl Namespace {
    const fn names_sql(self) -> &'static str {
        match self {
            Self::Resources => "SELECT name FROM resources",
            Self::Summaries => {
                r"
                SELECT summary_resource FROM summary_resource_targets
                UNION SELECT summary_resource FROM summary_dimensions
                UNION SELECT summary_resource FROM summary_metrics
                "
            }
        }
    }
}

pub fn suggest_resources(store: &KnowledgeStore, raw: &str, limit: usize) -> Result<Vec<String>> {
    suggest(store, Namespace::Resources, raw, limit)
}

pub fn suggest_summary_resources(
    store: &KnowledgeStore,
    raw: &str,
    limit: usize,
) -> Result<Vec<String>> {
    suggest(store, Namespace::Summaries, raw, limit)
}

/// Whole-needle substring matches first; when those under-fill the budget,
/// each hyphen token of at least three characters is searched the same way.
fn suggest(
    store: &KnowledgeStore,
    namespace: Namespace,
    raw: &str,
    limit: usize,
) -> Result<Vec<String>> {
    let needle = normalize_name(raw);
    if needle.is_empty() {
        return Ok(Vec::new());
    }
    let limit = if limit == 0 {
        FALLBACK_SUGGESTION_LIMIT
    } else {
        limit
    };

    let mut results = Vec::new();
    merge_suggestions(
        &mut results,
        ranked_matches(store, namespace, &needle, limit)?,
        limit,
    );

    for token in needle.split('-').map(str::trim) {
        if results.len() >= limit {
            break;
        }
        if token.chars().count() < MIN_SUGGESTION_TOKEN_LEN || token == needle {
            continue;
        }
        let more = ranked_matches(store, namespace, token, limit - results.len())?;
        merge_suggestions(&mut results, more, limit);
    }
    Ok(results)
}

fn merge_suggestions(results: &mut Vec<String>, items: Vec<String>, limit: usize) {
    for item in items {
        if results.len() >= limit {
            return;
        }
        if !results.contains(&item) {
            results.push(item);
        }
    }
}

fn ranked_matches(
    store: &KnowledgeStore,
    namespace: Namespace,
    needle: &str,
    limit: usize,
) -> Result<Vec<String>> {
    let sql = format!(
        r"
        WITH names(name) AS ({})
        SELECT DISTINCT name
        FROM names
        WHERE name LIKE ?1 ESCAPE '\'
        ORDER BY
          CASE
            WHEN name = ?2 THEN 0
            WHEN name LIKE ?3 ESCAPE '\' THEN 1
            ELSE 2
          END,
          LENGTH(name),
          name
        LIMIT ?4
        ",
        namespace.names_sql()
    );
    store.query(
        &sql,
        params![
            contains_pattern(needle),
            needle,
            prefix_pattern(needle),
            i64::try_from(limit).unwrap_or(i64::MAX)
        ],
        |row| row.get::<_, String>(0),
    )
}

#[cfg(test)]
mod tests;
