//! Precomputed filter paths: which command flags reach which target resources,
//! and through how many hops.

use rusqlite::params;
use serde::Serialize;

use crate::error::{KnowledgeError, Result};
use crate::page::Page;
use crate::store::KnowledgeStore;
use crate::text::{contains_pattern, normalize_name};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPathQuery {
    /// Substring that must select exactly one command path.
    pub command: Option<String>,
    /// Canonical resource name, matched exactly.
    pub resource: Option<String>,
    /// Substring of the flag name.
    pub flag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterPathRow {
    pub command: String,
    pub resource: String,
    pub flag: String,
    pub path: String,
    pub target_resource: String,
    pub target_field: Option<String>,
    pub hop_count: i64,
    pub match_kind: String,
    pub modifier: Option<String>,
}

impl FilterPathRow {
    /// `exact`, or `exact (not)` when the flag carries a modifier.
    #[must_use]
    pub fn match_label(&self) -> String {
        match self.modifier.as_deref().map(str::trim) {
            Some(modifier) if !modifier.is_empty() => format!("{} ({modifier})", self.match_kind),
            _ => self.match_kind.clone(),
        }
    }

    #[must_use]
    pub fn hop_chain(&self) -> Vec<&str> {
        self.path.split('.').filter(|hop| !hop.is_empty()).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterPaths {
    /// Full path of the command the listing was scoped to.
    pub scope_command: Option<String>,
    pub rows: Vec<FilterPathRow>,
}

impl FilterPaths {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn empty_message(&self) -> String {
        match &self.scope_command {
            Some(command) => format!("No filter paths for command \"{command}\"."),
            None => "No filter paths found.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRef {
    pub id: String,
    pub full_path: String,
}

/// Exactly one command whose path contains `pattern`; no exact-match
/// preference is applied.
pub fn resolve_command(store: &KnowledgeStore, pattern: &str) -> Result<CommandRef> {
    let needle = normalize_name(pattern);
    if needle.is_empty() {
        return Err(KnowledgeError::Validation("command is required".to_string()));
    }
    let mut matches = store.query(
        r"
        SELECT id, full_path
        FROM commands
        WHERE LOWER(full_path) LIKE ?1 ESCAPE '\'
        ORDER BY full_path, id
        ",
        params![contains_pattern(&needle)],
        |row| {
            Ok(CommandRef {
                id: row.get(0)?,
                full_path: row.get(1)?,
            })
        },
    )?;
    match matches.len() {
        0 => Err(KnowledgeError::CommandNoMatch(pattern.trim().to_string())),
        1 => Ok(matches.remove(0)),
        _ => Err(KnowledgeError::CommandAmbiguous {
            pattern: pattern.trim().to_string(),
            matches: matches.into_iter().map(|c| c.full_path).collect(),
        }),
    }
}

pub fn filter_paths(
    store: &KnowledgeStore,
    query: &FilterPathQuery,
    page: Page,
) -> Result<FilterPaths> {
    let command = query
        .command
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .map(|value| resolve_command(store, value))
        .transpose()?;
    let resource = query
        .resource
        .as_deref()
        .map(normalize_name)
        .filter(|value| !value.is_empty());
    let flag = query
        .flag
        .as_deref()
        .map(normalize_name)
        .filter(|value| !value.is_empty())
        .map(|value| contains_pattern(&value));
    let (limit, offset) = page.sql_bounds();

    let rows = store.query(
        r"
        SELECT COALESCE(c.full_path, ''), p.resource, p.flag_name, p.path,
               p.target_resource, p.target_field, p.hop_count, p.match_kind, p.modifier
        FROM command_filter_paths p
        LEFT JOIN commands c ON c.id = p.command_id
        WHERE (?1 IS NULL OR p.command_id = ?1)
          AND (?2 IS NULL OR p.resource = ?2)
          AND (?3 IS NULL OR LOWER(p.flag_name) LIKE ?3 ESCAPE '\')
        ORDER BY 1, p.flag_name, p.path
        LIMIT ?4 OFFSET ?5
        ",
        params![
            command.as_ref().map(|c| c.id.as_str()),
            resource,
            flag,
            limit,
            offset
        ],
        |row| {
            Ok(FilterPathRow {
                command: row.get(0)?,
                resource: row.get(1)?,
                flag: row.get(2)?,
                path: row.get(3)?,
                target_resource: row.get(4)?,
                target_field: row.get(5)?,
                hop_count: row.get(6)?,
                match_kind: row.get(7)?,
                modifier: row.get(8)?,
            })
        },
    )?;

    Ok(FilterPaths {
        scope_command: command.map(|c| c.full_path),
        rows,
    })
}
