use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, OptionalExtension, Params, Row};
use tracing::debug;

use crate::config::{KnowledgeConfig, StoreLocation};
use crate::error::{KnowledgeError, Result};

/// Read-only handle on the knowledge snapshot.
///
/// Every connection is placed in `query_only` mode with a bounded busy timeout
/// before it is handed out, so no query builder can mutate the snapshot and a
/// concurrent reader can never wedge a command.
pub struct KnowledgeStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for KnowledgeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl KnowledgeStore {
    pub fn open(location: &StoreLocation, config: &KnowledgeConfig) -> Result<Self> {
        let path = std::path::absolute(&location.path).map_err(|source| {
            KnowledgeError::StoreUnreadable {
                path: location.path.clone(),
                source,
            }
        })?;
        ensure_readable_file(&path)?;

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(
            path = %path.display(),
            source = location.source.as_str(),
            "opened knowledge store"
        );
        Self::configure(conn, Some(path), config)
    }

    /// Wraps an already-open connection (in-memory stores, fixtures) with the
    /// same read-only configuration `open` applies.
    pub fn from_connection(conn: Connection, config: &KnowledgeConfig) -> Result<Self> {
        Self::configure(conn, None, config)
    }

    fn configure(conn: Connection, path: Option<PathBuf>, config: &KnowledgeConfig) -> Result<Self> {
        conn.busy_timeout(config.busy_timeout)?;
        conn.pragma_update(None, "query_only", "ON")?;
        Ok(Self { conn, path })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn query<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn query_opt<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Option<T>>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let value = self.conn.query_row(sql, params, map).optional()?;
        Ok(value)
    }

    pub fn exists<P: Params>(&self, sql: &str, params: P) -> Result<bool> {
        Ok(self.query_opt(sql, params, |_| Ok(()))?.is_some())
    }

    pub fn is_query_only(&self) -> Result<bool> {
        let value: i64 = self
            .conn
            .pragma_query_value(None, "query_only", |row| row.get(0))?;
        Ok(value != 0)
    }

    pub fn busy_timeout_ms(&self) -> Result<i64> {
        let value = self
            .conn
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))?;
        Ok(value)
    }

    #[cfg(test)]
    pub(crate) fn raw_connection(&self) -> &Connection {
        &self.conn
    }
}

fn ensure_readable_file(path: &Path) -> Result<()> {
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => KnowledgeError::StoreNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => KnowledgeError::StorePermissionDenied {
            path: path.to_path_buf(),
        },
        _ => KnowledgeError::StoreUnreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let metadata = file
        .metadata()
        .map_err(|source| KnowledgeError::StoreUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    if !metadata.is_file() {
        return Err(KnowledgeError::StoreUnreadable {
            path: path.to_path_buf(),
            source: std::io::Error::new(ErrorKind::InvalidInput, "not a regular file"),
        });
    }
    Ok(())
}
