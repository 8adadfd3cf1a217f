use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KnowledgeError>;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error(
        "knowledge database not found at {}; reinstall the CLI or run build_tools/compile.py when building from source",
        .path.display()
    )]
    StoreNotFound { path: PathBuf },

    #[error("knowledge database is not accessible (permission denied): {}", .path.display())]
    StorePermissionDenied { path: PathBuf },

    #[error("unable to access knowledge database at {}: {source}", .path.display())]
    StoreUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("knowledge db: {0}")]
    Query(#[source] rusqlite::Error),

    #[error("knowledge db query interrupted")]
    Interrupted,

    #[error("{label} \"{name}\" not found{}", hint_suffix(.suggestions))]
    NotFound {
        label: String,
        name: String,
        suggestions: Vec<String>,
    },

    #[error("{label} \"{name}\" is ambiguous (matches: {})", .matches.join(", "))]
    Ambiguous {
        label: String,
        name: String,
        matches: Vec<String>,
    },

    #[error("no commands match \"{0}\"")]
    CommandNoMatch(String),

    #[error("multiple commands match \"{pattern}\": {}", .matches.join(", "))]
    CommandAmbiguous {
        pattern: String,
        matches: Vec<String>,
    },

    #[error("validation failed: {0}")]
    Validation(String),
}

impl From<rusqlite::Error> for KnowledgeError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::OperationInterrupted) => Self::Interrupted,
            _ => Self::Query(err),
        }
    }
}

impl KnowledgeError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::StoreNotFound { .. } => "STORE_NOT_FOUND",
            Self::StorePermissionDenied { .. } => "STORE_PERMISSION_DENIED",
            Self::StoreUnreadable { .. } => "STORE_UNREADABLE",
            Self::Query(_) => "QUERY_FAILED",
            Self::Interrupted => "INTERRUPTED",
            Self::NotFound { .. } => "RESOURCE_NOT_FOUND",
            Self::Ambiguous { .. } => "RESOURCE_AMBIGUOUS",
            Self::CommandNoMatch(_) => "COMMAND_NOT_FOUND",
            Self::CommandAmbiguous { .. } => "COMMAND_AMBIGUOUS",
            Self::Validation(_) => "VALIDATION_FAILED",
        }
    }

    /// True for errors that mean the store could not be opened at all.
    pub const fn is_store_unavailable(&self) -> bool {
        matches!(
            self,
            Self::StoreNotFound { .. }
                | Self::StorePermissionDenied { .. }
                | Self::StoreUnreadable { .. }
        )
    }

    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

fn hint_suffix(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    format!("; closest matches: {}", suggestions.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_lists_closest_matches() {
        let err = KnowledgeError::NotFound {
            label: "resource".to_string(),
            name: "jobz".to_string(),
            suggestions: vec!["jobs".to_string(), "job-sites".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "resource \"jobz\" not found; closest matches: jobs, job-sites"
        );
        assert_eq!(err.code(), "RESOURCE_NOT_FOUND");
    }

    #[test]
    fn not_found_without_suggestions_has_no_hint() {
        let err = KnowledgeError::NotFound {
            label: "--summary".to_string(),
            name: "zzz".to_string(),
            suggestions: Vec::new(),
        };
        assert_eq!(err.to_string(), "--summary \"zzz\" not found");
    }

    #[test]
    fn ambiguous_message_lists_candidates() {
        let err = KnowledgeError::Ambiguous {
            label: "resource".to_string(),
            name: "bus".to_string(),
            matches: vec!["bus".to_string(), "buses".to_string()],
        };
        assert_eq!(err.code(), "RESOURCE_AMBIGUOUS");
        assert!(err.to_string().contains("bus, buses"), "{err}");
    }

    #[test]
    fn interrupted_sqlite_error_is_cancellation() {
        let raw = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_INTERRUPT),
            None,
        );
        let err = KnowledgeError::from(raw);
        assert!(err.is_cancellation());
        assert!(!err.to_string().starts_with("knowledge db:"));
    }

    #[test]
    fn other_sqlite_errors_are_wrapped_with_context() {
        let err = KnowledgeError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(!err.is_cancellation());
        assert!(err.to_string().starts_with("knowledge db:"));
    }

    #[test]
    fn store_errors_are_store_unavailable() {
        let err = KnowledgeError::StoreNotFound {
            path: PathBuf::from("/tmp/missing.sqlite"),
        };
        assert!(err.is_store_unavailable());
        assert!(err.to_string().contains("compile.py"));
    }
}
