// Public fallible APIs in this crate share one concrete error contract (`KnowledgeError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod metapath;
pub mod neighbors;
pub mod page;
pub mod resolve;
pub mod search;
pub mod store;
pub(crate) mod text;

pub use config::{KnowledgeConfig, StoreLocation};
pub use error::{KnowledgeError, Result};
pub use page::Page;
pub use resolve::{Resolution, ResolvedName};
pub use store::KnowledgeStore;
