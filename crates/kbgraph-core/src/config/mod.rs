use std::path::{Path, PathBuf};
use std::time::Duration;

mod env;

pub const ENV_KNOWLEDGE_DB: &str = "KBGRAPH_KNOWLEDGE_DB";
pub const ENV_BUSY_TIMEOUT_MS: &str = "KBGRAPH_BUSY_TIMEOUT_MS";

pub const DEFAULT_KNOWLEDGE_DB: &str = "cartographer_out/db/knowledge.sqlite";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 60_000;

/// Where the snapshot path came from, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Env,
    Flag,
    Default,
}

impl LocationSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Env => "env",
            Self::Flag => "flag",
            Self::Default => "default",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLocation {
    pub path: PathBuf,
    pub source: LocationSource,
}

impl StoreLocation {
    /// Picks the env override, then the flag override, then the default path.
    /// Blank overrides are ignored.
    #[must_use]
    pub fn resolve(env_override: Option<&str>, flag_override: Option<&Path>) -> Self {
        if let Some(value) = env_override.map(str::trim).filter(|v| !v.is_empty()) {
            return Self {
                path: PathBuf::from(value),
                source: LocationSource::Env,
            };
        }
        if let Some(path) = flag_override.filter(|p| !p.as_os_str().is_empty()) {
            return Self {
                path: path.to_path_buf(),
                source: LocationSource::Flag,
            };
        }
        Self {
            path: PathBuf::from(DEFAULT_KNOWLEDGE_DB),
            source: LocationSource::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeConfig {
    pub db_override: Option<String>,
    pub busy_timeout: Duration,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            db_override: None,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

impl KnowledgeConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            db_override: env::read_non_empty_env(ENV_KNOWLEDGE_DB),
            busy_timeout: Duration::from_millis(env::read_env_u64(
                ENV_BUSY_TIMEOUT_MS,
                DEFAULT_BUSY_TIMEOUT_MS,
                1,
            )),
        }
    }

    #[must_use]
    pub fn location(&self, flag_override: Option<&Path>) -> StoreLocation {
        StoreLocation::resolve(self.db_override.as_deref(), flag_override)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins_over_flag() {
        let location = StoreLocation::resolve(Some("/env/kb.sqlite"), Some(Path::new("/flag.db")));
        assert_eq!(location.path, PathBuf::from("/env/kb.sqlite"));
        assert_eq!(location.source, LocationSource::Env);
    }

    #[test]
    fn blank_env_falls_through_to_flag() {
        let location = StoreLocation::resolve(Some("   "), Some(Path::new("/flag.db")));
        assert_eq!(location.path, PathBuf::from("/flag.db"));
        assert_eq!(location.source, LocationSource::Flag);
    }

    #[test]
    fn default_path_used_without_overrides() {
        let location = StoreLocation::resolve(None, None);
        assert_eq!(location.path, PathBuf::from(DEFAULT_KNOWLEDGE_DB));
        assert_eq!(location.source, LocationSource::Default);
    }

    #[test]
    fn default_config_uses_sixty_second_busy_timeout() {
        let config = KnowledgeConfig::default();
        assert_eq!(config.busy_timeout, Duration::from_secs(60));
        assert!(config.db_override.is_none());
    }
}
