//! Configuration for the journal client.
//!
//! Layered, later layers win:
//! 1. defaults
//! 2. a TOML file (explicit path, or `journal.toml` in the state directory)
//! 3. environment variables:
//!    - `JOURNAL_API_URL`        (default: "http://localhost:8000")
//!    - `JOURNAL_STATE_DIR`      (default: ".journal")
//!    - `JOURNAL_FIXTURE_DIR`    (default: bundled fixtures)
//!    - `JOURNAL_DEMO_BASE_URL`  (default: "http://localhost:3000/demo")
//!    - `JOURNAL_TIMEOUT_SECS`   (default: "15")
//!
//! Command-line flags are applied on top by the binary.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::JournalApi;
use crate::error::{ClientError, ConfigError};
use crate::fixtures::Fixtures;
use crate::source::{FixtureSource, LiveApiSource};
use crate::store::{FileStore, LocalStore};

pub const CONFIG_FILE: &str = "journal.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Base URL of the journal API.
    pub api_base_url: String,

    /// Where the identity and mode records live.
    pub state_dir: PathBuf,

    /// Directory holding `trades.json`, `metrics.json` and `equity.json`
    /// to use instead of the bundled demo data.
    pub fixture_dir: Option<PathBuf>,

    /// Public location of the bundled fixtures, used for demo export links.
    pub demo_base_url: String,

    pub request_timeout_secs: u64,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            state_dir: PathBuf::from(".journal"),
            fixture_dir: None,
            demo_base_url: "http://localhost:3000/demo".to_string(),
            request_timeout_secs: 15,
        }
    }
}

impl JournalConfig {
    /// Defaults, then `file` (or `<state_dir>/journal.toml` if present),
    /// then the environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => {
                let state_dir = env::var("JOURNAL_STATE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| Self::default().state_dir);
                let implicit = state_dir.join(CONFIG_FILE);
                if implicit.is_file() {
                    Self::from_file(&implicit)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var("JOURNAL_API_URL") {
            self.api_base_url = url;
        }
        if let Ok(dir) = env::var("JOURNAL_STATE_DIR") {
            self.state_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("JOURNAL_FIXTURE_DIR") {
            self.fixture_dir = Some(PathBuf::from(dir));
        }
        if let Ok(url) = env::var("JOURNAL_DEMO_BASE_URL") {
            self.demo_base_url = url;
        }
        self.request_timeout_secs =
            read_env_or_default("JOURNAL_TIMEOUT_SECS", self.request_timeout_secs)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn fixtures(&self) -> Result<Fixtures, ClientError> {
        match &self.fixture_dir {
            Some(dir) => Fixtures::from_dir(dir),
            None => Ok(Fixtures::bundled()),
        }
    }

    /// File-backed store, both sources, and the facade over them.
    pub fn build_api(&self) -> Result<JournalApi, ClientError> {
        let store: Arc<dyn LocalStore> = Arc::new(FileStore::init(&self.state_dir)?);
        self.build_api_with_store(store)
    }

    pub fn build_api_with_store(&self, store: Arc<dyn LocalStore>) -> Result<JournalApi, ClientError> {
        let demo = FixtureSource::new(self.fixtures()?, self.demo_base_url.clone());
        let live = LiveApiSource::new(self.api_base_url.clone(), self.request_timeout())?;
        Ok(JournalApi::new(store, Arc::new(demo), Arc::new(live)))
    }
}

fn read_env_or_default<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
{
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Env { key, value: val }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = JournalConfig::from_toml(
            r#"
            api_base_url = "https://journal.example.com/api"
            request_timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://journal.example.com/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.state_dir, PathBuf::from(".journal"));
        assert_eq!(config.fixture_dir, None);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(matches!(
            JournalConfig::from_toml("request_timeout_secs = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let config = JournalConfig {
            request_timeout_secs: 0,
            ..JournalConfig::default()
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            JournalConfig::from_file(&missing),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn build_api_creates_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = JournalConfig {
            state_dir: dir.path().join("state"),
            ..JournalConfig::default()
        };
        let api = config.build_api().unwrap();
        assert!(dir.path().join("state").is_dir());
        assert_eq!(api.mode(), journal_core::UiMode::Demo);
    }
}
