//! Static demo dataset.
//!
//! The three fixture files are compiled into the binary; a directory with
//! files of the same names can replace them at startup.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ClientError;

pub const TRADES_FILE: &str = "trades.json";
pub const METRICS_FILE: &str = "metrics.json";
pub const EQUITY_FILE: &str = "equity.json";

const BUNDLED_TRADES: &str = include_str!("../fixtures/trades.json");
const BUNDLED_METRICS: &str = include_str!("../fixtures/metrics.json");
const BUNDLED_EQUITY: &str = include_str!("../fixtures/equity.json");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureOrigin {
    Bundled,
    Dir(PathBuf),
}

/// Raw fixture documents. Parsed on every read, like a static file would be.
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub trades: String,
    pub metrics: String,
    pub equity: String,
    origin: FixtureOrigin,
}

impl Fixtures {
    pub fn bundled() -> Self {
        Self {
            trades: BUNDLED_TRADES.to_string(),
            metrics: BUNDLED_METRICS.to_string(),
            equity: BUNDLED_EQUITY.to_string(),
            origin: FixtureOrigin::Bundled,
        }
    }

    /// In-memory documents, treated as bundled.
    pub fn from_parts(
        trades: impl Into<String>,
        metrics: impl Into<String>,
        equity: impl Into<String>,
    ) -> Self {
        Self {
            trades: trades.into(),
            metrics: metrics.into(),
            equity: equity.into(),
            origin: FixtureOrigin::Bundled,
        }
    }

    /// Load all three files from `dir`. Every file must exist.
    pub fn from_dir(dir: &Path) -> Result<Self, ClientError> {
        let dir = dir.canonicalize().map_err(|source| ClientError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path).map_err(|source| ClientError::Io { path, source })
        };

        Ok(Self {
            trades: read(TRADES_FILE)?,
            metrics: read(METRICS_FILE)?,
            equity: read(EQUITY_FILE)?,
            origin: FixtureOrigin::Dir(dir.clone()),
        })
    }

    pub fn origin(&self) -> &FixtureOrigin {
        &self.origin
    }

    /// On-disk location of `trades.json`, when loaded from a directory.
    pub fn trades_path(&self) -> Option<PathBuf> {
        match &self.origin {
            FixtureOrigin::Dir(dir) => Some(dir.join(TRADES_FILE)),
            FixtureOrigin::Bundled => None,
        }
    }
}

impl Default for Fixtures {
    fn default() -> Self {
        Self::bundled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_core::{MetricsSnapshot, TradesPage};

    #[test]
    fn bundled_fixtures_validate() {
        let fixtures = Fixtures::bundled();
        let page: TradesPage = serde_json::from_str(&fixtures.trades).unwrap();
        assert_eq!(page.total, page.items.len());

        let metrics: MetricsSnapshot = serde_json::from_str(&fixtures.metrics).unwrap();
        assert!(metrics.kpi.total_trades > 0);

        let equity: Vec<journal_core::EquityPoint> = serde_json::from_str(&fixtures.equity).unwrap();
        assert!(!equity.is_empty());
        assert_eq!(fixtures.trades_path(), None);
    }

    #[test]
    fn directory_must_hold_every_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(TRADES_FILE), r#"{"items": [], "total": 0}"#).unwrap();
        fs::write(dir.path().join(METRICS_FILE), "{}").unwrap();
        assert!(matches!(
            Fixtures::from_dir(dir.path()),
            Err(ClientError::Io { .. })
        ));

        fs::write(dir.path().join(EQUITY_FILE), "[]").unwrap();
        let fixtures = Fixtures::from_dir(dir.path()).unwrap();
        assert_eq!(fixtures.metrics, "{}");
        let trades_path = fixtures.trades_path().unwrap();
        assert!(trades_path.is_absolute());
        assert!(trades_path.ends_with(TRADES_FILE));
    }
}
