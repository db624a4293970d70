use async_trait::async_trait;
use journal_core::{
    AccessState, DateRange, ExportFormat, Health, ImportResult, MetricsSnapshot, Trade,
    TradeQuery, TradesPage, UiMode, UsersPage,
};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{DataSource, UploadFile};
use crate::error::{ClientError, Result};
use crate::fixtures::{Fixtures, TRADES_FILE};

const UPLOAD_DISABLED: &str = "upload disabled in demo mode";

/// Demo data source backed by [`Fixtures`].
///
/// Listings are returned whole: filters and the page window are not
/// applied to the demo dataset.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    fixtures: Fixtures,
    /// Public location of the fixtures when they are bundled.
    base_url: String,
}

impl FixtureSource {
    pub fn new(fixtures: Fixtures, base_url: impl Into<String>) -> Self {
        Self {
            fixtures,
            base_url: base_url.into(),
        }
    }

    fn trades(&self) -> Result<TradesPage> {
        Ok(serde_json::from_str(&self.fixtures.trades)?)
    }

    /// `metrics.json` with `equity_curve` replaced by `equity.json`.
    fn merged_metrics(&self) -> Result<MetricsSnapshot> {
        let mut metrics: Value = serde_json::from_str(&self.fixtures.metrics)?;
        let equity: Value = serde_json::from_str(&self.fixtures.equity)?;

        match &mut metrics {
            Value::Object(map) => {
                map.insert("equity_curve".to_string(), equity);
            }
            _ => {
                metrics = serde_json::json!({ "equity_curve": equity });
            }
        }

        Ok(serde_json::from_value(metrics)?)
    }
}

#[async_trait]
impl DataSource for FixtureSource {
    fn mode(&self) -> UiMode {
        UiMode::Demo
    }

    async fn list_trades(&self, _access: &AccessState, query: &TradeQuery) -> Result<TradesPage> {
        if !query.filters.is_empty() || query.offset > 0 {
            debug!("demo listing ignores `{}`", query.query_string());
        }
        self.trades()
    }

    async fn get_trade(&self, _access: &AccessState, id: &str) -> Result<Trade> {
        self.trades()?
            .items
            .into_iter()
            .find(|t| t.matches_id(id))
            .ok_or_else(|| ClientError::NotFound { id: id.to_string() })
    }

    async fn get_metrics(&self, _access: &AccessState, range: &DateRange) -> Result<MetricsSnapshot> {
        if !range.is_empty() {
            debug!("demo metrics ignore range {}", range.label());
        }
        self.merged_metrics()
    }

    async fn upload(&self, _access: &AccessState, path: &str, file: UploadFile) -> Result<ImportResult> {
        debug!("demo upload of {} to {} skipped", file.file_name, path);
        Ok(ImportResult::disabled(UPLOAD_DISABLED))
    }

    /// The trades fixture, whatever the format.
    fn export_url(&self, _format: ExportFormat) -> Result<Url> {
        if let Some(path) = self.fixtures.trades_path() {
            if let Ok(url) = Url::from_file_path(&path) {
                return Ok(url);
            }
        }
        let base = self.base_url.trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, TRADES_FILE))?)
    }

    async fn download_export(&self, _access: &AccessState, _format: ExportFormat) -> Result<Vec<u8>> {
        Ok(self.fixtures.trades.as_bytes().to_vec())
    }

    async fn list_users(&self, _access: &AccessState) -> Result<UsersPage> {
        Err(ClientError::DemoUnsupported("user administration"))
    }

    async fn health(&self) -> Result<Health> {
        Ok(Health::ok())
    }
}
