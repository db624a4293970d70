//! Data sources.
//!
//! One trait, two implementations:
//! - [`FixtureSource`]: the bundled demo dataset, no network
//! - [`LiveApiSource`]: the journal HTTP API
//!
//! The caller passes the access identity on every call; sources never
//! cache it.

use std::path::Path;

use async_trait::async_trait;
use journal_core::{
    AccessState, DateRange, ExportFormat, Health, ImportResult, MetricsSnapshot, Trade,
    TradeQuery, TradesPage, UiMode, UsersPage,
};
use url::Url;

use crate::error::{ClientError, Result};

pub mod fixture;
pub mod live;

pub use fixture::FixtureSource;
pub use live::LiveApiSource;

/// A file picked for import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn read(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, bytes })
    }
}

#[async_trait]
pub trait DataSource: Send + Sync {
    /// The mode this source serves.
    fn mode(&self) -> UiMode;

    async fn list_trades(&self, access: &AccessState, query: &TradeQuery) -> Result<TradesPage>;

    async fn get_trade(&self, access: &AccessState, id: &str) -> Result<Trade>;

    async fn get_metrics(&self, access: &AccessState, range: &DateRange) -> Result<MetricsSnapshot>;

    /// Multipart upload of `file` to `path` (e.g. `/import?format=csv`).
    async fn upload(&self, access: &AccessState, path: &str, file: UploadFile) -> Result<ImportResult>;

    /// Where an export in `format` can be fetched from.
    fn export_url(&self, format: ExportFormat) -> Result<Url>;

    async fn download_export(&self, access: &AccessState, format: ExportFormat) -> Result<Vec<u8>>;

    async fn list_users(&self, access: &AccessState) -> Result<UsersPage>;

    async fn health(&self) -> Result<Health>;
}
