//! Mode-selecting facade over the two data sources.
//!
//! Every call reads the mode and the identity from the store at call
//! time, so switching either affects the next request and never one that
//! is already in flight.

use std::sync::Arc;

use journal_core::{
    AccessState, DateRange, ExportFormat, Health, ImportFormat, ImportResult, MetricsSnapshot,
    Trade, TradeQuery, TradesPage, UiMode, UsersPage,
};
use tracing::{debug, info};
use url::Url;

use crate::error::{Result, StoreError};
use crate::source::live::import_path;
use crate::source::{DataSource, UploadFile};
use crate::store::{self, LocalStore};

#[derive(Clone)]
pub struct JournalApi {
    store: Arc<dyn LocalStore>,
    demo: Arc<dyn DataSource>,
    live: Arc<dyn DataSource>,
}

impl JournalApi {
    pub fn new(store: Arc<dyn LocalStore>, demo: Arc<dyn DataSource>, live: Arc<dyn DataSource>) -> Self {
        Self { store, demo, live }
    }

    pub fn mode(&self) -> UiMode {
        store::get_mode(self.store.as_ref())
    }

    pub fn access(&self) -> AccessState {
        store::read_access(self.store.as_ref())
    }

    pub fn set_mode(&self, mode: UiMode) -> Result<(), StoreError> {
        info!("data source mode -> {}", mode);
        store::set_mode(self.store.as_ref(), mode)
    }

    pub fn set_access(&self, access: &AccessState) -> Result<(), StoreError> {
        info!("access identity -> {} / {}", access.role, access.identity_id);
        store::write_access(self.store.as_ref(), access)
    }

    /// The source for the current mode, plus the identity to send.
    fn select(&self) -> (&dyn DataSource, AccessState) {
        let source = match self.mode() {
            UiMode::Demo => self.demo.as_ref(),
            UiMode::Api => self.live.as_ref(),
        };
        (source, self.access())
    }

    pub async fn list_trades(&self, query: &TradeQuery) -> Result<TradesPage> {
        let (source, access) = self.select();
        debug!("list_trades via {}", source.mode());
        source.list_trades(&access, query).await
    }

    pub async fn get_trade(&self, id: &str) -> Result<Trade> {
        let (source, access) = self.select();
        debug!("get_trade {} via {}", id, source.mode());
        source.get_trade(&access, id).await
    }

    pub async fn get_metrics(&self, range: &DateRange) -> Result<MetricsSnapshot> {
        let (source, access) = self.select();
        debug!("get_metrics {} via {}", range.label(), source.mode());
        source.get_metrics(&access, range).await
    }

    pub async fn upload(&self, path: &str, file: UploadFile) -> Result<ImportResult> {
        let (source, access) = self.select();
        source.upload(&access, path, file).await
    }

    /// Upload to `/import?format=...`.
    pub async fn import_trades(&self, format: ImportFormat, file: UploadFile) -> Result<ImportResult> {
        self.upload(&import_path(format), file).await
    }

    pub fn export_url(&self, format: ExportFormat) -> Result<Url> {
        let (source, _) = self.select();
        source.export_url(format)
    }

    pub async fn download_export(&self, format: ExportFormat) -> Result<Vec<u8>> {
        let (source, access) = self.select();
        source.download_export(&access, format).await
    }

    pub async fn list_users(&self) -> Result<UsersPage> {
        let (source, access) = self.select();
        source.list_users(&access).await
    }

    pub async fn health(&self) -> Result<Health> {
        let (source, _) = self.select();
        source.health().await
    }
}
