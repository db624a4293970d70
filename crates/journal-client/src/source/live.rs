use std::time::Duration;

use async_trait::async_trait;
use journal_core::{
    AccessState, DateRange, ExportFormat, Health, ImportResult, MetricsSnapshot, Trade,
    TradeQuery, TradesPage, UiMode, UsersPage,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::{DataSource, UploadFile};
use crate::error::{ClientError, Result};

pub const ROLE_HEADER: &str = "x-role";
pub const IDENTITY_HEADER: &str = "x-telegram-user-id";

const TRADES_ENDPOINT: &str = "/trades";
const METRICS_ENDPOINT: &str = "/metrics";
const IMPORT_ENDPOINT: &str = "/import";
const EXPORT_ENDPOINT: &str = "/export";
const USERS_ENDPOINT: &str = "/admin/users";
const HEALTH_ENDPOINT: &str = "/health";

/// The journal HTTP API.
pub struct LiveApiSource {
    base_url: String,
    http: reqwest::Client,
}

impl LiveApiSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `base + path`, plus `pairs` as query parameters when there are any.
    pub fn endpoint(&self, path: &str, pairs: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        if !pairs.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn trade_url(&self, id: &str) -> Result<Url> {
        let mut url = self.endpoint(TRADES_ENDPOINT, &[])?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(id.trim());
        Ok(url)
    }

    /// `X-Role` and `X-Telegram-User-Id` for `access`.
    pub fn identity_headers(access: &AccessState) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(ROLE_HEADER),
            HeaderValue::from_static(access.role.as_str()),
        );
        headers.insert(
            HeaderName::from_static(IDENTITY_HEADER),
            HeaderValue::from(access.identity_id),
        );
        headers
    }

    /// An authenticated GET, built but not sent.
    pub fn build_get(&self, access: &AccessState, url: Url) -> Result<reqwest::Request> {
        Ok(self
            .http
            .get(url)
            .headers(Self::identity_headers(access))
            .build()?)
    }

    /// An authenticated multipart POST with the file under field `file`.
    pub fn build_upload(&self, access: &AccessState, path: &str, file: UploadFile) -> Result<reqwest::Request> {
        let url = self.endpoint(path, &[])?;
        let part = Part::bytes(file.bytes).file_name(file.file_name);
        let form = Form::new().part("file", part);
        Ok(self
            .http
            .post(url)
            .headers(Self::identity_headers(access))
            .multipart(form)
            .build()?)
    }

    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        debug!("{} {}", request.method(), request.url());
        let response = self.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            warn!("{} answered {}", response.url(), status);
            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: reqwest::Request) -> Result<T> {
        let body = self.execute(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl DataSource for LiveApiSource {
    fn mode(&self) -> UiMode {
        UiMode::Api
    }

    async fn list_trades(&self, access: &AccessState, query: &TradeQuery) -> Result<TradesPage> {
        let url = self.endpoint(TRADES_ENDPOINT, &query.query_pairs())?;
        self.fetch_json(self.build_get(access, url)?).await
    }

    async fn get_trade(&self, access: &AccessState, id: &str) -> Result<Trade> {
        let url = self.trade_url(id)?;
        self.fetch_json(self.build_get(access, url)?).await
    }

    async fn get_metrics(&self, access: &AccessState, range: &DateRange) -> Result<MetricsSnapshot> {
        let url = self.endpoint(METRICS_ENDPOINT, &range.query_pairs())?;
        self.fetch_json(self.build_get(access, url)?).await
    }

    async fn upload(&self, access: &AccessState, path: &str, file: UploadFile) -> Result<ImportResult> {
        let request = self.build_upload(access, path, file)?;
        self.fetch_json(request).await
    }

    fn export_url(&self, format: ExportFormat) -> Result<Url> {
        self.endpoint(EXPORT_ENDPOINT, &[("format", format.as_str().to_string())])
    }

    async fn download_export(&self, access: &AccessState, format: ExportFormat) -> Result<Vec<u8>> {
        let request = self.build_get(access, self.export_url(format)?)?;
        let body = self.execute(request).await?.bytes().await?;
        Ok(body.to_vec())
    }

    async fn list_users(&self, access: &AccessState) -> Result<UsersPage> {
        let url = self.endpoint(USERS_ENDPOINT, &[])?;
        self.fetch_json(self.build_get(access, url)?).await
    }

    async fn health(&self) -> Result<Health> {
        let url = self.endpoint(HEALTH_ENDPOINT, &[])?;
        let request = self.http.get(url).build()?;
        self.fetch_json(request).await
    }
}

/// `/import?format=csv|json`.
pub fn import_path(format: ExportFormat) -> String {
    format!("{}?format={}", IMPORT_ENDPOINT, format.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_core::{FilterField, Pagination, Role, TradeFilters};

    fn source() -> LiveApiSource {
        LiveApiSource::with_client("http://api.test:8000/", reqwest::Client::new())
    }

    #[test]
    fn headers_carry_identity() {
        let headers = LiveApiSource::identity_headers(&AccessState::new(Role::Admin, 4242));
        assert_eq!(headers.get("X-Role").unwrap(), "ADMIN");
        assert_eq!(headers.get("X-Telegram-User-Id").unwrap(), "4242");
    }

    #[test]
    fn listing_url_has_window_and_set_filters_only() {
        let src = source();
        let filters = TradeFilters::new()
            .with(FilterField::Status, "OPEN")
            .unwrap()
            .with(FilterField::TraderId, "9")
            .unwrap();
        let query = TradeQuery::new(filters, &Pagination::default());

        let url = src.endpoint(TRADES_ENDPOINT, &query.query_pairs()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://api.test:8000/trades?limit=20&offset=0&status=OPEN&trader_id=9"
        );
    }

    #[test]
    fn metrics_url_without_range_has_no_query() {
        let url = source().endpoint(METRICS_ENDPOINT, &DateRange::default().query_pairs()).unwrap();
        assert_eq!(url.as_str(), "http://api.test:8000/metrics");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn trade_id_is_a_path_segment() {
        let src = source();
        assert_eq!(src.trade_url("17").unwrap().as_str(), "http://api.test:8000/trades/17");
        assert_eq!(src.trade_url("a/b").unwrap().as_str(), "http://api.test:8000/trades/a%2Fb");
    }

    #[test]
    fn export_url_depends_on_format() {
        let src = source();
        assert_eq!(
            src.export_url(ExportFormat::Csv).unwrap().as_str(),
            "http://api.test:8000/export?format=csv"
        );
        assert_eq!(
            src.export_url(ExportFormat::Json).unwrap().as_str(),
            "http://api.test:8000/export?format=json"
        );
    }

    #[test]
    fn get_requests_are_authenticated() {
        let src = source();
        let url = src.endpoint(USERS_ENDPOINT, &[]).unwrap();
        let request = src.build_get(&AccessState::default(), url).unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.headers().get("x-role").unwrap(), "TRADER");
        assert_eq!(request.headers().get("x-telegram-user-id").unwrap(), "1001");
    }

    #[test]
    fn upload_is_multipart_post() {
        let src = source();
        let request = src
            .build_upload(
                &AccessState::new(Role::Trader, 5),
                &import_path(ExportFormat::Csv),
                UploadFile::new("t.csv", b"a,b\n".to_vec()),
            )
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "http://api.test:8000/import?format=csv");
        let content_type = request.headers().get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        assert_eq!(request.headers().get("x-telegram-user-id").unwrap(), "5");
    }
}
