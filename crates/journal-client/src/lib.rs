//! journal-client
//!
//! Data access for the trading journal:
//! - persisted access identity and demo/live mode ([`store`])
//! - demo fixtures and the live HTTP API behind one trait ([`source`])
//! - the mode-selecting facade ([`api::JournalApi`])
//! - keyed, deduplicated queries ([`query`])
//! - layered configuration ([`config`])

pub mod api;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod query;
pub mod source;
pub mod store;

pub use api::JournalApi;
pub use config::JournalConfig;
pub use error::{ClientError, ConfigError, StoreError};
pub use fixtures::Fixtures;
pub use query::{
    project, QueryCache, QueryData, QueryKey, QueryOutcome, QuerySlot, QueryState, RequestTag,
};
pub use source::{DataSource, FixtureSource, LiveApiSource, UploadFile};
pub use store::{FileStore, LocalStore, MemoryStore};
