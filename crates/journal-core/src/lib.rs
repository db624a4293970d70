//! journal-core
//!
//! Pure trading-journal data model:
//! - access identity and data-source mode
//! - trade records and paginated trade listings
//! - metrics snapshots (KPIs, R histogram, equity curve)
//! - filter state and its query-string form
//! - offset pagination and declarative table columns

pub mod access;
pub mod admin;
pub mod error;
pub mod filters;
pub mod metrics;
pub mod pagination;
pub mod table;
pub mod trade;
pub mod transfer;

pub use access::{AccessState, Role, UiMode};
pub use admin::{AdminUser, Health, UsersPage};
pub use error::ParseError;
pub use filters::{encode_query, DateRange, FilterField, TradeFilters, TradeQuery};
pub use metrics::{EquityPoint, Kpi, MetricsSnapshot, RBucket, SymbolCount};
pub use pagination::{Pagination, PAGE_SIZE};
pub use table::{CellValue, Column};
pub use trade::{PriceLevel, Trade, TradesPage};
pub use transfer::{ExportFormat, ImportFormat, ImportResult};
