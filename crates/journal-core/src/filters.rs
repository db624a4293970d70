//! Filter state for trade listings and metrics, and its query-string form.
//!
//! Invariant: a filter is either absent or holds a non-empty value, so
//! the query string never carries `key=` with nothing after it. Text
//! input goes through [`TradeFilters::set`], which maps blank input to
//! "absent".

use chrono::NaiveDate;
use url::form_urlencoded;

use crate::error::ParseError;
use crate::pagination::Pagination;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The recognised trade filters, in query-string order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FilterField {
    Symbol,
    Side,
    Status,
    Search,
    DateFrom,
    DateTo,
    TraderId,
}

impl FilterField {
    pub const ALL: [FilterField; 7] = [
        FilterField::Symbol,
        FilterField::Side,
        FilterField::Status,
        FilterField::Search,
        FilterField::DateFrom,
        FilterField::DateTo,
        FilterField::TraderId,
    ];

    /// Query parameter name.
    pub fn key(self) -> &'static str {
        match self {
            FilterField::Symbol => "symbol",
            FilterField::Side => "side",
            FilterField::Status => "status",
            FilterField::Search => "search",
            FilterField::DateFrom => "date_from",
            FilterField::DateTo => "date_to",
            FilterField::TraderId => "trader_id",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FilterField::DateFrom | FilterField::DateTo => "YYYY-MM-DD",
            FilterField::TraderId => "trader_id (admin)",
            other => other.key(),
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TradeFilters {
    symbol: Option<String>,
    side: Option<String>,
    status: Option<String>,
    search: Option<String>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    trader_id: Option<i64>,
}

impl TradeFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, field: FilterField, raw: &str) -> Result<Self, ParseError> {
        self.set(field, raw)?;
        Ok(self)
    }

    /// Set a filter from user text. Blank text clears the filter.
    ///
    /// Returns whether the stored value changed; on a parse error the
    /// previous value is kept.
    pub fn set(&mut self, field: FilterField, raw: &str) -> Result<bool, ParseError> {
        let raw = raw.trim();
        let before = self.clone();

        match field {
            FilterField::Symbol => self.symbol = non_empty(raw),
            FilterField::Side => self.side = non_empty(raw),
            FilterField::Status => self.status = non_empty(raw),
            FilterField::Search => self.search = non_empty(raw),
            FilterField::DateFrom => self.date_from = parse_date(raw)?,
            FilterField::DateTo => self.date_to = parse_date(raw)?,
            FilterField::TraderId => self.trader_id = parse_int(raw)?,
        }

        Ok(*self != before)
    }

    /// Current value as display text, `None` when the filter is unset.
    pub fn get(&self, field: FilterField) -> Option<String> {
        match field {
            FilterField::Symbol => self.symbol.clone(),
            FilterField::Side => self.side.clone(),
            FilterField::Status => self.status.clone(),
            FilterField::Search => self.search.clone(),
            FilterField::DateFrom => self.date_from.map(|d| d.format(DATE_FORMAT).to_string()),
            FilterField::DateTo => self.date_to.map(|d| d.format(DATE_FORMAT).to_string()),
            FilterField::TraderId => self.trader_id.map(|id| id.to_string()),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    pub fn active_count(&self) -> usize {
        FilterField::ALL
            .iter()
            .filter(|f| self.get(**f).is_some())
            .count()
    }

    /// One pair per set filter, in [`FilterField::ALL`] order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        FilterField::ALL
            .iter()
            .filter_map(|f| self.get(*f).map(|v| (f.key(), v)))
            .filter(|(_, v)| !v.is_empty())
            .collect()
    }

    /// Encoded filters only; empty when no filter is set.
    pub fn query_string(&self) -> String {
        encode_query(&self.query_pairs())
    }
}

/// A trade listing request: filters plus the page window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TradeQuery {
    pub filters: TradeFilters,
    pub limit: usize,
    pub offset: usize,
}

impl TradeQuery {
    pub fn new(filters: TradeFilters, pagination: &Pagination) -> Self {
        Self {
            filters,
            limit: pagination.limit(),
            offset: pagination.offset(),
        }
    }

    /// `limit` and `offset` first, then every set filter.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        pairs.extend(self.filters.query_pairs());
        pairs
    }

    pub fn query_string(&self) -> String {
        encode_query(&self.query_pairs())
    }
}

/// Optional date bounds for metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn set_from(&mut self, raw: &str) -> Result<bool, ParseError> {
        let next = parse_date(raw.trim())?;
        let changed = next != self.from;
        self.from = next;
        Ok(changed)
    }

    pub fn set_to(&mut self, raw: &str) -> Result<bool, ParseError> {
        let next = parse_date(raw.trim())?;
        let changed = next != self.to;
        self.to = next;
        Ok(changed)
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.from {
            pairs.push(("date_from", from.format(DATE_FORMAT).to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("date_to", to.format(DATE_FORMAT).to_string()));
        }
        pairs
    }

    pub fn query_string(&self) -> String {
        encode_query(&self.query_pairs())
    }

    /// `"from .. to"` with `*` for an open end.
    pub fn label(&self) -> String {
        let fmt = |d: Option<NaiveDate>| {
            d.map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| "*".to_string())
        };
        format!("{} .. {}", fmt(self.from), fmt(self.to))
    }
}

/// `application/x-www-form-urlencoded` encoding of `pairs`.
pub fn encode_query(pairs: &[(&str, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .finish()
}

fn non_empty(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

fn parse_date(raw: &str) -> Result<Option<NaiveDate>, ParseError> {
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| ParseError::Date(raw.to_string()))
}

fn parse_int(raw: &str) -> Result<Option<i64>, ParseError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| ParseError::Integer(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(query: &str) -> Vec<String> {
        form_urlencoded::parse(query.as_bytes())
            .map(|(k, _)| k.into_owned())
            .collect()
    }

    #[test]
    fn no_filters_means_empty_query() {
        let filters = TradeFilters::new();
        assert!(filters.is_empty());
        assert_eq!(filters.query_string(), "");
        assert_eq!(DateRange::default().query_string(), "");
    }

    #[test]
    fn blank_input_is_absent_not_empty() {
        let filters = TradeFilters::new()
            .with(FilterField::Symbol, "   ")
            .unwrap()
            .with(FilterField::Side, "")
            .unwrap();
        assert_eq!(filters.query_string(), "");
    }

    #[test]
    fn every_subset_serialises_exactly_its_keys() {
        let values = [
            (FilterField::Symbol, "BTCUSDT"),
            (FilterField::Side, "LONG"),
            (FilterField::Status, "CLOSED"),
            (FilterField::Search, "breakout retest"),
            (FilterField::DateFrom, "2026-01-01"),
            (FilterField::DateTo, "2026-02-01"),
            (FilterField::TraderId, "17"),
        ];

        for mask in 0u32..(1 << values.len()) {
            let mut filters = TradeFilters::new();
            let mut expected = Vec::new();
            for (bit, (field, value)) in values.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    filters.set(*field, value).unwrap();
                    expected.push(field.key().to_string());
                }
            }

            let query = filters.query_string();
            assert_eq!(keys(&query), expected, "mask {:b}", mask);
            for (_, v) in form_urlencoded::parse(query.as_bytes()) {
                assert!(!v.is_empty());
            }
            assert_eq!(filters.active_count(), expected.len());
        }
    }

    #[test]
    fn values_are_percent_encoded() {
        let filters = TradeFilters::new()
            .with(FilterField::Search, "a&b=c")
            .unwrap();
        assert_eq!(filters.query_string(), "search=a%26b%3Dc");
    }

    #[test]
    fn bad_input_keeps_previous_value() {
        let mut filters = TradeFilters::new()
            .with(FilterField::DateFrom, "2026-03-01")
            .unwrap();

        assert_eq!(
            filters.set(FilterField::DateFrom, "03/01/2026"),
            Err(ParseError::Date("03/01/2026".into()))
        );
        assert_eq!(filters.get(FilterField::DateFrom).as_deref(), Some("2026-03-01"));

        assert!(filters.set(FilterField::TraderId, "abc").is_err());
        assert_eq!(filters.get(FilterField::TraderId), None);
    }

    #[test]
    fn set_reports_change() {
        let mut filters = TradeFilters::new();
        assert_eq!(filters.set(FilterField::Status, "OPEN"), Ok(true));
        assert_eq!(filters.set(FilterField::Status, " OPEN "), Ok(false));
        assert_eq!(filters.set(FilterField::Status, ""), Ok(true));
    }

    #[test]
    fn trade_query_puts_window_first() {
        let mut pagination = Pagination::default();
        pagination.next_page(100);
        let filters = TradeFilters::new().with(FilterField::Symbol, "ETHUSDT").unwrap();

        let query = TradeQuery::new(filters, &pagination);
        assert_eq!(query.query_string(), "limit=20&offset=20&symbol=ETHUSDT");
    }

    #[test]
    fn date_range_pairs() {
        let mut range = DateRange::default();
        assert_eq!(range.set_from("2026-01-01"), Ok(true));
        assert_eq!(range.query_string(), "date_from=2026-01-01");
        assert_eq!(range.label(), "2026-01-01 .. *");

        range.set_to("2026-01-31").unwrap();
        assert_eq!(range.query_string(), "date_from=2026-01-01&date_to=2026-01-31");
        assert!(range.set_to("soon").is_err());
    }

    #[test]
    fn field_cycle_wraps() {
        assert_eq!(FilterField::TraderId.next(), FilterField::Symbol);
        assert_eq!(FilterField::Symbol.prev(), FilterField::TraderId);
    }
}
