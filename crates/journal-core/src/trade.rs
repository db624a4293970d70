//! Trade records as returned by `GET /trades` and `GET /trades/{id}`.
//!
//! The API is loose about field names and nullability; everything is
//! normalised here so the rest of the client only sees one shape:
//! - `sl` / `tps` / `ts` / `r` are accepted for the long names
//! - `null` lists read as empty lists
//! - timestamps may be RFC 3339 or naive ISO 8601

use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// One entry or take-profit level.
///
/// Either a bare price or a price with the share of the position it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceLevel {
    Price(f64),
    Weighted {
        price: f64,
        #[serde(default, alias = "pct")]
        percent: Option<f64>,
    },
}

impl PriceLevel {
    pub fn price(&self) -> f64 {
        match self {
            PriceLevel::Price(p) => *p,
            PriceLevel::Weighted { price, .. } => *price,
        }
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceLevel::Price(p) => write!(f, "{}", p),
            PriceLevel::Weighted { price, percent: Some(pct) } => write!(f, "{} ({}%)", price, pct),
            PriceLevel::Weighted { price, percent: None } => write!(f, "{}", price),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Kept as text: the API sends either a number or a string.
    #[serde(deserialize_with = "id_text")]
    pub id: String,
    #[serde(default)]
    pub trader_id: Option<i64>,
    pub symbol: String,
    pub side: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub entries: Vec<PriceLevel>,
    #[serde(default, alias = "sl")]
    pub stop_loss: Option<f64>,
    #[serde(default, alias = "tps", deserialize_with = "nullable_vec")]
    pub take_profits: Vec<PriceLevel>,
    #[serde(default)]
    pub position_pct: Option<f64>,
    pub status: String,
    #[serde(default, alias = "ts", deserialize_with = "flexible_timestamp")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default, alias = "r")]
    pub r_multiple: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub tags: Vec<String>,
}

impl Trade {
    /// Route of the detail screen for this trade.
    pub fn detail_href(&self) -> String {
        format!("/trades/{}", self.id)
    }

    /// Ids are compared as text so a route segment can be matched directly.
    pub fn matches_id(&self, id: &str) -> bool {
        self.id == id.trim()
    }
}

/// A page of trades plus the total number of matches server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradesPage {
    #[serde(default, deserialize_with = "nullable_vec")]
    pub items: Vec<Trade>,
    #[serde(alias = "count")]
    pub total: usize,
}

impl TradesPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `"-"` for nothing, otherwise the levels joined with commas.
pub fn format_levels(levels: &[PriceLevel]) -> String {
    if levels.is_empty() {
        return "-".to_string();
    }
    levels
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `"-"` for `None`, the value's display form otherwise.
pub fn or_dash<T: fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n.to_string()),
        RawId::Text(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        RawId::Text(_) => Err(serde::de::Error::custom("empty trade id")),
    }
}

fn flexible_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(None),
    };

    parse_timestamp(raw.trim())
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{}`", raw)))
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
