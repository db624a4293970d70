//! Declarative table columns.
//!
//! A column is a header, a width hint and an accessor turning a row into
//! a cell. Cells are either text or a link to another screen; the
//! renderer decides how either looks.

use crate::admin::AdminUser;
use crate::trade::{or_dash, Trade};

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Link { label: String, href: String },
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn label(&self) -> &str {
        match self {
            CellValue::Text(t) => t,
            CellValue::Link { label, .. } => label,
        }
    }

    pub fn href(&self) -> Option<&str> {
        match self {
            CellValue::Link { href, .. } => Some(href),
            CellValue::Text(_) => None,
        }
    }
}

pub struct Column<R> {
    pub header: &'static str,
    /// Width hint in terminal cells.
    pub width: u16,
    accessor: fn(&R) -> CellValue,
}

impl<R> Column<R> {
    pub const fn new(header: &'static str, width: u16, accessor: fn(&R) -> CellValue) -> Self {
        Self {
            header,
            width,
            accessor,
        }
    }

    pub fn cell(&self, row: &R) -> CellValue {
        (self.accessor)(row)
    }
}

/// Evaluate every column for every row.
pub fn cells<R>(columns: &[Column<R>], rows: &[R]) -> Vec<Vec<CellValue>> {
    rows.iter()
        .map(|row| columns.iter().map(|c| c.cell(row)).collect())
        .collect()
}

pub fn trade_columns() -> Vec<Column<Trade>> {
    vec![
        Column::new("ID", 6, |t| CellValue::Link {
            label: t.id.clone(),
            href: t.detail_href(),
        }),
        Column::new("Trader", 8, |t| CellValue::Text(or_dash(t.trader_id))),
        Column::new("Symbol", 10, |t| CellValue::text(t.symbol.clone())),
        Column::new("Side", 6, |t| CellValue::text(t.side.clone())),
        Column::new("Status", 8, |t| CellValue::text(t.status.clone())),
        Column::new("Size %", 7, |t| CellValue::Text(or_dash(t.position_pct))),
        Column::new("TS", 19, |t| {
            CellValue::Text(or_dash(
                t.timestamp.map(|ts| ts.format("%Y-%m-%d %H:%M:%S")),
            ))
        }),
    ]
}

pub fn user_columns() -> Vec<Column<AdminUser>> {
    vec![
        Column::new("user_id", 8, |u| CellValue::Text(u.user_id.to_string())),
        Column::new("telegram_user_id", 16, |u| {
            CellValue::Text(u.telegram_user_id.to_string())
        }),
        Column::new("role", 8, |u| CellValue::text(u.role.clone())),
        Column::new("trader_id", 9, |u| CellValue::Text(or_dash(u.trader_id))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(json: &str) -> Trade {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn trade_id_links_to_detail() {
        let rows = vec![trade(
            r#"{"id": 12, "trader_id": 3, "symbol": "SOLUSDT", "side": "LONG",
                "status": "OPEN", "position_pct": 1.5, "ts": "2026-02-01T09:00:00"}"#,
        )];
        let table = cells(&trade_columns(), &rows);

        assert_eq!(table.len(), 1);
        assert_eq!(table[0][0].href(), Some("/trades/12"));
        assert_eq!(table[0][0].label(), "12");
        let labels: Vec<&str> = table[0].iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec!["12", "3", "SOLUSDT", "LONG", "OPEN", "1.5", "2026-02-01 09:00:00"]
        );
    }

    #[test]
    fn missing_values_render_as_dash() {
        let rows = vec![trade(r#"{"id": 1, "symbol": "X", "side": "SHORT", "status": "OPEN"}"#)];
        let table = cells(&trade_columns(), &rows);
        assert_eq!(table[0][1].label(), "-");
        assert_eq!(table[0][5].label(), "-");
        assert_eq!(table[0][6].label(), "-");
    }

    #[test]
    fn user_rows() {
        let users = vec![AdminUser {
            user_id: 1,
            telegram_user_id: 1001,
            role: "ADMIN".into(),
            trader_id: None,
        }];
        let table = cells(&user_columns(), &users);
        let labels: Vec<&str> = table[0].iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["1", "1001", "ADMIN", "-"]);
        assert!(table[0].iter().all(|c| c.href().is_none()));
    }
}
