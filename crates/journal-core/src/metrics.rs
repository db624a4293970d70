//! Aggregate performance metrics as computed by the metrics service.
//!
//! Nothing here is computed locally; these are display shapes only. Every
//! section defaults to empty so a partial payload (the demo `metrics.json`
//! has no equity curve of its own) still validates.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    #[serde(default)]
    pub total_trades: u64,
    /// Percentage, 0..=100.
    #[serde(default)]
    pub winrate: f64,
    #[serde(default)]
    pub profit_factor: f64,
    #[serde(default)]
    pub expectancy: f64,
}

/// One bar of the R-multiple histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RBucket {
    pub r: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub index: u64,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolCount {
    pub symbol: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    #[serde(default)]
    pub kpi: Kpi,
    #[serde(default)]
    pub r_histogram: Vec<RBucket>,
    #[serde(default)]
    pub equity_curve: Vec<EquityPoint>,
    #[serde(default)]
    pub breakdown_by_symbol: Vec<SymbolCount>,
}

impl MetricsSnapshot {
    /// Equity curve as `(x, y)` pairs for plotting.
    pub fn equity_series(&self) -> Vec<(f64, f64)> {
        self.equity_curve
            .iter()
            .map(|p| (p.index as f64, p.equity))
            .collect()
    }

    /// `[min, max]` of the equity curve, widened when flat so a chart
    /// axis never collapses to zero height.
    pub fn equity_bounds(&self) -> [f64; 2] {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for p in &self.equity_curve {
            min = min.min(p.equity);
            max = max.max(p.equity);
        }
        if !min.is_finite() || !max.is_finite() {
            return [0.0, 1.0];
        }
        if (max - min).abs() < f64::EPSILON {
            return [min - 1.0, max + 1.0];
        }
        [min, max]
    }

    /// Share of all trades for each symbol, as percentages.
    pub fn breakdown_shares(&self) -> Vec<(String, f64)> {
        let total: u64 = self.breakdown_by_symbol.iter().map(|s| s.count).sum();
        self.breakdown_by_symbol
            .iter()
            .map(|s| {
                let share = if total == 0 {
                    0.0
                } else {
                    s.count as f64 * 100.0 / total as f64
                };
                (s.symbol.clone(), share)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_payload_validates() {
        let snap: MetricsSnapshot =
            serde_json::from_str(r#"{"kpi": {"total_trades": 4, "winrate": 50}}"#).unwrap();
        assert_eq!(snap.kpi.total_trades, 4);
        assert_eq!(snap.kpi.profit_factor, 0.0);
        assert!(snap.equity_curve.is_empty());
        assert!(snap.r_histogram.is_empty());
    }

    #[test]
    fn bounds_never_collapse() {
        let mut snap = MetricsSnapshot::default();
        assert_eq!(snap.equity_bounds(), [0.0, 1.0]);

        snap.equity_curve = vec![EquityPoint { index: 0, equity: 100.0 }];
        assert_eq!(snap.equity_bounds(), [99.0, 101.0]);

        snap.equity_curve.push(EquityPoint { index: 1, equity: 80.0 });
        assert_eq!(snap.equity_bounds(), [80.0, 100.0]);
        assert_eq!(snap.equity_series(), vec![(0.0, 100.0), (1.0, 80.0)]);
    }

    #[test]
    fn breakdown_shares_sum_to_hundred() {
        let snap = MetricsSnapshot {
            breakdown_by_symbol: vec![
                SymbolCount { symbol: "BTC".into(), count: 3 },
                SymbolCount { symbol: "ETH".into(), count: 1 },
            ],
            ..Default::default()
        };
        let shares = snap.breakdown_shares();
        assert_eq!(shares[0], ("BTC".to_string(), 75.0));
        assert_eq!(shares[1], ("ETH".to_string(), 25.0));
    }
}
