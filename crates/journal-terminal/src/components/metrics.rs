// crates/journal-terminal/src/components/metrics.rs

use journal_client::QueryState;
use journal_core::MetricsSnapshot;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{BarChart, Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::app::{describe_error, App};
use crate::components::draw_notice;

const SHARE_BAR_WIDTH: f64 = 20.0;

pub fn draw_metrics(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    match app.metrics.state() {
        QueryState::Ready(snap) => {
            draw_histogram(f, chunks[0], snap);
            draw_breakdown(f, chunks[1], snap);
        }
        QueryState::Failed(e) => {
            draw_notice(f, area, "Metrics", &describe_error(&app.route, e), Color::Red)
        }
        QueryState::Loading | QueryState::Idle => {
            draw_notice(f, chunks[0], "R histogram", "Loading...", Color::Gray);
            draw_notice(f, chunks[1], "Breakdown by symbol", "Loading...", Color::Gray);
        }
    }
}

fn draw_histogram(f: &mut Frame, area: Rect, snap: &MetricsSnapshot) {
    let labels: Vec<String> = snap.r_histogram.iter().map(|b| format!("{}R", b.r)).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(&snap.r_histogram)
        .map(|(label, bucket)| (label.as_str(), bucket.count))
        .collect();

    let chart = BarChart::default()
        .block(Block::default().title(" R histogram ").borders(Borders::ALL))
        .data(data.as_slice())
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .label_style(Style::default().fg(Color::Gray));

    f.render_widget(chart, area);
}

fn draw_breakdown(f: &mut Frame, area: Rect, snap: &MetricsSnapshot) {
    let header = Row::new(vec!["Symbol", "Count", "Share"])
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

    let palette = [Color::Cyan, Color::Blue, Color::Magenta, Color::Gray];
    let rows: Vec<Row> = snap
        .breakdown_by_symbol
        .iter()
        .zip(snap.breakdown_shares())
        .enumerate()
        .map(|(i, (entry, (_, share)))| {
            let bar = "█".repeat((share / 100.0 * SHARE_BAR_WIDTH).round() as usize);
            Row::new(vec![
                Cell::from(entry.symbol.clone()),
                Cell::from(entry.count.to_string()),
                Cell::from(format!("{:>5.1}% {}", share, bar))
                    .style(Style::default().fg(palette[i % palette.len()])),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(" Breakdown by symbol ").borders(Borders::ALL));

    f.render_widget(table, area);
}
