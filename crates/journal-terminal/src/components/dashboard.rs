// crates/journal-terminal/src/components/dashboard.rs

use journal_client::QueryState;
use journal_core::{Kpi, MetricsSnapshot};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::{describe_error, App, EditTarget, InputMode};
use crate::components::draw_notice;

pub fn draw_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Date range
            Constraint::Length(3), // KPI cards
            Constraint::Min(8),    // Equity curve
        ])
        .split(area);

    draw_range(f, chunks[0], app);

    // Missing data shows as zero, the same as an empty journal.
    let snap = app.dashboard.metrics.data();
    let kpi = snap.map(|s| s.kpi.clone()).unwrap_or_default();
    draw_kpis(f, chunks[1], &kpi);

    match app.dashboard.metrics.state() {
        QueryState::Ready(snap) => draw_equity(f, chunks[2], snap),
        QueryState::Failed(e) => draw_notice(
            f,
            chunks[2],
            "Equity curve",
            &describe_error(&app.route, e),
            Color::Red,
        ),
        QueryState::Loading | QueryState::Idle => {
            draw_notice(f, chunks[2], "Equity curve", "Loading...", Color::Gray)
        }
    }
}

fn draw_range(f: &mut Frame, area: Rect, app: &App) {
    let field = |target: EditTarget, value: String| {
        if app.input_mode == InputMode::Editing(target) {
            Span::styled(
                format!("{}_", app.input_buffer),
                Style::default().fg(Color::Yellow),
            )
        } else if value.is_empty() {
            Span::styled("YYYY-MM-DD", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(value, Style::default().fg(Color::Cyan))
        }
    };
    let range = app.dashboard.range;
    let fmt = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();

    let line = Line::from(vec![
        Span::raw("From "),
        field(EditTarget::DateFrom, fmt(range.from)),
        Span::raw("  To "),
        field(EditTarget::DateTo, fmt(range.to)),
        Span::styled("   [f] Edit  [c] Clear", Style::default().fg(Color::Gray)),
    ]);

    f.render_widget(
        Paragraph::new(line).block(Block::default().title(" Period ").borders(Borders::ALL)),
        area,
    );
}

fn draw_kpis(f: &mut Frame, area: Rect, kpi: &Kpi) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    let values = [
        ("Total trades", kpi.total_trades.to_string()),
        ("Winrate", format!("{}%", kpi.winrate)),
        ("PF", kpi.profit_factor.to_string()),
        ("Expectancy", kpi.expectancy.to_string()),
    ];

    for ((label, value), card) in values.into_iter().zip(cards.iter()) {
        let text = Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
            Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
        ]);
        let widget = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(widget, *card);
    }
}

fn draw_equity(f: &mut Frame, area: Rect, snap: &MetricsSnapshot) {
    let points = snap.equity_series();
    let [low, high] = snap.equity_bounds();
    let x_min = points.first().map(|p| p.0).unwrap_or(0.0);
    let x_max = points.last().map(|p| p.0).unwrap_or(1.0).max(x_min + 1.0);

    let datasets = vec![Dataset::default()
        .name("equity")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(Block::default().title(" Equity curve ").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(format!("{:.0}", x_min)),
                    Span::raw(format!("{:.0}", x_max)),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([low, high])
                .labels(vec![
                    Span::raw(format!("{:.2}", low)),
                    Span::raw(format!("{:.2}", high)),
                ]),
        );

    f.render_widget(chart, area);
}
