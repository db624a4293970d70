// crates/journal-terminal/src/components/trade_detail.rs

use journal_client::QueryState;
use journal_core::trade::{format_levels, or_dash};
use journal_core::Trade;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{describe_error, App};
use crate::components::draw_notice;

pub fn draw_trade_detail(f: &mut Frame, area: Rect, app: &App, id: &str) {
    let title = format!("Trade #{}", id);
    match app.detail.state() {
        QueryState::Ready(trade) => draw_trade(f, area, trade),
        QueryState::Failed(e) => {
            draw_notice(f, area, &title, &describe_error(&app.route, e), Color::Red)
        }
        QueryState::Loading | QueryState::Idle => {
            draw_notice(f, area, &title, "Loading...", Color::Gray)
        }
    }
}

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<10}", label), Style::default().fg(Color::Gray)),
        Span::raw(value),
    ])
}

fn draw_trade(f: &mut Frame, area: Rect, trade: &Trade) {
    let side_color = if trade.side.eq_ignore_ascii_case("long") || trade.side.eq_ignore_ascii_case("buy") {
        Color::Green
    } else {
        Color::Red
    };

    let tags = if trade.tags.is_empty() {
        "-".to_string()
    } else {
        trade.tags.join(", ")
    };

    let lines = vec![
        field("Symbol", trade.symbol.clone()),
        Line::from(vec![
            Span::styled(format!("{:<10}", "Side"), Style::default().fg(Color::Gray)),
            Span::styled(trade.side.clone(), Style::default().fg(side_color)),
        ]),
        field("Status", trade.status.clone()),
        field("Trader", or_dash(trade.trader_id)),
        field("SL", or_dash(trade.stop_loss)),
        field("TP", format_levels(&trade.take_profits)),
        field("Entries", format_levels(&trade.entries)),
        field("Size %", or_dash(trade.position_pct)),
        field("R", or_dash(trade.r_multiple)),
        field("Time", or_dash(trade.timestamp.map(|ts| ts.format("%Y-%m-%d %H:%M:%S")))),
        field("Notes", trade.notes.clone().unwrap_or_else(|| "-".to_string())),
        field("Tags", tags),
        Line::from(""),
        Line::from(Span::styled("[Esc] Back to trades", Style::default().fg(Color::DarkGray))),
    ];

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(Span::styled(
                format!(" Trade #{} ", trade.id),
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL),
    );

    f.render_widget(widget, area);
}
