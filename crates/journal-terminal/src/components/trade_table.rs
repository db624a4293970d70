// crates/journal-terminal/src/components/trade_table.rs

use journal_client::QueryState;
use journal_core::table::{cells, trade_columns};
use journal_core::FilterField;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::{describe_error, App, EditTarget, InputMode};
use crate::components::{column_widths, draw_notice, header_row, value_cell};

pub fn draw_trade_table(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Filters
            Constraint::Min(5),    // Listing
            Constraint::Length(1), // Pager
        ])
        .split(area);

    draw_filters(f, chunks[0], app);

    match app.trades.page.state() {
        QueryState::Failed(e) => {
            draw_notice(f, chunks[1], "Trades", &describe_error(&app.route, e), Color::Red)
        }
        QueryState::Ready(_) => draw_rows(f, chunks[1], app),
        QueryState::Loading | QueryState::Idle => {
            draw_notice(f, chunks[1], "Trades", "Loading...", Color::Gray)
        }
    }

    draw_pager(f, chunks[2], app);
}

fn draw_filters(f: &mut Frame, area: Rect, app: &App) {
    let field_span = |field: FilterField| {
        let value = if app.input_mode == InputMode::Editing(EditTarget::Filter(field)) {
            Span::styled(
                format!("{}_", app.input_buffer),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )
        } else {
            match app.trades.filters.get(field) {
                Some(v) => Span::styled(v, Style::default().fg(Color::Cyan)),
                None => Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray)),
            }
        };
        vec![
            Span::styled(format!("{}: ", field.key()), Style::default().fg(Color::Gray)),
            value,
            Span::raw("   "),
        ]
    };

    let (first, second) = FilterField::ALL.split_at(4);
    let lines = vec![
        Line::from(first.iter().flat_map(|f| field_span(*f)).collect::<Vec<_>>()),
        Line::from(second.iter().flat_map(|f| field_span(*f)).collect::<Vec<_>>()),
    ];

    let active = app.trades.filters.active_count();
    let title = if active == 0 {
        " Filters [f] ".to_string()
    } else {
        format!(" Filters ({} active) [f] edit [c] clear ", active)
    };

    f.render_widget(
        Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL)),
        area,
    );
}

fn draw_rows(f: &mut Frame, area: Rect, app: &App) {
    let columns = trade_columns();
    let trades = app.trades.rows();

    let rows: Vec<Row> = if trades.is_empty() {
        vec![Row::new(vec![Cell::from("No trades")]).style(Style::default().fg(Color::Gray))]
    } else {
        cells(&columns, trades)
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                let style = if i == app.trades.selected {
                    Style::default().bg(Color::DarkGray)
                } else {
                    Style::default()
                };
                Row::new(row.into_iter().map(value_cell).collect::<Vec<_>>()).style(style)
            })
            .collect()
    };

    let table = Table::new(rows, column_widths(&columns))
        .header(header_row(&columns))
        .block(
            Block::default()
                .title(format!(" Trades ({}) ", app.trades.total()))
                .borders(Borders::ALL),
        );

    f.render_widget(table, area);
}

fn draw_pager(f: &mut Frame, area: Rect, app: &App) {
    let total = app.trades.total();
    let pagination = &app.trades.pagination;
    let enabled = |on: bool| {
        if on {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let line = Line::from(vec![
        Span::styled("[p] Prev", enabled(pagination.can_go_prev())),
        Span::raw("   "),
        Span::raw(pagination.label(total)),
        Span::raw("   "),
        Span::styled("[n] Next", enabled(pagination.can_go_next(total))),
    ]);

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
