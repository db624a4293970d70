// crates/journal-terminal/src/components/mod.rs

pub mod access_panel;
pub mod admin_users;
pub mod dashboard;
pub mod help;
pub mod import_export;
pub mod metrics;
pub mod status_bar;
pub mod trade_detail;
pub mod trade_table;

use journal_core::{CellValue, Column};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Wrap},
    Frame,
};

/// A bordered box with one centred message: loading, empty or failed.
pub fn draw_notice(f: &mut Frame, area: Rect, title: &str, text: &str, color: Color) {
    let notice = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(format!(" {} ", title)).borders(Borders::ALL));
    f.render_widget(notice, area);
}

pub fn header_row<R>(columns: &[Column<R>]) -> Row<'static> {
    Row::new(columns.iter().map(|c| c.header).collect::<Vec<_>>())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD))
}

pub fn column_widths<R>(columns: &[Column<R>]) -> Vec<Constraint> {
    columns.iter().map(|c| Constraint::Min(c.width)).collect()
}

/// Links render underlined; Enter on the row follows them.
pub fn value_cell(value: CellValue) -> Cell<'static> {
    match value {
        CellValue::Text(text) => Cell::from(text),
        CellValue::Link { label, .. } => Cell::from(label).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
        ),
    }
}
