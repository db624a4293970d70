// crates/journal-terminal/src/components/admin_users.rs

use journal_client::QueryState;
use journal_core::table::{cells, user_columns};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::app::{describe_error, App};
use crate::components::{column_widths, draw_notice, header_row, value_cell};

pub fn draw_admin_users(f: &mut Frame, area: Rect, app: &App) {
    let page = match app.users.state() {
        QueryState::Ready(page) => page,
        QueryState::Failed(e) => {
            draw_notice(f, area, "Users", &describe_error(&app.route, e), Color::Red);
            return;
        }
        QueryState::Loading | QueryState::Idle => {
            draw_notice(f, area, "Users", "Loading...", Color::Gray);
            return;
        }
    };

    let columns = user_columns();
    let rows: Vec<Row> = if page.items.is_empty() {
        vec![Row::new(vec![Cell::from("No users")]).style(Style::default().fg(Color::Gray))]
    } else {
        cells(&columns, &page.items)
            .into_iter()
            .map(|row| Row::new(row.into_iter().map(value_cell).collect::<Vec<_>>()))
            .collect()
    };

    let table = Table::new(rows, column_widths(&columns))
        .header(header_row(&columns))
        .block(
            Block::default()
                .title(format!(" Users ({}) ", page.items.len()))
                .borders(Borders::ALL),
        );

    f.render_widget(table, area);
}
