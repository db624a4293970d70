// crates/journal-terminal/src/ui.rs

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

use crate::app::App;
use crate::components::{
    access_panel::draw_access_panel,
    admin_users::draw_admin_users,
    dashboard::draw_dashboard,
    help::draw_help,
    import_export::draw_import_export,
    metrics::draw_metrics,
    status_bar::draw_status_bar,
    trade_detail::draw_trade_detail,
    trade_table::draw_trade_table,
};
use crate::route::Route;

pub fn draw(f: &mut Frame, app: &App) {
    // Main layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Screen tabs
            Constraint::Min(10),   // Current screen
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    draw_access_panel(f, chunks[0], app);
    draw_tabs(f, chunks[1], app);
    draw_screen(f, chunks[2], app);
    draw_status_bar(f, chunks[3], app);

    if app.show_help {
        draw_help(f, centered_rect(60, 70, f.size()));
    }
}

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Route::TABS
        .iter()
        .enumerate()
        .map(|(i, route)| Line::from(format!("{} {}", i + 1, route.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", app.route.path())))
        .select(app.route.tab_index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    f.render_widget(tabs, area);
}

fn draw_screen(f: &mut Frame, area: Rect, app: &App) {
    match &app.route {
        Route::Dashboard => draw_dashboard(f, area, app),
        Route::Trades => draw_trade_table(f, area, app),
        Route::TradeDetail(id) => draw_trade_detail(f, area, app, id),
        Route::Metrics => draw_metrics(f, area, app),
        Route::ImportExport => draw_import_export(f, area, app),
        Route::AdminUsers => draw_admin_users(f, area, app),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
