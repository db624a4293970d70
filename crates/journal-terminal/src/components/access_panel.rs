// crates/journal-terminal/src/components/access_panel.rs

use journal_core::{Role, UiMode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, EditTarget, InputMode};

pub fn draw_access_panel(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(28),
            Constraint::Percentage(38),
        ])
        .split(area);

    // Left: title and API health
    let (health_symbol, health_color) = match app.api_healthy {
        Some(true) => ("✓", Color::Green),
        Some(false) => ("✗", Color::Red),
        None => ("…", Color::Gray),
    };
    let title = Line::from(vec![
        Span::styled(
            "Top Journal UI v1",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" - API "),
        Span::styled(health_symbol, Style::default().fg(health_color)),
    ]);
    f.render_widget(
        Paragraph::new(title).block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    // Center: mode switch
    let mode_style = match app.mode {
        UiMode::Demo => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        UiMode::Api => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    };
    let mode = Line::from(vec![
        Span::raw("Mode: "),
        Span::styled(app.mode.as_str().to_uppercase(), mode_style),
        Span::styled(" [m]", Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(
        Paragraph::new(mode).block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );

    // Right: identity sent with live requests
    let role_color = match app.access.role {
        Role::Admin => Color::Magenta,
        Role::Trader => Color::Blue,
    };
    let editing_id = app.input_mode == InputMode::Editing(EditTarget::IdentityId);
    let id_span = if editing_id {
        Span::styled(
            format!("{}_", app.input_buffer),
            Style::default().fg(Color::Yellow),
        )
    } else {
        Span::raw(app.access.identity_id.to_string())
    };
    let access = Line::from(vec![
        Span::raw("Role: "),
        Span::styled(app.access.role.as_str(), Style::default().fg(role_color)),
        Span::styled(" [a]", Style::default().fg(Color::Gray)),
        Span::raw("  User: "),
        id_span,
        Span::styled(" [u]", Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(
        Paragraph::new(access).block(Block::default().title(" Access ").borders(Borders::ALL)),
        chunks[2],
    );
}
