// crates/journal-terminal/src/components/help.rs

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

const SHORTCUTS: &[(&str, &str, Color)] = &[
    ("1-5 / Tab", "Switch screen", Color::Blue),
    ("Shift+Tab", "Previous screen", Color::Blue),
    ("M/m", "Toggle demo / live API", Color::Yellow),
    ("A/a", "Toggle role ADMIN / TRADER", Color::Magenta),
    ("U/u", "Edit user id", Color::Magenta),
    ("R/r", "Refresh current screen", Color::Green),
    ("f or /", "Edit filters (Tab: next field)", Color::Cyan),
    ("c", "Clear filters / export CSV", Color::Cyan),
    ("↑/k ↓/j", "Move selection", Color::White),
    ("n/→ p/←", "Next / previous page", Color::White),
    ("Enter", "Open trade", Color::White),
    ("Esc", "Back / cancel input", Color::White),
    ("i", "Import a file", Color::Cyan),
    ("j", "Export JSON", Color::Cyan),
    ("y/Y", "Copy JSON / CSV export link", Color::Cyan),
    ("F1", "Toggle Help", Color::Gray),
    ("Q/q", "Quit", Color::Red),
];

pub fn draw_help(f: &mut Frame, area: Rect) {
    // Clear the area first for the overlay
    f.render_widget(Clear, area);

    let help_items: Vec<ListItem> = SHORTCUTS
        .iter()
        .map(|(keys, action, color)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<10}", keys),
                    Style::default().fg(*color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" - {}", action)),
            ]))
        })
        .collect();

    let help_list = List::new(help_items).block(
        Block::default()
            .title(" Help - Keyboard Shortcuts ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(help_list, area);

    // Add footer with close instruction
    let footer = Paragraph::new("Press F1 or ESC to close help")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    let footer_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(2),
        width: area.width,
        height: 1,
    };

    f.render_widget(footer, footer_area);
}
