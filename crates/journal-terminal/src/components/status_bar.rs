// crates/journal-terminal/src/components/status_bar.rs

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, EditTarget, InputMode, StatusLevel};
use crate::route::Route;

fn key(label: &'static str) -> Span<'static> {
    Span::styled(label, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
}

fn screen_shortcuts(route: &Route) -> Vec<Span<'static>> {
    match route {
        Route::Dashboard => vec![key("[F]"), Span::raw("ilter dates "), key("[C]"), Span::raw("lear ")],
        Route::Trades => vec![
            key("[↑↓]"),
            Span::raw(" Select "),
            key("[Enter]"),
            Span::raw(" Open "),
            key("[N/P]"),
            Span::raw(" Page "),
            key("[F]"),
            Span::raw("ilter "),
        ],
        Route::TradeDetail(_) => vec![key("[Esc]"), Span::raw(" Back ")],
        Route::ImportExport => vec![
            key("[I]"),
            Span::raw("mport "),
            key("[J]"),
            Span::raw("SON "),
            key("[C]"),
            Span::raw("SV "),
        ],
        Route::Metrics | Route::AdminUsers => vec![],
    }
}

pub fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let (msg, style) = match app.input_mode {
        InputMode::Normal => {
            let mut spans = screen_shortcuts(&app.route);
            spans.extend([
                key("[R]"),
                Span::raw("efresh "),
                key("[M]"),
                Span::raw("ode "),
                key("[F1]"),
                Span::raw(" Help "),
                Span::styled("[Q]", Style::default().fg(Color::Gray)),
                Span::raw("uit"),
            ]);

            if let Some(status) = &app.status {
                let color = match status.level {
                    StatusLevel::Info => Color::Green,
                    StatusLevel::Error => Color::Red,
                };
                spans.push(Span::raw("  |  "));
                spans.push(Span::styled(
                    format!("{} {}", status.at.format("%H:%M:%S"), status.text),
                    Style::default().fg(color),
                ));
            }
            (Line::from(spans), Style::default())
        }
        InputMode::Editing(target) => {
            let mut input = vec![
                Span::raw(format!("{}: ", target.label())),
                Span::styled(app.input_buffer.as_str(), Style::default().fg(Color::Yellow)),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
                Span::raw(" [Enter] Apply"),
            ];
            if matches!(
                target,
                EditTarget::Filter(_) | EditTarget::DateFrom | EditTarget::DateTo
            ) {
                input.push(Span::raw(" [Tab] Next field"));
            }
            input.push(Span::raw(" [Esc] Cancel"));
            if let Some(status) = app.status.as_ref().filter(|s| s.level == StatusLevel::Error) {
                input.push(Span::styled(
                    format!("  {}", status.text),
                    Style::default().fg(Color::Red),
                ));
            }
            (Line::from(input), Style::default().fg(Color::Yellow))
        }
    };

    let status_block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(format!(" {} replies ", app.reply_count));

    let paragraph = Paragraph::new(msg)
        .block(status_block)
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}
