// crates/journal-terminal/src/components/import_export.rs

use journal_core::ExportFormat;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, EditTarget, InputMode};

pub fn draw_import_export(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(8)])
        .split(area);

    draw_import(f, chunks[0], app);
    draw_export(f, chunks[1], app);
}

fn draw_import(f: &mut Frame, area: Rect, app: &App) {
    let prompt = if app.input_mode == InputMode::Editing(EditTarget::ImportPath) {
        Line::from(vec![
            Span::raw("File: "),
            Span::styled(
                format!("{}_", app.input_buffer),
                Style::default().fg(Color::Yellow),
            ),
        ])
    } else if app.transfer.importing {
        Line::from(Span::styled("Uploading...", Style::default().fg(Color::Yellow)))
    } else {
        Line::from(vec![
            Span::styled("[i]", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Import a .csv or .json file"),
        ])
    };

    let mut lines = vec![prompt, Line::from("")];
    match &app.transfer.last_import {
        None => lines.push(Line::from(Span::styled(
            "No uploads yet",
            Style::default().fg(Color::DarkGray),
        ))),
        Some(Ok(result)) => {
            let pretty = serde_json::to_string_pretty(result).unwrap_or_default();
            lines.extend(pretty.lines().map(|l| Line::from(l.to_string())));
        }
        Some(Err(e)) => lines.push(Line::from(Span::styled(
            e.clone(),
            Style::default().fg(Color::Red),
        ))),
    }

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().title(" Import ").borders(Borders::ALL)),
        area,
    );
}

fn draw_export(f: &mut Frame, area: Rect, app: &App) {
    let key = |format: ExportFormat| match format {
        ExportFormat::Json => "[j]",
        ExportFormat::Csv => "[c]",
    };

    let mut lines: Vec<Line> = app
        .transfer
        .export_urls
        .iter()
        .map(|(format, url)| {
            Line::from(vec![
                Span::styled(key(*format), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Span::raw(format!(" Export {:<5} ", format.as_str().to_uppercase())),
                Span::styled(url.clone(), Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    lines.push(Line::from(Span::styled(
        "[y] copy JSON link  [Y] copy CSV link",
        Style::default().fg(Color::DarkGray),
    )));

    let outcome = if app.transfer.exporting {
        Line::from(Span::styled("Downloading...", Style::default().fg(Color::Yellow)))
    } else {
        match &app.transfer.last_export {
            Some(Ok(summary)) => Line::from(Span::styled(
                format!("Saved {} ({} bytes)", summary.path.display(), summary.bytes),
                Style::default().fg(Color::Green),
            )),
            Some(Err(e)) => Line::from(Span::styled(e.clone(), Style::default().fg(Color::Red))),
            None => Line::from(""),
        }
    };
    lines.push(outcome);

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().title(" Export ").borders(Borders::ALL)),
        area,
    );
}
