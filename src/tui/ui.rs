use crate::query::snippet::{normalize_snippet, split_highlights};
use crate::tui::app::{App, Mode};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::path::Path;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query input
            Constraint::Min(10),   // Results / Preview
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_query_input(f, app, chunks[0]);
    draw_main_area(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);

    if app.mode == Mode::Help {
        draw_help(f, f.area());
    }
}

fn draw_query_input(f: &mut Frame, app: &App, area: Rect) {
    let input = Paragraph::new(app.query.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search PDFs (F1: help, Esc: quit) "),
        );

    f.render_widget(input, area);

    if app.mode == Mode::Search {
        let cursor = app.query.chars().count() as u16;
        f.set_cursor_position((area.x + cursor + 1, area.y + 1));
    }
}

fn draw_main_area(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    draw_results_list(f, app, chunks[0]);
    draw_preview(f, app, chunks[1]);
}

fn draw_results_list(f: &mut Frame, app: &App, area: Rect) {
    let title_style = Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD);
    let path_style = Style::default().fg(Color::DarkGray);

    let items: Vec<ListItem> = app
        .results
        .iter()
        .map(|hit| {
            let file_name = Path::new(&hit.path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| hit.path.clone());

            ListItem::new(Text::from(vec![
                Line::from(Span::styled(
                    format!("{} (page {})", file_name, hit.page_num),
                    title_style,
                )),
                Line::from(Span::styled(hit.path.clone(), path_style)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Results ({}) ", app.results.len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.results.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_preview(f: &mut Frame, app: &App, area: Rect) {
    let (title, content) = match app.get_selected_result() {
        Some(hit) => {
            let snippet = normalize_snippet(&hit.snippet);
            let spans: Vec<Span> = split_highlights(&snippet, &app.live_style)
                .into_iter()
                .map(|segment| {
                    if segment.highlighted {
                        Span::styled(
                            segment.text.to_string(),
                            Style::default()
                                .fg(Color::Black)
                                .bg(Color::Yellow)
                                .add_modifier(Modifier::BOLD),
                        )
                    } else {
                        Span::raw(segment.text.to_string())
                    }
                })
                .collect();
            (
                format!(" {} (page {}) ", hit.path, hit.page_num),
                Text::from(Line::from(spans)),
            )
        }
        None => (" Preview ".to_string(), Text::raw("No preview available")),
    };

    let preview = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });

    f.render_widget(preview, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status = match app.search_duration_ms() {
        Some(ms) if ms > 250 => format!("{} {}ms", app.status_message, ms),
        _ => app.status_message.clone(),
    };
    let color = if app.is_searching() { Color::Yellow } else { Color::Cyan };
    let status = Paragraph::new(status).style(Style::default().fg(color));

    f.render_widget(status, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help = [
        ("Type", "Search (FTS5 syntax: \"phrase\", AND, OR, NOT, prefix*)"),
        ("Up/Down, Tab", "Move selection"),
        ("PgUp/PgDn", "Move selection by 10"),
        ("Ctrl+W", "Delete word"),
        ("Ctrl+U", "Clear query"),
        ("F1, ?", "Show this help (? on an empty query)"),
        ("Esc, Ctrl+C", "Quit"),
    ];

    let lines: Vec<Line> = help
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("{:>14}  ", key), Style::default().fg(Color::Yellow)),
                Span::raw(*desc),
            ])
        })
        .collect();

    let popup = centered_rect(70, 12, area);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Help ")),
        popup,
    );
}

fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(width_percent.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
