mod app;
mod ui;

use crate::context::AppContext;
use anyhow::Result;
use app::App;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;

/// Run the interactive live search until the user quits
pub fn run(ctx: AppContext) -> Result<()> {
    let AppContext { config, store, .. } = ctx;
    let mut app = App::new(store, &config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.poll_search();

        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        // Only key presses; Windows also reports releases
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if handle_key(app, key) {
            return Ok(());
        }
    }
}

/// Apply one key press; returns true when the user asked to quit
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if let (KeyModifiers::CONTROL, KeyCode::Char('c')) = (key.modifiers, key.code) {
        return true;
    }

    if app.mode == app::Mode::Help {
        // Any key closes help
        app.hide_help();
        return false;
    }

    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => app.delete_word(),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => app.clear_query(),
        (KeyModifiers::CONTROL, KeyCode::Char('n')) => app.select_next(),
        (KeyModifiers::CONTROL, KeyCode::Char('p')) => app.select_prev(),
        (KeyModifiers::CONTROL, KeyCode::Char('h')) => app.backspace(),
        (KeyModifiers::NONE | KeyModifiers::SHIFT, code) => match code {
            KeyCode::Esc => return true,
            KeyCode::Down | KeyCode::Tab => app.select_next(),
            KeyCode::Up | KeyCode::BackTab => app.select_prev(),
            KeyCode::PageDown => app.select_page_down(),
            KeyCode::PageUp => app.select_page_up(),
            KeyCode::F(1) => app.show_help(),
            // '?' is query text once something has been typed
            KeyCode::Char('?') if app.query.is_empty() => app.show_help(),
            KeyCode::Char(c) => app.push_char(c),
            KeyCode::Backspace => app.backspace(),
            _ => {}
        },
        _ => {}
    }
    false
}
