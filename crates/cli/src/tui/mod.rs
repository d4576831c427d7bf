mod app;
mod state;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use app::Action;
use state::App;

/// `billed tui`: the bills screen, interactive.
pub async fn run(offline: bool) -> Result<()> {
    let router = crate::commands::build_router(offline)?;

    // ── Setup terminal ──────────────────────────────────────────
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // ── Initialize app state ────────────────────────────────────
    let mut app = App::new(router).await;

    // ── Main loop ───────────────────────────────────────────────
    let result = run_loop(&mut terminal, &mut app).await;

    // ── Teardown (always runs) ──────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match app::handle_key(app, key.code, key.modifiers) {
                    Action::None => {}
                    Action::Quit => return Ok(()),
                    Action::Refresh => app.refresh().await,
                    Action::Up => app.select_prev(),
                    Action::Down => app.select_next(),
                    Action::Back => app.back().await,
                    Action::ToggleHelp => app.toggle_help(),
                    Action::Command(command) => app.run(&command),
                }
            }
        }

        app.tick();
    }
}
