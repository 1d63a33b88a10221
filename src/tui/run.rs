//! TUI main loop and terminal lifecycle.

use crate::error::Result;
use crate::tui::terminal::Terminal;
use crate::tui::{render, App};
use crossterm::{
    cursor::Show,
    event, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use std::time::Duration;

/// Run the app until quit, restoring the terminal on the way out.
pub async fn run(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new()?;

    let result = event_loop(&mut app, &mut terminal).await;

    // Restore the terminal even when the loop failed.
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;

    result
}

async fn event_loop(app: &mut App, terminal: &mut Terminal) -> Result<()> {
    loop {
        let frame = render::render(app, terminal.width(), terminal.height());
        terminal.draw(&frame.lines, frame.cursor)?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                event::Event::Resize(width, height) => terminal.update_size(width, height),
                other => app.handle_event(other),
            }
        }

        app.update();

        if app.should_quit {
            return Ok(());
        }
    }
}
