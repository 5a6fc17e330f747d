use std::{error::Error, io};

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::{
    cursor::SetCursorStyle,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::Terminal;

pub type ChatTerminal = Terminal<CrosstermBackend<io::Stdout>>;

pub fn setup_terminal() -> Result<ChatTerminal, Box<dyn Error>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen, SetCursorStyle::SteadyBar) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).inspect_err(|_| {
        let _ = disable_raw_mode();
    })?;
    Ok(terminal)
}

pub fn restore_terminal(terminal: &mut ChatTerminal) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        SetCursorStyle::DefaultUserShape,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    Ok(())
}
