pub mod app;
pub mod colors;
pub mod search;
pub mod table;
pub mod ui;

use crate::config::AppConfig;
use crate::data::ClinicData;
use crate::error::{CliniPickError, Result};
use crate::session::Session;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

fn terminal_error(e: std::io::Error) -> CliniPickError {
    CliniPickError::Terminal(e.to_string())
}

/// Entry point: take over the terminal until the user quits
pub fn run(
    session: Session,
    config: &AppConfig,
    data: &ClinicData,
    remote_list: bool,
) -> Result<()> {
    let dirs = data.directories(config.simulated_latency());
    let mut app = app::App::new(session, config, &dirs, remote_list)?;

    enable_raw_mode().map_err(terminal_error)?;
    let mut stdout = std::io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(terminal_error(e));
    }

    let result = Terminal::new(CrosstermBackend::new(std::io::stdout()))
        .map_err(terminal_error)
        .and_then(|mut terminal| {
            let outcome = app.run(&mut terminal);
            let _ = terminal.show_cursor();
            outcome
        });

    // Always hand the terminal back, even when the app failed
    let _ = disable_raw_mode();
    let _ = execute!(std::io::stdout(), LeaveAlternateScreen);

    let form = app.form_snapshot();
    tracing::info!(
        client = ?form.client.selected_label,
        order = ?form.order.selected_label,
        resource = ?form.resource.selected_label,
        "tui closed"
    );
    result
}
