//! NPI Wizard - Terminal wizard for the CMS-10114 NPI application/update form
//!
//! A Ratatui-based TUI that walks a provider through the five stages of the
//! form, shows a review summary and submits the application to the NPI API.

mod api;
mod app;
mod config;
mod state;
mod ui;
mod wizard;

use anyhow::{Context, Result};
use api::ApiClient;
use app::App;
use config::{WizardConfig, LOG_FILTER_ENV};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Start logging to the configured file.
///
/// The terminal belongs to the UI, so nothing is written to stdout or stderr.
/// Returns `None` when there is nowhere to log to.
fn init_logging(config: &WizardConfig) -> Option<WorkerGuard> {
    let path = config.log_path()?;
    let dir = path.parent()?;
    let file_name = path.file_name()?;
    std::fs::create_dir_all(dir).ok()?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| "npi_wizard=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = WizardConfig::load()?;

    // Initialize logging
    let _log_guard = init_logging(&config);

    let api = ApiClient::new(&config).context("configuring the API client")?;
    tracing::info!(base_url = api.base_url(), "starting npi-wizard");

    // Create app before taking over the terminal so the health check can't leave it in raw mode
    let mut app = App::new(Box::new(api)).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        tracing::error!("{err:?}");
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw the UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // The busy indicator is on screen now; send the queued submission
        if app.has_pending_submission() {
            app.submit_pending().await;
            continue;
        }

        // Handle crossterm events
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key).await?;
                }
                Event::Resize(_width, _height) => {
                    // Layout is recalculated on next draw
                }
                _ => {}
            }
        }

        // Check if app wants to quit
        if app.should_quit() {
            return Ok(());
        }
    }
}
