//! passvault - a keyboard-driven terminal client for a password vault.
//!
//! Sessions end automatically after a period without keyboard or mouse
//! activity; the login view then explains why the user was signed out.

mod app;
mod toast;
mod ui;

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use passvault_core::api::{ApiClient, Credential};
use passvault_core::clock::SystemClock;
use passvault_core::config::Config;
use passvault_core::session::TokenStore;

use app::{App, AppState};
use ui::input::{handle_input, interaction_from};
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name prefix inside the log directory
const LOG_FILE_PREFIX: &str = "passvault";

/// Initialize the tracing subscriber, writing to a daily rolling file so
/// log lines never land on the terminal the UI is drawing to.
fn init_tracing(log_dir: &Path) -> Result<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(log_dir)?;
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Tracing first so config load problems are recorded
    let _log_guard = match Config::cache_dir().and_then(|dir| init_tracing(&dir.join("logs"))) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {}", e);
            None
        }
    };

    let mut config = Config::load();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--login" {
        return login_interactive(&mut config).await;
    }

    info!(api = %config.api_base_url, "passvault starting");

    let backend = config.durable_store()?;
    let mut app = App::new(config, backend, Arc::new(SystemClock))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("passvault shutting down");
    Ok(())
}

/// Prompt for credentials on the plain terminal, store the session token
/// and exit. The next launch opens straight into the vault.
async fn login_interactive(config: &mut Config) -> Result<()> {
    println!("\n=== passvault login ===\n");

    let username = match config.last_username {
        Some(ref last_user) => {
            print!("Username [{}]: ", last_user);
            io::stdout().flush()?;
            let input = read_line()?;
            if input.is_empty() {
                last_user.clone()
            } else {
                input
            }
        }
        None => {
            print!("Username: ");
            io::stdout().flush()?;
            read_line()?
        }
    };

    let password = rpassword::prompt_password("Password: ")?;

    println!("\nAuthenticating...");

    let credential = Credential::new();
    let api = ApiClient::new(&config.api_base_url, credential.clone())?;
    let token = api.login(&username, &password).await?;

    let mut store = TokenStore::new(config.durable_store()?, credential);
    store.save(&token)?;

    config.last_username = Some(username);
    config.save()?;

    info!("Interactive login succeeded");
    println!("Login successful!\n");
    Ok(())
}

fn read_line() -> Result<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Apply expiry, redirects and task results before drawing
        app.tick();

        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout so the inactivity timer keeps running
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            let event = event::read()?;

            // Every event is offered to the session first, then a late
            // timeout is applied so keys go to the view the user now sees
            app.handle_interaction(interaction_from(&event));
            app.tick();

            if let Event::Key(key) = event {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
