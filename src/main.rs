//! VIGIL - Fleet Monitoring Dashboard
//!
//! A terminal dashboard that polls a live-bot-status API and an uptime
//! API, merges both into one fleet view, and keeps per-card claim
//! countdowns and a ping chart running.
//!
//! ## Usage
//!
//! ```bash
//! # Start the dashboard
//! vigil
//!
//! # With verbose logging
//! vigil -v
//!
//! # With a custom config file
//! vigil --config /path/to/config.yaml
//! ```

use std::io::Write;
use std::panic;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use vigil_core::config::VigilConfig;
use vigil_core::{init_logging, LogGuard};
use vigil_tui::App;

/// VIGIL Fleet Monitoring Dashboard
///
/// A terminal interface for watching faucet bots and uptime checks,
/// with live claim countdowns and ping history.
#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (increases log level)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the configuration file (defaults to ~/.vigil/config.yaml)
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Directory for log files (defaults to ~/.vigil/logs/)
    #[arg(long)]
    log_dir: Option<std::path::PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    // Install panic hook to ensure terminal cleanup
    install_panic_hook();

    info!("Starting VIGIL dashboard");

    match run_app(&cli) {
        Ok(()) => {
            info!("VIGIL dashboard exited normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("VIGIL dashboard error: {}", e);
            eprintln!("Error: {}", e);
            if let Some(guidance) = e.guidance() {
                eprintln!("Hint: {}", guidance);
            }
            ExitCode::from(1)
        }
    }
}

/// Install a panic hook that restores the terminal before printing the panic message.
///
/// Even if the application panics while in raw mode with the alternate
/// screen enabled, the terminal is restored so the user can read the
/// panic message and keep using their shell.
fn install_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

/// Restore terminal to its normal state.
fn restore_terminal() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();

    let _ = crossterm::terminal::disable_raw_mode();

    crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen)?;
    crossterm::execute!(stdout, crossterm::cursor::Show)?;

    stdout.flush()?;

    Ok(())
}

/// Set up logging based on CLI arguments.
fn setup_logging(cli: &Cli) -> vigil_core::Result<LogGuard> {
    let debug = cli.verbose > 0;
    init_logging(cli.log_dir.clone(), debug)
}

/// Load config and run the dashboard to completion.
#[tokio::main]
async fn run_app(cli: &Cli) -> vigil_core::Result<()> {
    let config = VigilConfig::load(cli.config.clone())?;
    info!(
        status_url = %config.bot_status_url,
        checks_url = %config.site_check_url,
        "configuration loaded"
    );

    let mut app = App::new(&config)?;
    app.run(&config).await
}
