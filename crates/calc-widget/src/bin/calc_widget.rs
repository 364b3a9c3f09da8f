//! calc-widget: the calculator widget in a terminal
//!
//! ## Usage
//!
//! ```bash
//! calc-widget                          # default bounds, 5 s banner
//! calc-widget --config widget.json     # custom bounds / timeout / precision
//! calc-widget --log-level debug --json-logs
//! ```
//!
//! Reads one line at a time from stdin (see `:help`) and prints the widget
//! after each line. Wall-clock time between lines counts toward the banner
//! timeout.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use calc_widget::config::WidgetConfig;
use calc_widget::core::CalcError;
use calc_widget::repl::{Command, Flow, ReplSession, HELP};

/// Range-checked calculator widget for the terminal
#[derive(Debug, Parser)]
#[command(name = "calc-widget", version, about)]
struct Cli {
    /// JSON widget configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log filter directive (e.g. `warn`, `calc_widget=debug`)
    #[arg(long, default_value = "warn", env = "CALC_WIDGET_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

/// Errors that end the session
#[derive(Debug, Error)]
enum CliError {
    /// Widget configuration error
    #[error(transparent)]
    Calc(#[from] CalcError),

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Bad `--log-level` value
    #[error("Invalid log filter: {0}")]
    LogFilter(String),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = load_config(&cli)?;
    info!(?config, "starting session");
    let mut session = ReplSession::with_config(&config);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", session.render())?;

    let mut last = Instant::now();
    for line in stdin.lock().lines() {
        let line = line?;
        let now = Instant::now();
        session.advance_time(elapsed_ms(now.duration_since(last)));
        last = now;

        match Command::parse(&line) {
            Ok(command) => match session.execute(&command) {
                Flow::Render => writeln!(stdout, "{}", session.render())?,
                Flow::Help => writeln!(stdout, "{HELP}")?,
                Flow::Quit => break,
            },
            Err(err) => writeln!(stdout, "{err}")?,
        }
        stdout.flush()?;
    }

    info!("session ended");
    Ok(())
}

fn load_config(cli: &Cli) -> CliResult<WidgetConfig> {
    Ok(match &cli.config {
        Some(path) => WidgetConfig::from_file(path)?,
        None => WidgetConfig::default(),
    })
}

fn init_logging(cli: &Cli) -> CliResult<()> {
    let filter =
        EnvFilter::try_new(&cli.log_level).map_err(|e| CliError::LogFilter(e.to_string()))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
