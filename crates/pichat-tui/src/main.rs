//! pichat terminal client entry point.

use std::{fs::File, path::PathBuf, process::ExitCode, sync::Mutex};

use clap::Parser;
use pichat_tui::{Credentials, Runtime, RuntimeError, TerminalDriver};
use tracing_subscriber::EnvFilter;

/// pichat terminal chat client
#[derive(Parser, Debug)]
#[command(name = "pichat")]
#[command(about = "Terminal client for the pichat chat server")]
#[command(version)]
struct Args {
    /// Account name. The first login with a new name registers it.
    login: String,

    /// Account password.
    password: String,

    /// Server address (`host:port`).
    #[arg(short, long, env = "PICHAT_SERVER", default_value = "127.0.0.1:81")]
    server: String,

    /// Write logs to this file. The terminal belongs to the UI, so nothing is
    /// logged without it.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Install a file logger if one was requested.
fn init_logging(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };

    let file = File::create(path)?;
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&args.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let driver = TerminalDriver::connect(&args.server).await?;
    let credentials = Credentials::new(args.login, args.password);

    // The driver is dropped inside `run`, so the terminal is restored here
    match Runtime::new(driver, credentials).run().await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(RuntimeError::AuthRejected(reason)) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("login rejected: {reason}");
            }
            Ok(ExitCode::FAILURE)
        },
        Err(e) => Err(e.into()),
    }
}
