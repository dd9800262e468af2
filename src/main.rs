//! Session-end hook demo.
//!
//! Installs a hidden sink window and waits. When Windows asks whether the session may end (or
//! announces that it is ending) the hook logs the event and, with `--marker`, appends a line to
//! a file. Ctrl+C stops the pump and exits.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info};

use cli::Cli;
use logging::configure_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_logging(cli.log_level());
    info!(
        version = env!("CARGO_PKG_VERSION"),
        ?cli,
        "starting shutdownhook"
    );

    let marker: Option<PathBuf> = cli.marker.clone();
    let handle = shutdownhook::install(cli.sink_config(), move || {
        on_session_end(marker.as_deref())
    })
    .context("installing session-end hook")?;

    // Ctrl+C -> post WM_QUIT to the pump thread (the handler runs on its own thread).
    let stopper = handle.stopper();
    ctrlc::set_handler(move || {
        info!("Ctrl+C received, stopping pump");
        if let Err(e) = stopper.stop() {
            error!(%e, "failed to stop notification pump");
        }
    })
    .context("installing Ctrl+C handler")?;

    info!(
        thread_id = handle.thread_id(),
        "waiting for session end (Ctrl+C to exit)"
    );
    handle.join().context("notification pump")?;
    info!("pump stopped");
    Ok(())
}

fn on_session_end(marker: Option<&Path>) {
    info!("session ending");
    if let Some(path) = marker
        && let Err(e) = append_marker(path)
    {
        error!(?e, path = %path.display(), "failed to write marker");
    }
}

fn append_marker(path: &Path) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    writeln!(file, "{secs} session ending")
}
