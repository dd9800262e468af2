//! Command line definition and its conversion into library configuration.

use clap::{ArgAction, Parser};
use shutdownhook::SinkConfig;
use shutdownhook::config::DEFAULT_CLASS_NAME;
use std::path::PathBuf;

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(
    version,
    about = concat!(
        env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"),
        " - Run an action once when Windows ends the session (logoff, shutdown, restart).",
    )
)]
pub struct Cli {
    /// Window class name of the hidden sink (must be unique within the process).
    #[arg(long = "class-name", alias = "class", default_value = DEFAULT_CLASS_NAME)]
    pub class_name: String,
    /// Title of the hidden sink window. Defaults to the class name.
    #[arg(long = "title")]
    pub title: Option<String>,
    /// Append a timestamped line to this file when the session ends.
    #[arg(long = "marker", value_name = "PATH")]
    pub marker: Option<PathBuf>,
    /// Increase verbosity (-v=debug, -vv=trace). Overrides RUST_LOG.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
    /// Quiet mode: only warnings and errors. Overrides -v and RUST_LOG.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

/// Logging threshold selected on the command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Warn,
    Info,
    Debug,
    Trace,
}

impl Cli {
    /// `-q` wins over `-v`; without either, RUST_LOG decides at INFO by default.
    pub fn log_level(&self) -> LogLevel {
        if self.quiet {
            LogLevel::Warn
        } else if self.verbose > 1 {
            LogLevel::Trace
        } else if self.verbose == 1 {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }

    pub fn sink_config(&self) -> SinkConfig {
        let title = self.title.clone().unwrap_or_else(|| self.class_name.clone());
        SinkConfig::default()
            .with_class_name(self.class_name.clone())
            .with_title(title)
    }
}
