//! Subscriber setup for the host binary.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the filter chosen by `--log-level`.
pub const LOG_ENV: &str = "DRAPEAU_LOG";

/// Log verbosity levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Parser and dispatcher tracing
    Debug,
    /// Warnings only
    #[default]
    Normal,
    /// Errors only
    Quiet,
}

impl LogLevel {
    fn directives(self) -> &'static str {
        match self {
            LogLevel::Debug => "drapeau_core=trace,drapeau_cli=debug",
            LogLevel::Normal => "drapeau_core=warn,drapeau_cli=warn",
            LogLevel::Quiet => "drapeau_core=error,drapeau_cli=error",
        }
    }
}

/// Install the global subscriber. Output goes to stderr so stdout stays JSON.
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(level.directives()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
