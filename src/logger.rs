//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup, after configuration is loaded. Everything
//! in the crate logs through the `tracing` macros; the installed subscriber is
//! the one process-wide sink shared by all in-flight requests.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::Error;

/// Installs the global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence; `level` is the fallback when it is unset or
/// unparsable.
pub fn init(level: &str) -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| Error::Logger(format!("invalid log level '{level}': {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::Logger(format!("failed to set subscriber: {e}")))
}

/// Validates a level string before it is used.
pub fn parse_level(level: &str) -> Result<LevelFilter, Error> {
    if level.is_empty() {
        return Err(Error::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| Error::Logger(format!("unrecognised log level: '{level}'")))
}
