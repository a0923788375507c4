use std::{env, io};

use color_eyre::{Result, eyre::Context};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding the log filter
pub const LOG_ENV_VAR: &str = "BIOS_WATCH_LOG";

/// Resolves the log filter from the environment, falling back to warnings only
pub fn resolve_filter() -> String {
    env::var(LOG_ENV_VAR).unwrap_or_else(|_| String::from("warn"))
}

/// Initializes the tracing subscriber to output logs to stderr
pub fn init(filter: impl AsRef<str>) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .parse(filter.as_ref())
        .wrap_err("Couldn't parse the log filter")?;
    let stderr_subscriber = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(env_filter);
    tracing_subscriber::registry()
        .with(stderr_subscriber)
        .with(ErrorLayer::default())
        .try_init()
        .wrap_err("Couldn't install the log subscriber")?;
    Ok(())
}
