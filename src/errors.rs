use std::{io, path::PathBuf};

use color_eyre::{Result as EyreResult, config::HookBuilder};
use reqwest::StatusCode;

/// Result alias used across the crate
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Every failure a run can abort with.
///
/// None of them are recovered locally: they bubble up to `main`, get rendered by the eyre hook and the process exits
/// with a non-zero status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The config file is missing or couldn't be read
    #[error("Couldn't read config file {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The config file content is not the expected JSON document
    #[error("Couldn't parse config file {}: {reason}", .path.display())]
    ConfigParse { path: PathBuf, reason: String },
    /// The config file couldn't be written back
    #[error("Couldn't write config file {}", .path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The product name can't be used to build the vendor request
    #[error("Invalid product name '{0}'")]
    InvalidProduct(String),
    /// The request to the vendor endpoint couldn't be completed
    #[error("Vendor request failed")]
    UpstreamRequest(#[source] reqwest::Error),
    /// The vendor endpoint answered with a non-success status
    #[error("Vendor API error {status}")]
    UpstreamHttp { status: StatusCode, body: String },
    /// The vendor response doesn't have the expected shape
    #[error("Unexpected vendor response: {0}")]
    UpstreamShape(String),
    /// A release date couldn't be parsed
    #[error("Couldn't parse date '{0}'")]
    DateParse(String),
    /// The request to the webhook couldn't be completed
    #[error("Webhook request failed")]
    NotifyRequest(#[source] reqwest::Error),
    /// The webhook rejected the notification
    #[error("Webhook notification failed: {0}")]
    Notify(String),
}

/// Installs the error report and panic hooks, then drives the main future to completion
pub async fn init<F>(fut: F) -> EyreResult<()>
where
    F: Future<Output = EyreResult<()>>,
{
    tracing::trace!("Initializing error handlers");
    let (panic_hook, eyre_hook) = HookBuilder::default()
        .panic_section(format!(
            "This is a bug in {} v{}, consider reporting it",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ))
        .display_env_section(false)
        .display_location_section(true)
        .capture_span_trace_by_default(true)
        .into_hooks();
    eyre_hook.install()?;
    panic_hook.install();

    fut.await.inspect_err(|err| tracing::debug!("Run aborted: {err:#}"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_upstream_http_display() {
        let err = AppError::UpstreamHttp {
            status: StatusCode::FORBIDDEN,
            body: String::from("denied"),
        };
        assert_eq!(err.to_string(), "Vendor API error 403 Forbidden");
    }

    #[test]
    fn test_config_read_keeps_source() {
        let err = AppError::ConfigRead {
            path: PathBuf::from("config.json"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.to_string(), "Couldn't read config file config.json");
        assert!(std::error::Error::source(&err).is_some());
    }
}
