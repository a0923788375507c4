use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{
    config::DEFAULT_CONFIG_FILE,
    service::{DEFAULT_PRODUCT, DEFAULT_REQUEST_TIMEOUT},
};

/// Watches a motherboard support page and announces new BIOS releases on a chat webhook
///
/// Meant to be run periodically by an external scheduler, every run checks once and exits
#[derive(Parser, Debug)]
#[command(author, version, verbatim_doc_comment)]
pub struct Cli {
    /// Path of the JSON config file, holding the webhook and the last announced release
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Product whose support page is watched
    #[arg(long, default_value = DEFAULT_PRODUCT)]
    pub product: String,

    /// Timeout in seconds for each HTTP request
    #[arg(
        long,
        default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Check for a new release and print the notification instead of sending it, the config is left untouched
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Timeout to apply to outgoing requests
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_cli_asserts() {
        Cli::command().debug_assert()
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["bios-watch"]).unwrap();

        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert_eq!(cli.product, "X870-GAMING-PLUS-WIFI");
        assert_eq!(cli.request_timeout(), Duration::from_secs(30));
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "bios-watch",
            "-c",
            "/etc/bios-watch.json",
            "--product",
            "MAG-X870-TOMAHAWK-WIFI",
            "--timeout",
            "5",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("/etc/bios-watch.json"));
        assert_eq!(cli.product, "MAG-X870-TOMAHAWK-WIFI");
        assert_eq!(cli.request_timeout(), Duration::from_secs(5));
        assert!(cli.dry_run);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(Cli::try_parse_from(["bios-watch", "--timeout", "0"]).is_err());
    }
}
