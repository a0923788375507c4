use std::fmt;

use tracing::instrument;

use crate::{
    config::ConfigStore,
    errors::Result,
    model::ReleaseRecord,
    service::{Notifier, ReleaseSource, WebhookPayload, build_payload, select_latest_newer_than},
};

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Nothing newer than the stored marker was published
    NoUpdate,
    /// The release was announced and the marker advanced to it
    Notified(ReleaseRecord),
    /// The release would have been announced with the given payload
    DryRun {
        release: ReleaseRecord,
        payload: WebhookPayload,
    },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::NoUpdate => write!(f, "Nothing new"),
            RunOutcome::Notified(release) => write!(
                f,
                "Sent alert for {}, config updated to {}",
                release.download_version, release.download_release
            ),
            RunOutcome::DryRun { release, payload } => {
                let payload = serde_json::to_string_pretty(payload).map_err(|_| fmt::Error)?;
                write!(f, "Would send alert for {}:\n{payload}", release.download_version)
            }
        }
    }
}

/// Checks for a new release and announces it
pub struct App<S, N> {
    store: ConfigStore,
    source: S,
    notifier: N,
    dry_run: bool,
}

impl<S, N> App<S, N>
where
    S: ReleaseSource,
    N: Notifier,
{
    /// Creates a new app
    pub fn new(store: ConfigStore, source: S, notifier: N) -> Self {
        Self {
            store,
            source,
            notifier,
            dry_run: false,
        }
    }

    /// Whether to stop right before notifying, leaving the config untouched
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs a single check.
    ///
    /// The config is only written back after the notification went through. If saving fails at that point, the
    /// notification can't be taken back and the next run will announce the same release again.
    #[instrument(skip_all, fields(dry_run = self.dry_run))]
    pub async fn run(&self) -> Result<RunOutcome> {
        let mut config = self.store.load().await?;
        let threshold = config.last_release()?;

        let releases = self.source.fetch_releases().await?;

        let Some(latest) = select_latest_newer_than(&releases, threshold)? else {
            tracing::info!("Nothing newer than {}", config.last_bios_release);
            return Ok(RunOutcome::NoUpdate);
        };
        let latest = latest.clone();
        tracing::info!(
            "Found release {} from {}",
            latest.download_version,
            latest.download_release
        );

        if self.dry_run {
            let payload = build_payload(&latest, &config.mention_user_ids);
            return Ok(RunOutcome::DryRun {
                release: latest,
                payload,
            });
        }

        self.notifier
            .notify(&config.webhook_url, &latest, &config.mention_user_ids)
            .await?;

        config.last_bios_release = latest.download_release.clone();
        self.store.save(&config).await?;

        Ok(RunOutcome::Notified(latest))
    }
}
