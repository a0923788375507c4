use std::time::Duration;

use crate::{errors::Result, model::ReleaseRecord};

mod fetch;
mod notify;
mod select;

#[cfg(test)]
mod testing;

pub use fetch::{DEFAULT_PRODUCT, MsiReleaseSource};
pub use notify::{AllowedMentions, Embed, EmbedField, WebhookNotifier, WebhookPayload, build_payload};
pub use select::select_latest_newer_than;

/// Default timeout for outgoing requests
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider of the published firmware releases
#[trait_variant::make(Send)]
pub trait ReleaseSource {
    /// Fetches every release currently published, in vendor order
    async fn fetch_releases(&self) -> Result<Vec<ReleaseRecord>>;
}

/// Channel where new releases are announced
#[trait_variant::make(Send)]
pub trait Notifier {
    /// Announces the given release, pinging the given users
    async fn notify(&self, webhook_url: &str, release: &ReleaseRecord, mention_ids: &[String]) -> Result<()>;
}
