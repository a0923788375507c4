use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use tracing::instrument;

use super::Notifier;
use crate::{
    errors::{AppError, Result},
    model::ReleaseRecord,
};

/// Accent color of the embed (red)
const EMBED_COLOR: u32 = 0xff0000;
const EMBED_TITLE: &str = "New BIOS Released";

/// Body of the webhook request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookPayload {
    pub content: String,
    pub embeds: Vec<Embed>,
    pub allowed_mentions: AllowedMentions,
}

/// Rich block describing the release
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub url: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Restricts which mentions in the content actually ping someone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllowedMentions {
    pub users: Vec<String>,
}

/// Builds the announcement of the given release
pub fn build_payload(release: &ReleaseRecord, mention_ids: &[String]) -> WebhookPayload {
    WebhookPayload {
        content: format_content(&release.download_version, mention_ids),
        embeds: vec![Embed {
            title: EMBED_TITLE.to_owned(),
            description: release.download_description.clone(),
            url: release.download_url.clone(),
            color: EMBED_COLOR,
            fields: vec![
                EmbedField {
                    name: "Release date".to_owned(),
                    value: release.download_release.clone(),
                    inline: true,
                },
                EmbedField {
                    name: "File".to_owned(),
                    value: release.download_file.clone(),
                    inline: true,
                },
            ],
        }],
        allowed_mentions: AllowedMentions {
            users: mention_ids.to_vec(),
        },
    }
}

/// Formats the plain text message, prefixed with the user mentions if any
fn format_content(version: &str, mention_ids: &[String]) -> String {
    let mentions = mention_ids.iter().map(|id| format!("<@{id}>")).collect::<Vec<_>>().join(" ");
    format!("{mentions} [AUTOMATED] BIOS UPDATE AVAILABLE -> {version}!")
        .trim()
        .to_owned()
}

/// Posts the announcements to a chat webhook
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    /// Creates a new notifier
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_client_builder(ClientBuilder::new().timeout(timeout))
    }

    fn with_client_builder(builder: ClientBuilder) -> Result<Self> {
        let client = builder
            .build()
            .map_err(AppError::NotifyRequest)?;
        Ok(Self { client })
    }
}

impl Notifier for WebhookNotifier {
    #[instrument(skip_all, fields(version = %release.download_version))]
    async fn notify(&self, webhook_url: &str, release: &ReleaseRecord, mention_ids: &[String]) -> Result<()> {
        let payload = build_payload(release, mention_ids);

        tracing::debug!("Posting notification for {}", release.download_version);
        let res = self
            .client
            .post(webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                tracing::error!("Couldn't perform the request: {err:?}");
                AppError::NotifyRequest(err)
            })?;

        // A rejected notification would be lost silently otherwise, the marker must not advance
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_else(|err| {
                tracing::warn!("Couldn't read the response body: {err}");
                String::new()
            });
            tracing::error!(
                "Got response [{}] {}:\n{body}",
                status.as_str(),
                status.canonical_reason().unwrap_or_default()
            );
            return Err(AppError::Notify(format!("received {status} response")));
        }

        tracing::info!("Notification sent for {}", release.download_version);
        Ok(())
    }
}
