use std::time::Duration;

use reqwest::{
    Client, ClientBuilder,
    header::{self, HeaderMap, HeaderName, HeaderValue},
};
use serde_json::Value;
use tracing::instrument;

use super::ReleaseSource;
use crate::{
    errors::{AppError, Result},
    model::ReleaseRecord,
};

/// Product watched when none is provided
pub const DEFAULT_PRODUCT: &str = "X870-GAMING-PLUS-WIFI";

/// Vendor site, used both as the API host and the spoofed origin
const VENDOR_ORIGIN: &str = "https://www.msi.com";
/// Path of the support panel API
const PANEL_PATH: &str = "/api/v1/product/support/panel";
/// Section of the downloads holding the firmware releases
const BIOS_SECTION: &str = "AMI BIOS";
/// A regular desktop browser, the API rejects anything else
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
                                  Chrome/126.0.0.0 Safari/537.36";

/// Fetches the firmware releases of a product from the vendor support panel
pub struct MsiReleaseSource {
    client: Client,
    base_url: String,
    product: String,
}

impl MsiReleaseSource {
    /// Creates a new source for the given product
    pub fn new(product: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_client_builder(VENDOR_ORIGIN, product, ClientBuilder::new().timeout(timeout))
    }

    /// Builds the source on top of the given client builder, headers always claim to come from the vendor site
    fn with_client_builder(
        base_url: impl Into<String>,
        product: impl Into<String>,
        builder: ClientBuilder,
    ) -> Result<Self> {
        let base_url: String = base_url.into();
        let product = product.into();
        let client = builder
            .default_headers(browser_headers(&product)?)
            .build()
            .map_err(AppError::UpstreamRequest)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            product,
        })
    }
}

impl ReleaseSource for MsiReleaseSource {
    #[instrument(skip_all, fields(product = %self.product))]
    async fn fetch_releases(&self) -> Result<Vec<ReleaseRecord>> {
        let url = format!("{}{PANEL_PATH}", self.base_url);
        tracing::debug!("Fetching releases from {url}");

        let res = self
            .client
            .get(&url)
            .query(&[("product", self.product.as_str()), ("type", "bios")])
            .send()
            .await
            .map_err(|err| {
                tracing::error!("Couldn't perform the request: {err:?}");
                AppError::UpstreamRequest(err)
            })?;

        // Surface the body on failures, it usually tells which header the API didn't like
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
            return Err(AppError::UpstreamHttp { status, body });
        }

        let body = res.text().await.map_err(AppError::UpstreamRequest)?;
        let value: Value =
            serde_json::from_str(&body).map_err(|err| AppError::UpstreamShape(format!("invalid JSON body: {err}")))?;
        let releases = extract_releases(value)?;

        tracing::debug!("Fetched {} releases", releases.len());
        Ok(releases)
    }
}

/// Builds the header set of an XHR issued by the vendor's own product support page
fn browser_headers(product: &str) -> Result<HeaderMap> {
    let referer = format!("{VENDOR_ORIGIN}/Motherboard/{product}/support");
    let referer = HeaderValue::from_str(&referer).map_err(|_| AppError::InvalidProduct(product.to_owned()))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(header::ORIGIN, HeaderValue::from_static(VENDOR_ORIGIN));
    headers.insert(header::REFERER, referer);
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(HeaderName::from_static("sec-fetch-site"), HeaderValue::from_static("same-origin"));
    headers.insert(HeaderName::from_static("sec-fetch-mode"), HeaderValue::from_static("cors"));
    headers.insert(HeaderName::from_static("sec-fetch-dest"), HeaderValue::from_static("empty"));
    Ok(headers)
}

/// Extracts the release list at `result.downloads["AMI BIOS"]`
fn extract_releases(mut value: Value) -> Result<Vec<ReleaseRecord>> {
    let Some(list) = value
        .get_mut("result")
        .and_then(|v| v.get_mut("downloads"))
        .and_then(|v| v.get_mut(BIOS_SECTION))
    else {
        return Err(AppError::UpstreamShape(format!(
            "missing result.downloads[\"{BIOS_SECTION}\"]"
        )));
    };
    if !list.is_array() {
        return Err(AppError::UpstreamShape(format!(
            "result.downloads[\"{BIOS_SECTION}\"] is not a list"
        )));
    }
    serde_json::from_value(list.take()).map_err(|err| AppError::UpstreamShape(format!("invalid release: {err}")))
}
