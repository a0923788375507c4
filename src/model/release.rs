use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors::Result, utils::parse_release_date};

/// A firmware release as published by the vendor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReleaseRecord {
    /// Version label, like `7E79v1A2`
    pub download_version: String,
    /// Free text changelog, may contain newlines
    pub download_description: String,
    /// Direct download link
    pub download_url: String,
    /// Publication date as sent by the vendor
    pub download_release: String,
    /// Name of the downloadable archive
    pub download_file: String,
}

impl ReleaseRecord {
    /// Parses the release date of this record
    pub fn released_at(&self) -> Result<DateTime<Utc>> {
        parse_release_date(&self.download_release)
    }
}
