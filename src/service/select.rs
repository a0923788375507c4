use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::{errors::Result, model::ReleaseRecord};

/// Picks the most recent release strictly newer than `threshold`.
///
/// Returns `None` when nothing is newer. Every record date is parsed, so a malformed one fails the whole selection.
/// When several releases share the latest date, the last one in vendor order is picked.
#[instrument(skip_all, fields(threshold = %threshold))]
pub fn select_latest_newer_than(records: &[ReleaseRecord], threshold: DateTime<Utc>) -> Result<Option<&ReleaseRecord>> {
    let mut latest: Option<(DateTime<Utc>, &ReleaseRecord)> = None;
    for record in records {
        let released_at = record.released_at()?;
        if released_at <= threshold {
            tracing::trace!("Skipping {} released at {released_at}", record.download_version);
            continue;
        }
        if latest.is_none_or(|(best, _)| released_at >= best) {
            latest = Some((released_at, record));
        }
    }
    Ok(latest.map(|(_, record)| record))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{errors::AppError, utils::parse_release_date};

    fn release(version: &str, date: &str) -> ReleaseRecord {
        ReleaseRecord {
            download_version: version.into(),
            download_description: format!("Release {version}"),
            download_url: format!("https://download.example.com/{version}.zip"),
            download_release: date.into(),
            download_file: format!("{version}.zip"),
        }
    }

    fn date(value: &str) -> DateTime<Utc> {
        parse_release_date(value).unwrap()
    }

    #[test]
    fn test_nothing_newer() {
        let records = vec![release("A", "2023-10-01"), release("B", "2024-01-01")];
        let selected = select_latest_newer_than(&records, date("2024-01-01")).unwrap();
        assert_eq!(selected, None);
    }

    #[test]
    fn test_empty_list() {
        let selected = select_latest_newer_than(&[], date("2024-01-01")).unwrap();
        assert_eq!(selected, None);
    }

    #[test]
    fn test_picks_newest_of_newer() {
        let records = vec![
            release("7E79v1A0", "2024-01-01"),
            release("7E79v1A2", "2024-06-15"),
            release("7E79v1A1", "2024-03-20"),
        ];
        let selected = select_latest_newer_than(&records, date("2024-01-01")).unwrap();
        assert_eq!(selected.map(|r| r.download_version.as_str()), Some("7E79v1A2"));
    }

    #[test]
    fn test_strictly_newer_only() {
        let records = vec![release("A", "2024-01-01")];
        let selected = select_latest_newer_than(&records, date("2024-01-01T00:00:00Z")).unwrap();
        assert_eq!(selected, None);
    }

    #[test]
    fn test_ties_pick_last_in_order() {
        let records = vec![release("first", "2024-06-15"), release("second", "2024-06-15")];
        let selected = select_latest_newer_than(&records, date("2024-01-01")).unwrap();
        assert_eq!(selected.map(|r| r.download_version.as_str()), Some("second"));
    }

    #[test]
    fn test_malformed_date_fails() {
        let records = vec![release("A", "2024-06-15"), release("B", "someday")];
        let res = select_latest_newer_than(&records, date("2024-01-01"));
        assert!(matches!(res, Err(AppError::DateParse(v)) if v == "someday"));
    }
}
