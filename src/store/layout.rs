//! Sharded on-disk layout:
//! `<dataDir>/<scope?>/<topic>/<YYYY-MM-DD>/<NNNN>/<topic>-<sequence>.json`
//! where `<NNNN>` = `floor(sequence/1000)` zero-padded to 4 digits.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};

use crate::scope::Scope;

pub fn bucket_of(sequence: u64) -> String {
    format!("{:04}", sequence / 1000)
}

pub fn date_dir_name(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

pub fn topic_root(data_dir: &Path, scope: &Scope, topic: &str) -> PathBuf {
    match scope.dir_prefix() {
        Some(prefix) => data_dir.join(prefix).join(topic),
        None => data_dir.join(topic),
    }
}

pub fn event_path(
    data_dir: &Path,
    scope: &Scope,
    topic: &str,
    sequence: u64,
    timestamp: &DateTime<Utc>,
) -> PathBuf {
    topic_root(data_dir, scope, topic)
        .join(date_dir_name(timestamp))
        .join(bucket_of(sequence))
        .join(format!("{topic}-{sequence}.json"))
}

/// Parse the sequence number out of a filename of the form
/// `<topic>-<sequence>.json`.
pub fn sequence_from_filename(file_name: &str) -> Option<u64> {
    let stem = file_name.strip_suffix(".json")?;
    let (_, seq) = stem.rsplit_once('-')?;
    seq.parse().ok()
}

/// Parse a `YYYY-MM-DD` date filter; returns `None` (and the caller treats
/// the filter as absent) if the string doesn't parse, since the HTTP
/// layer validates the query parameter before it reaches here.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
