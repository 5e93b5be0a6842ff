//! Range queries over the sharded directory tree, returned in strictly
//! ascending sequence order.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use super::event::Event;
use super::layout::{sequence_from_filename, topic_root};
use crate::error::StoreResult;
use crate::scope::Scope;

#[derive(Debug, Clone, Default)]
pub struct ReadQuery {
    /// Only events with sequence strictly greater than this.
    pub since_sequence: Option<u64>,
    pub date: Option<NaiveDate>,
    pub limit: Option<usize>,
}

/// Traverses `<topicRoot>/<date>/<bucket>/*.json` in lexicographic
/// (date, bucket, sequence) order, which coincides with sequence order
/// for a single writer within a day and across days alike.
pub fn get_events(
    data_dir: &Path,
    scope: &Scope,
    topic: &str,
    query: &ReadQuery,
) -> StoreResult<Vec<Event>> {
    if query.limit == Some(0) {
        return Ok(Vec::new());
    }

    let root = topic_root(data_dir, scope, topic);
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut date_dirs: Vec<String> = read_dir_names(&root)?;
    date_dirs.sort();

    let mut results = Vec::new();
    for date_name in date_dirs {
        if let Some(filter) = query.date {
            match NaiveDate::parse_from_str(&date_name, "%Y-%m-%d") {
                Ok(d) if d == filter => {}
                _ => continue,
            }
        }
        let date_path = root.join(&date_name);
        let mut bucket_dirs: Vec<String> = read_dir_names(&date_path)?;
        bucket_dirs.sort();

        for bucket_name in bucket_dirs {
            let bucket_path = date_path.join(&bucket_name);
            let mut files: Vec<(u64, std::path::PathBuf)> = fs::read_dir(&bucket_path)?
                .filter_map(|e| e.ok())
                .filter_map(|e| {
                    let name = e.file_name().to_string_lossy().into_owned();
                    sequence_from_filename(&name).map(|seq| (seq, e.path()))
                })
                .collect();
            files.sort_by_key(|(seq, _)| *seq);

            for (seq, path) in files {
                if let Some(since) = query.since_sequence {
                    if seq <= since {
                        continue;
                    }
                }
                let bytes = fs::read(&path)?;
                let event: Event = serde_json::from_slice(&bytes).map_err(|e| {
                    crate::error::StoreError::Internal(format!(
                        "corrupt event file {}: {e}",
                        path.display()
                    ))
                })?;
                results.push(event);
                if let Some(limit) = query.limit {
                    if results.len() >= limit {
                        return Ok(results);
                    }
                }
            }
        }
    }

    Ok(results)
}

fn read_dir_names(dir: &Path) -> StoreResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}
