//! Capture-time resolution

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};
use tracing::{debug, trace};

use crate::hdr_pipeline::metadata::{MetadataAdapter, TAG_DATE_TIME_ORIGINAL, tag_value};

const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Resolves capture timestamps for a batch of paths.
///
/// The result is index-aligned with `paths`; `None` marks a path whose time
/// could not be determined.
pub trait TimestampSource: Sync {
    fn timestamps(&self, paths: &[PathBuf]) -> Vec<Option<NaiveDateTime>>;
}

/// `DateTimeOriginal` from the metadata adapter, falling back to the file's
/// modification time.
pub struct MetadataTimestamps<'a, M: MetadataAdapter + ?Sized> {
    adapter: &'a M,
}

impl<'a, M: MetadataAdapter + ?Sized> MetadataTimestamps<'a, M> {
    pub fn new(adapter: &'a M) -> Self {
        Self { adapter }
    }
}

impl<M: MetadataAdapter + ?Sized> TimestampSource for MetadataTimestamps<'_, M> {
    fn timestamps(&self, paths: &[PathBuf]) -> Vec<Option<NaiveDateTime>> {
        let metadata = match self.adapter.read_tags(paths, &[TAG_DATE_TIME_ORIGINAL]) {
            Ok(map) => Some(map),
            Err(e) => {
                debug!("Capture times unavailable, using file times: {}", e);
                None
            }
        };

        paths
            .iter()
            .map(|path| {
                metadata
                    .as_ref()
                    .and_then(|map| parse_exif_datetime(tag_value(map, path, TAG_DATE_TIME_ORIGINAL)))
                    .or_else(|| modified_time(path))
            })
            .collect()
    }
}

/// Parses `YYYY:MM:DD HH:MM:SS`, ignoring sub-second and zone suffixes.
pub fn parse_exif_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    let head = value.get(..19)?;
    NaiveDateTime::parse_from_str(head, EXIF_DATETIME_FORMAT).ok()
}

fn modified_time(path: &Path) -> Option<NaiveDateTime> {
    match std::fs::metadata(path).and_then(|m| m.modified()) {
        Ok(time) => Some(DateTime::<Local>::from(time).naive_local()),
        Err(e) => {
            trace!("No timestamp for {}: {}", path.display(), e);
            None
        }
    }
}
