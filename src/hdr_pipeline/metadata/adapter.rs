use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const TAG_KEYWORDS: &str = "XPKeywords";
pub const TAG_EXPOSURE_TIME: &str = "ExposureTime";
pub const TAG_DATE_TIME_ORIGINAL: &str = "DateTimeOriginal";

/// Tag name -> string value for one file.
pub type TagValues = HashMap<String, String>;

/// File path -> tag values.
pub type MetadataMap = HashMap<PathBuf, TagValues>;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Metadata tool unavailable: {0}")]
    ToolUnavailable(String),

    #[error("Metadata tool failed: {0}")]
    ToolFailed(String),

    #[error("Metadata tool returned invalid output: {0}")]
    InvalidOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads named metadata tags for a batch of files in one round trip.
///
/// Every requested path should appear in the result; absent tags read as an
/// empty string. A whole-batch failure is a [`MetadataError`], which callers
/// treat as "no metadata available".
pub trait MetadataAdapter: Sync {
    fn read_tags(&self, paths: &[PathBuf], tags: &[&str]) -> Result<MetadataMap, MetadataError>;
}

/// Looks up one tag, treating a missing path or tag as empty.
pub fn tag_value<'a>(map: &'a MetadataMap, path: &Path, tag: &str) -> &'a str {
    map.get(path)
        .and_then(|values| values.get(tag))
        .map(String::as_str)
        .unwrap_or("")
}
