//! Metadata adapter that shells out to `exiftool`.
//!
//! All paths are sent in a single `exiftool -json` invocation. The JSON
//! output carries a `SourceFile` field per entry, which is matched back to
//! the requested paths.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::hdr_pipeline::metadata::adapter::{MetadataAdapter, MetadataError, MetadataMap, TagValues};

pub struct ExifToolAdapter {
    program: String,
}

impl Default for ExifToolAdapter {
    fn default() -> Self {
        Self::new("exiftool")
    }
}

impl ExifToolAdapter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl MetadataAdapter for ExifToolAdapter {
    #[instrument(skip(self, paths, tags), fields(count = paths.len()))]
    fn read_tags(&self, paths: &[PathBuf], tags: &[&str]) -> Result<MetadataMap, MetadataError> {
        if paths.is_empty() {
            return Ok(MetadataMap::new());
        }

        let output = Command::new(&self.program)
            .arg("-json")
            .args(tags.iter().map(|t| format!("-{}", t)))
            .args(paths)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => MetadataError::ToolUnavailable(self.program.clone()),
                _ => MetadataError::Io(e),
            })?;

        // exiftool exits non-zero when some files lack the tags but still
        // prints JSON for the rest, so only empty output is a failure.
        if output.stdout.is_empty() {
            return Err(MetadataError::ToolFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("exiftool returned {} bytes", stdout.len());
        parse_exiftool_json(&stdout, paths, tags)
    }
}

/// Converts exiftool's JSON array into a [`MetadataMap`].
///
/// Requested paths that exiftool did not report get empty values.
pub(crate) fn parse_exiftool_json(
    json: &str,
    paths: &[PathBuf],
    tags: &[&str],
) -> Result<MetadataMap, MetadataError> {
    let entries: Vec<Value> =
        serde_json::from_str(json).map_err(|e| MetadataError::InvalidOutput(e.to_string()))?;

    let mut map: MetadataMap = paths
        .iter()
        .map(|p| {
            let empty: TagValues = tags.iter().map(|t| (t.to_string(), String::new())).collect();
            (p.clone(), empty)
        })
        .collect();

    for entry in &entries {
        let Some(source) = entry.get("SourceFile").and_then(Value::as_str) else {
            continue;
        };
        let values = map.entry(PathBuf::from(source)).or_default();
        for &tag in tags {
            let value = entry.get(tag).map(render_json_value).unwrap_or_default();
            values.insert(tag.to_string(), value);
        }
    }

    Ok(map)
}

fn render_json_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(render_json_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
