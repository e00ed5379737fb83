use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::hdr_pipeline::common::{Diagnostic, Result};
use crate::hdr_pipeline::exposure::parse::parse_exposure_time;
use crate::hdr_pipeline::metadata::{
    MetadataAdapter, TAG_EXPOSURE_TIME, TAG_KEYWORDS, tag_value,
};
use crate::hdr_pipeline::raster::Raster;

/// File extensions considered when scanning a directory.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "tif", "tiff"];

const AEB_KEYWORD: &str = "aeb";

/// One frame with a usable exposure time.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureRecord {
    pub path: PathBuf,
    /// Seconds, always positive and finite.
    pub exposure_time: f64,
}

/// Frames selected for a merge. `paths` and `exposure_times` are always the
/// same length and index-aligned.
#[derive(Debug, Clone, Default)]
pub struct ExposureSelection {
    pub paths: Vec<PathBuf>,
    pub exposure_times: Vec<f64>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ExposureSelection {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn push(&mut self, record: ExposureRecord) {
        self.paths.push(record.path);
        self.exposure_times.push(record.exposure_time);
    }
}

pub fn is_aeb_keyword(keywords: &str) -> bool {
    keywords.to_lowercase().contains(AEB_KEYWORD)
}

/// Keeps the AEB-tagged paths that have a parseable exposure time.
#[instrument(skip_all, fields(count = paths.len()))]
pub fn filter_aeb<M: MetadataAdapter + ?Sized>(paths: &[PathBuf], adapter: &M) -> ExposureSelection {
    let selection = select(paths, adapter, true);
    info!(
        "Selected {} of {} images as AEB exposures",
        selection.len(),
        paths.len()
    );
    selection
}

/// Exposure times for every path, without the keyword requirement.
pub fn exposure_times_for<M: MetadataAdapter + ?Sized>(
    paths: &[PathBuf],
    adapter: &M,
) -> ExposureSelection {
    select(paths, adapter, false)
}

fn select<M: MetadataAdapter + ?Sized>(
    paths: &[PathBuf],
    adapter: &M,
    require_aeb: bool,
) -> ExposureSelection {
    let mut selection = ExposureSelection::default();
    if paths.is_empty() {
        return selection;
    }

    let metadata = match adapter.read_tags(paths, &[TAG_KEYWORDS, TAG_EXPOSURE_TIME]) {
        Ok(map) => map,
        Err(e) => {
            selection
                .diagnostics
                .push(Diagnostic::skipped(format!("{} images", paths.len()), e.to_string()));
            return selection;
        }
    };

    for path in paths {
        if require_aeb && !is_aeb_keyword(tag_value(&metadata, path, TAG_KEYWORDS)) {
            debug!("{} is not tagged AEB", path.display());
            continue;
        }

        let raw = tag_value(&metadata, path, TAG_EXPOSURE_TIME);
        match parse_exposure_time(raw) {
            Some(exposure_time) => selection.push(ExposureRecord {
                path: path.clone(),
                exposure_time,
            }),
            None => selection.diagnostics.push(Diagnostic::skipped_path(
                path,
                format!("could not parse exposure time {:?}", raw),
            )),
        }
    }

    selection
}

/// Lists the supported image files in `dir` that carry the AEB keyword,
/// sorted by file name.
pub fn find_aeb_images<M: MetadataAdapter + ?Sized>(dir: &Path, adapter: &M) -> Result<Vec<PathBuf>> {
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_supported_extension(path))
        .collect();
    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if candidates.is_empty() {
        return Ok(candidates);
    }

    let metadata = match adapter.read_tags(&candidates, &[TAG_KEYWORDS]) {
        Ok(map) => map,
        Err(e) => {
            warn!("Could not read keywords in {}: {}", dir.display(), e);
            return Ok(Vec::new());
        }
    };

    Ok(candidates
        .into_iter()
        .filter(|path| is_aeb_keyword(tag_value(&metadata, path, TAG_KEYWORDS)))
        .collect())
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// The frame with the median exposure time (upper median for even counts).
pub fn reference_exposure<'a>(rasters: &'a [Raster], exposure_times: &[f64]) -> Option<&'a Raster> {
    if rasters.is_empty() || rasters.len() != exposure_times.len() {
        return None;
    }

    let mut order: Vec<usize> = (0..rasters.len()).collect();
    order.sort_by(|&a, &b| exposure_times[a].total_cmp(&exposure_times[b]));
    rasters.get(order[order.len() / 2])
}
