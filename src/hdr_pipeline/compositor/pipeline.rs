use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, info_span, instrument, warn};

use crate::hdr_pipeline::common::{Diagnostic, PipelineError, Result};
use crate::hdr_pipeline::compositor::types::{
    CompositeReport, CompositorConfig, GroupResult, GroupStatus,
};
use crate::hdr_pipeline::exposure::{filter_aeb, reference_exposure};
use crate::hdr_pipeline::grouping::{GroupingOutput, MetadataTimestamps, group_paths};
use crate::hdr_pipeline::merge::merge;
use crate::hdr_pipeline::metadata::{ExifMetadataReader, MetadataAdapter};
use crate::hdr_pipeline::radiance::{RadianceWriter, StandardRadianceWriter};
use crate::hdr_pipeline::raster::{ImageCodec, Raster, StandardImageCodec};
use crate::hdr_pipeline::tonemap::tonemap;

pub struct HdrCompositor<M: MetadataAdapter, C: ImageCodec, W: RadianceWriter> {
    metadata: M,
    codec: C,
    writer: W,
    config: CompositorConfig,
}

impl HdrCompositor<ExifMetadataReader, StandardImageCodec, StandardRadianceWriter> {
    pub fn new(config: CompositorConfig) -> Self {
        Self {
            metadata: ExifMetadataReader,
            codec: StandardImageCodec,
            writer: StandardRadianceWriter,
            config,
        }
    }
}

impl<M: MetadataAdapter, C: ImageCodec, W: RadianceWriter> HdrCompositor<M, C, W> {
    pub fn with_custom(metadata: M, codec: C, writer: W, config: CompositorConfig) -> Self {
        Self {
            metadata,
            codec,
            writer,
            config,
        }
    }

    /// Partitions `paths` with the configured grouping strategy.
    pub fn group(&self, paths: &[PathBuf]) -> GroupingOutput {
        let timestamps = MetadataTimestamps::new(&self.metadata);
        group_paths(paths, &self.config.grouping, &self.codec, &timestamps)
    }

    /// Groups only the AEB-tagged paths, or every path when none is tagged.
    pub fn group_uploads(&self, paths: &[PathBuf]) -> GroupingOutput {
        let selection = filter_aeb(paths, &self.metadata);
        let candidates = if selection.is_empty() {
            info!("No AEB images found, grouping all {} images", paths.len());
            paths
        } else {
            &selection.paths[..]
        };

        let mut output = self.group(candidates);
        let mut diagnostics = selection.diagnostics;
        diagnostics.append(&mut output.diagnostics);
        output.diagnostics = diagnostics;
        output
    }

    /// Groups `paths` and writes one HDR image per group into `output_dir`.
    #[instrument(skip(self, paths), fields(count = paths.len()))]
    pub fn process(&self, paths: &[PathBuf], output_dir: &Path) -> Result<CompositeReport> {
        std::fs::create_dir_all(output_dir).map_err(|e| {
            PipelineError::OutputWriteError(format!("{}: {}", output_dir.display(), e))
        })?;

        let grouping = self.group(paths);
        let indexed: Vec<(usize, &Vec<PathBuf>)> = grouping
            .groups
            .iter()
            .enumerate()
            .map(|(i, group)| (i + 1, group))
            .collect();

        let process_one = |&(index, group): &(usize, &Vec<PathBuf>)| {
            let output = output_dir.join(self.output_name(index));
            self.process_group(index, group, &output)
        };

        let groups: Vec<GroupResult> = if self.config.parallel {
            indexed.par_iter().map(process_one).collect()
        } else {
            indexed.iter().map(process_one).collect()
        };

        let report = CompositeReport {
            groups,
            diagnostics: grouping.diagnostics,
        };
        info!(
            "Wrote {} HDR images from {} groups",
            report.written(),
            report.groups.len()
        );
        Ok(report)
    }

    /// `hdr_image_<index>_<operator>.<ext>`
    pub fn output_name(&self, index: usize) -> String {
        format!(
            "hdr_image_{}_{}.{}",
            index, self.config.tone.operator, self.config.output_extension
        )
    }

    /// Runs one bracket through the pipeline and writes it to `output`.
    pub fn process_group(&self, index: usize, group: &[PathBuf], output: &Path) -> GroupResult {
        let _span = info_span!("group", index).entered();
        let mut diagnostics = Vec::new();
        let status = self.run_group(index, group, output, &mut diagnostics);

        if let GroupStatus::Failed(ref message) = status {
            warn!("Group {} failed: {}", index, message);
        }
        GroupResult {
            index,
            inputs: group.to_vec(),
            status,
            diagnostics,
        }
    }

    fn run_group(
        &self,
        index: usize,
        group: &[PathBuf],
        output: &Path,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> GroupStatus {
        let label = format!("group {}", index);

        let selection = filter_aeb(group, &self.metadata);
        diagnostics.extend(selection.diagnostics);
        if selection.paths.is_empty() {
            let message = "no AEB-tagged images".to_string();
            diagnostics.push(Diagnostic::skipped(&label, &message));
            return GroupStatus::Skipped(message);
        }

        let (rasters, times) = self.decode_all(&selection.paths, &selection.exposure_times, diagnostics);

        let required = self.config.min_exposures.max(1);
        if rasters.len() < required {
            let message = format!("{} usable exposures, need {}", rasters.len(), required);
            diagnostics.push(Diagnostic::skipped(&label, &message));
            return GroupStatus::Skipped(message);
        }

        let merged = match merge(&rasters, &times, self.config.merge_options()) {
            Ok(merged) => merged,
            Err(e) => return GroupStatus::Failed(e.to_string()),
        };
        diagnostics.extend(merged.diagnostics);

        let reference = reference_exposure(&rasters, &times);
        let ldr = match tonemap(&merged.radiance, reference, &self.config.tone) {
            Ok(ldr) => ldr,
            Err(e) => return GroupStatus::Failed(e.to_string()),
        };

        if let Err(e) = self.codec.encode(&ldr, output) {
            let message = e.to_string();
            diagnostics.push(Diagnostic::skipped(&label, &message));
            return GroupStatus::Skipped(message);
        }
        info!("Saved {}", output.display());

        let radiance = if self.config.write_radiance {
            let path = output.with_file_name(format!("hdr_image_{}_radiance.tiff", index));
            match self
                .writer
                .write_radiance_file(&merged.radiance, &path, self.config.compression)
            {
                Ok(()) => Some(path),
                Err(e) => {
                    diagnostics.push(Diagnostic::warning(&label, e.to_string()));
                    None
                }
            }
        } else {
            None
        };

        GroupStatus::Written {
            output: output.to_path_buf(),
            radiance,
            exposures: rasters.len(),
        }
    }

    /// Decodes every path, dropping the ones that fail together with their
    /// exposure times.
    fn decode_all(
        &self,
        paths: &[PathBuf],
        exposure_times: &[f64],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> (Vec<Raster>, Vec<f64>) {
        paths
            .iter()
            .zip(exposure_times)
            .filter_map(|(path, &time)| match self.codec.decode(path) {
                Ok(raster) => Some((raster, time)),
                Err(e) => {
                    diagnostics.push(Diagnostic::skipped_path(path, e.to_string()));
                    None
                }
            })
            .unzip()
    }
}
