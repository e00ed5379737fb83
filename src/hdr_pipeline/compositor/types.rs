//! Compositor configuration and results

use std::path::PathBuf;

use crate::hdr_pipeline::alignment::DEFAULT_DEGHOST_THRESHOLD;
use crate::hdr_pipeline::common::Diagnostic;
use crate::hdr_pipeline::grouping::GroupingStrategy;
use crate::hdr_pipeline::merge::MergeOptions;
use crate::hdr_pipeline::radiance::TiffCompression;
use crate::hdr_pipeline::tonemap::ToneParameters;

/// Configuration for batch HDR compositing
#[derive(Debug, Clone)]
pub struct CompositorConfig {
    /// How input photographs are partitioned into brackets
    pub grouping: GroupingStrategy,
    /// Register frames before merging
    pub align: bool,
    /// Suppress moving objects before merging
    pub deghost: bool,
    pub deghost_threshold: u32,
    pub tone: ToneParameters,
    /// Process groups concurrently
    pub parallel: bool,
    /// Groups with fewer usable exposures are skipped
    pub min_exposures: usize,
    /// Extension of the tonemapped output, which also selects its format
    pub output_extension: String,
    /// Also keep the floating-point radiance map as TIFF
    pub write_radiance: bool,
    pub compression: TiffCompression,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            grouping: GroupingStrategy::default(),
            align: false,
            deghost: false,
            deghost_threshold: DEFAULT_DEGHOST_THRESHOLD,
            tone: ToneParameters::default(),
            parallel: true,
            min_exposures: 1,
            output_extension: "jpg".to_string(),
            write_radiance: false,
            compression: TiffCompression::default(),
        }
    }
}

impl CompositorConfig {
    pub fn builder() -> CompositorConfigBuilder {
        CompositorConfigBuilder::default()
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            align: self.align,
            deghost: self.deghost,
            deghost_threshold: self.deghost_threshold,
        }
    }
}

/// Builder for CompositorConfig
#[derive(Default)]
pub struct CompositorConfigBuilder {
    grouping: Option<GroupingStrategy>,
    align: Option<bool>,
    deghost: Option<bool>,
    deghost_threshold: Option<u32>,
    tone: Option<ToneParameters>,
    parallel: Option<bool>,
    min_exposures: Option<usize>,
    output_extension: Option<String>,
    write_radiance: Option<bool>,
    compression: Option<TiffCompression>,
}

impl CompositorConfigBuilder {
    pub fn grouping(mut self, grouping: GroupingStrategy) -> Self {
        self.grouping = Some(grouping);
        self
    }

    pub fn align(mut self, enable: bool) -> Self {
        self.align = Some(enable);
        self
    }

    pub fn deghost(mut self, enable: bool) -> Self {
        self.deghost = Some(enable);
        self
    }

    pub fn deghost_threshold(mut self, threshold: u32) -> Self {
        self.deghost_threshold = Some(threshold);
        self
    }

    pub fn tone(mut self, tone: ToneParameters) -> Self {
        self.tone = Some(tone);
        self
    }

    pub fn parallel(mut self, enable: bool) -> Self {
        self.parallel = Some(enable);
        self
    }

    pub fn min_exposures(mut self, count: usize) -> Self {
        self.min_exposures = Some(count);
        self
    }

    pub fn output_extension(mut self, extension: impl Into<String>) -> Self {
        self.output_extension = Some(extension.into());
        self
    }

    pub fn write_radiance(mut self, enable: bool) -> Self {
        self.write_radiance = Some(enable);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn build(self) -> CompositorConfig {
        let default = CompositorConfig::default();
        CompositorConfig {
            grouping: self.grouping.unwrap_or(default.grouping),
            align: self.align.unwrap_or(default.align),
            deghost: self.deghost.unwrap_or(default.deghost),
            deghost_threshold: self.deghost_threshold.unwrap_or(default.deghost_threshold),
            tone: self.tone.unwrap_or(default.tone),
            parallel: self.parallel.unwrap_or(default.parallel),
            min_exposures: self.min_exposures.unwrap_or(default.min_exposures),
            output_extension: self.output_extension.unwrap_or(default.output_extension),
            write_radiance: self.write_radiance.unwrap_or(default.write_radiance),
            compression: self.compression.unwrap_or(default.compression),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupStatus {
    /// The tonemapped image was written.
    Written {
        output: PathBuf,
        radiance: Option<PathBuf>,
        exposures: usize,
    },
    /// Nothing usable in the group; see the diagnostics.
    Skipped(String),
    /// Merge or tonemap rejected the group.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct GroupResult {
    /// 1-based position of the group in the batch
    pub index: usize,
    pub inputs: Vec<PathBuf>,
    pub status: GroupStatus,
    pub diagnostics: Vec<Diagnostic>,
}

impl GroupResult {
    pub fn output(&self) -> Option<&PathBuf> {
        match &self.status {
            GroupStatus::Written { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default)]
pub struct CompositeReport {
    pub groups: Vec<GroupResult>,
    /// Diagnostics raised before groups were formed
    pub diagnostics: Vec<Diagnostic>,
}

impl CompositeReport {
    pub fn outputs(&self) -> Vec<&PathBuf> {
        self.groups.iter().filter_map(GroupResult::output).collect()
    }

    pub fn written(&self) -> usize {
        self.outputs().len()
    }
}
