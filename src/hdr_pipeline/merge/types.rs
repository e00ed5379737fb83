//! Merge options and results

use crate::hdr_pipeline::alignment::DEFAULT_DEGHOST_THRESHOLD;
use crate::hdr_pipeline::common::Diagnostic;
use crate::hdr_pipeline::raster::RadianceMap;

/// Pre-merge processing switches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeOptions {
    /// Register frames to the first one before merging.
    pub align: bool,
    /// Replace moving-object pixels with the reference frame.
    pub deghost: bool,
    pub deghost_threshold: u32,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            align: false,
            deghost: false,
            deghost_threshold: DEFAULT_DEGHOST_THRESHOLD,
        }
    }
}

impl MergeOptions {
    pub fn builder() -> MergeOptionsBuilder {
        MergeOptionsBuilder::default()
    }
}

#[derive(Default)]
pub struct MergeOptionsBuilder {
    align: Option<bool>,
    deghost: Option<bool>,
    deghost_threshold: Option<u32>,
}

impl MergeOptionsBuilder {
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

    pub fn build(self) -> MergeOptions {
        let default = MergeOptions::default();
        MergeOptions {
            align: self.align.unwrap_or(default.align),
            deghost: self.deghost.unwrap_or(default.deghost),
            deghost_threshold: self.deghost_threshold.unwrap_or(default.deghost_threshold),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MergeOutput {
    pub radiance: RadianceMap,
    /// Warnings raised while preparing the stack.
    pub diagnostics: Vec<Diagnostic>,
}
