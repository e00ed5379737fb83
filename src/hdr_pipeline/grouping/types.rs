//! Grouping types and defaults

use std::path::PathBuf;
use std::time::Duration;

use crate::hdr_pipeline::common::Diagnostic;

/// Paths believed to form one exposure bracket, in processing order.
pub type Group = Vec<PathBuf>;

/// Largest capture-time gap inside one bracket.
pub const DEFAULT_TIME_THRESHOLD: Duration = Duration::from_secs(2);

/// Largest fingerprint distance, in percent, between members of one bracket.
pub const DEFAULT_HASH_THRESHOLD: f64 = 10.0;

/// Which timestamp of the open group a new image is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeAnchor {
    /// The first image of the group. A long burst is split into
    /// threshold-sized windows.
    #[default]
    First,
    /// The most recently added image. A burst stays together as long as
    /// consecutive gaps are small.
    Previous,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupingStrategy {
    /// Capture-time proximity only.
    Time { threshold: Duration },
    /// Connected components of the fingerprint similarity graph.
    Hash { percent: f64 },
    /// Time-sorted sequential bands, admitting an image only when it is
    /// close to the band's first image in both time and appearance.
    TimeAndHash { threshold: Duration, percent: f64 },
}

impl Default for GroupingStrategy {
    fn default() -> Self {
        GroupingStrategy::Time {
            threshold: DEFAULT_TIME_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupingOutput {
    pub groups: Vec<Group>,
    pub diagnostics: Vec<Diagnostic>,
}
