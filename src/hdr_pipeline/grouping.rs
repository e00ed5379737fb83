//! Grouping module
//!
//! Partitions an unordered set of photographs into exposure-bracket groups,
//! by capture time, by perceptual similarity, or by both.

pub mod similarity;
pub mod temporal;
mod timestamp;
pub mod types;


pub use similarity::{group_by_hash, group_by_time_and_hash};
pub use temporal::{group_by_time, group_by_time_anchored};
pub use timestamp::{MetadataTimestamps, TimestampSource, parse_exif_datetime};
pub use types::{
    DEFAULT_HASH_THRESHOLD, DEFAULT_TIME_THRESHOLD, Group, GroupingOutput, GroupingStrategy,
    TimeAnchor,
};

use std::path::PathBuf;

use tracing::info;

use crate::hdr_pipeline::raster::ImageCodec;

/// Runs the policy selected by `strategy`.
pub fn group_paths<C, T>(
    paths: &[PathBuf],
    strategy: &GroupingStrategy,
    codec: &C,
    timestamps: &T,
) -> GroupingOutput
where
    C: ImageCodec + ?Sized,
    T: TimestampSource + ?Sized,
{
    let output = match *strategy {
        GroupingStrategy::Time { threshold } => GroupingOutput {
            groups: group_by_time(paths, threshold, timestamps),
            diagnostics: Vec::new(),
        },
        GroupingStrategy::Hash { percent } => group_by_hash(paths, percent, codec),
        GroupingStrategy::TimeAndHash { threshold, percent } => {
            group_by_time_and_hash(paths, threshold, percent, codec, timestamps)
        }
    };

    info!(
        "Grouped {} images into {} groups ({:?})",
        paths.len(),
        output.groups.len(),
        strategy
    );
    output
}
