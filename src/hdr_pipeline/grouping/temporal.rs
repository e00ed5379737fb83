//! Capture-time grouping
//!
//! Paths are taken in input order. A path joins the open group while its
//! timestamp is within the threshold of the group's anchor; otherwise the
//! group is closed and the path starts a new one.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDateTime;
use tracing::trace;

use crate::hdr_pipeline::grouping::timestamp::TimestampSource;
use crate::hdr_pipeline::grouping::types::{Group, TimeAnchor};

pub fn group_by_time<T: TimestampSource + ?Sized>(
    paths: &[PathBuf],
    threshold: Duration,
    timestamps: &T,
) -> Vec<Group> {
    group_by_time_anchored(paths, threshold, TimeAnchor::First, timestamps)
}

pub fn group_by_time_anchored<T: TimestampSource + ?Sized>(
    paths: &[PathBuf],
    threshold: Duration,
    anchor: TimeAnchor,
    timestamps: &T,
) -> Vec<Group> {
    if paths.is_empty() {
        return Vec::new();
    }

    let threshold_secs = threshold.as_secs_f64();
    let mut groups = Vec::new();
    let mut current: Group = Vec::new();
    let mut anchor_time: Option<NaiveDateTime> = None;

    for (path, time) in paths.iter().zip(timestamps.timestamps(paths)) {
        let Some(time) = time else {
            trace!("Dropping {} (no timestamp)", path.display());
            continue;
        };

        if let Some(start) = anchor_time {
            let gap = (time - start).num_milliseconds() as f64 / 1000.0;
            if gap > threshold_secs {
                groups.push(std::mem::take(&mut current));
                anchor_time = Some(time);
            } else if anchor == TimeAnchor::Previous {
                anchor_time = Some(time);
            }
        } else {
            anchor_time = Some(time);
        }

        current.push(path.clone());
    }

    if !current.is_empty() {
        groups.push(current);
    }
    groups
}
