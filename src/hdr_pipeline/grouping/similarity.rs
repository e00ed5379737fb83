//! Fingerprint-based grouping
//!
//! Two policies: connected components of the "distance within threshold"
//! graph, and time-sorted sequential bands that also require hash
//! similarity to the band's first image.

use std::path::PathBuf;
use std::time::Duration;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::hdr_pipeline::common::Diagnostic;
use crate::hdr_pipeline::fingerprint::{Fingerprint, average_hash};
use crate::hdr_pipeline::grouping::timestamp::TimestampSource;
use crate::hdr_pipeline::grouping::types::{Group, GroupingOutput};
use crate::hdr_pipeline::raster::ImageCodec;

#[instrument(skip(paths, codec), fields(count = paths.len()))]
pub fn group_by_hash<C: ImageCodec + ?Sized>(
    paths: &[PathBuf],
    percent: f64,
    codec: &C,
) -> GroupingOutput {
    let (hashed, diagnostics) = fingerprint_all(paths, codec);

    let mut sets = DisjointSet::new(hashed.len());
    for i in 0..hashed.len() {
        for j in (i + 1)..hashed.len() {
            if hashed[i].1.distance_percent(&hashed[j].1) <= percent {
                sets.union(i, j);
            }
        }
    }

    // Components come out in order of their first member.
    let mut root_to_group: Vec<Option<usize>> = vec![None; hashed.len()];
    let mut groups: Vec<Group> = Vec::new();
    for (i, &(index, _)) in hashed.iter().enumerate() {
        let root = sets.find(i);
        let slot = *root_to_group[root].get_or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(paths[index].clone());
    }

    GroupingOutput {
        groups,
        diagnostics,
    }
}

#[instrument(skip(paths, codec, timestamps), fields(count = paths.len()))]
pub fn group_by_time_and_hash<C, T>(
    paths: &[PathBuf],
    threshold: Duration,
    percent: f64,
    codec: &C,
    timestamps: &T,
) -> GroupingOutput
where
    C: ImageCodec + ?Sized,
    T: TimestampSource + ?Sized,
{
    let mut timed: Vec<_> = paths
        .iter()
        .zip(timestamps.timestamps(paths))
        .filter_map(|(path, time)| time.map(|t| (path.clone(), t)))
        .collect();
    timed.sort_by_key(|&(_, t)| t);

    let sorted: Vec<PathBuf> = timed.iter().map(|(p, _)| p.clone()).collect();
    let (hashed, diagnostics) = fingerprint_all(&sorted, codec);

    let threshold_secs = threshold.as_secs_f64();
    let mut groups = Vec::new();
    let mut current: Group = Vec::new();
    let mut anchor: Option<(chrono::NaiveDateTime, Fingerprint)> = None;

    for (index, hash) in hashed {
        let (path, time) = timed[index].clone();
        let joins = anchor.is_some_and(|(anchor_time, anchor_hash)| {
            let gap = (time - anchor_time).num_milliseconds() as f64 / 1000.0;
            gap <= threshold_secs && hash.distance_percent(&anchor_hash) <= percent
        });

        if !joins {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
            anchor = Some((time, hash));
        }
        current.push(path);
    }

    if !current.is_empty() {
        groups.push(current);
    }

    GroupingOutput {
        groups,
        diagnostics,
    }
}

/// Decodes and hashes every path, dropping the ones that fail to decode.
/// Survivors are returned as (index into `paths`, hash), in input order.
fn fingerprint_all<C: ImageCodec + ?Sized>(
    paths: &[PathBuf],
    codec: &C,
) -> (Vec<(usize, Fingerprint)>, Vec<Diagnostic>) {
    let results: Vec<_> = paths
        .par_iter()
        .map(|path| codec.decode(path).map(|raster| average_hash(&raster)))
        .collect();

    let mut diagnostics = Vec::new();
    let hashed = paths
        .iter()
        .zip(results)
        .enumerate()
        .filter_map(|(index, (path, result))| match result {
            Ok(hash) => {
                debug!("{} -> {}", path.display(), hash);
                Some((index, hash))
            }
            Err(e) => {
                diagnostics.push(Diagnostic::skipped_path(path, e.to_string()));
                None
            }
        })
        .collect();

    (hashed, diagnostics)
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Keep the lower index as root.
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}
