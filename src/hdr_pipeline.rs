//! HDR pipeline module
//!
//! Groups bracketed exposures, merges each bracket into a radiance map and
//! tonemaps it into a displayable image. Every stage is a plain function over
//! borrowed buffers; I/O goes through the [`MetadataAdapter`],
//! [`ImageCodec`] and [`RadianceWriter`] traits.

pub mod alignment;
pub mod common;
pub mod compositor;
pub mod exposure;
pub mod fingerprint;
pub mod grouping;
pub mod merge;
pub mod metadata;
pub mod radiance;
pub mod raster;
pub mod tonemap;

pub use common::{Diagnostic, DiagnosticKind, PipelineError, Result};

pub use raster::{ImageCodec, RadianceMap, Raster, StandardImageCodec};

pub use metadata::{ExifMetadataReader, ExifToolAdapter, MetadataAdapter, MetadataError};

pub use fingerprint::{Fingerprint, average_hash};

pub use grouping::{
    Group, GroupingOutput, GroupingStrategy, TimeAnchor, TimestampSource, group_by_hash,
    group_by_time, group_by_time_and_hash, group_paths,
};

pub use exposure::{
    ExposureRecord, ExposureSelection, exposure_times_for, filter_aeb, find_aeb_images,
    parse_exposure_time, reference_exposure,
};

pub use alignment::{align, deghost};

pub use merge::{MergeOptions, MergeOutput, merge};

pub use tonemap::{ToneOperator, ToneParameters, tonemap};

pub use radiance::{RadianceWriter, StandardRadianceWriter, TiffCompression};

pub use compositor::{
    CompositeReport, CompositorConfig, CompositorConfigBuilder, GroupResult, GroupStatus,
    HdrCompositor,
};
