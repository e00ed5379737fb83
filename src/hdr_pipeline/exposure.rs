//! Exposure module
//!
//! Selects the AEB-tagged frames of a group and recovers their exposure
//! times from metadata.

mod filter;
mod parse;

#[cfg(test)]
mod tests;

pub use filter::{
    ExposureRecord, ExposureSelection, SUPPORTED_EXTENSIONS, exposure_times_for, filter_aeb,
    find_aeb_images, is_aeb_keyword, reference_exposure,
};
pub use parse::parse_exposure_time;
