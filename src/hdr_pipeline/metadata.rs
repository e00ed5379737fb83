//! Metadata module
//!
//! Tag lookup for source images. The pipeline only talks to the
//! [`MetadataAdapter`] trait; two implementations are provided, a native
//! EXIF reader and a wrapper around the external `exiftool` program.

mod adapter;
mod exif_reader;
mod exiftool;

#[cfg(test)]
mod tests;

pub use adapter::{
    MetadataAdapter, MetadataError, MetadataMap, TAG_DATE_TIME_ORIGINAL, TAG_EXPOSURE_TIME,
    TAG_KEYWORDS, TagValues, tag_value,
};
pub use exif_reader::ExifMetadataReader;
pub use exiftool::ExifToolAdapter;
