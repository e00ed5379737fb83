//! Native metadata adapter using the kamadak-exif library.
//!
//! Values are rendered the way `exiftool` prints them so the rest of the
//! pipeline parses a single textual form: exposure as `num/denom`, dates as
//! `YYYY:MM:DD HH:MM:SS` and Windows XP keywords decoded from UCS-2.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use exif::{Context, Exif, In, Tag, Value};
use tracing::debug;

use crate::hdr_pipeline::metadata::adapter::{
    MetadataAdapter, MetadataError, MetadataMap, TAG_DATE_TIME_ORIGINAL, TAG_EXPOSURE_TIME,
    TAG_KEYWORDS, TagValues,
};

/// Windows XP keyword tag (0x9C9E) in IFD0.
const XP_KEYWORDS: Tag = Tag(Context::Tiff, 0x9c9e);

pub struct ExifMetadataReader;

impl MetadataAdapter for ExifMetadataReader {
    fn read_tags(&self, paths: &[PathBuf], tags: &[&str]) -> Result<MetadataMap, MetadataError> {
        let mut map = MetadataMap::with_capacity(paths.len());

        for path in paths {
            // Unreadable files or files without EXIF yield empty values.
            let exif = read_exif(path);
            let values: TagValues = tags
                .iter()
                .map(|&tag| {
                    let value = exif
                        .as_ref()
                        .and_then(|exif| render_tag(exif, tag))
                        .unwrap_or_default();
                    (tag.to_string(), value)
                })
                .collect();
            map.insert(path.clone(), values);
        }

        Ok(map)
    }
}

fn read_exif(path: &Path) -> Option<Exif> {
    let file = File::open(path).ok()?;
    match exif::Reader::new().read_from_container(&mut BufReader::new(file)) {
        Ok(exif) => Some(exif),
        Err(e) => {
            debug!("No EXIF data in {}: {}", path.display(), e);
            None
        }
    }
}

fn render_tag(exif: &Exif, tag: &str) -> Option<String> {
    match tag {
        TAG_KEYWORDS => {
            let field = exif.get_field(XP_KEYWORDS, In::PRIMARY)?;
            match field.value {
                Value::Byte(ref bytes) | Value::Undefined(ref bytes, _) => {
                    Some(decode_ucs2(bytes))
                }
                _ => None,
            }
        }
        TAG_EXPOSURE_TIME => {
            let field = exif.get_field(Tag::ExposureTime, In::PRIMARY)?;
            match field.value {
                Value::Rational(ref v) if !v.is_empty() => {
                    Some(format!("{}/{}", v[0].num, v[0].denom))
                }
                _ => None,
            }
        }
        TAG_DATE_TIME_ORIGINAL => {
            let field = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)?;
            match field.value {
                Value::Ascii(ref v) if !v.is_empty() => {
                    Some(String::from_utf8_lossy(&v[0]).trim().to_string())
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// XPKeywords is little-endian UCS-2 with a trailing NUL.
pub(crate) fn decode_ucs2(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .take_while(|&u| u != 0)
        .collect();
    String::from_utf16_lossy(&units)
}
