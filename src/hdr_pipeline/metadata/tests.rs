use std::path::PathBuf;

use crate::hdr_pipeline::metadata::exif_reader::decode_ucs2;
use crate::hdr_pipeline::metadata::exiftool::parse_exiftool_json;
use crate::hdr_pipeline::metadata::{
    ExifMetadataReader, ExifToolAdapter, MetadataAdapter, MetadataError, TAG_EXPOSURE_TIME,
    TAG_KEYWORDS, tag_value,
};

#[test]
fn test_parse_exiftool_json() {
    let json = r#"[
        {"SourceFile": "a.jpg", "XPKeywords": "AEB", "ExposureTime": "1/250"},
        {"SourceFile": "b.jpg", "ExposureTime": 0.5}
    ]"#;
    let paths = vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")];
    let map = parse_exiftool_json(json, &paths, &[TAG_KEYWORDS, TAG_EXPOSURE_TIME]).unwrap();

    assert_eq!(tag_value(&map, &paths[0], TAG_KEYWORDS), "AEB");
    assert_eq!(tag_value(&map, &paths[0], TAG_EXPOSURE_TIME), "1/250");
    assert_eq!(tag_value(&map, &paths[1], TAG_KEYWORDS), "");
    assert_eq!(tag_value(&map, &paths[1], TAG_EXPOSURE_TIME), "0.5");
}

#[test]
fn test_parse_exiftool_json_fills_missing_paths() {
    let paths = vec![PathBuf::from("missing.jpg")];
    let map = parse_exiftool_json("[]", &paths, &[TAG_KEYWORDS]).unwrap();
    assert_eq!(tag_value(&map, &paths[0], TAG_KEYWORDS), "");
}

#[test]
fn test_parse_exiftool_json_rejects_garbage() {
    let result = parse_exiftool_json("not json", &[], &[TAG_KEYWORDS]);
    assert!(matches!(result, Err(MetadataError::InvalidOutput(_))));
}

#[test]
fn test_keyword_list_is_joined() {
    let json = r#"[{"SourceFile": "a.jpg", "XPKeywords": ["holiday", "AEB"]}]"#;
    let paths = vec![PathBuf::from("a.jpg")];
    let map = parse_exiftool_json(json, &paths, &[TAG_KEYWORDS]).unwrap();
    assert_eq!(tag_value(&map, &paths[0], TAG_KEYWORDS), "holiday, AEB");
}

#[test]
fn test_missing_tool_is_reported() {
    let adapter = ExifToolAdapter::new("definitely-not-an-installed-exiftool");
    let result = adapter.read_tags(&[PathBuf::from("a.jpg")], &[TAG_KEYWORDS]);
    assert!(matches!(result, Err(MetadataError::ToolUnavailable(_))));
}

#[test]
fn test_empty_batch_does_not_spawn() {
    let adapter = ExifToolAdapter::new("definitely-not-an-installed-exiftool");
    let map = adapter.read_tags(&[], &[TAG_KEYWORDS]).unwrap();
    assert!(map.is_empty());
}

#[test]
fn test_exif_reader_tolerates_unreadable_files() {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("plain.jpg");
    std::fs::write(&plain, b"not an image").unwrap();
    let paths = vec![plain, dir.path().join("missing.jpg")];

    let map = ExifMetadataReader
        .read_tags(&paths, &[TAG_KEYWORDS, TAG_EXPOSURE_TIME])
        .unwrap();

    assert_eq!(map.len(), 2);
    for path in &paths {
        assert_eq!(tag_value(&map, path, TAG_KEYWORDS), "");
        assert_eq!(tag_value(&map, path, TAG_EXPOSURE_TIME), "");
    }
}

#[test]
fn test_decode_ucs2_keywords() {
    let bytes: Vec<u8> = "aeb;hdr\0"
        .encode_utf16()
        .flat_map(|u| u.to_le_bytes())
        .collect();
    assert_eq!(decode_ucs2(&bytes), "aeb;hdr");
}
