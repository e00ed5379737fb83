use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::hdr_pipeline::common::DiagnosticKind;
use crate::hdr_pipeline::exposure::{
    exposure_times_for, filter_aeb, find_aeb_images, parse_exposure_time, reference_exposure,
};
use crate::hdr_pipeline::metadata::{MetadataAdapter, MetadataError, MetadataMap};
use crate::hdr_pipeline::raster::Raster;

struct MockAdapter {
    should_fail: bool,
    /// file name -> (keywords, exposure)
    tags: HashMap<String, (String, String)>,
    calls: Arc<Mutex<usize>>,
}

impl MockAdapter {
    fn new(entries: &[(&str, &str, &str)]) -> Self {
        Self {
            should_fail: false,
            tags: entries
                .iter()
                .map(|&(name, kw, exp)| (name.to_string(), (kw.to_string(), exp.to_string())))
                .collect(),
            calls: Arc::new(Mutex::new(0)),
        }
    }
}

impl MetadataAdapter for MockAdapter {
    fn read_tags(&self, paths: &[PathBuf], tags: &[&str]) -> Result<MetadataMap, MetadataError> {
        *self.calls.lock().unwrap() += 1;
        if self.should_fail {
            return Err(MetadataError::ToolUnavailable("exiftool".to_string()));
        }
        let mut map = MetadataMap::new();
        for path in paths {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            let Some((kw, exp)) = self.tags.get(&name) else {
                continue;
            };
            let mut values = HashMap::new();
            for &tag in tags {
                let value = match tag {
                    "XPKeywords" => kw.clone(),
                    "ExposureTime" => exp.clone(),
                    _ => String::new(),
                };
                values.insert(tag.to_string(), value);
            }
            map.insert(path.clone(), values);
        }
        Ok(map)
    }
}

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

#[test]
fn test_parse_exposure_time() {
    assert_eq!(parse_exposure_time("1/250"), Some(0.004));
    assert_eq!(parse_exposure_time("0.01"), Some(0.01));
    assert_eq!(parse_exposure_time(" 2 "), Some(2.0));
    assert_eq!(parse_exposure_time("abc"), None);
    assert_eq!(parse_exposure_time(""), None);
    assert_eq!(parse_exposure_time("0"), None);
    assert_eq!(parse_exposure_time("-1/60"), None);
    assert_eq!(parse_exposure_time("1/0"), None);
    assert_eq!(parse_exposure_time("inf"), None);
}

#[test]
fn test_filter_aeb_selects_tagged_frames() {
    let adapter = MockAdapter::new(&[
        ("a.jpg", "AEB", "1/250"),
        ("b.jpg", "holiday", "1/60"),
        ("c.jpg", "hdr; aeb", "0.01"),
        ("d.jpg", "Aeb", "abc"),
    ]);
    let selection = filter_aeb(&paths(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"]), &adapter);

    assert_eq!(selection.paths, paths(&["a.jpg", "c.jpg"]));
    assert_eq!(selection.exposure_times, vec![0.004, 0.01]);
    assert_eq!(selection.paths.len(), selection.exposure_times.len());
    assert_eq!(selection.diagnostics.len(), 1);
    assert_eq!(selection.diagnostics[0].subject, "d.jpg");
    assert_eq!(*adapter.calls.lock().unwrap(), 1);
}

#[test]
fn test_filter_aeb_adapter_failure() {
    let mut adapter = MockAdapter::new(&[("a.jpg", "AEB", "1/250")]);
    adapter.should_fail = true;
    let selection = filter_aeb(&paths(&["a.jpg"]), &adapter);

    assert!(selection.is_empty());
    assert!(selection.exposure_times.is_empty());
    assert_eq!(selection.diagnostics.len(), 1);
    assert_eq!(selection.diagnostics[0].kind, DiagnosticKind::Skipped);
}

#[test]
fn test_filter_aeb_missing_metadata() {
    let adapter = MockAdapter::new(&[]);
    let selection = filter_aeb(&paths(&["unknown.jpg"]), &adapter);
    assert!(selection.is_empty());
    assert!(selection.diagnostics.is_empty());
}

#[test]
fn test_exposure_times_ignore_keywords() {
    let adapter = MockAdapter::new(&[("a.jpg", "", "1/2"), ("b.jpg", "AEB", "1/4")]);
    let selection = exposure_times_for(&paths(&["b.jpg", "a.jpg"]), &adapter);
    assert_eq!(selection.paths, paths(&["b.jpg", "a.jpg"]));
    assert_eq!(selection.exposure_times, vec![0.25, 0.5]);
}

#[test]
fn test_find_aeb_images() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.JPG", "a.png", "c.tiff", "notes.txt", "d.jpeg"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }
    let adapter = MockAdapter::new(&[
        ("b.JPG", "AEB", ""),
        ("a.png", "aeb", ""),
        ("c.tiff", "landscape", ""),
        ("notes.txt", "AEB", ""),
    ]);

    let found = find_aeb_images(dir.path(), &adapter).unwrap();
    assert_eq!(found, vec![dir.path().join("a.png"), dir.path().join("b.JPG")]);
}

#[test]
fn test_find_aeb_images_missing_dir() {
    let adapter = MockAdapter::new(&[]);
    assert!(find_aeb_images(std::path::Path::new("/nonexistent/aeb"), &adapter).is_err());
}

#[test]
fn test_reference_exposure_is_median() {
    let rasters: Vec<Raster> = [10u8, 20, 30]
        .iter()
        .map(|&v| Raster::filled(2, 2, [v; 3]))
        .collect();
    let reference = reference_exposure(&rasters, &[1.0 / 30.0, 1.0 / 125.0, 1.0 / 60.0]).unwrap();
    assert_eq!(reference.pixel(0, 0), [30; 3]);

    assert!(reference_exposure(&[], &[]).is_none());
    assert!(reference_exposure(&rasters, &[1.0]).is_none());
}
