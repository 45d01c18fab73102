use autodep_fs::{NormalizedPath, io};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("node_modules/alpha/package.json"));

    io::write_atomic(&path, b"{}").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "{}");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("test.txt");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    assert_eq!(fs::read_to_string(&file_path).unwrap(), "updated");
}

#[test]
fn test_write_atomic_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("test.txt"));

    io::write_text(&path, "one").unwrap();
    io::write_text(&path, "two").unwrap();

    let entries: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["test.txt".to_string()]);
}

#[test]
fn test_read_text_nonexistent_file_is_not_found() {
    let path = NormalizedPath::new("/nonexistent/file.txt");
    let err = io::read_text(&path).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_json_round_trip_preserves_fields() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("package.json"));
    let doc = json!({"name": "alpha", "version": "1.0.0", "main": "index.js"});

    io::write_json(&path, &doc).unwrap();
    let loaded: serde_json::Value = io::read_json(&path).unwrap();

    assert_eq!(loaded, doc);
}

#[test]
fn test_read_json_malformed_is_parse_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("package.json");
    fs::write(&file_path, "{ not json").unwrap();

    let result: autodep_fs::Result<serde_json::Value> =
        io::read_json(&NormalizedPath::new(&file_path));

    assert!(matches!(
        result,
        Err(autodep_fs::Error::ConfigParse { ref format, .. }) if format == "JSON"
    ));
}
