use std::fs;

use prospector_engine::{ensure_data_dir, AtomicFileWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_data_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("uploads");
    assert!(!new_dir.exists());
    ensure_data_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn rejects_a_file_where_the_dir_should_be() {
    let temp = TempDir::new().unwrap();
    let blocked = temp.path().join("uploads");
    fs::write(&blocked, "x").unwrap();
    assert!(ensure_data_dir(&blocked).is_err());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("results.csv", "hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "results.csv");
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = writer.write("results.csv", "world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
}

#[test]
fn write_bytes_round_trips_binary_content() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let bytes = [0u8, 159, 146, 150];
    let path = writer.write_bytes("blob.bin", &bytes).unwrap();
    assert_eq!(fs::read(path).unwrap(), bytes);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("results.csv", "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("results.csv").exists());
}
