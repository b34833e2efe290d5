use std::fs;

use dashboard_engine::{AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn first_save_creates_nested_settings_dir() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("conf").join("dashboard");

    let written = AtomicFileWriter::new(&dir)
        .write("dashboard.ron", "(message_limit: 50)")
        .unwrap();
    assert_eq!(written, dir.join("dashboard.ron"));
    assert_eq!(fs::read_to_string(written).unwrap(), "(message_limit: 50)");
}

#[test]
fn resave_leaves_only_the_settings_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path());

    writer.write("dashboard.ron", "(poll_interval_secs: 5)").unwrap();
    let path = writer.write("dashboard.ron", "(poll_interval_secs: 9)").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "(poll_interval_secs: 9)");
    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec!["dashboard.ron"]);
}

#[test]
fn file_in_place_of_dir_is_reported() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("conf");
    fs::write(&blocker, "x").unwrap();

    let err = AtomicFileWriter::new(&blocker)
        .write("dashboard.ron", "()")
        .unwrap_err();
    assert!(matches!(err, PersistError::NotADirectory { .. }));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
