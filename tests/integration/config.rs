//! Configuration Tests
//!
//! Opening a store from a `medtrack.toml` file.

use crate::common::*;
use medtrack::MedTrack;
use tempfile::TempDir;

#[test]
fn config_file_paths_resolve_next_to_the_file() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();
    let config = dir.path().join("medtrack.toml");
    std::fs::write(
        &config,
        "catalog_path = \"data/tests.txt\"\nrecords_path = \"data/records.txt\"\n",
    )
    .unwrap();

    let db = MedTrack::builder()
        .config_file(&config)
        .unwrap()
        .clock(fixed_now)
        .open()
        .unwrap();
    assert_eq!(db.catalog_path(), dir.path().join("data/tests.txt"));

    db.catalog
        .add(definition("ldl", "< 100", "mg/dL", "01-00-00"))
        .unwrap();
    let written = std::fs::read_to_string(dir.path().join("data/tests.txt")).unwrap();
    assert_eq!(written, "LDL, < 100, mg/dL, 01-00-00\n");
}

#[test]
fn explicit_path_overrides_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("medtrack.toml");
    std::fs::write(&config, "records_path = \"from-config.txt\"\n").unwrap();

    let db = MedTrack::builder()
        .config_file(&config)
        .unwrap()
        .records_path(dir.path().join("from-flag.txt"))
        .open()
        .unwrap();
    assert_eq!(db.records_path(), dir.path().join("from-flag.txt"));
}

#[test]
fn read_only_config_refuses_writes() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("medtrack.toml");
    std::fs::write(
        &config,
        "access_mode = \"read-only\"\ncatalog_path = \"tests.txt\"\n",
    )
    .unwrap();

    let db = MedTrack::builder().config_file(&config).unwrap().open().unwrap();
    assert!(db.is_read_only());
    let err = db
        .catalog
        .add(definition("ldl", "< 100", "mg/dL", "01-00-00"))
        .unwrap_err();
    assert!(err.is_read_only());
    assert!(!dir.path().join("tests.txt").exists());
}

#[test]
fn bad_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("medtrack.toml");
    std::fs::write(&config, "access_mode = \"sometimes\"\n").unwrap();
    let err = MedTrack::builder().config_file(&config).err().unwrap();
    assert!(matches!(err, medtrack::Error::Config(_)));
}
