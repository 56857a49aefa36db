//! Shared test utilities for the integration suites.

#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDateTime;
use medtrack::{MedTrack, NewTestDefinition, NewTestResult, TIMESTAMP_FORMAT};
use tempfile::TempDir;

/// Wall clock used by every test store: 2024-06-01 12:00.
pub fn fixed_now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-06-01 12:00", TIMESTAMP_FORMAT).unwrap()
}

/// A store in its own temp directory.
pub struct TestDb {
    pub dir: TempDir,
    pub db: MedTrack,
}

impl TestDb {
    pub fn catalog_path(&self) -> PathBuf {
        self.dir.path().join("medicalTest.txt")
    }

    pub fn records_path(&self) -> PathBuf {
        self.dir.path().join("medicalRecord.txt")
    }

    pub fn catalog_text(&self) -> String {
        std::fs::read_to_string(self.catalog_path()).unwrap_or_default()
    }

    pub fn records_text(&self) -> String {
        std::fs::read_to_string(self.records_path()).unwrap_or_default()
    }

    pub fn write_catalog(&self, text: &str) {
        std::fs::write(self.catalog_path(), text).unwrap();
    }

    pub fn write_records(&self, text: &str) {
        std::fs::write(self.records_path(), text).unwrap();
    }

    /// Reopen the same files read-only.
    pub fn read_only(&self) -> MedTrack {
        MedTrack::builder()
            .catalog_path(self.catalog_path())
            .records_path(self.records_path())
            .read_only()
            .clock(fixed_now)
            .open()
            .unwrap()
    }
}

/// Empty store with the fixed clock.
pub fn create_db() -> TestDb {
    let dir = TempDir::new().unwrap();
    let db = MedTrack::builder()
        .catalog_path(dir.path().join("medicalTest.txt"))
        .records_path(dir.path().join("medicalRecord.txt"))
        .clock(fixed_now)
        .open()
        .unwrap();
    TestDb { dir, db }
}

/// Store with HGB, LDL and BGT in the catalog.
pub fn create_seeded_db() -> TestDb {
    let t = create_db();
    for (name, range, unit, turnaround) in [
        ("hgb", "> 13.8, < 17.2", "g/dL", "00-04-00"),
        ("ldl", "< 100", "mg/dL", "01-00-00"),
        ("bgt", ">= 70, <= 99", "mg/dL", "00-02-30"),
    ] {
        t.db.catalog.add(definition(name, range, unit, turnaround)).unwrap();
    }
    t
}

pub fn definition(name: &str, range: &str, unit: &str, turnaround: &str) -> NewTestDefinition {
    NewTestDefinition {
        name: name.to_string(),
        normal_range: range.to_string(),
        result_unit: unit.to_string(),
        turnaround: turnaround.to_string(),
    }
}

pub fn pending(patient_id: &str, test: &str, at: &str, value: &str) -> NewTestResult {
    NewTestResult {
        patient_id: patient_id.to_string(),
        test_name: test.to_string(),
        test_date_time: at.to_string(),
        result_value: value.to_string(),
        result_unit: "mg/dL".to_string(),
        status: "Pending".to_string(),
        results_date_time: None,
    }
}

pub fn completed(patient_id: &str, test: &str, at: &str, value: &str, done: &str) -> NewTestResult {
    NewTestResult {
        status: "Completed".to_string(),
        results_date_time: Some(done.to_string()),
        ..pending(patient_id, test, at, value)
    }
}
