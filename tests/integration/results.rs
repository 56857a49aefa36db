//! Result Record Tests
//!
//! Adding and updating patient results through `db.results`.

use crate::common::*;
use medtrack::{ResultPatch, Status};

#[test]
fn add_writes_empty_trailing_field() {
    let t = create_seeded_db();
    t.db
        .results
        .add(pending("1234567", "ldl", "2024-05-01 08:00", "90"))
        .unwrap();
    assert_eq!(
        t.records_text(),
        "1234567: LDL, 2024-05-01 08:00, 90.0, mg/dL, Pending, \n"
    );
}

#[test]
fn add_unknown_test_leaves_file_unchanged() {
    let t = create_seeded_db();
    t.db
        .results
        .add(pending("1234567", "ldl", "2024-05-01 08:00", "90"))
        .unwrap();
    let before = t.records_text();

    let err = t
        .db
        .results
        .add(pending("1234567", "xyz", "2024-05-01 08:00", "90"))
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(t.records_text(), before);
}

#[test]
fn add_rejects_future_timestamps() {
    let t = create_seeded_db();
    let err = t
        .db
        .results
        .add(pending("1234567", "ldl", "2024-06-01 12:01", "90"))
        .unwrap_err();
    assert!(err.is_validation());

    let err = t
        .db
        .results
        .add(completed(
            "1234567",
            "ldl",
            "2024-05-01 08:00",
            "90",
            "2024-07-01 08:00",
        ))
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(t.records_text(), "");
}

#[test]
fn completed_result_requires_results_time() {
    let t = create_seeded_db();
    let mut candidate = completed("1234567", "hgb", "2024-05-01 08:00", "15", "");
    assert!(t.db.results.add(candidate.clone()).unwrap_err().is_validation());

    candidate.results_date_time = None;
    assert!(t.db.results.add(candidate).unwrap_err().is_validation());
}

#[test]
fn update_applies_to_every_match_in_place() {
    let t = create_seeded_db();
    for (id, test, at) in [
        ("1234567", "hgb", "2024-05-01 08:00"),
        ("7654321", "hgb", "2024-05-01 09:00"),
        ("1234567", "hgb", "2024-05-02 08:00"),
    ] {
        t.db.results.add(pending(id, test, at, "15")).unwrap();
    }

    let patch = ResultPatch {
        status: Some("Completed".into()),
        results_date_time: Some("2024-05-03 08:00".into()),
        ..Default::default()
    };
    let outcome = t.db.results.update("1234567", "HGB", patch).unwrap();
    assert_eq!(outcome.updated, 2);

    let rows = t.db.results.list().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].status, Status::Completed);
    assert_eq!(rows[1].status, Status::Pending);
    assert_eq!(rows[1].patient_id.as_str(), "7654321");
    assert_eq!(rows[2].status, Status::Completed);
}

#[test]
fn update_no_match_is_not_found() {
    let t = create_seeded_db();
    t.db
        .results
        .add(pending("1234567", "ldl", "2024-05-01 08:00", "90"))
        .unwrap();
    let err = t
        .db
        .results
        .update("7654321", "LDL", ResultPatch::default())
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn update_skips_and_preserves_malformed_rows() {
    let t = create_seeded_db();
    t.write_records(
        "garbage without separator\n\
         1234567: LDL, 2024-05-01 08:00, 90.0, mg/dL, Pending, \n\
         1234567: LDL, yesterday, 90.0, mg/dL, Pending, \n",
    );

    let patch = ResultPatch {
        result_value: Some("110".into()),
        ..Default::default()
    };
    let outcome = t.db.results.update("1234567", "ldl", patch).unwrap();
    assert_eq!(outcome.updated, 1);
    let lines: Vec<usize> = outcome.notices.iter().map(|n| n.line_number).collect();
    assert_eq!(lines, vec![1, 3]);

    assert_eq!(
        t.records_text(),
        "garbage without separator\n\
         1234567: LDL, 2024-05-01 08:00, 110.0, mg/dL, Pending, \n\
         1234567: LDL, yesterday, 90.0, mg/dL, Pending, \n"
    );
}

#[test]
fn update_with_callback_error_writes_nothing() {
    let t = create_seeded_db();
    t.db
        .results
        .add(pending("1234567", "ldl", "2024-05-01 08:00", "90"))
        .unwrap();
    let before = t.records_text();

    let err = t
        .db
        .results
        .update_with("1234567", "ldl", |_| {
            Err(medtrack_core::Error::validation("input", "cancelled"))
        })
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(t.records_text(), before);
}

#[test]
fn read_only_store_refuses_result_writes() {
    let t = create_seeded_db();
    let ro = t.read_only();
    let err = ro
        .results
        .add(pending("1234567", "ldl", "2024-05-01 08:00", "90"))
        .unwrap_err();
    assert!(err.is_read_only());
    assert_eq!(t.records_text(), "");
}

#[test]
fn update_preserves_undecodable_row_bytes() {
    let t = create_seeded_db();
    let bad: &[u8] = b"1234567: LDL, 2024-05-02 08:00, 95.0, \xB5g/dL, Pending, \n";
    let mut body = b"1234567: LDL, 2024-05-01 08:00, 90.0, mg/dL, Pending, \n".to_vec();
    body.extend_from_slice(bad);
    std::fs::write(t.records_path(), &body).unwrap();

    let patch = ResultPatch {
        result_value: Some("110".into()),
        ..Default::default()
    };
    let outcome = t.db.results.update("1234567", "LDL", patch).unwrap();
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.notices.len(), 1);

    let mut expected = b"1234567: LDL, 2024-05-01 08:00, 110.0, mg/dL, Pending, \n".to_vec();
    expected.extend_from_slice(bad);
    assert_eq!(std::fs::read(t.records_path()).unwrap(), expected);
}
