//! Filter and Report Tests

use crate::common::*;
use medtrack::{FilterCriteria, Status, TurnaroundRange};

fn seeded_with_results() -> TestDb {
    let t = create_seeded_db();
    let rows = [
        completed("1234567", "hgb", "2024-05-01 08:00", "15", "2024-05-01 10:00"),
        pending("1234567", "hgb", "2024-05-10 08:00", "19.5"),
        completed("7654321", "ldl", "2024-05-03 08:00", "130", "2024-05-04 08:00"),
        pending("7654321", "bgt", "2024-05-20 08:00", "70"),
        completed("1111111", "bgt", "2024-05-21 08:00", "65", "2024-05-21 08:45"),
    ];
    for row in rows {
        t.db.results.add(row).unwrap();
    }
    t
}

#[test]
fn no_criteria_returns_every_row() {
    let t = seeded_with_results();
    let outcome = t.db.reports.filter(&FilterCriteria::new()).unwrap();
    assert_eq!(outcome.len(), 5);
    assert_eq!(outcome.values, vec![15.0, 19.5, 130.0, 70.0, 65.0]);
}

#[test]
fn patient_filter_returns_only_that_patient() {
    let t = seeded_with_results();
    let criteria = FilterCriteria::new().patient_id("7654321".parse().unwrap());
    let outcome = t.db.reports.filter(&criteria).unwrap();
    assert_eq!(outcome.len(), 2);
    assert!(outcome
        .records
        .iter()
        .all(|r| r.patient_id.as_str() == "7654321"));
}

#[test]
fn abnormal_filter_uses_catalog_ranges() {
    let t = seeded_with_results();
    let criteria = FilterCriteria::new().abnormal(true);
    let outcome = t.db.reports.filter(&criteria).unwrap();
    // 15 in HGB range, 70 on the BGT lower bound.
    assert_eq!(outcome.values, vec![19.5, 130.0, 65.0]);
}

#[test]
fn date_range_bounds_are_inclusive_days() {
    let t = seeded_with_results();
    let range = t.db.reports.date_range("2024-05-03", "2024-05-20").unwrap();
    let outcome = t
        .db
        .reports
        .filter(&FilterCriteria::new().date_range(range))
        .unwrap();
    assert_eq!(outcome.values, vec![19.5, 130.0, 70.0]);
}

#[test]
fn date_range_rejects_future_and_inverted_bounds() {
    let t = seeded_with_results();
    assert!(t
        .db
        .reports
        .date_range("2024-05-01", "2024-06-02")
        .unwrap_err()
        .is_validation());
    assert!(t
        .db
        .reports
        .date_range("2024-05-02", "2024-05-01")
        .unwrap_err()
        .is_validation());
}

#[test]
fn status_and_turnaround_combine() {
    let t = seeded_with_results();
    let criteria = FilterCriteria::new()
        .status(Status::Completed)
        .turnaround_range(TurnaroundRange::new(30, 180).unwrap());
    let outcome = t.db.reports.filter(&criteria).unwrap();
    assert_eq!(outcome.values, vec![15.0, 65.0]);
    assert_eq!(outcome.turnarounds, vec![120, 45]);

    let report = t.db.reports.summary(&criteria).unwrap();
    assert_eq!(report.count, 2);
    let tat = report.turnarounds.unwrap();
    assert_eq!((tat.min, tat.max, tat.mean), (45.0, 120.0, 82.5));
}

#[test]
fn summary_of_nothing_reports_no_data() {
    let t = create_db();
    let report = t.db.reports.summary(&FilterCriteria::new()).unwrap();
    assert_eq!(report.count, 0);
    assert!(report.values.is_none());
    assert!(report.turnarounds.is_none());
    let text = report.to_string();
    assert_eq!(text.matches("no data").count(), 2);
}

#[test]
fn malformed_rows_are_skipped_with_notice() {
    let t = seeded_with_results();
    let mut text = t.records_text();
    text.push_str("9999999: HGB, 2024-05-01 08:00, high, g/dL, Pending, \n");
    t.write_records(&text);

    let outcome = t.db.reports.filter(&FilterCriteria::new()).unwrap();
    assert_eq!(outcome.len(), 5);
    assert_eq!(outcome.notices.len(), 1);
    assert_eq!(outcome.notices[0].line_number, 6);
}

#[test]
fn undecodable_row_is_skipped_with_notice() {
    let t = create_seeded_db();
    let mut body = b"1234567: LDL, 2024-05-01 08:00, 90.0, mg/dL, Pending, \n".to_vec();
    body.extend_from_slice(b"1234567: LDL, 2024-05-02 08:00, 95.0, \xB5g/dL, Pending, \n");
    std::fs::write(t.records_path(), &body).unwrap();

    let outcome = t.db.reports.filter(&FilterCriteria::new()).unwrap();
    assert_eq!(outcome.values, vec![90.0]);
    assert_eq!(outcome.notices.len(), 1);
    assert_eq!(outcome.notices[0].line_number, 2);
}
