//! Catalog Tests
//!
//! Adding, listing and updating test definitions through `db.catalog`.

use crate::common::*;
use medtrack::{DefinitionPatch, Turnaround};

// ============================================================================
// Add / list
// ============================================================================

#[test]
fn definitions_round_trip_through_file() {
    let t = create_seeded_db();

    let defs = t.db.catalog.list().unwrap();
    assert_eq!(defs.len(), 3);
    assert_eq!(defs[0].name, "HGB");
    assert_eq!(defs[0].normal_range, "> 13.8, < 17.2");
    assert_eq!(defs[0].result_unit, "g/dL");
    assert_eq!(defs[0].turnaround, Turnaround::new(0, 4, 0).unwrap());
    assert_eq!(defs[2].turnaround, Turnaround::new(0, 2, 30).unwrap());

    assert_eq!(
        t.catalog_text(),
        "HGB, > 13.8, < 17.2, g/dL, 00-04-00\n\
         LDL, < 100, mg/dL, 01-00-00\n\
         BGT, >= 70, <= 99, mg/dL, 00-02-30\n"
    );
}

#[test]
fn add_rejects_invalid_definitions() {
    let t = create_seeded_db();
    let before = t.catalog_text();

    for bad in [
        definition("", "< 1", "u", "00-00-10"),
        definition("12345", "< 1", "u", "00-00-10"),
        definition("ldl", "< 1", "u", "00-00-10"),
        definition("NEW", "", "u", "00-00-10"),
        definition("NEW", "__import__('os')", "u", "00-00-10"),
        definition("NEW", "< 1", "", "00-00-10"),
        definition("NEW", "< 1", "u", "32-00-00"),
        definition("NEW", "< 1", "u", "00-24-00"),
        definition("NEW", "< 1", "u", "00-00-60"),
        definition("NEW", "< 1", "u", "1-2-3"),
    ] {
        let err = t.db.catalog.add(bad).unwrap_err();
        assert!(err.is_validation(), "expected validation error, got {}", err);
    }
    assert_eq!(t.catalog_text(), before);
}

#[test]
fn duplicate_check_is_exact() {
    let t = create_seeded_db();
    // Contains "LDL" as a substring, but is a different name.
    let added = t.db.catalog.add(definition("vldl", "< 30", "mg/dL", "01-00-00"));
    assert_eq!(added.unwrap().name, "VLDL");
}

#[test]
fn get_ignores_case() {
    let t = create_seeded_db();
    assert!(t.db.catalog.get("Hgb").unwrap().is_some());
    assert!(t.db.catalog.get("XYZ").unwrap().is_none());
}

// ============================================================================
// Update
// ============================================================================

#[test]
fn update_second_of_three_changes_only_unit() {
    let t = create_seeded_db();
    let before = t.db.catalog.list().unwrap();

    let patch = DefinitionPatch::from_inputs("", "", "mmol/L", "");
    let updated = t.db.catalog.update(2, patch).unwrap();

    assert_eq!(updated.name, before[1].name);
    assert_eq!(updated.normal_range, before[1].normal_range);
    assert_eq!(updated.turnaround, before[1].turnaround);
    assert_eq!(updated.result_unit, "mmol/L");

    let after = t.db.catalog.list().unwrap();
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], updated);
    assert_eq!(after[2], before[2]);
}

#[test]
fn update_index_out_of_range_is_not_found() {
    let t = create_seeded_db();
    let patch = DefinitionPatch::from_inputs("", "", "x", "");
    assert!(t.db.catalog.update(0, patch.clone()).unwrap_err().is_not_found());
    assert!(t.db.catalog.update(4, patch).unwrap_err().is_not_found());
}

#[test]
fn update_revalidates_turnaround() {
    let t = create_seeded_db();
    let before = t.catalog_text();
    let patch = DefinitionPatch::from_inputs("", "", "", "00-99-00");
    assert!(t.db.catalog.update(1, patch).unwrap_err().is_validation());
    assert_eq!(t.catalog_text(), before);
}

#[test]
fn read_only_store_refuses_catalog_writes() {
    let t = create_seeded_db();
    let ro = t.read_only();
    assert!(ro.is_read_only());

    let err = ro
        .catalog
        .add(definition("NEW", "< 1", "u", "00-00-10"))
        .unwrap_err();
    assert!(err.is_read_only());
    let err = ro
        .catalog
        .update(1, DefinitionPatch::from_inputs("", "", "x", ""))
        .unwrap_err();
    assert!(err.is_read_only());

    assert_eq!(ro.catalog.list().unwrap().len(), 3);
}

#[test]
fn normal_range_is_checked_through_catalog() {
    let t = create_seeded_db();
    assert!(t.db.catalog.evaluate_normal_range("hgb", 15.0).unwrap());
    assert!(!t.db.catalog.evaluate_normal_range("HGB", 20.0).unwrap());
    assert!(t.db.catalog.evaluate_normal_range("LDL", 50.0).unwrap());
    assert!(t
        .db
        .catalog
        .evaluate_normal_range("XYZ", 1.0)
        .unwrap_err()
        .is_not_found());
}
