//! Property Tests
//!
//! Invariants that must hold for arbitrary operator input.

use crate::common::*;
use medtrack::{evaluate_normal_range, FilterCriteria, NormalRange};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn two_sided_range_matches_bounds(lo in -1000i32..1000, width in 1i32..1000, v in -3000i32..3000) {
        let hi = lo + width;
        let expr = format!("> {}, < {}", lo, hi);
        let value = f64::from(v);
        let expected = value > f64::from(lo) && value < f64::from(hi);
        prop_assert_eq!(evaluate_normal_range(value, &expr).unwrap(), expected);
    }

    #[test]
    fn range_display_reparses(lo in -1000i32..1000, width in 0i32..1000) {
        let expr = format!(">= {}, <= {}", lo, lo + width);
        let range: NormalRange = expr.parse().unwrap();
        let again: NormalRange = range.to_string().parse().unwrap();
        prop_assert_eq!(range, again);
    }

    #[test]
    fn filter_by_patient_returns_only_that_patient(ids in proptest::collection::vec(0usize..3, 1..8)) {
        let patients = ["1000000", "2000000", "3000000"];
        let t = create_seeded_db();
        for (i, &p) in ids.iter().enumerate() {
            let at = format!("2024-05-{:02} 08:00", i + 1);
            t.db.results.add(pending(patients[p], "ldl", &at, "90")).unwrap();
        }

        let wanted = patients[ids[0]];
        let criteria = FilterCriteria::new().patient_id(wanted.parse().unwrap());
        let outcome = t.db.reports.filter(&criteria).unwrap();

        let expected = ids.iter().filter(|&&p| patients[p] == wanted).count();
        prop_assert_eq!(outcome.len(), expected);
        prop_assert!(outcome.records.iter().all(|r| r.patient_id.as_str() == wanted));
    }
}
