//! Summary report over a filter outcome.

use std::fmt;

use serde::Serialize;

use crate::filter::FilterOutcome;

/// Minimum, maximum and mean of a non-empty list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stats {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
}

impl Stats {
    /// Compute stats, or `None` for an empty list.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let (&first, rest) = values.split_first()?;
        let (min, max, sum) = rest
            .iter()
            .fold((first, first, first), |(min, max, sum), &v| {
                (min.min(v), max.max(v), sum + v)
            });
        Some(Stats {
            min,
            max,
            mean: sum / values.len() as f64,
        })
    }
}

/// Counts and statistics for a set of filtered rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    /// Number of rows
    pub count: usize,
    /// The rows as stored
    pub rows: Vec<String>,
    /// Result value stats
    pub values: Option<Stats>,
    /// Turnaround stats, minutes; the mean is rounded to 2 decimal places
    pub turnarounds: Option<Stats>,
}

/// Summarize a filter outcome.
pub fn summarize(outcome: &FilterOutcome) -> SummaryReport {
    let turnarounds: Vec<f64> = outcome.turnarounds.iter().map(|&m| m as f64).collect();
    SummaryReport {
        count: outcome.rows.len(),
        rows: outcome.rows.clone(),
        values: Stats::from_values(&outcome.values),
        turnarounds: Stats::from_values(&turnarounds).map(|s| Stats {
            mean: round2(s.mean),
            ..s
        }),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Summary Report ---")?;
        writeln!(f, "Records: {}", self.count)?;
        for row in &self.rows {
            writeln!(f, "  {}", row)?;
        }

        writeln!(f)?;
        match &self.values {
            Some(s) => {
                writeln!(f, "Test values:")?;
                writeln!(f, "  min:  {}", s.min)?;
                writeln!(f, "  max:  {}", s.max)?;
                writeln!(f, "  mean: {}", s.mean)?;
            }
            None => writeln!(f, "Test values: no data")?,
        }

        writeln!(f)?;
        match &self.turnarounds {
            Some(s) => {
                writeln!(f, "Turnaround (minutes):")?;
                writeln!(f, "  min:  {}", s.min)?;
                writeln!(f, "  max:  {}", s.max)?;
                writeln!(f, "  mean: {:.2}", s.mean)?;
            }
            None => writeln!(f, "Turnaround (minutes): no data")?,
        }
        write!(f, "--- End of Summary Report ---")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(values: Vec<f64>, turnarounds: Vec<i64>) -> FilterOutcome {
        FilterOutcome {
            rows: values.iter().map(|v| format!("row {}", v)).collect(),
            values,
            turnarounds,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_outcome_reports_no_data() {
        let report = summarize(&FilterOutcome::default());
        assert_eq!(report.count, 0);
        assert!(report.values.is_none());
        assert!(report.turnarounds.is_none());

        let text = report.to_string();
        assert!(text.contains("Records: 0"));
        assert!(text.contains("Test values: no data"));
        assert!(text.contains("Turnaround (minutes): no data"));
    }

    #[test]
    fn test_value_stats() {
        let report = summarize(&outcome(vec![15.0, 20.0, 10.0], vec![]));
        assert_eq!(report.count, 3);
        let values = report.values.unwrap();
        assert_eq!(values.min, 10.0);
        assert_eq!(values.max, 20.0);
        assert_eq!(values.mean, 15.0);
        assert!(report.turnarounds.is_none());
    }

    #[test]
    fn test_turnaround_mean_rounded() {
        let report = summarize(&outcome(vec![1.0, 2.0, 3.0], vec![10, 10, 11]));
        let t = report.turnarounds.unwrap();
        assert_eq!(t.min, 10.0);
        assert_eq!(t.max, 11.0);
        assert_eq!(t.mean, 10.33);
        assert!(report.to_string().contains("mean: 10.33"));
    }

    #[test]
    fn test_single_value() {
        let stats = Stats::from_values(&[4.5]).unwrap();
        assert_eq!((stats.min, stats.max, stats.mean), (4.5, 4.5, 4.5));
        assert!(Stats::from_values(&[]).is_none());
    }
}
