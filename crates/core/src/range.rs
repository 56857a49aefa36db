//! Normal-range expressions
//!
//! A range is one or two comparisons against the measured value, joined by
//! `,` and implicitly ANDed: `> 13.8, < 17.2`, `< 100`, `>= 4.5`.
//!
//! Expressions are parsed into [`RangeTerm`]s and evaluated structurally.
//! Range text comes from a user-editable file and is never run as code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum number of comparisons in one expression.
pub const MAX_TERMS: usize = 2;

/// Comparison operator of a range term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `==`
    Equal,
}

impl Comparator {
    // Two-character operators first so `<=` is not read as `<`.
    const TOKENS: [(&'static str, Comparator); 5] = [
        ("<=", Comparator::LessOrEqual),
        (">=", Comparator::GreaterOrEqual),
        ("==", Comparator::Equal),
        ("<", Comparator::Less),
        (">", Comparator::Greater),
    ];

    /// Operator token as written in the catalog.
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Less => "<",
            Comparator::LessOrEqual => "<=",
            Comparator::Greater => ">",
            Comparator::GreaterOrEqual => ">=",
            Comparator::Equal => "==",
        }
    }

    /// Apply `value <op> bound`.
    pub fn holds(&self, value: f64, bound: f64) -> bool {
        match self {
            Comparator::Less => value < bound,
            Comparator::LessOrEqual => value <= bound,
            Comparator::Greater => value > bound,
            Comparator::GreaterOrEqual => value >= bound,
            Comparator::Equal => value == bound,
        }
    }
}

/// One `(operator, bound)` comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeTerm {
    /// Operator
    pub op: Comparator,
    /// Numeric bound
    pub bound: f64,
}

impl RangeTerm {
    /// Check whether `value` satisfies this term.
    pub fn matches(&self, value: f64) -> bool {
        self.op.holds(value, self.bound)
    }
}

impl FromStr for RangeTerm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let (op, rest) = Comparator::TOKENS
            .iter()
            .find_map(|(token, op)| text.strip_prefix(token).map(|rest| (*op, rest)))
            .ok_or_else(|| {
                Error::parse(text, "expected one of <, <=, >, >=, == before the bound")
            })?;

        let bound_text = rest.trim();
        let bound: f64 = bound_text
            .parse()
            .map_err(|_| Error::parse(text, format!("'{}' is not a number", bound_text)))?;
        if !bound.is_finite() {
            return Err(Error::parse(text, "bound must be finite"));
        }

        Ok(RangeTerm { op, bound })
    }
}

impl fmt::Display for RangeTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op.symbol(), self.bound)
    }
}

/// A parsed normal range: every term must hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalRange {
    terms: Vec<RangeTerm>,
}

impl NormalRange {
    /// Parsed terms in written order.
    pub fn terms(&self) -> &[RangeTerm] {
        &self.terms
    }

    /// True when `value` lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        self.terms.iter().all(|term| term.matches(value))
    }
}

impl FromStr for NormalRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(Error::parse(s, "normal range is empty"));
        }

        let terms = s
            .split(',')
            .map(str::parse::<RangeTerm>)
            .collect::<Result<Vec<_>>>()?;

        if terms.len() > MAX_TERMS {
            return Err(Error::parse(
                s,
                format!("at most {} comparisons are allowed", MAX_TERMS),
            ));
        }

        Ok(NormalRange { terms })
    }
}

impl fmt::Display for NormalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.terms.iter().map(|t| t.to_string()).collect();
        f.write_str(&parts.join(", "))
    }
}

/// Evaluate `value` against a range expression.
///
/// # Examples
///
/// ```
/// use medtrack_core::evaluate_normal_range;
///
/// assert!(evaluate_normal_range(15.0, "> 13.8, < 17.2").unwrap());
/// assert!(!evaluate_normal_range(20.0, "> 13.8, < 17.2").unwrap());
/// ```
pub fn evaluate_normal_range(value: f64, expr: &str) -> Result<bool> {
    Ok(expr.parse::<NormalRange>()?.contains(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sided_range() {
        assert!(evaluate_normal_range(15.0, "> 13.8, < 17.2").unwrap());
        assert!(!evaluate_normal_range(20.0, "> 13.8, < 17.2").unwrap());
        assert!(!evaluate_normal_range(13.8, "> 13.8, < 17.2").unwrap());
    }

    #[test]
    fn test_one_sided_range() {
        assert!(evaluate_normal_range(50.0, "< 100").unwrap());
        assert!(!evaluate_normal_range(100.0, "< 100").unwrap());
        assert!(evaluate_normal_range(100.0, "<= 100").unwrap());
    }

    #[test]
    fn test_operators_without_spaces() {
        let range: NormalRange = ">=4.5,<=11".parse().unwrap();
        assert_eq!(range.terms().len(), 2);
        assert_eq!(range.terms()[0].op, Comparator::GreaterOrEqual);
        assert_eq!(range.terms()[1].op, Comparator::LessOrEqual);
        assert!(range.contains(4.5));
        assert!(range.contains(11.0));
        assert!(!range.contains(11.1));
    }

    #[test]
    fn test_equality_term() {
        assert!(evaluate_normal_range(0.0, "== 0").unwrap());
        assert!(!evaluate_normal_range(0.5, "== 0").unwrap());
    }

    #[test]
    fn test_rejects_code_like_input() {
        assert!("__import__('os').system('ls')".parse::<NormalRange>().is_err());
        assert!("< 100 or True".parse::<NormalRange>().is_err());
        assert!("< 1; > 2".parse::<NormalRange>().is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("".parse::<NormalRange>().is_err());
        assert!("100".parse::<NormalRange>().is_err());
        assert!("< abc".parse::<NormalRange>().is_err());
        assert!("< inf".parse::<NormalRange>().is_err());
        assert!("> 1, < 5, < 4".parse::<NormalRange>().is_err());
        assert!("> 1,".parse::<NormalRange>().is_err());
    }

    #[test]
    fn test_display_normalizes_spacing() {
        let range: NormalRange = ">13.8,<17.2".parse().unwrap();
        assert_eq!(range.to_string(), "> 13.8, < 17.2");
    }
}
