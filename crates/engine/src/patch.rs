//! Partial edits
//!
//! Each field of a patch is `None` to keep the stored value or `Some(text)`
//! to replace it. Operator input goes through [`keep_if_blank`], so an empty
//! answer at a prompt means "keep current".

/// Map blank input to "keep current".
pub fn keep_if_blank(input: impl Into<String>) -> Option<String> {
    let text = input.into();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Edits to one test definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionPatch {
    /// New test name
    pub name: Option<String>,
    /// New normal range expression
    pub normal_range: Option<String>,
    /// New result unit
    pub result_unit: Option<String>,
    /// New turnaround, `DD-hh-mm`
    pub turnaround: Option<String>,
}

impl DefinitionPatch {
    /// Build from raw operator answers; blank answers keep the current value.
    pub fn from_inputs(
        name: impl Into<String>,
        normal_range: impl Into<String>,
        result_unit: impl Into<String>,
        turnaround: impl Into<String>,
    ) -> Self {
        Self {
            name: keep_if_blank(name),
            normal_range: keep_if_blank(normal_range),
            result_unit: keep_if_blank(result_unit),
            turnaround: keep_if_blank(turnaround),
        }
    }

    /// Check if nothing would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.normal_range.is_none()
            && self.result_unit.is_none()
            && self.turnaround.is_none()
    }
}

/// Edits to one test result.
///
/// The patient id is the lookup key and cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultPatch {
    /// New test name (must exist in the catalog)
    pub test_name: Option<String>,
    /// New test timestamp, `YYYY-MM-DD hh:mm`
    pub test_date_time: Option<String>,
    /// New numeric result
    pub result_value: Option<String>,
    /// New result unit
    pub result_unit: Option<String>,
    /// New status
    pub status: Option<String>,
    /// New results timestamp, `YYYY-MM-DD hh:mm`
    pub results_date_time: Option<String>,
}

impl ResultPatch {
    /// Check if nothing would change.
    pub fn is_empty(&self) -> bool {
        self.test_name.is_none()
            && self.test_date_time.is_none()
            && self.result_value.is_none()
            && self.result_unit.is_none()
            && self.status.is_none()
            && self.results_date_time.is_none()
    }
}
