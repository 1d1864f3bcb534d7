use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
/// Every problem found in one resource input.
pub struct ValidationReport {
    /// Required fields that are absent or `null`.
    pub missing_fields: Vec<String>,
    /// Fields present with the wrong JSON type.
    pub invalid_types: Vec<String>,
    /// Fields with the right type but an unacceptable value (URL, date, empty text).
    pub invalid_values: Vec<String>,
    /// Problems inside the metadata object.
    pub metadata: Vec<String>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.missing_fields.is_empty()
            && self.invalid_types.is_empty()
            && self.invalid_values.is_empty()
            && self.metadata.is_empty()
    }

    pub fn problem_count(&self) -> usize {
        self.missing_fields.len()
            + self.invalid_types.len()
            + self.invalid_values.len()
            + self.metadata.len()
    }

    /// `Ok(())` when empty, otherwise the report wrapped in a [`ValidationError`].
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { report: self })
        }
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if !self.missing_fields.is_empty() {
            parts.push(format!("missing fields: {}", self.missing_fields.join(", ")));
        }
        if !self.invalid_types.is_empty() {
            parts.push(format!("invalid types: {}", self.invalid_types.join(", ")));
        }
        if !self.invalid_values.is_empty() {
            parts.push(format!("invalid values: {}", self.invalid_values.join(", ")));
        }
        if !self.metadata.is_empty() {
            parts.push(format!("metadata: {}", self.metadata.join(", ")));
        }
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid resource input: {report}")]
/// Input rejected before any metrics or cache work.
pub struct ValidationError {
    pub report: ValidationReport,
}

impl ValidationError {
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }
}
