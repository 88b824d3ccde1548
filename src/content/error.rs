use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// One offending field in a content record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Violation {
    #[error("{field}: required field is missing, expected {expected}")]
    MissingField { field: String, expected: String },

    #[error("{field}: expected {expected}, found {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("{field}: expected a date, found unparseable string {value:?}")]
    UnparseableDate { field: String, value: String },
}

impl Violation {
    pub fn field(&self) -> &str {
        match self {
            Violation::MissingField { field, .. } => field,
            Violation::TypeMismatch { field, .. } => field,
            Violation::UnparseableDate { field, .. } => field,
        }
    }
}

/// The full set of violations found while validating one record.
///
/// Never empty: a record either validates or has at least one violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        ValidationError { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(Violation::field).collect()
    }

    pub fn has_violation_for(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field() == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid content item ({} violation", self.violations.len())?;
        if self.violations.len() != 1 {
            write!(f, "s")?;
        }
        write!(f, ")")?;
        for v in &self.violations {
            write!(f, "\n  - {}", v)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
