use std::fmt::Write;

use serde::Serialize;

use crate::collection::{Collection, Failure};
use crate::content::content_file::LoadError;
use crate::content::error::Violation;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FailureReport<'a> {
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "no_violations")]
    pub violations: &'a [Violation],
}

fn no_violations(violations: &&[Violation]) -> bool {
    violations.is_empty()
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport<'a> {
    pub valid: usize,
    pub drafts: usize,
    pub invalid: usize,
    pub failures: Vec<FailureReport<'a>>,
}

impl<'a> FailureReport<'a> {
    fn new(failure: &'a Failure) -> Self {
        let (message, violations): (String, &[Violation]) = match &failure.error {
            LoadError::Validation(err) => ("invalid front matter".to_string(), err.violations()),
            other => (other.to_string(), &[]),
        };

        FailureReport {
            path: failure.path.display().to_string(),
            message,
            violations,
        }
    }
}

impl<'a> CheckReport<'a> {
    pub fn new(collection: &'a Collection) -> Self {
        CheckReport {
            valid: collection.entries().len(),
            drafts: collection.drafts().count(),
            invalid: collection.failures().len(),
            failures: collection.failures().iter().map(FailureReport::new).collect(),
        }
    }

    /// One line per violation, prefixed by the file, then a summary line.
    pub fn render_text(&self) -> String {
        let mut buf = String::new();

        for failure in &self.failures {
            if failure.violations.is_empty() {
                let _ = writeln!(&mut buf, "{}: {}", failure.path, failure.message);
            }
            for v in failure.violations {
                let _ = writeln!(&mut buf, "{}: {}", failure.path, v);
            }
        }

        let _ = writeln!(&mut buf, "{} valid ({} drafts), {} invalid", self.valid, self.drafts, self.invalid);
        buf
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
