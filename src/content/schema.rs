//! Accepted shape of a content item's front matter.
//!
//! The shape is a field table ([`FIELDS`]). Validation walks the table once,
//! collecting every violation instead of stopping at the first one, and
//! normalizes date fields on the way. It is a pure function of its input and
//! may be called from any number of threads.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::content::date::parse_date;
use crate::content::error::{ValidationError, Violation};
use crate::content::{ContentItem, RawRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    /// A string that must parse as a date.
    Date,
    Bool,
    StringList,
    /// Any object. Its content is not inspected.
    Object,
}

impl FieldKind {
    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Date => "date string",
            FieldKind::Bool => "boolean",
            FieldKind::StringList => "array of strings",
            FieldKind::Object => "object",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn required(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind, required: true }
}

const fn optional(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind, required: false }
}

pub const FIELDS: &[FieldSpec] = &[
    required("title", FieldKind::String),
    required("publishDate", FieldKind::Date),
    required("excerpt", FieldKind::String),
    optional("image", FieldKind::String),
    optional("category", FieldKind::String),
    optional("tags", FieldKind::StringList),
    optional("draft", FieldKind::Bool),
    optional("layout", FieldKind::String),
    optional("author", FieldKind::String),
    optional("updateDate", FieldKind::Date),
    optional("metadata", FieldKind::Object),
];

/// A field value that passed its type check.
enum Checked {
    String(String),
    Date(DateTime<Utc>),
    Bool(bool),
    StringList(Vec<String>),
    Object(Map<String, Value>),
}

/// Short description of a JSON value for error messages.
fn describe(value: &Value) -> String {
    const MAX_LEN: usize = 40;

    let kind = match value {
        Value::Null => return "null".to_string(),
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };

    let text = value.to_string();
    if text.chars().count() > MAX_LEN {
        let cut: String = text.chars().take(MAX_LEN).collect();
        format!("{} {}...", kind, cut)
    } else {
        format!("{} {}", kind, text)
    }
}

fn mismatch(field: &str, expected: &str, actual: &Value) -> Violation {
    Violation::TypeMismatch {
        field: field.to_string(),
        expected: expected.to_string(),
        actual: describe(actual),
    }
}

fn check_field(spec: &FieldSpec, value: &Value, violations: &mut Vec<Violation>) -> Option<Checked> {
    let name = spec.name;
    match (spec.kind, value) {
        (FieldKind::String, Value::String(s)) => Some(Checked::String(s.clone())),
        (FieldKind::Date, Value::String(s)) => match parse_date(s) {
            Ok(d) => Some(Checked::Date(d)),
            Err(_) => {
                violations.push(Violation::UnparseableDate { field: name.to_string(), value: s.clone() });
                None
            }
        },
        (FieldKind::Bool, Value::Bool(b)) => Some(Checked::Bool(*b)),
        (FieldKind::StringList, Value::Array(items)) => {
            let mut tags = Vec::with_capacity(items.len());
            let mut ok = true;
            for (i, item) in items.iter().enumerate() {
                match item {
                    Value::String(s) => tags.push(s.clone()),
                    other => {
                        violations.push(mismatch(&format!("{}[{}]", name, i), "string", other));
                        ok = false;
                    }
                }
            }
            ok.then_some(Checked::StringList(tags))
        }
        (FieldKind::Object, Value::Object(map)) => Some(Checked::Object(map.clone())),
        (kind, other) => {
            // Dates are supplied as strings, so that is what a mismatch reports
            let expected = match kind {
                FieldKind::Date => FieldKind::String.expected(),
                k => k.expected(),
            };
            violations.push(mismatch(name, expected, other));
            None
        }
    }
}

/// Checks `raw` against [`FIELDS`] and builds the normalized item.
///
/// Keys that are not in the table are ignored. A `null` value counts as
/// present and is reported as a type mismatch.
pub fn validate(raw: &RawRecord) -> Result<ContentItem, ValidationError> {
    let mut violations = vec![];
    let mut values: Vec<(&'static str, Checked)> = Vec::with_capacity(FIELDS.len());

    for spec in FIELDS {
        match raw.get(spec.name) {
            None if spec.required => violations.push(Violation::MissingField {
                field: spec.name.to_string(),
                expected: spec.kind.expected().to_string(),
            }),
            None => {}
            Some(value) => {
                if let Some(c) = check_field(spec, value, &mut violations) {
                    values.push((spec.name, c));
                }
            }
        }
    }

    if !violations.is_empty() {
        return Err(ValidationError::new(violations));
    }

    build_item(CheckedFields(values))
}

/// Like [`validate`] but accepts any JSON value. Anything other than an
/// object fails with a single mismatch on `(root)`.
pub fn validate_value(raw: &Value) -> Result<ContentItem, ValidationError> {
    match raw {
        Value::Object(map) => validate(map),
        other => Err(ValidationError::new(vec![mismatch("(root)", "object", other)])),
    }
}

/// Checked values by field name. Each field is taken at most once.
struct CheckedFields(Vec<(&'static str, Checked)>);

impl CheckedFields {
    fn take(&mut self, name: &str) -> Option<Checked> {
        let pos = self.0.iter().position(|(n, _)| *n == name)?;
        Some(self.0.swap_remove(pos).1)
    }

    fn string(&mut self, name: &str) -> Option<String> {
        match self.take(name)? {
            Checked::String(s) => Some(s),
            _ => unreachable!("{} is not a string field", name),
        }
    }

    fn date(&mut self, name: &str) -> Option<DateTime<Utc>> {
        match self.take(name)? {
            Checked::Date(d) => Some(d),
            _ => unreachable!("{} is not a date field", name),
        }
    }

    fn bool(&mut self, name: &str) -> Option<bool> {
        match self.take(name)? {
            Checked::Bool(b) => Some(b),
            _ => unreachable!("{} is not a boolean field", name),
        }
    }

    fn string_list(&mut self, name: &str) -> Option<Vec<String>> {
        match self.take(name)? {
            Checked::StringList(v) => Some(v),
            _ => unreachable!("{} is not a list field", name),
        }
    }

    fn object(&mut self, name: &str) -> Option<Map<String, Value>> {
        match self.take(name)? {
            Checked::Object(m) => Some(m),
            _ => unreachable!("{} is not an object field", name),
        }
    }
}

fn require<T>(name: &str, kind: FieldKind, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::new(vec![Violation::MissingField {
        field: name.to_string(),
        expected: kind.expected().to_string(),
    }]))
}

fn build_item(mut fields: CheckedFields) -> Result<ContentItem, ValidationError> {
    Ok(ContentItem {
        title: require("title", FieldKind::String, fields.string("title"))?,
        publish_date: require("publishDate", FieldKind::Date, fields.date("publishDate"))?,
        excerpt: require("excerpt", FieldKind::String, fields.string("excerpt"))?,
        image: fields.string("image"),
        category: fields.string("category"),
        tags: fields.string_list("tags"),
        draft: fields.bool("draft"),
        layout: fields.string("layout"),
        author: fields.string("author"),
        update_date: fields.date("updateDate"),
        metadata: fields.object("metadata"),
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_required_fields_only() {
        let raw = record(json!({"title": "Hello", "publishDate": "2024-01-01", "excerpt": "Intro"}));
        let item = validate(&raw).unwrap();
        assert_eq!(item.title, "Hello");
        assert_eq!(item.excerpt, "Intro");
        assert_eq!(item.publish_date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(item.image, None);
        assert_eq!(item.category, None);
        assert_eq!(item.tags, None);
        assert_eq!(item.draft, None);
        assert_eq!(item.layout, None);
        assert_eq!(item.author, None);
        assert_eq!(item.update_date, None);
        assert_eq!(item.metadata, None);
        assert!(!item.is_draft());
    }

    #[test]
    fn test_tags_and_draft() {
        let raw = record(json!({
            "title": "Hello",
            "publishDate": "2024-01-01",
            "excerpt": "Intro",
            "tags": ["a", "b"],
            "draft": true
        }));
        let item = validate(&raw).unwrap();
        assert_eq!(item.publish_date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(item.tags, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(item.draft, Some(true));
        assert!(item.has_tag("b"));
        assert!(!item.has_tag("c"));
        assert_eq!(item.image, None);
        assert_eq!(item.category, None);
        assert_eq!(item.author, None);
        assert_eq!(item.update_date, None);
        assert_eq!(item.metadata, None);
        assert_eq!(item.layout, None);
    }

    #[test]
    fn test_all_fields() {
        let raw = record(json!({
            "title": "Data pipelines",
            "publishDate": "2024-03-10T08:30:00Z",
            "updateDate": "2024-04-01",
            "excerpt": "How we move data",
            "image": "~/assets/images/pipes.png",
            "category": "Engineering",
            "tags": ["data", "etl"],
            "draft": false,
            "layout": "PostLayout",
            "author": "Apex",
            "metadata": {"canonical": "https://example.com/x", "robots": {"index": false}},
            "unknown": 12
        }));
        let item = validate(&raw).unwrap();
        assert_eq!(item.image.as_deref(), Some("~/assets/images/pipes.png"));
        assert_eq!(item.category.as_deref(), Some("Engineering"));
        assert_eq!(item.layout.as_deref(), Some("PostLayout"));
        assert_eq!(item.author.as_deref(), Some("Apex"));
        assert_eq!(item.update_date, Some(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()));
        assert_eq!(item.last_modified(), Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());
        let metadata = item.metadata.unwrap();
        assert_eq!(metadata.get("robots"), Some(&json!({"index": false})));
    }

    #[test]
    fn test_every_field_reaches_the_item() {
        let mut raw = RawRecord::new();
        for spec in FIELDS {
            let value = match spec.kind {
                FieldKind::String => json!(format!("{} value", spec.name)),
                FieldKind::Date => json!("2024-03-10T08:30:00Z"),
                FieldKind::Bool => json!(true),
                FieldKind::StringList => json!(["one", "two"]),
                FieldKind::Object => json!({"key": "value"}),
            };
            raw.insert(spec.name.to_string(), value);
        }

        let item = validate(&raw).unwrap();
        let serialized = item.to_record();
        for spec in FIELDS {
            assert!(serialized.contains_key(spec.name), "{} was dropped", spec.name);
        }
        assert_eq!(validate(&serialized).unwrap(), item);
    }

    #[test]
    fn test_missing_title() {
        let raw = record(json!({"publishDate": "2024-01-01", "excerpt": "Intro"}));
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.violations(), [Violation::MissingField {
            field: "title".to_string(),
            expected: "string".to_string(),
        }]);
    }

    #[test]
    fn test_missing_publish_date() {
        let raw = record(json!({"title": "Hello", "excerpt": "Intro"}));
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.fields(), ["publishDate"]);
        assert!(matches!(err.violations()[0], Violation::MissingField { .. }));
    }

    #[test]
    fn test_publish_date_not_a_string() {
        let raw = record(json!({"title": "Hello", "publishDate": 20240101, "excerpt": "Intro"}));
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.violations(), [Violation::TypeMismatch {
            field: "publishDate".to_string(),
            expected: "string".to_string(),
            actual: "number 20240101".to_string(),
        }]);
    }

    #[test]
    fn test_unparseable_publish_date() {
        let raw = record(json!({"title": "Hello", "publishDate": "not-a-date", "excerpt": "Intro"}));
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.violations(), [Violation::UnparseableDate {
            field: "publishDate".to_string(),
            value: "not-a-date".to_string(),
        }]);
    }

    #[test]
    fn test_collects_all_violations() {
        let raw = record(json!({
            "title": 3,
            "updateDate": "yesterday",
            "tags": ["ok", 1, null],
            "draft": "yes",
            "metadata": [],
            "image": null
        }));
        let err = validate(&raw).unwrap_err();
        assert_eq!(err.fields(), [
            "title", "publishDate", "excerpt", "image", "tags[1]", "tags[2]", "draft", "updateDate", "metadata",
        ]);
        assert_eq!(err.violations()[3], Violation::TypeMismatch {
            field: "image".to_string(),
            expected: "string".to_string(),
            actual: "null".to_string(),
        });
    }

    #[test]
    fn test_long_values_are_truncated() {
        let long = "x".repeat(100);
        let raw = record(json!({"title": [long], "publishDate": "2024-01-01", "excerpt": "Intro"}));
        let err = validate(&raw).unwrap_err();
        match &err.violations()[0] {
            Violation::TypeMismatch { actual, .. } => {
                assert!(actual.starts_with("array [\"xxx"));
                assert!(actual.ends_with("..."));
            }
            v => panic!("unexpected violation {:?}", v),
        }
    }

    #[test]
    fn test_revalidating_serialized_item() {
        let raw = record(json!({
            "title": "Hello",
            "publishDate": "2024-01-01 10:00:00.250",
            "updateDate": "Feb 3, 2024",
            "excerpt": "Intro",
            "tags": ["b", "a"],
            "metadata": {"k": [1, 2]}
        }));
        let item = validate(&raw).unwrap();
        let again = validate(&item.to_record()).unwrap();
        assert_eq!(item, again);
    }

    #[test]
    fn test_root_must_be_object() {
        let err = validate_value(&json!(["title"])).unwrap_err();
        assert_eq!(err.fields(), ["(root)"]);

        let item = validate_value(&json!({"title": "a", "publishDate": "2020-01-01", "excerpt": "b"}));
        assert!(item.is_ok());
    }
}
