use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

pub mod content_file;
pub mod date;
pub mod error;
pub mod front_matter;
pub mod schema;

/// Untyped key-value record as produced by a front matter parser.
pub type RawRecord = Map<String, Value>;

/// Validated metadata of one article.
///
/// Built only by [`schema::validate`]. Serializes back to the field names
/// used in front matter, with dates as RFC 3339 strings and absent fields
/// omitted, so that the serialized form validates to an equal item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub title: String,
    pub publish_date: DateTime<Utc>,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl ContentItem {
    pub fn is_draft(&self) -> bool {
        self.draft.unwrap_or(false)
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.update_date.unwrap_or(self.publish_date)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.as_ref().is_some_and(|tags| tags.iter().any(|t| t == tag))
    }

    pub fn to_record(&self) -> RawRecord {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            // A struct with string keys always serializes to an object
            _ => Map::new(),
        }
    }
}
