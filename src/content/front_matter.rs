use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::content::RawRecord;

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterFormat {
    /// Delimited by `---`
    Yaml,
    /// Delimited by `+++`
    Toml,
}

impl FrontMatterFormat {
    fn fence(&self) -> &'static str {
        match self {
            FrontMatterFormat::Yaml => "---",
            FrontMatterFormat::Toml => "+++",
        }
    }

    fn is_closing(&self, line: &str) -> bool {
        match self {
            FrontMatterFormat::Yaml => line == "---" || line == "...",
            FrontMatterFormat::Toml => line == "+++",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrontMatterError {
    #[error("no front matter block at the start of the file")]
    Missing,
    #[error("front matter block opened with {0} is never closed")]
    Unterminated(&'static str),
    #[error("front matter is not a key-value mapping")]
    NotAMapping,
    #[error("front matter syntax error: {0}")]
    Syntax(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document<'a> {
    pub format: FrontMatterFormat,
    pub record: RawRecord,
    pub body: &'a str,
}

/// Splits `text` into its front matter record and the body that follows.
///
/// Blank lines (and a byte order mark) before the opening fence are
/// skipped. The fence lines must contain nothing but the delimiter,
/// trailing whitespace aside.
pub fn split_front_matter(text: &str) -> Result<Document<'_>, FrontMatterError> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut lines = text.split_inclusive('\n');
    let mut offset = 0;

    // Empty lines are ok before the opening fence
    let format = loop {
        let Some(line) = lines.next() else {
            return Err(FrontMatterError::Missing);
        };
        offset += line.len();

        match line.trim() {
            "" => continue,
            "---" => break FrontMatterFormat::Yaml,
            "+++" => break FrontMatterFormat::Toml,
            _ => return Err(FrontMatterError::Missing),
        }
    };

    let block_start = offset;
    let block_end = loop {
        let Some(line) = lines.next() else {
            return Err(FrontMatterError::Unterminated(format.fence()));
        };
        let line_start = offset;
        offset += line.len();

        if format.is_closing(line.trim_end()) {
            break line_start;
        }
    };

    let block = &text[block_start..block_end];
    let record = match format {
        FrontMatterFormat::Yaml => parse_yaml(block)?,
        FrontMatterFormat::Toml => parse_toml(block)?,
    };

    Ok(Document {
        format,
        record,
        body: &text[offset..],
    })
}

fn parse_yaml(block: &str) -> Result<RawRecord, FrontMatterError> {
    let blank = block.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'));
    if blank {
        return Ok(Map::new());
    }

    let value: Value = serde_yaml::from_str(block).map_err(|e| FrontMatterError::Syntax(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(FrontMatterError::NotAMapping),
    }
}

fn parse_toml(block: &str) -> Result<RawRecord, FrontMatterError> {
    let table: toml::Table = toml::from_str(block).map_err(|e| FrontMatterError::Syntax(e.to_string()))?;
    Ok(toml_table_to_record(table))
}

fn toml_table_to_record(table: toml::Table) -> RawRecord {
    table.into_iter()
        .map(|(k, v)| (k, toml_to_json(v)))
        .collect()
}

// TOML dates keep their textual form so they are normalized like any other
// date string
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(d) => Value::String(d.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(toml_table_to_record(table)),
    }
}
