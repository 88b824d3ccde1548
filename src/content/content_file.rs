use std::{fs, io};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::content::{ContentItem, schema};
use crate::content::error::ValidationError;
use crate::content::front_matter::{split_front_matter, FrontMatterError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    Markdown,
    Mdx,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("error reading file: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("slug {slug:?} is already used by {other}")]
    DuplicateSlug { slug: String, other: String },
}

pub struct ContentFile {
    /// Path relative to the collection root, `/` separated
    pub id: String,
    pub slug: String,
    pub file_path: PathBuf,
    pub format: ContentFormat,
    pub raw_content: String,
}

/// A validated content file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentEntry {
    pub id: String,
    pub slug: String,
    #[serde(flatten)]
    pub item: ContentItem,
    #[serde(skip)]
    pub body: String,
    #[serde(skip)]
    pub file_path: PathBuf,
}

impl ContentFile {
    pub fn from_file(root: &Path, file_path: PathBuf) -> io::Result<ContentFile> {
        let format = match Self::guess_type(&file_path) {
            None => return Err(io::Error::new(
                ErrorKind::Unsupported,
                format!("Could not guess the type of the file {}", file_path.display()))),
            Some(format) => format,
        };

        let raw_content = fs::read_to_string(&file_path)?;
        let id = entry_id(root, &file_path);
        let slug = slug_from_id(&id);

        Ok(ContentFile {
            id,
            slug,
            file_path,
            format,
            raw_content,
        })
    }

    pub fn guess_type(file_name: &Path) -> Option<ContentFormat> {
        let ext = file_name.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "md" | "markdown" => Some(ContentFormat::Markdown),
            "mdx" => Some(ContentFormat::Mdx),
            _ => None,
        }
    }

    pub fn parse(&self) -> Result<ContentEntry, LoadError> {
        let doc = split_front_matter(&self.raw_content)?;
        let item = schema::validate(&doc.record)?;

        Ok(ContentEntry {
            id: self.id.clone(),
            slug: self.slug.clone(),
            item,
            body: doc.body.to_string(),
            file_path: self.file_path.clone(),
        })
    }
}

fn entry_id(root: &Path, file_path: &Path) -> String {
    let relative = file_path.strip_prefix(root).unwrap_or(file_path);
    relative.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Lowercase ASCII, runs of anything else collapsed into a single `-`.
pub fn slugify(segment: &str) -> String {
    let ascii = unidecode::unidecode(segment);
    let mut slug = String::new();
    let mut prev_char = None;

    for c in ascii.chars() {
        let c = if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' };
        if c != '-' || prev_char != Some('-') {
            slug.push(c);
        }
        prev_char = Some(c);
    }

    slug.trim_matches('-').to_string()
}

/// `2024/Héllo World.md` becomes `2024/hello-world`, `guides/index.md`
/// becomes `guides`.
pub fn slug_from_id(id: &str) -> String {
    let stem = match id.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') => stem,
        _ => id,
    };

    let mut segments: Vec<String> = stem.split('/')
        .map(slugify)
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() > 1 && segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }

    segments.join("/")
}
