use std::collections::{BTreeSet, HashMap};
use std::{fs, io};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use spdlog::{debug, info, log, Level};

use crate::content::content_file::{ContentEntry, ContentFile, LoadError};

/// Level of the per-file failure logs. Check runs already report each
/// failure, so these stay below the default `Warn` threshold.
pub(crate) const FAILURE_LOG_LEVEL: Level = Level::Debug;

/// A file that could not be turned into an entry.
#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: LoadError,
}

/// All entries of one content directory, newest first.
#[derive(Debug, Default)]
pub struct Collection {
    entries: Vec<ContentEntry>,
    failures: Vec<Failure>,
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.') || name.starts_with('_'))
}

/// Lists every content file below `dir`, sorted by path.
pub fn retrieve_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = vec![];
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let entry = entry?;
            let path = entry.path();
            if is_hidden(&path) {
                continue;
            }

            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() && ContentFile::guess_type(&path).is_some() {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn load_file(root: &Path, path: PathBuf) -> Result<ContentEntry, Failure> {
    let file = ContentFile::from_file(root, path.clone())
        .map_err(|e| Failure { path: path.clone(), error: e.into() })?;
    file.parse().map_err(|error| Failure { path, error })
}

impl Collection {
    /// Loads and validates every content file below `dir`.
    ///
    /// Files are independent of each other and are validated in parallel.
    /// A file that fails is recorded in [`Collection::failures`] and does
    /// not stop the others from loading. Only a failure to list the
    /// directory itself is an error.
    pub fn load(dir: &Path) -> io::Result<Collection> {
        let files = retrieve_files(dir)?;
        debug!("Found {} content files in {}", files.len(), dir.display());

        let results: Vec<Result<ContentEntry, Failure>> = files
            .into_par_iter()
            .map(|path| load_file(dir, path))
            .collect();

        let collection = Self::from_results(results);
        for failure in &collection.failures {
            log!(FAILURE_LOG_LEVEL, "Invalid content file {}: {}", failure.path.display(), failure.error);
        }
        info!("Loaded {} entries from {} ({} invalid)",
            collection.entries.len(), dir.display(), collection.failures.len());

        Ok(collection)
    }

    /// Loads a single file as a collection of at most one entry.
    pub fn load_single(path: &Path) -> Collection {
        let root = path.parent().unwrap_or(Path::new(""));
        Self::from_results(vec![load_file(root, path.to_path_buf())])
    }

    /// Builds a collection out of per-file results.
    ///
    /// Entries are sorted newest first. When two entries share a slug the
    /// one sorting first keeps it and the other becomes a
    /// [`LoadError::DuplicateSlug`] failure.
    pub fn from_results(results: Vec<Result<ContentEntry, Failure>>) -> Collection {
        let mut loaded = vec![];
        let mut failures = vec![];
        for result in results {
            match result {
                Ok(entry) => loaded.push(entry),
                Err(failure) => failures.push(failure),
            }
        }

        loaded.sort_by(|a, b| {
            b.item.publish_date.cmp(&a.item.publish_date)
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut owners: HashMap<String, String> = HashMap::new();
        let mut entries = Vec::with_capacity(loaded.len());
        for entry in loaded {
            if let Some(other) = owners.get(&entry.slug) {
                let error = LoadError::DuplicateSlug { slug: entry.slug.clone(), other: other.clone() };
                failures.push(Failure { path: entry.file_path, error });
                continue;
            }
            owners.insert(entry.slug.clone(), entry.id.clone());
            entries.push(entry);
        }
        failures.sort_by(|a, b| a.path.cmp(&b.path));

        Collection { entries, failures }
    }

    pub fn entries(&self) -> &[ContentEntry] {
        &self.entries
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn published(&self) -> impl Iterator<Item=&ContentEntry> {
        self.entries.iter().filter(|e| !e.item.is_draft())
    }

    pub fn drafts(&self) -> impl Iterator<Item=&ContentEntry> {
        self.entries.iter().filter(|e| e.item.is_draft())
    }

    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item=&'a ContentEntry> {
        self.entries.iter().filter(move |e| e.item.has_tag(tag))
    }

    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item=&'a ContentEntry> {
        self.entries.iter().filter(move |e| e.item.category.as_deref() == Some(category))
    }

    pub fn tags(&self) -> Vec<&str> {
        let tags: BTreeSet<&str> = self.entries.iter()
            .flat_map(|e| e.item.tags.iter().flatten())
            .map(String::as_str)
            .collect();
        tags.into_iter().collect()
    }

    pub fn get(&self, slug: &str) -> Option<&ContentEntry> {
        self.entries.iter().find(|e| e.slug == slug)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use crate::test_data::{POST_INVALID, POST_TOML, POST_YAML};

    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn sample_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "twenty-years.md", POST_YAML);
        write(dir.path(), "2024/rust/index.md", POST_TOML);
        write(dir.path(), "broken.md", POST_INVALID);
        write(dir.path(), "draft.mdx", "---\ntitle: Draft\npublishDate: 2023-06-01\nexcerpt: Soon\ndraft: true\ntags: [rust, wip]\n---\n");
        write(dir.path(), "notes.txt", "not content");
        write(dir.path(), ".hidden/secret.md", POST_INVALID);
        write(dir.path(), "_drafts.md", POST_INVALID);
        dir
    }

    #[test]
    fn test_retrieve_files() {
        let dir = sample_dir();
        let files = retrieve_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, ["2024/rust/index.md", "broken.md", "draft.mdx", "twenty-years.md"]);
    }

    #[test]
    fn test_load_keeps_going_past_invalid_files() {
        let dir = sample_dir();
        let collection = Collection::load(dir.path()).unwrap();

        let slugs: Vec<&str> = collection.entries().iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, ["2024/rust", "draft", "twenty-years"]);

        assert!(!collection.is_valid());
        assert_eq!(collection.failures().len(), 1);
        assert!(collection.failures()[0].path.ends_with("broken.md"));
        assert!(matches!(collection.failures()[0].error, LoadError::Validation(_)));
    }

    #[test]
    fn test_queries() {
        let dir = sample_dir();
        let collection = Collection::load(dir.path()).unwrap();

        let published: Vec<&str> = collection.published().map(|e| e.slug.as_str()).collect();
        assert_eq!(published, ["2024/rust", "twenty-years"]);

        let drafts: Vec<&str> = collection.drafts().map(|e| e.slug.as_str()).collect();
        assert_eq!(drafts, ["draft"]);

        let rust: Vec<&str> = collection.with_tag("rust").map(|e| e.slug.as_str()).collect();
        assert_eq!(rust, ["2024/rust", "draft"]);

        let career: Vec<&str> = collection.in_category("Career").map(|e| e.slug.as_str()).collect();
        assert_eq!(career, ["twenty-years"]);

        assert_eq!(collection.tags(), ["career", "engineering", "rust", "wip"]);
        assert_eq!(collection.get("draft").map(|e| e.item.title.as_str()), Some("Draft"));
        assert!(collection.get("missing").is_none());
    }

    #[test]
    fn test_duplicate_slugs() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Hello World.md", "---\ntitle: Newer\npublishDate: 2024-05-01\nexcerpt: A\n---\n");
        write(dir.path(), "hello-world.mdx", "---\ntitle: Older\npublishDate: 2023-05-01\nexcerpt: B\n---\n");
        write(dir.path(), "other.md", "---\ntitle: Other\npublishDate: 2022-05-01\nexcerpt: C\n---\n");

        let collection = Collection::load(dir.path()).unwrap();
        let slugs: Vec<&str> = collection.entries().iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, ["hello-world", "other"]);
        assert_eq!(collection.get("hello-world").map(|e| e.item.title.as_str()), Some("Newer"));

        assert!(!collection.is_valid());
        assert_eq!(collection.failures().len(), 1);
        let failure = &collection.failures()[0];
        assert!(failure.path.ends_with("hello-world.mdx"));
        match &failure.error {
            LoadError::DuplicateSlug { slug, other } => {
                assert_eq!(slug, "hello-world");
                assert_eq!(other, "Hello World.md");
            }
            err => panic!("unexpected error {}", err),
        }
    }

    #[test]
    fn test_load_single() {
        let dir = sample_dir();
        let collection = Collection::load_single(&dir.path().join("draft.mdx"));
        assert!(collection.is_valid());
        assert_eq!(collection.entries()[0].id, "draft.mdx");

        let collection = Collection::load_single(&dir.path().join("notes.txt"));
        assert!(matches!(collection.failures()[0].error, LoadError::Io(_)));
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        assert!(Collection::load(&dir.path().join("nope")).is_err());
    }
}
