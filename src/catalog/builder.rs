//! Library builder for ingesting per-translation source documents.
//!
//! The `LibraryBuilder` reads `<version>.json` (or `<version>.json.gz`) files
//! shaped `{ book: { chapter: { verse: text } } }` and collates them into a
//! single [`Library`].

use flate2::read::GzDecoder;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::store::{Book, Library};
use crate::core::book::BookName;
use crate::core::types::{UnknownVersion, Version};

#[derive(Error, Debug)]
pub enum BuilderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    UnknownVersion(#[from] UnknownVersion),

    #[error("Unsupported file: {0} (expected <version>.json or <version>.json.gz)")]
    UnsupportedFile(String),

    #[error("Invalid key in {version}/{book}: '{key}' is not a positive number")]
    InvalidKey {
        version: Version,
        book: String,
        key: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("No books were ingested")]
    Empty,
}

/// Source file format, detected from the file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    JsonGz,
}

impl SourceFormat {
    /// Detect format from file name, returning the version stem with it
    #[must_use]
    pub fn from_path(path: &Path) -> Option<(Self, &str)> {
        let name = path.file_name()?.to_str()?;
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".json.gz") {
            Some((Self::JsonGz, &name[..name.len() - ".json.gz".len()]))
        } else if lower.ends_with(".json") {
            Some((Self::Json, &name[..name.len() - ".json".len()]))
        } else {
            None
        }
    }
}

/// Raw source content: book, chapter and verse keyed by strings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SourceDocument {
    pub books: BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>,
}

impl SourceDocument {
    /// Parse a source document from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Record of an ingested input
#[derive(Debug, Clone)]
pub struct InputRecord {
    pub source: String,
    pub version: Version,
    pub books: usize,
    pub verses: usize,
}

/// Builder for a [`Library`]
#[derive(Debug, Default)]
pub struct LibraryBuilder {
    library: Library,
    force: bool,
    inputs_processed: Vec<InputRecord>,
    warnings: Vec<String>,
}

impl LibraryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace books that already exist instead of failing with a conflict
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Start from an existing library; new books are added to it
    #[must_use]
    pub fn append_to(mut self, library: Library) -> Self {
        let mut base = library;
        base.extend(std::mem::take(&mut self.library));
        self.library = base;
        self
    }

    /// Add a single source file
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::UnsupportedFile` if the name is not
    /// `<version>.json[.gz]`, `BuilderError::UnknownVersion` if the stem is not
    /// a known translation, `BuilderError::Io` or `BuilderError::Json` if the
    /// file cannot be read, and any error from [`add_document`](Self::add_document).
    pub fn add_file(&mut self, path: &Path) -> Result<(), BuilderError> {
        let path_str = path.display().to_string();
        let (format, stem) = SourceFormat::from_path(path)
            .ok_or_else(|| BuilderError::UnsupportedFile(path_str.clone()))?;
        let version: Version = stem.parse()?;

        let file = std::fs::File::open(path)?;
        let mut content = String::new();
        match format {
            SourceFormat::Json => {
                std::io::BufReader::new(file).read_to_string(&mut content)?;
            }
            SourceFormat::JsonGz => {
                GzDecoder::new(file).read_to_string(&mut content)?;
            }
        }

        let document = SourceDocument::from_json(&content).map_err(|source| BuilderError::Json {
            path: path_str.clone(),
            source,
        })?;
        self.add_document(version, document, &path_str)
    }

    /// Add every source file in a directory (not recursive)
    ///
    /// Files whose names do not look like `<version>.json[.gz]` are skipped
    /// with a warning. Files are processed in name order.
    ///
    /// # Errors
    ///
    /// Returns the first error from reading the directory or any file in it.
    pub fn add_dir(&mut self, dir: &Path) -> Result<usize, BuilderError> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()?;
        paths.sort();

        let mut added = 0;
        for path in paths.iter().filter(|p| p.is_file()) {
            if SourceFormat::from_path(path).is_none() {
                let message = format!("Skipping {}: not a source file", path.display());
                warn!("{message}");
                self.warnings.push(message);
                continue;
            }
            self.add_file(path)?;
            added += 1;
        }
        Ok(added)
    }

    /// Add a file, or every source file if `path` is a directory
    ///
    /// # Errors
    ///
    /// See [`add_file`](Self::add_file) and [`add_dir`](Self::add_dir).
    pub fn add_input(&mut self, path: &Path) -> Result<(), BuilderError> {
        if path.is_dir() {
            self.add_dir(path)?;
        } else {
            self.add_file(path)?;
        }
        Ok(())
    }

    /// Add a parsed document for `version`
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::UnknownVersion` for `Version::Unknown`,
    /// `BuilderError::InvalidKey` for chapter or verse keys that are not
    /// positive integers, and `BuilderError::Conflict` if a book is already
    /// present and `force` is not set. Nothing is added on error.
    pub fn add_document(
        &mut self,
        version: Version,
        document: SourceDocument,
        source: &str,
    ) -> Result<(), BuilderError> {
        if !version.is_known() {
            return Err(UnknownVersion(version.to_string()).into());
        }

        let mut books = Vec::with_capacity(document.books.len());
        for (raw_name, chapters) in document.books {
            let name = BookName::new(&raw_name);
            if name.is_empty() {
                return Err(BuilderError::InvalidKey {
                    version,
                    book: raw_name,
                    key: String::new(),
                });
            }
            let book = build_book(version, &raw_name, chapters)?;
            if !self.force
                && (self.library.book(version, &name).is_some()
                    || books.iter().any(|(n, _)| n == &name))
            {
                return Err(BuilderError::Conflict(format!(
                    "book '{name}' appears more than once for {version}"
                )));
            }
            books.push((name, book));
        }

        let verses = books.iter().map(|(_, b)| b.verse_count()).sum();
        let record = InputRecord {
            source: source.to_string(),
            version,
            books: books.len(),
            verses,
        };
        for (name, book) in books {
            if self.library.insert_book(version, name.clone(), book).is_some() {
                let message = format!("{source}: replaced {version}/{name}");
                debug!("{message}");
                self.warnings.push(message);
            }
        }
        debug!(source, version = %version, books = record.books, verses, "Ingested source");
        self.inputs_processed.push(record);
        Ok(())
    }

    /// Get summary of build
    #[must_use]
    pub fn summary(&self) -> BuildSummary {
        BuildSummary {
            inputs: self.inputs_processed.clone(),
            translations: self.library.len(),
            total_verses: self.library.verse_count_total(),
            warnings: self.warnings.clone(),
        }
    }

    /// Finish the build
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::Empty` if the library holds no books.
    pub fn build(self) -> Result<Library, BuilderError> {
        if self.library.is_empty() {
            return Err(BuilderError::Empty);
        }
        Ok(self.library)
    }
}

fn build_book(
    version: Version,
    book: &str,
    chapters: BTreeMap<String, BTreeMap<String, String>>,
) -> Result<Book, BuilderError> {
    let parse_key = |key: &str| -> Result<u32, BuilderError> {
        match key.trim().parse::<u32>() {
            Ok(n) if n > 0 && key.trim().bytes().all(|b| b.is_ascii_digit()) => Ok(n),
            _ => Err(BuilderError::InvalidKey {
                version,
                book: book.to_string(),
                key: key.to_string(),
            }),
        }
    };

    let mut result = Book::new();
    for (chapter_key, verses) in chapters {
        let chapter = parse_key(&chapter_key)?;
        for (verse_key, text) in verses {
            let verse = parse_key(&verse_key)?;
            result.insert_verse(chapter, verse, text);
        }
    }
    Ok(result)
}

/// Summary of the build process
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub inputs: Vec<InputRecord>,
    pub translations: usize,
    pub total_verses: usize,
    pub warnings: Vec<String>,
}

impl std::fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Library Builder Summary")?;
        writeln!(f, "=======================")?;
        writeln!(f, "Translations: {}", self.translations)?;
        writeln!(f, "Verses:       {}", self.total_verses)?;
        writeln!(f)?;
        writeln!(f, "Inputs:")?;
        for input in &self.inputs {
            writeln!(
                f,
                "  - {} ({}): {} books, {} verses",
                input.source, input.version, input.books, input.verses
            )?;
        }
        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings: {}", self.warnings.len())?;
            for warning in &self.warnings {
                writeln!(f, "  - {warning}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const JOHN: &str = r#"{"John": {"3": {"16": "For God so loved the world", "17": "For God sent not"}}}"#;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_source_format_detection() {
        assert_eq!(
            SourceFormat::from_path(Path::new("kjv.json")),
            Some((SourceFormat::Json, "kjv"))
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("/data/ESV.JSON.GZ")),
            Some((SourceFormat::JsonGz, "ESV"))
        );
        assert_eq!(SourceFormat::from_path(Path::new("kjv.txt")), None);
        assert_eq!(SourceFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_add_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "kjv.json", JOHN);

        let mut builder = LibraryBuilder::new();
        builder.add_file(&path).unwrap();
        let library = builder.build().unwrap();

        let book = library.book(Version::Kjv, &BookName::new("john")).unwrap();
        assert_eq!(book.chapter(3).unwrap().last_verse(), Some(17));
        assert_eq!(library.verse_count_total(), 2);
    }

    #[test]
    fn test_add_gzip_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ylt.json.gz");
        let file = std::fs::File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(JOHN.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let mut builder = LibraryBuilder::new();
        builder.add_file(&path).unwrap();
        let library = builder.build().unwrap();
        assert!(library.book(Version::Ylt, &BookName::new("John")).is_some());
    }

    #[test]
    fn test_unknown_version_file() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "vulgate.json", JOHN);
        let mut builder = LibraryBuilder::new();
        assert!(matches!(
            builder.add_file(&path),
            Err(BuilderError::UnknownVersion(_))
        ));
    }

    #[test]
    fn test_unsupported_file() {
        let mut builder = LibraryBuilder::new();
        assert!(matches!(
            builder.add_file(Path::new("kjv.csv")),
            Err(BuilderError::UnsupportedFile(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "kjv.json", "{\"john\": [1, 2]}");
        let mut builder = LibraryBuilder::new();
        assert!(matches!(
            builder.add_file(&path),
            Err(BuilderError::Json { .. })
        ));
    }

    #[test]
    fn test_invalid_keys() {
        for json in [
            r#"{"john": {"0": {"1": "x"}}}"#,
            r#"{"john": {"1": {"0": "x"}}}"#,
            r#"{"john": {"one": {"1": "x"}}}"#,
            r#"{"john": {"1": {"+2": "x"}}}"#,
        ] {
            let mut builder = LibraryBuilder::new();
            let document = SourceDocument::from_json(json).unwrap();
            assert!(
                matches!(
                    builder.add_document(Version::Kjv, document, "test"),
                    Err(BuilderError::InvalidKey { .. })
                ),
                "expected InvalidKey for {json}"
            );
        }
    }

    #[test]
    fn test_conflict_detection() {
        let mut builder = LibraryBuilder::new();
        builder
            .add_document(Version::Kjv, SourceDocument::from_json(JOHN).unwrap(), "a")
            .unwrap();
        let again = SourceDocument::from_json(r#"{"JOHN": {"1": {"1": "x"}}}"#).unwrap();
        assert!(matches!(
            builder.add_document(Version::Kjv, again, "b"),
            Err(BuilderError::Conflict(_))
        ));

        // Same book in another translation is fine
        builder
            .add_document(Version::Asv, SourceDocument::from_json(JOHN).unwrap(), "c")
            .unwrap();
    }

    #[test]
    fn test_force_replaces() {
        let mut builder = LibraryBuilder::new().force(true);
        builder
            .add_document(Version::Kjv, SourceDocument::from_json(JOHN).unwrap(), "a")
            .unwrap();
        let again = SourceDocument::from_json(r#"{"john": {"1": {"1": "x"}}}"#).unwrap();
        builder.add_document(Version::Kjv, again, "b").unwrap();

        let summary = builder.summary();
        assert_eq!(summary.warnings.len(), 1);
        let library = builder.build().unwrap();
        assert_eq!(library.verse_count_total(), 1);
    }

    #[test]
    fn test_add_dir_skips_other_files() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "kjv.json", JOHN);
        write_file(dir.path(), "asv.json", JOHN);
        write_file(dir.path(), "notes.txt", "not a source");

        let mut builder = LibraryBuilder::new();
        assert_eq!(builder.add_dir(dir.path()).unwrap(), 2);
        let summary = builder.summary();
        assert_eq!(summary.translations, 2);
        assert_eq!(summary.warnings.len(), 1);
        assert!(summary.to_string().contains("Library Builder Summary"));
    }

    #[test]
    fn test_append_to() {
        let mut existing = Library::new();
        existing.insert_book(
            Version::Kjv,
            BookName::new("jude"),
            Book::from_verses([(1, 1, "Jude, the servant")]),
        );

        let mut builder = LibraryBuilder::new().append_to(existing);
        builder
            .add_document(Version::Kjv, SourceDocument::from_json(JOHN).unwrap(), "a")
            .unwrap();
        let library = builder.build().unwrap();
        assert_eq!(library.books(Version::Kjv).len(), 2);
    }

    #[test]
    fn test_empty_build() {
        assert!(matches!(LibraryBuilder::new().build(), Err(BuilderError::Empty)));

        let mut builder = LibraryBuilder::new();
        builder
            .add_document(Version::Kjv, SourceDocument::default(), "empty")
            .unwrap();
        assert!(matches!(builder.build(), Err(BuilderError::Empty)));
    }
}
