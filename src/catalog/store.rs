use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::book::BookName;
use crate::core::types::{Coordinate, Version};
use crate::lookup::provider::{ChapterLengthProvider, ProviderError, VerseContentProvider};

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Failed to read library: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse library: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to write library: {0}")]
    WriteError(#[source] std::io::Error),

    #[error("Invalid library: {0}")]
    Invalid(String),
}

/// Library format version for compatibility checking
pub const LIBRARY_VERSION: &str = "1.0.0";

/// Serializable library format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryData {
    pub version: String,
    pub created_at: String,
    pub translations: BTreeMap<Version, Translation>,
}

/// Library file as read from disk, before book names are normalized
#[derive(Deserialize)]
struct RawLibraryData {
    version: String,
    translations: BTreeMap<Version, BTreeMap<String, Book>>,
}

/// Verses of one chapter, keyed by verse number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chapter {
    verses: BTreeMap<u32, String>,
}

impl Chapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest stored verse number; this is the chapter length.
    pub fn last_verse(&self) -> Option<u32> {
        self.verses.keys().next_back().copied()
    }

    pub fn verse(&self, verse: u32) -> Option<&str> {
        self.verses.get(&verse).map(String::as_str)
    }

    pub fn insert(&mut self, verse: u32, text: impl Into<String>) -> Option<String> {
        self.verses.insert(verse, text.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.verses.iter().map(|(v, text)| (*v, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}

/// Chapters of one book, keyed by chapter number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Book {
    chapters: BTreeMap<u32, Chapter>,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from `(chapter, verse, text)` triples
    pub fn from_verses<I, S>(verses: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32, S)>,
        S: Into<String>,
    {
        let mut book = Self::new();
        for (chapter, verse, text) in verses {
            book.insert_verse(chapter, verse, text);
        }
        book
    }

    pub fn insert_verse(&mut self, chapter: u32, verse: u32, text: impl Into<String>) {
        self.chapters.entry(chapter).or_default().insert(verse, text);
    }

    pub fn chapter(&self, chapter: u32) -> Option<&Chapter> {
        self.chapters.get(&chapter)
    }

    pub fn chapters(&self) -> impl Iterator<Item = (u32, &Chapter)> {
        self.chapters.iter().map(|(c, chapter)| (*c, chapter))
    }

    /// Total number of stored verses
    pub fn verse_count(&self) -> usize {
        self.chapters.values().map(Chapter::len).sum()
    }

    /// Every stored verse in numeric order
    pub fn verses(&self) -> Vec<(Coordinate, String)> {
        self.chapters
            .iter()
            .flat_map(|(&c, chapter)| {
                chapter
                    .iter()
                    .map(move |(v, text)| (Coordinate::new(c, v), text.to_string()))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.values().all(Chapter::is_empty)
    }

    fn check(&self, version: Version, book: &BookName) -> Result<(), LibraryError> {
        for (&c, chapter) in &self.chapters {
            if c == 0 {
                return Err(LibraryError::Invalid(format!(
                    "{version}/{book}: chapter numbers start at 1"
                )));
            }
            if chapter.verses.contains_key(&0) {
                return Err(LibraryError::Invalid(format!(
                    "{version}/{book} {c}: verse numbers start at 1"
                )));
            }
        }
        Ok(())
    }
}

/// Books of one translation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translation {
    books: BTreeMap<BookName, Book>,
}

impl Translation {
    pub fn book(&self, book: &BookName) -> Option<&Book> {
        self.books.get(book)
    }

    pub fn books(&self) -> impl Iterator<Item = (&BookName, &Book)> {
        self.books.iter()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn verse_count(&self) -> usize {
        self.books.values().map(Book::verse_count).sum()
    }
}

/// The in-memory text store: version, book, chapter, verse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    translations: BTreeMap<Version, Translation>,
}

impl Library {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a library from a JSON file, gzip-compressed if it ends in `.gz`
    pub fn load_from_file(path: &Path) -> Result<Self, LibraryError> {
        let file = std::fs::File::open(path)?;
        let mut content = String::new();
        if path.extension().is_some_and(|ext| ext == "gz") {
            GzDecoder::new(file).read_to_string(&mut content)?;
        } else {
            std::io::BufReader::new(file).read_to_string(&mut content)?;
        }
        let library = Self::from_json(&content)?;
        debug!(
            path = %path.display(),
            translations = library.len(),
            "Loaded library"
        );
        Ok(library)
    }

    /// Parse a library from a JSON string
    pub fn from_json(json: &str) -> Result<Self, LibraryError> {
        let data: RawLibraryData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != LIBRARY_VERSION {
            warn!(
                expected = LIBRARY_VERSION,
                found = %data.version,
                "Library version mismatch"
            );
        }

        if data.translations.contains_key(&Version::Unknown) {
            return Err(LibraryError::Invalid(
                "translation 'unknown' cannot be stored".to_string(),
            ));
        }

        let mut translations = BTreeMap::new();
        for (version, raw_books) in data.translations {
            let mut translation = Translation::default();
            for (raw_name, book) in raw_books {
                let name = BookName::new(&raw_name);
                if name.is_empty() {
                    return Err(LibraryError::Invalid(format!(
                        "{version}: empty book name '{raw_name}'"
                    )));
                }
                book.check(version, &name)?;
                if translation.books.contains_key(&name) {
                    return Err(LibraryError::Invalid(format!(
                        "{version}: book '{name}' appears more than once"
                    )));
                }
                translation.books.insert(name, book);
            }
            translations.insert(version, translation);
        }

        Ok(Self { translations })
    }

    /// Export library to JSON
    pub fn to_json(&self) -> Result<String, LibraryError> {
        let data = LibraryData {
            version: LIBRARY_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            translations: self.translations.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Write the library to `path`, replacing any existing file atomically
    pub fn save(&self, path: &Path) -> Result<(), LibraryError> {
        let json = self.to_json()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(LibraryError::WriteError)?;
        file.write_all(json.as_bytes())
            .map_err(LibraryError::WriteError)?;
        file.persist(path)
            .map_err(|e| LibraryError::WriteError(e.error))?;
        debug!(path = %path.display(), "Saved library");
        Ok(())
    }

    /// Add or replace a book, returning the one it replaced
    pub fn insert_book(&mut self, version: Version, name: BookName, book: Book) -> Option<Book> {
        self.translations
            .entry(version)
            .or_default()
            .books
            .insert(name, book)
    }

    /// Merge every book of `other` into this library; `other` wins on conflict
    pub fn extend(&mut self, other: Library) {
        for (version, translation) in other.translations {
            for (name, book) in translation.books {
                self.insert_book(version, name, book);
            }
        }
    }

    pub fn translation(&self, version: Version) -> Option<&Translation> {
        self.translations.get(&version)
    }

    pub fn book(&self, version: Version, book: &BookName) -> Option<&Book> {
        self.translation(version).and_then(|t| t.book(book))
    }

    /// Books of a translation in name order; empty if the translation is absent
    pub fn books(&self, version: Version) -> Vec<&BookName> {
        self.translation(version)
            .map(|t| t.books.keys().collect())
            .unwrap_or_default()
    }

    pub fn versions(&self) -> impl Iterator<Item = (Version, &Translation)> {
        self.translations.iter().map(|(v, t)| (*v, t))
    }

    /// Number of translations in the library
    pub fn len(&self) -> usize {
        self.translations.len()
    }

    /// Check if library is empty
    pub fn is_empty(&self) -> bool {
        self.translations.values().all(Translation::is_empty)
    }

    /// Number of verses across every translation
    pub fn verse_count_total(&self) -> usize {
        self.translations.values().map(Translation::verse_count).sum()
    }
}

impl ChapterLengthProvider for Library {
    fn verse_count(
        &self,
        version: Version,
        book: &BookName,
        chapter: u32,
    ) -> Result<Option<u32>, ProviderError> {
        Ok(self
            .book(version, book)
            .and_then(|b| b.chapter(chapter))
            .and_then(Chapter::last_verse))
    }
}

impl VerseContentProvider for Library {
    fn contains_book(&self, version: Version, book: &BookName) -> Result<bool, ProviderError> {
        Ok(self.book(version, book).is_some())
    }

    fn verse(
        &self,
        version: Version,
        book: &BookName,
        coordinate: Coordinate,
    ) -> Result<Option<String>, ProviderError> {
        Ok(self
            .book(version, book)
            .and_then(|b| b.chapter(coordinate.chapter))
            .and_then(|c| c.verse(coordinate.verse))
            .map(str::to_string))
    }

    fn book_verses(
        &self,
        version: Version,
        book: &BookName,
    ) -> Result<Option<Vec<(Coordinate, String)>>, ProviderError> {
        Ok(self.book(version, book).map(Book::verses))
    }
}
