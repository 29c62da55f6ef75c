use tracing::debug;

use crate::core::book::BookName;
use crate::core::types::{Coordinate, ResolvedVerse, Version};
use crate::lookup::assemble::{assemble, assemble_book};
use crate::lookup::expand::Expander;
use crate::lookup::provider::{ChapterLengthProvider, VerseContentProvider};
use crate::lookup::LookupError;
use crate::parsing::query::split_query;
use crate::parsing::reference::parse_reference;
use crate::utils::validation::MAX_EXPANDED_VERSES;

/// Configuration for the lookup engine
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Maximum number of verses a single reference may expand to
    pub max_verses: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            max_verses: MAX_EXPANDED_VERSES,
        }
    }
}

/// The main lookup engine
///
/// Borrows a store that provides both chapter lengths and verse text. The
/// engine holds no mutable state, so one store can serve any number of
/// engines concurrently.
pub struct LookupEngine<'a, S: ?Sized> {
    store: &'a S,
    config: LookupConfig,
}

impl<'a, S> LookupEngine<'a, S>
where
    S: ChapterLengthProvider + VerseContentProvider + ?Sized,
{
    /// Create a new lookup engine with default configuration
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            config: LookupConfig::default(),
        }
    }

    /// Create a new lookup engine with custom configuration
    pub fn with_config(store: &'a S, config: LookupConfig) -> Self {
        Self { store, config }
    }

    /// Resolve a full query such as "John 3:16-18" or "Jude".
    ///
    /// Queries with a chapter/verse tail go through
    /// [`parse_and_resolve`](Self::parse_and_resolve); book-only queries
    /// through [`resolve_book`](Self::resolve_book).
    ///
    /// # Errors
    ///
    /// See [`parse_and_resolve`](Self::parse_and_resolve) and
    /// [`resolve_book`](Self::resolve_book).
    pub fn find(&self, query: &str, version: Version) -> Result<Vec<ResolvedVerse>, LookupError> {
        let query = split_query(query)?;
        debug!(book = %query.book, version = %version, "Found book");

        match query.tail {
            Some(tail) => {
                debug!(verses = %tail, "Searching by verse");
                self.resolve_normalized(&query.book, &tail, version)
            }
            None => self.resolve_normalized_book(&query.book, version),
        }
    }

    /// Resolve a reference tail within a book.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::InvalidFormat` if the book name is empty, the tail
    /// is malformed, a range is reversed, or an `end` bound cannot be resolved;
    /// `LookupError::NotFound` if the book is absent for the version;
    /// `LookupError::TooManyVerses` if the reference expands past the configured
    /// limit; `LookupError::LookupFailure` if the store fails.
    pub fn parse_and_resolve(
        &self,
        book: &str,
        tail: &str,
        version: Version,
    ) -> Result<Vec<ResolvedVerse>, LookupError> {
        let book = normalize_book(book)?;
        self.resolve_normalized(&book, tail, version)
    }

    /// Every stored verse of a book.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::InvalidFormat` if the book name is empty,
    /// `LookupError::NotFound` if the book is absent for the version, or
    /// `LookupError::LookupFailure` if the store fails.
    pub fn resolve_book(&self, book: &str, version: Version) -> Result<Vec<ResolvedVerse>, LookupError> {
        let book = normalize_book(book)?;
        self.resolve_normalized_book(&book, version)
    }

    /// Expand a reference tail into coordinates without fetching any text.
    ///
    /// # Errors
    ///
    /// Same as [`parse_and_resolve`](Self::parse_and_resolve).
    pub fn coordinates(
        &self,
        book: &BookName,
        tail: &str,
        version: Version,
    ) -> Result<Vec<Coordinate>, LookupError> {
        let segments = parse_reference(tail)?;
        debug!(book = %book, segments = segments.len(), "Parsed reference");
        self.ensure_book(book, version)?;

        let coordinates = Expander::new(self.store, version, book)
            .with_limit(self.config.max_verses)
            .expand(&segments)?;
        debug!(book = %book, count = coordinates.len(), "Expanded reference");
        Ok(coordinates)
    }

    fn resolve_normalized(
        &self,
        book: &BookName,
        tail: &str,
        version: Version,
    ) -> Result<Vec<ResolvedVerse>, LookupError> {
        let coordinates = self.coordinates(book, tail, version)?;
        Ok(assemble(self.store, book, version, &coordinates)?)
    }

    fn resolve_normalized_book(
        &self,
        book: &BookName,
        version: Version,
    ) -> Result<Vec<ResolvedVerse>, LookupError> {
        debug!(book = %book, version = %version, "Finding by book");
        assemble_book(self.store, book, version)?.ok_or_else(|| not_found(book, version))
    }

    fn ensure_book(&self, book: &BookName, version: Version) -> Result<(), LookupError> {
        if self.store.contains_book(version, book)? {
            Ok(())
        } else {
            Err(not_found(book, version))
        }
    }
}

fn normalize_book(book: &str) -> Result<BookName, LookupError> {
    let book = BookName::new(book);
    if book.is_empty() {
        return Err(LookupError::InvalidFormat("missing book name".to_string()));
    }
    Ok(book)
}

fn not_found(book: &BookName, version: Version) -> LookupError {
    LookupError::NotFound(format!("book '{book}' in version '{version}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::{Book, Library};
    use crate::lookup::provider::ProviderError;

    fn make_test_library() -> Library {
        let mut library = Library::new();
        library.insert_book(
            Version::Kjv,
            BookName::new("john"),
            Book::from_verses([
                (1, 1, "In the beginning was the Word"),
                (1, 2, "The same was in the beginning with God."),
                (1, 3, "All things were made by him"),
                (2, 1, "And the third day there was a marriage"),
                (2, 2, "And both Jesus was called"),
                (3, 1, "There was a man of the Pharisees"),
                (3, 2, "The same came to Jesus by night"),
                (3, 3, "Jesus answered and said unto him"),
            ]),
        );
        library.insert_book(
            Version::Kjv,
            BookName::new("1 john"),
            Book::from_verses([(4, 8, "He that loveth not knoweth not God")]),
        );
        library.insert_book(
            Version::Ylt,
            BookName::new("john"),
            Book::from_verses([(1, 1, "In the beginning was the Word")]),
        );
        library
    }

    fn labels(verses: &[ResolvedVerse]) -> Vec<&str> {
        verses.iter().map(|v| v.display_name.as_str()).collect()
    }

    #[test]
    fn test_parse_and_resolve_single() {
        let library = make_test_library();
        let engine = LookupEngine::new(&library);
        let verses = engine.parse_and_resolve("John", "1:2", Version::Kjv).unwrap();
        assert_eq!(labels(&verses), vec!["John 1:2"]);
        assert_eq!(verses[0].content, "The same was in the beginning with God.");
        assert_eq!(verses[0].version, Version::Kjv);
    }

    #[test]
    fn test_find_whole_chapter() {
        let library = make_test_library();
        let engine = LookupEngine::new(&library);
        let verses = engine.find("john 2", Version::Kjv).unwrap();
        assert_eq!(labels(&verses), vec!["John 2:1", "John 2:2"]);
    }

    #[test]
    fn test_find_cross_chapter() {
        let library = make_test_library();
        let engine = LookupEngine::new(&library);
        let verses = engine.find("John 1:3-3:1", Version::Kjv).unwrap();
        assert_eq!(
            labels(&verses),
            vec!["John 1:3", "John 2:1", "John 2:2", "John 3:1"]
        );
    }

    #[test]
    fn test_find_numbered_book() {
        let library = make_test_library();
        let engine = LookupEngine::new(&library);
        let verses = engine.find("1 John 4:8", Version::Kjv).unwrap();
        assert_eq!(labels(&verses), vec!["1 John 4:8"]);
        assert_eq!(verses[0].content, "He that loveth not knoweth not God");
    }

    #[test]
    fn test_find_whole_book() {
        let library = make_test_library();
        let engine = LookupEngine::new(&library);
        let verses = engine.find("JOHN", Version::Kjv).unwrap();
        assert_eq!(verses.len(), 8);
        assert_eq!(verses[0].display_name, "John 1:1");
        assert_eq!(verses[7].display_name, "John 3:3");
    }

    #[test]
    fn test_whole_chapter_matches_individual_lookups() {
        let library = make_test_library();
        let engine = LookupEngine::new(&library);
        let whole = engine.parse_and_resolve("john", "1", Version::Kjv).unwrap();
        let individual: Vec<ResolvedVerse> = (1..=3)
            .flat_map(|v| {
                engine
                    .parse_and_resolve("john", &format!("1:{v}"), Version::Kjv)
                    .unwrap()
            })
            .collect();
        assert_eq!(whole, individual);
    }

    #[test]
    fn test_missing_verse_has_empty_content() {
        let library = make_test_library();
        let engine = LookupEngine::new(&library);
        let verses = engine.parse_and_resolve("john", "2:2-3", Version::Kjv).unwrap();
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[1].display_name, "John 2:3");
        assert_eq!(verses[1].content, "");
    }

    #[test]
    fn test_unknown_book_is_not_found() {
        let library = make_test_library();
        let engine = LookupEngine::new(&library);
        assert!(matches!(
            engine.find("Jude 1:3", Version::Kjv),
            Err(LookupError::NotFound(_))
        ));
        assert!(matches!(
            engine.find("Jude", Version::Kjv),
            Err(LookupError::NotFound(_))
        ));
    }

    #[test]
    fn test_unknown_version_is_not_found() {
        let library = make_test_library();
        let engine = LookupEngine::new(&library);
        assert!(matches!(
            engine.find("John 1:1", Version::Unknown),
            Err(LookupError::NotFound(_))
        ));
        assert!(matches!(
            engine.find("John 1:1", Version::Esv),
            Err(LookupError::NotFound(_))
        ));
    }

    #[test]
    fn test_malformed_reference() {
        let library = make_test_library();
        let engine = LookupEngine::new(&library);
        for tail in ["abc:xyz", "1:x", "1:2:3:4", "1:3-1"] {
            assert!(
                matches!(
                    engine.parse_and_resolve("john", tail, Version::Kjv),
                    Err(LookupError::InvalidFormat(_))
                ),
                "expected InvalidFormat for {tail:?}"
            );
        }
        assert!(matches!(
            engine.parse_and_resolve("  ", "1:1", Version::Kjv),
            Err(LookupError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_missing_chapter_length_is_invalid_format() {
        let library = make_test_library();
        let engine = LookupEngine::new(&library);
        assert!(matches!(
            engine.find("John 9", Version::Kjv),
            Err(LookupError::InvalidFormat(_))
        ));
        assert!(matches!(
            engine.find("John 3:1-5:1", Version::Kjv),
            Err(LookupError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_configured_limit() {
        let library = make_test_library();
        let engine = LookupEngine::with_config(&library, LookupConfig { max_verses: 2 });
        assert_eq!(
            engine.find("John 1", Version::Kjv),
            Err(LookupError::TooManyVerses(2))
        );
        assert_eq!(engine.find("John 2", Version::Kjv).unwrap().len(), 2);
    }

    #[test]
    fn test_coordinates() {
        let library = make_test_library();
        let engine = LookupEngine::new(&library);
        let coords = engine
            .coordinates(&BookName::new("john"), "1:2-end 3:3", Version::Kjv)
            .unwrap();
        assert_eq!(
            coords,
            vec![
                Coordinate::new(1, 2),
                Coordinate::new(1, 3),
                Coordinate::new(3, 3)
            ]
        );
    }

    /// A store whose reads always fail
    struct BrokenStore;

    impl ChapterLengthProvider for BrokenStore {
        fn verse_count(
            &self,
            _version: Version,
            _book: &BookName,
            _chapter: u32,
        ) -> Result<Option<u32>, ProviderError> {
            Err(ProviderError::Unavailable("closed".to_string()))
        }
    }

    impl VerseContentProvider for BrokenStore {
        fn contains_book(&self, _version: Version, _book: &BookName) -> Result<bool, ProviderError> {
            Ok(true)
        }

        fn verse(
            &self,
            _version: Version,
            _book: &BookName,
            _coordinate: Coordinate,
        ) -> Result<Option<String>, ProviderError> {
            Err(ProviderError::Corrupted("1:1".to_string()))
        }

        fn book_verses(
            &self,
            _version: Version,
            _book: &BookName,
        ) -> Result<Option<Vec<(Coordinate, String)>>, ProviderError> {
            Err(ProviderError::Unavailable("closed".to_string()))
        }
    }

    #[test]
    fn test_store_failures_are_lookup_failures() {
        let engine = LookupEngine::new(&BrokenStore);
        for query in ["John 1:1", "John 1", "John"] {
            assert!(
                matches!(
                    engine.find(query, Version::Kjv),
                    Err(LookupError::LookupFailure(_))
                ),
                "expected LookupFailure for {query:?}"
            );
        }
    }
}
