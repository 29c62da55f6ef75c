//! Data sources the lookup core depends on.
//!
//! The core never touches storage directly. It asks a [`ChapterLengthProvider`]
//! how long a chapter is (only when resolving `end` or a cross-chapter range)
//! and a [`VerseContentProvider`] for text. [`crate::catalog::store::Library`]
//! implements both.

use thiserror::Error;

use crate::core::book::BookName;
use crate::core::types::{Coordinate, Version};

/// Operational failure of a provider, distinct from "not found"
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupted record: {0}")]
    Corrupted(String),
}

pub trait ChapterLengthProvider {
    /// Number of the last verse in `chapter`, or `None` if the chapter is unknown.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the underlying store cannot be read.
    fn verse_count(
        &self,
        version: Version,
        book: &BookName,
        chapter: u32,
    ) -> Result<Option<u32>, ProviderError>;
}

pub trait VerseContentProvider {
    /// Whether any text is stored for `book` in `version`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the underlying store cannot be read.
    fn contains_book(&self, version: Version, book: &BookName) -> Result<bool, ProviderError>;

    /// Text of a single verse, or `None` if nothing is stored for it.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the underlying store cannot be read.
    fn verse(
        &self,
        version: Version,
        book: &BookName,
        coordinate: Coordinate,
    ) -> Result<Option<String>, ProviderError>;

    /// Every stored verse of a book in the store's native order, or `None`
    /// if the book is absent.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if the underlying store cannot be read.
    fn book_verses(
        &self,
        version: Version,
        book: &BookName,
    ) -> Result<Option<Vec<(Coordinate, String)>>, ProviderError>;
}
