//! Resolution of parsed references into verse text.
//!
//! This module provides the lookup pipeline:
//!
//! - [`LookupEngine`]: main entry point, composing the steps below
//! - [`expand`]: turns parsed segments into concrete coordinates, resolving
//!   `end` and cross-chapter ranges through a [`ChapterLengthProvider`]
//! - [`assemble`]: joins coordinates with text from a [`VerseContentProvider`]
//!
//! ## Errors
//!
//! Every failure reaches callers as a [`LookupError`]. A chapter length that
//! cannot be found while resolving `end` is reported as `InvalidFormat`: to
//! the caller an unresolvable reference and a malformed one look the same.
//!
//! ## Example
//!
//! ```rust
//! use lectionary::catalog::store::{Book, Library};
//! use lectionary::core::book::BookName;
//! use lectionary::core::types::Version;
//! use lectionary::lookup::LookupEngine;
//!
//! let mut library = Library::new();
//! library.insert_book(
//!     Version::Kjv,
//!     BookName::new("john"),
//!     Book::from_verses([(3, 16, "For God so loved the world"), (3, 17, "For God sent not")]),
//! );
//!
//! let engine = LookupEngine::new(&library);
//! let verses = engine.find("John 3:16-end", Version::Kjv).unwrap();
//! assert_eq!(verses.len(), 2);
//! assert_eq!(verses[0].display_name, "John 3:16");
//! ```
//!
//! [`ChapterLengthProvider`]: provider::ChapterLengthProvider
//! [`VerseContentProvider`]: provider::VerseContentProvider

use thiserror::Error;

use crate::lookup::expand::ExpandError;
use crate::lookup::provider::ProviderError;
use crate::parsing::reference::ReferenceError;

pub mod assemble;
pub mod engine;
pub mod expand;
pub mod provider;

pub use engine::{LookupConfig, LookupEngine};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Invalid reference: {0}")]
    InvalidFormat(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Lookup failed: {0}")]
    LookupFailure(String),

    #[error("Reference expands to more than {0} verses")]
    TooManyVerses(usize),
}

impl From<ReferenceError> for LookupError {
    fn from(err: ReferenceError) -> Self {
        match err {
            ReferenceError::InvalidFormat(msg) => Self::InvalidFormat(msg),
        }
    }
}

impl From<ExpandError> for LookupError {
    fn from(err: ExpandError) -> Self {
        match err {
            ExpandError::ChapterNotFound { chapter } => {
                Self::InvalidFormat(format!("unable to find the verses of chapter {chapter}"))
            }
            ExpandError::InvalidRange(msg) => Self::InvalidFormat(msg),
            ExpandError::TooManyVerses(limit) => Self::TooManyVerses(limit),
            ExpandError::Provider(err) => err.into(),
        }
    }
}

impl From<ProviderError> for LookupError {
    fn from(err: ProviderError) -> Self {
        Self::LookupFailure(err.to_string())
    }
}
