//! Joining coordinates with stored text.

use tracing::debug;

use crate::core::book::BookName;
use crate::core::types::{Coordinate, ResolvedVerse, Version};
use crate::lookup::provider::{ProviderError, VerseContentProvider};

/// Build one `ResolvedVerse` per coordinate, in order.
///
/// Coordinates without stored text produce an entry with empty content rather
/// than being dropped.
///
/// # Errors
///
/// Returns `ProviderError` if the provider fails; no partial result is returned.
pub fn assemble<P: VerseContentProvider + ?Sized>(
    provider: &P,
    book: &BookName,
    version: Version,
    coordinates: &[Coordinate],
) -> Result<Vec<ResolvedVerse>, ProviderError> {
    let display_book = book.title();
    let verses = coordinates
        .iter()
        .map(|&coordinate| {
            let content = provider.verse(version, book, coordinate)?.unwrap_or_default();
            Ok(ResolvedVerse {
                display_name: display_label(&display_book, coordinate),
                content,
                version,
            })
        })
        .collect::<Result<Vec<_>, ProviderError>>()?;

    debug!(book = %book, count = verses.len(), "Assembled verses");
    Ok(verses)
}

/// Every stored verse of a book, in the provider's native order.
///
/// Returns `None` if the provider has no such book.
///
/// # Errors
///
/// Returns `ProviderError` if the provider fails.
pub fn assemble_book<P: VerseContentProvider + ?Sized>(
    provider: &P,
    book: &BookName,
    version: Version,
) -> Result<Option<Vec<ResolvedVerse>>, ProviderError> {
    let Some(stored) = provider.book_verses(version, book)? else {
        return Ok(None);
    };

    let display_book = book.title();
    let verses = stored
        .into_iter()
        .map(|(coordinate, content)| ResolvedVerse {
            display_name: display_label(&display_book, coordinate),
            content,
            version,
        })
        .collect();
    Ok(Some(verses))
}

fn display_label(display_book: &str, coordinate: Coordinate) -> String {
    format!("{display_book} {coordinate}")
}
