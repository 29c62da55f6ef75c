//! Split a full reference ("1 John 3:16") into its book and chapter/verse tail.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::book::BookName;
use crate::parsing::reference::ReferenceError;

/// An optional ordinal digit, then letters/spaces/periods/apostrophes for the
/// book; the tail starts at the first later token beginning with a digit.
static QUERY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<book>(?:\d\s*)?\p{L}[\p{L}\s.']*?)(?:\s+(?P<tail>\d.*?))?\s*$").unwrap()
});

/// A reference split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub book: BookName,

    /// Chapter/verse portion, absent for whole-book queries
    pub tail: Option<String>,
}

/// Split a query into book and optional tail
///
/// # Errors
///
/// Returns `ReferenceError::InvalidFormat` if no book name can be found.
pub fn split_query(query: &str) -> Result<Query, ReferenceError> {
    let query = query.trim();
    let captures = QUERY_PATTERN.captures(query).ok_or_else(|| {
        ReferenceError::InvalidFormat(format!("could not find a book name in '{query}'"))
    })?;

    let book = captures
        .name("book")
        .map(|m| BookName::new(m.as_str()))
        .filter(|b| !b.is_empty())
        .ok_or_else(|| ReferenceError::InvalidFormat(format!("missing book name in '{query}'")))?;
    let tail = captures
        .name("tail")
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty());

    Ok(Query { book, tail })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(q: &str) -> (String, Option<String>) {
        let query = split_query(q).unwrap();
        (query.book.as_str().to_string(), query.tail)
    }

    #[test]
    fn test_book_and_tail() {
        assert_eq!(split("John 3:16-18"), ("john".into(), Some("3:16-18".into())));
        assert_eq!(split("Matthew 5"), ("matthew".into(), Some("5".into())));
        assert_eq!(
            split("Mark 1:1-2:5 4:3"),
            ("mark".into(), Some("1:1-2:5 4:3".into()))
        );
    }

    #[test]
    fn test_numbered_books() {
        assert_eq!(split("1 John 4:8"), ("1 john".into(), Some("4:8".into())));
        assert_eq!(split("2Kings 2:11"), ("2kings".into(), Some("2:11".into())));
    }

    #[test]
    fn test_multi_word_books() {
        assert_eq!(
            split("Song of Solomon 2:1"),
            ("song of solomon".into(), Some("2:1".into()))
        );
    }

    #[test]
    fn test_book_only() {
        assert_eq!(split("  Jude  "), ("jude".into(), None));
        assert_eq!(split("1 Peter"), ("1 peter".into(), None));
    }

    #[test]
    fn test_tail_with_end_sentinel() {
        assert_eq!(split("Luke 1:1-end"), ("luke".into(), Some("1:1-end".into())));
    }

    #[test]
    fn test_tail_is_passed_through_unvalidated() {
        // Grammar errors are the reference parser's job
        assert_eq!(split("John 3:x"), ("john".into(), Some("3:x".into())));
    }

    #[test]
    fn test_no_book() {
        assert!(split_query("").is_err());
        assert!(split_query("3:16").is_err());
        assert!(split_query("John abc:xyz").is_err());
    }
}
