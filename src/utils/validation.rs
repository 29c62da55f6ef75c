//! Centralized validation and helper functions.

/// Maximum number of coordinates a single reference may expand to (DOS protection).
///
/// The longest translations hold roughly 31,000 verses, so any legitimate
/// request fits well below this.
pub const MAX_EXPANDED_VERSES: usize = 50_000;

/// Security-related constants for input validation
pub const MAX_QUERY_LENGTH: usize = 512;

/// Check if expanding `additional` more coordinates would exceed `limit`.
///
/// Call this with the current count BEFORE materializing a range.
/// Returns an error message if the expansion would exceed the limit, None if safe.
///
/// # Example
/// ```
/// use lectionary::utils::validation::check_verse_limit;
///
/// assert!(check_verse_limit(10, 5, 100).is_none());
/// assert!(check_verse_limit(90, 20, 100).is_some());
/// ```
#[must_use]
pub fn check_verse_limit(current: usize, additional: u64, limit: usize) -> Option<String> {
    let total = u64::try_from(current)
        .unwrap_or(u64::MAX)
        .saturating_add(additional);
    if total > u64::try_from(limit).unwrap_or(u64::MAX) {
        Some(format!(
            "Too many verses: reference expands to {total}, maximum is {limit}"
        ))
    } else {
        None
    }
}

/// Query validation error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Empty query provided")]
    EmptyQuery,
    #[error("Query too long: exceeds {MAX_QUERY_LENGTH} characters")]
    QueryTooLong,
    #[error("Query contains control characters")]
    InvalidCharacters,
}

/// Validate a raw reference query before it reaches the parser
///
/// Returns the trimmed query.
///
/// # Errors
///
/// Returns `ValidationError::EmptyQuery` if the query is blank,
/// `ValidationError::QueryTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidCharacters` if it contains control characters
/// other than ordinary whitespace.
pub fn validate_query(query: &str) -> Result<&str, ValidationError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }

    if trimmed.len() > MAX_QUERY_LENGTH {
        return Err(ValidationError::QueryTooLong);
    }

    if trimmed
        .chars()
        .any(|c| c.is_control() && c != ' ' && c != '\t')
    {
        return Err(ValidationError::InvalidCharacters);
    }

    Ok(trimmed)
}
