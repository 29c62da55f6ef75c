use serde::{Deserialize, Serialize};

/// Normalized book identifier.
///
/// Book names are matched case-insensitively: the stored form is trimmed,
/// lowercased and has internal whitespace collapsed to single spaces. The
/// name is otherwise opaque; no canon list is consulted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct BookName(String);

impl BookName {
    pub fn new(name: impl AsRef<str>) -> Self {
        let normalized = name
            .as_ref()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        Self(normalized)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display form with the first letter of every word uppercased
    /// ("1 john" -> "1 John", "song of solomon" -> "Song Of Solomon").
    #[must_use]
    pub fn title(&self) -> String {
        self.0
            .split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }
}

impl From<String> for BookName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for BookName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<BookName> for String {
    fn from(book: BookName) -> Self {
        book.0
    }
}

impl std::fmt::Display for BookName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
