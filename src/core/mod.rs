//! Core data types for scripture lookup.
//!
//! - [`BookName`]: normalized, case-insensitive book identifier
//! - [`Version`]: the closed set of supported translations
//! - [`Coordinate`]: a concrete (chapter, verse) pair
//! - [`ResolvedVerse`]: a display-ready verse returned to callers
//!
//! [`BookName`]: book::BookName
//! [`Version`]: types::Version
//! [`Coordinate`]: types::Coordinate
//! [`ResolvedVerse`]: types::ResolvedVerse

pub mod book;
pub mod types;
