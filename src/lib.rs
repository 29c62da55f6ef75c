//! # lectionary
//!
//! A library for resolving human-written scripture references into verse text.
//!
//! A reference like `"Mark 1:1-2:5 4:3"` is split into a book and a tail, the
//! tail is parsed into typed segments, the segments are expanded into
//! concrete `(chapter, verse)` coordinates, and the coordinates are joined
//! with text from a versioned [`Library`].
//!
//! ## Features
//!
//! - **Single verses and ranges**: `3:16`, `3:16-18`
//! - **Whole chapters and books**: `John 3`, `Jude`
//! - **Open-ended ranges**: `3:16-end`
//! - **Shared chapter context**: `1:1-3 5 7-9` stays in chapter 1
//! - **Cross-chapter ranges**: `1:20-3:4` includes chapter 2 whole
//!
//! ## Example
//!
//! ```rust
//! use lectionary::{Book, BookName, Library, LookupEngine, Version};
//!
//! let mut library = Library::new();
//! library.insert_book(
//!     Version::Kjv,
//!     BookName::new("jude"),
//!     Book::from_verses([(1, 1, "Jude, the servant of Jesus Christ"), (1, 2, "Mercy unto you")]),
//! );
//!
//! let engine = LookupEngine::new(&library);
//! for verse in engine.find("Jude 1", Version::Kjv).unwrap() {
//!     println!("{}: {}", verse.display_name, verse.content);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`parsing`]: Query splitting and the reference grammar
//! - [`lookup`]: Range expansion, verse assembly and the lookup engine
//! - [`catalog`]: Verse library storage and ingestion
//! - [`core`]: Core data types for versions, books and coordinates
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: HTTP API

pub mod catalog;
pub mod cli;
pub mod core;
pub mod lookup;
pub mod parsing;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use catalog::store::{Book, Library};
pub use core::book::BookName;
pub use core::types::*;
pub use lookup::{LookupEngine, LookupError};
