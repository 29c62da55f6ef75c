//! Verse text storage and ingestion.
//!
//! The library holds the text of every loaded translation, keyed by version,
//! book, chapter and verse. It is built from per-translation source documents
//! and persisted as a single JSON file.
//!
//! ## Source documents
//!
//! Each translation is one file named after its version (`kjv.json`,
//! `esv.json.gz`, ...) shaped `{ book: { chapter: { verse: text } } }`:
//!
//! ```json
//! {"John": {"3": {"16": "For God so loved the world, ..."}}}
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use lectionary::catalog::builder::LibraryBuilder;
//! use lectionary::catalog::store::Library;
//! use std::path::Path;
//!
//! // Build from a directory of source documents
//! let mut builder = LibraryBuilder::new();
//! builder.add_dir(Path::new("resources/bible")).unwrap();
//! let library = builder.build().unwrap();
//! library.save(Path::new("library.json")).unwrap();
//!
//! // Load it back
//! let library = Library::load_from_file(Path::new("library.json")).unwrap();
//! for (version, translation) in library.versions() {
//!     println!("{version}: {} books", translation.len());
//! }
//! ```

pub mod builder;
pub mod store;
