//! Parsers for human-written scripture references.
//!
//! - **Query splitting** ([`query`]): separate "1 John 3:16-18" into the book
//!   ("1 john") and the chapter/verse tail ("3:16-18")
//! - **Reference grammar** ([`reference`]): turn the tail into typed segments
//!
//! ## Example
//!
//! ```rust
//! use lectionary::parsing::query::split_query;
//! use lectionary::parsing::reference::{parse_reference, Segment, VerseBound};
//!
//! let query = split_query("John 3:16-18").unwrap();
//! assert_eq!(query.book.as_str(), "john");
//!
//! let segments = parse_reference(query.tail.as_deref().unwrap()).unwrap();
//! assert_eq!(
//!     segments,
//!     vec![Segment::Range {
//!         chapter: 3,
//!         start: VerseBound::Literal(16),
//!         end: VerseBound::Literal(18),
//!     }]
//! );
//! ```
//!
//! ## Supported Forms
//!
//! | Input           | Coordinates                               |
//! |-----------------|-------------------------------------------|
//! | `3:16`          | 3:16                                      |
//! | `3:16-18`       | 3:16, 3:17, 3:18                          |
//! | `5`             | every verse of chapter 5                  |
//! | `1:20-end`      | 1:20 through the last verse of chapter 1  |
//! | `1:1-2 4-5`     | 1:1, 1:2, 1:4, 1:5                        |
//! | `1:1-3:13`      | 1:1..end, all of chapter 2, 3:1..3:13     |

pub mod query;
pub mod reference;
