//! HTTP API for verse lookups.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! lectionary serve --library library.json
//!
//! # Custom port, another default translation
//! lectionary serve --library library.json --port 3000 --default-translation kjv
//!
//! # Bind to all interfaces
//! lectionary serve --library library.json --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /verse/?q=John+3:16-18&version=kjv` - Resolve a reference into a
//!   JSON array of `{displayName, content, version}`
//! - `GET /api/versions` - List the loaded translations

pub mod server;
