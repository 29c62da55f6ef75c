//! Command-line interface for lectionary.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **lookup**: Resolve a reference such as "John 3:16-18" into verse text
//! - **library**: List, show, or build the verse library
//! - **serve**: Start the HTTP API
//!
//! ## Usage
//!
//! ```text
//! # Build a library from per-translation source files
//! lectionary library build -i resources/bible -o library.json
//!
//! # Look up a reference
//! lectionary lookup "John 3:16-18" --library library.json --translation kjv
//!
//! # JSON output for scripting
//! lectionary lookup "Mark 1:1-2:5 4:3" --library library.json --format json
//!
//! # Start the API
//! lectionary serve --library library.json --port 8080
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::types::Version;

pub mod library;
pub mod lookup;

#[derive(Parser)]
#[command(name = "lectionary")]
#[command(version)]
#[command(about = "Resolve scripture references into verse text")]
#[command(
    long_about = "lectionary turns references like \"John 3:16-18\", \"Matthew 5\" or \"Mark 1:1-2:5 4:3\" into the verses they name.\n\nReferences support:\n- Single verses and verse ranges\n- Whole chapters and whole books\n- Open-ended ranges (\"3:16-end\")\n- Several segments sharing a chapter (\"1:1-3 5 7-9\")\n- Ranges that cross chapters (\"1:20-3:4\")"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a reference into verse text
    Lookup(lookup::LookupArgs),

    /// Manage the verse library
    Library(library::LibraryArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Path to the library file
    #[arg(short, long, required = true)]
    pub library: PathBuf,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Translation used when a request does not name one
    #[arg(long, default_value = "niv", value_parser = parse_version)]
    pub default_translation: Version,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Parse a translation identifier for clap
pub(crate) fn parse_version(s: &str) -> Result<Version, String> {
    s.parse::<Version>().map_err(|e| e.to_string())
}
