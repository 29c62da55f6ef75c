use std::path::PathBuf;

use clap::Args;

use crate::catalog::store::Library;
use crate::cli::{parse_version, OutputFormat};
use crate::core::types::{ResolvedVerse, Version};
use crate::lookup::{LookupConfig, LookupEngine};
use crate::utils::validation::{validate_query, MAX_EXPANDED_VERSES};

#[derive(Args)]
pub struct LookupArgs {
    /// Reference to resolve, e.g. "John 3:16-18" or "1 John 4"
    #[arg(required = true)]
    pub query: String,

    /// Path to the library file
    #[arg(short, long, required = true)]
    pub library: PathBuf,

    /// Translation to read from
    #[arg(short, long, default_value = "niv", value_parser = parse_version)]
    pub translation: Version,

    /// Maximum number of verses a reference may expand to
    #[arg(long, default_value_t = MAX_EXPANDED_VERSES)]
    pub max_verses: usize,
}

/// Execute the lookup command
///
/// # Errors
///
/// Returns an error if the library cannot be loaded or the reference cannot
/// be resolved.
pub fn run(args: LookupArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let query = validate_query(&args.query)?;
    let library = Library::load_from_file(&args.library)?;

    if verbose {
        eprintln!(
            "Loaded library with {} translations ({} verses)",
            library.len(),
            library.verse_count_total()
        );
    }

    let engine = LookupEngine::with_config(
        &library,
        LookupConfig {
            max_verses: args.max_verses,
        },
    );
    let verses = engine.find(query, args.translation)?;

    if verbose {
        eprintln!("Resolved {} verses", verses.len());
    }

    print_verses(&verses, format)
}

fn print_verses(verses: &[ResolvedVerse], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for verse in verses {
                println!("{}  {}", verse.display_name, verse.content);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(verses)?);
        }
        OutputFormat::Tsv => {
            for verse in verses {
                println!("{}", tsv_row(verse));
            }
        }
    }
    Ok(())
}

/// One `label<TAB>content` row
fn tsv_row(verse: &ResolvedVerse) -> String {
    format!(
        "{}\t{}",
        tsv_escape(&verse.display_name),
        tsv_escape(&verse.content)
    )
}

/// Escape characters that would break a TSV row
fn tsv_escape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for c in field.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tsv_escape() {
        assert_eq!(tsv_escape("plain text"), "plain text");
        assert_eq!(tsv_escape("a\tb"), "a\\tb");
        assert_eq!(tsv_escape("line one\nline two\r\n"), "line one\\nline two\\r\\n");
        assert_eq!(tsv_escape("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_tsv_row_has_two_columns() {
        let verse = ResolvedVerse {
            display_name: "Psalms 23:1".to_string(),
            content: "The LORD is my shepherd;\tI shall not want.\nSelah".to_string(),
            version: Version::Kjv,
        };
        let row = tsv_row(&verse);
        assert_eq!(
            row,
            "Psalms 23:1\tThe LORD is my shepherd;\\tI shall not want.\\nSelah"
        );
        assert_eq!(row.split('\t').count(), 2);
        assert!(!row.contains('\n'));
    }
}
