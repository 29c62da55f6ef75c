use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::catalog::builder::LibraryBuilder;
use crate::catalog::store::Library;
use crate::cli::{parse_version, OutputFormat};
use crate::core::book::BookName;
use crate::core::types::Version;

#[derive(Args)]
pub struct LibraryArgs {
    #[command(subcommand)]
    pub command: LibraryCommands,
}

#[derive(Subcommand)]
pub enum LibraryCommands {
    /// List the translations in the library
    List {
        /// Path to the library file
        #[arg(short, long, required = true)]
        library: PathBuf,
    },

    /// Show the chapters of a book
    Show {
        /// Book name (e.g., "1 John")
        #[arg(required = true)]
        book: String,

        /// Path to the library file
        #[arg(short, long, required = true)]
        library: PathBuf,

        /// Translation to show
        #[arg(short, long, default_value = "niv", value_parser = parse_version)]
        translation: Version,
    },

    /// Build a library from per-translation source files
    Build {
        /// Input file(s) or directories - can be specified multiple times
        /// Files must be named <version>.json or <version>.json.gz
        #[arg(short, long = "input", required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Output file (JSON). If not specified, prints to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Append to existing library file
        #[arg(long)]
        append_to: Option<PathBuf>,

        /// Replace books that are already present
        #[arg(long)]
        force: bool,
    },
}

#[derive(Serialize)]
struct TranslationSummary {
    id: Version,
    books: usize,
    verses: usize,
}

#[derive(Serialize)]
struct ChapterSummary {
    chapter: u32,
    verses: usize,
    last_verse: Option<u32>,
}

/// Execute library subcommands
///
/// # Errors
///
/// Returns an error if a library or input cannot be read, or the build fails.
pub fn run(args: LibraryArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        LibraryCommands::List { library } => run_list(library, format, verbose),
        LibraryCommands::Show {
            book,
            library,
            translation,
        } => run_show(&book, library, translation, format),
        LibraryCommands::Build {
            inputs,
            output,
            append_to,
            force,
        } => run_build(inputs, output, append_to, force, format, verbose),
    }
}

fn run_list(library_path: PathBuf, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let library = Library::load_from_file(&library_path)?;

    if verbose {
        eprintln!("Loaded library with {} translations", library.len());
    }

    let summaries: Vec<TranslationSummary> = library
        .versions()
        .map(|(id, translation)| TranslationSummary {
            id,
            books: translation.len(),
            verses: translation.verse_count(),
        })
        .collect();

    match format {
        OutputFormat::Text => {
            println!("Verse Library ({} translations)\n", summaries.len());
            println!("{:<10} {:>8} {:>10}", "Version", "Books", "Verses");
            println!("{}", "-".repeat(30));
            for s in &summaries {
                println!("{:<10} {:>8} {:>10}", s.id, s.books, s.verses);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "count": summaries.len(),
                "versions": summaries,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("version\tbooks\tverses");
            for s in &summaries {
                println!("{}\t{}\t{}", s.id, s.books, s.verses);
            }
        }
    }

    Ok(())
}

fn run_show(
    book: &str,
    library_path: PathBuf,
    translation: Version,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let library = Library::load_from_file(&library_path)?;
    let name = BookName::new(book);

    let Some(stored) = library.book(translation, &name) else {
        anyhow::bail!("Book '{}' not found in {}", book, translation);
    };

    let chapters: Vec<ChapterSummary> = stored
        .chapters()
        .map(|(chapter, c)| ChapterSummary {
            chapter,
            verses: c.len(),
            last_verse: c.last_verse(),
        })
        .collect();

    match format {
        OutputFormat::Text => {
            println!("Book:        {}", name.title());
            println!("Translation: {translation}");
            println!("Chapters:    {}", chapters.len());
            println!("Verses:      {}", stored.verse_count());
            println!("\n{:<10} {:>8} {:>12}", "Chapter", "Verses", "Last verse");
            println!("{}", "-".repeat(32));
            for c in &chapters {
                let last = c.last_verse.map_or_else(|| "-".to_string(), |v| v.to_string());
                println!("{:<10} {:>8} {:>12}", c.chapter, c.verses, last);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "book": name.title(),
                "translation": translation,
                "chapters": chapters,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("chapter\tverses\tlast_verse");
            for c in &chapters {
                println!(
                    "{}\t{}\t{}",
                    c.chapter,
                    c.verses,
                    c.last_verse.map_or_else(String::new, |v| v.to_string())
                );
            }
        }
    }

    Ok(())
}

fn run_build(
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    append_to: Option<PathBuf>,
    force: bool,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let mut builder = LibraryBuilder::new().force(force);

    if let Some(path) = &append_to {
        if path.exists() {
            builder = builder.append_to(Library::load_from_file(path)?);
        }
    }

    for input_path in &inputs {
        if !input_path.exists() {
            anyhow::bail!("Input file not found: {}", input_path.display());
        }

        if verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        builder.add_input(input_path)?;
    }

    let summary = builder.summary();
    let library = builder.build()?;

    if verbose || matches!(format, OutputFormat::Text) {
        eprintln!("{summary}");
    }

    // Appending rewrites the existing file unless an explicit output is given
    if let Some(library_path) = output.or(append_to) {
        library.save(&library_path)?;
        println!(
            "Wrote {} translations ({} verses) to {}",
            library.len(),
            library.verse_count_total(),
            library_path.display()
        );
    } else {
        println!("{}", library.to_json()?);
    }

    Ok(())
}
