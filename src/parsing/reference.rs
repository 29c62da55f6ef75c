//! Grammar for the chapter/verse tail of a reference.
//!
//! A tail is a whitespace-separated list of segments. Each segment is one of:
//!
//! | Form          | Example    | Meaning                                    |
//! |---------------|------------|--------------------------------------------|
//! | `C`           | `5`        | whole chapter (first segment only)         |
//! | `V` / `V1-V2` | `4-5`      | verses of the chapter from the previous segment |
//! | `C:V`         | `3:16`     | single verse                               |
//! | `C:V1-V2`     | `3:16-18`  | inclusive verse range                      |
//! | `C1:V1-C2:V2` | `1:1-3:13` | range across chapters                      |
//!
//! Any verse position may be `end`, the last verse of its chapter. Parsing is
//! purely syntactic; `end` stays symbolic until [`crate::lookup::expand`]
//! resolves it against chapter lengths.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Invalid reference format: {0}")]
    InvalidFormat(String),
}

/// Token meaning "the last verse of the chapter"
pub const END_SENTINEL: &str = "end";

/// A verse position before chapter lengths are known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerseBound {
    Literal(u32),
    EndOfChapter,
}

impl std::fmt::Display for VerseBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(n) => write!(f, "{n}"),
            Self::EndOfChapter => write!(f, "{END_SENTINEL}"),
        }
    }
}

/// One parsed segment of a reference tail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Single {
        chapter: u32,
        verse: VerseBound,
    },
    Range {
        chapter: u32,
        start: VerseBound,
        end: VerseBound,
    },
    CrossChapterRange {
        start_chapter: u32,
        start_verse: VerseBound,
        end_chapter: u32,
        end_verse: VerseBound,
    },
}

impl Segment {
    /// Every verse of `chapter`, i.e. `chapter:1-end`
    #[must_use]
    pub fn whole_chapter(chapter: u32) -> Self {
        Self::Range {
            chapter,
            start: VerseBound::Literal(1),
            end: VerseBound::EndOfChapter,
        }
    }

    /// Whether expanding this segment needs chapter-length data
    #[must_use]
    pub fn needs_chapter_lengths(&self) -> bool {
        match self {
            Self::Single { verse, .. } => *verse == VerseBound::EndOfChapter,
            Self::Range { start, end, .. } => {
                *start == VerseBound::EndOfChapter || *end == VerseBound::EndOfChapter
            }
            Self::CrossChapterRange { .. } => true,
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single { chapter, verse } => write!(f, "{chapter}:{verse}"),
            Self::Range {
                chapter,
                start,
                end,
            } => write!(f, "{chapter}:{start}-{end}"),
            Self::CrossChapterRange {
                start_chapter,
                start_verse,
                end_chapter,
                end_verse,
            } => write!(f, "{start_chapter}:{start_verse}-{end_chapter}:{end_verse}"),
        }
    }
}

/// Parse a reference tail ("3:16-18 20", "1:1-2:5") into segments.
///
/// The chapter context is threaded left to right: a segment without its own
/// chapter inherits it, and the first segment, if chapterless, names a whole
/// chapter.
///
/// # Errors
///
/// Returns `ReferenceError::InvalidFormat` if the tail is empty or any
/// segment is malformed. No partial result is returned.
pub fn parse_reference(tail: &str) -> Result<Vec<Segment>, ReferenceError> {
    if tail.trim().is_empty() {
        return Err(ReferenceError::InvalidFormat(
            "empty chapter/verse reference".to_string(),
        ));
    }

    let (_, segments) = tail.split_whitespace().try_fold(
        (None, Vec::new()),
        |(context, mut segments): (Option<u32>, Vec<Segment>), token| {
            let (segment, chapter) = parse_segment(token, context)?;
            segments.push(segment);
            Ok::<_, ReferenceError>((Some(chapter), segments))
        },
    )?;

    Ok(segments)
}

/// Parse one token, returning the segment and the chapter context it leaves behind
fn parse_segment(token: &str, context: Option<u32>) -> Result<(Segment, u32), ReferenceError> {
    let parts: Vec<&str> = token.split(':').collect();

    match (parts.as_slice(), context) {
        ([chapter], None) => {
            let chapter = parse_number(chapter, token)?;
            Ok((Segment::whole_chapter(chapter), chapter))
        }
        ([verses], Some(chapter)) => Ok((parse_verse_spec(chapter, verses, token)?, chapter)),
        ([chapter, verses], _) => {
            let chapter = parse_number(chapter, token)?;
            Ok((parse_verse_spec(chapter, verses, token)?, chapter))
        }
        ([start_chapter, middle, end_verse], _) => {
            let (start_verse, end_chapter) = middle
                .split_once('-')
                .ok_or_else(|| invalid(token, "expected C1:V1-C2:V2"))?;
            let start_chapter = parse_number(start_chapter, token)?;
            let start_verse = parse_bound(start_verse, token)?;
            let end_chapter = parse_number(end_chapter, token)?;
            let end_verse = parse_bound(end_verse, token)?;

            let segment = match start_chapter.cmp(&end_chapter) {
                std::cmp::Ordering::Less => Segment::CrossChapterRange {
                    start_chapter,
                    start_verse,
                    end_chapter,
                    end_verse,
                },
                std::cmp::Ordering::Equal => Segment::Range {
                    chapter: start_chapter,
                    start: start_verse,
                    end: end_verse,
                },
                std::cmp::Ordering::Greater => {
                    return Err(invalid(token, "range ends before it starts"));
                }
            };
            Ok((segment, start_chapter))
        }
        _ => Err(invalid(token, "too many ':' separators")),
    }
}

/// Parse `V` or `V1-V2` within a known chapter
fn parse_verse_spec(chapter: u32, spec: &str, token: &str) -> Result<Segment, ReferenceError> {
    match spec.split_once('-') {
        Some((start, end)) => Ok(Segment::Range {
            chapter,
            start: parse_bound(start, token)?,
            end: parse_bound(end, token)?,
        }),
        None => Ok(Segment::Single {
            chapter,
            verse: parse_bound(spec, token)?,
        }),
    }
}

fn parse_bound(s: &str, token: &str) -> Result<VerseBound, ReferenceError> {
    if s.eq_ignore_ascii_case(END_SENTINEL) {
        Ok(VerseBound::EndOfChapter)
    } else {
        parse_number(s, token).map(VerseBound::Literal)
    }
}

/// Parse a chapter or verse number: ASCII digits only, at least 1
fn parse_number(s: &str, token: &str) -> Result<u32, ReferenceError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(token, &format!("'{s}' is not a number")));
    }
    match s.parse::<u32>() {
        Ok(0) => Err(invalid(token, "chapters and verses start at 1")),
        Ok(n) => Ok(n),
        Err(_) => Err(invalid(token, &format!("'{s}' is out of range"))),
    }
}

fn invalid(token: &str, reason: &str) -> ReferenceError {
    ReferenceError::InvalidFormat(format!("segment '{token}': {reason}"))
}
