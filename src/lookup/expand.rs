//! Expansion of parsed segments into concrete coordinates.
//!
//! Chapter lengths are only consulted for `end` bounds and for cross-chapter
//! ranges; a reference made entirely of literal verses never touches the
//! [`ChapterLengthProvider`].

use std::iter;

use thiserror::Error;
use tracing::debug;

use crate::core::book::BookName;
use crate::core::types::{Coordinate, Version};
use crate::lookup::provider::{ChapterLengthProvider, ProviderError};
use crate::parsing::reference::{Segment, VerseBound};
use crate::utils::validation::{check_verse_limit, MAX_EXPANDED_VERSES};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    #[error("No verse count for chapter {chapter}")]
    ChapterNotFound { chapter: u32 },

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Reference expands to more than {0} verses")]
    TooManyVerses(usize),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Expands segments for one book of one translation
pub struct Expander<'a, P: ChapterLengthProvider + ?Sized> {
    provider: &'a P,
    version: Version,
    book: &'a BookName,
    max_verses: usize,
}

impl<'a, P: ChapterLengthProvider + ?Sized> Expander<'a, P> {
    pub fn new(provider: &'a P, version: Version, book: &'a BookName) -> Self {
        Self {
            provider,
            version,
            book,
            max_verses: MAX_EXPANDED_VERSES,
        }
    }

    /// Override the maximum number of coordinates a reference may expand to
    #[must_use]
    pub fn with_limit(mut self, max_verses: usize) -> Self {
        self.max_verses = max_verses;
        self
    }

    /// Last verse number of `chapter`
    ///
    /// # Errors
    ///
    /// Returns `ExpandError::ChapterNotFound` if the provider has no length for
    /// the chapter, or `ExpandError::Provider` if the lookup itself fails.
    pub fn resolve_end(&self, chapter: u32) -> Result<u32, ExpandError> {
        let last = self
            .provider
            .verse_count(self.version, self.book, chapter)?
            .ok_or(ExpandError::ChapterNotFound { chapter })?;
        debug!(
            book = %self.book,
            version = %self.version,
            chapter,
            last_verse = last,
            "Resolved end of chapter"
        );
        Ok(last)
    }

    /// Expand segments in order. Duplicates and overlaps are kept.
    ///
    /// # Errors
    ///
    /// Returns `ExpandError::InvalidRange` for ranges that end before they start,
    /// `ExpandError::TooManyVerses` if the result would exceed the limit,
    /// `ExpandError::ChapterNotFound` if an `end` bound or cross-chapter range
    /// needs a chapter length that is not available, or `ExpandError::Provider`.
    pub fn expand(&self, segments: &[Segment]) -> Result<Vec<Coordinate>, ExpandError> {
        let mut coordinates = Vec::new();
        for segment in segments {
            self.expand_segment(*segment, &mut coordinates)?;
        }
        Ok(coordinates)
    }

    fn expand_segment(
        &self,
        segment: Segment,
        out: &mut Vec<Coordinate>,
    ) -> Result<(), ExpandError> {
        match segment {
            Segment::Single { chapter, verse } => {
                let verse = self.resolve_bound(chapter, verse)?;
                self.check_limit(out.len(), 1)?;
                out.push(Coordinate::new(chapter, verse));
            }
            Segment::Range {
                chapter,
                start,
                end,
            } => {
                let first = self.resolve_bound(chapter, start)?;
                let last = self.resolve_bound(chapter, end)?;
                if first > last {
                    return Err(ExpandError::InvalidRange(format!(
                        "{chapter}:{first}-{last} ends before it starts"
                    )));
                }
                self.check_limit(out.len(), u64::from(last - first) + 1)?;
                out.extend((first..=last).map(|verse| Coordinate::new(chapter, verse)));
            }
            Segment::CrossChapterRange {
                start_chapter,
                start_verse,
                end_chapter,
                end_verse,
            } => {
                for part in split_cross_chapter(start_chapter, start_verse, end_chapter, end_verse)
                {
                    self.expand_segment(part, out)?;
                }
            }
        }
        Ok(())
    }

    fn resolve_bound(&self, chapter: u32, bound: VerseBound) -> Result<u32, ExpandError> {
        match bound {
            VerseBound::Literal(verse) => Ok(verse),
            VerseBound::EndOfChapter => self.resolve_end(chapter),
        }
    }

    fn check_limit(&self, current: usize, additional: u64) -> Result<(), ExpandError> {
        match check_verse_limit(current, additional, self.max_verses) {
            Some(message) => {
                debug!(book = %self.book, "{message}");
                Err(ExpandError::TooManyVerses(self.max_verses))
            }
            None => Ok(()),
        }
    }
}

/// Rewrite `C1:V1-C2:V2` as `C1:V1-end`, every whole chapter strictly
/// between, then `C2:1-V2`. Never yields another cross-chapter segment.
fn split_cross_chapter(
    start_chapter: u32,
    start_verse: VerseBound,
    end_chapter: u32,
    end_verse: VerseBound,
) -> impl Iterator<Item = Segment> {
    let head = Segment::Range {
        chapter: start_chapter,
        start: start_verse,
        end: VerseBound::EndOfChapter,
    };
    let tail = Segment::Range {
        chapter: end_chapter,
        start: VerseBound::Literal(1),
        end: end_verse,
    };
    iter::once(head)
        .chain((start_chapter.saturating_add(1)..end_chapter).map(Segment::whole_chapter))
        .chain(iter::once(tail))
}
