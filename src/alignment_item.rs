use core::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sentence::{LineRange, Sentence};

/// The matched payload shared by [`AlignmentItem::Match`] and the two move
/// markers. The index and line lists hold one entry per original sentence,
/// kept parallel and in document order; they only grow past one element
/// through merges.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSpan {
    pub source_text: String,
    pub target_text: String,
    pub similarity: f64,
    pub source_indices: Vec<usize>,
    pub target_indices: Vec<usize>,
    pub source_lines: Vec<LineRange>,
    pub target_lines: Vec<LineRange>,
}

impl MatchSpan {
    /// A span pairing exactly one source sentence with one target sentence.
    pub(crate) fn single(
        source: &Sentence,
        source_index: usize,
        target: &Sentence,
        target_index: usize,
        similarity: f64,
    ) -> Self {
        Self {
            source_text: source.text().to_owned(),
            target_text: target.text().to_owned(),
            similarity,
            source_indices: vec![source_index],
            target_indices: vec![target_index],
            source_lines: vec![source.lines()],
            target_lines: vec![target.lines()],
        }
    }
}

/// One entry of a finished alignment.
///
/// A full alignment covers every source sentence exactly once (through
/// `Match`, `Delete`, or a `MoveOut`/`MoveIn` pair) and every target sentence
/// exactly once (through `Match`, `Insert`, or the same pair). Items are
/// ordered by source-document order, with inserts and move-ins threaded in at
/// the position their target order implies.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum AlignmentItem {
    /// One or more source sentences paired with one or more target sentences.
    Match(MatchSpan),

    /// A source sentence with no counterpart in the target.
    Delete {
        text: String,
        index: usize,
        lines: LineRange,
    },

    /// A target sentence with no counterpart in the source.
    Insert {
        text: String,
        index: usize,
        lines: LineRange,
    },

    /// The source-order slot of a relocated match; records where the content
    /// went in the target.
    MoveOut {
        span: MatchSpan,
        original_target_index: usize,
    },

    /// The target-order slot of a relocated match; records where the content
    /// came from in the source.
    MoveIn {
        span: MatchSpan,
        original_source_index: usize,
    },
}

/// Discriminant of an [`AlignmentItem`], used for counting and reporting.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Match,
    Delete,
    Insert,
    MoveOut,
    MoveIn,
}

impl AlignmentItem {
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match self {
            AlignmentItem::Match(_) => ItemKind::Match,
            AlignmentItem::Delete { .. } => ItemKind::Delete,
            AlignmentItem::Insert { .. } => ItemKind::Insert,
            AlignmentItem::MoveOut { .. } => ItemKind::MoveOut,
            AlignmentItem::MoveIn { .. } => ItemKind::MoveIn,
        }
    }

    /// The source-sentence indices this item accounts for. A relocation is
    /// reported on its `MoveOut` half only, so summing over a full alignment
    /// counts every source sentence exactly once.
    #[must_use]
    pub fn source_indices(&self) -> Vec<usize> {
        match self {
            AlignmentItem::Match(span) | AlignmentItem::MoveOut { span, .. } => {
                span.source_indices.clone()
            }
            AlignmentItem::Delete { index, .. } => vec![*index],
            AlignmentItem::Insert { .. } | AlignmentItem::MoveIn { .. } => Vec::new(),
        }
    }

    /// The target-sentence indices this item accounts for. A relocation is
    /// reported on its `MoveIn` half only, mirroring [`Self::source_indices`].
    #[must_use]
    pub fn target_indices(&self) -> Vec<usize> {
        match self {
            AlignmentItem::Match(span) | AlignmentItem::MoveIn { span, .. } => {
                span.target_indices.clone()
            }
            AlignmentItem::Insert { index, .. } => vec![*index],
            AlignmentItem::Delete { .. } | AlignmentItem::MoveOut { .. } => Vec::new(),
        }
    }

    /// The greatest target index this item owns at its current result slot.
    /// Drives target-order threading; `Delete` and `MoveOut` own none.
    pub(crate) fn target_anchor(&self) -> Option<usize> {
        match self {
            AlignmentItem::Match(span) | AlignmentItem::MoveIn { span, .. } => {
                span.target_indices.last().copied()
            }
            AlignmentItem::Insert { index, .. } => Some(*index),
            AlignmentItem::Delete { .. } | AlignmentItem::MoveOut { .. } => None,
        }
    }
}

impl Display for AlignmentItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let escape = |text: &str| text.replace('\n', "\\n");

        match self {
            AlignmentItem::Match(span) => write!(
                f,
                "<match '{}' ~ '{}' ({:.2})>",
                escape(&span.source_text),
                escape(&span.target_text),
                span.similarity
            ),
            AlignmentItem::Delete { text, index, .. } => {
                write!(f, "<delete '{}' at {}>", escape(text), index)
            }
            AlignmentItem::Insert { text, index, .. } => {
                write!(f, "<insert '{}' at {}>", escape(text), index)
            }
            AlignmentItem::MoveOut {
                span,
                original_target_index,
            } => write!(
                f,
                "<move-out '{}' (target {})>",
                escape(&span.source_text),
                original_target_index
            ),
            AlignmentItem::MoveIn {
                span,
                original_source_index,
            } => write!(
                f,
                "<move-in '{}' (source {})>",
                escape(&span.target_text),
                original_source_index
            ),
        }
    }
}
