#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::alignment_item::{AlignmentItem, ItemKind};

/// Item counts per result kind for a finished alignment. Consumed by report
/// renderers that show a summary row next to the errata table.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignStats {
    pub matches: usize,
    pub deletes: usize,
    pub inserts: usize,
    pub moves_out: usize,
    pub moves_in: usize,
}

impl AlignStats {
    #[must_use]
    pub fn collect(items: &[AlignmentItem]) -> Self {
        let mut stats = Self::default();
        for item in items {
            match item.kind() {
                ItemKind::Match => stats.matches += 1,
                ItemKind::Delete => stats.deletes += 1,
                ItemKind::Insert => stats.inserts += 1,
                ItemKind::MoveOut => stats.moves_out += 1,
                ItemKind::MoveIn => stats.moves_in += 1,
            }
        }

        stats
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.matches + self.deletes + self.inserts + self.moves_out + self.moves_in
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        alignment_item::MatchSpan,
        sentence::LineRange,
    };

    #[test]
    fn test_counts_per_kind() {
        let span = MatchSpan {
            source_text: "甲。".to_owned(),
            target_text: "甲。".to_owned(),
            similarity: 1.0,
            source_indices: vec![0],
            target_indices: vec![0],
            source_lines: vec![LineRange::new(1, 1)],
            target_lines: vec![LineRange::new(1, 1)],
        };
        let items = vec![
            AlignmentItem::Match(span.clone()),
            AlignmentItem::Match(span.clone()),
            AlignmentItem::Delete {
                text: "乙。".to_owned(),
                index: 1,
                lines: LineRange::new(2, 2),
            },
            AlignmentItem::MoveOut {
                span: span.clone(),
                original_target_index: 0,
            },
            AlignmentItem::MoveIn {
                span,
                original_source_index: 0,
            },
        ];

        let stats = AlignStats::collect(&items);

        assert_eq!(
            stats,
            AlignStats {
                matches: 2,
                deletes: 1,
                inserts: 0,
                moves_out: 1,
                moves_in: 1,
            }
        );
        assert_eq!(stats.total(), 5);
    }

    #[test]
    fn test_empty_alignment() {
        assert_eq!(AlignStats::collect(&[]).total(), 0);
    }
}
