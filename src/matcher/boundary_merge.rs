use crate::{
    alignment_item::{AlignmentItem, MatchSpan},
    similarity::Scorer,
};

/// Absorbs leftover singleton deletes and inserts into a neighboring match.
///
/// A sentence split at a slightly different boundary often leaves a short
/// leftover right next to the match that should contain it. Concatenating
/// the leftover onto the match's own side and rescoring tells whether the
/// absorption improves the pairing; the match's similarity is recomputed on
/// every accepted merge. Both passes run to convergence, so chains of
/// leftovers are absorbed one by one.
pub(super) fn absorb_boundaries(
    items: Vec<AlignmentItem>,
    scorer: &Scorer<'_>,
) -> Vec<AlignmentItem> {
    let items = converge(items, scorer, absorb_delete_at);
    converge(items, scorer, absorb_insert_at)
}

/// A planned absorption: the leftover at one position folds into the match
/// at a neighboring position, which becomes `merged`.
struct Absorption {
    leftover_position: usize,
    match_position: usize,
    merged: MatchSpan,
}

fn converge(
    mut items: Vec<AlignmentItem>,
    scorer: &Scorer<'_>,
    absorb_at: impl Fn(&[AlignmentItem], usize, &Scorer<'_>) -> Option<Absorption>,
) -> Vec<AlignmentItem> {
    loop {
        let Some(absorption) = (0..items.len()).find_map(|p| absorb_at(&items, p, scorer)) else {
            return items;
        };

        items[absorption.match_position] = AlignmentItem::Match(absorption.merged);
        items.remove(absorption.leftover_position);
    }
}

/// Tries to fold the delete at `position` into its previous or next match.
/// The deleted sentence joins the match's source side in document order; the
/// absorption stands only if the rescored similarity strictly improves.
fn absorb_delete_at(
    items: &[AlignmentItem],
    position: usize,
    scorer: &Scorer<'_>,
) -> Option<Absorption> {
    let AlignmentItem::Delete { text, index, lines } = &items[position] else {
        return None;
    };

    let into_previous = neighbor_match(items, position, -1).and_then(|(match_position, span)| {
        let source_text = format!("{}{}", span.source_text, text);
        let similarity = scorer.score(&source_text, &span.target_text);
        (similarity > span.similarity).then(|| Absorption {
            leftover_position: position,
            match_position,
            merged: MatchSpan {
                source_text,
                similarity,
                source_indices: appended(&span.source_indices, *index),
                source_lines: appended(&span.source_lines, *lines),
                ..span.clone()
            },
        })
    });
    let into_next = neighbor_match(items, position, 1).and_then(|(match_position, span)| {
        let source_text = format!("{}{}", text, span.source_text);
        let similarity = scorer.score(&source_text, &span.target_text);
        (similarity > span.similarity).then(|| Absorption {
            leftover_position: position,
            match_position,
            merged: MatchSpan {
                source_text,
                similarity,
                source_indices: prepended(&span.source_indices, *index),
                source_lines: prepended(&span.source_lines, *lines),
                ..span.clone()
            },
        })
    });

    better_of(into_previous, into_next)
}

/// Tries to fold the insert at `position` into its previous or next match.
/// The match's source side does not change here, so a similarity gain alone
/// is complemented by a containment check: an insert whose normalized text
/// is a suffix of the previous match's source (or a prefix of the next
/// match's source) belongs to it even when the raw score does not move.
fn absorb_insert_at(
    items: &[AlignmentItem],
    position: usize,
    scorer: &Scorer<'_>,
) -> Option<Absorption> {
    let AlignmentItem::Insert { text, index, lines } = &items[position] else {
        return None;
    };
    let normalized = scorer.normalized(text);

    let into_previous = neighbor_match(items, position, -1).and_then(|(match_position, span)| {
        let target_text = format!("{}{}", span.target_text, text);
        let similarity = scorer.score(&span.source_text, &target_text);
        let contained =
            !normalized.is_empty() && scorer.normalized(&span.source_text).ends_with(&normalized);
        (similarity > span.similarity || contained).then(|| Absorption {
            leftover_position: position,
            match_position,
            merged: MatchSpan {
                target_text,
                similarity,
                target_indices: appended(&span.target_indices, *index),
                target_lines: appended(&span.target_lines, *lines),
                ..span.clone()
            },
        })
    });
    let into_next = neighbor_match(items, position, 1).and_then(|(match_position, span)| {
        let target_text = format!("{}{}", text, span.target_text);
        let similarity = scorer.score(&span.source_text, &target_text);
        let contained =
            !normalized.is_empty() && scorer.normalized(&span.source_text).starts_with(&normalized);
        (similarity > span.similarity || contained).then(|| Absorption {
            leftover_position: position,
            match_position,
            merged: MatchSpan {
                target_text,
                similarity,
                target_indices: prepended(&span.target_indices, *index),
                target_lines: prepended(&span.target_lines, *lines),
                ..span.clone()
            },
        })
    });

    better_of(into_previous, into_next)
}

fn neighbor_match(
    items: &[AlignmentItem],
    position: usize,
    direction: isize,
) -> Option<(usize, &MatchSpan)> {
    let neighbor = position.checked_add_signed(direction)?;
    match items.get(neighbor) {
        Some(AlignmentItem::Match(span)) => Some((neighbor, span)),
        _ => None,
    }
}

/// The candidate with the higher post-merge similarity; the previous-match
/// candidate wins ties.
fn better_of(previous: Option<Absorption>, next: Option<Absorption>) -> Option<Absorption> {
    match (previous, next) {
        (Some(a), Some(b)) => {
            if b.merged.similarity > a.merged.similarity {
                Some(b)
            } else {
                Some(a)
            }
        }
        (a, b) => a.or(b),
    }
}

fn appended<T: Clone>(values: &[T], value: T) -> Vec<T> {
    let mut result = values.to_vec();
    result.push(value);
    result
}

fn prepended<T: Clone>(values: &[T], value: T) -> Vec<T> {
    let mut result = Vec::with_capacity(values.len() + 1);
    result.push(value);
    result.extend_from_slice(values);
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{alignment_item::ItemKind, config::AlignConfig, sentence::LineRange};

    fn scorer() -> Scorer<'static> {
        Scorer::for_alignment(&AlignConfig::default(), None)
    }

    fn matched(source: &str, target: &str, indices: (usize, usize)) -> AlignmentItem {
        let similarity = scorer().score(source, target);
        AlignmentItem::Match(MatchSpan {
            source_text: source.to_owned(),
            target_text: target.to_owned(),
            similarity,
            source_indices: vec![indices.0],
            target_indices: vec![indices.1],
            source_lines: vec![LineRange::new(1, 1)],
            target_lines: vec![LineRange::new(1, 1)],
        })
    }

    fn delete(text: &str, index: usize) -> AlignmentItem {
        AlignmentItem::Delete {
            text: text.to_owned(),
            index,
            lines: LineRange::new(2, 2),
        }
    }

    fn insert(text: &str, index: usize) -> AlignmentItem {
        AlignmentItem::Insert {
            text: text.to_owned(),
            index,
            lines: LineRange::new(2, 2),
        }
    }

    #[test]
    fn test_delete_folds_into_previous_match() {
        // The source was split after "他去了北"; absorbing the leftover
        // restores the full sentence and lifts the similarity to 1.
        let items = vec![matched("他去了北", "他去了北京。", (0, 0)), delete("京。", 1)];

        let result = absorb_boundaries(items, &scorer());

        assert_eq!(result.len(), 1);
        let AlignmentItem::Match(span) = &result[0] else {
            panic!("expected a match, got {}", result[0]);
        };
        assert_eq!(span.source_text, "他去了北京。");
        assert_eq!(span.similarity, 1.0);
        assert_eq!(span.source_indices, vec![0, 1]);
        assert_eq!(span.source_lines, vec![LineRange::new(1, 1), LineRange::new(2, 2)]);
    }

    #[test]
    fn test_delete_folds_into_next_match() {
        let items = vec![delete("他去了", 0), matched("北京。", "他去了北京。", (1, 0))];

        let result = absorb_boundaries(items, &scorer());

        assert_eq!(result.len(), 1);
        let AlignmentItem::Match(span) = &result[0] else {
            panic!("expected a match, got {}", result[0]);
        };
        assert_eq!(span.source_text, "他去了北京。");
        assert_eq!(span.source_indices, vec![0, 1]);
    }

    #[test]
    fn test_unhelpful_delete_stays() {
        let items = vec![matched("他去了北京。", "他去了北京。", (0, 0)), delete("完全无关。", 1)];

        let result = absorb_boundaries(items, &scorer());

        assert_eq!(
            result.iter().map(AlignmentItem::kind).collect::<Vec<_>>(),
            vec![ItemKind::Match, ItemKind::Delete]
        );
    }

    #[test]
    fn test_insert_folds_by_similarity() {
        let items = vec![matched("他去了北京。", "他去了北", (0, 0)), insert("京。", 1)];

        let result = absorb_boundaries(items, &scorer());

        assert_eq!(result.len(), 1);
        let AlignmentItem::Match(span) = &result[0] else {
            panic!("expected a match, got {}", result[0]);
        };
        assert_eq!(span.target_text, "他去了北京。");
        assert_eq!(span.similarity, 1.0);
        assert_eq!(span.target_indices, vec![0, 1]);
    }

    #[test]
    fn test_insert_folds_by_containment() {
        // The raw score cannot improve on 1.0, but the insert's text is a
        // suffix of the match's source, so it still belongs there.
        let items = vec![
            matched("天气很好。", "天气很好。", (0, 0)),
            insert("很好。", 1),
        ];

        let result = absorb_boundaries(items, &scorer());

        assert_eq!(result.len(), 1);
        let AlignmentItem::Match(span) = &result[0] else {
            panic!("expected a match, got {}", result[0]);
        };
        assert_eq!(span.target_text, "天气很好。很好。");
        assert_eq!(span.target_indices, vec![0, 1]);
    }

    #[test]
    fn test_unrelated_insert_stays() {
        let items = vec![matched("天气很好。", "天气很好。", (0, 0)), insert("完全无关。", 1)];

        let result = absorb_boundaries(items, &scorer());

        assert_eq!(
            result.iter().map(AlignmentItem::kind).collect::<Vec<_>>(),
            vec![ItemKind::Match, ItemKind::Insert]
        );
    }

    #[test]
    fn test_chained_deletes_converge() {
        let items = vec![
            matched("他去", "他去了北京。", (0, 0)),
            delete("了北", 1),
            delete("京。", 2),
        ];

        let result = absorb_boundaries(items, &scorer());

        assert_eq!(result.len(), 1);
        let AlignmentItem::Match(span) = &result[0] else {
            panic!("expected a match, got {}", result[0]);
        };
        assert_eq!(span.source_text, "他去了北京。");
        assert_eq!(span.source_indices, vec![0, 1, 2]);
        assert_eq!(span.similarity, 1.0);
    }
}
