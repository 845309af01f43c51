use std::collections::{BTreeMap, HashSet};

use crate::{
    alignment_item::{AlignmentItem, MatchSpan},
    config::AlignConfig,
    sentence::LineRange,
    similarity::{Prepared, Scorer, score_prepared},
};

/// A leftover delete or insert, with its position in the result list.
struct Leftover {
    position: usize,
    index: usize,
    text: String,
    lines: LineRange,
    prepared: Prepared,
}

/// Pairs up leftover deletes and inserts that are not adjacent in the result
/// list.
///
/// A rewritten sentence can end up far from its counterpart when the anchor
/// drifted, so adjacency is not required here; instead a candidate pair must
/// be close either by sentence index or by result position, within the
/// configured window size. Deletes are processed in source order and paired
/// greedily with the most similar admissible insert at or above the
/// threshold, which is not a globally optimal assignment.
pub(super) fn rematch_distant(
    items: Vec<AlignmentItem>,
    scorer: &Scorer<'_>,
    config: &AlignConfig,
) -> Vec<AlignmentItem> {
    let index_range = config.window_size;

    let mut deletes = Vec::new();
    let mut inserts = Vec::new();
    for (position, item) in items.iter().enumerate() {
        match item {
            AlignmentItem::Delete { text, index, lines } => deletes.push(Leftover {
                position,
                index: *index,
                text: text.clone(),
                lines: *lines,
                prepared: scorer.prepare(text),
            }),
            AlignmentItem::Insert { text, index, lines } => inserts.push(Leftover {
                position,
                index: *index,
                text: text.clone(),
                lines: *lines,
                prepared: scorer.prepare(text),
            }),
            _ => {}
        }
    }
    deletes.sort_by_key(|leftover| leftover.index);
    inserts.sort_by_key(|leftover| leftover.index);

    let mut replaced: BTreeMap<usize, AlignmentItem> = BTreeMap::new();
    let mut dropped: HashSet<usize> = HashSet::new();
    let mut taken = vec![false; inserts.len()];

    for delete in &deletes {
        let mut best: Option<(usize, f64)> = None;
        for (candidate, insert) in inserts.iter().enumerate() {
            if taken[candidate] {
                continue;
            }
            let index_close = delete.index.abs_diff(insert.index) <= index_range;
            let position_close = delete.position.abs_diff(insert.position) <= index_range;
            if !index_close && !position_close {
                continue;
            }

            let similarity = score_prepared(&delete.prepared, &insert.prepared);
            if similarity >= config.similarity_threshold
                && best.is_none_or(|(_, top)| similarity > top)
            {
                best = Some((candidate, similarity));
            }
        }

        let Some((candidate, similarity)) = best else {
            continue;
        };
        let insert = &inserts[candidate];
        taken[candidate] = true;

        replaced.insert(
            delete.position,
            AlignmentItem::Match(MatchSpan {
                source_text: delete.text.clone(),
                target_text: insert.text.clone(),
                similarity,
                source_indices: vec![delete.index],
                target_indices: vec![insert.index],
                source_lines: vec![delete.lines],
                target_lines: vec![insert.lines],
            }),
        );
        dropped.insert(insert.position);
    }

    items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| {
            if let Some(replacement) = replaced.remove(&position) {
                Some(replacement)
            } else if dropped.contains(&position) {
                None
            } else {
                Some(item)
            }
        })
        .collect()
}
