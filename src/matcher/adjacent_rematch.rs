use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

use crate::{
    alignment_item::{AlignmentItem, MatchSpan},
    config::AlignConfig,
    sentence::LineRange,
    similarity::{Prepared, Scorer, score_prepared},
};

/// Contiguous pairs are tried for sides of up to this many sentences.
const PAIR_LIMIT: usize = 3;
/// The full concatenation of a side is tried up to this many sentences.
const FULL_LIMIT: usize = 2;

/// Repairs runs of interleaved deletes and inserts left by the first pass.
///
/// A rewritten stretch often shows up as a run of deletes and inserts that
/// really pair with each other, possibly across sentence splits or merges.
/// Within every such run, merged candidates are built on both sides and
/// paired greedily, longest candidate first, at or above the similarity
/// threshold. A consumed pairing becomes one match carrying the concatenated
/// texts and the full provenance of its constituents; unpaired sentences
/// stay as they were.
pub(super) fn rematch_adjacent(
    items: Vec<AlignmentItem>,
    scorer: &Scorer<'_>,
    config: &AlignConfig,
) -> Vec<AlignmentItem> {
    let mut replaced: BTreeMap<usize, AlignmentItem> = BTreeMap::new();
    let mut dropped: HashSet<usize> = HashSet::new();

    for run in unresolved_runs(&items) {
        let mut deletes = Vec::new();
        let mut inserts = Vec::new();
        for position in run {
            match &items[position] {
                AlignmentItem::Delete { .. } => deletes.push(position),
                AlignmentItem::Insert { .. } => inserts.push(position),
                _ => {}
            }
        }
        if deletes.is_empty() || inserts.is_empty() {
            continue;
        }

        let delete_candidates = merge_candidates(&items, &deletes, scorer);
        let insert_candidates = merge_candidates(&items, &inserts, scorer);
        let mut consumed: HashSet<usize> = HashSet::new();

        for delete in &delete_candidates {
            if delete.positions.iter().any(|p| consumed.contains(p)) {
                continue;
            }

            let mut best: Option<(usize, f64)> = None;
            for (candidate, insert) in insert_candidates.iter().enumerate() {
                if insert.positions.iter().any(|p| consumed.contains(p)) {
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
            let insert = &insert_candidates[candidate];
            consumed.extend(delete.positions.iter().copied());
            consumed.extend(insert.positions.iter().copied());

            replaced.insert(
                delete.positions[0],
                AlignmentItem::Match(MatchSpan {
                    source_text: delete.text.clone(),
                    target_text: insert.text.clone(),
                    similarity,
                    source_indices: delete.indices.clone(),
                    target_indices: insert.indices.clone(),
                    source_lines: delete.lines.clone(),
                    target_lines: insert.lines.clone(),
                }),
            );
            dropped.extend(delete.positions.iter().skip(1).copied());
            dropped.extend(insert.positions.iter().copied());
        }
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

/// Maximal runs of consecutive delete/insert items, bounded by resolved
/// items and the list ends.
fn unresolved_runs(items: &[AlignmentItem]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;

    for (position, item) in items.iter().enumerate() {
        let unresolved = matches!(
            item,
            AlignmentItem::Delete { .. } | AlignmentItem::Insert { .. }
        );
        match (unresolved, start) {
            (true, None) => start = Some(position),
            (false, Some(from)) => {
                runs.push(from..position);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(from) = start {
        runs.push(from..items.len());
    }

    runs
}

/// A one-sided merge candidate: one or more same-kind run members viewed as
/// a single concatenated sentence.
struct SideCandidate {
    /// Item positions of the constituents, ascending.
    positions: Vec<usize>,
    text: String,
    indices: Vec<usize>,
    lines: Vec<LineRange>,
    prepared: Prepared,
}

/// Builds the candidates for one side of a run: the full concatenation for
/// small sides, contiguous pairs for slightly larger ones, and always every
/// single item. Sorted longest first so greedy pairing prefers merges.
fn merge_candidates(
    items: &[AlignmentItem],
    positions: &[usize],
    scorer: &Scorer<'_>,
) -> Vec<SideCandidate> {
    let mut candidates = Vec::new();

    if (2..=FULL_LIMIT).contains(&positions.len()) {
        candidates.push(concatenated(items, positions, scorer));
    }
    if positions.len() <= PAIR_LIMIT {
        for pair in positions.windows(2) {
            candidates.push(concatenated(items, pair, scorer));
        }
    }
    for &position in positions {
        candidates.push(concatenated(items, &[position], scorer));
    }

    // A two-item side produces its full merge twice, once as the
    // concatenation and once as the only pair.
    candidates.dedup_by(|a, b| a.positions == b.positions);
    candidates.sort_by(|a, b| b.positions.len().cmp(&a.positions.len()));

    candidates
}

fn concatenated(items: &[AlignmentItem], positions: &[usize], scorer: &Scorer<'_>) -> SideCandidate {
    let mut text = String::new();
    let mut indices = Vec::with_capacity(positions.len());
    let mut lines = Vec::with_capacity(positions.len());

    for &position in positions {
        match &items[position] {
            AlignmentItem::Delete {
                text: sentence,
                index,
                lines: sentence_lines,
            }
            | AlignmentItem::Insert {
                text: sentence,
                index,
                lines: sentence_lines,
            } => {
                text.push_str(sentence);
                indices.push(*index);
                lines.push(*sentence_lines);
            }
            _ => debug_assert!(false, "merge candidates must be deletes or inserts"),
        }
    }

    let prepared = scorer.prepare(&text);
    SideCandidate {
        positions: positions.to_vec(),
        text,
        indices,
        lines,
        prepared,
    }
}
