use std::ops::Range;

use super::thread;
use crate::{
    alignment_item::{AlignmentItem, MatchSpan},
    config::AlignConfig,
    sentence::Sentence,
    similarity::{Prepared, Scorer, score_prepared},
};

/// A near-miss this similar to some target still drags the anchor towards
/// it, keeping the window localized after a heavily rewritten stretch.
const DRIFT_THRESHOLD: f64 = 0.3;

/// A windowed near-miss above this similarity is promising enough to retry
/// against the whole unused target set.
const RESCUE_THRESHOLD: f64 = 0.5;

/// The greedy anchored first pass.
///
/// Walks the source sentences in order, scanning a window of unused target
/// sentences around the anchor for the best acceptable match. Failures widen
/// the window and eventually escalate to a full scan of the unused targets,
/// which keeps the common case near-linear while still recovering large
/// rearrangements. Unused target sentences become inserts, threaded into the
/// result by target order.
pub(super) fn first_pass(
    source: &[Sentence],
    target: &[Sentence],
    scorer: &Scorer<'_>,
    config: &AlignConfig,
) -> Vec<AlignmentItem> {
    let source_prepared: Vec<Prepared> =
        source.iter().map(|s| scorer.prepare(s.text())).collect();
    let target_prepared: Vec<Prepared> =
        target.iter().map(|t| scorer.prepare(t.text())).collect();

    let mut items = Vec::with_capacity(source.len() + target.len());
    let mut used = vec![false; target.len()];
    let mut anchor = 0_usize;
    let mut consecutive_fails = 0_usize;

    for (source_index, sentence) in source.iter().enumerate() {
        let window = if consecutive_fails >= config.consecutive_fail_threshold {
            let growth = 1 + (consecutive_fails - config.consecutive_fail_threshold) / 2;
            config.window_size * growth.min(config.max_window_expansion)
        } else {
            config.window_size
        };

        let lo = anchor.saturating_sub(window);
        let hi = (anchor + window).min(target.len());
        let mut scan = scan_targets(
            &source_prepared[source_index],
            &target_prepared,
            &used,
            lo..hi,
            config.similarity_threshold,
        );

        if scan.accepted.is_none()
            && escalates_to_global(&scan, window, consecutive_fails, config)
        {
            scan = scan_targets(
                &source_prepared[source_index],
                &target_prepared,
                &used,
                0..target.len(),
                config.similarity_threshold,
            );
        }

        if let Some((target_index, similarity)) = scan.accepted {
            used[target_index] = true;
            anchor = target_index + config.anchor_offset;
            consecutive_fails = 0;
            items.push(AlignmentItem::Match(MatchSpan::single(
                sentence,
                source_index,
                &target[target_index],
                target_index,
                similarity,
            )));
        } else {
            if let Some((near_miss, similarity)) = scan.best {
                if similarity > DRIFT_THRESHOLD {
                    anchor = anchor.max(near_miss);
                }
            }
            consecutive_fails += 1;
            items.push(AlignmentItem::Delete {
                text: sentence.text().to_owned(),
                index: source_index,
                lines: sentence.lines(),
            });
        }
    }

    let inserts = target
        .iter()
        .enumerate()
        .filter(|&(target_index, _)| !used[target_index])
        .map(|(target_index, sentence)| AlignmentItem::Insert {
            text: sentence.text().to_owned(),
            index: target_index,
            lines: sentence.lines(),
        })
        .collect();

    thread::weave_by_target(items, inserts)
}

struct TargetScan {
    /// Highest similarity seen and its index; first-encountered wins ties.
    best: Option<(usize, f64)>,
    /// Highest similarity at or above the acceptance threshold.
    accepted: Option<(usize, f64)>,
}

fn scan_targets(
    needle: &Prepared,
    targets: &[Prepared],
    used: &[bool],
    range: Range<usize>,
    threshold: f64,
) -> TargetScan {
    let mut best: Option<(usize, f64)> = None;
    let mut accepted: Option<(usize, f64)> = None;

    for index in range {
        if used[index] {
            continue;
        }

        let similarity = score_prepared(needle, &targets[index]);
        if best.is_none_or(|(_, top)| similarity > top) {
            best = Some((index, similarity));
        }
        if similarity >= threshold && accepted.is_none_or(|(_, top)| similarity > top) {
            accepted = Some((index, similarity));
        }
    }

    TargetScan { best, accepted }
}

/// Whether a failed windowed scan warrants rescanning the entire unused
/// target set: the window has been failing long enough, has already grown
/// past double width, or saw a promising near-miss right after a failure.
fn escalates_to_global(
    scan: &TargetScan,
    window: usize,
    consecutive_fails: usize,
    config: &AlignConfig,
) -> bool {
    consecutive_fails >= config.consecutive_fail_threshold
        || window >= config.window_size * 2
        || (consecutive_fails >= 1
            && scan.best.is_some_and(|(_, similarity)| similarity > RESCUE_THRESHOLD))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::alignment_item::ItemKind;

    fn kinds(items: &[AlignmentItem]) -> Vec<ItemKind> {
        items.iter().map(AlignmentItem::kind).collect()
    }

    fn pass(source: &[Sentence], target: &[Sentence], config: &AlignConfig) -> Vec<AlignmentItem> {
        first_pass(source, target, &Scorer::for_alignment(config, None), config)
    }

    #[test]
    fn test_identical_sequences_match_in_order() {
        let source = Sentence::list(["他去了北京。", "天气很好。", "我们出发了。"]);
        let config = AlignConfig::default();

        let items = pass(&source, &source, &config);

        assert_eq!(items.len(), 3);
        for (index, item) in items.iter().enumerate() {
            let AlignmentItem::Match(span) = item else {
                panic!("expected a match, got {item}");
            };
            assert_eq!(span.similarity, 1.0);
            assert_eq!(span.source_indices, vec![index]);
            assert_eq!(span.target_indices, vec![index]);
        }
    }

    #[test]
    fn test_inserted_sentence_is_threaded_by_target_order() {
        let source = Sentence::list(["江南的春天。", "细雨绵绵不绝。"]);
        let target = Sentence::list(["江南的春天。", "桃花开了满山。", "细雨绵绵不绝。"]);
        let config = AlignConfig::default();

        let items = pass(&source, &target, &config);

        assert_eq!(
            kinds(&items),
            vec![ItemKind::Match, ItemKind::Insert, ItemKind::Match]
        );
        assert_eq!(items[1].target_indices(), vec![1]);
    }

    #[test]
    fn test_deleted_sentence_stays_in_source_order() {
        let source = Sentence::list(["江南的春天。", "桃花开了满山。", "细雨绵绵不绝。"]);
        let target = Sentence::list(["江南的春天。", "细雨绵绵不绝。"]);
        let config = AlignConfig::default();

        let items = pass(&source, &target, &config);

        assert_eq!(
            kinds(&items),
            vec![ItemKind::Match, ItemKind::Delete, ItemKind::Match]
        );
        assert_eq!(items[1].source_indices(), vec![1]);
    }

    #[test]
    fn test_window_failure_escalates_to_global_search() {
        // 25 unrelated target sentences push the real counterpart far outside
        // every window; the consecutive failures unlock the full scan.
        let source = Sentence::list(["甲一", "乙二", "丙三", "丁四", "戊五戊五戊五"]);
        let mut target_texts: Vec<String> =
            (0..25).map(|i| format!("完全无关的句子{i}")).collect();
        target_texts.push("戊五戊五戊五".to_owned());
        let target = Sentence::list(target_texts);
        let config = AlignConfig::default();

        let items = pass(&source, &target, &config);

        let matched: Vec<_> = items
            .iter()
            .filter_map(|item| match item {
                AlignmentItem::Match(span) => Some(span.target_indices.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(matched, vec![vec![25]]);
        assert_eq!(
            items.iter().filter(|i| i.kind() == ItemKind::Delete).count(),
            4
        );
        assert_eq!(
            items.iter().filter(|i| i.kind() == ItemKind::Insert).count(),
            25
        );
    }

    #[test]
    fn test_trailing_inserts_follow_the_last_match() {
        let source = Sentence::list(["江南的春天。"]);
        let target = Sentence::list(["江南的春天。", "桃花开了。", "细雨来了。"]);
        let config = AlignConfig::default();

        let items = pass(&source, &target, &config);

        assert_eq!(
            kinds(&items),
            vec![ItemKind::Match, ItemKind::Insert, ItemKind::Insert]
        );
        assert_eq!(items[1].target_indices(), vec![1]);
        assert_eq!(items[2].target_indices(), vec![2]);
    }
}
