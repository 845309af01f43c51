use crate::alignment_item::AlignmentItem;

/// Threads `pending` items into `items` by target order. Each pending item
/// lands immediately after the item owning the nearest smaller target index;
/// pending items chain behind each other when they share that owner, and an
/// item nothing precedes goes to the end of the list.
///
/// The owner index is built once per call instead of rescanning the list for
/// every insertion, which matters when a sweep threads thousands of items.
pub(super) fn weave_by_target(
    items: Vec<AlignmentItem>,
    mut pending: Vec<AlignmentItem>,
) -> Vec<AlignmentItem> {
    if pending.is_empty() {
        return items;
    }

    debug_assert!(
        pending.iter().all(|item| item.target_anchor().is_some()),
        "only target-owning items can be threaded"
    );
    pending.sort_by_key(|item| item.target_anchor());

    // (owned target index, position); target indices are unique.
    let mut owners: Vec<(usize, usize)> = items
        .iter()
        .enumerate()
        .filter_map(|(position, item)| item.target_anchor().map(|index| (index, position)))
        .collect();
    owners.sort_unstable_by_key(|&(index, _)| index);

    let mut buckets: Vec<Vec<AlignmentItem>> = items.iter().map(|_| Vec::new()).collect();
    let mut unowned: Vec<AlignmentItem> = Vec::new();
    for item in pending {
        let index = item.target_anchor().unwrap_or_default();
        let preceding = owners.partition_point(|&(owned, _)| owned < index);
        if preceding == 0 {
            unowned.push(item);
        } else {
            buckets[owners[preceding - 1].1].push(item);
        }
    }

    let mut result = Vec::with_capacity(items.len() + buckets.len());
    for (position, item) in items.into_iter().enumerate() {
        result.push(item);
        result.append(&mut buckets[position]);
    }
    result.append(&mut unowned);

    result
}
