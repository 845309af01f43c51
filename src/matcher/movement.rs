use std::collections::HashSet;

use super::thread;
use crate::alignment_item::AlignmentItem;

/// Backstop on the relocation loop. Every relocation removes a block, so
/// this bound is never the thing that stops a real document.
const MAX_RELOCATIONS: usize = 100;

/// Detects moved passages among the matched sentences.
///
/// Single-target matches are grouped into blocks of consecutive target
/// indices, in result order. The smallest block that would reconnect other
/// blocks (bridging a gap between two of them, or extending one) is then
/// relocated: each of its matches splits into a `MoveOut` marker that stays
/// at the source-order slot and a `MoveIn` threaded to the target-order
/// slot. This repeats until no small block can be placed anywhere, leaving
/// the alignment unchanged when nothing moved.
pub(super) fn detect_moves(items: Vec<AlignmentItem>) -> Vec<AlignmentItem> {
    let mut blocks = group_blocks(&items);
    let mut moved: Vec<usize> = Vec::new();

    for _ in 0..MAX_RELOCATIONS {
        if blocks.len() < 2 {
            break;
        }
        let Some((block, placement)) = next_relocation(&blocks) else {
            break;
        };

        let small = blocks.remove(block);
        moved.extend(&small.members);
        let shift = |index: usize| if index > block { index - 1 } else { index };
        match placement {
            Placement::Bridge(previous, next) => {
                // The neighbors border the moved block in target order but
                // can sit in either order in the scan-order list.
                let (first, second) = {
                    let (previous, next) = (shift(previous), shift(next));
                    (previous.min(next), previous.max(next))
                };
                let absorbed = blocks.remove(second);
                let bridged = &mut blocks[first];
                bridged.members.extend(absorbed.members);
                bridged.min = bridged.min.min(absorbed.min);
                bridged.max = bridged.max.max(absorbed.max);
            }
            Placement::Before(neighbor) => blocks[shift(neighbor)].min = small.min,
            Placement::After(neighbor) => blocks[shift(neighbor)].max = small.max,
        }
    }

    if moved.is_empty() {
        return items;
    }
    relocate(items, &moved)
}

/// A run of single-target matches whose target indices are consecutive,
/// bounded by `min..=max`. Relocations extend the range past the member
/// indices when moved content comes to occupy the gap.
struct Block {
    /// Target indices of the member matches, in result order.
    members: Vec<usize>,
    min: usize,
    max: usize,
}

enum Placement {
    /// The block exactly fills the gap between two others.
    Bridge(usize, usize),
    /// The block belongs immediately before its neighbor.
    Before(usize),
    /// The block belongs immediately after its neighbor.
    After(usize),
}

fn group_blocks(items: &[AlignmentItem]) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();

    for item in items {
        let AlignmentItem::Match(span) = item else {
            continue;
        };
        // Merged matches cover several target sentences at once and are not
        // grouped.
        let &[target] = span.target_indices.as_slice() else {
            continue;
        };

        match blocks.last_mut() {
            Some(block) if target == block.max + 1 => {
                block.members.push(target);
                block.max = target;
            }
            _ => blocks.push(Block {
                members: vec![target],
                min: target,
                max: target,
            }),
        }
    }

    blocks
}

/// Finds the first smallest block with a placement among the other blocks.
/// Bridging two blocks is preferred over extending one.
fn next_relocation(blocks: &[Block]) -> Option<(usize, Placement)> {
    let smallest = blocks.iter().map(|block| block.members.len()).min()?;

    for (candidate, small) in blocks.iter().enumerate() {
        if small.members.len() != smallest {
            continue;
        }

        let previous = blocks.iter().position(|block| block.max + 1 == small.min);
        let next = blocks.iter().position(|block| small.max + 1 == block.min);
        match (previous, next) {
            (Some(previous), Some(next)) => {
                return Some((candidate, Placement::Bridge(previous, next)));
            }
            (None, Some(next)) => return Some((candidate, Placement::Before(next))),
            (Some(previous), None) => return Some((candidate, Placement::After(previous))),
            (None, None) => {}
        }
    }

    None
}

/// Splits every match of the relocated blocks into its `MoveOut` and
/// `MoveIn` halves. Move-outs keep their slots; move-ins are threaded by
/// target order exactly like inserts.
fn relocate(items: Vec<AlignmentItem>, moved: &[usize]) -> Vec<AlignmentItem> {
    let moved: HashSet<usize> = moved.iter().copied().collect();

    let mut kept = Vec::with_capacity(items.len());
    let mut pending = Vec::new();
    for item in items {
        match item {
            AlignmentItem::Match(span)
                if matches!(span.target_indices.as_slice(), &[target] if moved.contains(&target)) =>
            {
                let original_target_index = span.target_indices[0];
                let original_source_index = span.source_indices[0];
                kept.push(AlignmentItem::MoveOut {
                    span: span.clone(),
                    original_target_index,
                });
                pending.push(AlignmentItem::MoveIn {
                    span,
                    original_source_index,
                });
            }
            other => kept.push(other),
        }
    }

    thread::weave_by_target(kept, pending)
}
