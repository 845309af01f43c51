mod adjacent_rematch;
mod anchor;
mod boundary_merge;
mod movement;
mod nonadjacent_rematch;
mod thread;

use crate::{
    alignment_item::AlignmentItem,
    config::{AlignConfig, ConfigError},
    sentence::Sentence,
    similarity::Scorer,
    tokenizer::Tokenizer,
};

/// Aligns an original sentence sequence against a revised one, producing the
/// full errata item list.
///
/// The greedy anchored first pass is repaired by four corrective passes, in
/// order: merging interleaved delete/insert runs, pairing distant leftovers,
/// absorbing stray sentences into neighboring matches, and detecting moved
/// blocks. Each pass consumes and produces a complete item list; the result
/// covers every source and every target sentence exactly once.
///
/// Similarity is scored at character granularity. Use
/// [`align_with_tokenizer`] when word granularity is configured.
///
/// # Errors
///
/// Returns a [`ConfigError`] when the configuration is invalid; no matching
/// work happens in that case.
pub fn align(
    source: &[Sentence],
    target: &[Sentence],
    config: &AlignConfig,
) -> Result<Vec<AlignmentItem>, ConfigError> {
    config.validate()?;

    Ok(run(source, target, &Scorer::for_alignment(config, None), config))
}

/// Same as [`align`], with a tokenizer capability injected for
/// word-granularity similarity.
///
/// # Errors
///
/// Returns a [`ConfigError`] when the configuration is invalid.
pub fn align_with_tokenizer(
    source: &[Sentence],
    target: &[Sentence],
    config: &AlignConfig,
    tokenizer: &Tokenizer,
) -> Result<Vec<AlignmentItem>, ConfigError> {
    config.validate()?;

    Ok(run(
        source,
        target,
        &Scorer::for_alignment(config, Some(tokenizer)),
        config,
    ))
}

fn run(
    source: &[Sentence],
    target: &[Sentence],
    scorer: &Scorer<'_>,
    config: &AlignConfig,
) -> Vec<AlignmentItem> {
    let items = anchor::first_pass(source, target, scorer, config);
    let items = adjacent_rematch::rematch_adjacent(items, scorer, config);
    let items = nonadjacent_rematch::rematch_distant(items, scorer, config);
    let items = boundary_merge::absorb_boundaries(items, scorer);
    movement::detect_moves(items)
}
