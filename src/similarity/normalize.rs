use crate::config::NormalizeOptions;

/// Footnote references longer than this many digits are treated as prose.
const MAX_MARKER_DIGITS: usize = 4;

/// Produces the comparison form of a sentence. Always trims; every other
/// transform is applied only when its option is set. Pure and deterministic.
///
/// ```
/// use collate_text::{NormalizeOptions, normalize};
///
/// let opts = NormalizeOptions::default();
/// assert_eq!(normalize(" 他 去了\t北京。\n", &opts), "他去了北京。");
/// ```
#[must_use]
pub fn normalize(text: &str, opts: &NormalizeOptions) -> String {
    let trimmed = text.trim();
    let without_markers = if opts.strip_footnote_markers {
        strip_footnote_markers(trimmed)
    } else {
        trimmed.to_owned()
    };

    without_markers
        .chars()
        .filter(|&c| {
            !(opts.strip_inner_whitespace && c.is_whitespace()
                || opts.strip_punctuation && is_punctuation(c)
                || opts.strip_digits && c.is_numeric()
                || opts.strip_latin && is_latin(c))
        })
        .collect()
}

/// Removes inline footnote references: short numeric bracket groups
/// (`[3]`, `［3］`, `【3】`, `〔3〕`) and caret references (`^3`, `^[3]`).
fn strip_footnote_markers(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());

    let mut i = 0;
    while i < chars.len() {
        match marker_len(&chars[i..]) {
            Some(skip) => i += skip,
            None => {
                result.push(chars[i]);
                i += 1;
            }
        }
    }

    result
}

/// Length in chars of the footnote marker starting at `rest[0]`, if any.
fn marker_len(rest: &[char]) -> Option<usize> {
    let closing = match rest.first()? {
        '[' => ']',
        '［' => '］',
        '【' => '】',
        '〔' => '〕',
        '^' => return caret_marker_len(rest),
        _ => return None,
    };

    bracket_marker_len(rest, 1, closing)
}

/// Matches `1..=MAX_MARKER_DIGITS` numeric chars followed by `closing`,
/// starting at `rest[open_len]`. Returns the total marker length.
fn bracket_marker_len(rest: &[char], open_len: usize, closing: char) -> Option<usize> {
    let mut len = open_len;
    for &c in rest.iter().skip(open_len).take(MAX_MARKER_DIGITS + 1) {
        len += 1;
        if c == closing {
            return (len > open_len + 1).then_some(len);
        }
        if !c.is_numeric() {
            return None;
        }
    }

    None
}

fn caret_marker_len(rest: &[char]) -> Option<usize> {
    if rest.get(1) == Some(&'[') {
        return bracket_marker_len(rest, 2, ']');
    }

    let digits = rest
        .iter()
        .skip(1)
        .take_while(|c| c.is_numeric())
        .count();
    (1..=MAX_MARKER_DIGITS).contains(&digits).then_some(1 + digits)
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(c,
            '\u{2000}'..='\u{206F}'     // general punctuation, quotes, dashes
            | '\u{3000}'..='\u{303F}'   // CJK symbols and punctuation
            | '\u{FE30}'..='\u{FE4F}'   // vertical and compatibility forms
            | '\u{FF01}'..='\u{FF0F}'   // full-width ASCII punctuation blocks
            | '\u{FF1A}'..='\u{FF20}'
            | '\u{FF3B}'..='\u{FF40}'
            | '\u{FF5B}'..='\u{FF65}')
}

fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '\u{FF21}'..='\u{FF3A}' | '\u{FF41}'..='\u{FF5A}')
}
