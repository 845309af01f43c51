#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 1-based, inclusive range of physical lines a sentence spans in its
/// document. Produced by the external sentence splitter and carried through
/// the aligner untouched.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self { Self { start, end } }
}

/// A single segmented sentence: its text, its 0-based position within its own
/// sequence, and the lines it came from. The aligner treats the text as
/// opaque; segmentation rules live with the caller.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    text: String,
    index: usize,
    lines: LineRange,
}

impl Sentence {
    #[must_use]
    pub fn new(text: impl Into<String>, index: usize, lines: LineRange) -> Self {
        Self {
            text: text.into(),
            index,
            lines,
        }
    }

    /// Builds an indexed sentence list from already-segmented text, treating
    /// every element as one sentence occupying its own line. Convenient for
    /// embedders that did their own splitting, and for tests.
    pub fn list<I>(texts: I) -> Vec<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                let line = u32::try_from(index).unwrap_or(u32::MAX - 1) + 1;
                Self::new(text, index, LineRange::new(line, line))
            })
            .collect()
    }

    #[must_use]
    pub fn text(&self) -> &str { &self.text }

    #[must_use]
    pub fn index(&self) -> usize { self.index }

    #[must_use]
    pub fn lines(&self) -> LineRange { self.lines }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_list_assigns_indices_and_lines() {
        let sentences = Sentence::list(["第一句。", "第二句。"]);

        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].index(), 0);
        assert_eq!(sentences[0].lines(), LineRange::new(1, 1));
        assert_eq!(sentences[1].index(), 1);
        assert_eq!(sentences[1].lines(), LineRange::new(2, 2));
        assert_eq!(sentences[1].text(), "第二句。");
    }
}
