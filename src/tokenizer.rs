/// A tokenizer capability: takes a sentence and returns its ordered tokens.
/// Injected by the caller for word-granularity similarity; entry points that
/// were not handed one stay at character granularity.
pub type Tokenizer = dyn Fn(&str) -> Vec<String>;

/// Splits on Unicode whitespace, dropping the whitespace itself. A usable
/// word tokenizer for space-delimited scripts.
///
/// ```
/// use collate_text::whitespace_tokenizer;
///
/// assert_eq!(whitespace_tokenizer(" the  cat sat "), vec!["the", "cat", "sat"]);
/// ```
#[must_use]
pub fn whitespace_tokenizer(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}
