use crate::stemmer::StemAlgorithm;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<.*?>").expect("valid regex");
    static ref SPLIT_RE: Regex = Regex::new(r"[^0-9a-z]+").expect("valid regex");
}

/// Tokenize text into Porter-stemmed terms: lowercase, strip `<...>` tags, trim,
/// split on anything that is not an ASCII digit or lowercase letter, stem, and
/// drop empty pieces.
///
/// ```
/// use shelfscan_core::tokenizer::tokenize;
///
/// assert_eq!(
///     tokenize("This is a test of a (tokenizer)"),
///     vec!["thi", "is", "a", "test", "of", "a", "token"],
/// );
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    tokenize_with(text, StemAlgorithm::Porter)
}

/// Same pipeline as [`tokenize`] with a caller-selected stemmer.
pub fn tokenize_with(text: &str, algorithm: StemAlgorithm) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped = TAG_RE.replace_all(&lowered, "");
    SPLIT_RE
        .split(stripped.trim())
        .map(|piece| algorithm.stem(piece))
        .filter(|t| !t.is_empty())
        .collect()
}
