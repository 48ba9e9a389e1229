use sha2::{Digest, Sha256};
use theoria_core::{Result, SynthesisError};
use tracing::debug;

const SENTENCE_TERMINATORS: [char; 4] = ['.', '!', '?', '…'];

/// Cleaned and segmented view of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// Whitespace-collapsed text in its original case.
    pub text: String,
    pub sentences: Vec<String>,
    /// Lowercase tokens; see [`is_token_char`].
    pub tokens: Vec<String>,
    pub truncated: bool,
    /// Seed derived from `text`, used to rotate phrase templates.
    pub seed: u64,
}

impl NormalizedText {
    pub fn analyzed_chars(&self) -> usize {
        self.text.chars().count()
    }
}

/// Keeps the first `max_chars` characters. Depends only on length.
fn truncate_chars(content: &str, max_chars: usize) -> (&str, bool) {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&content[..byte_idx], true),
        None => (content, false),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    let mut flush = |current: &mut String| {
        let trimmed = current.trim();
        if trimmed.chars().any(char::is_alphanumeric) {
            sentences.push(trimmed.to_string());
        }
        current.clear();
    };

    for c in text.chars() {
        current.push(c);
        if SENTENCE_TERMINATORS.contains(&c) {
            flush(&mut current);
        }
    }
    flush(&mut current);
    sentences
}

/// Characters that can form a token: letters of any script and ASCII digits.
/// Superscripts and other numeric symbols act as separators.
pub fn is_token_char(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit()
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !is_token_char(c))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

pub fn content_seed(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

pub fn normalize(content: &str, max_chars: usize) -> Result<NormalizedText> {
    if content.trim().is_empty() {
        return Err(SynthesisError::InvalidInput(
            "content is empty or whitespace-only".into(),
        ));
    }

    let (window, truncated) = truncate_chars(content, max_chars);
    let text = collapse_whitespace(window);
    let sentences = split_sentences(&text);
    let tokens = tokenize(&text);
    let seed = content_seed(&text);

    debug!(
        tokens = tokens.len(),
        sentences = sentences.len(),
        truncated,
        "normalized content"
    );

    Ok(NormalizedText {
        text,
        sentences,
        tokens,
        truncated,
        seed,
    })
}
