//! Meaning-block extraction: reduce a section body to its high-signal
//! sentences (obligations and numeric limits) for similarity scoring.

use once_cell::sync::Lazy;
use regex::Regex;

static MODAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(shall|must|may|required|prohibited|not exceed|maximum|minimum)\b").unwrap()
});

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d+(?::\d{2})?(?:\.\d+)?\s*(hours?|hrs?|days?|months?|minutes?|mins?|landings?|sectors?|km|kg)?\b")
        .unwrap()
});

static SENTENCE_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Meaning blocks keep at most this many qualifying sentences.
const MAX_SENTENCES: usize = 8;

/// Fallback prefix length when no sentence qualifies.
const FALLBACK_PREFIX: usize = 1200;

/// Build the reduced high-signal excerpt for a section.
///
/// Keeps up to eight sentences bearing modal verbs or numeric tokens,
/// prefixed with the heading; falls back to a truncated body prefix
/// when nothing qualifies. The result is always drawn from the
/// heading+body text (the meaning-is-a-subset invariant).
pub fn meaning_block(heading: &str, body: &str) -> String {
    let mut text = body.trim().to_string();
    let heading = heading.trim();
    if !heading.is_empty() {
        text = format!("{heading}. {text}").trim().to_string();
    }

    let important: Vec<&str> = split_sentences(&text)
        .into_iter()
        .filter(|s| MODAL_RE.is_match(s) || NUMBER_RE.is_match(s))
        .take(MAX_SENTENCES)
        .collect();

    if important.is_empty() {
        return truncate_chars(&text, FALLBACK_PREFIX);
    }

    important.join(" ")
}

/// Split on sentence terminators followed by whitespace, keeping the
/// terminator with its sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_END_RE.find_iter(text) {
        let sentence = text[start..boundary.start() + 1].trim();
        if !sentence.is_empty() {
            sentences.push(sentence);
        }
        start = boundary.end();
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
