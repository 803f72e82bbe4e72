//! Transcript normalization helpers.
//!
//! Pure string handling - no catalog knowledge.

/// Normalize a raw transcript for signal detection.
///
/// Lowercases, folds typographic apostrophes to `'`, trims and collapses
/// whitespace runs to a single space. Punctuation is kept because question
/// and statement endings are detected from it.
pub fn normalize_transcript(text: &str) -> String {
    text.to_lowercase()
        .replace(['\u{2019}', '\u{2018}'], "'")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip everything except letters, digits, whitespace and apostrophes.
///
/// Used for phrase containment checks where punctuation is noise.
pub fn bare_text(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '\'' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Last word with leading/trailing punctuation removed.
pub fn last_word(text: &str) -> Option<&str> {
    text.split_whitespace()
        .last()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .filter(|w| !w.is_empty())
}

/// True when `text` is `phrase` or ends with `phrase` preceded by a space.
pub fn ends_with_phrase(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    text.strip_suffix(phrase)
        .is_some_and(|rest| rest.is_empty() || rest.ends_with(' '))
}

/// True when `phrase` occurs in `text` on word boundaries.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    format!(" {text} ").contains(&format!(" {phrase} "))
}
