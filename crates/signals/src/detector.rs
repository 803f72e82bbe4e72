//! Signal detection over a normalized transcript.
//!
//! Every rule is independent and may co-fire with the others. Each rule emits
//! at most one tag, named after its cause (`"conjunction:and"`), so callers
//! can assert on why a bucket grew and not just that it did.

use crate::catalog::SignalCatalog;
use crate::normalize::{bare_text, contains_phrase, ends_with_phrase, last_word, word_count};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Signals fired for one transcript, grouped by bucket in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedSignals {
    pub strong_completion: Vec<String>,
    pub weak_completion: Vec<String>,
    pub continuation: Vec<String>,
}

impl DetectedSignals {
    /// Whether any strong-completion rule fired.
    pub fn has_strong(&self) -> bool {
        !self.strong_completion.is_empty()
    }

    /// Whether any continuation rule fired.
    pub fn has_continuation(&self) -> bool {
        !self.continuation.is_empty()
    }

    /// A thought is complete on any strong signal, or on weak signals with
    /// no continuation evidence.
    pub fn is_complete_thought(&self) -> bool {
        self.has_strong() || (!self.weak_completion.is_empty() && !self.has_continuation())
    }

    /// Total number of fired tags across all buckets.
    pub fn len(&self) -> usize {
        self.strong_completion.len() + self.weak_completion.len() + self.continuation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-call inputs the detector needs besides the text.
#[derive(Debug, Clone, Copy)]
pub struct DetectionContext<'a> {
    /// Language code used to pick the hesitation-marker row.
    pub language: &'a str,
    /// The transcript is an interim (non-final) recognition result.
    pub is_partial: bool,
    /// Prosody analysis reported rising intonation.
    pub rising_intonation: bool,
}

impl Default for DetectionContext<'_> {
    fn default() -> Self {
        Self {
            language: crate::FALLBACK_LANGUAGE,
            is_partial: false,
            rising_intonation: false,
        }
    }
}

/// Scans transcripts against a shared [`SignalCatalog`].
#[derive(Debug, Clone)]
pub struct SignalDetector {
    catalog: Arc<SignalCatalog>,
}

impl Default for SignalDetector {
    fn default() -> Self {
        Self::new(Arc::new(SignalCatalog::default()))
    }
}

impl SignalDetector {
    pub fn new(catalog: Arc<SignalCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &SignalCatalog {
        &self.catalog
    }

    /// Run every rule against `text`, which must already be normalized.
    pub fn detect(&self, text: &str, ctx: &DetectionContext<'_>) -> DetectedSignals {
        let mut signals = DetectedSignals::default();
        self.detect_continuation(text, ctx, &mut signals.continuation);
        self.detect_strong(text, &mut signals.strong_completion);
        self.detect_weak(text, &mut signals.weak_completion);

        tracing::trace!(text, fired = signals.len(), "signals_detected");
        signals
    }

    fn detect_continuation(&self, text: &str, ctx: &DetectionContext<'_>, out: &mut Vec<String>) {
        let c = &self.catalog;

        // "so um..." and "um, " still end on the marker.
        let tail = text.trim_end_matches(|ch: char| {
            ch == ',' || ch == '.' || ch == '\u{2026}' || ch.is_whitespace()
        });
        if let Some(marker) = c
            .markers_for(ctx.language)
            .iter()
            .find(|m| ends_with_phrase(tail, m))
        {
            fire(out, format!("hesitation:{marker}"));
        }

        let tail = text.trim_end_matches(|ch: char| ch == ',' || ch.is_whitespace());
        if let Some(conj) = c.conjunctions.iter().find(|w| ends_with_phrase(tail, w)) {
            fire(out, format!("conjunction:{conj}"));
        }

        if let Some((name, _)) = c.incomplete_patterns.iter().find(|(_, re)| re.is_match(text)) {
            fire(out, format!("incomplete:{name}"));
        }

        if c.rising_intonation && ctx.rising_intonation {
            fire(out, "rising_intonation".to_string());
        }

        if c.partial_transcript && ctx.is_partial {
            fire(out, "partial_transcript".to_string());
        }
    }

    fn detect_strong(&self, text: &str, out: &mut Vec<String>) {
        let c = &self.catalog;

        if c.question_ending.is_match(text) {
            fire(out, "question_ending".to_string());
        }

        let words = word_count(text);
        if words <= c.max_command_words {
            if let Some(word) = last_word(text).filter(|w| c.command_verbs.contains(*w)) {
                fire(out, format!("command:{word}"));
            }
        }

        let unstopped = text.strip_suffix('.').unwrap_or(text);
        if let Some(ack) = c
            .acknowledgments
            .iter()
            .find(|a| ends_with_phrase(text, a) || ends_with_phrase(unstopped, a))
        {
            fire(out, format!("acknowledgment:{ack}"));
        }

        let bare = bare_text(text);
        if let Some(bye) = c.farewells.iter().find(|f| contains_phrase(&bare, f)) {
            fire(out, format!("farewell:{bye}"));
        }
    }

    fn detect_weak(&self, text: &str, out: &mut Vec<String>) {
        let c = &self.catalog;

        if c.statement_ending.is_match(text) {
            fire(out, "statement_ending".to_string());
        }

        if c.trailing_punctuation.is_match(text) {
            if let Some(ch) = text.chars().last() {
                fire(out, format!("trailing_punctuation:{ch}"));
            }
        }

        if c.complete_clause.is_match(text) {
            fire(out, "complete_clause".to_string());
        }

        let words = word_count(text);
        if c.sentence_words.contains(&words) {
            fire(out, format!("sentence_length:{words}"));
        }
    }
}

fn fire(out: &mut Vec<String>, tag: String) {
    tracing::trace!(tag = %tag, "signal_fired");
    out.push(tag);
}
