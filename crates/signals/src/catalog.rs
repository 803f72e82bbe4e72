//! Signal catalog: the policy data every detector rule reads.
//!
//! [`CatalogData`] is the serializable form (plain strings and lists) and
//! [`SignalCatalog`] is the compiled, read-only form. A catalog is built once
//! and shared behind an `Arc`; nothing mutates it afterwards.

use crate::error::{CatalogError, CatalogResult};
use crate::languages::{normalize_language, FALLBACK_LANGUAGE, HESITATION_MARKERS};
use crate::normalize::normalize_transcript;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::RangeInclusive;

/// Default question-ending pattern.
pub const QUESTION_ENDING: &str = r"\?\s*$";

/// Terminal `.` or `!` at the end of the text.
pub const STATEMENT_ENDING: &str = r"[.!]$";

/// Clause-internal punctuation at the end of the text.
pub const TRAILING_PUNCTUATION: &str = r"[,;:]$";

/// Subject pronoun, auxiliary or modal (word or contraction), then a predicate word.
pub const COMPLETE_CLAUSE: &str = r"\b(?:i|you|we|they|he|she|it|this|that|there)(?:\s+(?:am|is|are|was|were|will|would|can|could|should|shall|may|might|must|have|has|had|do|does|did)|'m|'re|'s|'ve|'ll|'d)\s+[\w']+";

pub const DEFAULT_MIN_SENTENCE_WORDS: usize = 3;
pub const DEFAULT_MAX_SENTENCE_WORDS: usize = 20;

/// Commands only count as complete turns in short utterances.
pub const DEFAULT_MAX_COMMAND_WORDS: usize = 5;

const COMMAND_VERBS: &[&str] = &[
    "stop", "go", "start", "continue", "cancel", "wait", "help", "repeat", "pause", "resume",
    "quit", "exit", "skip", "next", "send", "submit", "proceed", "begin", "finish", "done",
];

const ACKNOWLEDGMENTS: &[&str] = &[
    "yes", "yeah", "yep", "no", "nope", "okay", "ok", "sure", "thanks", "thank you", "got it",
    "alright", "all right", "right", "correct", "exactly", "perfect", "great", "sounds good",
    "of course", "absolutely",
];

const FAREWELLS: &[&str] = &[
    "goodbye", "bye", "bye bye", "see you", "see you later", "talk to you later",
    "have a good day", "good night", "take care", "that's all", "that is all",
];

const CONJUNCTIONS: &[&str] = &[
    "and", "but", "or", "so", "because", "since", "although", "though", "while", "if", "unless",
    "until", "then", "plus", "yet", "nor", "whereas",
];

const INCOMPLETE_PATTERNS: &[(&str, &str)] = &[
    (
        "leading_auxiliary",
        r"^(?:can|could|would|will|should|shall|may|might|must|do|does|did|is|are|was|were|have|has)(?:\s+(?:i|you|we|they|he|she|it))?[\s,]*$",
    ),
    (
        "dangling_infinitive",
        r"^(?:i|we|you|they|he|she)(?:\s+|')(?:want|need|have|would like|am going|m going|re going|was going|were going)\s+to[\s,]*$",
    ),
    (
        "determiner_noun",
        r"^(?:the|a|an|my|your|our|their|his|her|these|those)\s+[\w']+[\s,]*$",
    ),
    ("trailing_conjunction", r"\b(?:and|but|or|so|because)[\s,]*$"),
    ("lone_wh_word", r"^(?:what|who|where|when|why|how|which)[\s,]*$"),
    (
        "trailing_function_word",
        r"\b(?:the|a|an|to|of|for|with|about|from|my|your)[\s,]*$",
    ),
];

/// A named regular expression in serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPattern {
    pub name: String,
    pub pattern: String,
}

/// Serializable catalog contents.
///
/// Every field has a default, so an override file only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    // Strong completion
    pub question_ending: String,
    pub command_verbs: Vec<String>,
    pub max_command_words: usize,
    pub acknowledgments: Vec<String>,
    pub farewells: Vec<String>,

    // Weak completion
    pub statement_ending: String,
    pub trailing_punctuation: String,
    pub complete_clause: String,
    pub min_sentence_words: usize,
    pub max_sentence_words: usize,

    // Continuation
    pub conjunctions: Vec<String>,
    pub incomplete_patterns: Vec<NamedPattern>,
    /// Treat rising intonation as a continuation signal.
    pub rising_intonation: bool,
    /// Treat a partial (non-final) transcript as a mid-pause continuation signal.
    pub partial_transcript: bool,

    /// Hesitation markers keyed by ISO 639-1 code.
    pub hesitation_markers: BTreeMap<String, Vec<String>>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for CatalogData {
    fn default() -> Self {
        Self {
            question_ending: QUESTION_ENDING.to_string(),
            command_verbs: owned(COMMAND_VERBS),
            max_command_words: DEFAULT_MAX_COMMAND_WORDS,
            acknowledgments: owned(ACKNOWLEDGMENTS),
            farewells: owned(FAREWELLS),
            statement_ending: STATEMENT_ENDING.to_string(),
            trailing_punctuation: TRAILING_PUNCTUATION.to_string(),
            complete_clause: COMPLETE_CLAUSE.to_string(),
            min_sentence_words: DEFAULT_MIN_SENTENCE_WORDS,
            max_sentence_words: DEFAULT_MAX_SENTENCE_WORDS,
            conjunctions: owned(CONJUNCTIONS),
            incomplete_patterns: INCOMPLETE_PATTERNS
                .iter()
                .map(|(name, pattern)| NamedPattern {
                    name: name.to_string(),
                    pattern: pattern.to_string(),
                })
                .collect(),
            rising_intonation: true,
            partial_transcript: true,
            hesitation_markers: HESITATION_MARKERS
                .iter()
                .map(|(lang, markers)| (lang.to_string(), owned(markers)))
                .collect(),
        }
    }
}

/// Compiled, immutable signal catalog.
#[derive(Debug, Clone)]
pub struct SignalCatalog {
    pub(crate) question_ending: Regex,
    pub(crate) command_verbs: HashSet<String>,
    pub(crate) max_command_words: usize,
    pub(crate) acknowledgments: Vec<String>,
    pub(crate) farewells: Vec<String>,
    pub(crate) statement_ending: Regex,
    pub(crate) trailing_punctuation: Regex,
    pub(crate) complete_clause: Regex,
    pub(crate) sentence_words: RangeInclusive<usize>,
    pub(crate) conjunctions: Vec<String>,
    pub(crate) incomplete_patterns: Vec<(String, Regex)>,
    pub(crate) rising_intonation: bool,
    pub(crate) partial_transcript: bool,
    markers: HashMap<String, Vec<String>>,
}

impl Default for SignalCatalog {
    fn default() -> Self {
        Self::from_data(CatalogData::default()).expect("built-in catalog is valid")
    }
}

impl SignalCatalog {
    /// Compile catalog data, validating every pattern and phrase.
    pub fn from_data(data: CatalogData) -> CatalogResult<Self> {
        if data.min_sentence_words > data.max_sentence_words {
            return Err(CatalogError::InvalidSentenceRange {
                min: data.min_sentence_words,
                max: data.max_sentence_words,
            });
        }

        let mut markers = HashMap::with_capacity(data.hesitation_markers.len());
        for (lang, list) in data.hesitation_markers {
            let set = format!("hesitation_markers.{lang}");
            markers.insert(normalize_language(&lang), phrase_set(list, &set)?);
        }
        if !markers.contains_key(FALLBACK_LANGUAGE) {
            return Err(CatalogError::MissingFallbackLanguage(
                FALLBACK_LANGUAGE.to_string(),
            ));
        }

        let incomplete_patterns = data
            .incomplete_patterns
            .into_iter()
            .map(|p| {
                let re = compile(&p.name, &p.pattern)?;
                Ok((p.name, re))
            })
            .collect::<CatalogResult<Vec<_>>>()?;

        let catalog = Self {
            question_ending: compile("question_ending", &data.question_ending)?,
            command_verbs: phrase_set(data.command_verbs, "command_verbs")?
                .into_iter()
                .collect(),
            max_command_words: data.max_command_words,
            acknowledgments: phrase_set(data.acknowledgments, "acknowledgments")?,
            farewells: phrase_set(data.farewells, "farewells")?,
            statement_ending: compile("statement_ending", &data.statement_ending)?,
            trailing_punctuation: compile("trailing_punctuation", &data.trailing_punctuation)?,
            complete_clause: compile("complete_clause", &data.complete_clause)?,
            sentence_words: data.min_sentence_words..=data.max_sentence_words,
            conjunctions: phrase_set(data.conjunctions, "conjunctions")?,
            incomplete_patterns,
            rising_intonation: data.rising_intonation,
            partial_transcript: data.partial_transcript,
            markers,
        };
        tracing::debug!(
            languages = catalog.markers.len(),
            command_verbs = catalog.command_verbs.len(),
            incomplete_patterns = catalog.incomplete_patterns.len(),
            "signal_catalog_loaded"
        );
        Ok(catalog)
    }

    /// Parse catalog data from JSON and compile it.
    ///
    /// Missing fields take their built-in defaults.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Hesitation markers for a language, falling back to English.
    pub fn markers_for(&self, lang: &str) -> &[String] {
        self.markers
            .get(&normalize_language(lang))
            .or_else(|| self.markers.get(FALLBACK_LANGUAGE))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether `word` is, starts with, or ends with a hesitation marker.
    ///
    /// Case-insensitive; a marker only matches a prefix or suffix when it is
    /// separated from the rest by whitespace.
    pub fn is_marker(&self, word: &str, lang: &str) -> bool {
        let word = normalize_transcript(word);
        self.markers_for(lang).iter().any(|m| {
            word == *m
                || word
                    .strip_prefix(m.as_str())
                    .is_some_and(|rest| rest.starts_with(' '))
                || word
                    .strip_suffix(m.as_str())
                    .is_some_and(|rest| rest.ends_with(' '))
        })
    }

    /// Whether the table has a dedicated row for this language.
    pub fn supports_language(&self, lang: &str) -> bool {
        self.markers.contains_key(&normalize_language(lang))
    }

    /// Languages with a marker row, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self.markers.keys().map(String::as_str).collect();
        langs.sort_unstable();
        langs
    }
}

fn compile(name: &str, pattern: &str) -> CatalogResult<Regex> {
    Regex::new(pattern).map_err(|source| CatalogError::InvalidPattern {
        name: name.to_string(),
        source,
    })
}

/// Normalize a phrase list, rejecting blanks. Longest phrases sort first so
/// the most specific match wins.
fn phrase_set(items: Vec<String>, set: &str) -> CatalogResult<Vec<String>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let phrase = normalize_transcript(&item);
        if phrase.is_empty() {
            return Err(CatalogError::EmptyPhrase {
                set: set.to_string(),
            });
        }
        if !out.contains(&phrase) {
            out.push(phrase);
        }
    }
    out.sort_by(|a: &String, b: &String| b.len().cmp(&a.len()));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_compiles() {
        let catalog = SignalCatalog::default();
        assert!(catalog.question_ending.is_match("what time is it?"));
        assert_eq!(catalog.sentence_words, 3..=20);
        assert!(!catalog.incomplete_patterns.is_empty());
    }

    #[test]
    fn test_markers_for_spanish() {
        let catalog = SignalCatalog::default();
        assert!(catalog.markers_for("es").iter().any(|m| m == "pues"));
    }

    #[test]
    fn test_markers_for_unknown_falls_back_to_english() {
        let catalog = SignalCatalog::default();
        assert_eq!(catalog.markers_for("xx"), catalog.markers_for("en"));
        assert_eq!(catalog.markers_for(""), catalog.markers_for("en"));
    }

    #[test]
    fn test_markers_for_region_suffix() {
        let catalog = SignalCatalog::default();
        assert_eq!(catalog.markers_for("en-US"), catalog.markers_for("en"));
        assert_eq!(catalog.markers_for("es-MX"), catalog.markers_for("es"));
    }

    #[test]
    fn test_is_marker_exact_and_case_insensitive() {
        let catalog = SignalCatalog::default();
        assert!(catalog.is_marker("um", "en"));
        assert!(catalog.is_marker("UM", "en"));
        assert!(catalog.is_marker("Pues", "es"));
    }

    #[test]
    fn test_is_marker_prefix_and_suffix_tokens() {
        let catalog = SignalCatalog::default();
        assert!(catalog.is_marker("um okay", "en"));
        assert!(catalog.is_marker("okay um", "en"));
        assert!(catalog.is_marker("and you know", "en"));
        assert!(!catalog.is_marker("umbrella", "en"));
        assert!(!catalog.is_marker("drum", "en"));
    }

    #[test]
    fn test_is_marker_unknown_language_uses_english() {
        let catalog = SignalCatalog::default();
        assert!(catalog.is_marker("uh", "xx"));
        assert!(!catalog.is_marker("pues", "xx"));
    }

    #[test]
    fn test_phrase_sets_sorted_longest_first() {
        let catalog = SignalCatalog::default();
        let lens: Vec<usize> = catalog.acknowledgments.iter().map(|a| a.len()).collect();
        assert!(lens.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_from_json_partial_override_keeps_defaults() {
        let json = r#"{
            "hesitation_markers": {
                "en": ["um"],
                "sv": ["eh", "liksom"]
            }
        }"#;
        let catalog = SignalCatalog::from_json(json).unwrap();
        assert!(catalog.supports_language("sv"));
        assert!(catalog.is_marker("liksom", "sv-SE"));
        assert!(!catalog.supports_language("es"));
        assert!(catalog.command_verbs.contains("stop"));
    }

    #[test]
    fn test_from_data_rejects_bad_pattern() {
        let data = CatalogData {
            question_ending: "(".to_string(),
            ..CatalogData::default()
        };
        let err = SignalCatalog::from_data(data).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPattern { ref name, .. } if name == "question_ending"));
    }

    #[test]
    fn test_from_data_requires_fallback_language() {
        let mut data = CatalogData::default();
        data.hesitation_markers.remove("en");
        assert!(matches!(
            SignalCatalog::from_data(data),
            Err(CatalogError::MissingFallbackLanguage(_))
        ));
    }

    #[test]
    fn test_from_data_rejects_blank_phrase() {
        let mut data = CatalogData::default();
        data.farewells.push("   ".to_string());
        assert!(matches!(
            SignalCatalog::from_data(data),
            Err(CatalogError::EmptyPhrase { .. })
        ));
    }

    #[test]
    fn test_from_data_rejects_inverted_sentence_range() {
        let data = CatalogData {
            min_sentence_words: 10,
            max_sentence_words: 2,
            ..CatalogData::default()
        };
        assert!(matches!(
            SignalCatalog::from_data(data),
            Err(CatalogError::InvalidSentenceRange { min: 10, max: 2 })
        ));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            SignalCatalog::from_json("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_catalog_data_serde_roundtrip_is_lossless() {
        let data = CatalogData::default();
        let json = serde_json::to_string(&data).unwrap();
        let back: CatalogData = serde_json::from_str(&json).unwrap();
        assert_eq!(data, back);
    }
}
