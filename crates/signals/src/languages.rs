//! Hesitation-marker table keyed by ISO 639-1 code.
//!
//! Adding a language is a data change: append a row to [`HESITATION_MARKERS`].

/// Language used when a code has no row in the marker table.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Built-in hesitation markers, one row per language.
pub const HESITATION_MARKERS: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "um", "umm", "uh", "uhm", "er", "erm", "ah", "hmm", "hm", "mm", "you know", "i mean",
            "let me think", "let me see", "kind of", "sort of",
        ],
    ),
    (
        "es",
        &[
            "eh", "em", "este", "pues", "bueno", "o sea", "mmm", "a ver", "digamos", "es que",
        ],
    ),
    (
        "fr",
        &[
            "euh", "heu", "ben", "bah", "alors", "enfin", "bon", "tu sais", "genre", "en fait",
        ],
    ),
    (
        "de",
        &["äh", "ähm", "öh", "hm", "also", "naja", "sozusagen", "halt", "quasi", "weißt du"],
    ),
    (
        "pt",
        &["é", "hum", "tipo", "então", "né", "sabe", "quer dizer", "bom", "ahn"],
    ),
    (
        "it",
        &["ehm", "eh", "cioè", "allora", "insomma", "tipo", "diciamo", "beh", "boh"],
    ),
    ("nl", &["eh", "ehm", "uhm", "nou", "dus", "zeg maar", "weet je"]),
    (
        "hi",
        &["matlab", "woh", "haan", "accha", "yaani", "kya kehte hain"],
    ),
];

/// Reduce a language tag to its ISO 639-1 prefix.
///
/// `"en-US"` and `"pt_BR"` become `"en"` and `"pt"`. Blank input yields the
/// fallback language.
pub fn normalize_language(code: &str) -> String {
    let primary = code
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    if primary.is_empty() {
        FALLBACK_LANGUAGE.to_string()
    } else {
        primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_language_strips_region() {
        assert_eq!(normalize_language("en-US"), "en");
        assert_eq!(normalize_language("pt_BR"), "pt");
        assert_eq!(normalize_language("ES"), "es");
    }

    #[test]
    fn test_normalize_language_blank_falls_back() {
        assert_eq!(normalize_language(""), FALLBACK_LANGUAGE);
        assert_eq!(normalize_language("  "), FALLBACK_LANGUAGE);
    }

    #[test]
    fn test_table_has_fallback_row() {
        assert!(HESITATION_MARKERS
            .iter()
            .any(|(lang, _)| *lang == FALLBACK_LANGUAGE));
    }

    #[test]
    fn test_markers_are_lowercase() {
        for (lang, markers) in HESITATION_MARKERS {
            for m in *markers {
                assert_eq!(*m, m.to_lowercase(), "marker {m:?} in {lang} not lowercase");
            }
        }
    }
}
