//! Linguistic signals for turn-completion decisions.
//!
//! This crate provides:
//! - [`SignalCatalog`]: immutable pattern and phrase sets, including a
//!   per-language hesitation-marker table with English fallback
//! - [`SignalDetector`]: scans a normalized transcript and reports which
//!   strong-completion, weak-completion and continuation rules fired
//!
//! # Example
//!
//! ```
//! use turnwise_signals::{normalize_transcript, DetectionContext, SignalDetector};
//!
//! let detector = SignalDetector::default();
//! let text = normalize_transcript("What time is it?");
//! let signals = detector.detect(&text, &DetectionContext::default());
//! assert!(signals.strong_completion.contains(&"question_ending".to_string()));
//! ```

mod catalog;
mod detector;
mod error;
mod languages;
mod normalize;

pub use catalog::{CatalogData, NamedPattern, SignalCatalog};
pub use detector::{DetectedSignals, DetectionContext, SignalDetector};
pub use error::{CatalogError, CatalogResult};
pub use languages::{normalize_language, FALLBACK_LANGUAGE, HESITATION_MARKERS};
pub use normalize::{normalize_transcript, word_count};
