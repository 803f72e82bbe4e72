//! Turn-completion decisions for live spoken conversation.
//!
//! Given a transcript (partial or final), the silence since the speaker last
//! spoke, and optional prosody hints, decide whether to respond now, keep
//! waiting, or prompt the speaker to continue.
//!
//! The model is rule-based and fully explainable:
//!
//! ```text
//! transcript ──► SignalDetector ──► ConfidenceScorer ──► ActionPolicy ──► result
//!                (turnwise-signals)   (additive terms)    (ordered rules
//!                                                          + escape valve)
//! ```
//!
//! # Example
//!
//! ```
//! use turnwise_turn::{TurnAction, TurnAnalyzer};
//!
//! let mut analyzer = TurnAnalyzer::new();
//! let result = analyzer.analyze("What time is it?", 500, None).unwrap();
//! assert_eq!(result.action, TurnAction::Respond);
//! ```

mod analyzer;
mod config;
mod policy;
mod scorer;
mod types;

pub use analyzer::{TurnAnalyzer, CONTEXT_CAPACITY};
pub use config::{
    AnalyzerConfig, DEFAULT_COMPLETION_THRESHOLD, DEFAULT_CONTINUATION_WAIT_MS,
    DEFAULT_MAX_WAIT_MS, DEFAULT_WEAK_COMPLETION_WAIT_MS,
};
pub use policy::{
    ActionPolicy, Decision, PolicyConfig, PolicyInput, PolicyRule, LOW_CONFIDENCE,
    PROMPT_SILENCE_MS,
};
pub use scorer::{ConfidenceScorer, ScoreBreakdown, ScoreTerm, PARTIAL_CONFIDENCE_CAP};
pub use types::{
    PitchDirection, ProsodyHints, TurnAction, TurnAnalysisContext, TurnAnalysisResult,
};

pub use turnwise_signals::{CatalogData, CatalogError, DetectedSignals, SignalCatalog};

#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

pub type Result<T> = std::result::Result<T, TurnError>;
