//! Turn analyzer façade.
//!
//! Owns the detector, scorer and policy for one voice session, plus a small
//! rolling buffer of prior utterances and the most recent result.

use crate::config::AnalyzerConfig;
use crate::policy::{ActionPolicy, PolicyConfig, PolicyInput};
use crate::scorer::ConfidenceScorer;
use crate::types::{TurnAnalysisContext, TurnAnalysisResult};
use crate::{Result, TurnError};
use std::collections::VecDeque;
use std::sync::Arc;
use turnwise_signals::{normalize_transcript, DetectionContext, SignalCatalog, SignalDetector};

/// Maximum number of prior utterances kept in the context buffer.
pub const CONTEXT_CAPACITY: usize = 5;

/// Decides whether a live speaker has finished their turn.
///
/// One instance per session. `analyze` takes `&mut self` only to cache the
/// last result; the decision itself depends on nothing but its arguments,
/// the configuration and the catalog.
#[derive(Debug)]
pub struct TurnAnalyzer {
    config: AnalyzerConfig,
    detector: SignalDetector,
    scorer: ConfidenceScorer,
    policy: ActionPolicy,
    context: VecDeque<String>,
    last_analysis: Option<TurnAnalysisResult>,
}

impl Default for TurnAnalyzer {
    fn default() -> Self {
        Self::build(AnalyzerConfig::default(), Arc::new(SignalCatalog::default()))
    }
}

impl TurnAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzer with custom tuning and the built-in catalog.
    pub fn with_config(config: AnalyzerConfig) -> Result<Self> {
        Self::with_catalog(config, Arc::new(SignalCatalog::default()))
    }

    /// Analyzer with custom tuning and a catalog override.
    ///
    /// The catalog may be shared between analyzers.
    pub fn with_catalog(config: AnalyzerConfig, catalog: Arc<SignalCatalog>) -> Result<Self> {
        config.validate()?;
        if !catalog.supports_language(&config.language) {
            tracing::warn!(
                language = %config.language,
                "No hesitation markers for language, falling back to English"
            );
        }
        Ok(Self::build(config, catalog))
    }

    /// Analyzer with a catalog override parsed from JSON.
    ///
    /// Fields missing from the JSON keep their built-in defaults.
    pub fn with_catalog_json(config: AnalyzerConfig, catalog_json: &str) -> Result<Self> {
        let catalog = SignalCatalog::from_json(catalog_json)?;
        Self::with_catalog(config, Arc::new(catalog))
    }

    fn build(config: AnalyzerConfig, catalog: Arc<SignalCatalog>) -> Self {
        let policy = ActionPolicy::new(PolicyConfig::from(&config));
        Self {
            config,
            detector: SignalDetector::new(catalog),
            scorer: ConfidenceScorer::new(),
            policy,
            context: VecDeque::with_capacity(CONTEXT_CAPACITY),
            last_analysis: None,
        }
    }

    /// Decide what to do with `transcript` after `silence_ms` of silence.
    ///
    /// Total over all strings; fails only on a negative silence duration.
    pub fn analyze(
        &mut self,
        transcript: &str,
        silence_ms: i64,
        context: Option<&TurnAnalysisContext>,
    ) -> Result<TurnAnalysisResult> {
        let silence_ms = u64::try_from(silence_ms).map_err(|_| {
            TurnError::InvalidArgument(format!(
                "silence_ms must be non-negative, got {silence_ms}"
            ))
        })?;

        let default_context = TurnAnalysisContext::default();
        let context = context.unwrap_or(&default_context);
        let language = context.language.as_deref().unwrap_or(self.config.language.as_str());
        if context.language.is_some() && !self.catalog().supports_language(language) {
            tracing::warn!(language, "No hesitation markers for language, falling back to English");
        }

        let text = normalize_transcript(transcript);
        let detection = DetectionContext {
            language,
            is_partial: context.is_partial,
            rising_intonation: context
                .prosody_hints
                .is_some_and(|hints| hints.rising_intonation),
        };
        let signals = self.detector.detect(&text, &detection);

        let breakdown = self.scorer.breakdown(&signals, silence_ms, context);
        let decision = self.policy.decide(&PolicyInput {
            confidence: breakdown.confidence,
            signals: &signals,
            silence_ms,
            breakdown: Some(&breakdown),
        });

        tracing::debug!(
            action = %decision.action,
            confidence = breakdown.confidence,
            silence_ms,
            recommended_wait_ms = decision.recommended_wait_ms,
            strong = signals.strong_completion.len(),
            weak = signals.weak_completion.len(),
            continuation = signals.continuation.len(),
            language,
            "turn_analyzed"
        );

        let result = TurnAnalysisResult {
            completion_confidence: breakdown.confidence,
            action: decision.action,
            reason: decision.reason,
            is_complete_thought: signals.is_complete_thought(),
            signals,
            recommended_wait_ms: decision.recommended_wait_ms,
            use_filler_phrase: decision.use_filler_phrase,
        };
        self.last_analysis = Some(result.clone());
        Ok(result)
    }

    /// Append an utterance, evicting the oldest beyond [`CONTEXT_CAPACITY`].
    pub fn add_context(&mut self, utterance: impl Into<String>) {
        if self.context.len() == CONTEXT_CAPACITY {
            self.context.pop_front();
        }
        self.context.push_back(utterance.into());
    }

    pub fn clear_context(&mut self) {
        self.context.clear();
    }

    /// Buffered utterances, oldest first.
    pub fn context(&self) -> impl Iterator<Item = &str> {
        self.context.iter().map(String::as_str)
    }

    pub fn last_analysis(&self) -> Option<&TurnAnalysisResult> {
        self.last_analysis.as_ref()
    }

    /// The configured default language, as given.
    pub fn language(&self) -> &str {
        &self.config.language
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &SignalCatalog {
        self.detector.catalog()
    }
}
