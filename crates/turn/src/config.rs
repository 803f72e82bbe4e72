//! Analyzer configuration.
//!
//! All values are fixed for the lifetime of an analyzer. Defaults are
//! exported as constants so callers can derive their own tuning from them.

use crate::{Result, TurnError};
use serde::{Deserialize, Serialize};
use turnwise_signals::FALLBACK_LANGUAGE;

/// Confidence at or above which the speaker is considered done.
pub const DEFAULT_COMPLETION_THRESHOLD: f32 = 0.65;

/// Wait after a weak (non-definitive) completion.
pub const DEFAULT_WEAK_COMPLETION_WAIT_MS: u64 = 800;

/// Wait when the speaker looks mid-thought.
pub const DEFAULT_CONTINUATION_WAIT_MS: u64 = 2000;

/// Silence after which the analyzer always responds.
pub const DEFAULT_MAX_WAIT_MS: u64 = 5000;

/// Tuning for a [`TurnAnalyzer`](crate::TurnAnalyzer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub completion_threshold: f32,
    pub weak_completion_wait_ms: u64,
    pub continuation_wait_ms: u64,
    pub max_wait_ms: u64,
    /// Default language code; a per-call context may override it.
    pub language: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            completion_threshold: DEFAULT_COMPLETION_THRESHOLD,
            weak_completion_wait_ms: DEFAULT_WEAK_COMPLETION_WAIT_MS,
            continuation_wait_ms: DEFAULT_CONTINUATION_WAIT_MS,
            max_wait_ms: DEFAULT_MAX_WAIT_MS,
            language: FALLBACK_LANGUAGE.to_string(),
        }
    }
}

impl AnalyzerConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| TurnError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Reject values that would break the result invariants.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.completion_threshold) {
            return Err(TurnError::InvalidConfig(format!(
                "completion_threshold must be within [0, 1], got {}",
                self.completion_threshold
            )));
        }
        if self.max_wait_ms == 0 {
            return Err(TurnError::InvalidConfig(
                "max_wait_ms must be greater than zero".to_string(),
            ));
        }
        for (name, value) in [
            ("weak_completion_wait_ms", self.weak_completion_wait_ms),
            ("continuation_wait_ms", self.continuation_wait_ms),
        ] {
            if value > self.max_wait_ms {
                return Err(TurnError::InvalidConfig(format!(
                    "{name} ({value}) exceeds max_wait_ms ({})",
                    self.max_wait_ms
                )));
            }
        }
        Ok(())
    }
}
