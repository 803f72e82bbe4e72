//! Input and output types for turn analysis.

use serde::{Deserialize, Serialize};
use turnwise_signals::DetectedSignals;

/// Direction of the pitch contour at the end of the utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchDirection {
    Up,
    Down,
    Level,
}

/// Prosody features from an upstream audio-analysis stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProsodyHints {
    pub rising_intonation: bool,
    pub energy_decline: bool,
    /// Accepted for forward compatibility; not scored.
    pub slowing_rate: Option<bool>,
    pub final_pitch_direction: Option<PitchDirection>,
}

/// Per-call context for [`TurnAnalyzer::analyze`](crate::TurnAnalyzer::analyze).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnAnalysisContext {
    /// The transcript is an interim recognition result.
    pub is_partial: bool,
    pub prosody_hints: Option<ProsodyHints>,
    /// Prior utterances. Accepted but not scored.
    pub previous_context: Option<Vec<String>>,
    /// Turn index in the session. Accepted but not scored.
    pub turn_number: Option<u32>,
    /// Overrides the analyzer's language for this call.
    pub language: Option<String>,
}

impl TurnAnalysisContext {
    pub fn partial() -> Self {
        Self {
            is_partial: true,
            ..Self::default()
        }
    }

    pub fn with_prosody(mut self, hints: ProsodyHints) -> Self {
        self.prosody_hints = Some(hints);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// What the listening side should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnAction {
    /// The speaker is done; start responding.
    Respond,
    /// Keep listening and re-check after `recommended_wait_ms`.
    Wait,
    /// Emit a short filler to invite the speaker to go on.
    PromptContinuation,
}

impl TurnAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnAction::Respond => "respond",
            TurnAction::Wait => "wait",
            TurnAction::PromptContinuation => "prompt_continuation",
        }
    }
}

impl std::fmt::Display for TurnAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnAnalysisResult {
    /// Always within `[0, 1]`.
    pub completion_confidence: f32,
    pub action: TurnAction,
    pub reason: String,
    pub signals: DetectedSignals,
    /// Always within `[0, max_wait_ms]`.
    pub recommended_wait_ms: u64,
    pub use_filler_phrase: bool,
    pub is_complete_thought: bool,
}
