//! Additive confidence model.
//!
//! Pure domain logic - no I/O. Every contribution is recorded as a named
//! term so the final decision can explain itself.

use crate::types::{PitchDirection, TurnAnalysisContext};
use std::fmt;
use turnwise_signals::DetectedSignals;

pub const NEUTRAL_CONFIDENCE: f32 = 0.5;
pub const STRONG_COMPLETION_WEIGHT: f32 = 0.30;
pub const WEAK_COMPLETION_WEIGHT: f32 = 0.15;
pub const CONTINUATION_WEIGHT: f32 = -0.25;

pub const LONG_SILENCE_MS: u64 = 2000;
pub const LONG_SILENCE_BONUS: f32 = 0.20;
pub const MEDIUM_SILENCE_MS: u64 = 1000;
pub const MEDIUM_SILENCE_BONUS: f32 = 0.10;
pub const SHORT_SILENCE_MS: u64 = 300;
pub const SHORT_SILENCE_PENALTY: f32 = -0.10;

pub const ENERGY_DECLINE_BONUS: f32 = 0.10;
pub const PITCH_DOWN_BONUS: f32 = 0.10;

/// Interim transcripts never score above this.
pub const PARTIAL_CONFIDENCE_CAP: f32 = 0.30;

/// One named contribution to the confidence value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreTerm {
    pub name: &'static str,
    /// Number of signals behind the term, when it is count-based.
    pub count: Option<usize>,
    pub delta: f32,
}

impl fmt::Display for ScoreTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // -0.25 x 0 is -0.0, which would print as "-0.00".
        let delta = if self.delta == 0.0 { 0.0 } else { self.delta };
        match self.count {
            Some(n) => write!(f, "{} x{} {:+.2}", self.name, n, delta),
            None => write!(f, "{} {:+.2}", self.name, delta),
        }
    }
}

/// Ordered terms and the resulting confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub terms: Vec<ScoreTerm>,
    pub confidence: f32,
}

impl ScoreBreakdown {
    pub fn term(&self, name: &str) -> Option<&ScoreTerm> {
        self.terms.iter().find(|t| t.name == name)
    }
}

impl fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self.terms.iter().map(ToString::to_string).collect();
        write!(f, "{} = {:.2}", terms.join(", "), self.confidence)
    }
}

/// Combines signals, silence and prosody into a value in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    pub fn new() -> Self {
        Self
    }

    /// Confidence that the speaker has finished.
    pub fn score(
        &self,
        signals: &DetectedSignals,
        silence_ms: u64,
        context: &TurnAnalysisContext,
    ) -> f32 {
        self.breakdown(signals, silence_ms, context).confidence
    }

    /// Confidence with every contributing term.
    pub fn breakdown(
        &self,
        signals: &DetectedSignals,
        silence_ms: u64,
        context: &TurnAnalysisContext,
    ) -> ScoreBreakdown {
        let mut terms = Vec::with_capacity(9);
        let mut value = NEUTRAL_CONFIDENCE;
        terms.push(ScoreTerm {
            name: "base",
            count: None,
            delta: NEUTRAL_CONFIDENCE,
        });

        for (name, count, weight) in [
            (
                "strong_completion",
                signals.strong_completion.len(),
                STRONG_COMPLETION_WEIGHT,
            ),
            (
                "weak_completion",
                signals.weak_completion.len(),
                WEAK_COMPLETION_WEIGHT,
            ),
            ("continuation", signals.continuation.len(), CONTINUATION_WEIGHT),
        ] {
            let delta = weight * count as f32;
            value += delta;
            terms.push(ScoreTerm {
                name,
                count: Some(count),
                delta,
            });
        }

        let silence = silence_term(silence_ms);
        value += silence;
        terms.push(ScoreTerm {
            name: "silence",
            count: None,
            delta: silence,
        });

        let hints = context.prosody_hints.unwrap_or_default();
        let energy = if hints.energy_decline {
            ENERGY_DECLINE_BONUS
        } else {
            0.0
        };
        value += energy;
        terms.push(ScoreTerm {
            name: "energy_decline",
            count: None,
            delta: energy,
        });

        let pitch = if hints.final_pitch_direction == Some(PitchDirection::Down) {
            PITCH_DOWN_BONUS
        } else {
            0.0
        };
        value += pitch;
        terms.push(ScoreTerm {
            name: "pitch_down",
            count: None,
            delta: pitch,
        });

        // Sums of the 0.05-step weights drift in f32; snap them so they
        // compare exactly against configured thresholds.
        value = (value * 10_000.0).round() / 10_000.0;

        if context.is_partial && value > PARTIAL_CONFIDENCE_CAP {
            terms.push(ScoreTerm {
                name: "partial_cap",
                count: None,
                delta: PARTIAL_CONFIDENCE_CAP - value,
            });
            value = PARTIAL_CONFIDENCE_CAP;
        }

        let clamped = value.clamp(0.0, 1.0);
        if clamped != value {
            terms.push(ScoreTerm {
                name: "clamp",
                count: None,
                delta: clamped - value,
            });
        }

        for t in terms.iter().filter(|t| t.delta != 0.0) {
            tracing::trace!(term = t.name, delta = t.delta, "score_term");
        }

        ScoreBreakdown {
            terms,
            confidence: clamped,
        }
    }
}

fn silence_term(silence_ms: u64) -> f32 {
    if silence_ms > LONG_SILENCE_MS {
        LONG_SILENCE_BONUS
    } else if silence_ms > MEDIUM_SILENCE_MS {
        MEDIUM_SILENCE_BONUS
    } else if silence_ms < SHORT_SILENCE_MS {
        SHORT_SILENCE_PENALTY
    } else {
        0.0
    }
}
