//! Action policy: confidence and signals in, action out.
//!
//! Rules are evaluated in list order and the first one that matches decides.
//! The max-wait escape valve is not part of the list; it always runs last
//! and overrides whatever the rules chose.
//!
//! Default order:
//! 1. `confident_completion` - confidence at or above threshold
//! 2. `continuation_hold` - any continuation signal
//! 3. `low_confidence` - confidence below 0.4
//! 4. `uncertain` - everything else
//! 5. `escape_valve` - silence at or beyond max wait

use crate::config::AnalyzerConfig;
use crate::scorer::ScoreBreakdown;
use crate::types::TurnAction;
use turnwise_signals::DetectedSignals;

/// Below this confidence the speaker may need a nudge.
pub const LOW_CONFIDENCE: f32 = 0.4;

/// Silence after which a low-confidence turn gets a filler prompt.
pub const PROMPT_SILENCE_MS: u64 = 3000;

/// Timing and threshold values the rules read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyConfig {
    pub completion_threshold: f32,
    pub weak_completion_wait_ms: u64,
    pub continuation_wait_ms: u64,
    pub max_wait_ms: u64,
}

impl From<&AnalyzerConfig> for PolicyConfig {
    fn from(config: &AnalyzerConfig) -> Self {
        Self {
            completion_threshold: config.completion_threshold,
            weak_completion_wait_ms: config.weak_completion_wait_ms,
            continuation_wait_ms: config.continuation_wait_ms,
            max_wait_ms: config.max_wait_ms,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::from(&AnalyzerConfig::default())
    }
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct PolicyInput<'a> {
    pub confidence: f32,
    pub signals: &'a DetectedSignals,
    pub silence_ms: u64,
    pub breakdown: Option<&'a ScoreBreakdown>,
}

/// A policy outcome before the escape valve and wait clamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: TurnAction,
    pub recommended_wait_ms: u64,
    pub use_filler_phrase: bool,
    pub reason: String,
}

impl Decision {
    fn new(action: TurnAction, recommended_wait_ms: u64, reason: String) -> Self {
        Self {
            action,
            recommended_wait_ms,
            use_filler_phrase: false,
            reason,
        }
    }
}

/// The ordered decision rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyRule {
    ConfidentCompletion,
    ContinuationHold,
    LowConfidence,
    Uncertain,
}

impl PolicyRule {
    /// The default evaluation order.
    pub const DEFAULT_ORDER: [PolicyRule; 4] = [
        PolicyRule::ConfidentCompletion,
        PolicyRule::ContinuationHold,
        PolicyRule::LowConfidence,
        PolicyRule::Uncertain,
    ];

    /// Stable rule number used in reasons.
    pub fn number(&self) -> u8 {
        match self {
            PolicyRule::ConfidentCompletion => 1,
            PolicyRule::ContinuationHold => 2,
            PolicyRule::LowConfidence => 3,
            PolicyRule::Uncertain => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PolicyRule::ConfidentCompletion => "confident_completion",
            PolicyRule::ContinuationHold => "continuation_hold",
            PolicyRule::LowConfidence => "low_confidence",
            PolicyRule::Uncertain => "uncertain",
        }
    }

    /// Evaluate this rule alone. `None` means it does not apply.
    pub fn evaluate(&self, input: &PolicyInput<'_>, config: &PolicyConfig) -> Option<Decision> {
        let prefix = format!("rule {} ({})", self.number(), self.name());
        match self {
            PolicyRule::ConfidentCompletion => {
                if input.confidence < config.completion_threshold {
                    return None;
                }
                let (wait, basis) = if input.signals.has_strong() {
                    (0, format!("strong {}", tags(&input.signals.strong_completion)))
                } else {
                    (
                        config.weak_completion_wait_ms,
                        format!("weak {}", tags(&input.signals.weak_completion)),
                    )
                };
                Some(Decision::new(
                    TurnAction::Respond,
                    wait,
                    format!(
                        "{prefix}: confidence {:.2} >= threshold {:.2}, {basis}",
                        input.confidence, config.completion_threshold
                    ),
                ))
            }
            PolicyRule::ContinuationHold => {
                if !input.signals.has_continuation() {
                    return None;
                }
                Some(Decision::new(
                    TurnAction::Wait,
                    config.continuation_wait_ms,
                    format!(
                        "{prefix}: continuation {}",
                        tags(&input.signals.continuation)
                    ),
                ))
            }
            PolicyRule::LowConfidence => {
                if input.confidence >= LOW_CONFIDENCE {
                    return None;
                }
                if input.silence_ms > PROMPT_SILENCE_MS {
                    let mut decision = Decision::new(
                        TurnAction::PromptContinuation,
                        0,
                        format!(
                            "{prefix}: confidence {:.2} < {LOW_CONFIDENCE:.2} after {}ms silence (> {PROMPT_SILENCE_MS}ms), prompting",
                            input.confidence, input.silence_ms
                        ),
                    );
                    decision.use_filler_phrase = true;
                    Some(decision)
                } else {
                    let remaining = config.max_wait_ms.saturating_sub(input.silence_ms);
                    Some(Decision::new(
                        TurnAction::Wait,
                        config.continuation_wait_ms.min(remaining),
                        format!(
                            "{prefix}: confidence {:.2} < {LOW_CONFIDENCE:.2}, {}ms silence",
                            input.confidence, input.silence_ms
                        ),
                    ))
                }
            }
            PolicyRule::Uncertain => Some(uncertain(input, config)),
        }
    }
}

fn uncertain(input: &PolicyInput<'_>, config: &PolicyConfig) -> Decision {
    let rule = PolicyRule::Uncertain;
    Decision::new(
        TurnAction::Wait,
        config.weak_completion_wait_ms,
        format!(
            "rule {} ({}): confidence {:.2} below threshold {:.2}",
            rule.number(),
            rule.name(),
            input.confidence,
            config.completion_threshold
        ),
    )
}

fn tags(list: &[String]) -> String {
    format!("[{}]", list.join(", "))
}

/// Ordered rule list plus the escape valve.
#[derive(Debug, Clone)]
pub struct ActionPolicy {
    config: PolicyConfig,
    rules: Vec<PolicyRule>,
}

impl Default for ActionPolicy {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}

impl ActionPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self::with_rules(config, PolicyRule::DEFAULT_ORDER.to_vec())
    }

    /// Build a policy with a custom rule order.
    ///
    /// When no listed rule matches, `uncertain` decides.
    pub fn with_rules(config: PolicyConfig, rules: Vec<PolicyRule>) -> Self {
        Self { config, rules }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn rules(&self) -> &[PolicyRule] {
        &self.rules
    }

    /// Pick an action. Never fails.
    pub fn decide(&self, input: &PolicyInput<'_>) -> Decision {
        let mut decision = self
            .rules
            .iter()
            .find_map(|rule| rule.evaluate(input, &self.config))
            .unwrap_or_else(|| uncertain(input, &self.config));

        if let Some(valve) = self.escape_valve(input, &decision) {
            if decision.action != TurnAction::Respond {
                tracing::warn!(
                    silence_ms = input.silence_ms,
                    max_wait_ms = self.config.max_wait_ms,
                    overridden = %decision.action,
                    "max wait exceeded, forcing response"
                );
            }
            decision = valve;
        }

        decision.recommended_wait_ms = decision.recommended_wait_ms.min(self.config.max_wait_ms);
        decision.reason = self.explain(decision.reason, input);
        decision
    }

    /// Rule 5: silence at or beyond max wait always responds.
    fn escape_valve(&self, input: &PolicyInput<'_>, overridden: &Decision) -> Option<Decision> {
        if input.silence_ms < self.config.max_wait_ms {
            return None;
        }
        Some(Decision::new(
            TurnAction::Respond,
            0,
            format!(
                "rule 5 (escape_valve): max wait exceeded, {}ms silence >= {}ms; overrides {}",
                input.silence_ms, self.config.max_wait_ms, overridden.reason
            ),
        ))
    }

    fn explain(&self, reason: String, input: &PolicyInput<'_>) -> String {
        let s = input.signals;
        let mut out = format!(
            "{reason} | signals: strong={} weak={} continuation={}",
            tags(&s.strong_completion),
            tags(&s.weak_completion),
            tags(&s.continuation)
        );
        if let Some(breakdown) = input.breakdown {
            out.push_str(&format!(" | score: {breakdown}"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(strong: &[&str], weak: &[&str], continuation: &[&str]) -> DetectedSignals {
        let own = |v: &[&str]| -> Vec<String> { v.iter().map(|s| s.to_string()).collect() };
        DetectedSignals {
            strong_completion: own(strong),
            weak_completion: own(weak),
            continuation: own(continuation),
        }
    }

    fn decide(confidence: f32, s: &DetectedSignals, silence_ms: u64) -> Decision {
        ActionPolicy::default().decide(&PolicyInput {
            confidence,
            signals: s,
            silence_ms,
            breakdown: None,
        })
    }

    #[test]
    fn test_rule1_strong_responds_immediately() {
        let s = signals(&["question_ending"], &[], &[]);
        let d = decide(0.8, &s, 500);
        assert_eq!(d.action, TurnAction::Respond);
        assert_eq!(d.recommended_wait_ms, 0);
        assert!(d.reason.starts_with("rule 1 (confident_completion)"));
        assert!(d.reason.contains("question_ending"));
    }

    #[test]
    fn test_rule1_weak_waits_briefly() {
        let s = signals(&[], &["statement_ending", "sentence_length:6"], &[]);
        let d = decide(0.8, &s, 500);
        assert_eq!(d.action, TurnAction::Respond);
        assert_eq!(d.recommended_wait_ms, 800);
    }

    #[test]
    fn test_rule1_threshold_is_inclusive() {
        let s = signals(&[], &[], &[]);
        let d = decide(0.65, &s, 500);
        assert_eq!(d.action, TurnAction::Respond);
    }

    #[test]
    fn test_rule2_continuation_waits() {
        let s = signals(&[], &[], &["conjunction:and"]);
        let d = decide(0.5, &s, 500);
        assert_eq!(d.action, TurnAction::Wait);
        assert_eq!(d.recommended_wait_ms, 2000);
        assert!(d.reason.starts_with("rule 2 (continuation_hold): continuation [conjunction:and]"));
    }

    #[test]
    fn test_rule3_prompts_after_long_silence() {
        let s = signals(&[], &[], &[]);
        let d = decide(0.3, &s, 3500);
        assert_eq!(d.action, TurnAction::PromptContinuation);
        assert!(d.use_filler_phrase);
        assert_eq!(d.recommended_wait_ms, 0);
        assert!(d.reason.starts_with("rule 3 (low_confidence)"));
    }

    #[test]
    fn test_rule3_waits_bounded_by_remaining_time() {
        let s = signals(&[], &[], &[]);
        let d = decide(0.3, &s, 3000);
        assert_eq!(d.action, TurnAction::Wait);
        assert_eq!(d.recommended_wait_ms, 2000);

        let d = decide(0.3, &s, 1000);
        assert_eq!(d.recommended_wait_ms, 2000);
        assert!(!d.use_filler_phrase);
    }

    #[test]
    fn test_rule3_remaining_time_shorter_than_continuation_wait() {
        let config = PolicyConfig {
            max_wait_ms: 4000,
            ..PolicyConfig::default()
        };
        let policy = ActionPolicy::new(config);
        let s = signals(&[], &[], &[]);
        let d = policy.decide(&PolicyInput {
            confidence: 0.2,
            signals: &s,
            silence_ms: 2500,
            breakdown: None,
        });
        assert_eq!(d.action, TurnAction::Wait);
        assert_eq!(d.recommended_wait_ms, 1500);
    }

    #[test]
    fn test_rule4_uncertain_band() {
        let s = signals(&[], &["sentence_length:4"], &[]);
        let d = decide(0.5, &s, 500);
        assert_eq!(d.action, TurnAction::Wait);
        assert_eq!(d.recommended_wait_ms, 800);
        assert!(d.reason.starts_with("rule 4 (uncertain)"));
    }

    #[test]
    fn test_escape_valve_overrides_continuation() {
        let s = signals(&[], &[], &["hesitation:hmm"]);
        let d = decide(0.2, &s, 5000);
        assert_eq!(d.action, TurnAction::Respond);
        assert_eq!(d.recommended_wait_ms, 0);
        assert!(!d.use_filler_phrase);
        assert!(d.reason.starts_with("rule 5 (escape_valve): max wait exceeded"));
        assert!(d.reason.contains("overrides rule 2"));
    }

    #[test]
    fn test_escape_valve_not_triggered_below_max() {
        let s = signals(&[], &[], &["hesitation:hmm"]);
        let d = decide(0.2, &s, 4999);
        assert_eq!(d.action, TurnAction::Wait);
    }

    #[test]
    fn test_rules_evaluate_independently() {
        let s = signals(&[], &[], &["conjunction:and"]);
        let input = PolicyInput {
            confidence: 0.9,
            signals: &s,
            silence_ms: 0,
            breakdown: None,
        };
        let config = PolicyConfig::default();
        assert!(PolicyRule::ConfidentCompletion.evaluate(&input, &config).is_some());
        assert!(PolicyRule::ContinuationHold.evaluate(&input, &config).is_some());
        assert!(PolicyRule::LowConfidence.evaluate(&input, &config).is_none());
        assert!(PolicyRule::Uncertain.evaluate(&input, &config).is_some());
    }

    #[test]
    fn test_custom_order_changes_precedence() {
        let policy = ActionPolicy::with_rules(
            PolicyConfig::default(),
            vec![PolicyRule::ContinuationHold, PolicyRule::ConfidentCompletion],
        );
        let s = signals(&["question_ending"], &[], &["conjunction:and"]);
        let d = policy.decide(&PolicyInput {
            confidence: 0.9,
            signals: &s,
            silence_ms: 0,
            breakdown: None,
        });
        assert_eq!(d.action, TurnAction::Wait);
        assert!(d.reason.starts_with("rule 2"));
    }

    #[test]
    fn test_empty_rule_list_falls_back_to_uncertain() {
        let policy = ActionPolicy::with_rules(PolicyConfig::default(), Vec::new());
        let s = DetectedSignals::default();
        let d = policy.decide(&PolicyInput {
            confidence: 0.1,
            signals: &s,
            silence_ms: 0,
            breakdown: None,
        });
        assert_eq!(d.action, TurnAction::Wait);
        assert_eq!(d.recommended_wait_ms, 800);
    }

    #[test]
    fn test_wait_clamped_to_max_wait() {
        let config = PolicyConfig {
            continuation_wait_ms: 9000,
            max_wait_ms: 5000,
            ..PolicyConfig::default()
        };
        let policy = ActionPolicy::new(config);
        let s = signals(&[], &[], &["conjunction:and"]);
        let d = policy.decide(&PolicyInput {
            confidence: 0.3,
            signals: &s,
            silence_ms: 0,
            breakdown: None,
        });
        assert_eq!(d.recommended_wait_ms, 5000);
    }

    #[test]
    fn test_default_order() {
        let policy = ActionPolicy::default();
        let numbers: Vec<u8> = policy.rules().iter().map(PolicyRule::number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }
}
