//! Round configuration.

use crate::DEFAULT_MAX_STEPS;
use crate::vote::Rule;

/// Settings for a [`ProtocolState`](crate::ProtocolState).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundConfig {
    /// Values the source broadcasts on its first step, `None` when the
    /// driver sends into the channels itself.
    pub values: Option<[u64; 2]>,
    /// Rule the receivers vote with.
    pub rule: Rule,
    /// Steps the round may take before `try_advance` fails.
    pub max_steps: usize,
}

impl RoundConfig {
    /// Identity rule, nothing staged, default step limit.
    pub fn new() -> Self {
        Self {
            values: None,
            rule: Rule::Identity,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Stages `v1` for ch1 and `v2` for ch2.
    pub fn with_values(mut self, v1: u64, v2: u64) -> Self {
        self.values = Some([v1, v2]);
        self
    }

    /// Sets the vote rule.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rule = rule;
        self
    }

    /// Sets the step limit.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self::new()
    }
}
