//! Error types for the cyberslug-agents crate.
//!
//! Configuration problems are reported once, when the agent is built.
//! Runtime adjustments (learning rate changes) are checked individually.

use cyberslug_types::PreyKind;

/// Errors that can occur while building or adjusting the agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A configuration value is outside its valid range.
    #[error("invalid agent configuration: {reason}")]
    InvalidConfig {
        /// Explanation of which value is wrong and why.
        reason: String,
    },

    /// A runtime learning rate is negative or not finite.
    #[error("invalid learning rate {alpha} for {kind}")]
    InvalidLearningRate {
        /// The prey kind whose rate was being replaced.
        kind: PreyKind,
        /// The rejected value.
        alpha: f64,
    },
}

impl AgentError {
    /// Shorthand for building an [`AgentError::InvalidConfig`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
