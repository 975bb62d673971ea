//! Error types for the `cyberslug-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type.

/// Errors that can occur while building arena, field, or prey state.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A configuration value is outside its valid range.
    #[error("invalid world configuration: {reason}")]
    InvalidConfig {
        /// Explanation of which value is wrong and why.
        reason: String,
    },

    /// The requested population does not fit the prey id space.
    #[error("population of {requested} prey exceeds the supported maximum")]
    PopulationTooLarge {
        /// Total prey requested across all kinds.
        requested: u64,
    },
}

impl WorldError {
    /// Shorthand for building an [`WorldError::InvalidConfig`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
