//! Rescorla-Wagner associative learning.
//!
//! Each learnable prey kind owns a value `V` that moves toward the
//! asymptote `lambda` by `alpha * beta * (lambda - V)` on every counted
//! encounter. With `0 <= alpha * beta <= 1` the update is a convex
//! interpolation, so `V` stays between its start value and `lambda`.

use cyberslug_types::{LearnedValues, PreyKind};

use crate::config::{LearningConfig, LearningParams};
use crate::error::AgentError;

/// One Rescorla-Wagner step.
pub fn rescorla_wagner(value: f64, params: &LearningParams) -> f64 {
    (params.alpha * params.beta).mul_add(params.lambda - value, value)
}

/// Learned values and their per-kind parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociativeLearning {
    params: LearningConfig,
    values: LearnedValues,
}

impl AssociativeLearning {
    /// Start with every learned value at zero.
    pub fn new(params: LearningConfig) -> Self {
        Self {
            params,
            values: LearnedValues::default(),
        }
    }

    /// Current learned values.
    pub const fn values(&self) -> &LearnedValues {
        &self.values
    }

    /// Current parameters.
    pub const fn params(&self) -> &LearningConfig {
        &self.params
    }

    /// Apply one update for `kind` and return the new value.
    pub fn reinforce(&mut self, kind: PreyKind) -> f64 {
        let params = *self.params.get(kind);
        let slot = self.values.get_mut(kind);
        *slot = rescorla_wagner(*slot, &params);
        *slot
    }

    /// Replace `alpha` for one kind.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidLearningRate`] if the new parameters
    /// would not be a valid convex step; the old rate is kept.
    pub fn set_alpha(&mut self, kind: PreyKind, alpha: f64) -> Result<(), AgentError> {
        let candidate = LearningParams {
            alpha,
            ..*self.params.get(kind)
        };
        candidate
            .validate(kind)
            .map_err(|_invalid| AgentError::InvalidLearningRate { kind, alpha })?;
        *self.params.get_mut(kind) = candidate;
        Ok(())
    }

    /// Zero every learned value. Parameters are kept.
    pub fn reset(&mut self) {
        self.values = LearnedValues::default();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn first_update_moves_by_alpha_beta_lambda() {
        let mut learning = AssociativeLearning::new(LearningConfig::default());
        let v = learning.reinforce(PreyKind::Hermi);
        assert!((v - 0.5).abs() < 1e-12);
        assert!(learning.values().flab.abs() < f64::EPSILON);
    }

    #[test]
    fn repeated_updates_contract_toward_lambda() {
        let mut learning = AssociativeLearning::new(LearningConfig::default());
        let mut previous_gap = 1.0;
        for _ in 0..20 {
            let v = learning.reinforce(PreyKind::Flab);
            let gap = 1.0 - v;
            assert!(gap >= 0.0);
            assert!(gap <= (1.0 - 0.5) * previous_gap + 1e-12);
            previous_gap = gap;
        }
    }

    #[test]
    fn value_is_bounded_by_lambda() {
        let params = LearningParams {
            alpha: 1.0,
            beta: 1.0,
            lambda: 0.8,
        };
        let mut v = 0.0;
        for _ in 0..5 {
            v = rescorla_wagner(v, &params);
            assert!((0.0..=0.8).contains(&v));
        }
    }

    #[test]
    fn values_above_lambda_contract_downward() {
        let params = LearningParams {
            alpha: 0.5,
            beta: 0.5,
            lambda: 0.2,
        };
        let mut v = 1.0;
        for _ in 0..30 {
            let next = rescorla_wagner(v, &params);
            assert!(next >= 0.2);
            assert!(next <= v);
            assert!(((next - 0.2) - 0.75 * (v - 0.2)).abs() < 1e-12);
            v = next;
        }
    }

    #[test]
    fn negative_lambda_is_approached_from_above() {
        let params = LearningParams {
            alpha: 0.5,
            beta: 1.0,
            lambda: -1.0,
        };
        let v = rescorla_wagner(0.0, &params);
        assert!((v + 0.5).abs() < 1e-12);
        let v = rescorla_wagner(v, &params);
        assert!((v + 0.75).abs() < 1e-12);
    }

    #[test]
    fn set_alpha_applies_to_one_kind() {
        let mut learning = AssociativeLearning::new(LearningConfig::default());
        learning.set_alpha(PreyKind::Drug, 0.25).unwrap();
        let v = learning.reinforce(PreyKind::Drug);
        assert!((v - 0.25).abs() < 1e-12);
        assert!((learning.params().hermi.alpha - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_alpha_is_rejected_and_old_rate_kept() {
        let mut learning = AssociativeLearning::new(LearningConfig::default());
        let err = learning.set_alpha(PreyKind::Hermi, -0.1).unwrap_err();
        assert!(matches!(err, AgentError::InvalidLearningRate { .. }));
        assert!((learning.params().hermi.alpha - 0.5).abs() < f64::EPSILON);
        assert!(learning.set_alpha(PreyKind::Hermi, f64::NAN).is_err());
    }

    #[test]
    fn reset_zeroes_values() {
        let mut learning = AssociativeLearning::new(LearningConfig::default());
        learning.reinforce(PreyKind::Hermi);
        learning.reset();
        assert_eq!(learning.values(), &LearnedValues::default());
    }
}
