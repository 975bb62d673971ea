//! Configuration constants and defaults for the agent.
//!
//! [`AgentConfig`] bundles every tunable of the agent: body motion, the
//! encounter footprint, bilateral sensing, per-kind learning parameters and
//! the constants of the affective equations. It is embedded in the engine's
//! YAML configuration under the `agent` key; any omitted value falls back to
//! its built-in default.

use cyberslug_types::PreyKind;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Top-level agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Forward distance per tick in arena units (default: 3).
    pub speed: f64,
    /// Heading change per unit of turn angle; the heading is updated as
    /// `heading -= heading_gain * turn_angle` (default: 2).
    pub heading_gain: f64,
    /// Heading after construction and reset, in degrees (default: 0).
    pub initial_heading: f64,
    /// Maximum number of path entries kept; oldest entries are dropped
    /// first. Zero keeps the full history (default: 20000).
    pub path_limit: usize,
    /// Encounter footprint.
    pub footprint: FootprintConfig,
    /// Bilateral sensor geometry and compression.
    pub sensors: SensorConfig,
    /// Rescorla-Wagner parameters per prey kind.
    pub learning: LearningConfig,
    /// Affective controller constants.
    pub affect: AffectConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            heading_gain: 2.0,
            initial_heading: 0.0,
            path_limit: 20_000,
            footprint: FootprintConfig::default(),
            sensors: SensorConfig::default(),
            learning: LearningConfig::default(),
            affect: AffectConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] for the first offending value.
    pub fn validate(&self) -> Result<(), AgentError> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(AgentError::invalid("agent.speed must be positive"));
        }
        if !self.heading_gain.is_finite() {
            return Err(AgentError::invalid("agent.heading_gain must be finite"));
        }
        if !self.initial_heading.is_finite() {
            return Err(AgentError::invalid("agent.initial_heading must be finite"));
        }
        self.footprint.validate()?;
        self.sensors.validate()?;
        self.learning.validate()?;
        self.affect.validate()
    }
}

/// Shape of the agent's body for overlap tests.
///
/// The body is an ellipse centered on the agent and aligned with its
/// heading. A prey overlaps when its center lies inside the ellipse grown by
/// the prey radius on both axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootprintConfig {
    /// Semi-axis along the heading (default: 32).
    pub half_length: f64,
    /// Semi-axis across the heading (default: 14).
    pub half_width: f64,
}

impl Default for FootprintConfig {
    fn default() -> Self {
        Self {
            half_length: 32.0,
            half_width: 14.0,
        }
    }
}

impl FootprintConfig {
    fn validate(&self) -> Result<(), AgentError> {
        if !(self.half_length.is_finite() && self.half_length > 0.0) {
            return Err(AgentError::invalid("agent.footprint.half_length must be positive"));
        }
        if !(self.half_width.is_finite() && self.half_width > 0.0) {
            return Err(AgentError::invalid("agent.footprint.half_width must be positive"));
        }
        Ok(())
    }
}

/// Bilateral sensor geometry and log compression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Sampling distance from the agent's cell, in grid cells (default: 4).
    pub distance: f64,
    /// Angular offset of each sensor from the heading, in degrees
    /// (default: 45). Left samples at `heading + offset`.
    pub offset_degrees: f64,
    /// Values at or below this floor compress to zero (default: 1e-7).
    pub epsilon: f64,
    /// Additive constant of the compression `K + log10(v)` (default: 7).
    pub compression_constant: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            distance: 4.0,
            offset_degrees: 45.0,
            epsilon: 1e-7,
            compression_constant: 7.0,
        }
    }
}

impl SensorConfig {
    fn validate(&self) -> Result<(), AgentError> {
        if !(self.distance.is_finite() && self.distance >= 0.0) {
            return Err(AgentError::invalid("agent.sensors.distance must be non-negative"));
        }
        if !self.offset_degrees.is_finite() {
            return Err(AgentError::invalid("agent.sensors.offset_degrees must be finite"));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(AgentError::invalid("agent.sensors.epsilon must be positive"));
        }
        if !self.compression_constant.is_finite() {
            return Err(AgentError::invalid(
                "agent.sensors.compression_constant must be finite",
            ));
        }
        Ok(())
    }
}

/// Rescorla-Wagner parameters for one prey kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningParams {
    /// Learning rate, replaceable at runtime (default: 0.5).
    pub alpha: f64,
    /// Salience of the stimulus (default: 1).
    pub beta: f64,
    /// Asymptote of the learned value (default: 1).
    pub lambda: f64,
}

impl Default for LearningParams {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 1.0,
            lambda: 1.0,
        }
    }
}

impl LearningParams {
    /// Validate one kind's parameters.
    ///
    /// `alpha * beta` must lie in `[0, 1]` so each update is a convex step
    /// toward `lambda`.
    pub fn validate(&self, kind: PreyKind) -> Result<(), AgentError> {
        let finite = self.alpha.is_finite() && self.beta.is_finite() && self.lambda.is_finite();
        if !finite || self.alpha < 0.0 || self.beta < 0.0 {
            return Err(AgentError::invalid(format!(
                "agent.learning.{kind} parameters must be finite and non-negative"
            )));
        }
        if self.alpha * self.beta > 1.0 {
            return Err(AgentError::invalid(format!(
                "agent.learning.{kind}: alpha * beta must not exceed 1"
            )));
        }
        Ok(())
    }
}

/// Per-kind learning parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Parameters for *Hermissenda* (`Vh`).
    pub hermi: LearningParams,
    /// Parameters for *Flabellina* (`Vf`).
    pub flab: LearningParams,
    /// Parameters for the drug decoy (`Vd`).
    pub drug: LearningParams,
}

impl LearningConfig {
    /// Parameters for a prey kind.
    pub const fn get(&self, kind: PreyKind) -> &LearningParams {
        match kind {
            PreyKind::Hermi => &self.hermi,
            PreyKind::Flab => &self.flab,
            PreyKind::Drug => &self.drug,
        }
    }

    /// Mutable parameters for a prey kind.
    pub const fn get_mut(&mut self, kind: PreyKind) -> &mut LearningParams {
        match kind {
            PreyKind::Hermi => &mut self.hermi,
            PreyKind::Flab => &mut self.flab,
            PreyKind::Drug => &mut self.drug,
        }
    }

    fn validate(&self) -> Result<(), AgentError> {
        for kind in PreyKind::ALL {
            self.get(kind).validate(kind)?;
        }
        Ok(())
    }
}

/// Constants of the affective equations.
///
/// Grouped in evaluation order. Names follow the quantity each constant
/// scales or offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffectConfig {
    // -- Encounters and nutrition --
    /// Ticks during which further encounters are not counted (default: 10).
    pub encounter_cooldown: u32,
    /// Nutrition at construction and reset (default: 0.5).
    pub initial_nutrition: f64,
    /// Nutrition gained per counted food encounter (default: 0.1).
    pub nutrition_increment: f64,
    /// Fraction of nutrition lost every tick (default: 0.005).
    pub nutrition_decay: f64,

    // -- Pain --
    /// Constant pain drive; nothing else currently raises pain (default: 2).
    pub spontaneous_pain: f64,
    /// Amplitude of the pain sigmoid (default: 10).
    pub pain_amplitude: f64,
    /// Slope of the pain sigmoid (default: 2).
    pub pain_slope: f64,
    /// Offset of the pain sigmoid (default: 10).
    pub pain_offset: f64,
    /// Slope of the pain switch (default: 10).
    pub pain_switch_slope: f64,
    /// Threshold of the pain switch (default: 0.2).
    pub pain_switch_threshold: f64,

    // -- Satiation --
    /// Coefficient of the exponential in the satiation curve (default: 0.7).
    pub satiation_coefficient: f64,
    /// Nutrition slope of the satiation curve (default: 4).
    pub satiation_slope: f64,
    /// Offset of the satiation curve (default: 2).
    pub satiation_offset: f64,
    /// Lower clamp on satiation (default: 1e-6).
    pub satiation_floor: f64,

    // -- Incentive --
    /// `Vh * hermi` weight in the betaine denominator (default: 0.05).
    pub betaine_hermi_weight: f64,
    /// Satiation term in the betaine denominator (default: 0.006).
    pub betaine_satiation_weight: f64,
    /// Lower clamp on the betaine denominator (default: 1e-3).
    pub incentive_denominator_floor: f64,
    /// Weight of `Vh * hermi` in the positive reward (default: 3).
    pub hermi_reward_weight: f64,
    /// Weight of `Vd * drug` in the positive reward (default: 8).
    pub drug_reward_weight: f64,
    /// Weight of `Vf * flab` in the negative reward (default: 0.59).
    pub flab_penalty_weight: f64,

    // -- Somatic map --
    /// Slope of the per-channel gating sigmoid (default: 50).
    pub somatic_slope: f64,

    // -- Appetitive state --
    /// Baseline of the appetitive state (default: 0.01).
    pub app_state_baseline: f64,
    /// Satiation weight in the appetitive drive (default: 8).
    pub app_satiation_weight: f64,
    /// Pain weight in the appetitive drive (default: 0.1).
    pub app_pain_weight: f64,
    /// Pain switch times reward experience weight (default: 0.1).
    pub app_pain_switch_weight: f64,
    /// Reward experience; no mechanism changes it (default: 0).
    pub reward_experience: f64,
    /// Feedback of the previous switch into the state (default: 0.1).
    pub app_switch_feedback: f64,
    /// Slope of the appetitive switch (default: 100).
    pub app_switch_slope: f64,
    /// Threshold of the appetitive switch (default: 0.245).
    pub app_switch_threshold: f64,

    // -- Turning --
    /// Amplitude of the turn angle (default: 3).
    pub turn_gain: f64,
    /// Somatic map slope in the turn sigmoid (default: 3).
    pub turn_somatic_slope: f64,
}

impl Default for AffectConfig {
    fn default() -> Self {
        Self {
            encounter_cooldown: 10,
            initial_nutrition: 0.5,
            nutrition_increment: 0.1,
            nutrition_decay: 0.005,
            spontaneous_pain: 2.0,
            pain_amplitude: 10.0,
            pain_slope: 2.0,
            pain_offset: 10.0,
            pain_switch_slope: 10.0,
            pain_switch_threshold: 0.2,
            satiation_coefficient: 0.7,
            satiation_slope: 4.0,
            satiation_offset: 2.0,
            satiation_floor: 1e-6,
            betaine_hermi_weight: 0.05,
            betaine_satiation_weight: 0.006,
            incentive_denominator_floor: 1e-3,
            hermi_reward_weight: 3.0,
            drug_reward_weight: 8.0,
            flab_penalty_weight: 0.59,
            somatic_slope: 50.0,
            app_state_baseline: 0.01,
            app_satiation_weight: 8.0,
            app_pain_weight: 0.1,
            app_pain_switch_weight: 0.1,
            reward_experience: 0.0,
            app_switch_feedback: 0.1,
            app_switch_slope: 100.0,
            app_switch_threshold: 0.245,
            turn_gain: 3.0,
            turn_somatic_slope: 3.0,
        }
    }
}

impl AffectConfig {
    /// Validate cooldown, nutrition dynamics and floors.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] for a zero cooldown, a decay
    /// outside `[0, 1)`, a non-positive floor, or any non-finite constant.
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.encounter_cooldown == 0 {
            return Err(AgentError::invalid(
                "agent.affect.encounter_cooldown must be at least 1",
            ));
        }
        if !(self.nutrition_decay.is_finite()
            && self.nutrition_decay >= 0.0
            && self.nutrition_decay < 1.0)
        {
            return Err(AgentError::invalid("agent.affect.nutrition_decay must be in [0, 1)"));
        }
        if !(self.initial_nutrition.is_finite() && self.initial_nutrition >= 0.0) {
            return Err(AgentError::invalid(
                "agent.affect.initial_nutrition must be non-negative",
            ));
        }
        if !(self.nutrition_increment.is_finite() && self.nutrition_increment >= 0.0) {
            return Err(AgentError::invalid(
                "agent.affect.nutrition_increment must be non-negative",
            ));
        }
        if !(self.satiation_floor.is_finite() && self.satiation_floor > 0.0) {
            return Err(AgentError::invalid("agent.affect.satiation_floor must be positive"));
        }
        if !(self.incentive_denominator_floor.is_finite() && self.incentive_denominator_floor > 0.0)
        {
            return Err(AgentError::invalid(
                "agent.affect.incentive_denominator_floor must be positive",
            ));
        }
        let constants = [
            self.spontaneous_pain,
            self.pain_amplitude,
            self.pain_slope,
            self.pain_offset,
            self.pain_switch_slope,
            self.pain_switch_threshold,
            self.satiation_coefficient,
            self.satiation_slope,
            self.satiation_offset,
            self.betaine_hermi_weight,
            self.betaine_satiation_weight,
            self.hermi_reward_weight,
            self.drug_reward_weight,
            self.flab_penalty_weight,
            self.somatic_slope,
            self.app_state_baseline,
            self.app_satiation_weight,
            self.app_pain_weight,
            self.app_pain_switch_weight,
            self.reward_experience,
            self.app_switch_feedback,
            self.app_switch_slope,
            self.app_switch_threshold,
            self.turn_gain,
            self.turn_somatic_slope,
        ];
        if constants.iter().any(|c| !c.is_finite()) {
            return Err(AgentError::invalid("agent.affect constants must be finite"));
        }
        Ok(())
    }
}
