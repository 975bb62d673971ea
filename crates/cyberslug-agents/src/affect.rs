//! The affective controller: from sensed odor and internal state to a turn.
//!
//! One call to [`AffectiveController::update`] runs the whole per-tick
//! pipeline, in this order:
//!
//! 1. Average the compressed left/right odor signals.
//! 2. If an encounter happened and the cooldown is idle: reinforce the
//!    kind's learned value, count it, start the cooldown, and add nutrition
//!    for food kinds.
//! 3. Pain and the pain switch.
//! 4. Nutrition decay and satiation.
//! 5. Positive/negative reward and incentive.
//! 6. Somatic map over `[hermi, flab, drug, pain]` with the pain factor
//!    overridden by the pain level.
//! 7. Appetitive state (fed back from last tick's switch).
//! 8. Appetitive switch.
//! 9. Turn angle.
//! 10. Cooldown countdown.
//!
//! Pain sensors are part of the state and flow through steps 3 and 6, but
//! nothing in the simulation raises them.

use cyberslug_types::{AffectSnapshot, EncounterCounts, OdorVector, PreyKind, SensorReadout};

use crate::config::AffectConfig;
use crate::learning::AssociativeLearning;

/// Result of one controller update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffectOutcome {
    /// Turn angle for this tick.
    pub turn_angle: f64,
    /// The encounter kind that was counted this tick, if any.
    ///
    /// `None` when there was no encounter or the cooldown suppressed it.
    pub counted: Option<PreyKind>,
}

/// Internal motivational state of the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AffectiveController {
    config: AffectConfig,
    nutrition: f64,
    satiation: f64,
    incentive: f64,
    reward_pos: f64,
    reward_neg: f64,
    pain: f64,
    pain_switch: f64,
    pain_left: f64,
    pain_right: f64,
    app_state: f64,
    app_state_switch: f64,
    somatic_map: f64,
    turn_angle: f64,
    encounter_timer: u32,
    sns_odors: OdorVector,
}

impl AffectiveController {
    /// Controller in its initial state.
    pub fn new(config: AffectConfig) -> Self {
        let nutrition = config.initial_nutrition;
        Self {
            config,
            nutrition,
            satiation: 0.0,
            incentive: 0.0,
            reward_pos: 0.0,
            reward_neg: 0.0,
            pain: 0.0,
            pain_switch: 0.0,
            pain_left: 0.0,
            pain_right: 0.0,
            app_state: 0.0,
            app_state_switch: 0.0,
            somatic_map: 0.0,
            turn_angle: 0.0,
            encounter_timer: 0,
            sns_odors: OdorVector::default(),
        }
    }

    /// Restore the initial state, keeping configuration.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    /// Current nutrition reserve.
    pub const fn nutrition(&self) -> f64 {
        self.nutrition
    }

    /// Remaining cooldown ticks.
    pub const fn encounter_timer(&self) -> u32 {
        self.encounter_timer
    }

    /// Turn angle from the last update.
    pub const fn turn_angle(&self) -> f64 {
        self.turn_angle
    }

    /// Read-only projection for snapshots.
    pub const fn snapshot(&self) -> AffectSnapshot {
        AffectSnapshot {
            nutrition: self.nutrition,
            satiation: self.satiation,
            incentive: self.incentive,
            reward_pos: self.reward_pos,
            reward_neg: self.reward_neg,
            pain: self.pain,
            pain_switch: self.pain_switch,
            app_state: self.app_state,
            app_state_switch: self.app_state_switch,
            somatic_map: self.somatic_map,
            turn_angle: self.turn_angle,
            encounter_timer: self.encounter_timer,
            sns_odors: self.sns_odors,
        }
    }

    /// Run one tick of the affective pipeline.
    pub fn update(
        &mut self,
        readout: &SensorReadout,
        encounter: Option<PreyKind>,
        learning: &mut AssociativeLearning,
        counts: &mut EncounterCounts,
    ) -> AffectOutcome {
        let c = &self.config;

        // 1. Bilateral average.
        let mut sns_odors = OdorVector::default();
        for ((avg, left), right) in sns_odors
            .iter_mut()
            .zip(&readout.sns_left)
            .zip(&readout.sns_right)
        {
            *avg = (left + right) / 2.0;
        }
        self.sns_odors = sns_odors;
        let [betaine, hermi, flab, drug] = sns_odors;

        // 2. Learning, gated by the cooldown.
        let mut counted = None;
        if let Some(kind) = encounter
            && self.encounter_timer == 0
        {
            learning.reinforce(kind);
            counts.increment(kind);
            self.encounter_timer = c.encounter_cooldown;
            if kind.is_nutritious() {
                self.nutrition += c.nutrition_increment;
            }
            counted = Some(kind);
        }
        let values = *learning.values();

        // 3. Pain.
        let sns_pain = (self.pain_left + self.pain_right) / 2.0;
        self.pain = c.pain_amplitude
            / (1.0 + (-c.pain_slope).mul_add(sns_pain + c.spontaneous_pain, c.pain_offset).exp());
        self.pain_switch =
            1.0 - 2.0 / (1.0 + (-c.pain_switch_slope * (sns_pain - c.pain_switch_threshold)).exp());

        // 4. Nutrition and satiation.
        self.nutrition -= c.nutrition_decay * self.nutrition;
        let curve = c
            .satiation_coefficient
            .mul_add((-c.satiation_slope).mul_add(self.nutrition, c.satiation_offset).exp(), 1.0);
        self.satiation = (1.0 / (curve * curve)).clamp(c.satiation_floor, 1.0);

        // 5. Incentive.
        let denominator = (c.betaine_hermi_weight * values.hermi)
            .mul_add(hermi, 1.0 - c.betaine_satiation_weight / self.satiation)
            .max(c.incentive_denominator_floor);
        self.reward_pos = (c.drug_reward_weight * values.drug).mul_add(
            drug,
            (c.hermi_reward_weight * values.hermi).mul_add(hermi, betaine / denominator),
        );
        self.reward_neg = c.flab_penalty_weight * values.flab * flab;
        self.incentive = self.reward_pos - self.reward_neg;

        // 6. Somatic map.
        let [_, hermi_left, flab_left, drug_left] = readout.sns_left;
        let [_, hermi_right, flab_right, drug_right] = readout.sns_right;
        let left = [hermi_left, flab_left, drug_left, self.pain_left];
        let right = [hermi_right, flab_right, drug_right, self.pain_right];
        let mut senses = [0.0; 4];
        for ((avg, l), r) in senses.iter_mut().zip(&left).zip(&right) {
            *avg = (l + r) / 2.0;
        }
        let total: f64 = senses.iter().sum();
        let [s_hermi, s_flab, s_drug, _] = senses;
        let factors = [
            2.0f64.mul_add(s_hermi, -total),
            2.0f64.mul_add(s_flab, -total),
            2.0f64.mul_add(s_drug, -total),
            self.pain,
        ];
        let gated: f64 = left
            .iter()
            .zip(&right)
            .zip(&factors)
            .map(|((l, r), factor)| (r - l) / (1.0 + (-c.somatic_slope * factor).exp()))
            .sum();
        self.somatic_map = -gated;

        // 7. Appetitive state.
        let drive = c.app_pain_switch_weight.mul_add(
            -(self.pain_switch * c.reward_experience),
            c.app_pain_weight
                .mul_add(-self.pain, c.app_satiation_weight.mul_add(-self.satiation, self.incentive)),
        );
        self.app_state = c.app_switch_feedback.mul_add(
            (self.app_state_switch - 1.0) * 0.5,
            c.app_state_baseline + sigmoid(drive),
        );

        // 8. Appetitive switch.
        self.app_state_switch =
            1.0 - 2.0 / (1.0 + (-c.app_switch_slope * (self.app_state - c.app_switch_threshold)).exp());

        // 9. Turn.
        let switch = self.app_state_switch;
        self.turn_angle = c.turn_gain
            * ((2.0 * switch) / (1.0 + (c.turn_somatic_slope * self.somatic_map).exp()) - switch);

        // 10. Cooldown.
        self.encounter_timer = self.encounter_timer.saturating_sub(1);

        AffectOutcome {
            turn_angle: self.turn_angle,
            counted,
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
