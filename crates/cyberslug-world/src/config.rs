//! Tunable parameters for the arena, the odor field, and prey.
//!
//! These structs are embedded in the engine's YAML configuration under the
//! `arena`, `field`, `prey`, and `population` keys. Every field has a
//! built-in default, so a partial YAML document is always valid input.

use cyberslug_types::{OdorVector, PreyKind};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Dimensions of the toroidal arena, in arena units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Arena width (default: 600).
    pub width: f64,
    /// Arena height (default: 600).
    pub height: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
        }
    }
}

impl ArenaConfig {
    /// Check that both dimensions are finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] naming the offending dimension.
    pub fn validate(&self) -> Result<(), WorldError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(WorldError::invalid("arena.width must be a positive number"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(WorldError::invalid("arena.height must be a positive number"));
        }
        Ok(())
    }
}

/// Resolution and dynamics of the odor field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of grid cells along x (default: 200).
    pub grid_width: usize,
    /// Number of grid cells along y (default: 200).
    pub grid_height: usize,
    /// Standard deviation of the diffusion kernel, in cells (default: 1.0).
    pub diffusion_sigma: f64,
    /// Kernel half-width in cells (default: 4, i.e. four sigmas).
    pub diffusion_radius: usize,
    /// Multiplicative decay applied after diffusion (default: 0.95).
    pub decay: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            grid_width: 200,
            grid_height: 200,
            diffusion_sigma: 1.0,
            diffusion_radius: 4,
            decay: 0.95,
        }
    }
}

impl FieldConfig {
    /// Check grid size, kernel shape and decay range.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] for an empty grid, a
    /// non-positive sigma, or a decay outside `(0, 1]`.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(WorldError::invalid("field grid must have at least one cell per axis"));
        }
        if self.diffusion_radius > 0
            && !(self.diffusion_sigma.is_finite() && self.diffusion_sigma > 0.0)
        {
            return Err(WorldError::invalid("field.diffusion_sigma must be positive"));
        }
        if !(self.decay.is_finite() && self.decay > 0.0 && self.decay <= 1.0) {
            return Err(WorldError::invalid("field.decay must be in (0, 1]"));
        }
        Ok(())
    }
}

/// Motion, size, and odor signatures of prey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreyConfig {
    /// Radius used for overlap tests (default: 4).
    pub radius: f64,
    /// Forward distance travelled per tick (default: 0.1).
    pub step: f64,
    /// Maximum heading change per tick in degrees, applied uniformly in
    /// `[-turn_jitter, turn_jitter]` (default: 1).
    pub turn_jitter: f64,
    /// Odor deposited by *Hermissenda* (default: betaine + hermi).
    pub hermi_odor: OdorVector,
    /// Odor deposited by *Flabellina* (default: betaine + flab).
    pub flab_odor: OdorVector,
    /// Odor deposited by the drug decoy (default: drug only).
    pub drug_odor: OdorVector,
}

impl Default for PreyConfig {
    fn default() -> Self {
        Self {
            radius: 4.0,
            step: 0.1,
            turn_jitter: 1.0,
            hermi_odor: [0.5, 0.5, 0.0, 0.0],
            flab_odor: [0.5, 0.0, 0.5, 0.0],
            drug_odor: [0.0, 0.0, 0.0, 0.5],
        }
    }
}

impl PreyConfig {
    /// The odor signature deposited by a prey kind.
    pub const fn odor_for(&self, kind: PreyKind) -> OdorVector {
        match kind {
            PreyKind::Hermi => self.hermi_odor,
            PreyKind::Flab => self.flab_odor,
            PreyKind::Drug => self.drug_odor,
        }
    }

    /// Check motion parameters and odor signatures.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] for negative or non-finite
    /// values.
    pub fn validate(&self) -> Result<(), WorldError> {
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(WorldError::invalid("prey.radius must be non-negative"));
        }
        if !(self.step.is_finite() && self.step >= 0.0) {
            return Err(WorldError::invalid("prey.step must be non-negative"));
        }
        if !(self.turn_jitter.is_finite() && self.turn_jitter >= 0.0) {
            return Err(WorldError::invalid("prey.turn_jitter must be non-negative"));
        }
        for kind in PreyKind::ALL {
            let odor = self.odor_for(kind);
            if odor.iter().any(|v| !(v.is_finite() && *v >= 0.0)) {
                return Err(WorldError::invalid(format!(
                    "prey.{kind}_odor must contain non-negative concentrations"
                )));
            }
        }
        Ok(())
    }
}

/// Number of prey of each kind placed in the arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// *Hermissenda* count (default: 4).
    pub hermi: u32,
    /// *Flabellina* count (default: 4).
    pub flab: u32,
    /// Drug decoy count (default: 4).
    pub drug: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            hermi: 4,
            flab: 4,
            drug: 4,
        }
    }
}

impl PopulationConfig {
    /// Largest accepted count for a single prey kind.
    pub const MAX_PER_KIND: u32 = 500;

    /// Check every count against [`Self::MAX_PER_KIND`].
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PopulationTooLarge`] naming the first oversized
    /// count.
    pub fn validate(&self) -> Result<(), WorldError> {
        for kind in PreyKind::ALL {
            let count = self.count(kind);
            if count > Self::MAX_PER_KIND {
                return Err(WorldError::PopulationTooLarge {
                    requested: u64::from(count),
                });
            }
        }
        Ok(())
    }

    /// Return the configured count for a prey kind.
    pub const fn count(&self, kind: PreyKind) -> u32 {
        match kind {
            PreyKind::Hermi => self.hermi,
            PreyKind::Flab => self.flab,
            PreyKind::Drug => self.drug,
        }
    }

    /// Replace the count for a prey kind.
    pub const fn set_count(&mut self, kind: PreyKind, count: u32) {
        match kind {
            PreyKind::Hermi => self.hermi = count,
            PreyKind::Flab => self.flab = count,
            PreyKind::Drug => self.drug = count,
        }
    }

    /// Total prey across all kinds.
    pub fn total(&self) -> u64 {
        PreyKind::ALL
            .iter()
            .map(|kind| u64::from(self.count(*kind)))
            .sum()
    }
}
