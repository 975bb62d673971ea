//! Core data structs shared between the simulation and its consumers.
//!
//! The snapshot types at the bottom of this module are the read-only
//! projection the presentation layer consumes: positions, headings,
//! counters, affective scalars, and optional raw sensor readings.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{OdorVector, PreyKind};
use crate::ids::{PreyId, SessionId};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A continuous point in arena coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position (no wraparound).
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One entry of the agent's path history.
///
/// A [`PathPoint::Break`] is inserted whenever the agent wraps across an
/// arena edge, so consumers never join the two sides with a segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathPoint {
    /// A visited position.
    Point {
        /// The position the agent occupied.
        position: Position,
    },
    /// Discontinuity caused by an edge wrap.
    Break,
}

// ---------------------------------------------------------------------------
// Per-kind scalar tables
// ---------------------------------------------------------------------------

/// Learned associative values, one per learnable prey kind.
///
/// These are `Vh`, `Vf` and `Vd` of the Rescorla-Wagner model.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LearnedValues {
    /// Learned value of *Hermissenda* (`Vh`).
    pub hermi: f64,
    /// Learned value of *Flabellina* (`Vf`).
    pub flab: f64,
    /// Learned value of the drug decoy (`Vd`).
    pub drug: f64,
}

impl LearnedValues {
    /// Return the learned value for a prey kind.
    pub const fn get(&self, kind: PreyKind) -> f64 {
        match kind {
            PreyKind::Hermi => self.hermi,
            PreyKind::Flab => self.flab,
            PreyKind::Drug => self.drug,
        }
    }

    /// Mutable access to the learned value for a prey kind.
    pub const fn get_mut(&mut self, kind: PreyKind) -> &mut f64 {
        match kind {
            PreyKind::Hermi => &mut self.hermi,
            PreyKind::Flab => &mut self.flab,
            PreyKind::Drug => &mut self.drug,
        }
    }
}

/// Number of counted encounters per prey kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EncounterCounts {
    /// Counted *Hermissenda* encounters.
    pub hermi: u64,
    /// Counted *Flabellina* encounters.
    pub flab: u64,
    /// Counted drug decoy encounters.
    pub drug: u64,
}

impl EncounterCounts {
    /// Return the counter for a prey kind.
    pub const fn get(&self, kind: PreyKind) -> u64 {
        match kind {
            PreyKind::Hermi => self.hermi,
            PreyKind::Flab => self.flab,
            PreyKind::Drug => self.drug,
        }
    }

    /// Increment the counter for a prey kind (saturating).
    pub const fn increment(&mut self, kind: PreyKind) {
        let slot = match kind {
            PreyKind::Hermi => &mut self.hermi,
            PreyKind::Flab => &mut self.flab,
            PreyKind::Drug => &mut self.drug,
        };
        *slot = slot.saturating_add(1);
    }

    /// Total counted encounters across all kinds.
    pub const fn total(&self) -> u64 {
        self.hermi.saturating_add(self.flab).saturating_add(self.drug)
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// The affective scalar state of the agent, for numeric display.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AffectSnapshot {
    /// Internal nutrition reserve.
    pub nutrition: f64,
    /// Satiation derived from nutrition, in `(0, 1]`.
    pub satiation: f64,
    /// Net incentive (`reward_pos - reward_neg`).
    pub incentive: f64,
    /// Positive reward component.
    pub reward_pos: f64,
    /// Negative reward component.
    pub reward_neg: f64,
    /// Squashed pain level.
    pub pain: f64,
    /// Signed pain switch in `(-1, 1)`.
    pub pain_switch: f64,
    /// Appetitive state.
    pub app_state: f64,
    /// Smoothed bistable appetitive switch in `(-1, 1)`.
    pub app_state_switch: f64,
    /// Signed somatic map driving turn direction.
    pub somatic_map: f64,
    /// Turn angle produced this tick.
    pub turn_angle: f64,
    /// Remaining encounter cooldown ticks.
    pub encounter_timer: u32,
    /// Bilateral average of the compressed odor signals.
    pub sns_odors: OdorVector,
}

/// Raw and compressed bilateral sensor readings (debug overlay).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SensorReadout {
    /// Raw field sample at the left sensor.
    pub raw_left: OdorVector,
    /// Raw field sample at the right sensor.
    pub raw_right: OdorVector,
    /// Log-compressed left signal.
    pub sns_left: OdorVector,
    /// Log-compressed right signal.
    pub sns_right: OdorVector,
}

/// Read-only view of the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentSnapshot {
    /// Current position.
    pub position: Position,
    /// Current heading in degrees, `[0, 360)`.
    pub heading: f64,
    /// Fixed forward speed per tick.
    pub speed: f64,
    /// Path history including wrap breaks.
    pub path: Vec<PathPoint>,
    /// Affective scalar state.
    pub affect: AffectSnapshot,
    /// Learned associative values.
    pub learned: LearnedValues,
    /// Counted encounters per kind.
    pub encounters: EncounterCounts,
}

/// Read-only view of one prey object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PreyView {
    /// Population slot of this prey.
    pub id: PreyId,
    /// Prey category.
    pub kind: PreyKind,
    /// Current position.
    pub position: Position,
    /// Current heading in degrees, `[0, 360)`.
    pub heading: f64,
    /// Radius used for overlap tests.
    pub radius: f64,
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldSnapshot {
    /// The session this snapshot belongs to.
    pub session_id: SessionId,
    /// Ticks executed since the last reset.
    pub tick: u64,
    /// Arena width in arena units.
    pub arena_width: f64,
    /// Arena height in arena units.
    pub arena_height: f64,
    /// The agent.
    pub agent: AgentSnapshot,
    /// All prey in population order.
    pub prey: Vec<PreyView>,
    /// Raw sensor readings, present only while the diagnostic is enabled.
    pub sensors: Option<SensorReadout>,
}
