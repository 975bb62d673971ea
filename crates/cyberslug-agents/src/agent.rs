//! The Cyberslug agent: body, path history, and its control components.

use std::collections::VecDeque;

use cyberslug_types::{
    AgentSnapshot, EncounterCounts, LearnedValues, PathPoint, Position, PreyKind, SensorReadout,
};
use cyberslug_world::{Arena, OdorField, step_along, wrap_degrees};

use crate::affect::{AffectOutcome, AffectiveController};
use crate::config::AgentConfig;
use crate::encounter::EncounterResolver;
use crate::error::AgentError;
use crate::learning::AssociativeLearning;
use crate::sensors::SensorModel;

/// The single foraging agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Cyberslug {
    position: Position,
    heading: f64,
    speed: f64,
    heading_gain: f64,
    initial_heading: f64,
    path: VecDeque<PathPoint>,
    path_limit: usize,
    sensors: SensorModel,
    resolver: EncounterResolver,
    learning: AssociativeLearning,
    affect: AffectiveController,
    encounters: EncounterCounts,
}

impl Cyberslug {
    /// Build the agent at the arena center.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] if any part of `config` is out
    /// of range.
    pub fn new(config: &AgentConfig, arena: &Arena) -> Result<Self, AgentError> {
        config.validate()?;
        let position = arena.center();
        let mut path = VecDeque::new();
        path.push_back(PathPoint::Point { position });
        Ok(Self {
            position,
            heading: wrap_degrees(config.initial_heading),
            speed: config.speed,
            heading_gain: config.heading_gain,
            initial_heading: wrap_degrees(config.initial_heading),
            path,
            path_limit: config.path_limit,
            sensors: SensorModel::new(&config.sensors),
            resolver: EncounterResolver::new(&config.footprint),
            learning: AssociativeLearning::new(config.learning.clone()),
            affect: AffectiveController::new(config.affect.clone()),
            encounters: EncounterCounts::default(),
        })
    }

    /// Current position.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current heading in degrees, `[0, 360)`.
    pub const fn heading(&self) -> f64 {
        self.heading
    }

    /// Path history, oldest first.
    pub const fn path(&self) -> &VecDeque<PathPoint> {
        &self.path
    }

    /// Encounter resolver for this agent's body.
    pub const fn resolver(&self) -> &EncounterResolver {
        &self.resolver
    }

    /// Learned values `Vh`, `Vf`, `Vd`.
    pub const fn learned(&self) -> &LearnedValues {
        self.learning.values()
    }

    /// Counted encounters per kind.
    pub const fn encounters(&self) -> &EncounterCounts {
        &self.encounters
    }

    /// The affective controller.
    pub const fn affect(&self) -> &AffectiveController {
        &self.affect
    }

    /// Sample the field with both sensors.
    pub fn sense(&self, field: &OdorField) -> SensorReadout {
        self.sensors.sense(field, self.position, self.heading)
    }

    /// Run the affective update for this tick.
    pub fn update(&mut self, readout: &SensorReadout, encounter: Option<PreyKind>) -> AffectOutcome {
        self.affect
            .update(readout, encounter, &mut self.learning, &mut self.encounters)
    }

    /// Turn by `heading_gain * turn_angle` degrees clockwise.
    pub fn apply_turn(&mut self, turn_angle: f64) {
        self.heading = wrap_degrees(self.heading_gain.mul_add(-turn_angle, self.heading));
    }

    /// Move forward one step, wrap, and extend the path.
    ///
    /// A [`PathPoint::Break`] precedes the new point when the move crossed an
    /// arena edge. Returns true in that case.
    pub fn advance(&mut self, arena: &Arena) -> bool {
        let raw = step_along(self.position, self.heading, self.speed);
        let wrapped = arena.wrap(raw);
        if wrapped.crossed_edge {
            self.push_path(PathPoint::Break);
        }
        self.position = wrapped.position;
        self.push_path(PathPoint::Point {
            position: self.position,
        });
        wrapped.crossed_edge
    }

    /// Replace `alpha` for one kind.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidLearningRate`] for a rate that would not
    /// give a convex update.
    pub fn set_learning_rate(&mut self, kind: PreyKind, alpha: f64) -> Result<(), AgentError> {
        self.learning.set_alpha(kind, alpha)
    }

    /// Return to the initial state at the arena center.
    ///
    /// Learning parameters changed at runtime are kept.
    pub fn reset(&mut self, arena: &Arena) {
        self.position = arena.center();
        self.heading = self.initial_heading;
        self.path.clear();
        self.path.push_back(PathPoint::Point {
            position: self.position,
        });
        self.learning.reset();
        self.affect.reset();
        self.encounters = EncounterCounts::default();
    }

    /// Read-only projection for snapshots.
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            position: self.position,
            heading: self.heading,
            speed: self.speed,
            path: self.path.iter().copied().collect(),
            affect: self.affect.snapshot(),
            learned: *self.learning.values(),
            encounters: self.encounters,
        }
    }

    fn push_path(&mut self, point: PathPoint) {
        self.path.push_back(point);
        if self.path_limit > 0 {
            while self.path.len() > self.path_limit {
                self.path.pop_front();
            }
        }
    }
}
