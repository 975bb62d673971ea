//! Bilateral odor sensing.
//!
//! Two sensors sit `distance` grid cells from the agent's cell, at
//! `heading + offset` (left) and `heading - offset` (right). Raw samples are
//! log-compressed per channel: `0` at or below `epsilon`, otherwise
//! `K + log10(value)`.

use cyberslug_types::{OdorVector, Position, SensorReadout};
use cyberslug_world::OdorField;

use crate::config::SensorConfig;

/// Samples the odor field on both sides of the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorModel {
    distance: f64,
    offset_degrees: f64,
    epsilon: f64,
    compression_constant: f64,
}

impl SensorModel {
    /// Build a sensor model from (validated) configuration.
    pub const fn new(config: &SensorConfig) -> Self {
        Self {
            distance: config.distance,
            offset_degrees: config.offset_degrees,
            epsilon: config.epsilon,
            compression_constant: config.compression_constant,
        }
    }

    /// Compress one concentration.
    pub fn compress(&self, value: f64) -> f64 {
        if value <= self.epsilon || !value.is_finite() {
            return 0.0;
        }
        self.compression_constant + value.log10()
    }

    /// Compress every channel of a vector.
    pub fn compress_vector(&self, values: &OdorVector) -> OdorVector {
        values.map(|v| self.compress(v))
    }

    /// Sample both sensors and compress the readings.
    pub fn sense(&self, field: &OdorField, position: Position, heading: f64) -> SensorReadout {
        let raw_left = field.sample(position, heading + self.offset_degrees, self.distance);
        let raw_right = field.sample(position, heading - self.offset_degrees, self.distance);
        SensorReadout {
            raw_left,
            raw_right,
            sns_left: self.compress_vector(&raw_left),
            sns_right: self.compress_vector(&raw_right),
        }
    }
}
