//! Toroidal arena geometry.
//!
//! The arena is a rectangle whose opposite edges are joined. Anything that
//! leaves one side re-enters on the other; [`Arena::wrap`] reports when that
//! happened so the agent's path history can record a break.

use cyberslug_types::Position;
use rand::Rng;

use crate::config::ArenaConfig;
use crate::error::WorldError;

/// Result of wrapping a position into the arena.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wrapped {
    /// The position folded into `[0, width) x [0, height)`.
    pub position: Position,
    /// True when folding moved a coordinate by more than half the arena,
    /// i.e. the mover crossed an edge rather than drifting inside it.
    pub crossed_edge: bool,
}

/// Arena dimensions with wraparound helpers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    width: f64,
    height: f64,
}

impl Arena {
    /// Create an arena from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] if either dimension is not a
    /// positive finite number.
    pub fn new(config: &ArenaConfig) -> Result<Self, WorldError> {
        config.validate()?;
        Ok(Self {
            width: config.width,
            height: config.height,
        })
    }

    /// Arena width.
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Arena height.
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// The arena midpoint, where the agent starts.
    pub fn center(&self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Fold a position back into the arena.
    pub fn wrap(&self, raw: Position) -> Wrapped {
        let x = fold(raw.x, self.width);
        let y = fold(raw.y, self.height);
        let crossed_edge =
            (x - raw.x).abs() > self.width / 2.0 || (y - raw.y).abs() > self.height / 2.0;
        Wrapped {
            position: Position::new(x, y),
            crossed_edge,
        }
    }

    /// A uniformly random position in `[0, width) x [0, height)`.
    pub fn random_position(&self, rng: &mut impl Rng) -> Position {
        Position::new(
            fold(rng.random_range(0.0..self.width), self.width),
            fold(rng.random_range(0.0..self.height), self.height),
        )
    }
}

/// Normalize an angle in degrees to `[0, 360)`.
pub fn wrap_degrees(degrees: f64) -> f64 {
    fold(degrees, 360.0)
}

/// Floor-modulo into `[0, period)`.
fn fold(value: f64, period: f64) -> f64 {
    let folded = value.rem_euclid(period);
    // rem_euclid rounds up to exactly `period` for tiny negative inputs.
    if folded >= period { 0.0 } else { folded }
}

/// Step `distance` along `heading_degrees` from `origin` (no wrapping).
pub fn step_along(origin: Position, heading_degrees: f64, distance: f64) -> Position {
    let radians = heading_degrees.to_radians();
    Position::new(
        distance.mul_add(radians.cos(), origin.x),
        distance.mul_add(radians.sin(), origin.y),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn arena() -> Arena {
        Arena::new(&ArenaConfig::default()).unwrap_or(Arena {
            width: 600.0,
            height: 600.0,
        })
    }

    #[test]
    fn wrap_inside_is_identity() {
        let wrapped = arena().wrap(Position::new(10.0, 590.0));
        assert!(!wrapped.crossed_edge);
        assert!((wrapped.position.x - 10.0).abs() < 1e-12);
        assert!((wrapped.position.y - 590.0).abs() < 1e-12);
    }

    #[test]
    fn wrap_across_right_edge_marks_crossing() {
        let wrapped = arena().wrap(Position::new(601.5, 300.0));
        assert!(wrapped.crossed_edge);
        assert!((wrapped.position.x - 1.5).abs() < 1e-9);
    }

    #[test]
    fn wrap_across_top_edge_marks_crossing() {
        let wrapped = arena().wrap(Position::new(300.0, -2.0));
        assert!(wrapped.crossed_edge);
        assert!((wrapped.position.y - 598.0).abs() < 1e-9);
    }

    #[test]
    fn wrap_degrees_normalizes() {
        assert!((wrap_degrees(-90.0) - 270.0).abs() < 1e-12);
        assert!((wrap_degrees(725.0) - 5.0).abs() < 1e-12);
        assert!(wrap_degrees(-1e-18) < 360.0);
    }

    #[test]
    fn step_along_zero_heading_moves_right() {
        let p = step_along(Position::new(1.0, 1.0), 0.0, 3.0);
        assert!((p.x - 4.0).abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn random_positions_stay_in_bounds() {
        let arena = arena();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..1000 {
            let p = arena.random_position(&mut rng);
            assert!((0.0..arena.width()).contains(&p.x));
            assert!((0.0..arena.height()).contains(&p.y));
        }
    }

    #[test]
    fn random_positions_in_a_tiny_arena_exclude_the_far_edge() {
        let arena = Arena::new(&ArenaConfig {
            width: f64::MIN_POSITIVE,
            height: 1.0,
        })
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            let p = arena.random_position(&mut rng);
            assert!(p.x >= 0.0 && p.x < arena.width());
            assert!(p.y >= 0.0 && p.y < arena.height());
        }
    }

    #[test]
    fn nonpositive_arena_is_rejected() {
        let config = ArenaConfig {
            width: 0.0,
            height: 600.0,
        };
        assert!(Arena::new(&config).is_err());
    }
}
