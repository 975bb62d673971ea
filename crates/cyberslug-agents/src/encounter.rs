//! Agent/prey overlap detection.
//!
//! The agent's body is an ellipse aligned with its heading. Each tick the
//! resolver walks the population in order, classifies every prey whose
//! center falls inside the body ellipse grown by the prey radius, and
//! respawns it. When several prey overlap in one tick, all of them respawn
//! and the last one in population order decides the reported kind.
//!
//! Overlap uses plain arena coordinates. A prey just across a wrapped edge
//! from the agent is not in contact until one of them wraps.

use cyberslug_types::{Position, PreyId, PreyKind};
use cyberslug_world::{Arena, Prey, PreyPopulation};
use rand::Rng;
use tracing::debug;

use crate::config::FootprintConfig;

/// Outcome of one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncounterReport {
    /// The winning classification, if any prey overlapped.
    pub kind: Option<PreyKind>,
    /// Every prey that overlapped and was respawned, in population order.
    pub respawned: Vec<PreyId>,
}

/// Detects and resolves contact between the agent and prey.
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterResolver {
    half_length: f64,
    half_width: f64,
}

impl EncounterResolver {
    /// Build a resolver for the given body shape.
    pub const fn new(footprint: &FootprintConfig) -> Self {
        Self {
            half_length: footprint.half_length,
            half_width: footprint.half_width,
        }
    }

    /// True when `prey` touches an agent at `position` facing `heading`.
    pub fn overlaps(&self, position: Position, heading: f64, prey: &Prey) -> bool {
        let radians = heading.to_radians();
        let (sin, cos) = radians.sin_cos();
        let dx = prey.position().x - position.x;
        let dy = prey.position().y - position.y;
        let along = dx.mul_add(cos, dy * sin);
        let across = dy.mul_add(cos, -(dx * sin));
        let a = self.half_length + prey.radius();
        let b = self.half_width + prey.radius();
        let u = along / a;
        let v = across / b;
        u.mul_add(u, v * v) <= 1.0
    }

    /// Classify and respawn every overlapping prey.
    pub fn resolve(
        &self,
        position: Position,
        heading: f64,
        population: &mut PreyPopulation,
        arena: &Arena,
        rng: &mut impl Rng,
    ) -> EncounterReport {
        let mut report = EncounterReport::default();
        for prey in population.iter_mut() {
            if self.overlaps(position, heading, prey) {
                report.kind = Some(prey.kind());
                report.respawned.push(prey.id());
                prey.respawn(arena, rng);
            }
        }
        if let Some(kind) = report.kind {
            debug!(
                kind = %kind,
                overlapping = report.respawned.len(),
                "Encounter resolved"
            );
        }
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use cyberslug_world::{ArenaConfig, PopulationConfig, PreyConfig};

    use super::*;

    fn resolver() -> EncounterResolver {
        EncounterResolver::new(&FootprintConfig::default())
    }

    fn arena() -> Arena {
        Arena::new(&ArenaConfig::default()).unwrap()
    }

    fn population_of(hermi: u32, flab: u32, drug: u32, rng: &mut SmallRng) -> PreyPopulation {
        let counts = PopulationConfig { hermi, flab, drug };
        PreyPopulation::build(&counts, &PreyConfig::default(), &arena(), rng).unwrap()
    }

    #[test]
    fn ellipse_is_longer_along_heading() {
        let mut rng = SmallRng::seed_from_u64(1);
        let arena = arena();
        let mut population = population_of(1, 0, 0, &mut rng);
        let center = Position::new(300.0, 300.0);
        let prey = population.iter_mut().next().unwrap();

        // 30 units ahead: inside the 36-unit grown half length.
        prey.relocate(Position::new(330.0, 300.0), &arena);
        assert!(resolver().overlaps(center, 0.0, prey));
        // Same offset sideways: outside the 18-unit grown half width.
        prey.relocate(Position::new(300.0, 330.0), &arena);
        assert!(!resolver().overlaps(center, 0.0, prey));
        // Rotating the body by 90 degrees swaps the two.
        assert!(resolver().overlaps(center, 90.0, prey));
    }

    #[test]
    fn resolve_respawns_and_reports_kind() {
        let mut rng = SmallRng::seed_from_u64(2);
        let arena = arena();
        let mut population = population_of(1, 0, 0, &mut rng);
        let center = Position::new(300.0, 300.0);
        if let Some(prey) = population.iter_mut().next() {
            prey.relocate(center, &arena);
        }
        let report = resolver().resolve(center, 0.0, &mut population, &arena, &mut rng);
        assert_eq!(report.kind, Some(PreyKind::Hermi));
        assert_eq!(report.respawned, vec![PreyId(0)]);
        assert_eq!(population.len(), 1);
        let moved = population.iter().next().map(Prey::position);
        assert_ne!(moved, Some(center));
    }

    #[test]
    fn last_overlapping_prey_wins() {
        let mut rng = SmallRng::seed_from_u64(3);
        let arena = arena();
        let mut population = population_of(1, 1, 1, &mut rng);
        let center = Position::new(300.0, 300.0);
        for prey in population.iter_mut() {
            if prey.kind() == PreyKind::Drug {
                prey.relocate(Position::new(100.0, 100.0), &arena);
            } else {
                prey.relocate(center, &arena);
            }
        }
        let report = resolver().resolve(center, 0.0, &mut population, &arena, &mut rng);
        assert_eq!(report.kind, Some(PreyKind::Flab));
        assert_eq!(report.respawned, vec![PreyId(0), PreyId(1)]);
    }

    #[test]
    fn no_overlap_reports_nothing() {
        let mut rng = SmallRng::seed_from_u64(4);
        let arena = arena();
        let mut population = population_of(2, 0, 0, &mut rng);
        for prey in population.iter_mut() {
            prey.relocate(Position::new(10.0, 10.0), &arena);
        }
        let report = resolver().resolve(
            Position::new(300.0, 300.0),
            0.0,
            &mut population,
            &arena,
            &mut rng,
        );
        assert_eq!(report, EncounterReport::default());
    }
}
