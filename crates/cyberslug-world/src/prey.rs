//! Scent-emitting prey and the population that owns them.
//!
//! Prey are never removed. An encounter respawns the prey in place: same id
//! and kind, fresh random position and heading.

use cyberslug_types::{OdorVector, Position, PreyId, PreyKind, PreyView};
use rand::Rng;
use tracing::debug;

use crate::arena::{Arena, step_along, wrap_degrees};
use crate::config::{PopulationConfig, PreyConfig};
use crate::error::WorldError;
use crate::odor_field::OdorField;

/// Motion parameters shared by every prey.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Motion {
    step: f64,
    turn_jitter: f64,
}

/// A single mobile odor source.
#[derive(Debug, Clone, PartialEq)]
pub struct Prey {
    id: PreyId,
    kind: PreyKind,
    position: Position,
    heading: f64,
    odor: OdorVector,
    radius: f64,
}

impl Prey {
    /// Spawn a prey at a random position with a random heading.
    pub fn spawn(
        id: PreyId,
        kind: PreyKind,
        config: &PreyConfig,
        arena: &Arena,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            id,
            kind,
            position: arena.random_position(rng),
            heading: random_heading(rng),
            odor: config.odor_for(kind),
            radius: config.radius,
        }
    }

    /// Population slot of this prey.
    pub const fn id(&self) -> PreyId {
        self.id
    }

    /// Prey category.
    pub const fn kind(&self) -> PreyKind {
        self.kind
    }

    /// Current position.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current heading in degrees.
    pub const fn heading(&self) -> f64 {
        self.heading
    }

    /// Odor signature deposited every tick.
    pub const fn odor(&self) -> &OdorVector {
        &self.odor
    }

    /// Radius used for overlap tests.
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Random-walk one tick: jitter the heading, step forward, wrap.
    fn advance(&mut self, motion: Motion, arena: &Arena, rng: &mut impl Rng) {
        let jitter = if motion.turn_jitter > 0.0 {
            rng.random_range(-motion.turn_jitter..=motion.turn_jitter)
        } else {
            0.0
        };
        self.heading = wrap_degrees(self.heading + jitter);
        let raw = step_along(self.position, self.heading, motion.step);
        self.position = arena.wrap(raw).position;
    }

    /// Move to a fresh random position and heading, keeping id and kind.
    pub fn respawn(&mut self, arena: &Arena, rng: &mut impl Rng) {
        self.position = arena.random_position(rng);
        self.heading = random_heading(rng);
    }

    /// Place the prey at `position` (wrapped into the arena), keeping its
    /// heading.
    pub fn relocate(&mut self, position: Position, arena: &Arena) {
        self.position = arena.wrap(position).position;
    }

    /// Read-only projection for snapshots.
    pub const fn view(&self) -> PreyView {
        PreyView {
            id: self.id,
            kind: self.kind,
            position: self.position,
            heading: self.heading,
            radius: self.radius,
        }
    }
}

fn random_heading(rng: &mut impl Rng) -> f64 {
    rng.random_range(0.0..360.0)
}

/// All prey in the arena, in a stable order.
///
/// The order is hermi, flab, then drug, each block in slot order. Encounter
/// resolution depends on it.
#[derive(Debug, Clone, PartialEq)]
pub struct PreyPopulation {
    prey: Vec<Prey>,
    motion: Motion,
}

impl PreyPopulation {
    /// Spawn `counts` prey of each kind.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] if the prey configuration is
    /// invalid, or [`WorldError::PopulationTooLarge`] if a count exceeds
    /// [`PopulationConfig::MAX_PER_KIND`].
    pub fn build(
        counts: &PopulationConfig,
        config: &PreyConfig,
        arena: &Arena,
        rng: &mut impl Rng,
    ) -> Result<Self, WorldError> {
        config.validate()?;
        counts.validate()?;
        let requested = counts.total();
        let total = u32::try_from(requested)
            .map_err(|_overflow| WorldError::PopulationTooLarge { requested })?;
        let capacity = usize::try_from(total)
            .map_err(|_overflow| WorldError::PopulationTooLarge { requested })?;

        let mut prey = Vec::with_capacity(capacity);
        let mut next_id: u32 = 0;
        for kind in PreyKind::ALL {
            for _ in 0..counts.count(kind) {
                prey.push(Prey::spawn(PreyId(next_id), kind, config, arena, rng));
                next_id = next_id.saturating_add(1);
            }
        }
        debug!(
            hermi = counts.hermi,
            flab = counts.flab,
            drug = counts.drug,
            "Prey population built"
        );

        Ok(Self {
            prey,
            motion: Motion {
                step: config.step,
                turn_jitter: config.turn_jitter,
            },
        })
    }

    /// Deposit every prey's odor signature into the field.
    pub fn deposit_all(&self, field: &mut OdorField) {
        for prey in &self.prey {
            field.deposit(prey.position, &prey.odor);
        }
    }

    /// Advance every prey by one tick of random walk.
    pub fn advance_all(&mut self, arena: &Arena, rng: &mut impl Rng) {
        let motion = self.motion;
        for prey in &mut self.prey {
            prey.advance(motion, arena, rng);
        }
    }

    /// Iterate prey in population order.
    pub fn iter(&self) -> impl Iterator<Item = &Prey> {
        self.prey.iter()
    }

    /// Iterate prey mutably in population order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Prey> {
        self.prey.iter_mut()
    }

    /// Number of prey.
    pub const fn len(&self) -> usize {
        self.prey.len()
    }

    /// True when the arena holds no prey.
    pub const fn is_empty(&self) -> bool {
        self.prey.is_empty()
    }

    /// Number of prey of one kind.
    pub fn count_of(&self, kind: PreyKind) -> usize {
        self.prey.iter().filter(|p| p.kind == kind).count()
    }

    /// Snapshot views of every prey in population order.
    pub fn views(&self) -> Vec<PreyView> {
        self.prey.iter().map(Prey::view).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::{ArenaConfig, FieldConfig};

    fn arena() -> Arena {
        Arena::new(&ArenaConfig::default()).unwrap()
    }

    fn population(seed: u64) -> PreyPopulation {
        let mut rng = SmallRng::seed_from_u64(seed);
        PreyPopulation::build(
            &PopulationConfig::default(),
            &PreyConfig::default(),
            &arena(),
            &mut rng,
        )
        .unwrap()
    }

    #[test]
    fn build_orders_kinds_and_assigns_sequential_ids() {
        let population = population(1);
        assert_eq!(population.len(), 12);
        let kinds: Vec<PreyKind> = population.iter().map(Prey::kind).collect();
        assert_eq!(kinds.first(), Some(&PreyKind::Hermi));
        assert_eq!(kinds.get(4), Some(&PreyKind::Flab));
        assert_eq!(kinds.get(11), Some(&PreyKind::Drug));
        for (expected, prey) in population.iter().enumerate() {
            assert_eq!(usize::try_from(prey.id().0).ok(), Some(expected));
        }
    }

    #[test]
    fn build_is_deterministic_for_a_seed() {
        assert_eq!(population(7), population(7));
        assert_ne!(population(7), population(8));
    }

    #[test]
    fn odor_signature_follows_kind() {
        let population = population(2);
        let config = PreyConfig::default();
        for prey in population.iter() {
            assert_eq!(*prey.odor(), config.odor_for(prey.kind()));
        }
    }

    #[test]
    fn advance_moves_by_step_and_stays_in_arena() {
        let arena = arena();
        let mut population = population(3);
        let mut rng = SmallRng::seed_from_u64(30);
        let before: Vec<Position> = population.iter().map(Prey::position).collect();
        population.advance_all(&arena, &mut rng);
        for (prey, old) in population.iter().zip(before) {
            let p = prey.position();
            assert!((0.0..arena.width()).contains(&p.x));
            assert!((0.0..arena.height()).contains(&p.y));
            let moved = p.distance_to(old);
            // Either a 0.1 step or a wrap across an edge.
            assert!((moved - 0.1).abs() < 1e-9 || moved > 300.0);
        }
    }

    #[test]
    fn respawn_keeps_identity() {
        let arena = arena();
        let mut population = population(4);
        let mut rng = SmallRng::seed_from_u64(40);
        let prey = population.iter_mut().nth(5).unwrap();
        let before = prey.clone();
        prey.respawn(&arena, &mut rng);
        assert_eq!(prey.id(), before.id());
        assert_eq!(prey.kind(), before.kind());
        assert_ne!(prey.position(), before.position());
        assert_eq!(population.len(), 12);
    }

    #[test]
    fn relocate_wraps_into_arena() {
        let arena = arena();
        let mut population = population(6);
        let prey = population.iter_mut().next().unwrap();
        prey.relocate(Position::new(-10.0, 610.0), &arena);
        assert!((prey.position().x - 590.0).abs() < 1e-9);
        assert!((prey.position().y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn deposit_all_marks_each_prey_cell() {
        let arena = arena();
        let population = population(5);
        let mut field =
            OdorField::new(&arena, &FieldConfig::default()).unwrap();
        population.deposit_all(&mut field);
        assert!(field.total_mass() > 0.0);
        let mass_per_kind = 4.0 * 0.5;
        assert!(field.channel_mass(cyberslug_types::OdorChannel::Drug) <= mass_per_kind + 1e-12);
    }

    #[test]
    fn empty_population_is_allowed() {
        let mut rng = SmallRng::seed_from_u64(0);
        let counts = PopulationConfig {
            hermi: 0,
            flab: 0,
            drug: 0,
        };
        let population =
            PreyPopulation::build(&counts, &PreyConfig::default(), &arena(), &mut rng)
                .unwrap();
        assert!(population.is_empty());
        assert_eq!(population.count_of(PreyKind::Hermi), 0);
    }

    #[test]
    fn oversized_population_is_rejected() {
        let mut rng = SmallRng::seed_from_u64(0);
        let counts = PopulationConfig {
            hermi: u32::MAX,
            flab: u32::MAX,
            drug: 0,
        };
        let result = PreyPopulation::build(&counts, &PreyConfig::default(), &arena(), &mut rng);
        assert!(matches!(result, Err(WorldError::PopulationTooLarge { .. })));
    }
}
