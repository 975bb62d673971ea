//! Integration tests for the agent control loop against a live odor field.
//!
//! These drive sensing, encounter resolution and the affective update the
//! way a tick does, without the stepper, to check the agent-level contracts.

#![allow(clippy::unwrap_used)]

use cyberslug_agents::{AgentConfig, Cyberslug};
use cyberslug_types::{Position, PreyKind};
use cyberslug_world::{
    Arena, ArenaConfig, FieldConfig, OdorField, PopulationConfig, PreyConfig, PreyPopulation,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

struct World {
    arena: Arena,
    field: OdorField,
    prey: PreyPopulation,
    agent: Cyberslug,
    rng: SmallRng,
}

fn world(hermi: u32, flab: u32, drug: u32) -> World {
    let arena = Arena::new(&ArenaConfig::default()).unwrap();
    let mut rng = SmallRng::seed_from_u64(99);
    let prey = PreyPopulation::build(
        &PopulationConfig { hermi, flab, drug },
        &PreyConfig::default(),
        &arena,
        &mut rng,
    )
    .unwrap();
    World {
        field: OdorField::new(&arena, &FieldConfig::default()).unwrap(),
        agent: Cyberslug::new(&AgentConfig::default(), &arena).unwrap(),
        arena,
        prey,
        rng,
    }
}

impl World {
    /// One pass of encounter, sense, and affect.
    fn contact_tick(&mut self) -> Option<PreyKind> {
        let report = self.agent.resolver().resolve(
            self.agent.position(),
            self.agent.heading(),
            &mut self.prey,
            &self.arena,
            &mut self.rng,
        );
        let readout = self.agent.sense(&self.field);
        self.agent.update(&readout, report.kind).counted
    }

    fn park_all_prey_on_agent(&mut self) {
        let center = self.agent.position();
        for prey in self.prey.iter_mut() {
            prey.relocate(center, &self.arena);
        }
    }
}

#[test]
fn prey_on_agent_is_counted_learned_and_respawned() {
    let mut w = world(1, 0, 0);
    w.park_all_prey_on_agent();
    let before = w.prey.iter().next().map(|p| p.position());

    let counted = w.contact_tick();

    assert_eq!(counted, Some(PreyKind::Hermi));
    assert_eq!(w.agent.encounters().hermi, 1);
    assert!((w.agent.learned().hermi - 0.5).abs() < 1e-12);
    let after = w.prey.iter().next().map(|p| p.position());
    assert_ne!(before, after);
}

#[test]
fn touching_prey_every_tick_counts_once_per_window() {
    let mut w = world(1, 0, 0);
    let mut counted = 0_usize;
    for _ in 0..25 {
        w.park_all_prey_on_agent();
        if w.contact_tick().is_some() {
            counted = counted.saturating_add(1);
        }
    }
    // Windows open on ticks 0, 10 and 20.
    assert_eq!(counted, 3);
    assert_eq!(w.agent.encounters().hermi, 3);
}

#[test]
fn deposits_reach_the_left_sensor() {
    let mut w = world(0, 0, 0);
    // Left sensor at heading 0 samples four cells along +45 degrees.
    let target = Position::new(306.6, 306.6);
    w.field.deposit(target, &[0.5, 0.5, 0.0, 0.0]);
    let readout = w.agent.sense(&w.field);
    assert!(readout.raw_left[1] > 0.0);
    assert!(readout.raw_right[1].abs() < f64::EPSILON);
    let outcome = w.agent.update(&readout, None);
    assert!(w.agent.affect().snapshot().sns_odors[1] > 0.0);
    assert!(outcome.turn_angle.is_finite());
}

#[test]
fn long_run_stays_finite_and_bounded() {
    let mut w = world(4, 4, 4);
    for _ in 0..500 {
        w.prey.deposit_all(&mut w.field);
        w.field.step();
        w.prey.advance_all(&w.arena, &mut w.rng);
        let report = w.agent.resolver().resolve(
            w.agent.position(),
            w.agent.heading(),
            &mut w.prey,
            &w.arena,
            &mut w.rng,
        );
        let readout = w.agent.sense(&w.field);
        let outcome = w.agent.update(&readout, report.kind);
        w.agent.apply_turn(outcome.turn_angle);
        w.agent.advance(&w.arena);
    }
    let snapshot = w.agent.snapshot();
    assert!(snapshot.affect.turn_angle.is_finite());
    assert!((0.0..360.0).contains(&snapshot.heading));
    for kind in PreyKind::ALL {
        let v = snapshot.learned.get(kind);
        assert!((0.0..=1.0).contains(&v));
    }
    assert!(w.field.total_mass().is_finite());
}
