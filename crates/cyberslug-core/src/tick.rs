//! Tick cycle: the fixed-order step that drives the Cyberslug simulation.
//!
//! Each call to [`run_tick`] runs these phases to completion:
//!
//! 1. **Deposit** -- every prey writes its odor signature into its cell.
//! 2. **Diffuse** -- the field blurs and decays once.
//! 3. **Prey motion** -- each prey jitters its heading, steps, and wraps.
//! 4. **Encounter** -- overlapping prey are classified and respawned.
//! 5. **Sense** -- both sensors sample the field.
//! 6. **Affect** -- the controller updates learning, nutrition, and the
//!    turn angle.
//! 7. **Motor** -- the heading turns, the agent steps, wraps, and extends
//!    its path.
//! 8. **Clock** -- the tick counter advances.
//!
//! Given the same configuration and seed, the cycle is deterministic.

use cyberslug_agents::{AgentError, Cyberslug};
use cyberslug_types::{Position, PreyId, PreyKind, SensorReadout, SessionId, WorldSnapshot};
use cyberslug_world::{Arena, OdorField, PreyPopulation, WorldError};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use crate::clock::{ClockError, SimClock};
use crate::config::{ConfigError, SimulationConfig};
use crate::operator::OperatorCommand;

/// Errors that can occur while building state or executing a tick.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// An agent operation failed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// The configuration failed validation.
    #[error("config error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed (1 for the first tick).
    pub tick: u64,
    /// Kind of prey touched this tick, if any.
    pub encounter: Option<PreyKind>,
    /// Kind counted this tick; `None` if nothing touched or the cooldown
    /// suppressed it.
    pub counted: Option<PreyKind>,
    /// Prey respawned this tick.
    pub respawned: Vec<PreyId>,
    /// Turn angle produced by the controller.
    pub turn_angle: f64,
    /// Agent heading after the turn.
    pub heading: f64,
    /// Agent position after the move.
    pub position: Position,
    /// Whether the agent wrapped across an arena edge.
    pub crossed_edge: bool,
    /// Total odor mass in the field after diffusion.
    pub field_mass: f64,
}

/// The mutable simulation state passed through the tick cycle.
///
/// Owns every component. Nothing here is shared between tasks; the runner
/// holds it exclusively and applies operator commands between ticks.
#[derive(Debug)]
pub struct SimulationState {
    /// The tick counter.
    pub clock: SimClock,
    /// Arena geometry.
    pub arena: Arena,
    /// The odor field.
    pub field: OdorField,
    /// All prey.
    pub prey: PreyPopulation,
    /// The agent.
    pub agent: Cyberslug,
    /// Seeded source for prey jitter and spawn placement.
    pub rng: SmallRng,
    /// Active configuration. Population changes are written back here.
    pub config: SimulationConfig,
    /// Identifier of this run.
    pub session_id: SessionId,
    /// Whether sensor readouts are kept, logged, and published.
    pub show_sensors: bool,
    /// Readout from the last tick while the diagnostic is on.
    pub last_sensors: Option<SensorReadout>,
}

impl SimulationState {
    /// Validate `config` and build a fresh session from it.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Config`] when validation fails, or the
    /// component error if a part cannot be built.
    pub fn new(config: &SimulationConfig) -> Result<Self, TickError> {
        config.validate()?;
        let arena = Arena::new(&config.arena)?;
        let field = OdorField::new(&arena, &config.field)?;
        let mut rng = SmallRng::seed_from_u64(config.world.seed);
        let prey = PreyPopulation::build(&config.population, &config.prey, &arena, &mut rng)?;
        let agent = Cyberslug::new(&config.agent, &arena)?;
        Ok(Self {
            clock: SimClock::new(),
            arena,
            field,
            prey,
            agent,
            rng,
            config: config.clone(),
            session_id: SessionId::new(),
            show_sensors: config.simulation.show_sensors,
            last_sensors: None,
        })
    }

    /// Reinitialize the session from the configured seed.
    ///
    /// The random source is reseeded before prey are rebuilt, so any number
    /// of consecutive resets produce the same state. Runtime learning rates
    /// and the current population counts are kept, as is the session id.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::World`] if the prey population cannot be
    /// rebuilt.
    pub fn reset(&mut self) -> Result<(), TickError> {
        self.rng = SmallRng::seed_from_u64(self.config.world.seed);
        self.prey = PreyPopulation::build(
            &self.config.population,
            &self.config.prey,
            &self.arena,
            &mut self.rng,
        )?;
        self.field.reset();
        self.agent.reset(&self.arena);
        self.clock.reset();
        self.last_sensors = None;
        info!(session_id = %self.session_id, "Simulation reset");
        Ok(())
    }

    /// Apply one operator command.
    ///
    /// On error the state is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::World`] for an oversized population, or
    /// [`TickError::Agent`] for an invalid learning rate.
    pub fn apply_command(&mut self, command: OperatorCommand) -> Result<(), TickError> {
        match command {
            OperatorCommand::SetPopulation { kind, count } => {
                let mut counts = self.config.population.clone();
                counts.set_count(kind, count);
                self.prey =
                    PreyPopulation::build(&counts, &self.config.prey, &self.arena, &mut self.rng)?;
                self.config.population = counts;
                info!(
                    %kind,
                    count,
                    total = self.prey.len(),
                    "Prey population rebuilt"
                );
            }
            OperatorCommand::SetLearningRate { kind, alpha } => {
                self.agent.set_learning_rate(kind, alpha)?;
                info!(%kind, alpha, "Learning rate changed");
            }
            OperatorCommand::SetSensorDisplay { enabled } => {
                self.show_sensors = enabled;
                self.last_sensors = enabled.then(|| self.agent.sense(&self.field));
                info!(enabled, "Sensor display toggled");
            }
            OperatorCommand::Reset => self.reset()?,
        }
        Ok(())
    }

    /// Read-only projection of the whole world.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            session_id: self.session_id,
            tick: self.clock.tick(),
            arena_width: self.arena.width(),
            arena_height: self.arena.height(),
            agent: self.agent.snapshot(),
            prey: self.prey.views(),
            sensors: if self.show_sensors {
                self.last_sensors
            } else {
                None
            },
        }
    }
}

/// Execute a single tick.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the tick counter would overflow.
pub fn run_tick(state: &mut SimulationState) -> Result<TickSummary, TickError> {
    let arena = state.arena;

    // --- Phase 1: Deposit ---
    state.prey.deposit_all(&mut state.field);

    // --- Phase 2: Diffuse ---
    state.field.step();

    // --- Phase 3: Prey motion ---
    state.prey.advance_all(&arena, &mut state.rng);

    // --- Phase 4: Encounter ---
    let report = state.agent.resolver().resolve(
        state.agent.position(),
        state.agent.heading(),
        &mut state.prey,
        &arena,
        &mut state.rng,
    );

    // --- Phase 5: Sense ---
    let readout = state.agent.sense(&state.field);

    // --- Phase 6: Affect ---
    let outcome = state.agent.update(&readout, report.kind);

    // --- Phase 7: Motor ---
    state.agent.apply_turn(outcome.turn_angle);
    let crossed_edge = state.agent.advance(&arena);

    // --- Phase 8: Clock ---
    let tick = state.clock.advance()?;

    if state.show_sensors {
        debug!(
            tick,
            raw_left = ?readout.raw_left,
            raw_right = ?readout.raw_right,
            "Sensor readout"
        );
        state.last_sensors = Some(readout);
    }

    if let Some(kind) = outcome.counted {
        debug!(
            tick,
            %kind,
            total = state.agent.encounters().get(kind),
            learned = state.agent.learned().get(kind),
            "Encounter counted"
        );
    }

    let summary = TickSummary {
        tick,
        encounter: report.kind,
        counted: outcome.counted,
        respawned: report.respawned,
        turn_angle: outcome.turn_angle,
        heading: state.agent.heading(),
        position: state.agent.position(),
        crossed_edge,
        field_mass: state.field.total_mass(),
    };

    debug!(
        tick,
        turn_angle = summary.turn_angle,
        heading = summary.heading,
        field_mass = summary.field_mass,
        "Tick completed"
    );

    Ok(summary)
}
