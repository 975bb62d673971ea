//! State shared by every observer handler.
//!
//! [`AppState`] holds the broadcast channel for tick summaries and the
//! in-memory snapshot that the REST endpoints serve. The engine writes both
//! from its tick callback; handlers only read.

use std::sync::Arc;

use cyberslug_agents::LearningConfig;
use cyberslug_core::operator::OperatorState;
use cyberslug_core::tick::{SimulationState, TickSummary};
use cyberslug_types::{EncounterCounts, Position, PreyKind, WorldSnapshot};
use tokio::sync::{RwLock, broadcast};

/// Ticks buffered per `WebSocket` subscriber before it starts skipping
/// ahead with [`broadcast::error::RecvError::Lagged`].
const BROADCAST_CAPACITY: usize = 256;

/// Per-tick message streamed on `/ws/ticks`.
///
/// This is a lightweight projection of [`TickSummary`] plus the agent
/// scalars a dashboard plots every tick.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TickBroadcast {
    /// The tick number.
    pub tick: u64,
    /// Agent position after the move.
    pub position: Position,
    /// Agent heading in degrees.
    pub heading: f64,
    /// Turn angle for this tick.
    pub turn_angle: f64,
    /// Kind touched this tick, if any.
    pub encounter: Option<PreyKind>,
    /// Kind counted this tick, if any.
    pub counted: Option<PreyKind>,
    /// Agent nutrition after the update.
    pub nutrition: f64,
    /// Appetitive switch after the update.
    pub app_state_switch: f64,
    /// Counted encounters so far.
    pub encounters: EncounterCounts,
}

impl TickBroadcast {
    /// Project a completed tick.
    pub fn new(summary: &TickSummary, state: &SimulationState) -> Self {
        let affect = state.agent.affect().snapshot();
        Self {
            tick: summary.tick,
            position: summary.position,
            heading: summary.heading,
            turn_angle: summary.turn_angle,
            encounter: summary.encounter,
            counted: summary.counted,
            nutrition: affect.nutrition,
            app_state_switch: affect.app_state_switch,
            encounters: *state.agent.encounters(),
        }
    }
}

/// What the engine last published for the REST endpoints.
#[derive(Debug, Clone, Default)]
pub struct SimulationSnapshot {
    /// The latest full world snapshot, published every
    /// `snapshot_interval_ticks` and after a reset.
    pub world_snapshot: Option<WorldSnapshot>,
    /// The latest tick, updated every tick.
    pub current_tick: u64,
    /// The latest per-tick broadcast.
    pub last_tick: Option<TickBroadcast>,
}

/// Axum state, shared as `Arc<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Sender behind `/ws/ticks`.
    pub tx: broadcast::Sender<TickBroadcast>,
    /// Latest publication.
    pub snapshot: Arc<RwLock<SimulationSnapshot>>,
    /// Run controls; `None` when serving without a simulation.
    pub operator_state: Option<Arc<OperatorState>>,
    /// Learning parameters used to check learning-rate commands before they
    /// are queued.
    pub learning: LearningConfig,
}

impl AppState {
    /// State with nothing published and no run controls.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(SimulationSnapshot::default())),
            operator_state: None,
            learning: LearningConfig::default(),
        }
    }

    /// State wired to a running simulation's controls.
    pub fn with_operator(operator: Arc<OperatorState>, learning: LearningConfig) -> Self {
        Self {
            operator_state: Some(operator),
            learning,
            ..Self::new()
        }
    }

    /// New `/ws/ticks` subscriber.
    pub fn subscribe(&self) -> broadcast::Receiver<TickBroadcast> {
        self.tx.subscribe()
    }

    /// Send a tick to every subscriber and return how many there were.
    pub fn broadcast(&self, summary: &TickBroadcast) -> usize {
        self.tx.send(summary.clone()).unwrap_or(0)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
