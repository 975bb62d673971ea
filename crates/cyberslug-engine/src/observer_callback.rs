//! Tick callback that updates the Observer API state.
//!
//! After each tick, this callback broadcasts a [`TickBroadcast`] to all
//! connected `WebSocket` clients and records the tick in the
//! [`SimulationSnapshot`]. The full world snapshot is republished every
//! `snapshot_interval_ticks` ticks, after every applied operator command,
//! and once more when the run ends.
//!
//! [`SimulationSnapshot`]: cyberslug_observer::SimulationSnapshot

use std::sync::Arc;

use cyberslug_core::operator::OperatorCommand;
use cyberslug_core::runner::TickCallback;
use cyberslug_core::tick::{SimulationState, TickSummary};
use cyberslug_observer::{AppState, TickBroadcast};
use tracing::{debug, warn};

/// Callback that bridges the tick cycle to the Observer API.
pub struct ObserverCallback {
    state: Arc<AppState>,
    snapshot_interval_ticks: u64,
    /// Set when a publication was due but the snapshot lock was busy.
    publish_pending: bool,
}

impl ObserverCallback {
    /// Create a new observer callback backed by the given app state.
    pub const fn new(state: Arc<AppState>, snapshot_interval_ticks: u64) -> Self {
        Self {
            state,
            snapshot_interval_ticks,
            publish_pending: false,
        }
    }

    fn publication_due(&self, tick: u64) -> bool {
        self.publish_pending || tick.checked_rem(self.snapshot_interval_ticks) == Some(0)
    }

    /// Publish a fresh session: the tick counter restarts and the last tick
    /// broadcast no longer applies.
    pub fn publish_session(&mut self, sim: &SimulationState) {
        if let Ok(mut snap) = self.state.snapshot.try_write() {
            snap.current_tick = sim.clock.tick();
            snap.last_tick = None;
            snap.world_snapshot = Some(sim.snapshot());
            self.publish_pending = false;
        } else {
            self.publish_pending = true;
        }
    }

    /// Publish the world as it stands, outside the snapshot interval.
    fn publish_world(&mut self, sim: &SimulationState) {
        if let Ok(mut snap) = self.state.snapshot.try_write() {
            snap.world_snapshot = Some(sim.snapshot());
            self.publish_pending = false;
            debug!(tick = sim.clock.tick(), "World snapshot published");
        } else {
            self.publish_pending = true;
        }
    }
}

impl TickCallback for ObserverCallback {
    fn on_tick(&mut self, summary: &TickSummary, sim: &SimulationState) {
        let broadcast = TickBroadcast::new(summary, sim);
        let receivers = self.state.broadcast(&broadcast);
        debug!(tick = summary.tick, receivers, "Tick broadcast sent");

        let publish = self.publication_due(summary.tick);

        // try_write keeps the tick loop from blocking on a REST reader; a
        // missed publication is retried on the next tick.
        if let Ok(mut snap) = self.state.snapshot.try_write() {
            snap.current_tick = summary.tick;
            snap.last_tick = Some(broadcast);
            if publish {
                snap.world_snapshot = Some(sim.snapshot());
                self.publish_pending = false;
                debug!(tick = summary.tick, "World snapshot published");
            }
        } else if publish {
            self.publish_pending = true;
        }
    }

    fn on_command(&mut self, command: OperatorCommand, sim: &SimulationState) {
        if command == OperatorCommand::Reset {
            self.publish_session(sim);
        } else {
            self.publish_world(sim);
        }
    }

    fn on_finish(&mut self, sim: &SimulationState) {
        self.publish_world(sim);
        if self.publish_pending {
            warn!(tick = sim.clock.tick(), "Final world snapshot not published");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cyberslug_core::config::SimulationConfig;
    use cyberslug_core::tick::run_tick;
    use cyberslug_types::PreyKind;

    use super::*;

    fn sim() -> SimulationState {
        SimulationState::new(&SimulationConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn publishes_world_snapshot_on_interval() {
        let state = Arc::new(AppState::new());
        let mut callback = ObserverCallback::new(Arc::clone(&state), 3);
        let mut sim = sim();

        for _ in 0..2 {
            let summary = run_tick(&mut sim).unwrap();
            callback.on_tick(&summary, &sim);
        }
        {
            let snap = state.snapshot.read().await;
            assert_eq!(snap.current_tick, 2);
            assert!(snap.last_tick.is_some());
            assert!(snap.world_snapshot.is_none());
        }

        let summary = run_tick(&mut sim).unwrap();
        callback.on_tick(&summary, &sim);
        let snap = state.snapshot.read().await;
        assert_eq!(snap.world_snapshot.as_ref().map(|w| w.tick), Some(3));
    }

    #[tokio::test]
    async fn busy_lock_defers_publication() {
        let state = Arc::new(AppState::new());
        let mut callback = ObserverCallback::new(Arc::clone(&state), 1);
        let mut sim = sim();

        {
            let _reader = state.snapshot.read().await;
            let summary = run_tick(&mut sim).unwrap();
            callback.on_tick(&summary, &sim);
        }
        assert!(state.snapshot.read().await.world_snapshot.is_none());

        let summary = run_tick(&mut sim).unwrap();
        callback.on_tick(&summary, &sim);
        let snap = state.snapshot.read().await;
        assert_eq!(snap.world_snapshot.as_ref().map(|w| w.tick), Some(2));
    }

    #[tokio::test]
    async fn reset_publishes_immediately() {
        let state = Arc::new(AppState::new());
        let mut callback = ObserverCallback::new(Arc::clone(&state), 100);
        let mut sim = sim();
        for _ in 0..5 {
            let summary = run_tick(&mut sim).unwrap();
            callback.on_tick(&summary, &sim);
        }
        sim.apply_command(OperatorCommand::Reset).unwrap();
        callback.on_command(OperatorCommand::Reset, &sim);

        let snap = state.snapshot.read().await;
        assert_eq!(snap.current_tick, 0);
        assert!(snap.last_tick.is_none());
        assert_eq!(snap.world_snapshot.as_ref().map(|w| w.tick), Some(0));
    }

    #[tokio::test]
    async fn applied_commands_publish_immediately() {
        let state = Arc::new(AppState::new());
        let mut callback = ObserverCallback::new(Arc::clone(&state), 100);
        let mut sim = sim();
        callback.publish_session(&sim);
        for _ in 0..5 {
            let summary = run_tick(&mut sim).unwrap();
            callback.on_tick(&summary, &sim);
        }

        let sensors_on = OperatorCommand::SetSensorDisplay { enabled: true };
        sim.apply_command(sensors_on).unwrap();
        callback.on_command(sensors_on, &sim);
        let drug_gone = OperatorCommand::SetPopulation {
            kind: PreyKind::Drug,
            count: 0,
        };
        sim.apply_command(drug_gone).unwrap();
        callback.on_command(drug_gone, &sim);

        let snap = state.snapshot.read().await;
        let world = snap.world_snapshot.as_ref().unwrap();
        assert_eq!(snap.current_tick, 5);
        assert!(snap.last_tick.is_some());
        assert_eq!(world.tick, 5);
        assert_eq!(world.prey.len(), 8);
        assert!(world.sensors.is_some());
    }

    #[tokio::test]
    async fn run_end_publishes_the_last_tick() {
        let state = Arc::new(AppState::new());
        let mut callback = ObserverCallback::new(Arc::clone(&state), 100);
        let mut sim = sim();
        for _ in 0..7 {
            let summary = run_tick(&mut sim).unwrap();
            callback.on_tick(&summary, &sim);
        }
        assert!(state.snapshot.read().await.world_snapshot.is_none());

        callback.on_finish(&sim);

        let snap = state.snapshot.read().await;
        assert_eq!(snap.world_snapshot.as_ref().map(|w| w.tick), Some(7));
    }
}
