//! Top-level simulation context
//!
//! Owns the meter, the mode controller, the roster, the alert bus and the
//! lures, and runs them in a fixed order each step:
//!
//! 1. corruption (may force the real world)
//! 2. sensing for every guard, feeding the meter
//! 3. group alert for a full detection
//! 4. meter drain/unlatch
//! 5. lure clocks and pulses
//! 6. guard movement (catches, falls)
//! 7. lure spawners
//!
//! Guards are processed in spawn order within each phase.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::alert::bus::{GroupAlert, GroupAlertBus};
use crate::core::config::StealthConfig;
use crate::core::error::{Result, StealthError};
use crate::core::types::{Facing, GroupId, GuardId, LureId, Tick, Vec2};
use crate::detection::meter::DetectionAccumulator;
use crate::guard::guard::{Guard, GuardIndicator, GuardOutcome, GuardProfile};
use crate::guard::roster::GuardRoster;
use crate::lure::attractor::LureAttractor;
use crate::lure::spawner::LureSpawner;
use crate::simulation::events::{GameOutcome, SimulationEvent};
use crate::simulation::surroundings::Surroundings;
use crate::spatial::sparse_hash::GuardGrid;
use crate::world::mode::{ModeChange, WorldMode, WorldModeController};

pub struct StealthSim {
    config: StealthConfig,
    tick: Tick,
    mode: WorldModeController,
    meter: DetectionAccumulator,
    roster: GuardRoster,
    alerts: GroupAlertBus,
    lures: Vec<LureAttractor>,
    spawners: Vec<LureSpawner>,
    next_lure: u32,
    grid: GuardGrid,
    rng: ChaCha8Rng,
    outcome: GameOutcome,
    /// Events raised between steps, handed out by the next step
    pending: Vec<SimulationEvent>,
}

impl StealthSim {
    pub fn new(config: StealthConfig) -> Self {
        let config = config.sanitized();
        Self {
            tick: 0,
            mode: WorldModeController::new(&config.corruption),
            meter: DetectionAccumulator::new(&config.detection),
            roster: GuardRoster::new(),
            alerts: GroupAlertBus::new(),
            lures: Vec::new(),
            spawners: Vec::new(),
            next_lure: 0,
            grid: GuardGrid::new(config.simulation.grid_cell_size),
            rng: ChaCha8Rng::seed_from_u64(config.simulation.seed),
            outcome: GameOutcome::Ongoing,
            pending: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &StealthConfig {
        &self.config
    }

    pub fn fixed_dt(&self) -> f32 {
        self.config.simulation.fixed_dt
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn meter(&self) -> &DetectionAccumulator {
        &self.meter
    }

    /// Meter value in 0..=1 for UI
    pub fn detection_normalized(&self) -> f32 {
        self.meter.normalized()
    }

    pub fn mode(&self) -> WorldMode {
        self.mode.mode()
    }

    pub fn mode_controller(&self) -> &WorldModeController {
        &self.mode
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_over()
    }

    pub fn alerts(&self) -> &GroupAlertBus {
        &self.alerts
    }

    pub fn guard(&self, id: GuardId) -> Option<&Guard> {
        self.roster.get(id)
    }

    pub fn guards(&self) -> impl Iterator<Item = &Guard> {
        self.roster.iter()
    }

    pub fn guard_count(&self) -> usize {
        self.roster.len()
    }

    pub fn indicators(&self) -> Vec<GuardIndicator> {
        let normalized = self.meter.normalized();
        self.roster.iter().map(|g| g.indicator(normalized)).collect()
    }

    pub fn lure(&self, id: LureId) -> Option<&LureAttractor> {
        self.lures.iter().find(|l| l.id() == id)
    }

    pub fn lures(&self) -> &[LureAttractor] {
        &self.lures
    }

    // ---- guards ----

    /// Spawn a guard tuned from the global config
    pub fn spawn_guard(&mut self, group: GroupId, position: Vec2) -> GuardId {
        let profile = GuardProfile::from_config(&self.config);
        self.spawn_guard_with(group, position, profile)
    }

    pub fn spawn_guard_with(&mut self, group: GroupId, position: Vec2, profile: GuardProfile) -> GuardId {
        let id = self.roster.spawn(group, position, profile);
        self.alerts.register(id, group);
        if self.mode.is_spirit_world() {
            if let Some(guard) = self.roster.get_mut(id) {
                guard.enter_mode(WorldMode::SpiritWorld);
            }
        }
        tracing::debug!("spawned {} in {} at ({:.1}, {:.1})", id, group, position.x, position.y);
        id
    }

    pub fn set_guard_facing(&mut self, id: GuardId, facing: Facing) -> Result<()> {
        self.roster.require_mut(id)?.face(facing);
        Ok(())
    }

    /// Destroy a guard and drop it from its group
    pub fn remove_guard(&mut self, id: GuardId) -> Result<Guard> {
        let guard = self.roster.remove(id).ok_or(StealthError::GuardNotFound(id))?;
        self.alerts.unregister(id);
        self.pending.push(SimulationEvent::GuardRemoved { guard: id });
        Ok(guard)
    }

    // ---- external signals ----

    /// Ask the mode controller for `target` and propagate the change
    pub fn request_mode(&mut self, target: WorldMode) -> Result<Option<ModeChange>> {
        let change = self.mode.request(target)?;
        if let Some(change) = change {
            let mut events = std::mem::take(&mut self.pending);
            self.apply_mode_change(change, &mut events);
            self.pending = events;
        }
        Ok(change)
    }

    pub fn toggle_mode(&mut self) -> Result<Option<ModeChange>> {
        self.request_mode(self.mode.mode().other())
    }

    /// Scripted alert with the same fan-out as a full detection
    pub fn alert_group(&mut self, group: GroupId) -> GroupAlert {
        let alert = self.alerts.alert_group(group, &mut self.roster);
        self.pending.push(SimulationEvent::GroupAlerted {
            group: alert.group,
            chasing: alert.chasing.clone(),
        });
        alert
    }

    /// Send one guard chasing; false if its state refuses
    pub fn alert_guard(&mut self, id: GuardId) -> Result<bool> {
        let chasing = self.roster.require_mut(id)?.trigger_chase();
        if chasing {
            self.pending.push(SimulationEvent::GuardAlerted { guard: id });
        }
        Ok(chasing)
    }

    /// The player touched a guard
    pub fn report_contact(&mut self, id: GuardId) -> Result<bool> {
        let chasing = self.roster.require_mut(id)?.on_contact();
        if chasing {
            self.pending.push(SimulationEvent::GuardAlerted { guard: id });
        }
        Ok(chasing)
    }

    // ---- lures ----

    /// Place an inactive lure
    pub fn add_lure(&mut self, position: Vec2) -> LureId {
        self.next_lure += 1;
        let id = LureId(self.next_lure);
        self.lures.push(LureAttractor::new(id, position, &self.config.lure));
        id
    }

    /// Land a lure at `position`; false if it was already active
    pub fn activate_lure(&mut self, id: LureId, position: Vec2) -> Result<bool> {
        Ok(self.lure_mut(id)?.activate(position))
    }

    /// Picked back up: inactive until activated again
    pub fn reset_lure(&mut self, id: LureId) -> Result<()> {
        self.lure_mut(id)?.reset();
        Ok(())
    }

    /// Add a spawner and its first lure
    pub fn add_spawner(&mut self, drop_point: Vec2) -> LureId {
        let lure = self.add_lure(drop_point);
        let mut spawner = LureSpawner::new(drop_point, self.config.lure.respawn_delay);
        spawner.attach(lure);
        self.spawners.push(spawner);
        lure
    }

    fn lure_mut(&mut self, id: LureId) -> Result<&mut LureAttractor> {
        self.lures
            .iter_mut()
            .find(|l| l.id() == id)
            .ok_or(StealthError::LureNotFound(id))
    }

    // ---- stepping ----

    /// Advance one fixed step
    ///
    /// Returns everything that happened since the previous step, including
    /// events raised by direct calls in between. Once the game is over this
    /// only flushes those events.
    pub fn step(&mut self, surroundings: &Surroundings<'_>) -> Vec<SimulationEvent> {
        let mut events = std::mem::take(&mut self.pending);
        if self.is_game_over() {
            return events;
        }

        let dt = self.config.simulation.fixed_dt;
        self.tick += 1;

        let corruption = self.mode.tick(dt);
        if let Some(change) = corruption.forced {
            self.apply_mode_change(change, &mut events);
        }
        if corruption.maxed {
            events.push(SimulationEvent::CorruptionMaxed);
        }

        self.sense(surroundings, dt, &mut events);
        self.meter.tick(dt);
        self.step_lures(dt, &mut events);
        self.step_guards(surroundings, dt, &mut events);

        if !self.is_game_over() {
            self.step_spawners(dt, &mut events);
        }
        events
    }

    /// Run `ticks` steps with the same surroundings
    pub fn run(&mut self, surroundings: &Surroundings<'_>, ticks: u64) -> Vec<SimulationEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(self.step(surroundings));
            if self.is_game_over() {
                break;
            }
        }
        events
    }

    fn apply_mode_change(&mut self, change: ModeChange, events: &mut Vec<SimulationEvent>) {
        for guard in self.roster.iter_mut() {
            guard.enter_mode(change.to);
        }
        if change.to == WorldMode::SpiritWorld {
            self.meter.reset();
        }
        events.push(SimulationEvent::ModeChanged {
            from: change.from,
            to: change.to,
        });
    }

    fn sense(&mut self, surroundings: &Surroundings<'_>, dt: f32, events: &mut Vec<SimulationEvent>) {
        let mut detection = None;
        for guard in self.roster.iter_mut() {
            let Some(amount) = guard.sense(surroundings, dt) else {
                continue;
            };
            if let Some(full) = self.meter.add_contribution(amount, guard.id()) {
                detection.get_or_insert(full);
            }
        }

        if let Some(full) = detection {
            events.push(SimulationEvent::FullDetection { source: full.source });
            if let Some(alert) = self.alerts.on_full_detection(full, &mut self.roster) {
                events.push(SimulationEvent::GroupAlerted {
                    group: alert.group,
                    chasing: alert.chasing,
                });
            }
        }
    }

    fn step_lures(&mut self, dt: f32, events: &mut Vec<SimulationEvent>) {
        let spirit = self.mode.is_spirit_world();
        if spirit && self.lures.iter().any(LureAttractor::is_active) {
            self.grid
                .rebuild(self.roster.iter().map(|g| (g.id(), g.position())));
        }

        let mut expired = Vec::new();
        for lure in self.lures.iter_mut() {
            let tick = lure.tick(dt, spirit);

            if let Some(position) = tick.pulse {
                events.push(SimulationEvent::LurePulsed {
                    lure: lure.id(),
                    position,
                });
                for id in self.grid.query_radius(position, lure.radius()) {
                    let lured = self.roster.get_mut(id).is_some_and(|g| g.lure_to(position));
                    if lured {
                        events.push(SimulationEvent::GuardLured {
                            guard: id,
                            lure: lure.id(),
                        });
                    }
                }
                tracing::debug!("{} pulsed", lure.id());
            }

            if tick.expired {
                expired.push(lure.id());
                events.push(SimulationEvent::LureExpired { lure: lure.id() });
            }
        }

        if !expired.is_empty() {
            self.lures.retain(|l| !expired.contains(&l.id()));
        }
    }

    fn step_guards(&mut self, surroundings: &Surroundings<'_>, dt: f32, events: &mut Vec<SimulationEvent>) {
        let mut fallen = Vec::new();
        let mut caught_by = None;

        for guard in self.roster.iter_mut() {
            let id = guard.id();
            match guard.step(surroundings, &mut self.rng, dt) {
                Some(GuardOutcome::CaughtPlayer) => {
                    caught_by.get_or_insert(id);
                }
                Some(GuardOutcome::LostPlayer) => events.push(SimulationEvent::PlayerLost { guard: id }),
                Some(GuardOutcome::LeftLure) => events.push(SimulationEvent::GuardReleased { guard: id }),
                Some(GuardOutcome::StartedFalling) => events.push(SimulationEvent::GuardFell { guard: id }),
                Some(GuardOutcome::FellAway) => fallen.push(id),
                None => {}
            }
        }

        for id in fallen {
            if self.roster.remove(id).is_some() {
                self.alerts.unregister(id);
                events.push(SimulationEvent::GuardRemoved { guard: id });
            }
        }

        if let Some(id) = caught_by {
            events.push(SimulationEvent::PlayerCaught { guard: id });
            self.game_over(GameOutcome::Caught { by: id }, events);
        }
    }

    fn step_spawners(&mut self, dt: f32, events: &mut Vec<SimulationEvent>) {
        for spawner in self.spawners.iter_mut() {
            let lures = &self.lures;
            if !spawner.tick(dt, |id| lures.iter().any(|l| l.id() == id)) {
                continue;
            }

            self.next_lure += 1;
            let id = LureId(self.next_lure);
            self.lures
                .push(LureAttractor::new(id, spawner.drop_point(), &self.config.lure));
            spawner.attach(id);
            events.push(SimulationEvent::LureSpawned { lure: id });
        }
    }

    fn game_over(&mut self, outcome: GameOutcome, events: &mut Vec<SimulationEvent>) {
        if self.outcome.is_over() {
            return;
        }
        self.outcome = outcome;
        tracing::info!("game over: {}", outcome);
        events.push(SimulationEvent::GameOver { outcome });

        for guard in self.roster.drain() {
            self.alerts.unregister(guard.id());
            events.push(SimulationEvent::GuardRemoved { guard: guard.id() });
        }
    }
}
