//! Drives a [`StealthSim`] from a level file

use serde::Serialize;

use crate::core::config::StealthConfig;
use crate::core::error::Result;
use crate::core::types::{GroupId, GuardId, LureId, Vec2};
use crate::guard::guard::GuardProfile;
use crate::guard::state::GuardStateKind;
use crate::scenario::level::ScenarioFile;
use crate::scenario::script::PlayerScript;
use crate::simulation::context::StealthSim;
use crate::simulation::events::{GameOutcome, SimulationEvent};
use crate::simulation::surroundings::Surroundings;
use crate::spatial::raycast::ObstacleField;
use crate::world::hazards::HazardMap;
use crate::world::mode::WorldMode;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ScheduledAction {
    Mode(WorldMode),
    Alert(GroupId),
    Cover(usize),
    ActivateLure(LureId, Vec2),
}

/// Running counts of interesting events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventTally {
    pub full_detections: u32,
    pub group_alerts: u32,
    pub guards_alerted: u32,
    pub mode_changes: u32,
    pub lure_pulses: u32,
    pub guards_lured: u32,
    pub lures_expired: u32,
    pub lures_spawned: u32,
    pub players_lost: u32,
    pub guards_fallen: u32,
    pub corruption_maxed: bool,
}

impl EventTally {
    pub fn record(&mut self, events: &[SimulationEvent]) {
        for event in events {
            match event {
                SimulationEvent::FullDetection { .. } => self.full_detections += 1,
                SimulationEvent::GroupAlerted { chasing, .. } => {
                    self.group_alerts += 1;
                    self.guards_alerted += chasing.len() as u32;
                }
                SimulationEvent::GuardAlerted { .. } => self.guards_alerted += 1,
                SimulationEvent::ModeChanged { .. } => self.mode_changes += 1,
                SimulationEvent::CorruptionMaxed => self.corruption_maxed = true,
                SimulationEvent::LurePulsed { .. } => self.lure_pulses += 1,
                SimulationEvent::GuardLured { .. } => self.guards_lured += 1,
                SimulationEvent::LureExpired { .. } => self.lures_expired += 1,
                SimulationEvent::LureSpawned { .. } => self.lures_spawned += 1,
                SimulationEvent::PlayerLost { .. } => self.players_lost += 1,
                SimulationEvent::GuardFell { .. } => self.guards_fallen += 1,
                SimulationEvent::GuardReleased { .. }
                | SimulationEvent::PlayerCaught { .. }
                | SimulationEvent::GuardRemoved { .. }
                | SimulationEvent::GameOver { .. } => {}
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GuardSummary {
    pub id: GuardId,
    pub group: GroupId,
    pub state: GuardStateKind,
    pub position: [f32; 2],
    pub has_los: bool,
}

/// Result of a headless run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub scenario: String,
    pub seed: u64,
    pub ticks: u64,
    pub outcome: GameOutcome,
    pub final_meter: f32,
    pub final_mode: WorldMode,
    pub corruption: f32,
    pub guards_remaining: usize,
    pub events: EventTally,
    pub guards: Vec<GuardSummary>,
}

pub struct ScenarioRunner {
    name: String,
    sim: StealthSim,
    obstacles: ObstacleField,
    hazards: HazardMap,
    script: PlayerScript,
    schedule: Vec<(f32, ScheduledAction)>,
    cursor: usize,
    tally: EventTally,
}

impl ScenarioRunner {
    /// Build the simulation and the level geometry
    pub fn new(scenario: &ScenarioFile, config: StealthConfig) -> Result<Self> {
        scenario.validate()?;
        let mut sim = StealthSim::new(config);
        let mut schedule = Vec::new();

        for def in &scenario.guards {
            let mut profile = GuardProfile::from_config(sim.config());
            if let Some(range) = def.vision_range {
                profile.sensor.vision_range = range.max(0.0);
            }
            if let Some(angle) = def.vision_angle {
                profile.sensor.vision_angle = angle.clamp(0.0, 180.0);
            }
            let id = sim.spawn_guard_with(GroupId::new(def.group), def.position, profile);
            sim.set_guard_facing(id, def.facing)?;
        }

        let mut obstacles = ObstacleField::new();
        for wall in &scenario.obstacles {
            obstacles.add_wall(wall.to_aabb());
        }

        let mut hazards = HazardMap::new();
        for def in &scenario.hazards {
            hazards.add(def.to_zone());
        }

        for def in &scenario.lures {
            let id = sim.add_lure(def.position);
            if let Some(at) = def.activate_at {
                let landing = def.land_at.unwrap_or(def.position);
                schedule.push((at, ScheduledAction::ActivateLure(id, landing)));
            }
        }
        for def in &scenario.spawners {
            sim.add_spawner(def.drop_point);
        }

        schedule.extend(scenario.mode_switches.iter().map(|m| (m.at, ScheduledAction::Mode(m.mode))));
        schedule.extend(
            scenario
                .alerts
                .iter()
                .map(|a| (a.at, ScheduledAction::Alert(GroupId::new(a.group)))),
        );
        schedule.extend(scenario.covers.iter().map(|c| (c.at, ScheduledAction::Cover(c.hazard))));
        schedule.sort_by(|a, b| a.0.total_cmp(&b.0));

        tracing::info!(
            "scenario '{}': {} guard(s), {} wall(s), {} hazard(s), {} scheduled action(s)",
            scenario.name,
            sim.guard_count(),
            obstacles.wall_count(),
            hazards.zones().len(),
            schedule.len()
        );

        Ok(Self {
            name: scenario.name.clone(),
            sim,
            obstacles,
            hazards,
            script: PlayerScript::new(&scenario.player),
            schedule,
            cursor: 0,
            tally: EventTally::default(),
        })
    }

    pub fn sim(&self) -> &StealthSim {
        &self.sim
    }

    pub fn tally(&self) -> &EventTally {
        &self.tally
    }

    /// Seconds of simulated time elapsed
    pub fn elapsed(&self) -> f32 {
        self.sim.current_tick() as f32 * self.sim.fixed_dt()
    }

    /// One fixed step with scheduled actions applied first
    pub fn step(&mut self) -> Vec<SimulationEvent> {
        let t = self.elapsed();
        self.fire_due(t);

        let player = self.script.view_at(t);
        match player {
            Some(view) => self.obstacles.set_player(view.position, self.script.radius()),
            None => self.obstacles.clear_player(),
        }

        let surroundings = Surroundings::new(player, &self.obstacles, &self.hazards);
        let events = self.sim.step(&surroundings);
        self.tally.record(&events);
        events
    }

    /// Run up to `ticks` steps, stopping early on game over
    pub fn run(&mut self, ticks: u64) -> RunSummary {
        for _ in 0..ticks {
            self.step();
            if self.sim.is_game_over() {
                break;
            }
        }
        self.summary()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            scenario: self.name.clone(),
            seed: self.sim.config().simulation.seed,
            ticks: self.sim.current_tick(),
            outcome: self.sim.outcome(),
            final_meter: self.sim.meter().value(),
            final_mode: self.sim.mode(),
            corruption: self.sim.mode_controller().corruption(),
            guards_remaining: self.sim.guard_count(),
            events: self.tally.clone(),
            guards: self
                .sim
                .guards()
                .map(|g| GuardSummary {
                    id: g.id(),
                    group: g.group(),
                    state: g.state_kind(),
                    position: g.position().to_array(),
                    has_los: g.has_los(),
                })
                .collect(),
        }
    }

    fn fire_due(&mut self, t: f32) {
        while let Some(&(at, action)) = self.schedule.get(self.cursor) {
            if at > t {
                break;
            }
            self.cursor += 1;
            self.apply(action);
        }
    }

    fn apply(&mut self, action: ScheduledAction) {
        match action {
            ScheduledAction::Mode(mode) => {
                if let Err(e) = self.sim.request_mode(mode) {
                    tracing::warn!("scripted switch to {} refused: {}", mode, e);
                }
            }
            ScheduledAction::Alert(group) => {
                self.sim.alert_group(group);
            }
            ScheduledAction::Cover(index) => {
                self.hazards.cover_hole(index);
            }
            ScheduledAction::ActivateLure(id, position) => {
                if let Err(e) = self.sim.activate_lure(id, position) {
                    tracing::warn!("scripted lure activation failed: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::level::parse_scenario;

    #[test]
    fn test_hidden_player_is_never_detected() {
        let level = parse_scenario(
            r#"
            [player]
            waypoints = [{ at = 0.0, position = [3.0, 0.0] }]
            hide = [{ from = 0.0, to = 100.0 }]

            [[guards]]
            position = [0.0, 0.0]
            group = 1
            "#,
        )
        .expect("level parses");

        let mut runner = ScenarioRunner::new(&level, StealthConfig::default()).expect("runner builds");
        let summary = runner.run(500);
        assert_eq!(summary.final_meter, 0.0);
        assert_eq!(summary.events.full_detections, 0);
    }

    #[test]
    fn test_wall_blocks_detection() {
        let level = parse_scenario(
            r#"
            [player]
            waypoints = [{ at = 0.0, position = [6.0, 0.0] }]

            [[guards]]
            position = [0.0, 0.0]

            [[obstacles]]
            min = [2.0, -3.0]
            max = [3.0, 3.0]
            "#,
        )
        .expect("level parses");

        let mut runner = ScenarioRunner::new(&level, StealthConfig::default()).expect("runner builds");
        for _ in 0..50 {
            runner.step();
        }
        assert_eq!(runner.sim().meter().value(), 0.0);
    }

    #[test]
    fn test_scripted_mode_switch_applies() {
        let level = parse_scenario(
            r#"
            [[guards]]
            position = [0.0, 0.0]

            [[mode_switches]]
            at = 0.1
            mode = "SpiritWorld"
            "#,
        )
        .expect("level parses");

        let mut runner = ScenarioRunner::new(&level, StealthConfig::default()).expect("runner builds");
        let summary = runner.run(20);
        assert_eq!(summary.final_mode, WorldMode::SpiritWorld);
        assert_eq!(summary.events.mode_changes, 1);
        assert_eq!(summary.guards[0].state, GuardStateKind::SpiritIdle);
    }
}
