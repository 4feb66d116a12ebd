//! A single guard: perception plus the per-state movement handlers

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{ChaseConfig, PatrolConfig, SensorConfig, SpiritConfig, StealthConfig};
use crate::core::types::{Facing, GroupId, GuardId, Vec2};
use crate::detection::sensor::SensorModel;
use crate::guard::movement::{move_toward, pick_safe_point};
use crate::guard::state::{FallState, GuardState, GuardStateKind, LureState, Trigger};
use crate::simulation::surroundings::Surroundings;
use crate::world::mode::WorldMode;

/// Tuning snapshot a guard is spawned with
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GuardProfile {
    pub sensor: SensorConfig,
    pub patrol: PatrolConfig,
    pub chase: ChaseConfig,
    pub spirit: SpiritConfig,
}

impl GuardProfile {
    pub fn from_config(config: &StealthConfig) -> Self {
        Self {
            sensor: config.sensor.clone(),
            patrol: config.patrol.clone(),
            chase: config.chase.clone(),
            spirit: config.spirit.clone(),
        }
    }
}

/// Something noteworthy a guard did during its movement step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Reached the player while chasing
    CaughtPlayer,
    /// Chased player hid or fell; back to patrol
    LostPlayer,
    /// Finished lingering at a lure
    LeftLure,
    /// Walked onto dangerous ground
    StartedFalling,
    /// Fall finished; the guard should be destroyed
    FellAway,
}

/// Data for a world-space indicator above the guard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuardIndicator {
    pub id: GuardId,
    pub state: GuardStateKind,
    pub has_los: bool,
    /// Show the shared meter above this guard's head
    pub show_meter: bool,
}

#[derive(Debug, Clone)]
pub struct Guard {
    id: GuardId,
    group: GroupId,
    position: Vec2,
    facing: Facing,
    spawn: Vec2,
    state: GuardState,
    has_los: bool,
    sensor: SensorModel,
    patrol: PatrolConfig,
    chase: ChaseConfig,
    spirit: SpiritConfig,
}

impl Guard {
    pub fn new(id: GuardId, group: GroupId, spawn: Vec2, profile: GuardProfile) -> Self {
        Self {
            id,
            group,
            position: spawn,
            facing: Facing::default(),
            spawn,
            state: GuardState::fresh_patrol(),
            has_los: false,
            sensor: SensorModel::new(profile.sensor),
            patrol: profile.patrol,
            chase: profile.chase,
            spirit: profile.spirit,
        }
    }

    /// Turn in place, e.g. to a level-authored starting facing
    pub fn face(&mut self, facing: Facing) {
        self.facing = facing;
    }

    pub fn id(&self) -> GuardId {
        self.id
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn spawn_position(&self) -> Vec2 {
        self.spawn
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn state_kind(&self) -> GuardStateKind {
        self.state.kind()
    }

    pub fn has_los(&self) -> bool {
        self.has_los
    }

    pub fn sensor(&self) -> &SensorModel {
        &self.sensor
    }

    pub fn indicator(&self, meter_normalized: f32) -> GuardIndicator {
        GuardIndicator {
            id: self.id,
            state: self.state_kind(),
            has_los: self.has_los,
            show_meter: self.has_los && meter_normalized > 0.01,
        }
    }

    /// Look for the player; returns the meter amount to contribute
    ///
    /// Only patrolling guards sense. Keeps the hesitation timer primed while
    /// the player is in sight so it starts counting once sight is lost.
    pub fn sense(&mut self, surroundings: &Surroundings<'_>, dt: f32) -> Option<f32> {
        let GuardState::Patrol(patrol) = &mut self.state else {
            self.has_los = false;
            return None;
        };

        let sighting = self.sensor.sense(
            self.position,
            self.facing.vector(),
            surroundings.player.as_ref(),
            surroundings.spatial,
        );
        self.has_los = sighting.is_some();

        match sighting {
            Some(sighting) => {
                patrol.tracking = true;
                patrol.hold_timer = self.patrol.los_lost_hold_time;
                Some(self.sensor.detection_amount(&sighting, dt))
            }
            None => {
                patrol.tracking = false;
                None
            }
        }
    }

    /// Alert-driven chase; refused in the spirit world
    pub fn trigger_chase(&mut self) -> bool {
        self.transition(Trigger::Alert, None)
    }

    /// The player touched this guard
    pub fn on_contact(&mut self) -> bool {
        self.transition(Trigger::Contact, None)
    }

    /// Redirect toward a lure; only accepted while wandering or already lured
    pub fn lure_to(&mut self, position: Vec2) -> bool {
        self.transition(Trigger::Lure, Some(position))
    }

    /// Snap into the state for a new world mode, clearing sight and timers
    pub fn enter_mode(&mut self, mode: WorldMode) -> bool {
        let trigger = match mode {
            WorldMode::SpiritWorld => Trigger::EnterSpiritWorld,
            WorldMode::RealWorld => Trigger::EnterRealWorld,
        };
        self.transition(trigger, None)
    }

    /// `anchor` is the lure target for `Lure` and the hazard center for `Fell`
    fn transition(&mut self, trigger: Trigger, anchor: Option<Vec2>) -> bool {
        let from = self.state.kind();
        let Some(to) = from.next(trigger) else {
            return false;
        };

        self.state = match to {
            GuardStateKind::Patrol => GuardState::fresh_patrol(),
            GuardStateKind::Chase => GuardState::Chase,
            GuardStateKind::SpiritIdle => GuardState::fresh_wander(),
            GuardStateKind::SpiritLured => GuardState::SpiritLured(LureState {
                target: anchor.unwrap_or(self.position),
                timer: self.spirit.lure_duration,
            }),
            GuardStateKind::Falling => GuardState::Falling(FallState::new(
                self.position,
                anchor.unwrap_or(self.position),
            )),
        };
        self.has_los = false;

        if from != to {
            tracing::debug!("{} {} -> {} on {}", self.id, from, to, trigger);
        }
        true
    }

    /// Advance movement for the active state
    pub fn step<R: Rng + ?Sized>(&mut self, surroundings: &Surroundings<'_>, rng: &mut R, dt: f32) -> Option<GuardOutcome> {
        let outcome = match self.state.kind() {
            GuardStateKind::Patrol => {
                self.step_patrol(surroundings, rng, dt);
                None
            }
            GuardStateKind::Chase => self.step_chase(surroundings, dt),
            GuardStateKind::SpiritIdle => {
                self.step_wander(surroundings, rng, dt);
                None
            }
            GuardStateKind::SpiritLured => self.step_lured(dt),
            GuardStateKind::Falling => return self.step_falling(dt),
        };

        if outcome != Some(GuardOutcome::CaughtPlayer) && surroundings.hazards.is_hazardous(self.position) {
            let center = surroundings.hazards.hazard_center(self.position);
            self.transition(Trigger::Fell, center);
            tracing::info!("{} fell into a hazard", self.id);
            return Some(GuardOutcome::StartedFalling);
        }

        outcome
    }

    fn step_patrol<R: Rng + ?Sized>(&mut self, surroundings: &Surroundings<'_>, rng: &mut R, dt: f32) {
        let GuardState::Patrol(patrol) = &mut self.state else {
            return;
        };

        if patrol.tracking {
            // Freeze and keep facing the player
            if let Some(player) = surroundings.player {
                self.facing = self.facing.toward(self.position, player.position);
            }
            return;
        }

        if patrol.hold_timer > 0.0 {
            patrol.hold_timer -= dt;
            return;
        }

        if let Some(wait) = patrol.wait_remaining.as_mut() {
            *wait -= dt;
            if *wait <= 0.0 {
                patrol.wait_remaining = None;
                patrol.target = None;
            }
            return;
        }

        let cfg = &self.patrol;
        let target = *patrol.target.get_or_insert_with(|| {
            pick_safe_point(rng, self.spawn, cfg.radius, surroundings.hazards, cfg.max_point_attempts, self.position)
        });

        move_toward(&mut self.position, &mut self.facing, target, cfg.speed, dt);

        if self.position.distance(target) < cfg.arrive_distance {
            patrol.wait_remaining = Some(cfg.wait_time);
        }
    }

    fn step_chase(&mut self, surroundings: &Surroundings<'_>, dt: f32) -> Option<GuardOutcome> {
        let player = surroundings.player?;

        if player.is_concealed() {
            self.transition(Trigger::PlayerLost, None);
            tracing::info!("{} lost the player, resuming patrol", self.id);
            return Some(GuardOutcome::LostPlayer);
        }

        self.facing = self.facing.toward(self.position, player.position);
        move_toward(&mut self.position, &mut self.facing, player.position, self.chase.speed, dt);

        if self.position.distance(player.position) <= self.chase.catch_distance {
            tracing::info!("{} caught the player", self.id);
            return Some(GuardOutcome::CaughtPlayer);
        }
        None
    }

    fn step_wander<R: Rng + ?Sized>(&mut self, surroundings: &Surroundings<'_>, rng: &mut R, dt: f32) {
        let GuardState::SpiritIdle(wander) = &mut self.state else {
            return;
        };

        if let Some(wait) = wander.wait_remaining.as_mut() {
            *wait -= dt;
            if *wait <= 0.0 {
                wander.wait_remaining = None;
                wander.target = None;
            }
            return;
        }

        let attempts = self.patrol.max_point_attempts;
        let radius = self.spirit.wander_radius;
        let here = self.position;
        let target = *wander
            .target
            .get_or_insert_with(|| pick_safe_point(rng, here, radius, surroundings.hazards, attempts, here));

        move_toward(&mut self.position, &mut self.facing, target, self.spirit.wander_speed, dt);

        if self.position.distance(target) < self.patrol.arrive_distance {
            wander.wait_remaining = Some(self.patrol.wait_time);
        }
    }

    fn step_lured(&mut self, dt: f32) -> Option<GuardOutcome> {
        let GuardState::SpiritLured(lure) = &mut self.state else {
            return None;
        };

        move_toward(&mut self.position, &mut self.facing, lure.target, self.spirit.lure_speed, dt);

        if self.position.distance(lure.target) < self.spirit.lure_arrive_distance {
            lure.timer -= dt;
            if lure.timer <= 0.0 {
                self.transition(Trigger::LureElapsed, None);
                return Some(GuardOutcome::LeftLure);
            }
        }
        None
    }

    fn step_falling(&mut self, dt: f32) -> Option<GuardOutcome> {
        let GuardState::Falling(fall) = &mut self.state else {
            return None;
        };
        fall.elapsed += dt;
        self.position = fall.position();
        fall.is_finished().then_some(GuardOutcome::FellAway)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::surroundings::PlayerView;
    use crate::spatial::raycast::{Aabb, OpenField};
    use crate::guard::state::WanderState;
    use crate::world::hazards::{HazardMap, HazardZone, TerrainHazards};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DT: f32 = 0.02;

    fn guard_at(position: Vec2) -> Guard {
        Guard::new(GuardId(1), GroupId(1), position, GuardProfile::default())
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(99)
    }

    #[test]
    fn test_patrol_guard_contributes_while_in_sight() {
        let mut guard = guard_at(Vec2::ZERO);
        let env = Surroundings::open(Some(PlayerView::new(Vec2::new(3.0, 0.0))));

        let amount = guard.sense(&env, DT).expect("player should be seen");
        assert!((amount - 1.0 * 4.0 * DT).abs() < 1e-6);
        assert!(guard.has_los());
    }

    #[test]
    fn test_tracking_guard_freezes_and_faces_player() {
        let mut guard = guard_at(Vec2::ZERO);
        let mut rng = rng();
        let env = Surroundings::open(Some(PlayerView::new(Vec2::new(3.0, 0.5))));

        guard.sense(&env, DT);
        for _ in 0..10 {
            guard.step(&env, &mut rng, DT);
        }
        assert_eq!(guard.position(), Vec2::ZERO);
        assert_eq!(guard.facing(), Facing::Right);
    }

    #[test]
    fn test_hold_timer_delays_patrol_after_losing_sight() {
        let mut guard = guard_at(Vec2::ZERO);
        let mut rng = rng();
        let seen = Surroundings::open(Some(PlayerView::new(Vec2::new(3.0, 0.0))));
        let hidden = Surroundings::open(Some(PlayerView::hidden_at(Vec2::new(3.0, 0.0))));

        guard.sense(&seen, DT);
        guard.step(&seen, &mut rng, DT);

        // Hold lasts 2s: still frozen after 1.5s without sight
        for _ in 0..75 {
            assert!(guard.sense(&hidden, DT).is_none());
            guard.step(&hidden, &mut rng, DT);
        }
        assert!(!guard.has_los());
        assert_eq!(guard.position(), Vec2::ZERO);

        // And patrolling again well after it expires
        for _ in 0..100 {
            guard.sense(&hidden, DT);
            guard.step(&hidden, &mut rng, DT);
        }
        assert_ne!(guard.position(), Vec2::ZERO);
    }

    #[test]
    fn test_patrol_stays_within_radius_of_spawn() {
        let spawn = Vec2::new(10.0, 10.0);
        let mut guard = guard_at(spawn);
        let mut rng = rng();
        let env = Surroundings::open(None);

        for _ in 0..2000 {
            guard.step(&env, &mut rng, DT);
            assert!(guard.position().distance(spawn) <= 8.0 + 1e-3);
        }
    }

    #[test]
    fn test_trigger_chase_refused_in_spirit_world() {
        let mut guard = guard_at(Vec2::ZERO);
        guard.enter_mode(WorldMode::SpiritWorld);
        assert!(!guard.trigger_chase());
        assert_eq!(guard.state_kind(), GuardStateKind::SpiritIdle);

        guard.enter_mode(WorldMode::RealWorld);
        assert!(guard.trigger_chase());
        assert_eq!(guard.state_kind(), GuardStateKind::Chase);
    }

    #[test]
    fn test_chase_moves_toward_player_and_catches() {
        let mut guard = guard_at(Vec2::ZERO);
        let mut rng = rng();
        guard.trigger_chase();
        let env = Surroundings::open(Some(PlayerView::new(Vec2::new(-3.0, 0.0))));

        let mut caught = false;
        for _ in 0..100 {
            if guard.step(&env, &mut rng, DT) == Some(GuardOutcome::CaughtPlayer) {
                caught = true;
                break;
            }
        }
        assert!(caught);
        assert_eq!(guard.facing(), Facing::Left);
    }

    #[test]
    fn test_chase_without_player_stands_still() {
        let mut guard = guard_at(Vec2::new(1.0, 1.0));
        let mut rng = rng();
        guard.trigger_chase();

        assert_eq!(guard.step(&Surroundings::open(None), &mut rng, DT), None);
        assert_eq!(guard.position(), Vec2::new(1.0, 1.0));
        assert_eq!(guard.state_kind(), GuardStateKind::Chase);
    }

    #[test]
    fn test_chase_reverts_to_patrol_when_player_hides() {
        let mut guard = guard_at(Vec2::ZERO);
        let mut rng = rng();
        guard.trigger_chase();
        let env = Surroundings::open(Some(PlayerView::hidden_at(Vec2::new(5.0, 0.0))));

        assert_eq!(guard.step(&env, &mut rng, DT), Some(GuardOutcome::LostPlayer));
        assert_eq!(guard.state_kind(), GuardStateKind::Patrol);
    }

    #[test]
    fn test_chase_does_not_disengage_on_distance() {
        let mut guard = guard_at(Vec2::ZERO);
        let mut rng = rng();
        guard.trigger_chase();
        let env = Surroundings::open(Some(PlayerView::new(Vec2::new(500.0, 0.0))));

        for _ in 0..50 {
            guard.step(&env, &mut rng, DT);
        }
        assert_eq!(guard.state_kind(), GuardStateKind::Chase);
    }

    #[test]
    fn test_lure_only_accepted_in_spirit_states() {
        let mut guard = guard_at(Vec2::ZERO);
        assert!(!guard.lure_to(Vec2::new(2.0, 0.0)));

        guard.enter_mode(WorldMode::SpiritWorld);
        assert!(guard.lure_to(Vec2::new(2.0, 0.0)));
        assert_eq!(guard.state_kind(), GuardStateKind::SpiritLured);

        // Re-luring replaces the target and restarts the timer
        assert!(guard.lure_to(Vec2::new(-2.0, 0.0)));
        match guard.state() {
            GuardState::SpiritLured(lure) => {
                assert_eq!(lure.target, Vec2::new(-2.0, 0.0));
                assert_eq!(lure.timer, 4.0);
            }
            other => panic!("expected lured state, got {:?}", other),
        }
    }

    #[test]
    fn test_lured_guard_returns_to_wandering_after_timer() {
        let mut guard = guard_at(Vec2::ZERO);
        let mut rng = rng();
        let env = Surroundings::open(None);
        guard.enter_mode(WorldMode::SpiritWorld);
        guard.lure_to(Vec2::new(0.5, 0.0));

        // Already within arrival distance: 4s of countdown
        let mut left = None;
        for i in 0..400 {
            if let Some(outcome) = guard.step(&env, &mut rng, DT) {
                left = Some((i, outcome));
                break;
            }
        }
        let (step, outcome) = left.expect("guard should leave the lure");
        assert_eq!(outcome, GuardOutcome::LeftLure);
        assert!((195..=201).contains(&step), "left after {} steps", step);
        assert_eq!(guard.state_kind(), GuardStateKind::SpiritIdle);
    }

    #[test]
    fn test_spirit_guard_does_not_sense() {
        let mut guard = guard_at(Vec2::ZERO);
        guard.enter_mode(WorldMode::SpiritWorld);
        let env = Surroundings::open(Some(PlayerView::new(Vec2::new(2.0, 0.0))));

        assert!(guard.sense(&env, DT).is_none());
        assert!(!guard.has_los());
    }

    #[test]
    fn test_mode_change_clears_sight() {
        let mut guard = guard_at(Vec2::ZERO);
        let env = Surroundings::open(Some(PlayerView::new(Vec2::new(2.0, 0.0))));
        guard.sense(&env, DT);
        assert!(guard.has_los());

        guard.enter_mode(WorldMode::SpiritWorld);
        assert!(!guard.has_los());
        guard.enter_mode(WorldMode::RealWorld);
        assert_eq!(guard.state(), &GuardState::fresh_patrol());
    }

    #[test]
    fn test_chasing_into_hole_starts_fall_then_finishes() {
        let mut hazards = HazardMap::new();
        hazards.add(HazardZone::hole(Aabb::new(Vec2::new(1.0, -1.0), Vec2::new(2.0, 1.0))));
        let env = Surroundings::new(Some(PlayerView::new(Vec2::new(6.0, 0.0))), &OpenField, &hazards);

        let mut guard = guard_at(Vec2::ZERO);
        let mut rng = rng();
        guard.trigger_chase();

        let mut fell = false;
        for _ in 0..50 {
            if guard.step(&env, &mut rng, DT) == Some(GuardOutcome::StartedFalling) {
                fell = true;
                break;
            }
        }
        assert!(fell);
        assert_eq!(guard.state_kind(), GuardStateKind::Falling);
        assert!(!guard.trigger_chase());
        assert!(!guard.enter_mode(WorldMode::SpiritWorld));

        let mut outcome = None;
        for _ in 0..60 {
            outcome = guard.step(&env, &mut rng, DT);
            if outcome.is_some() {
                break;
            }
        }
        assert_eq!(outcome, Some(GuardOutcome::FellAway));
    }

    #[test]
    fn test_indicator_shows_meter_only_with_sight() {
        let mut guard = guard_at(Vec2::ZERO);
        assert!(!guard.indicator(0.5).show_meter);

        guard.sense(&Surroundings::open(Some(PlayerView::new(Vec2::new(1.0, 0.0)))), DT);
        assert!(guard.indicator(0.5).show_meter);
        assert!(!guard.indicator(0.0).show_meter);
    }

    fn profile_with(edit: impl FnOnce(&mut GuardProfile)) -> GuardProfile {
        let mut profile = GuardProfile::default();
        edit(&mut profile);
        profile
    }

    #[test]
    fn test_tight_lure_arrival_still_releases() {
        let profile = profile_with(|p| p.spirit.lure_arrive_distance = 0.05);
        let mut guard = Guard::new(GuardId(1), GroupId(1), Vec2::ZERO, profile);
        let mut rng = rng();
        let env = Surroundings::open(None);
        guard.enter_mode(WorldMode::SpiritWorld);
        guard.lure_to(Vec2::new(3.0, 0.0));

        let left = (0..1000).find(|_| guard.step(&env, &mut rng, DT) == Some(GuardOutcome::LeftLure));
        assert!(left.is_some(), "guard never left the lure");
        assert_eq!(guard.state_kind(), GuardStateKind::SpiritIdle);
        assert!(guard.position().distance(Vec2::new(3.0, 0.0)) < 0.05);
    }

    #[test]
    fn test_tight_patrol_arrival_still_reaches_points() {
        let profile = profile_with(|p| p.patrol.arrive_distance = 0.05);
        let mut guard = Guard::new(GuardId(1), GroupId(1), Vec2::ZERO, profile);
        let mut rng = rng();
        let env = Surroundings::open(None);

        let mut waits = 0;
        let mut was_waiting = false;
        for _ in 0..6000 {
            guard.step(&env, &mut rng, DT);
            let waiting = matches!(guard.state(), GuardState::Patrol(p) if p.wait_remaining.is_some());
            if waiting && !was_waiting {
                waits += 1;
            }
            was_waiting = waiting;
        }
        assert!(waits >= 3, "only reached {} patrol points", waits);
    }

    #[test]
    fn test_tight_catch_distance_still_catches() {
        let profile = profile_with(|p| p.chase.catch_distance = 0.05);
        let mut guard = Guard::new(GuardId(1), GroupId(1), Vec2::ZERO, profile);
        let mut rng = rng();
        guard.trigger_chase();
        let env = Surroundings::open(Some(PlayerView::new(Vec2::new(2.07, 0.0))));

        let caught = (0..100).any(|_| guard.step(&env, &mut rng, DT) == Some(GuardOutcome::CaughtPlayer));
        assert!(caught);
    }

    #[test]
    fn test_wander_targets_follow_current_position_and_avoid_hazards() {
        let mut guard = guard_at(Vec2::ZERO);
        let mut rng = rng();

        // Chase far away from spawn first
        guard.trigger_chase();
        let chase_env = Surroundings::open(Some(PlayerView::new(Vec2::new(60.0, 0.0))));
        for _ in 0..400 {
            guard.step(&chase_env, &mut rng, DT);
        }
        let entry = guard.position();
        assert!(entry.distance(guard.spawn_position()) > 30.0);

        // Everything east of the entry point is a cliff
        let mut hazards = HazardMap::new();
        hazards.add(HazardZone::cliff(Aabb::new(Vec2::new(entry.x + 1.0, -500.0), Vec2::new(entry.x + 500.0, 500.0))));
        let env = Surroundings::new(None, &OpenField, &hazards);
        guard.enter_mode(WorldMode::SpiritWorld);

        let radius = guard.spirit.wander_radius;
        let mut picked = 0;
        for _ in 0..3000 {
            let before = guard.position();
            let had_target = matches!(guard.state(), GuardState::SpiritIdle(w) if w.target.is_some());
            assert_eq!(guard.step(&env, &mut rng, DT), None);

            if let GuardState::SpiritIdle(WanderState { target: Some(target), .. }) = guard.state() {
                if !had_target {
                    picked += 1;
                    assert!(target.distance(before) <= radius + 1e-3);
                    assert!(!hazards.is_hazardous(*target));
                    if picked == 1 {
                        assert!(target.distance(entry) <= radius + 1e-3);
                    }
                }
            }
        }
        assert!(picked >= 2, "picked {} wander targets", picked);
        assert_eq!(guard.state_kind(), GuardStateKind::SpiritIdle);
    }

    #[test]
    fn test_falling_guard_slides_to_hazard_center() {
        let mut hazards = HazardMap::new();
        hazards.add(HazardZone::hole(Aabb::new(Vec2::new(1.0, -1.0), Vec2::new(3.0, 1.0))));
        let env = Surroundings::new(Some(PlayerView::new(Vec2::new(6.0, 0.0))), &OpenField, &hazards);

        let mut guard = guard_at(Vec2::ZERO);
        let mut rng = rng();
        guard.trigger_chase();
        while guard.step(&env, &mut rng, DT) != Some(GuardOutcome::StartedFalling) {
            assert!(guard.position().x < 2.0, "guard never fell");
        }
        let edge = guard.position();
        assert!(edge.x < 2.0);

        // Halfway through the slide, halfway to the center
        for _ in 0..7 {
            guard.step(&env, &mut rng, DT);
        }
        let expected = edge.lerp(Vec2::new(2.0, 0.0), 0.14 / FallState::SLIDE_TIME);
        assert!(guard.position().distance(expected) < 1e-3);

        for _ in 0..10 {
            guard.step(&env, &mut rng, DT);
        }
        assert!(guard.position().distance(Vec2::new(2.0, 0.0)) < 1e-5);
        assert_eq!(guard.state_kind(), GuardStateKind::Falling);
    }
}
