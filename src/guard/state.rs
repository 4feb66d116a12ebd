//! Guard state machine
//!
//! Each state carries its own timers and targets. Which trigger may move a
//! guard from one state to another is decided by one table,
//! [`GuardStateKind::next`], so every pair is checked exhaustively.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// State discriminant, exposed to UI and used by the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum GuardStateKind {
    Patrol,
    Chase,
    SpiritIdle,
    SpiritLured,
    Falling,
}

/// Something that may move a guard to another state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Trigger {
    /// Group alert after full detection, or a scripted alert
    Alert,
    /// The player bumped into the guard
    Contact,
    /// A lure pulse reached the guard
    Lure,
    /// The guard finished lingering at a lure
    LureElapsed,
    EnterSpiritWorld,
    EnterRealWorld,
    /// The chased player hid or fell
    PlayerLost,
    /// The guard stepped onto dangerous ground
    Fell,
}

impl GuardStateKind {
    /// Transition table: `None` means the trigger is ignored in this state
    pub fn next(self, trigger: Trigger) -> Option<GuardStateKind> {
        use GuardStateKind::*;
        use Trigger::*;

        match (self, trigger) {
            // Falling only ends in removal
            (Falling, _) => None,
            (_, Fell) => Some(Falling),

            (_, EnterSpiritWorld) => Some(SpiritIdle),
            (_, EnterRealWorld) => Some(Patrol),

            (Patrol, Alert | Contact) => Some(Chase),
            (Chase, Alert | Contact) => None,
            (SpiritIdle | SpiritLured, Alert | Contact) => None,

            (SpiritIdle | SpiritLured, Lure) => Some(SpiritLured),
            (Patrol | Chase, Lure) => None,

            (SpiritLured, LureElapsed) => Some(SpiritIdle),
            (Patrol | Chase | SpiritIdle, LureElapsed) => None,

            (Chase, PlayerLost) => Some(Patrol),
            (Patrol | SpiritIdle | SpiritLured, PlayerLost) => None,
        }
    }

    pub fn is_spirit(self) -> bool {
        matches!(self, GuardStateKind::SpiritIdle | GuardStateKind::SpiritLured)
    }
}

/// Real-world patrol bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PatrolState {
    /// Current patrol point; picked lazily on the next movement step
    pub target: Option<Vec2>,
    /// Remaining pause at the reached point
    pub wait_remaining: Option<f32>,
    /// Player currently in sight
    pub tracking: bool,
    /// Remaining "did I see something" hesitation after losing sight
    pub hold_timer: f32,
}

/// Spirit-world wandering bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WanderState {
    pub target: Option<Vec2>,
    pub wait_remaining: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LureState {
    pub target: Vec2,
    /// Counts down only while within arrival distance
    pub timer: f32,
}

/// Timed fall into a hazard, advanced once per step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallState {
    pub elapsed: f32,
    pub duration: f32,
    /// Where the guard stood when the ground gave way
    pub from: Vec2,
    /// Center of the hazard it slides into
    pub center: Vec2,
}

impl FallState {
    /// Time spent sliding to the pit center
    pub const SLIDE_TIME: f32 = 0.3;
    /// Time spent shrinking away once centered
    pub const SINK_TIME: f32 = 0.5;
    pub const DURATION: f32 = Self::SLIDE_TIME + Self::SINK_TIME;

    pub fn new(from: Vec2, center: Vec2) -> Self {
        Self {
            elapsed: 0.0,
            duration: Self::DURATION,
            from,
            center,
        }
    }

    /// Position along the slide; stays on the center for the sink phase
    pub fn position(&self) -> Vec2 {
        let t = (self.elapsed / Self::SLIDE_TIME).clamp(0.0, 1.0);
        self.from.lerp(self.center, t)
    }

    pub fn is_sliding(&self) -> bool {
        self.elapsed < Self::SLIDE_TIME
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GuardState {
    Patrol(PatrolState),
    Chase,
    SpiritIdle(WanderState),
    SpiritLured(LureState),
    Falling(FallState),
}

impl Default for GuardState {
    fn default() -> Self {
        GuardState::Patrol(PatrolState::default())
    }
}

impl GuardState {
    pub fn kind(&self) -> GuardStateKind {
        match self {
            GuardState::Patrol(_) => GuardStateKind::Patrol,
            GuardState::Chase => GuardStateKind::Chase,
            GuardState::SpiritIdle(_) => GuardStateKind::SpiritIdle,
            GuardState::SpiritLured(_) => GuardStateKind::SpiritLured,
            GuardState::Falling(_) => GuardStateKind::Falling,
        }
    }

    pub fn fresh_patrol() -> Self {
        GuardState::Patrol(PatrolState::default())
    }

    pub fn fresh_wander() -> Self {
        GuardState::SpiritIdle(WanderState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GuardStateKind::*;

    const ALL_KINDS: [GuardStateKind; 5] = [Patrol, Chase, SpiritIdle, SpiritLured, Falling];

    #[test]
    fn test_mode_changes_apply_from_every_live_state() {
        for kind in ALL_KINDS.into_iter().filter(|k| *k != Falling) {
            assert_eq!(kind.next(Trigger::EnterSpiritWorld), Some(SpiritIdle));
            assert_eq!(kind.next(Trigger::EnterRealWorld), Some(Patrol));
        }
    }

    #[test]
    fn test_falling_ignores_everything() {
        for trigger in [
            Trigger::Alert,
            Trigger::Lure,
            Trigger::EnterSpiritWorld,
            Trigger::EnterRealWorld,
            Trigger::Fell,
        ] {
            assert_eq!(Falling.next(trigger), None);
        }
    }

    #[test]
    fn test_alert_only_moves_patrol_to_chase() {
        assert_eq!(Patrol.next(Trigger::Alert), Some(Chase));
        assert_eq!(Patrol.next(Trigger::Contact), Some(Chase));
        assert_eq!(Chase.next(Trigger::Alert), None);
        assert_eq!(SpiritIdle.next(Trigger::Alert), None);
        assert_eq!(SpiritLured.next(Trigger::Contact), None);
    }

    #[test]
    fn test_lure_only_accepted_in_spirit_states() {
        assert_eq!(SpiritIdle.next(Trigger::Lure), Some(SpiritLured));
        assert_eq!(SpiritLured.next(Trigger::Lure), Some(SpiritLured));
        assert_eq!(Patrol.next(Trigger::Lure), None);
        assert_eq!(Chase.next(Trigger::Lure), None);
    }

    #[test]
    fn test_chase_returns_to_patrol_when_player_lost() {
        assert_eq!(Chase.next(Trigger::PlayerLost), Some(Patrol));
        assert_eq!(Patrol.next(Trigger::PlayerLost), None);
    }

    #[test]
    fn test_state_kind_matches_variant() {
        assert_eq!(GuardState::default().kind(), Patrol);
        assert_eq!(GuardState::fresh_wander().kind(), SpiritIdle);
        assert_eq!(
            GuardState::Falling(FallState::new(Vec2::ZERO, Vec2::ONE)).kind(),
            Falling
        );
    }

    #[test]
    fn test_fall_slides_to_center_then_sinks() {
        let mut fall = FallState::new(Vec2::ZERO, Vec2::new(3.0, 0.0));
        fall.elapsed = 0.15;
        assert!((fall.position().x - 1.5).abs() < 1e-5);
        assert!(fall.is_sliding());

        fall.elapsed = 0.5;
        assert_eq!(fall.position(), Vec2::new(3.0, 0.0));
        assert!(!fall.is_sliding());
        assert!(!fall.is_finished());

        fall.elapsed = FallState::DURATION;
        assert!(fall.is_finished());
    }
}
