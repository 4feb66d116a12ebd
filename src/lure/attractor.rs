//! Thrown lure that pulls wandering spirit-world guards toward it

use serde::{Deserialize, Serialize};

use crate::core::config::LureConfig;
use crate::core::types::{LureId, Vec2};

/// What a lure did during one step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LureTick {
    /// Position to pull guards toward, when a pulse fired in the spirit world
    pub pulse: Option<Vec2>,
    /// Lifetime ran out; the lure must be destroyed
    pub expired: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LureAttractor {
    id: LureId,
    position: Vec2,
    radius: f32,
    lifetime: f32,
    pulse_interval: f32,
    active: bool,
    remaining: f32,
    pulse_timer: f32,
}

impl LureAttractor {
    pub fn new(id: LureId, position: Vec2, config: &LureConfig) -> Self {
        Self {
            id,
            position,
            radius: config.radius,
            lifetime: config.lifetime,
            pulse_interval: config.pulse_interval.max(f32::EPSILON),
            active: false,
            remaining: 0.0,
            pulse_timer: 0.0,
        }
    }

    pub fn id(&self) -> LureId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Remaining lifetime while active
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Land at `position` and start the lifetime and pulse clocks
    ///
    /// Returns false if the lure is already active.
    pub fn activate(&mut self, position: Vec2) -> bool {
        if self.active {
            return false;
        }
        self.position = position;
        self.active = true;
        self.remaining = self.lifetime;
        // First pulse on the next step
        self.pulse_timer = 0.0;
        tracing::debug!("{} activated at ({:.1}, {:.1})", self.id, position.x, position.y);
        true
    }

    /// Back to inactive, e.g. when picked up again
    pub fn reset(&mut self) {
        self.active = false;
        self.remaining = 0.0;
        self.pulse_timer = 0.0;
    }

    /// Advance the clocks
    ///
    /// Pulses only take effect in the spirit world, but the pulse clock and
    /// the lifetime run regardless.
    pub fn tick(&mut self, dt: f32, spirit_world: bool) -> LureTick {
        if !self.active {
            return LureTick::default();
        }

        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.reset();
            tracing::debug!("{} expired", self.id);
            return LureTick {
                pulse: None,
                expired: true,
            };
        }

        self.pulse_timer -= dt;
        let mut pulse = None;
        if self.pulse_timer <= 0.0 {
            self.pulse_timer += self.pulse_interval;
            if spirit_world {
                pulse = Some(self.position);
            }
        }

        LureTick { pulse, expired: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.02;

    fn lure() -> LureAttractor {
        LureAttractor::new(LureId(1), Vec2::ZERO, &LureConfig::default())
    }

    #[test]
    fn test_inactive_lure_does_nothing() {
        let mut lure = lure();
        assert_eq!(lure.tick(DT, true), LureTick::default());
    }

    #[test]
    fn test_first_pulse_fires_on_first_step() {
        let mut lure = lure();
        assert!(lure.activate(Vec2::new(4.0, 1.0)));
        assert_eq!(lure.tick(DT, true).pulse, Some(Vec2::new(4.0, 1.0)));
        assert_eq!(lure.tick(DT, true).pulse, None);
    }

    #[test]
    fn test_pulses_follow_interval() {
        let mut lure = lure();
        lure.activate(Vec2::ZERO);

        // 2 seconds at 0.5s interval
        let pulses = (0..100).filter(|_| lure.tick(DT, true).pulse.is_some()).count();
        assert!((4..=5).contains(&pulses), "got {} pulses", pulses);
    }

    #[test]
    fn test_real_world_pulses_have_no_effect() {
        let mut lure = lure();
        lure.activate(Vec2::ZERO);
        for _ in 0..100 {
            assert_eq!(lure.tick(DT, false).pulse, None);
        }
        assert!(lure.is_active());
    }

    #[test]
    fn test_expires_after_lifetime() {
        let mut lure = lure();
        lure.activate(Vec2::ZERO);

        let mut expired_at = None;
        for step in 0..400 {
            if lure.tick(DT, true).expired {
                expired_at = Some(step);
                break;
            }
        }
        let step = expired_at.expect("lure should expire");
        assert!((298..=301).contains(&step), "expired at step {}", step);
        assert!(!lure.is_active());
    }

    #[test]
    fn test_reset_requires_reactivation() {
        let mut lure = lure();
        lure.activate(Vec2::ZERO);
        assert!(!lure.activate(Vec2::ONE));

        lure.reset();
        assert_eq!(lure.tick(DT, true), LureTick::default());
        assert!(lure.activate(Vec2::ONE));
        assert_eq!(lure.position(), Vec2::ONE);
    }
}
