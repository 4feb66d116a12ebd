//! Scripted player movement for headless runs

use crate::core::types::Vec2;
use crate::scenario::level::{PlayerScriptDef, WaypointDef, WindowDef};
use crate::simulation::surroundings::PlayerView;

/// Default collider radius of the player body
pub const PLAYER_RADIUS: f32 = 0.4;

#[derive(Debug, Clone)]
pub struct PlayerScript {
    waypoints: Vec<WaypointDef>,
    hide: Vec<WindowDef>,
    fall: Vec<WindowDef>,
    radius: f32,
}

impl PlayerScript {
    pub fn new(def: &PlayerScriptDef) -> Self {
        Self {
            waypoints: def.waypoints.clone(),
            hide: def.hide.clone(),
            fall: def.fall.clone(),
            radius: def.radius.unwrap_or(PLAYER_RADIUS).max(0.0),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Position at time `t`, linear between waypoints and clamped at both ends
    pub fn position_at(&self, t: f32) -> Option<Vec2> {
        let first = self.waypoints.first()?;
        if t <= first.at {
            return Some(first.position);
        }

        for pair in self.waypoints.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.at {
                let span = b.at - a.at;
                if span <= f32::EPSILON {
                    return Some(b.position);
                }
                return Some(a.position.lerp(b.position, (t - a.at) / span));
            }
        }

        self.waypoints.last().map(|w| w.position)
    }

    /// What guards get to know about the player at time `t`
    pub fn view_at(&self, t: f32) -> Option<PlayerView> {
        let position = self.position_at(t)?;
        Some(PlayerView {
            position,
            hidden: self.hide.iter().any(|w| w.contains(t)),
            falling: self.fall.iter().any(|w| w.contains(t)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> PlayerScript {
        PlayerScript::new(&PlayerScriptDef {
            waypoints: vec![
                WaypointDef { at: 1.0, position: Vec2::new(0.0, 0.0) },
                WaypointDef { at: 3.0, position: Vec2::new(4.0, 2.0) },
            ],
            hide: vec![WindowDef { from: 2.0, to: 2.5 }],
            fall: Vec::new(),
            radius: None,
        })
    }

    #[test]
    fn test_position_interpolates_and_clamps() {
        let s = script();
        assert_eq!(s.position_at(0.0), Some(Vec2::ZERO));
        assert_eq!(s.position_at(2.0), Some(Vec2::new(2.0, 1.0)));
        assert_eq!(s.position_at(10.0), Some(Vec2::new(4.0, 2.0)));
    }

    #[test]
    fn test_hide_window_conceals_player() {
        let s = script();
        assert!(s.view_at(2.2).is_some_and(|v| v.is_concealed()));
        assert!(s.view_at(2.5).is_some_and(|v| !v.is_concealed()));
    }

    #[test]
    fn test_no_waypoints_means_no_player() {
        let s = PlayerScript::new(&PlayerScriptDef::default());
        assert_eq!(s.view_at(1.0), None);
    }
}
