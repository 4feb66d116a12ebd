//! Keeps one lure available at a drop point

use serde::{Deserialize, Serialize};

use crate::core::types::{LureId, Vec2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LureSpawner {
    drop_point: Vec2,
    respawn_delay: f32,
    current: Option<LureId>,
    respawn_timer: Option<f32>,
}

impl LureSpawner {
    pub fn new(drop_point: Vec2, respawn_delay: f32) -> Self {
        Self {
            drop_point,
            respawn_delay: respawn_delay.max(0.0),
            current: None,
            respawn_timer: None,
        }
    }

    pub fn drop_point(&self) -> Vec2 {
        self.drop_point
    }

    pub fn current(&self) -> Option<LureId> {
        self.current
    }

    /// Record the lure this spawner just created
    pub fn attach(&mut self, lure: LureId) {
        self.current = Some(lure);
        self.respawn_timer = None;
    }

    /// Returns true when a fresh lure should be spawned at the drop point
    ///
    /// `alive` tells whether the spawner's current lure still exists.
    pub fn tick(&mut self, dt: f32, alive: impl Fn(LureId) -> bool) -> bool {
        if self.current.is_some_and(|id| !alive(id)) {
            self.current = None;
        }

        if self.current.is_some() {
            return false;
        }

        let timer = self.respawn_timer.get_or_insert(self.respawn_delay);
        *timer -= dt;
        if *timer <= 0.0 {
            self.respawn_timer = None;
            return true;
        }
        false
    }
}
