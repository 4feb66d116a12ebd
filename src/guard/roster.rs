//! Guard storage with stable iteration order

use crate::core::error::{Result, StealthError};
use crate::core::types::{GroupId, GuardId, Vec2};
use crate::guard::guard::{Guard, GuardProfile};

/// Live guards, iterated in spawn order
#[derive(Debug, Clone, Default)]
pub struct GuardRoster {
    guards: Vec<Guard>,
    next_id: u32,
}

impl GuardRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a guard and hand out the next sequential id
    pub fn spawn(&mut self, group: GroupId, position: Vec2, profile: GuardProfile) -> GuardId {
        self.next_id += 1;
        let id = GuardId::new(self.next_id);
        self.guards.push(Guard::new(id, group, position, profile));
        id
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    pub fn contains(&self, id: GuardId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: GuardId) -> Option<&Guard> {
        self.index_of(id).map(|i| &self.guards[i])
    }

    pub fn get_mut(&mut self, id: GuardId) -> Option<&mut Guard> {
        self.index_of(id).map(move |i| &mut self.guards[i])
    }

    pub fn require_mut(&mut self, id: GuardId) -> Result<&mut Guard> {
        self.get_mut(id).ok_or(StealthError::GuardNotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Guard> {
        self.guards.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Guard> {
        self.guards.iter_mut()
    }

    pub fn ids(&self) -> Vec<GuardId> {
        self.guards.iter().map(Guard::id).collect()
    }

    /// Remove a guard, keeping the order of the rest
    pub fn remove(&mut self, id: GuardId) -> Option<Guard> {
        let index = self.index_of(id)?;
        Some(self.guards.remove(index))
    }

    /// Remove every guard, returning them in spawn order
    pub fn drain(&mut self) -> Vec<Guard> {
        std::mem::take(&mut self.guards)
    }

    fn index_of(&self, id: GuardId) -> Option<usize> {
        self.guards.iter().position(|g| g.id() == id)
    }
}
