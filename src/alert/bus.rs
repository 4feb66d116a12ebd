//! Group-scoped alert fan-out
//!
//! Guards register under a group id when spawned and leave when destroyed.
//! An alert for a group tries to push every member into Chase; members of
//! other groups are never touched.

use ahash::AHashMap;

use crate::core::types::{GroupId, GuardId};
use crate::detection::meter::FullDetection;
use crate::guard::roster::GuardRoster;

/// Result of one group alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAlert {
    pub group: GroupId,
    /// Members that actually switched to Chase, in registration order
    pub chasing: Vec<GuardId>,
}

#[derive(Debug, Clone, Default)]
pub struct GroupAlertBus {
    members: AHashMap<GroupId, Vec<GuardId>>,
    group_of: AHashMap<GuardId, GroupId>,
}

impl GroupAlertBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a guard to a group; re-registering moves it
    pub fn register(&mut self, guard: GuardId, group: GroupId) {
        if let Some(previous) = self.group_of.insert(guard, group) {
            self.remove_member(previous, guard);
        }
        self.members.entry(group).or_default().push(guard);
    }

    /// Drop a guard; returns the group it belonged to
    pub fn unregister(&mut self, guard: GuardId) -> Option<GroupId> {
        let group = self.group_of.remove(&guard)?;
        self.remove_member(group, guard);
        Some(group)
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.group_of.clear();
    }

    pub fn group_of(&self, guard: GuardId) -> Option<GroupId> {
        self.group_of.get(&guard).copied()
    }

    pub fn members(&self, group: GroupId) -> &[GuardId] {
        self.members.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn group_count(&self) -> usize {
        self.members.len()
    }

    /// Send every registered member of `group` into Chase
    ///
    /// Guards that refuse (spirit world, already chasing, falling) are left
    /// as they are.
    pub fn alert_group(&self, group: GroupId, roster: &mut GuardRoster) -> GroupAlert {
        let chasing: Vec<GuardId> = self
            .members(group)
            .iter()
            .copied()
            .filter(|&id| roster.get_mut(id).is_some_and(|guard| guard.trigger_chase()))
            .collect();

        tracing::info!("{} alerted, {} guard(s) now chasing", group, chasing.len());
        GroupAlert { group, chasing }
    }

    /// Fan out a full detection to the source guard's group
    pub fn on_full_detection(&self, detection: FullDetection, roster: &mut GuardRoster) -> Option<GroupAlert> {
        let Some(group) = self.group_of(detection.source) else {
            tracing::warn!("full detection from unregistered {}", detection.source);
            return None;
        };
        Some(self.alert_group(group, roster))
    }

    fn remove_member(&mut self, group: GroupId, guard: GuardId) {
        if let Some(list) = self.members.get_mut(&group) {
            list.retain(|&id| id != guard);
            if list.is_empty() {
                self.members.remove(&group);
            }
        }
    }
}
