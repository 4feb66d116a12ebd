//! Sparse hash grid for guard radius queries

use ahash::AHashMap;

use crate::core::types::{GuardId, Vec2};

/// Sparse hash grid keyed by cell, storing guard positions
pub struct GuardGrid {
    cell_size: f32,
    cells: AHashMap<(i32, i32), Vec<(GuardId, Vec2)>>,
}

impl GuardGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(f32::EPSILON),
            cells: AHashMap::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, guard: GuardId, pos: Vec2) {
        let coord = self.cell_coord(pos);
        self.cells.entry(coord).or_default().push((guard, pos));
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Vec::is_empty)
    }

    /// Guards within `radius` of `center`, sorted by id for a stable order
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<GuardId> {
        let radius_sq = radius * radius;
        let reach = (radius / self.cell_size).ceil() as i32;
        let (cx, cy) = self.cell_coord(center);

        let mut found: Vec<GuardId> = (-reach..=reach)
            .flat_map(|dx| (-reach..=reach).map(move |dy| (cx + dx, cy + dy)))
            .filter_map(|coord| self.cells.get(&coord))
            .flatten()
            .filter(|(_, pos)| center.distance_squared(*pos) <= radius_sq)
            .map(|(guard, _)| *guard)
            .collect();

        found.sort_unstable();
        found
    }

    /// Rebuild grid from positions
    pub fn rebuild(&mut self, guards: impl Iterator<Item = (GuardId, Vec2)>) {
        self.clear();
        for (guard, pos) in guards {
            self.insert(guard, pos);
        }
    }
}
