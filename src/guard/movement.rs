//! Kinematic movement helpers
//!
//! Guards walk straight at their target; there is no pathfinding.

use rand::Rng;

use crate::core::types::{Facing, Vec2};
use crate::world::hazards::TerrainHazards;

/// Below this distance a moving guard lands on its target instead of stepping
pub const MIN_STEP_DISTANCE: f32 = 0.1;

/// Step `position` toward `target`, flipping `facing` to match
///
/// Never overshoots. Within `MIN_STEP_DISTANCE` a guard that can move snaps
/// onto the target without turning, so arrival checks tighter than that
/// distance still succeed. Returns false when no step was taken.
pub fn move_toward(position: &mut Vec2, facing: &mut Facing, target: Vec2, speed: f32, dt: f32) -> bool {
    let offset = target - *position;
    let distance = offset.length();
    if distance < MIN_STEP_DISTANCE {
        if speed > 0.0 && dt > 0.0 {
            *position = target;
        }
        return false;
    }

    *facing = facing.toward(*position, target);
    let step = (speed * dt).min(distance);
    *position += offset / distance * step;
    true
}

/// Uniform random point inside a disc
pub fn random_point_in_disc<R: Rng + ?Sized>(rng: &mut R, center: Vec2, radius: f32) -> Vec2 {
    if radius <= 0.0 {
        return center;
    }
    let r = radius * rng.gen::<f32>().sqrt();
    let theta = rng.gen_range(0.0..std::f32::consts::TAU);
    center + Vec2::new(theta.cos(), theta.sin()) * r
}

/// Random non-hazardous point around `center`, or `fallback` if every
/// attempt lands on dangerous ground
pub fn pick_safe_point<R: Rng + ?Sized>(
    rng: &mut R,
    center: Vec2,
    radius: f32,
    hazards: &dyn TerrainHazards,
    attempts: u32,
    fallback: Vec2,
) -> Vec2 {
    for _ in 0..attempts.max(1) {
        let candidate = random_point_in_disc(rng, center, radius);
        if !hazards.is_hazardous(candidate) {
            return candidate;
        }
    }
    tracing::debug!("no safe point around ({:.1}, {:.1}), staying put", center.x, center.y);
    fallback
}
