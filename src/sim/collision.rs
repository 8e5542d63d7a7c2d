//! Circle-versus-grid collision and movement
//!
//! Entities are circles moving through the sector's tile grid. Each axis is
//! resolved independently so a wall hit on one axis never cancels motion on
//! the other, and displacement is sub-stepped to at most half a tile so fast
//! movers cannot tunnel through single-tile walls.

use glam::Vec2;

use crate::consts::TILE_SIZE;
use crate::level::Sector;

/// Move a circle through the grid, updating position and zeroing the
/// velocity component of any blocked axis.
pub fn move_circle(sector: &Sector, pos: &mut Vec2, vel: &mut Vec2, radius: f32, dt: f32) {
    let delta = *vel * dt;
    if delta == Vec2::ZERO {
        return;
    }
    let max_step = TILE_SIZE * 0.5;
    let steps = (delta.length() / max_step).ceil().max(1.0) as u32;
    let step = delta / steps as f32;

    let mut blocked_x = false;
    let mut blocked_y = false;
    for _ in 0..steps {
        if !blocked_x && step.x != 0.0 {
            let next = Vec2::new(pos.x + step.x, pos.y);
            if sector.is_solid_circle(next, radius) {
                blocked_x = true;
            } else {
                pos.x = next.x;
            }
        }
        if !blocked_y && step.y != 0.0 {
            let next = Vec2::new(pos.x, pos.y + step.y);
            if sector.is_solid_circle(next, radius) {
                blocked_y = true;
            } else {
                pos.y = next.y;
            }
        }
    }
    if blocked_x {
        vel.x = 0.0;
    }
    if blocked_y {
        vel.y = 0.0;
    }
}

/// Advance a point projectile, sub-stepped; returns false when it entered
/// solid geometry and should be destroyed.
pub fn advance_point(sector: &Sector, pos: &mut Vec2, vel: Vec2, dt: f32) -> bool {
    let delta = vel * dt;
    let max_step = TILE_SIZE * 0.5;
    let steps = (delta.length() / max_step).ceil().max(1.0) as u32;
    let step = delta / steps as f32;
    for _ in 0..steps {
        let next = *pos + step;
        if sector.is_solid_at(next) {
            return false;
        }
        *pos = next;
    }
    true
}
