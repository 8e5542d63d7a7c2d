//! Chrono Shift - sector-crawler simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, per-tick update)
//! - `level`: Procedural sector generator and tile arena queries
//! - `rng`: Seeded stream-ordered random number generator
//! - `run`: Run/progression orchestrator and HUD snapshots
//! - `save`: Persistence capability and save schema
//! - `input`: Logical action set consumed from the host
//!
//! The crate draws nothing and reads no devices: rendering, raw input and
//! actual storage live in the host. Everything below the orchestrator is a
//! pure function of its seed and inputs.

pub mod input;
pub mod level;
pub mod rng;
pub mod run;
pub mod save;
pub mod sim;

pub use run::{HudSnapshot, NavSignal, ResumeMode, Run};
pub use save::{SaveRecord, SaveStore};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Upper clamp on the per-frame wall-clock delta (seconds). Keeps the
    /// simulation stable after a stall or tab switch.
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Arena grid dimensions (tiles)
    pub const GRID_W: i32 = 40;
    pub const GRID_H: i32 = 24;
    /// Tile edge length in world units
    pub const TILE_SIZE: f32 = 32.0;
    /// World dimensions in world units
    pub const WORLD_W: f32 = GRID_W as f32 * TILE_SIZE;
    pub const WORLD_H: f32 = GRID_H as f32 * TILE_SIZE;

    /// Player collision radius
    pub const PLAYER_RADIUS: f32 = 16.0;
    /// Exit trigger radius
    pub const EXIT_RADIUS: f32 = 40.0;

    /// Energy cost of a dash
    pub const DASH_ENERGY_COST: f32 = 15.0;
    /// Sustained slow-time needed to earn one shield charge (seconds)
    pub const SLOW_SHIELD_THRESHOLD: f32 = 1.2;

    /// Wall-time interval between rewind history samples (seconds)
    pub const REWIND_SAMPLE_INTERVAL: f32 = 0.05;
    /// Rewind history capacity (oldest evicted first)
    pub const REWIND_BUFFER_CAP: usize = 240;
    /// History entries restored per rewinding tick
    pub const REWIND_POPS_PER_TICK: usize = 3;
    /// Time scale while rewinding
    pub const REWIND_TIME_SCALE: f32 = 0.2;
    /// Rewind energy drain relative to slow-time drain
    pub const REWIND_DRAIN_FACTOR: f32 = 1.8;

    /// Sectors per progression block; death resets to the block start and
    /// the shop opens on block boundaries
    pub const SECTOR_BLOCK: u32 = 5;
    /// Run history entries kept in the save
    pub const RUN_HISTORY_CAP: usize = 20;
}

/// Squared distance from a point to an axis-aligned rectangle (0 inside)
#[inline]
pub fn point_rect_dist_sq(point: Vec2, min: Vec2, max: Vec2) -> f32 {
    let dx = (min.x - point.x).max(0.0).max(point.x - max.x);
    let dy = (min.y - point.y).max(0.0).max(point.y - max.y);
    dx * dx + dy * dy
}

/// Check two circles for overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}
