//! Sector data model and procedural generator
//!
//! One `Sector` is an immutable arena description: a tile grid carved out of
//! solid rock, a guaranteed corridor from the start room to the exit room,
//! and optional decoration (rooms, hazards, pickups, enemy spawns) placed by
//! rejection sampling around that corridor. Generation never fails: every
//! placement step degrades to "fewer items" when its attempt budget runs
//! out, because the corridor is carved unconditionally before anything else
//! is considered.
//!
//! Hazards carry no mutable state. Whether one is active is a pure function
//! of elapsed sim time and the per-instance phase, which lets every entity
//! read the sector within a tick without any mutation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::point_rect_dist_sq;
use crate::rng::Mulberry32;

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Floor,
}

/// Carved rectangular room (tile coordinates, metadata only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Room {
    pub fn center_tile(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn contains(&self, tx: i32, ty: i32) -> bool {
        tx >= self.x && tx < self.x + self.w && ty >= self.y && ty < self.y + self.h
    }
}

/// Beam hazard orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamOrient {
    Horizontal,
    Vertical,
}

/// Timed damage volume. Activity cycles with `period`: the hazard is live
/// whenever `(elapsed + phase) mod period < active_for`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Hazard {
    Pulse {
        center: Vec2,
        radius: f32,
        period: f32,
        active_for: f32,
        phase: f32,
    },
    Beam {
        origin: Vec2,
        orient: BeamOrient,
        length: f32,
        half_width: f32,
        period: f32,
        active_for: f32,
        phase: f32,
    },
}

impl Hazard {
    fn timing(&self) -> (f32, f32, f32) {
        match *self {
            Hazard::Pulse { period, active_for, phase, .. } => (period, active_for, phase),
            Hazard::Beam { period, active_for, phase, .. } => (period, active_for, phase),
        }
    }

    /// Whether the hazard is live at the given sim time
    pub fn is_active(&self, elapsed: f32) -> bool {
        let (period, active_for, phase) = self.timing();
        (elapsed + phase) % period < active_for
    }

    /// World-space footprint as an axis-aligned bounding rect
    pub fn bounds(&self) -> (Vec2, Vec2) {
        match *self {
            Hazard::Pulse { center, radius, .. } => {
                (center - Vec2::splat(radius), center + Vec2::splat(radius))
            }
            Hazard::Beam { origin, orient, length, half_width, .. } => match orient {
                BeamOrient::Horizontal => (
                    Vec2::new(origin.x, origin.y - half_width),
                    Vec2::new(origin.x + length, origin.y + half_width),
                ),
                BeamOrient::Vertical => (
                    Vec2::new(origin.x - half_width, origin.y),
                    Vec2::new(origin.x + half_width, origin.y + length),
                ),
            },
        }
    }

    /// Contact test against a circle, honoring the activity cycle
    pub fn hits(&self, elapsed: f32, pos: Vec2, radius: f32) -> bool {
        if !self.is_active(elapsed) {
            return false;
        }
        match *self {
            Hazard::Pulse { center, radius: r, .. } => crate::circles_overlap(center, r, pos, radius),
            Hazard::Beam { .. } => {
                let (min, max) = self.bounds();
                point_rect_dist_sq(pos, min, max) <= radius * radius
            }
        }
    }
}

/// Pickup payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores health, capped at the player's max
    Heal(u32),
    /// Chrono cores, accumulated into the run reward
    Core(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    pub pos: Vec2,
}

/// Enemy behavior variants, selected at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Chaser,
    Sentry,
    Ranger,
}

/// Enemy spawn descriptor. The enemy is inert until its ignition delay
/// elapses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub ignition: f32,
}

/// One generated arena. Immutable for the lifetime of a sector run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub index: u32,
    pub seed: u32,
    /// Row-major `GRID_W * GRID_H` cells
    pub tiles: Vec<Tile>,
    /// Guaranteed-corridor marks, parallel to `tiles`
    pub path: Vec<bool>,
    /// Player spawn point (world coordinates)
    pub start: Vec2,
    /// Exit trigger center
    pub exit: Vec2,
    pub exit_radius: f32,
    pub rooms: Vec<Room>,
    pub hazards: Vec<Hazard>,
    pub pickups: Vec<Pickup>,
    pub spawns: Vec<Spawn>,
}

#[inline]
fn idx(tx: i32, ty: i32) -> usize {
    (ty * GRID_W + tx) as usize
}

/// Center of a tile in world coordinates
pub fn tile_center(tx: i32, ty: i32) -> Vec2 {
    Vec2::new(
        (tx as f32 + 0.5) * TILE_SIZE,
        (ty as f32 + 0.5) * TILE_SIZE,
    )
}

/// Tile containing a world-space point
pub fn world_to_tile(pos: Vec2) -> (i32, i32) {
    (
        (pos.x / TILE_SIZE).floor() as i32,
        (pos.y / TILE_SIZE).floor() as i32,
    )
}

impl Sector {
    pub fn in_bounds(tx: i32, ty: i32) -> bool {
        tx >= 0 && tx < GRID_W && ty >= 0 && ty < GRID_H
    }

    /// Solidity query; everything outside the grid is solid
    pub fn is_wall(&self, tx: i32, ty: i32) -> bool {
        if !Self::in_bounds(tx, ty) {
            return true;
        }
        self.tiles[idx(tx, ty)] == Tile::Wall
    }

    pub fn is_path(&self, tx: i32, ty: i32) -> bool {
        Self::in_bounds(tx, ty) && self.path[idx(tx, ty)]
    }

    /// Solidity at a world-space point
    pub fn is_solid_at(&self, pos: Vec2) -> bool {
        let (tx, ty) = world_to_tile(pos);
        self.is_wall(tx, ty)
    }

    /// Circle-vs-grid solidity: samples the center and the four cardinal
    /// offsets at the circle's radius
    pub fn is_solid_circle(&self, pos: Vec2, radius: f32) -> bool {
        self.is_solid_at(pos)
            || self.is_solid_at(pos + Vec2::new(radius, 0.0))
            || self.is_solid_at(pos - Vec2::new(radius, 0.0))
            || self.is_solid_at(pos + Vec2::new(0.0, radius))
            || self.is_solid_at(pos - Vec2::new(0.0, radius))
    }

    /// Difficulty driver, a function of the sector index only
    pub fn difficulty(&self) -> f32 {
        difficulty_for(self.index)
    }

    /// Flood fill over floor tiles from the start; true when the exit tile
    /// is reached. Every generated sector must pass this.
    pub fn exit_reachable(&self) -> bool {
        let start = world_to_tile(self.start);
        let goal = world_to_tile(self.exit);
        let mut seen = vec![false; (GRID_W * GRID_H) as usize];
        let mut queue = std::collections::VecDeque::new();
        if self.is_wall(start.0, start.1) {
            return false;
        }
        seen[idx(start.0, start.1)] = true;
        queue.push_back(start);
        while let Some((tx, ty)) = queue.pop_front() {
            if (tx, ty) == goal {
                return true;
            }
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let (nx, ny) = (tx + dx, ty + dy);
                if Self::in_bounds(nx, ny) && !self.is_wall(nx, ny) && !seen[idx(nx, ny)] {
                    seen[idx(nx, ny)] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
        false
    }
}

fn difficulty_for(index: u32) -> f32 {
    (index as f32 / 14.0).min(1.15)
}

/// Rejection-sampling attempt budget, a constant multiple of the target
const ATTEMPTS_PER_TARGET: u32 = 8;

struct Carver {
    tiles: Vec<Tile>,
    path: Vec<bool>,
}

impl Carver {
    fn new() -> Self {
        let n = (GRID_W * GRID_H) as usize;
        Self {
            tiles: vec![Tile::Wall; n],
            path: vec![false; n],
        }
    }

    /// Carve a single interior cell; optionally mark it as corridor
    fn carve(&mut self, tx: i32, ty: i32, mark_path: bool) {
        if tx < 1 || tx >= GRID_W - 1 || ty < 1 || ty >= GRID_H - 1 {
            return;
        }
        self.tiles[idx(tx, ty)] = Tile::Floor;
        if mark_path {
            self.path[idx(tx, ty)] = true;
        }
    }

    /// Carve a cell plus its four neighbors (the 1-tile corridor brush)
    fn carve_brush(&mut self, tx: i32, ty: i32) {
        for (dx, dy) in [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)] {
            self.carve(tx + dx, ty + dy, true);
        }
    }

    fn carve_room(&mut self, room: Room, mark_path: bool) {
        for ty in room.y..room.y + room.h {
            for tx in room.x..room.x + room.w {
                self.carve(tx, ty, mark_path);
            }
        }
    }

    fn is_floor(&self, tx: i32, ty: i32) -> bool {
        Sector::in_bounds(tx, ty) && self.tiles[idx(tx, ty)] == Tile::Floor
    }

    fn is_path(&self, tx: i32, ty: i32) -> bool {
        Sector::in_bounds(tx, ty) && self.path[idx(tx, ty)]
    }

    /// True when any tile under the world-space rect is corridor
    fn rect_touches_path(&self, min: Vec2, max: Vec2) -> bool {
        let (x0, y0) = world_to_tile(min);
        let (x1, y1) = world_to_tile(max);
        for ty in y0..=y1 {
            for tx in x0..=x1 {
                if self.is_path(tx, ty) {
                    return true;
                }
            }
        }
        false
    }
}

/// Generate one sector. Bit-identical output for identical `(index, seed)`.
pub fn generate_sector(index: u32, seed: u32) -> Sector {
    let mut rng = Mulberry32::for_sector(seed, index);
    let difficulty = difficulty_for(index);
    let mut carver = Carver::new();

    // Start and exit rooms sit in opposite corners. Both are corridor-marked
    // so no hazard can ever occupy the spawn or the doorway out.
    let start_room = Room { x: 2, y: GRID_H - 7, w: 5, h: 5 };
    let exit_room = Room { x: GRID_W - 7, y: 2, w: 5, h: 5 };
    carver.carve_room(start_room, true);
    carver.carve_room(exit_room, true);

    let start_tile = start_room.center_tile();
    let exit_tile = exit_room.center_tile();

    // Guaranteed corridor: biased walk from start toward exit, widened by
    // the brush, every carved cell recorded as path.
    let mut cur = start_tile;
    let mut steps = 0;
    let step_cap = GRID_W * GRID_H * 4;
    while cur != exit_tile && steps < step_cap {
        steps += 1;
        let dx = (exit_tile.0 - cur.0).signum();
        let dy = (exit_tile.1 - cur.1).signum();
        let (sx, sy) = if rng.chance(0.7) {
            // Step toward the exit along the axis with more ground to cover
            if (exit_tile.0 - cur.0).abs() >= (exit_tile.1 - cur.1).abs() && dx != 0 {
                (dx, 0)
            } else if dy != 0 {
                (0, dy)
            } else {
                (dx, 0)
            }
        } else {
            const DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
            DIRS[rng.pick_index(4)]
        };
        cur.0 = (cur.0 + sx).clamp(1, GRID_W - 2);
        cur.1 = (cur.1 + sy).clamp(1, GRID_H - 2);
        carver.carve_brush(cur.0, cur.1);
    }
    // Unconditional finish: straight carve into the exit room. This is the
    // reachability guarantee regardless of how the walk went.
    while cur.0 != exit_tile.0 {
        cur.0 += (exit_tile.0 - cur.0).signum();
        carver.carve_brush(cur.0, cur.1);
    }
    while cur.1 != exit_tile.1 {
        cur.1 += (exit_tile.1 - cur.1).signum();
        carver.carve_brush(cur.0, cur.1);
    }

    let mut rooms = vec![start_room, exit_room];

    // Extra rooms, rejected when they would overlap the corridor
    let room_target = 2 + (index / 2).min(3);
    let mut attempts = room_target * ATTEMPTS_PER_TARGET;
    while (rooms.len() as u32) < room_target + 2 && attempts > 0 {
        attempts -= 1;
        let w = rng.range_i32(3, 6);
        let h = rng.range_i32(3, 6);
        let x = rng.range_i32(1, GRID_W - 1 - w);
        let y = rng.range_i32(1, GRID_H - 1 - h);
        let room = Room { x, y, w, h };
        let overlaps_path = (room.y..room.y + room.h)
            .any(|ty| (room.x..room.x + room.w).any(|tx| carver.is_path(tx, ty)));
        if overlaps_path {
            continue;
        }
        carver.carve_room(room, false);
        rooms.push(room);
    }

    // Hazards: anchored on open floor, footprint strictly off the corridor
    let mut hazards = Vec::new();
    let hazard_target = (2 + index / 2).min(8);
    let mut attempts = hazard_target * ATTEMPTS_PER_TARGET;
    while (hazards.len() as u32) < hazard_target && attempts > 0 {
        attempts -= 1;
        let tx = rng.range_i32(2, GRID_W - 3);
        let ty = rng.range_i32(2, GRID_H - 3);
        let hazard = if rng.chance(0.6) {
            let radius = rng.range(40.0, 70.0) + difficulty * 20.0;
            let period = rng.range(2.4, 3.6) - difficulty * 0.6;
            Hazard::Pulse {
                center: tile_center(tx, ty),
                radius,
                period,
                active_for: period * (0.3 + difficulty * 0.15),
                phase: rng.next() * period,
            }
        } else {
            let orient = if rng.chance(0.5) {
                BeamOrient::Horizontal
            } else {
                BeamOrient::Vertical
            };
            let length = rng.range_i32(4, 8) as f32 * TILE_SIZE;
            let period = rng.range(2.8, 4.0) - difficulty * 0.5;
            Hazard::Beam {
                origin: tile_center(tx, ty),
                orient,
                length,
                half_width: 10.0 + difficulty * 4.0,
                period,
                active_for: period * (0.25 + difficulty * 0.15),
                phase: rng.next() * period,
            }
        };
        let (min, max) = hazard.bounds();
        if !carver.is_floor(tx, ty) || carver.rect_touches_path(min, max) {
            continue;
        }
        hazards.push(hazard);
    }

    // Pickups on quiet floor away from the corridor
    let mut pickups = Vec::new();
    let pickup_target = (2 + index / 3).min(6);
    let mut attempts = pickup_target * ATTEMPTS_PER_TARGET;
    while (pickups.len() as u32) < pickup_target && attempts > 0 {
        attempts -= 1;
        let tx = rng.range_i32(1, GRID_W - 2);
        let ty = rng.range_i32(1, GRID_H - 2);
        let kind = if rng.chance(0.4) {
            PickupKind::Heal(1)
        } else {
            PickupKind::Core(5 + rng.pick_index(11) as u32)
        };
        if !carver.is_floor(tx, ty) || carver.is_path(tx, ty) {
            continue;
        }
        pickups.push(Pickup { kind, pos: tile_center(tx, ty) });
    }

    // Enemy spawns; the variant pool widens with depth
    let mut kinds = vec![EnemyKind::Chaser];
    if index >= 2 {
        kinds.push(EnemyKind::Sentry);
    }
    if index >= 3 {
        kinds.push(EnemyKind::Ranger);
    }
    let mut spawns = Vec::new();
    let spawn_target = (1 + index).min(9);
    let mut attempts = spawn_target * ATTEMPTS_PER_TARGET;
    while (spawns.len() as u32) < spawn_target && attempts > 0 {
        attempts -= 1;
        let tx = rng.range_i32(1, GRID_W - 2);
        let ty = rng.range_i32(1, GRID_H - 2);
        let kind = kinds[rng.pick_index(kinds.len())];
        let ignition = rng.range(0.6, 2.4);
        if !carver.is_floor(tx, ty) || carver.is_path(tx, ty) {
            continue;
        }
        // Never ignite on top of the spawn room
        let far_from_start =
            (tx - start_tile.0).abs() + (ty - start_tile.1).abs() >= 8;
        if !far_from_start {
            continue;
        }
        spawns.push(Spawn { kind, pos: tile_center(tx, ty), ignition });
    }

    let sector = Sector {
        index,
        seed,
        tiles: carver.tiles,
        path: carver.path,
        start: tile_center(start_tile.0, start_tile.1),
        exit: tile_center(exit_tile.0, exit_tile.1),
        exit_radius: EXIT_RADIUS,
        rooms,
        hazards,
        pickups,
        spawns,
    };

    log::info!(
        "sector {index} (seed {seed:#010x}): {} rooms, {} hazards, {} pickups, {} spawns",
        sector.rooms.len(),
        sector.hazards.len(),
        sector.pickups.len(),
        sector.spawns.len(),
    );

    sector
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hazard_off_path(sector: &Sector, hazard: &Hazard) -> bool {
        let (min, max) = hazard.bounds();
        let (x0, y0) = world_to_tile(min);
        let (x1, y1) = world_to_tile(max);
        for ty in y0..=y1 {
            for tx in x0..=x1 {
                if sector.is_path(tx, ty) {
                    return false;
                }
            }
        }
        true
    }

    #[test]
    fn test_generation_deterministic() {
        let a = generate_sector(3, 12345);
        let b = generate_sector(3, 12345);
        assert_eq!(a, b);
    }

    #[test]
    fn test_golden_sector_layout() {
        // Fixed fixture: start in the bottom-left room, exit in the
        // top-right room, connected, with every hazard off the corridor.
        let sector = generate_sector(3, 12345);
        let (sx, sy) = world_to_tile(sector.start);
        let (ex, ey) = world_to_tile(sector.exit);
        assert_eq!((sx, sy), (4, GRID_H - 5));
        assert_eq!((ex, ey), (GRID_W - 5, 4));
        assert!(!sector.is_wall(sx, sy));
        assert!(!sector.is_wall(ex, ey));
        assert!(sector.exit_reachable());
        for hazard in &sector.hazards {
            assert!(hazard_off_path(&sector, hazard));
        }
    }

    #[test]
    fn test_counts_scale_with_depth_up_to_caps() {
        let shallow = generate_sector(1, 555);
        let deep = generate_sector(30, 555);
        assert!(deep.spawns.len() >= shallow.spawns.len());
        assert!(deep.spawns.len() <= 9);
        assert!(deep.hazards.len() <= 8);
        assert!(deep.pickups.len() <= 6);
    }

    #[test]
    fn test_positions_inside_world() {
        let sector = generate_sector(7, 0xDEAD_BEEF);
        let inside = |p: Vec2| {
            p.x.is_finite()
                && p.y.is_finite()
                && (0.0..=WORLD_W).contains(&p.x)
                && (0.0..=WORLD_H).contains(&p.y)
        };
        assert!(inside(sector.start));
        assert!(inside(sector.exit));
        for pickup in &sector.pickups {
            assert!(inside(pickup.pos));
        }
        for spawn in &sector.spawns {
            assert!(inside(spawn.pos));
        }
    }

    #[test]
    fn test_hazard_activity_cycle() {
        let hazard = Hazard::Pulse {
            center: Vec2::new(100.0, 100.0),
            radius: 50.0,
            period: 2.0,
            active_for: 0.5,
            phase: 0.0,
        };
        assert!(hazard.is_active(0.1));
        assert!(!hazard.is_active(1.0));
        assert!(hazard.is_active(2.1));
        // Inactive hazards never hit, even on perfect overlap
        assert!(!hazard.hits(1.0, Vec2::new(100.0, 100.0), 16.0));
        assert!(hazard.hits(0.1, Vec2::new(100.0, 100.0), 16.0));
    }

    #[test]
    fn test_beam_contact_shape() {
        let hazard = Hazard::Beam {
            origin: Vec2::new(320.0, 320.0),
            orient: BeamOrient::Horizontal,
            length: 128.0,
            half_width: 10.0,
            period: 10.0,
            active_for: 10.0,
            phase: 0.0,
        };
        assert!(hazard.hits(0.0, Vec2::new(380.0, 325.0), 8.0));
        assert!(!hazard.hits(0.0, Vec2::new(380.0, 400.0), 8.0));
        assert!(!hazard.hits(0.0, Vec2::new(200.0, 320.0), 8.0));
    }

    proptest! {
        #[test]
        fn prop_every_sector_is_traversable(seed in any::<u32>(), index in 1u32..12) {
            let sector = generate_sector(index, seed);
            prop_assert!(sector.exit_reachable());
            for hazard in &sector.hazards {
                prop_assert!(hazard_off_path(&sector, hazard));
            }
        }
    }
}
