//! Per-sector simulation state and transient entities
//!
//! Everything here is owned by the current sector's simulation context and
//! dies with it: no entity outlives a sector transition. Entities are kept
//! in id-ordered vectors; removal happens in a compact pass at the end of a
//! tick, never while iterating.

use glam::Vec2;

use crate::level::{EnemyKind, Pickup, Sector};
use crate::rng::Mulberry32;
use crate::save::Outcome;
use crate::sim::player::Player;

/// Current simulation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Running,
    Paused,
    Ended(Outcome),
}

/// Decorrelates the in-sector behavior stream (enemy jitter, drops) from
/// the generator stream for the same seed
const SIM_STREAM_SALT: u32 = 0x51ED_270B;

impl EnemyKind {
    /// Movement speed scaled by sector difficulty
    pub fn speed(self, difficulty: f32) -> f32 {
        match self {
            EnemyKind::Chaser => 90.0 + difficulty * 50.0,
            EnemyKind::Sentry => 0.0,
            EnemyKind::Ranger => 70.0 + difficulty * 30.0,
        }
    }

    pub fn max_health(self) -> f32 {
        match self {
            EnemyKind::Chaser => 3.0,
            EnemyKind::Sentry => 4.0,
            EnemyKind::Ranger => 3.0,
        }
    }

    /// Seconds between shots (shooting variants only)
    pub fn fire_delay(self, difficulty: f32) -> f32 {
        match self {
            EnemyKind::Chaser => f32::INFINITY,
            EnemyKind::Sentry => (1.6 - difficulty * 0.4).max(0.8),
            EnemyKind::Ranger => (1.1 - difficulty * 0.25).max(0.6),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub health: f32,
    /// Inert and non-interacting until this reaches zero
    pub ignition: f32,
    pub fire_timer: f32,
}

impl Enemy {
    pub fn active(&self) -> bool {
        self.ignition <= 0.0
    }

    /// Returns true when the hit killed it
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.health -= amount;
        self.health <= 0.0
    }
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub friendly: bool,
    pub damage: f32,
    /// Remaining lifetime in seconds
    pub ttl: f32,
}

/// Cosmetic effect classes; never gameplay-affecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    DashEcho,
    MuzzleFlash,
    Burst,
}

#[derive(Debug, Clone)]
pub struct Effect {
    pub kind: EffectKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at spawn, decays to 0
    pub life: f32,
}

/// Simulation context for one sector run
#[derive(Debug, Clone)]
pub struct SimState {
    pub sector: Sector,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub effects: Vec<Effect>,
    /// Scaled sim time since the sector started
    pub elapsed: f32,
    pub phase: RunPhase,
    /// Cores collected this sector (pickups + kill rewards)
    pub bonus_cores: u32,
    /// Behavior stream: ranger jitter, drop rolls
    pub rng: Mulberry32,
    next_id: u32,
}

impl SimState {
    /// Build the simulation context for a freshly generated sector. The
    /// player is repositioned at the start point with spawn-default pools.
    pub fn new(sector: Sector, mut player: Player) -> Self {
        player.spawn(sector.start);
        let rng = Mulberry32::for_sector(sector.seed ^ SIM_STREAM_SALT, sector.index);
        let mut state = Self {
            player,
            enemies: Vec::with_capacity(sector.spawns.len()),
            projectiles: Vec::new(),
            pickups: sector.pickups.clone(),
            effects: Vec::new(),
            elapsed: 0.0,
            phase: RunPhase::Running,
            bonus_cores: 0,
            rng,
            next_id: 1,
            sector,
        };
        for spawn in state.sector.spawns.clone() {
            let id = state.next_entity_id();
            state.enemies.push(Enemy {
                id,
                kind: spawn.kind,
                pos: spawn.pos,
                vel: Vec2::ZERO,
                radius: 14.0,
                health: spawn.kind.max_health(),
                ignition: spawn.ignition,
                fire_timer: 0.0,
            });
        }
        state
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_projectile(&mut self, pos: Vec2, vel: Vec2, friendly: bool, damage: f32) {
        let id = self.next_entity_id();
        self.projectiles.push(Projectile {
            id,
            pos,
            vel,
            friendly,
            damage,
            ttl: 2.5,
        });
    }

    pub fn spawn_effect(&mut self, kind: EffectKind, pos: Vec2, vel: Vec2) {
        self.effects.push(Effect {
            kind,
            pos,
            vel,
            life: 1.0,
        });
    }
}
