//! Player state: upgrade-derived stats, resource pools, time manipulation
//!
//! All stats are fixed at spawn time from the persisted upgrade levels. The
//! player value is created once per run and repositioned (not recreated) at
//! sector transitions; resource pools reset to spawn defaults then.

use std::collections::VecDeque;

use glam::Vec2;

use crate::consts::*;
use crate::save::UpgradeLevels;

/// Which time power is in effect for the current tick. Exactly one applies;
/// rewind wins over slow when both controls are held and rewind can act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePower {
    Normal,
    Slow,
    Rewind,
}

/// One rewind history entry
#[derive(Debug, Clone, Copy)]
struct RewindSample {
    pos: Vec2,
    vel: Vec2,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,

    pub max_health: f32,
    pub health: f32,
    pub shield: f32,
    pub max_energy: f32,
    pub energy: f32,

    // Upgrade-derived stats, fixed at spawn
    pub base_speed: f32,
    pub dash_strength: f32,
    pub dash_cooldown: f32,
    pub energy_regen: f32,
    pub slow_drain: f32,
    pub slow_scale: f32,
    pub fire_delay: f32,
    pub projectile_speed: f32,
    pub projectile_damage: f32,

    // Cooldown timers, monotonically decreasing toward zero
    pub dash_timer: f32,
    pub fire_timer: f32,
    pub invuln_timer: f32,

    /// Multiplier applied to the simulation delta this tick
    pub time_scale: f32,
    pub last_fire_dir: Vec2,

    slow_accum: f32,
    rewind_buffer: VecDeque<RewindSample>,
    rewind_sample_timer: f32,
}

impl Player {
    /// Build a player from persisted upgrade levels
    pub fn from_upgrades(upgrades: &UpgradeLevels) -> Self {
        let engine = upgrades.engine as f32;
        let focus = upgrades.focus as f32;
        let arsenal = upgrades.arsenal as f32;
        let chrono = upgrades.chrono as f32;

        let max_health = 4.0 + (upgrades.chrono / 2) as f32;
        let max_energy = 110.0 + focus * 18.0;

        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,

            max_health,
            health: max_health,
            shield: 0.0,
            max_energy,
            energy: max_energy,

            base_speed: 220.0 + engine * 16.0,
            dash_strength: 340.0 + engine * 20.0,
            dash_cooldown: (0.8 - engine * 0.08).max(0.35),
            energy_regen: 18.0 + focus * 4.0,
            slow_drain: (22.0 - chrono * 2.5).max(10.0),
            slow_scale: 0.55 - (chrono * 0.03).min(0.2),
            fire_delay: (0.32 - arsenal * 0.025).max(0.12),
            projectile_speed: 420.0 + arsenal * 22.0,
            projectile_damage: 1.0 + arsenal * 0.4,

            dash_timer: 0.0,
            fire_timer: 0.0,
            invuln_timer: 0.0,

            time_scale: 1.0,
            last_fire_dir: Vec2::X,

            slow_accum: 0.0,
            rewind_buffer: VecDeque::with_capacity(REWIND_BUFFER_CAP),
            rewind_sample_timer: 0.0,
        }
    }

    /// Reposition at a sector start: pools back to spawn defaults, timers
    /// cleared, rewind history discarded. Upgrade stats are untouched.
    pub fn spawn(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.health = self.max_health;
        self.shield = 0.0;
        self.energy = self.max_energy;
        self.time_scale = 1.0;
        self.dash_timer = 0.0;
        self.fire_timer = 0.0;
        self.invuln_timer = 0.0;
        self.slow_accum = 0.0;
        self.rewind_buffer.clear();
        self.rewind_sample_timer = 0.0;
    }

    /// Decay cooldown timers at wall-clock rate (never scaled, never negative)
    pub fn decay_cooldowns(&mut self, dt: f32) {
        self.invuln_timer = (self.invuln_timer - dt).max(0.0);
        self.dash_timer = (self.dash_timer - dt).max(0.0);
        self.fire_timer = (self.fire_timer - dt).max(0.0);
    }

    /// Compute this tick's time power and update the energy pool.
    ///
    /// Energy regenerates only while the ability is unused: holding a
    /// control with an empty pool is a no-op that neither drains nor
    /// refills, and the time scale snaps back to 1.0.
    pub fn apply_time_powers(&mut self, dt: f32, slow_held: bool, rewind_held: bool) -> TimePower {
        if rewind_held && self.energy > 0.0 && !self.rewind_buffer.is_empty() {
            let mut restored = None;
            for _ in 0..REWIND_POPS_PER_TICK {
                if let Some(sample) = self.rewind_buffer.pop_back() {
                    restored = Some(sample);
                }
            }
            if let Some(sample) = restored {
                self.pos = sample.pos;
                self.vel = sample.vel;
            }
            self.energy = (self.energy - self.slow_drain * REWIND_DRAIN_FACTOR * dt).max(0.0);
            self.time_scale = REWIND_TIME_SCALE;
            return TimePower::Rewind;
        }
        if slow_held {
            if self.energy > 0.0 {
                self.energy = (self.energy - self.slow_drain * dt).max(0.0);
                self.time_scale = self.slow_scale;
                self.slow_accum += dt;
                if self.slow_accum >= SLOW_SHIELD_THRESHOLD {
                    self.grant_shield(1.0);
                    self.slow_accum = 0.0;
                }
                return TimePower::Slow;
            }
            self.time_scale = 1.0;
            return TimePower::Normal;
        }
        self.time_scale = 1.0;
        self.energy = (self.energy + self.energy_regen * dt).min(self.max_energy);
        self.slow_accum = (self.slow_accum - dt * 0.6).max(0.0);
        TimePower::Normal
    }

    /// Sample position/velocity into the rewind history at the fixed
    /// wall-time interval. Not called while rewinding.
    pub fn record_rewind_sample(&mut self, dt: f32) {
        self.rewind_sample_timer += dt;
        if self.rewind_sample_timer < REWIND_SAMPLE_INTERVAL {
            return;
        }
        self.rewind_sample_timer = 0.0;
        if self.rewind_buffer.len() >= REWIND_BUFFER_CAP {
            self.rewind_buffer.pop_front();
        }
        self.rewind_buffer.push_back(RewindSample {
            pos: self.pos,
            vel: self.vel,
        });
    }

    pub fn rewind_history_len(&self) -> usize {
        self.rewind_buffer.len()
    }

    /// Apply damage through shield and the invulnerability window.
    /// Returns true when the hit was fatal.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.invuln_timer > 0.0 {
            return false;
        }
        let mut remaining = amount;
        if self.shield > 0.0 {
            let absorbed = self.shield.min(remaining);
            self.shield -= absorbed;
            remaining -= absorbed;
        }
        if remaining <= 0.0 {
            self.invuln_timer = 0.4;
            return false;
        }
        self.health -= remaining;
        self.invuln_timer = 0.7;
        self.health <= 0.0
    }

    pub fn grant_shield(&mut self, amount: f32) {
        self.shield = (self.shield + amount).min(2.0 + amount);
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Defensive invariant clamp, run every tick: pools stay in `[0, max]`
    pub fn clamp_pools(&mut self) {
        self.health = self.health.clamp(0.0, self.max_health);
        self.energy = self.energy.clamp(0.0, self.max_energy);
        self.shield = self.shield.max(0.0);
    }

    pub fn health_pct(&self) -> f32 {
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    pub fn energy_pct(&self) -> f32 {
        (self.energy / self.max_energy).clamp(0.0, 1.0)
    }
}
