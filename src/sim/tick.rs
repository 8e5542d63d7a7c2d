//! Fixed-order per-frame simulation tick
//!
//! Ordering within a tick is fixed and load-bearing: cooldown decay, then
//! time-scale computation, then world/entity updates (hazards, spawners,
//! enemies, projectiles, pickups, effects), then player movement and
//! collision, then terminal-condition checks. Entity removal is a compact
//! pass at the end of each stage, never a mid-iteration mutation.

use glam::Vec2;

use crate::circles_overlap;
use crate::consts::*;
use crate::input::{Action, InputSource};
use crate::level::{EnemyKind, Pickup, PickupKind};
use crate::save::Outcome;
use crate::sim::collision::{advance_point, move_circle};
use crate::sim::player::TimePower;
use crate::sim::state::{EffectKind, RunPhase, SimState};

/// Sentry opens fire inside this distance
const SENTRY_RANGE: f32 = 380.0;
/// Ranger stand-off band: advances beyond max, retreats inside min
const RANGER_BAND_MIN: f32 = 180.0;
const RANGER_BAND_MAX: f32 = 260.0;
const RANGER_FIRE_RANGE: f32 = 420.0;
/// Angular jitter applied to ranger shots (radians, centered)
const RANGER_JITTER: f32 = 0.24;
const HOSTILE_PROJECTILE_SPEED: f32 = 260.0;
const PROJECTILE_HIT_RADIUS: f32 = 4.0;
const PICKUP_RADIUS: f32 = 12.0;
/// Cores granted per enemy kill
const KILL_CORES: u32 = 3;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub dash: bool,
    pub fire: bool,
    pub slow: bool,
    pub rewind: bool,
    /// Pause toggle was *pressed* this tick
    pub pause: bool,
}

impl TickInput {
    /// Sample the held-action state from the host's input capability.
    ///
    /// The tick treats [`Action::PauseToggle`] as an edge, so the host's
    /// source must report it held only on the frame the control was
    /// pressed, not for the whole duration of the press.
    pub fn from_source(source: &impl InputSource) -> Self {
        Self {
            left: source.is_held(Action::MoveLeft),
            right: source.is_held(Action::MoveRight),
            up: source.is_held(Action::MoveUp),
            down: source.is_held(Action::MoveDown),
            dash: source.is_held(Action::Dash),
            fire: source.is_held(Action::Fire),
            slow: source.is_held(Action::SlowTime),
            rewind: source.is_held(Action::Rewind),
            pause: source.is_held(Action::PauseToggle),
        }
    }

    /// Normalized movement direction (diagonals are not faster)
    pub fn move_dir(&self) -> Vec2 {
        let x = (self.right as i32 - self.left as i32) as f32;
        let y = (self.down as i32 - self.up as i32) as f32;
        Vec2::new(x, y).normalize_or_zero()
    }
}

/// Advance the simulation by one frame
pub fn tick(state: &mut SimState, input: &TickInput, raw_dt: f32) {
    if input.pause {
        match state.phase {
            RunPhase::Running => {
                state.phase = RunPhase::Paused;
                return;
            }
            RunPhase::Paused => {
                // Resuming consumes the whole tick so no catch-up step is
                // taken with the stale frame delta.
                state.phase = RunPhase::Running;
                return;
            }
            RunPhase::Ended(_) => {}
        }
    }
    if state.phase != RunPhase::Running {
        return;
    }

    let dt = raw_dt.clamp(0.0, MAX_FRAME_DT);

    // Cooldowns decay at wall-clock rate, unaffected by time powers
    state.player.decay_cooldowns(dt);

    let power = state
        .player
        .apply_time_powers(dt, input.slow, input.rewind);
    if power != TimePower::Rewind {
        state.player.record_rewind_sample(dt);
    }
    let sdt = dt * state.player.time_scale;
    state.elapsed += sdt;

    update_hazard_contact(state);
    update_enemies(state, sdt);
    update_projectiles(state, sdt);
    update_pickups(state);
    update_effects(state, sdt);
    update_player(state, input, sdt);

    // Defensive invariant clamp: pools stay in [0, max] on every exit path
    state.player.clamp_pools();

    check_terminal(state);
}

/// Hazard contact is re-evaluated every tick; a single overlapping frame
/// with an active hazard deals one damage event, gated by the player's
/// invulnerability window.
fn update_hazard_contact(state: &mut SimState) {
    let pos = state.player.pos;
    let radius = state.player.radius;
    let elapsed = state.elapsed;
    let hit = state
        .sector
        .hazards
        .iter()
        .any(|h| h.hits(elapsed, pos, radius));
    if hit {
        state.player.take_damage(1.0);
    }
}

fn update_enemies(state: &mut SimState, dt: f32) {
    let difficulty = state.sector.difficulty();
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;
    let mut shots: Vec<(Vec2, Vec2)> = Vec::new();
    let mut contact = false;

    {
        let SimState {
            ref sector,
            ref mut enemies,
            ref mut rng,
            ..
        } = *state;

        for enemy in enemies.iter_mut() {
            if !enemy.active() {
                enemy.ignition = (enemy.ignition - dt).max(0.0);
                continue;
            }
            let to_player = player_pos - enemy.pos;
            let dist = to_player.length();
            let dir = if dist > 1e-4 { to_player / dist } else { Vec2::X };

            match enemy.kind {
                EnemyKind::Chaser => {
                    enemy.vel = dir * enemy.kind.speed(difficulty);
                    move_circle(sector, &mut enemy.pos, &mut enemy.vel, enemy.radius, dt);
                }
                EnemyKind::Sentry => {
                    enemy.fire_timer = (enemy.fire_timer - dt).max(0.0);
                    if dist < SENTRY_RANGE && enemy.fire_timer <= 0.0 {
                        let origin = enemy.pos + dir * (enemy.radius + 4.0);
                        shots.push((origin, dir * HOSTILE_PROJECTILE_SPEED));
                        enemy.fire_timer = enemy.kind.fire_delay(difficulty);
                    }
                }
                EnemyKind::Ranger => {
                    enemy.fire_timer = (enemy.fire_timer - dt).max(0.0);
                    let speed = enemy.kind.speed(difficulty);
                    enemy.vel = if dist > RANGER_BAND_MAX {
                        dir * speed
                    } else if dist < RANGER_BAND_MIN {
                        -dir * speed
                    } else {
                        Vec2::ZERO
                    };
                    move_circle(sector, &mut enemy.pos, &mut enemy.vel, enemy.radius, dt);
                    if dist < RANGER_FIRE_RANGE && enemy.fire_timer <= 0.0 {
                        let jitter = (rng.next() - 0.5) * RANGER_JITTER;
                        let aim = Vec2::from_angle(jitter).rotate(dir);
                        let origin = enemy.pos + aim * (enemy.radius + 4.0);
                        shots.push((origin, aim * HOSTILE_PROJECTILE_SPEED));
                        enemy.fire_timer = enemy.kind.fire_delay(difficulty);
                    }
                }
            }

            if circles_overlap(enemy.pos, enemy.radius, player_pos, player_radius) {
                contact = true;
            }
        }
    }

    for (pos, vel) in shots {
        state.spawn_projectile(pos, vel, false, 1.0);
    }
    if contact {
        state.player.take_damage(1.0);
    }
}

fn update_projectiles(state: &mut SimState, dt: f32) {
    let mut drops: Vec<Pickup> = Vec::new();
    let mut bursts: Vec<Vec2> = Vec::new();
    let mut kills = 0u32;

    {
        let SimState {
            ref sector,
            ref mut projectiles,
            ref mut enemies,
            ref mut player,
            ref mut rng,
            ..
        } = *state;

        for proj in projectiles.iter_mut() {
            proj.ttl -= dt;
            if proj.ttl <= 0.0 {
                continue;
            }
            if !advance_point(sector, &mut proj.pos, proj.vel, dt) {
                // Entered solid geometry: destroyed without effect
                proj.ttl = 0.0;
                continue;
            }
            if proj.friendly {
                // First live enemy hit wins; one damage application. An
                // enemy killed earlier this tick no longer absorbs shots.
                for enemy in enemies.iter_mut() {
                    if !enemy.active() || enemy.health <= 0.0 {
                        continue;
                    }
                    if circles_overlap(proj.pos, PROJECTILE_HIT_RADIUS, enemy.pos, enemy.radius) {
                        enemy.take_damage(proj.damage);
                        proj.ttl = 0.0;
                        break;
                    }
                }
            } else if circles_overlap(proj.pos, PROJECTILE_HIT_RADIUS, player.pos, player.radius) {
                player.take_damage(proj.damage);
                proj.ttl = 0.0;
            }
        }
        projectiles.retain(|p| p.ttl > 0.0);

        // Compact dead enemies at end of tick: reward, maybe drop a bonus
        for enemy in enemies.iter() {
            if enemy.health <= 0.0 {
                kills += 1;
                bursts.push(enemy.pos);
                if rng.chance(0.25) {
                    let kind = if rng.chance(0.5) {
                        PickupKind::Heal(1)
                    } else {
                        PickupKind::Core(8)
                    };
                    drops.push(Pickup { kind, pos: enemy.pos });
                }
            }
        }
        enemies.retain(|e| e.health > 0.0);
    }

    state.bonus_cores += kills * KILL_CORES;
    for pos in bursts {
        state.spawn_effect(EffectKind::Burst, pos, Vec2::ZERO);
    }
    state.pickups.extend(drops);
}

fn update_pickups(state: &mut SimState) {
    let pos = state.player.pos;
    let radius = state.player.radius;
    let mut consumed: Vec<PickupKind> = Vec::new();
    state.pickups.retain(|p| {
        if circles_overlap(p.pos, PICKUP_RADIUS, pos, radius) {
            consumed.push(p.kind);
            false
        } else {
            true
        }
    });
    for kind in consumed {
        match kind {
            PickupKind::Heal(amount) => state.player.heal(amount as f32),
            PickupKind::Core(amount) => state.bonus_cores += amount,
        }
    }
}

fn update_effects(state: &mut SimState, dt: f32) {
    for effect in &mut state.effects {
        effect.pos += effect.vel * dt;
        effect.vel *= 0.96;
        effect.life -= dt * 2.0;
    }
    state.effects.retain(|e| e.life > 0.0);
}

fn update_player(state: &mut SimState, input: &TickInput, dt: f32) {
    let move_dir = input.move_dir();

    // Dash: energy-gated impulse along the move direction, falling back to
    // the last fire direction when standing still
    let mut dash_impulse = None;
    if input.dash
        && state.player.dash_timer <= 0.0
        && state.player.energy >= DASH_ENERGY_COST
    {
        state.player.energy -= DASH_ENERGY_COST;
        state.player.dash_timer = state.player.dash_cooldown;
        let dir = if move_dir != Vec2::ZERO {
            move_dir
        } else {
            state.player.last_fire_dir
        };
        dash_impulse = Some(dir * state.player.dash_strength);
    }

    if move_dir != Vec2::ZERO {
        state.player.last_fire_dir = move_dir;
    }
    let target = move_dir * state.player.base_speed;
    let lerp = 1.0 - (-10.0 * dt).exp();
    let vel = state.player.vel;
    state.player.vel = vel + (target - vel) * lerp;

    if let Some(impulse) = dash_impulse {
        state.player.vel += impulse;
        let echo_pos = state.player.pos;
        state.spawn_effect(EffectKind::DashEcho, echo_pos, impulse * 0.2);
    }

    {
        let SimState {
            ref sector,
            ref mut player,
            ..
        } = *state;
        move_circle(sector, &mut player.pos, &mut player.vel, player.radius, dt);
    }

    // Auto-aimed fire: nearest active enemy, else the last fire direction
    if input.fire && state.player.fire_timer <= 0.0 {
        let origin = state.player.pos;
        let dir = state
            .enemies
            .iter()
            .filter(|e| e.active())
            .min_by(|a, b| {
                a.pos
                    .distance_squared(origin)
                    .partial_cmp(&b.pos.distance_squared(origin))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| (e.pos - origin).normalize_or_zero())
            .filter(|d| *d != Vec2::ZERO)
            .unwrap_or(state.player.last_fire_dir);
        state.player.last_fire_dir = dir;
        let speed = state.player.projectile_speed;
        let damage = state.player.projectile_damage;
        let spawn_pos = origin + dir * (state.player.radius + 4.0);
        state.spawn_projectile(spawn_pos, dir * speed, true, damage);
        state.spawn_effect(EffectKind::MuzzleFlash, spawn_pos, dir * 40.0);
        state.player.fire_timer = state.player.fire_delay;
    }
}

fn check_terminal(state: &mut SimState) {
    if state.phase != RunPhase::Running {
        return;
    }
    if state.player.health <= 0.0 {
        log::info!("sector {} defeated", state.sector.index);
        let pos = state.player.pos;
        state.spawn_effect(EffectKind::Burst, pos, Vec2::ZERO);
        state.phase = RunPhase::Ended(Outcome::Defeated);
        return;
    }
    if circles_overlap(
        state.player.pos,
        state.player.radius,
        state.sector.exit,
        state.sector.exit_radius,
    ) {
        log::info!("sector {} cleared", state.sector.index);
        state.phase = RunPhase::Ended(Outcome::Cleared);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{generate_sector, Hazard, Sector, Tile};
    use crate::save::UpgradeLevels;
    use crate::sim::player::Player;
    use proptest::prelude::*;

    /// Open floor with a solid border and no decoration
    fn arena() -> Sector {
        let mut tiles = vec![Tile::Floor; (GRID_W * GRID_H) as usize];
        for tx in 0..GRID_W {
            tiles[tx as usize] = Tile::Wall;
            tiles[((GRID_H - 1) * GRID_W + tx) as usize] = Tile::Wall;
        }
        for ty in 0..GRID_H {
            tiles[(ty * GRID_W) as usize] = Tile::Wall;
            tiles[(ty * GRID_W + GRID_W - 1) as usize] = Tile::Wall;
        }
        Sector {
            index: 1,
            seed: 42,
            path: vec![false; (GRID_W * GRID_H) as usize],
            tiles,
            start: Vec2::new(WORLD_W * 0.5, WORLD_H * 0.5),
            exit: Vec2::new(WORLD_W - 96.0, 96.0),
            exit_radius: EXIT_RADIUS,
            rooms: Vec::new(),
            hazards: Vec::new(),
            pickups: Vec::new(),
            spawns: Vec::new(),
        }
    }

    fn fresh_state(sector: Sector) -> SimState {
        SimState::new(sector, Player::from_upgrades(&UpgradeLevels::default()))
    }

    fn always_on_pulse(center: Vec2) -> Hazard {
        Hazard::Pulse {
            center,
            radius: 60.0,
            period: 100.0,
            active_for: 100.0,
            phase: 0.0,
        }
    }

    #[test]
    fn test_from_source_maps_the_full_action_set() {
        let mut held = crate::input::HeldSet::new();
        held.press(Action::Fire);
        held.press(Action::MoveRight);
        held.press(Action::PauseToggle);
        let input = TickInput::from_source(&held);
        assert!(input.fire && input.right && input.pause);
        assert!(!input.left && !input.dash && !input.slow && !input.rewind);

        let mut state = fresh_state(arena());
        tick(&mut state, &input, 0.033);
        assert_eq!(state.phase, RunPhase::Paused);
    }

    #[test]
    fn test_pause_suspends_and_resumes() {
        let mut state = fresh_state(arena());
        let toggle = TickInput { pause: true, ..Default::default() };
        tick(&mut state, &toggle, 0.033);
        assert_eq!(state.phase, RunPhase::Paused);

        let before = state.elapsed;
        tick(&mut state, &TickInput::default(), 0.033);
        assert_eq!(state.elapsed, before);

        tick(&mut state, &toggle, 0.033);
        assert_eq!(state.phase, RunPhase::Running);
        // The resume tick itself advances nothing (delta baseline reset)
        assert_eq!(state.elapsed, before);
    }

    #[test]
    fn test_hazard_damage_once_per_invuln_window() {
        let mut sector = arena();
        sector.hazards.push(always_on_pulse(sector.start));
        let mut state = fresh_state(sector);
        tick(&mut state, &TickInput::default(), 0.033);
        assert_eq!(state.player.health, 3.0);
        // Still overlapping, but inside the invulnerability window
        tick(&mut state, &TickInput::default(), 0.033);
        assert_eq!(state.player.health, 3.0);
    }

    #[test]
    fn test_death_transition_fires_exactly_once() {
        let mut sector = arena();
        sector.hazards.push(always_on_pulse(sector.start));
        let mut state = fresh_state(sector);
        state.player.health = 1.0;
        tick(&mut state, &TickInput::default(), 0.033);
        assert_eq!(state.phase, RunPhase::Ended(Outcome::Defeated));
        let elapsed = state.elapsed;
        // Re-checking the same overlap in the ended state changes nothing
        tick(&mut state, &TickInput::default(), 0.033);
        assert_eq!(state.phase, RunPhase::Ended(Outcome::Defeated));
        assert_eq!(state.elapsed, elapsed);
    }

    #[test]
    fn test_exit_transition_idempotent() {
        let mut state = fresh_state(arena());
        state.player.pos = state.sector.exit;
        tick(&mut state, &TickInput::default(), 0.033);
        assert_eq!(state.phase, RunPhase::Ended(Outcome::Cleared));
        tick(&mut state, &TickInput::default(), 0.033);
        assert_eq!(state.phase, RunPhase::Ended(Outcome::Cleared));
    }

    #[test]
    fn test_slow_time_scales_the_world() {
        let mut state = fresh_state(arena());
        let slow = TickInput { slow: true, ..Default::default() };
        tick(&mut state, &slow, 0.033);
        assert!((state.elapsed - 0.033 * 0.55).abs() < 1e-5);
        assert!(state.player.energy < state.player.max_energy);
    }

    #[test]
    fn test_friendly_projectile_kills_and_rewards() {
        let mut state = fresh_state(arena());
        let id = state.next_entity_id();
        state.enemies.push(crate::sim::state::Enemy {
            id,
            kind: EnemyKind::Sentry,
            pos: state.player.pos + Vec2::new(60.0, 0.0),
            vel: Vec2::ZERO,
            radius: 14.0,
            health: 1.0,
            ignition: 0.0,
            fire_timer: 10.0,
        });
        let origin = state.player.pos + Vec2::new(20.0, 0.0);
        state.spawn_projectile(origin, Vec2::new(400.0, 0.0), true, 1.0);
        // Player sits far enough from the enemy not to take contact damage
        let mut ticks = 0;
        while !state.enemies.is_empty() && ticks < 20 {
            tick(&mut state, &TickInput::default(), 0.033);
            ticks += 1;
        }
        assert!(state.enemies.is_empty());
        assert!(state.bonus_cores >= KILL_CORES);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_dead_enemy_stops_absorbing_projectiles() {
        let mut state = fresh_state(arena());
        let id = state.next_entity_id();
        state.enemies.push(crate::sim::state::Enemy {
            id,
            kind: EnemyKind::Sentry,
            pos: state.player.pos + Vec2::new(60.0, 0.0),
            vel: Vec2::ZERO,
            radius: 14.0,
            health: 1.0,
            ignition: 0.0,
            fire_timer: 10.0,
        });
        // Two shots arrive the same tick; the first one kills
        state.spawn_projectile(
            state.player.pos + Vec2::new(50.0, 0.0),
            Vec2::new(200.0, 0.0),
            true,
            1.0,
        );
        state.spawn_projectile(
            state.player.pos + Vec2::new(48.0, 0.0),
            Vec2::new(200.0, 0.0),
            true,
            1.0,
        );
        tick(&mut state, &TickInput::default(), 0.033);
        assert!(state.enemies.is_empty());
        // The second shot flew on instead of vanishing into the corpse
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_hostile_projectile_ignores_enemies() {
        let mut state = fresh_state(arena());
        let id = state.next_entity_id();
        state.enemies.push(crate::sim::state::Enemy {
            id,
            kind: EnemyKind::Sentry,
            pos: state.player.pos + Vec2::new(300.0, 0.0),
            vel: Vec2::ZERO,
            radius: 14.0,
            health: 4.0,
            ignition: 0.0,
            fire_timer: 10.0,
        });
        // Hostile shot passing right through the sentry's position
        state.spawn_projectile(
            state.player.pos + Vec2::new(310.0, 0.0),
            Vec2::new(-200.0, 0.0),
            false,
            1.0,
        );
        tick(&mut state, &TickInput::default(), 0.033);
        assert_eq!(state.enemies[0].health, 4.0);
    }

    #[test]
    fn test_pickups_consumed_on_overlap() {
        let mut sector = arena();
        sector.pickups.push(Pickup {
            kind: PickupKind::Heal(1),
            pos: sector.start,
        });
        sector.pickups.push(Pickup {
            kind: PickupKind::Core(9),
            pos: sector.start + Vec2::new(4.0, 0.0),
        });
        let mut state = fresh_state(sector);
        state.player.health = 2.0;
        tick(&mut state, &TickInput::default(), 0.033);
        assert!(state.pickups.is_empty());
        assert_eq!(state.player.health, 3.0);
        assert_eq!(state.bonus_cores, 9);
    }

    #[test]
    fn test_ignition_delay_keeps_enemy_inert() {
        let mut state = fresh_state(arena());
        let id = state.next_entity_id();
        state.enemies.push(crate::sim::state::Enemy {
            id,
            kind: EnemyKind::Chaser,
            // Directly on top of the player: would deal contact damage if live
            pos: state.player.pos,
            vel: Vec2::ZERO,
            radius: 14.0,
            health: 3.0,
            ignition: 1.0,
            fire_timer: 0.0,
        });
        tick(&mut state, &TickInput::default(), 0.033);
        assert_eq!(state.player.health, state.player.max_health);
        assert!(state.enemies[0].ignition < 1.0);
    }

    #[test]
    fn test_chaser_closes_distance() {
        let mut state = fresh_state(arena());
        let id = state.next_entity_id();
        let start = state.player.pos + Vec2::new(200.0, 0.0);
        state.enemies.push(crate::sim::state::Enemy {
            id,
            kind: EnemyKind::Chaser,
            pos: start,
            vel: Vec2::ZERO,
            radius: 14.0,
            health: 3.0,
            ignition: 0.0,
            fire_timer: 0.0,
        });
        tick(&mut state, &TickInput::default(), 0.033);
        assert!(state.enemies[0].pos.distance(state.player.pos) < 200.0);
    }

    #[test]
    fn test_sentry_fires_when_in_range() {
        let mut state = fresh_state(arena());
        let id = state.next_entity_id();
        state.enemies.push(crate::sim::state::Enemy {
            id,
            kind: EnemyKind::Sentry,
            pos: state.player.pos + Vec2::new(200.0, 0.0),
            vel: Vec2::ZERO,
            radius: 14.0,
            health: 4.0,
            ignition: 0.0,
            fire_timer: 0.0,
        });
        tick(&mut state, &TickInput::default(), 0.033);
        assert_eq!(state.projectiles.len(), 1);
        assert!(!state.projectiles[0].friendly);
        // Cooldown was reset, the next tick adds no second shot
        tick(&mut state, &TickInput::default(), 0.033);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_determinism_across_identical_runs() {
        let inputs = [
            TickInput { right: true, ..Default::default() },
            TickInput { right: true, fire: true, ..Default::default() },
            TickInput { up: true, slow: true, ..Default::default() },
            TickInput::default(),
        ];
        let mut a = fresh_state(generate_sector(3, 12345));
        let mut b = fresh_state(generate_sector(3, 12345));
        for _ in 0..50 {
            for input in &inputs {
                tick(&mut a, input, 0.033);
                tick(&mut b, input, 0.033);
            }
        }
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.elapsed, b.elapsed);
        assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.health, eb.health);
        }
    }

    proptest! {
        #[test]
        fn prop_pools_clamped_under_arbitrary_input(
            seed in any::<u32>(),
            flags in proptest::collection::vec(0u16..512, 1..120),
        ) {
            let mut state = fresh_state(generate_sector(2, seed));
            for f in flags {
                let input = TickInput {
                    left: f & 1 != 0,
                    right: f & 2 != 0,
                    up: f & 4 != 0,
                    down: f & 8 != 0,
                    dash: f & 16 != 0,
                    fire: f & 32 != 0,
                    slow: f & 64 != 0,
                    rewind: f & 128 != 0,
                    pause: f & 256 != 0,
                };
                tick(&mut state, &input, 0.033);
                let p = &state.player;
                prop_assert!((0.0..=p.max_health).contains(&p.health));
                prop_assert!((0.0..=p.max_energy).contains(&p.energy));
                prop_assert!(p.shield >= 0.0);
                prop_assert!(p.pos.x.is_finite() && p.pos.y.is_finite());
                prop_assert!(p.invuln_timer >= 0.0 && p.dash_timer >= 0.0 && p.fire_timer >= 0.0);
            }
        }
    }
}
