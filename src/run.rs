//! Run orchestration and meta-progression
//!
//! [`Run`] owns the simulation for the current sector plus the persisted
//! progression record, and mediates between them: terminal outcomes settle
//! exactly once into the save, persistence writes happen only at checkpoint
//! boundaries (run start, clear, defeat), and sector transitions draw fresh
//! seeds. Rendering, the shop screen and actual storage stay in the host;
//! the shop is reached through a navigation signal the host consumes.

use crate::consts::SECTOR_BLOCK;
use crate::level::generate_sector;
use crate::save::{Outcome, RunInProgress, RunRecord, SaveRecord, SaveStore, UpgradeLevels};
use crate::sim::{tick, Player, RunPhase, SimState, TickInput};

/// How to pick the starting sector when constructing a [`Run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeMode {
    /// Start at the saved sector index with a freshly drawn seed
    Continue,
    /// Resume the exact interrupted run (same sector, same seed); falls
    /// back to [`ResumeMode::Continue`] when no run is in progress
    Resume,
}

/// One-shot signals for the host's screen router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSignal {
    /// A progression-block boundary was reached; offer the upgrade shop
    Shop,
}

/// Read-only HUD state, sampled once per frame by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudSnapshot {
    pub sector: u32,
    pub credits: u32,
    pub best_sector: u32,
    pub health_pct: f32,
    pub energy_pct: f32,
    pub shield: f32,
    pub time_scale: f32,
    pub alive: bool,
    pub phase: RunPhase,
}

pub struct Run<S: SaveStore> {
    store: S,
    save: SaveRecord,
    sim: SimState,
    sector_index: u32,
    seed: u32,
    /// Wall-clock run time; unaffected by time powers
    run_time: f64,
    /// Terminal outcome has been folded into the save
    settled: bool,
    /// Sector/seed to regenerate on the next [`Run::advance`]
    pending: Option<(u32, u32)>,
    nav: Option<NavSignal>,
}

impl<S: SaveStore> Run<S> {
    /// Load progression and start a run. The in-progress checkpoint is
    /// written immediately so an interrupted session can resume exactly.
    pub fn new(mut store: S, mode: ResumeMode) -> Self {
        let mut save = store.load();
        let (sector_index, seed) = match (mode, save.current_run) {
            (ResumeMode::Resume, Some(run)) => (run.sector, run.seed),
            _ => (save.sector, fresh_seed()),
        };
        save.current_run = Some(RunInProgress { sector: sector_index, seed });
        store.store(&save);

        let sector = generate_sector(sector_index, seed);
        let sim = SimState::new(sector, Player::from_upgrades(&save.upgrades));
        log::info!("run started at sector {sector_index} (seed {seed:#010x})");
        Self {
            store,
            save,
            sim,
            sector_index,
            seed,
            run_time: 0.0,
            settled: false,
            pending: None,
            nav: None,
        }
    }

    /// Advance one frame: tick the simulation, accumulate run time, and
    /// settle a terminal outcome into the save the first time it appears.
    pub fn frame(&mut self, input: &TickInput, raw_dt: f32) {
        let was_running = self.sim.phase == RunPhase::Running;
        tick(&mut self.sim, input, raw_dt);
        if was_running && self.sim.phase != RunPhase::Paused {
            self.run_time += f64::from(raw_dt.clamp(0.0, crate::consts::MAX_FRAME_DT));
        }
        self.settle_terminal();
    }

    fn settle_terminal(&mut self) {
        let RunPhase::Ended(outcome) = self.sim.phase else {
            return;
        };
        if self.settled {
            return;
        }
        self.settled = true;

        let record = RunRecord {
            sector: self.sector_index,
            seed: self.seed,
            time: self.run_time,
            outcome,
            timestamp: timestamp_ms(),
        };

        let next = match outcome {
            Outcome::Cleared => {
                let reward = 10 + self.sector_index / 2 + self.sim.bonus_cores;
                self.save.credits += reward;
                let next = self.sector_index + 1;
                self.save.best_sector = self.save.best_sector.max(next);
                log::info!(
                    "sector {} cleared in {:.1}s, +{reward} cores",
                    self.sector_index,
                    self.run_time
                );
                if next % SECTOR_BLOCK == 0 {
                    self.nav = Some(NavSignal::Shop);
                }
                next
            }
            Outcome::Defeated => {
                let block_start =
                    (self.sector_index - (self.sector_index - 1) % SECTOR_BLOCK).max(1);
                log::info!(
                    "defeated in sector {}, back to sector {block_start}",
                    self.sector_index
                );
                block_start
            }
        };

        let seed = fresh_seed();
        self.save.sector = next;
        self.save.current_run = Some(RunInProgress { sector: next, seed });
        self.save.append_run(record);
        self.store.store(&self.save);
        self.pending = Some((next, seed));
    }

    /// Start the next sector after a terminal outcome has settled. All
    /// transient entity state is discarded; the player respawns at spawn
    /// defaults with the persisted upgrade stats.
    pub fn advance(&mut self) {
        let Some((index, seed)) = self.pending.take() else {
            return;
        };
        self.sector_index = index;
        self.seed = seed;
        let sector = generate_sector(index, seed);
        self.sim = SimState::new(sector, Player::from_upgrades(&self.save.upgrades));
        self.run_time = 0.0;
        self.settled = false;
    }

    /// Take the pending navigation signal, if any (one-shot)
    pub fn take_nav_signal(&mut self) -> Option<NavSignal> {
        self.nav.take()
    }

    /// Spend cores on an upgrade; persists on success
    pub fn try_purchase(&mut self, cost: u32, apply: impl FnOnce(&mut UpgradeLevels)) -> bool {
        if self.save.credits < cost {
            return false;
        }
        self.save.credits -= cost;
        apply(&mut self.save.upgrades);
        self.store.store(&self.save);
        true
    }

    pub fn snapshot(&self) -> HudSnapshot {
        HudSnapshot {
            sector: self.sector_index,
            credits: self.save.credits,
            best_sector: self.save.best_sector,
            health_pct: self.sim.player.health_pct(),
            energy_pct: self.sim.player.energy_pct(),
            shield: self.sim.player.shield,
            time_scale: self.sim.player.time_scale,
            alive: self.sim.player.health > 0.0,
            phase: self.sim.phase,
        }
    }

    pub fn sim(&self) -> &SimState {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut SimState {
        &mut self.sim
    }

    pub fn save(&self) -> &SaveRecord {
        &self.save
    }

    pub fn sector_index(&self) -> u32 {
        self.sector_index
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn run_time(&self) -> f64 {
        self.run_time
    }
}

fn fresh_seed() -> u32 {
    rand::random::<u32>()
}

fn timestamp_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or_default()
}
