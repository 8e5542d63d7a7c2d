//! Save schema and persistence capability
//!
//! The orchestrator consumes persistence as an explicit capability object;
//! no ambient storage is touched mid-tick. Reads are forward-compatible:
//! missing fields fill in schema defaults field-by-field, and a corrupted
//! payload recovers to a fresh default record instead of surfacing an error.

use serde::{Deserialize, Serialize};

use crate::consts::RUN_HISTORY_CAP;

/// Per-upgrade integer levels, bought in the shop (external to the core)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpgradeLevels {
    /// Movement speed and dash recharge
    #[serde(default)]
    pub engine: u32,
    /// Maximum energy and regeneration
    #[serde(default)]
    pub focus: u32,
    /// Weapon damage and fire rate
    #[serde(default)]
    pub arsenal: u32,
    /// Slow-time efficiency and shields
    #[serde(default)]
    pub chrono: u32,
}

/// Descriptor of an interrupted run, kept for exact resume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInProgress {
    pub sector: u32,
    pub seed: u32,
}

/// How a recorded run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Cleared,
    Defeated,
}

/// One archived run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    #[serde(default)]
    pub sector: u32,
    #[serde(default)]
    pub seed: u32,
    /// Elapsed run time in seconds
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub outcome: Outcome,
    /// Unix timestamp (ms)
    #[serde(default)]
    pub timestamp: f64,
}

fn default_sector() -> u32 {
    1
}

/// Complete persisted progression state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Next sector to play
    #[serde(default = "default_sector")]
    pub sector: u32,
    /// Chrono core balance
    #[serde(default)]
    pub credits: u32,
    #[serde(default = "default_sector")]
    pub best_sector: u32,
    #[serde(default)]
    pub current_run: Option<RunInProgress>,
    #[serde(default)]
    pub upgrades: UpgradeLevels,
    /// Bounded archive, deepest and fastest runs first
    #[serde(default)]
    pub runs: Vec<RunRecord>,
}

impl Default for SaveRecord {
    fn default() -> Self {
        Self {
            sector: 1,
            credits: 0,
            best_sector: 1,
            current_run: None,
            upgrades: UpgradeLevels::default(),
            runs: Vec::new(),
        }
    }
}

impl SaveRecord {
    /// Parse a raw payload, recovering to defaults on corruption
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(record) => record,
            Err(err) => {
                log::warn!("save payload unreadable ({err}), starting fresh");
                Self::default()
            }
        }
    }

    /// Append a run to the archive: sort by depth, clears before defeats,
    /// faster first, then trim to the cap
    pub fn append_run(&mut self, entry: RunRecord) {
        self.runs.push(entry);
        self.runs.sort_by(|a, b| {
            b.sector
                .cmp(&a.sector)
                .then_with(|| match (a.outcome, b.outcome) {
                    (Outcome::Cleared, Outcome::Defeated) => std::cmp::Ordering::Less,
                    (Outcome::Defeated, Outcome::Cleared) => std::cmp::Ordering::Greater,
                    _ => std::cmp::Ordering::Equal,
                })
                .then_with(|| {
                    a.time
                        .partial_cmp(&b.time)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });
        self.runs.truncate(RUN_HISTORY_CAP);
    }
}

/// Persistence capability provided to the orchestrator at construction
pub trait SaveStore {
    fn load(&self) -> SaveRecord;
    fn store(&mut self, record: &SaveRecord);
}

/// In-memory store holding the serialized payload. Round-trips through JSON
/// so tests exercise the same schema path as real storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    raw: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an arbitrary payload (for corruption tests)
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { raw: Some(raw.into()) }
    }
}

impl SaveStore for MemoryStore {
    fn load(&self) -> SaveRecord {
        match &self.raw {
            Some(raw) => SaveRecord::from_json(raw),
            None => SaveRecord::default(),
        }
    }

    fn store(&mut self, record: &SaveRecord) {
        match serde_json::to_string(record) {
            Ok(raw) => self.raw = Some(raw),
            Err(err) => log::warn!("save serialize failed: {err}"),
        }
    }
}

/// File-backed JSON store for native hosts
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SaveStore for JsonFileStore {
    fn load(&self) -> SaveRecord {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => SaveRecord::from_json(&raw),
            Err(err) => {
                log::info!("no save at {:?} ({err}), starting fresh", self.path);
                SaveRecord::default()
            }
        }
    }

    fn store(&mut self, record: &SaveRecord) {
        let json = match serde_json::to_string_pretty(record) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("save serialize failed: {err}");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, json) {
            log::warn!("save write to {:?} failed: {err}", self.path);
        }
    }
}
