//! Deterministic fixed-step sector simulation
//!
//! The simulation is a pure state machine: identical sector, player build,
//! and input sequences produce identical outcomes. Hosts drive it through
//! [`tick::tick`] and read state back for rendering; nothing in here touches
//! storage, the clock, or raw input events.

pub mod collision;
pub mod player;
pub mod state;
pub mod tick;

pub use player::{Player, TimePower};
pub use state::{Effect, EffectKind, Enemy, Projectile, RunPhase, SimState};
pub use tick::{tick, TickInput};
