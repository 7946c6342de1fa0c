//! Cyber Dash - a side-scrolling runner/shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (locomotion, enemies, weapons, collisions)
//! - `game_loop`: Fixed-timestep driver and render handoff
//! - `renderer`: Per-frame sprite snapshot for an external renderer
//! - `persistence`: Key-value save/load boundary
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod game_loop;
pub mod highscores;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod shop;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, PersistenceError, PurchaseError};
pub use game_loop::{GameLoop, RenderSink};
pub use highscores::RunHistory;
pub use settings::AudioSettings;
pub use tuning::Tuning;

/// Game configuration constants that are geometry, not balance
pub mod consts {
    /// Maximum ticks per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Vertical offset of the weapon grip below the player's top edge
    pub const WEAPON_GRIP_Y: f32 = 30.0;
    /// Horizontal inset of the weapon from the player's edge while sliding
    pub const WEAPON_SLIDE_INSET: f32 = 30.0;
    /// Vertical offset of the muzzle below the weapon's top edge
    pub const MUZZLE_Y: f32 = 5.0;

    /// Jump curve: vertical step per tick is `velocity² * JUMP_CURVE`
    pub const JUMP_CURVE: f32 = 0.1;

    /// Robot muzzle height as a fraction of the robot's sprite height
    pub const ROBOT_MUZZLE_FRACTION: f32 = 0.35;

    /// Scrolled pixels per unit of travelled distance
    pub const DISTANCE_SCALE: f32 = 10.0;

    /// Animation cursor advance is `animation_speed / ANIMATION_DIVISOR` per tick
    pub const ANIMATION_DIVISOR: f32 = 100.0;
}

/// Sign of a velocity scalar where zero counts as positive
#[inline]
pub fn sign(value: f32) -> f32 {
    if value >= 0.0 { 1.0 } else { -1.0 }
}

/// Convert a duration in seconds to whole simulation ticks
#[inline]
pub fn seconds_to_ticks(seconds: f32, fps: u32) -> u32 {
    (seconds * fps as f32).round().max(0.0) as u32
}
