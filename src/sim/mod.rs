//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to [`tick`] is one frame)
//! - Seeded RNG only
//! - Stable iteration order (spawn order within each collection)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod enemy;
pub mod entity;
pub mod obstacle;
pub mod player;
pub mod powerup;
pub mod projectile;
pub mod rect;
pub mod sprite;
pub mod state;
pub mod tick;
pub mod weapon;

pub use collision::{Actor, RESOLUTION_ORDER, Resolution, Victim, policy, resolve_collisions};
pub use enemy::{Enemy, EnemyKind, EnemyState};
pub use entity::{Body, FrameRef, Step};
pub use obstacle::{Obstacle, ObstacleKind};
pub use player::{Facing, Player, PlayerState};
pub use powerup::{PowerUp, PowerUpKind};
pub use projectile::{Projectile, Shooter};
pub use rect::Rect;
pub use sprite::{FrameInfo, FrameStrip, Mask, SpriteCatalog, StripId};
pub use state::{ActiveEffects, GameEvent, GamePhase, GameState, World};
pub use tick::{TickInput, tick};
pub use weapon::{Weapon, WeaponKind};
