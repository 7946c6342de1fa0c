//! Render handoff
//!
//! The core draws nothing itself. Each frame it flattens the live entities
//! into [`SpriteInstance`]s (back to front) that a renderer can upload as a
//! raw instance buffer.

pub mod instance;

pub use instance::{FLAG_FROZEN, FLAG_INVINCIBLE, FLAG_MIRRORED, SpriteInstance};

use crate::sim::GameState;

/// Snapshot every visible entity, back to front
pub fn snapshot(state: &GameState) -> Vec<SpriteInstance> {
    let frozen = if state.effects.frozen() { FLAG_FROZEN } else { 0 };
    let mut out = Vec::with_capacity(
        state.obstacles.len()
            + state.power_ups.len()
            + state.enemies.len()
            + state.projectiles.len()
            + 2,
    );

    out.extend(
        state
            .obstacles
            .iter()
            .map(|o| SpriteInstance::from_body(&o.body, 1.0, frozen)),
    );
    out.extend(
        state
            .power_ups
            .iter()
            .map(|p| SpriteInstance::from_body(&p.body, 1.0, 0)),
    );
    out.extend(
        state
            .enemies
            .iter()
            .map(|e| SpriteInstance::from_body(&e.body, 1.0, frozen)),
    );
    out.extend(
        state
            .projectiles
            .iter()
            .map(|p| SpriteInstance::from_body(&p.body, 1.0, frozen)),
    );

    let player = &state.player;
    let invincible = if player.is_invincible() { FLAG_INVINCIBLE } else { 0 };
    out.push(SpriteInstance::from_body(&player.body, player.scale, invincible));
    out.push(SpriteInstance::from_body(&player.weapon.body, player.scale, invincible));
    out
}

/// Raw bytes of an instance buffer
pub fn as_bytes(instances: &[SpriteInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
