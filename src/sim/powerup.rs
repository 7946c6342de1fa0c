//! Collectible power-ups
//!
//! Power-ups drift in with the scroll and fall until they reach the floor
//! band. Collecting one consumes it: [`PowerUp::apply`] takes the value, so
//! an effect can only be applied once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Step};
use super::player::Player;
use super::sprite::StripId;
use super::state::{ActiveEffects, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Invincibility,
    Freeze,
    MultipleShots,
    Shrink,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Invincibility,
        PowerUpKind::Freeze,
        PowerUpKind::MultipleShots,
        PowerUpKind::Shrink,
    ];

    pub fn strip(self) -> StripId {
        match self {
            PowerUpKind::Invincibility => StripId::PowerUpInvincibility,
            PowerUpKind::Freeze => StripId::PowerUpFreeze,
            PowerUpKind::MultipleShots => StripId::PowerUpMultipleShots,
            PowerUpKind::Shrink => StripId::PowerUpShrink,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub body: Body,
    kind: PowerUpKind,
    pub fall_speed: f32,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, pos: Vec2, world: &World) -> Self {
        Self {
            body: Body::new(pos, kind.strip(), &world.sprites),
            kind,
            fall_speed: world.tuning.power_up_fall_speed,
        }
    }

    #[inline]
    pub fn kind(&self) -> PowerUpKind {
        self.kind
    }

    pub fn update(&mut self, world: &World) -> Step {
        self.body.pos.x -= world.scroll_speed;
        if self.body.pos.y <= world.tuning.power_up_floor() {
            self.body.pos.y += self.fall_speed;
        }
        if self.body.pos.x <= -self.body.size.x {
            Step::Despawn
        } else {
            Step::Alive
        }
    }

    /// Consume the power-up and apply its effect
    pub fn apply(
        self,
        player: &mut Player,
        effects: &mut ActiveEffects,
        world: &World,
    ) -> PowerUpKind {
        let t = &world.tuning;
        match self.kind {
            PowerUpKind::Invincibility => player.make_invincible(world),
            PowerUpKind::Freeze => effects.freeze_ticks = t.ticks(t.freeze_time),
            PowerUpKind::MultipleShots => player.weapon.set_magazine(t.multiple_shots),
            PowerUpKind::Shrink => {
                effects.shrink_ticks = t.ticks(t.shrink_time);
                player.scale = t.shrink_factor;
            }
        }
        log::info!("Collected {:?}", self.kind);
        self.kind
    }
}
