//! The player's weapon: magazine, placement and firing

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use super::player::{Facing, PlayerState};
use super::projectile::{Projectile, Shooter};
use super::rect::Rect;
use super::sprite::{SpriteCatalog, StripId};
use super::state::World;
use crate::consts::{MUZZLE_Y, WEAPON_GRIP_Y, WEAPON_SLIDE_INSET};

/// Weapon model. Fixed for the lifetime of a [`Weapon`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    Default,
    Upgrade,
}

impl WeaponKind {
    pub fn strip(self) -> StripId {
        match self {
            WeaponKind::Default => StripId::WeaponDefault,
            WeaponKind::Upgrade => StripId::WeaponUpgrade,
        }
    }

    pub fn bullet_strip(self) -> StripId {
        match self {
            WeaponKind::Default => StripId::BulletDefault,
            WeaponKind::Upgrade => StripId::BulletUpgrade,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    pub body: Body,
    kind: WeaponKind,
    /// Shots left; never exceeds `max_ammo`
    pub ammo: u32,
    pub max_ammo: u32,
    pub shot_speed: f32,
}

impl Weapon {
    /// New weapon held at the grip of a right-facing player
    pub fn new(kind: WeaponKind, player: Rect, world: &World) -> Self {
        let t = &world.tuning;
        let (max_ammo, shot_speed) = match kind {
            WeaponKind::Default => (t.shots_default_weapon, t.shot_speed_default_weapon),
            WeaponKind::Upgrade => (t.shots_upgrade_weapon, t.shot_speed_upgrade_weapon),
        };
        let pos = Vec2::new(player.right(), player.top() + WEAPON_GRIP_Y);
        Self {
            body: Body::new(pos, kind.strip(), &world.sprites),
            kind,
            ammo: max_ammo,
            max_ammo,
            shot_speed,
        }
    }

    #[inline]
    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    /// Snap to the player's hands for the current locomotion state
    pub fn follow(
        &mut self,
        state: PlayerState,
        previous: Option<Facing>,
        player: Rect,
        sprites: &SpriteCatalog,
    ) {
        self.body.set_strip(self.kind.strip(), sprites);
        let facing_left = match state {
            PlayerState::WalkingLeft => true,
            PlayerState::WalkingRight => false,
            PlayerState::Idle | PlayerState::Jumping | PlayerState::Sliding => {
                previous == Some(Facing::Left)
            }
        };
        let w = self.body.size.x;
        let h = self.body.size.y;
        self.body.pos = match (state, facing_left) {
            (PlayerState::Sliding, true) => {
                Vec2::new(player.right() - w - WEAPON_SLIDE_INSET, player.top() - h)
            }
            (PlayerState::Sliding, false) => {
                Vec2::new(player.left() + WEAPON_SLIDE_INSET, player.top() - h)
            }
            (_, true) => Vec2::new(player.left() - w, player.top() + WEAPON_GRIP_Y),
            (_, false) => Vec2::new(player.right(), player.top() + WEAPON_GRIP_Y),
        };
        self.body.mirrored = facing_left;
    }

    /// Fire one shot in the facing direction, if any ammo is left.
    /// Shots against the scroll direction travel faster by the scroll speed.
    pub fn fire(&mut self, world: &World) -> Option<Projectile> {
        if self.ammo == 0 {
            return None;
        }
        self.ammo -= 1;

        let b = self.body.bounds();
        let (x, vx) = if self.body.mirrored {
            (b.left(), -(self.shot_speed + world.scroll_speed))
        } else {
            (b.right(), self.shot_speed)
        };
        Some(Projectile::new(
            Vec2::new(x, b.top() + MUZZLE_Y),
            Vec2::new(vx, 0.0),
            self.kind.bullet_strip(),
            Shooter::Player,
            &world.sprites,
        ))
    }

    /// Return one shot (miss refund or kill reward), capped at `max_ammo`
    pub fn refund(&mut self) {
        self.ammo = (self.ammo + 1).min(self.max_ammo);
    }

    /// Replace the magazine with a full one of `size` shots
    pub fn set_magazine(&mut self, size: u32) {
        self.max_ammo = size;
        self.ammo = size;
    }
}
