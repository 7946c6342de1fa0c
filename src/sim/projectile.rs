//! Projectiles fired by the player's weapon or by enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Step};
use super::rect::Rect;
use super::sprite::{SpriteCatalog, StripId};

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shooter {
    Player,
    Enemy,
}

/// A shot in flight. Moves in a straight line until it leaves the
/// playfield or hits something.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub body: Body,
    /// Pixels per tick
    pub vel: Vec2,
    pub shooter: Shooter,
}

impl Projectile {
    pub fn new(
        pos: Vec2,
        vel: Vec2,
        strip: StripId,
        shooter: Shooter,
        sprites: &SpriteCatalog,
    ) -> Self {
        let mut body = Body::new(pos, strip, sprites);
        body.mirrored = vel.x < 0.0;
        Self {
            body,
            vel,
            shooter,
        }
    }

    /// Move one tick. Despawns once fully outside `playfield`; for player
    /// shots the caller returns the ammo.
    pub fn update(&mut self, playfield: Rect) -> Step {
        self.body.pos += self.vel;
        if self.body.bounds().intersects(&playfield) {
            Step::Alive
        } else {
            Step::Despawn
        }
    }

    /// A miss by this projectile refunds its weapon
    #[inline]
    pub fn refunds_on_miss(&self) -> bool {
        self.shooter == Shooter::Player
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playfield() -> Rect {
        Rect::from_xywh(0.0, 0.0, 1344.0, 768.0)
    }

    #[test]
    fn test_moves_by_velocity() {
        let sprites = SpriteCatalog::default();
        let mut p = Projectile::new(
            Vec2::new(100.0, 100.0),
            Vec2::new(12.0, 0.0),
            StripId::BulletDefault,
            Shooter::Player,
            &sprites,
        );
        assert_eq!(p.update(playfield()), Step::Alive);
        assert_eq!(p.body.pos, Vec2::new(112.0, 100.0));
    }

    #[test]
    fn test_despawns_off_screen() {
        let sprites = SpriteCatalog::default();
        let mut p = Projectile::new(
            Vec2::new(1340.0, 100.0),
            Vec2::new(12.0, 0.0),
            StripId::BulletDefault,
            Shooter::Player,
            &sprites,
        );
        assert_eq!(p.update(playfield()), Step::Despawn);
        assert!(p.refunds_on_miss());
    }

    #[test]
    fn test_enemy_shots_never_refund() {
        let sprites = SpriteCatalog::default();
        let p = Projectile::new(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 7.0),
            StripId::BulletEnemy,
            Shooter::Enemy,
            &sprites,
        );
        assert!(!p.refunds_on_miss());
        assert!(!p.body.mirrored);
    }
}
