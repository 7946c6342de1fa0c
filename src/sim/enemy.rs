//! Enemy AI: patrolling drones and chasing robots
//!
//! Both kinds roll for an attack on a fixed period; a roll fires with the
//! configured probability. Drones bomb straight down, robots shoot
//! horizontally at whichever side the player is on.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use super::projectile::{Projectile, Shooter};
use super::sprite::StripId;
use super::state::World;
use crate::consts::{ANIMATION_DIVISOR, ROBOT_MUZZLE_FRACTION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Flies back and forth across the top of the screen
    Drone,
    /// Walks on the ground toward the player
    Robot,
}

impl EnemyKind {
    pub fn strip(self) -> StripId {
        match self {
            EnemyKind::Drone => StripId::Drone,
            EnemyKind::Robot => StripId::Robot,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Idle,
    WalkingLeft,
    WalkingRight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub body: Body,
    kind: EnemyKind,
    pub state: EnemyState,
    pub speed: f32,
    /// Ticks since spawn; an attack is rolled whenever it hits a multiple
    /// of the attack period
    pub attack_timer: u32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2, world: &World) -> Self {
        let speed = match kind {
            EnemyKind::Drone => world.tuning.drone_speed,
            EnemyKind::Robot => world.tuning.robot_speed,
        };
        Self {
            body: Body::new(pos, kind.strip(), &world.sprites),
            kind,
            state: EnemyState::Idle,
            speed,
            attack_timer: 0,
        }
    }

    #[inline]
    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// One tick of movement, attack and animation
    pub fn update(
        &mut self,
        player_x: f32,
        world: &World,
        rng: &mut impl Rng,
    ) -> Option<Projectile> {
        self.handle_movement(player_x, world);
        let shot = self.attack(player_x, world, rng);
        self.body.mirrored = self.state == EnemyState::WalkingLeft;
        self.body
            .advance(world.tuning.player_animation_speed / ANIMATION_DIVISOR, &world.sprites);
        shot
    }

    pub fn handle_movement(&mut self, player_x: f32, world: &World) {
        match self.kind {
            EnemyKind::Drone => self.patrol(world),
            EnemyKind::Robot => self.chase(player_x, world),
        }
    }

    /// Bounce between the screen edges
    fn patrol(&mut self, world: &World) {
        let right_bound = world.width() - self.body.size.x;
        if self.body.pos.x >= right_bound {
            self.state = EnemyState::WalkingLeft;
        } else if self.body.pos.x <= 0.0 {
            self.state = EnemyState::WalkingRight;
        } else if self.state == EnemyState::Idle {
            self.state = EnemyState::WalkingRight;
        }
        let dx = match self.state {
            EnemyState::WalkingLeft => -self.speed,
            EnemyState::WalkingRight => self.speed,
            EnemyState::Idle => 0.0,
        };
        self.body.pos.x = world.clamp_x(self.body.pos.x + dx, self.body.size.x);
    }

    /// Step toward the player's x without overshooting it
    fn chase(&mut self, player_x: f32, world: &World) {
        let x = self.body.pos.x;
        let target = if player_x > x {
            self.state = EnemyState::WalkingRight;
            (x + self.speed).min(player_x)
        } else if player_x < x {
            self.state = EnemyState::WalkingLeft;
            (x - self.speed).max(player_x)
        } else {
            self.state = EnemyState::Idle;
            x
        };
        self.body.pos.x = world.clamp_x(target, self.body.size.x);
    }

    /// Count one tick toward the next attack roll. On a successful roll
    /// returns the projectile to spawn.
    pub fn attack(
        &mut self,
        player_x: f32,
        world: &World,
        rng: &mut impl Rng,
    ) -> Option<Projectile> {
        let t = &world.tuning;
        self.attack_timer = self.attack_timer.wrapping_add(1);
        if self.attack_timer % t.attack_ticks().max(1) != 0 {
            return None;
        }
        if rng.random::<f64>() >= t.attack_probability {
            return None;
        }

        let b = self.body.bounds();
        let shot_size = world.sprites.size(StripId::BulletEnemy);
        let speed = t.enemy_shot_speed;
        let (pos, vel) = match self.kind {
            EnemyKind::Drone => (
                Vec2::new(b.center().x - shot_size.x * 0.5, b.bottom()),
                Vec2::new(0.0, speed),
            ),
            EnemyKind::Robot => {
                let y = b.top() + b.height() * ROBOT_MUZZLE_FRACTION;
                if player_x > b.left() {
                    (Vec2::new(b.right(), y), Vec2::new(speed, 0.0))
                } else {
                    (
                        Vec2::new(b.left() - shot_size.x, y),
                        Vec2::new(-(speed + world.scroll_speed), 0.0),
                    )
                }
            }
        };
        log::debug!("{:?} fired at tick {}", self.kind, self.attack_timer);
        Some(Projectile::new(
            pos,
            vel,
            StripId::BulletEnemy,
            Shooter::Enemy,
            &world.sprites,
        ))
    }
}
