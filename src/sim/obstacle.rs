//! Ground hazards that scroll past faster than the world

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Step};
use super::sprite::StripId;
use super::state::World;
use crate::consts::ANIMATION_DIVISOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Driven along the road; jump over it
    Car,
    /// Rolls at head height; slide under it
    Meteor,
}

impl ObstacleKind {
    pub fn strip(self) -> StripId {
        match self {
            ObstacleKind::Car => StripId::Car,
            ObstacleKind::Meteor => StripId::Meteor,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub body: Body,
    kind: ObstacleKind,
    /// Own speed on top of the world scroll
    pub speed: f32,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, pos: Vec2, world: &World) -> Self {
        let speed = match kind {
            ObstacleKind::Car => world.tuning.car_speed,
            ObstacleKind::Meteor => world.tuning.meteor_speed,
        };
        Self {
            body: Body::new(pos, kind.strip(), &world.sprites),
            kind,
            speed,
        }
    }

    #[inline]
    pub fn kind(&self) -> ObstacleKind {
        self.kind
    }

    pub fn update(&mut self, world: &World) -> Step {
        self.body.pos.x -= world.scroll_speed + self.speed;
        self.body
            .advance(world.tuning.player_animation_speed / ANIMATION_DIVISOR, &world.sprites);
        if self.body.pos.x <= -self.body.size.x {
            Step::Despawn
        } else {
            Step::Alive
        }
    }
}
