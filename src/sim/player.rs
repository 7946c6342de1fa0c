//! Player locomotion
//!
//! The player walks, jumps and slides. Walking clamps to the screen;
//! moving left is also pushed by the scrolling world. Jumps follow a
//! symmetric quadratic arc and land exactly on the height they started
//! from. Slides drop the player low, decay in speed and then stand back up
//! in front of where the slide ended.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use super::projectile::Projectile;
use super::rect::Rect;
use super::sprite::StripId;
use super::state::{GameEvent, World};
use super::tick::TickInput;
use super::weapon::{Weapon, WeaponKind};
use crate::consts::{ANIMATION_DIVISOR, JUMP_CURVE};
use crate::sign;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Locomotion state for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Idle,
    WalkingLeft,
    WalkingRight,
    Jumping,
    Sliding,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: Body,
    pub health: u32,
    pub invincible: bool,
    /// Ticks of invincibility left while `invincible` is set
    pub invincible_ticks: u32,
    pub weapon: Weapon,
    pub state: PlayerState,
    /// Last horizontal walking direction; `None` until the player first walks
    pub previous_walking_state: Option<Facing>,

    pub is_jumping: bool,
    /// Counts down from the jump height through zero to its negation
    pub jump_velocity: i32,
    jump_baseline: Option<f32>,

    pub is_sliding: bool,
    pub slide_speed: f32,
    /// Ticks until another slide may start
    pub slide_cooldown: u32,
    slide_baseline: Option<f32>,
    slide_direction: Option<Facing>,

    /// Shoot is edge-triggered; set while the key is held
    shoot_latched: bool,
    /// Hitbox and render scale (shrink power-up)
    pub scale: f32,
}

impl Player {
    pub fn new(world: &World) -> Self {
        let t = &world.tuning;
        let body = Body::new(
            Vec2::new(t.player_start_x, t.player_start_y),
            StripId::PlayerIdle,
            &world.sprites,
        );
        let weapon = Weapon::new(WeaponKind::Default, body.bounds(), world);
        Self {
            body,
            health: t.initial_player_health,
            invincible: false,
            invincible_ticks: t.invincible_ticks(),
            weapon,
            state: PlayerState::Idle,
            previous_walking_state: None,
            is_jumping: false,
            jump_velocity: t.player_jump_height,
            jump_baseline: None,
            is_sliding: false,
            slide_speed: t.player_speed,
            slide_cooldown: 0,
            slide_baseline: None,
            slide_direction: None,
            // A shoot key held across a restart must be released first
            shoot_latched: true,
            scale: 1.0,
        }
    }

    /// Which way the player (and weapon) points
    pub fn facing(&self) -> Facing {
        match self.state {
            PlayerState::WalkingLeft => Facing::Left,
            PlayerState::WalkingRight => Facing::Right,
            _ => self.previous_walking_state.unwrap_or(Facing::Right),
        }
    }

    /// Collision box, scaled about the feet while shrunk
    pub fn hitbox(&self) -> Rect {
        let bounds = self.body.bounds();
        if self.scale == 1.0 {
            bounds
        } else {
            bounds.scaled_from_bottom(self.scale)
        }
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincible
    }

    /// Start (or refresh) the invincibility window
    pub fn make_invincible(&mut self, world: &World) {
        self.invincible = true;
        self.invincible_ticks = world.tuning.invincible_ticks();
    }

    /// Lose one health point; returns the remaining health
    pub fn take_hit(&mut self) -> u32 {
        self.health = self.health.saturating_sub(1);
        self.health
    }

    /// One tick of player logic. Returns a projectile if a shot was fired.
    pub fn update(
        &mut self,
        input: &TickInput,
        world: &World,
        events: &mut Vec<GameEvent>,
    ) -> Option<Projectile> {
        self.slide_cooldown = self.slide_cooldown.saturating_sub(1);

        let shot = self.handle_input(input, world, events);
        self.jump(input, world);
        self.slide(world);
        self.tick_invincibility(world);
        self.update_animation(world);

        if let Some(facing) = match self.state {
            PlayerState::WalkingLeft => Some(Facing::Left),
            PlayerState::WalkingRight => Some(Facing::Right),
            _ => None,
        } {
            self.previous_walking_state = Some(facing);
        }

        self.weapon.follow(
            self.state,
            self.previous_walking_state,
            self.body.bounds(),
            &world.sprites,
        );
        shot
    }

    fn handle_input(
        &mut self,
        input: &TickInput,
        world: &World,
        events: &mut Vec<GameEvent>,
    ) -> Option<Projectile> {
        match (input.left, input.right, self.is_sliding) {
            (false, true, false) => self.move_right(world),
            (true, false, false) => self.move_left(world),
            _ => self.state = PlayerState::Idle,
        }

        if input.jump {
            if !self.is_jumping && !self.is_sliding {
                self.is_jumping = true;
                events.push(GameEvent::Jumped);
            }
        } else if input.slide
            && (input.left || input.right)
            && !self.is_jumping
            && !self.is_sliding
            && self.slide_cooldown == 0
            && self.previous_walking_state.is_some()
        {
            self.is_sliding = true;
        }

        let mut shot = None;
        if input.shoot {
            if !self.shoot_latched {
                shot = self.weapon.fire(world);
                if shot.is_some() {
                    events.push(GameEvent::Shot);
                }
            }
            self.shoot_latched = true;
        } else {
            self.shoot_latched = false;
        }
        shot
    }

    fn move_left(&mut self, world: &World) {
        self.state = PlayerState::WalkingLeft;
        let step = world.tuning.player_speed + world.drift();
        self.body.pos.x = (self.body.pos.x - step).max(0.0);
    }

    fn move_right(&mut self, world: &World) {
        self.state = PlayerState::WalkingRight;
        let x = self.body.pos.x + world.tuning.player_speed;
        self.body.pos.x = x.min(world.width() - self.body.size.x);
    }

    /// Advance the jump arc by one tick
    fn jump(&mut self, input: &TickInput, world: &World) {
        if !self.is_jumping {
            return;
        }
        self.state = PlayerState::Jumping;
        let baseline = *self.jump_baseline.get_or_insert(self.body.pos.y);

        let v = self.jump_velocity as f32;
        self.body.pos.y -= v * v * JUMP_CURVE * sign(v);
        self.jump_velocity -= 1;

        let height = world.tuning.player_jump_height;
        if self.jump_velocity < -height {
            self.is_jumping = false;
            self.jump_velocity = height;
            self.body.pos.y = baseline;
            self.jump_baseline = None;
        }

        // Facing follows the keys mid-air
        match (input.left, input.right) {
            (true, false) => self.previous_walking_state = Some(Facing::Left),
            (false, true) => self.previous_walking_state = Some(Facing::Right),
            _ => {}
        }
    }

    /// Advance the slide by one tick
    fn slide(&mut self, world: &World) {
        if !self.is_sliding {
            return;
        }
        let t = &world.tuning;
        self.state = PlayerState::Sliding;
        self.body.set_strip(StripId::PlayerSlide, &world.sprites);

        let baseline = *self.slide_baseline.get_or_insert(self.body.pos.y);
        let direction = *self
            .slide_direction
            .get_or_insert(self.previous_walking_state.unwrap_or(Facing::Right));
        self.body.pos.y = baseline + t.player_slide_height;
        self.slide_speed -= t.player_slide_speed_reduction;

        if self.slide_speed > 0.0 {
            let x = match direction {
                Facing::Right => self.body.pos.x + self.slide_speed,
                Facing::Left => self.body.pos.x - (self.slide_speed + world.drift()),
            };
            self.body.pos.x = world.clamp_x(x, self.body.size.x);
            return;
        }

        // Stand back up at the front of the slide
        self.is_sliding = false;
        self.body.pos.y -= t.player_slide_end_position;
        if direction == Facing::Right {
            let idle_width = world.sprites.size(StripId::PlayerIdle).x;
            let x = self.body.pos.x + self.body.size.x - idle_width;
            self.body.pos.x = world.clamp_x(x, idle_width);
        }
        self.slide_speed = t.player_speed;
        self.slide_cooldown = t.player_slide_cooldown_max;
        self.slide_baseline = None;
        self.slide_direction = None;
    }

    fn tick_invincibility(&mut self, world: &World) {
        if !self.invincible {
            return;
        }
        if self.invincible_ticks > 0 {
            self.invincible_ticks -= 1;
        } else {
            self.invincible = false;
            self.invincible_ticks = world.tuning.invincible_ticks();
        }
    }

    fn update_animation(&mut self, world: &World) {
        let strip = match self.state {
            PlayerState::Idle => StripId::PlayerIdle,
            PlayerState::WalkingLeft | PlayerState::WalkingRight => StripId::PlayerWalk,
            PlayerState::Jumping => StripId::PlayerJump,
            PlayerState::Sliding => StripId::PlayerSlide,
        };
        self.body.set_strip(strip, &world.sprites);
        self.body.mirrored = self.facing() == Facing::Left;
        self.body
            .advance(world.tuning.player_animation_speed / ANIMATION_DIVISOR, &world.sprites);
        self.body.pos.x = world.clamp_x(self.body.pos.x, self.body.size.x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Player, World, Vec<GameEvent>) {
        let world = World::default();
        (Player::new(&world), world, Vec::new())
    }

    fn held(left: bool, right: bool) -> TickInput {
        TickInput {
            left,
            right,
            ..Default::default()
        }
    }

    #[test]
    fn test_walk_right_clamps_at_edge() {
        let (mut p, world, mut events) = setup();
        p.body.pos.x = world.width() - 50.0 - 3.0;
        p.update(&held(false, true), &world, &mut events);
        assert_eq!(p.body.pos.x, world.width() - 50.0);
        assert_eq!(p.state, PlayerState::WalkingRight);
        assert_eq!(p.previous_walking_state, Some(Facing::Right));
    }

    #[test]
    fn test_walk_left_includes_scroll() {
        let (mut p, world, mut events) = setup();
        p.update(&held(true, false), &world, &mut events);
        assert_eq!(p.body.pos.x, 100.0 - 8.0 - 4.0);
        p.body.pos.x = 5.0;
        p.update(&held(true, false), &world, &mut events);
        assert_eq!(p.body.pos.x, 0.0);
    }

    #[test]
    fn test_halted_background_gives_no_push() {
        let (mut p, mut world, mut events) = setup();
        world.halted = true;
        p.update(&held(true, false), &world, &mut events);
        assert_eq!(p.body.pos.x, 100.0 - 8.0);
    }

    #[test]
    fn test_both_keys_is_idle() {
        let (mut p, world, mut events) = setup();
        p.update(&held(true, true), &world, &mut events);
        assert_eq!(p.state, PlayerState::Idle);
        assert_eq!(p.body.pos.x, 100.0);
    }

    #[test]
    fn test_jump_returns_to_baseline() {
        let (mut p, world, mut events) = setup();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        p.update(&jump, &world, &mut events);
        assert!(p.is_jumping);
        assert_eq!(events, vec![GameEvent::Jumped]);

        let mut peak = p.body.pos.y;
        let mut ticks = 1;
        while p.is_jumping {
            p.update(&TickInput::default(), &world, &mut events);
            peak = peak.min(p.body.pos.y);
            ticks += 1;
            assert!(ticks < 100, "jump never ended");
        }
        // v runs 20..=-20
        assert_eq!(ticks, 41);
        assert!(peak < 520.0 - 200.0);
        assert_eq!(p.body.pos.y, 520.0);
        assert_eq!(p.jump_velocity, 20);
    }

    #[test]
    fn test_jump_ignored_while_sliding() {
        let (mut p, world, mut events) = setup();
        p.is_sliding = true;
        p.previous_walking_state = Some(Facing::Right);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        p.update(&jump, &world, &mut events);
        assert!(!p.is_jumping);
        assert!(events.is_empty());
    }

    #[test]
    fn test_slide_needs_walking_history_and_direction() {
        let (mut p, world, mut events) = setup();
        let slide_right = TickInput {
            slide: true,
            right: true,
            ..Default::default()
        };
        // No walking history yet: this tick only records the direction
        p.update(&slide_right, &world, &mut events);
        assert!(!p.is_sliding);
        p.update(&slide_right, &world, &mut events);
        assert!(p.is_sliding);

        let (mut p, world, mut events) = setup();
        p.previous_walking_state = Some(Facing::Right);
        let slide_only = TickInput {
            slide: true,
            ..Default::default()
        };
        p.update(&slide_only, &world, &mut events);
        assert!(!p.is_sliding);
    }

    #[test]
    fn test_slide_decays_and_stands_up() {
        let (mut p, world, mut events) = setup();
        p.previous_walking_state = Some(Facing::Right);
        p.is_sliding = true;
        let start_x = p.body.pos.x;

        let mut last_speed = p.slide_speed;
        let mut ticks = 0;
        while p.is_sliding {
            p.update(&TickInput::default(), &world, &mut events);
            assert!(p.slide_speed < last_speed || !p.is_sliding);
            last_speed = p.slide_speed;
            if p.is_sliding {
                assert_eq!(p.body.pos.y, 560.0);
                assert_eq!(p.state, PlayerState::Sliding);
            }
            ticks += 1;
            assert!(ticks < 100);
        }
        // 8.0 / 0.25 = 32 steps, the last one ends the slide
        assert_eq!(ticks, 32);
        assert_eq!(p.body.pos.y, 520.0);
        assert!(p.body.pos.x > start_x);
        assert_eq!(p.slide_speed, 8.0);
        assert_eq!(p.slide_cooldown, 45);
    }

    #[test]
    fn test_slide_cooldown_blocks_new_slide() {
        let (mut p, world, mut events) = setup();
        p.previous_walking_state = Some(Facing::Left);
        p.slide_cooldown = 10;
        let slide = TickInput {
            slide: true,
            left: true,
            ..Default::default()
        };
        p.update(&slide, &world, &mut events);
        assert!(!p.is_sliding);
        assert_eq!(p.slide_cooldown, 9);
    }

    #[test]
    fn test_shoot_is_edge_triggered() {
        let (mut p, world, mut events) = setup();
        let shoot = TickInput {
            shoot: true,
            ..Default::default()
        };
        // Latched at spawn: the first press needs a release
        assert!(p.update(&shoot, &world, &mut events).is_none());
        assert!(p.update(&TickInput::default(), &world, &mut events).is_none());
        assert!(p.update(&shoot, &world, &mut events).is_some());
        assert!(p.update(&shoot, &world, &mut events).is_none());
        assert_eq!(p.weapon.ammo, 2);
        assert_eq!(events, vec![GameEvent::Shot]);
    }

    #[test]
    fn test_invincibility_expires() {
        let (mut p, world, mut events) = setup();
        p.make_invincible(&world);
        for _ in 0..world.tuning.invincible_ticks() {
            p.update(&TickInput::default(), &world, &mut events);
            assert!(p.is_invincible());
        }
        p.update(&TickInput::default(), &world, &mut events);
        assert!(!p.is_invincible());
        assert_eq!(p.invincible_ticks, world.tuning.invincible_ticks());
    }

    #[test]
    fn test_shrunk_hitbox_keeps_feet() {
        let (mut p, _, _) = setup();
        p.scale = 0.25;
        let hitbox = p.hitbox();
        assert_eq!(hitbox.bottom(), p.body.bounds().bottom());
        assert_eq!(hitbox.size, Vec2::new(12.5, 25.0));
    }

    #[test]
    fn test_weapon_follows_facing() {
        let (mut p, world, mut events) = setup();
        p.update(&held(true, false), &world, &mut events);
        assert!(p.weapon.body.mirrored);
        assert_eq!(p.weapon.body.pos.x, p.body.pos.x - 67.0);
        p.update(&TickInput::default(), &world, &mut events);
        assert_eq!(p.state, PlayerState::Idle);
        assert!(p.weapon.body.mirrored);
    }
}
