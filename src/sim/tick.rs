//! Fixed timestep simulation tick
//!
//! Advances the run by exactly one frame. Order within a tick:
//! player, obstacles, enemies, projectiles, power-ups, spawners, timed
//! effects, then collision resolution.

use glam::Vec2;
use rand::Rng;

use super::collision::resolve_collisions;
use super::enemy::{Enemy, EnemyKind};
use super::entity::Step;
use super::obstacle::{Obstacle, ObstacleKind};
use super::powerup::{PowerUp, PowerUpKind};
use super::sprite::StripId;
use super::state::{GamePhase, GameState};
use crate::consts::DISTANCE_SCALE;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub slide: bool,
    /// Shoot key held (fires on the press edge)
    pub shoot: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start a new run
    pub restart: bool,
    /// Demo mode - AI plays the game
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.restart {
        state.restart();
    }

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        input = autopilot_input(state, &input);
    }
    let input = &input;

    state.time_ticks += 1;
    state.world.halted = state.effects.frozen();

    if let Some(shot) = state.player.update(input, &state.world, &mut state.events) {
        state.projectiles.push(shot);
    }

    let frozen = state.effects.frozen();
    if !frozen {
        advance_world(state);
        update_obstacles(state);
        update_enemies(state);
        update_projectiles(state);
    }
    update_power_ups(state);
    run_spawners(state, frozen);
    tick_effects(state);

    resolve_collisions(state);
}

/// Scroll distance and the periodic speed-up
fn advance_world(state: &mut GameState) {
    let t = &state.world.tuning;
    state.distance += state.world.scroll_speed / DISTANCE_SCALE;

    state.timers.scroll_increase += 1;
    if state.timers.scroll_increase >= t.ticks(t.scroll_speed_increase_interval) {
        state.timers.scroll_increase = 0;
        let speed =
            (state.world.scroll_speed + t.scroll_speed_increase).min(t.max_scrolling_bg_speed);
        if speed != state.world.scroll_speed {
            log::info!("Scroll speed {:.1} -> {:.1}", state.world.scroll_speed, speed);
            state.world.scroll_speed = speed;
        }
    }
}

fn update_obstacles(state: &mut GameState) {
    let world = &state.world;
    state
        .obstacles
        .retain_mut(|o| o.update(world) == Step::Alive);
}

fn update_enemies(state: &mut GameState) {
    let player_x = state.player.body.pos.x;
    let mut shots = Vec::new();
    for enemy in &mut state.enemies {
        if let Some(shot) = enemy.update(player_x, &state.world, &mut state.rng) {
            shots.push(shot);
        }
    }
    state.projectiles.extend(shots);
}

/// Move projectiles; player shots leaving the screen are refunded
fn update_projectiles(state: &mut GameState) {
    let playfield = state.world.playfield();
    let weapon = &mut state.player.weapon;
    state.projectiles.retain_mut(|p| match p.update(playfield) {
        Step::Alive => true,
        Step::Despawn => {
            if p.refunds_on_miss() {
                weapon.refund();
            }
            false
        }
    });
}

fn update_power_ups(state: &mut GameState) {
    let world = &state.world;
    state
        .power_ups
        .retain_mut(|p| p.update(world) == Step::Alive);
}

/// Periodic spawns. Freeze halts obstacle and enemy spawns but not power-ups.
fn run_spawners(state: &mut GameState, frozen: bool) {
    let t = &state.world.tuning;
    let obstacle_period = t.ticks(t.obstacle_spawn_interval);
    let enemy_period = t.ticks(t.enemy_spawn_interval);
    let power_up_period = t.ticks(t.power_up_spawn_interval);

    if !frozen {
        state.timers.obstacle_spawn += 1;
        if state.timers.obstacle_spawn >= obstacle_period {
            state.timers.obstacle_spawn = 0;
            spawn_obstacle(state);
        }

        state.timers.enemy_spawn += 1;
        if state.timers.enemy_spawn >= enemy_period {
            state.timers.enemy_spawn = 0;
            spawn_enemy(state);
        }
    }

    state.timers.power_up_spawn += 1;
    if state.timers.power_up_spawn >= power_up_period {
        state.timers.power_up_spawn = 0;
        spawn_power_up(state);
    }
}

/// Obstacles enter at the right edge on their lane
pub fn spawn_obstacle(state: &mut GameState) {
    let kind = if state.rng.random_bool(0.5) {
        ObstacleKind::Car
    } else {
        ObstacleKind::Meteor
    };
    let t = &state.world.tuning;
    let y = match kind {
        ObstacleKind::Car => t.car_spawn_y,
        ObstacleKind::Meteor => t.meteor_spawn_y,
    };
    let obstacle = Obstacle::new(kind, Vec2::new(state.world.width(), y), &state.world);
    state.obstacles.push(obstacle);
}

/// Robots walk in from the right edge; drones appear over the right half
pub fn spawn_enemy(state: &mut GameState) {
    let kind = if state.rng.random_bool(0.5) {
        EnemyKind::Drone
    } else {
        EnemyKind::Robot
    };
    let t = &state.world.tuning;
    let width = state.world.width();
    let pos = match kind {
        EnemyKind::Robot => {
            let w = state.world.sprites.size(StripId::Robot).x;
            Vec2::new(width - w, t.robot_spawn_y)
        }
        EnemyKind::Drone => {
            let w = state.world.sprites.size(StripId::Drone).x;
            let x = random_x(&mut state.rng, width * 0.5, width - w);
            Vec2::new(x, t.drone_spawn_y)
        }
    };
    let enemy = Enemy::new(kind, pos, &state.world);
    state.enemies.push(enemy);
}

/// Power-ups drop from the top over the right half
pub fn spawn_power_up(state: &mut GameState) {
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let width = state.world.width();
    let w = state.world.sprites.size(kind.strip()).x;
    let x = random_x(&mut state.rng, width * 0.5, width - w);
    let power_up = PowerUp::new(kind, Vec2::new(x, 0.0), &state.world);
    state.power_ups.push(power_up);
}

fn random_x(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max > min { rng.random_range(min..max) } else { min.max(0.0) }
}

/// Count down world-wide effects
fn tick_effects(state: &mut GameState) {
    let effects = &mut state.effects;
    effects.freeze_ticks = effects.freeze_ticks.saturating_sub(1);
    if effects.shrink_ticks > 0 {
        effects.shrink_ticks -= 1;
        if effects.shrink_ticks == 0 {
            state.player.scale = 1.0;
        }
    }
}

/// Simple demo AI: hop cars, slide under meteors, shoot whatever is ahead
pub fn autopilot_input(state: &GameState, held: &TickInput) -> TickInput {
    let player = state.player.body.bounds();
    let ahead = |x: f32| x > player.left() && x - player.right() < 160.0;

    let car_ahead = state
        .obstacles
        .iter()
        .any(|o| o.kind() == ObstacleKind::Car && ahead(o.body.pos.x));
    let meteor_ahead = state
        .obstacles
        .iter()
        .any(|o| o.kind() == ObstacleKind::Meteor && ahead(o.body.pos.x));
    let robot_ahead = state
        .enemies
        .iter()
        .any(|e| e.kind() == EnemyKind::Robot && e.body.pos.x > player.left());

    TickInput {
        right: meteor_ahead || player.left() < state.tuning().player_start_x,
        jump: car_ahead,
        slide: meteor_ahead,
        // Alternate press/release so the edge trigger fires
        shoot: robot_ahead && state.time_ticks % 2 == 0,
        ..held.clone()
    }
}
