//! Game state and world context
//!
//! [`World`] is the read-mostly context every entity update receives by
//! reference (tunables, sprite sizes, scroll speed). [`GameState`] owns the
//! world plus every live entity collection.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind};
use super::obstacle::Obstacle;
use super::player::Player;
use super::powerup::{PowerUp, PowerUpKind};
use super::projectile::{Projectile, Shooter};
use super::rect::Rect;
use super::sprite::SpriteCatalog;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Player ran out of health
    GameOver,
}

/// Notable things that happened during a tick (sound/HUD hooks).
/// Drained by the caller; the simulation only appends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    Shot,
    PlayerHit { health: u32 },
    EnemyKilled { kind: EnemyKind },
    PowerUpCollected { kind: PowerUpKind },
    GameOver { distance: f32, coins: u64 },
}

/// Shared world context, constructed once and passed by reference
#[derive(Debug, Clone)]
pub struct World {
    pub tuning: Tuning,
    pub sprites: SpriteCatalog,
    /// Current leftward scroll rate (pixels/tick)
    pub scroll_speed: f32,
    /// Background stopped by Freeze this tick
    pub halted: bool,
}

impl World {
    pub fn new(tuning: Tuning, sprites: SpriteCatalog) -> Self {
        let scroll_speed = tuning.scrolling_bg_speed;
        Self {
            tuning,
            sprites,
            scroll_speed,
            halted: false,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.tuning.world_width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.tuning.world_height
    }

    /// Leftward push the moving background adds to the player
    #[inline]
    pub fn drift(&self) -> f32 {
        if self.halted { 0.0 } else { self.scroll_speed }
    }

    /// The visible playfield rectangle
    pub fn playfield(&self) -> Rect {
        Rect::new(Vec2::ZERO, Vec2::new(self.width(), self.height()))
    }

    /// Clamp an x coordinate so an entity of `width` stays on screen
    #[inline]
    pub fn clamp_x(&self, x: f32, width: f32) -> f32 {
        x.min(self.width() - width).max(0.0)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Tuning::default(), SpriteCatalog::default())
    }
}

/// World-wide timed effects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveEffects {
    /// Ticks left with obstacles/enemies/projectiles/background halted
    pub freeze_ticks: u32,
    /// Ticks left with the player shrunk
    pub shrink_ticks: u32,
}

impl ActiveEffects {
    #[inline]
    pub fn frozen(&self) -> bool {
        self.freeze_ticks > 0
    }
}

/// Periodic world timers (ticks elapsed since last firing)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timers {
    pub obstacle_spawn: u32,
    pub enemy_spawn: u32,
    pub power_up_spawn: u32,
    pub scroll_increase: u32,
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Source of every random draw in the simulation
    pub rng: Pcg32,
    pub world: World,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Distance travelled this run
    pub distance: f32,
    /// Coins earned this run
    pub coins: u64,
    pub kills: u32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub power_ups: Vec<PowerUp>,
    pub effects: ActiveEffects,
    pub timers: Timers,
    /// Events since the caller last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// New run with built-in tuning and sprite sizes
    pub fn new(seed: u64) -> Self {
        Self::with_world(seed, World::default())
    }

    /// New run in an explicitly constructed world
    pub fn with_world(seed: u64, world: World) -> Self {
        let player = Player::new(&world);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            world,
            phase: GamePhase::Playing,
            time_ticks: 0,
            distance: 0.0,
            coins: 0,
            kills: 0,
            player,
            obstacles: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            power_ups: Vec::new(),
            effects: ActiveEffects::default(),
            timers: Timers::default(),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn tuning(&self) -> &Tuning {
        &self.world.tuning
    }

    /// Start a fresh run. All transient collections are cleared and the
    /// player reinitialised in one step; call only between ticks. Pending
    /// events stay queued until drained.
    pub fn restart(&mut self) {
        self.obstacles.clear();
        self.enemies.clear();
        self.projectiles.clear();
        self.power_ups.clear();
        self.effects = ActiveEffects::default();
        self.timers = Timers::default();
        self.world.scroll_speed = self.world.tuning.scrolling_bg_speed;
        self.world.halted = false;
        self.distance = 0.0;
        self.coins = 0;
        self.kills = 0;
        self.time_ticks = 0;
        self.player = Player::new(&self.world);
        self.phase = GamePhase::Playing;
        log::info!("Run restarted");
    }

    /// Clear every hazard after a non-fatal hit. In-flight player shots
    /// count as misses and return their ammo.
    pub fn grace_reset(&mut self) {
        let returned = self
            .projectiles
            .iter()
            .filter(|p| p.shooter == Shooter::Player)
            .count();
        for _ in 0..returned {
            self.player.weapon.refund();
        }
        self.obstacles.clear();
        self.enemies.clear();
        self.projectiles.clear();
    }

    /// Transition to GameOver (only the first call has any effect)
    pub fn game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over: distance {:.0}, coins {}, kills {}",
            self.distance,
            self.coins,
            self.kills
        );
        self.events.push(GameEvent::GameOver {
            distance: self.distance,
            coins: self.coins,
        });
    }

    /// Take and clear pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::ObstacleKind;
    use crate::sim::weapon::WeaponKind;

    #[test]
    fn test_new_state() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.health, state.tuning().initial_player_health);
        assert_eq!(state.world.scroll_speed, state.tuning().scrolling_bg_speed);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_restart_clears_everything() {
        let mut state = GameState::new(7);
        let car = Obstacle::new(ObstacleKind::Car, Vec2::new(500.0, 550.0), &state.world);
        state.obstacles.push(car);
        state.power_ups.push(PowerUp::new(
            PowerUpKind::Freeze,
            Vec2::new(600.0, 0.0),
            &state.world,
        ));
        state.player.health = 0;
        state.player.weapon = crate::sim::weapon::Weapon::new(
            WeaponKind::Upgrade,
            state.player.body.bounds(),
            &state.world,
        );
        state.world.scroll_speed = 9.0;
        state.effects.freeze_ticks = 30;
        state.phase = GamePhase::GameOver;

        state.restart();

        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.obstacles.is_empty());
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
        assert!(state.power_ups.is_empty());
        assert_eq!(state.player.health, 1);
        assert_eq!(state.player.weapon.kind(), WeaponKind::Default);
        assert_eq!(state.world.scroll_speed, 4.0);
        assert!(!state.effects.frozen());
    }

    #[test]
    fn test_restart_keeps_undrained_game_over() {
        let mut state = GameState::new(3);
        state.distance = 420.0;
        state.coins = 15;
        state.game_over();
        state.restart();

        assert_eq!(
            state.drain_events(),
            vec![GameEvent::GameOver {
                distance: 420.0,
                coins: 15
            }]
        );
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_game_over_only_once() {
        let mut state = GameState::new(3);
        state.game_over();
        state.game_over();
        let count = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_clamp_x() {
        let world = World::default();
        assert_eq!(world.clamp_x(-5.0, 50.0), 0.0);
        assert_eq!(world.clamp_x(2000.0, 50.0), 1294.0);
        assert_eq!(world.clamp_x(300.0, 50.0), 300.0);
    }
}
