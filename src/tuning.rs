//! Data-driven game balance
//!
//! Every key is required: a document missing any of them fails to parse and
//! aborts startup. Durations are in seconds and become integer ticks through
//! [`Tuning::ticks`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::seconds_to_ticks;

/// The complete tunable set, injected once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tuning {
    // === World ===
    /// Target simulation rate (ticks per second)
    pub fps: u32,
    pub world_width: f32,
    pub world_height: f32,
    /// Initial world scroll speed (pixels/tick)
    pub scrolling_bg_speed: f32,
    /// Added to the scroll speed every `scroll_speed_increase_interval` seconds
    pub scroll_speed_increase: f32,
    pub scroll_speed_increase_interval: f32,
    pub max_scrolling_bg_speed: f32,

    // === Player ===
    pub initial_player_health: u32,
    pub max_player_health: u32,
    pub player_start_x: f32,
    pub player_start_y: f32,
    /// Walking speed (pixels/tick); also the slide's starting speed
    pub player_speed: f32,
    /// Initial jump velocity counter
    pub player_jump_height: i32,
    /// Vertical drop applied while sliding
    pub player_slide_height: f32,
    /// Slide speed lost per tick
    pub player_slide_speed_reduction: f32,
    /// Vertical lift applied when the slide ends
    pub player_slide_end_position: f32,
    /// Ticks before another slide is allowed
    pub player_slide_cooldown_max: u32,
    pub player_animation_speed: f32,
    /// Invincibility duration (seconds)
    pub invincible_time: f32,

    // === Enemies ===
    pub drone_speed: f32,
    pub robot_speed: f32,
    pub drone_spawn_y: f32,
    pub robot_spawn_y: f32,
    /// Seconds between attack rolls
    pub attack_interval: f32,
    /// Chance that an attack roll fires
    pub attack_probability: f64,
    pub enemy_shot_speed: f32,

    // === Weapons ===
    pub shot_speed_default_weapon: f32,
    pub shot_speed_upgrade_weapon: f32,
    pub shots_default_weapon: u32,
    pub shots_upgrade_weapon: u32,
    /// Magazine size granted by the MultipleShots power-up
    pub multiple_shots: u32,

    // === Power-ups ===
    pub power_up_fall_speed: f32,
    /// Power-ups stop falling once their top passes `world_height - offset`
    pub power_up_floor_offset: f32,
    pub freeze_time: f32,
    pub shrink_time: f32,
    pub shrink_factor: f32,

    // === Obstacles ===
    pub car_speed: f32,
    pub meteor_speed: f32,
    pub car_spawn_y: f32,
    pub meteor_spawn_y: f32,

    // === Spawning (seconds) ===
    pub obstacle_spawn_interval: f32,
    pub enemy_spawn_interval: f32,
    pub power_up_spawn_interval: f32,

    // === Economy ===
    pub coins_per_kill: u64,
    pub extra_life_cost: u64,
    pub weapon_upgrade_cost: u64,

    // === Collision ===
    /// Use per-pixel masks (when the sprite catalog has them) after the box test
    pub pixel_perfect_collisions: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fps: 60,
            world_width: 1344.0,
            world_height: 768.0,
            scrolling_bg_speed: 4.0,
            scroll_speed_increase: 0.5,
            scroll_speed_increase_interval: 20.0,
            max_scrolling_bg_speed: 10.0,

            initial_player_health: 1,
            max_player_health: 2,
            player_start_x: 100.0,
            player_start_y: 520.0,
            player_speed: 8.0,
            player_jump_height: 20,
            player_slide_height: 40.0,
            player_slide_speed_reduction: 0.25,
            player_slide_end_position: 40.0,
            player_slide_cooldown_max: 45,
            player_animation_speed: 15.0,
            invincible_time: 5.0,

            drone_speed: 3.0,
            robot_speed: 2.0,
            drone_spawn_y: 150.0,
            robot_spawn_y: 520.0,
            attack_interval: 1.0,
            attack_probability: 0.3,
            enemy_shot_speed: 7.0,

            shot_speed_default_weapon: 12.0,
            shot_speed_upgrade_weapon: 18.0,
            shots_default_weapon: 3,
            shots_upgrade_weapon: 5,
            multiple_shots: 10,

            power_up_fall_speed: 3.0,
            power_up_floor_offset: 170.0,
            freeze_time: 3.0,
            shrink_time: 6.0,
            shrink_factor: 0.25,

            car_speed: 5.0,
            meteor_speed: 3.0,
            car_spawn_y: 550.0,
            meteor_spawn_y: 485.0,

            obstacle_spawn_interval: 2.5,
            enemy_spawn_interval: 6.0,
            power_up_spawn_interval: 12.0,

            coins_per_kill: 5,
            extra_life_cost: 100,
            weapon_upgrade_cost: 100,

            pixel_perfect_collisions: false,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::invalid("fps", "must be at least 1"));
        }
        if self.world_width <= 0.0 || self.world_height <= 0.0 {
            return Err(ConfigError::invalid("world_width", "world must have positive size"));
        }
        if !(0.0..=1.0).contains(&self.attack_probability) {
            return Err(ConfigError::invalid(
                "attack_probability",
                format!("{} is outside [0, 1]", self.attack_probability),
            ));
        }
        if self.attack_ticks() == 0 {
            return Err(ConfigError::invalid("attack_interval", "must last at least one tick"));
        }
        if self.player_jump_height < 0 {
            return Err(ConfigError::invalid("player_jump_height", "must not be negative"));
        }
        if self.player_slide_speed_reduction <= 0.0 {
            return Err(ConfigError::invalid(
                "player_slide_speed_reduction",
                "must be positive or a slide never ends",
            ));
        }
        if (self.player_slide_end_position - self.player_slide_height).abs() > f32::EPSILON {
            return Err(ConfigError::invalid(
                "player_slide_end_position",
                format!(
                    "{} does not cancel player_slide_height {}",
                    self.player_slide_end_position, self.player_slide_height
                ),
            ));
        }
        if self.initial_player_health == 0 || self.initial_player_health > self.max_player_health {
            return Err(ConfigError::invalid(
                "initial_player_health",
                "must be within 1..=max_player_health",
            ));
        }
        if !(self.shrink_factor > 0.0 && self.shrink_factor <= 1.0) {
            return Err(ConfigError::invalid("shrink_factor", "must be within (0, 1]"));
        }
        for (key, seconds) in [
            ("obstacle_spawn_interval", self.obstacle_spawn_interval),
            ("enemy_spawn_interval", self.enemy_spawn_interval),
            ("power_up_spawn_interval", self.power_up_spawn_interval),
            ("scroll_speed_increase_interval", self.scroll_speed_increase_interval),
        ] {
            if self.ticks(seconds) == 0 {
                return Err(ConfigError::invalid(key, "must last at least one tick"));
            }
        }
        Ok(())
    }

    /// Convert seconds to ticks at the configured frame rate
    #[inline]
    pub fn ticks(&self, seconds: f32) -> u32 {
        seconds_to_ticks(seconds, self.fps)
    }

    /// Ticks between enemy attack rolls
    #[inline]
    pub fn attack_ticks(&self) -> u32 {
        self.ticks(self.attack_interval)
    }

    /// Ticks of invincibility per activation
    #[inline]
    pub fn invincible_ticks(&self) -> u32 {
        self.ticks(self.invincible_time)
    }

    /// Top edge below which power-ups stop falling
    #[inline]
    pub fn power_up_floor(&self) -> f32 {
        self.world_height - self.power_up_floor_offset
    }
}
