//! Sprite frame catalog
//!
//! The simulation never touches pixels. It only needs each animation frame's
//! size (for bounding boxes) and, optionally, an opacity mask for exact
//! collision tests. Image loading lives outside the core and produces this
//! catalog (or the built-in default is used).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Identifies an animation strip. Doubles as the frame reference handed to
/// the renderer together with a frame index.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StripId {
    PlayerIdle = 0,
    PlayerWalk,
    PlayerJump,
    PlayerSlide,
    WeaponDefault,
    WeaponUpgrade,
    BulletDefault,
    BulletUpgrade,
    BulletEnemy,
    Drone,
    Robot,
    Car,
    Meteor,
    PowerUpInvincibility,
    PowerUpFreeze,
    PowerUpMultipleShots,
    PowerUpShrink,
}

/// Per-pixel opacity of one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    pub width: u32,
    pub height: u32,
    /// Row-major opacity, `width * height` entries
    bits: Vec<bool>,
}

impl Mask {
    /// Build from an alpha channel; pixels above `threshold` are solid
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8], threshold: u8) -> Self {
        let len = (width * height) as usize;
        let mut bits: Vec<bool> = alpha.iter().take(len).map(|&a| a > threshold).collect();
        bits.resize(len, false);
        Self { width, height, bits }
    }

    /// Fully opaque mask
    pub fn solid(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Opacity at normalized coordinates (u, v) in [0, 1), optionally mirrored
    pub fn sample(&self, u: f32, v: f32, mirrored: bool) -> bool {
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return false;
        }
        let u = if mirrored { 1.0 - u - f32::EPSILON } else { u };
        let x = ((u * self.width as f32) as u32).min(self.width.saturating_sub(1));
        let y = ((v * self.height as f32) as u32).min(self.height.saturating_sub(1));
        self.bits
            .get((y * self.width + x) as usize)
            .copied()
            .unwrap_or(false)
    }
}

/// One animation frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameInfo {
    pub size: Vec2,
    #[serde(default)]
    pub mask: Option<Mask>,
}

impl FrameInfo {
    pub fn new(w: f32, h: f32) -> Self {
        Self {
            size: Vec2::new(w, h),
            mask: None,
        }
    }
}

/// A non-empty list of frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FrameInfo>", into = "Vec<FrameInfo>")]
pub struct FrameStrip {
    frames: Vec<FrameInfo>,
}

impl TryFrom<Vec<FrameInfo>> for FrameStrip {
    type Error = String;

    fn try_from(frames: Vec<FrameInfo>) -> Result<Self, Self::Error> {
        if frames.is_empty() {
            return Err("animation strip must contain at least one frame".to_string());
        }
        Ok(Self { frames })
    }
}

impl From<FrameStrip> for Vec<FrameInfo> {
    fn from(strip: FrameStrip) -> Self {
        strip.frames
    }
}

impl FrameStrip {
    /// Strip of `count` identical frames
    pub fn uniform(w: f32, h: f32, count: usize) -> Self {
        Self {
            frames: vec![FrameInfo::new(w, h); count.max(1)],
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Frame at `index`, wrapping around the strip
    pub fn frame(&self, index: usize) -> &FrameInfo {
        &self.frames[index % self.frames.len()]
    }

    /// Attach the same mask to every frame
    pub fn with_mask(mut self, mask: Mask) -> Self {
        for frame in &mut self.frames {
            frame.mask = Some(mask.clone());
        }
        self
    }
}

/// Every strip the simulation references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteCatalog {
    pub player_idle: FrameStrip,
    pub player_walk: FrameStrip,
    pub player_jump: FrameStrip,
    pub player_slide: FrameStrip,
    pub weapon_default: FrameStrip,
    pub weapon_upgrade: FrameStrip,
    pub bullet_default: FrameStrip,
    pub bullet_upgrade: FrameStrip,
    pub bullet_enemy: FrameStrip,
    pub drone: FrameStrip,
    pub robot: FrameStrip,
    pub car: FrameStrip,
    pub meteor: FrameStrip,
    pub power_up_invincibility: FrameStrip,
    pub power_up_freeze: FrameStrip,
    pub power_up_multiple_shots: FrameStrip,
    pub power_up_shrink: FrameStrip,
}

impl Default for SpriteCatalog {
    fn default() -> Self {
        Self {
            player_idle: FrameStrip::uniform(50.0, 100.0, 4),
            player_walk: FrameStrip::uniform(50.0, 100.0, 6),
            player_jump: FrameStrip::uniform(50.0, 100.0, 4),
            player_slide: FrameStrip::uniform(90.0, 60.0, 1),
            weapon_default: FrameStrip::uniform(67.0, 22.0, 1),
            weapon_upgrade: FrameStrip::uniform(75.0, 24.0, 1),
            bullet_default: FrameStrip::uniform(12.0, 6.0, 1),
            bullet_upgrade: FrameStrip::uniform(16.0, 8.0, 1),
            bullet_enemy: FrameStrip::uniform(10.0, 10.0, 1),
            drone: FrameStrip::uniform(80.0, 50.0, 4),
            robot: FrameStrip::uniform(60.0, 100.0, 4),
            car: FrameStrip::uniform(150.0, 70.0, 1),
            meteor: FrameStrip::uniform(60.0, 60.0, 4),
            power_up_invincibility: FrameStrip::uniform(40.0, 40.0, 1),
            power_up_freeze: FrameStrip::uniform(40.0, 40.0, 1),
            power_up_multiple_shots: FrameStrip::uniform(40.0, 40.0, 1),
            power_up_shrink: FrameStrip::uniform(40.0, 40.0, 1),
        }
    }
}

impl SpriteCatalog {
    /// Parse a catalog produced by the asset pipeline
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let catalog: SpriteCatalog = serde_json::from_str(json)?;
        Ok(catalog)
    }

    pub fn strip(&self, id: StripId) -> &FrameStrip {
        match id {
            StripId::PlayerIdle => &self.player_idle,
            StripId::PlayerWalk => &self.player_walk,
            StripId::PlayerJump => &self.player_jump,
            StripId::PlayerSlide => &self.player_slide,
            StripId::WeaponDefault => &self.weapon_default,
            StripId::WeaponUpgrade => &self.weapon_upgrade,
            StripId::BulletDefault => &self.bullet_default,
            StripId::BulletUpgrade => &self.bullet_upgrade,
            StripId::BulletEnemy => &self.bullet_enemy,
            StripId::Drone => &self.drone,
            StripId::Robot => &self.robot,
            StripId::Car => &self.car,
            StripId::Meteor => &self.meteor,
            StripId::PowerUpInvincibility => &self.power_up_invincibility,
            StripId::PowerUpFreeze => &self.power_up_freeze,
            StripId::PowerUpMultipleShots => &self.power_up_multiple_shots,
            StripId::PowerUpShrink => &self.power_up_shrink,
        }
    }

    pub fn frame(&self, id: StripId, index: usize) -> &FrameInfo {
        self.strip(id).frame(index)
    }

    /// Size of the first frame of a strip (spawn placement)
    pub fn size(&self, id: StripId) -> Vec2 {
        self.frame(id, 0).size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_strip_rejected() {
        let result: Result<FrameStrip, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_roundtrip_requires_every_strip() {
        let mut value = serde_json::to_value(SpriteCatalog::default()).unwrap();
        assert!(SpriteCatalog::from_json_str(&value.to_string()).is_ok());
        value.as_object_mut().unwrap().remove("robot");
        assert!(SpriteCatalog::from_json_str(&value.to_string()).is_err());
    }

    #[test]
    fn test_frame_wraps() {
        let catalog = SpriteCatalog::default();
        assert_eq!(catalog.strip(StripId::PlayerWalk).len(), 6);
        assert_eq!(catalog.frame(StripId::PlayerWalk, 7).size, Vec2::new(50.0, 100.0));
    }

    #[test]
    fn test_mask_sampling_mirrored() {
        // Left column solid, right column empty
        let mask = Mask::from_alpha(2, 1, &[255, 0], 127);
        assert!(mask.sample(0.25, 0.5, false));
        assert!(!mask.sample(0.75, 0.5, false));
        assert!(!mask.sample(0.25, 0.5, true));
        assert!(mask.sample(0.75, 0.5, true));
        assert!(!mask.sample(1.5, 0.5, false));
    }
}
