//! Shared entity record
//!
//! Every simulated thing (player, weapon, enemies, obstacles, projectiles,
//! power-ups) owns one [`Body`]: a world position plus the animation strip
//! it is currently showing. The bounding box is derived from the active
//! frame, so switching strips or advancing frames updates it automatically.

use glam::Vec2;

use super::rect::Rect;
use super::sprite::{FrameInfo, SpriteCatalog, StripId};

/// Reference to the frame an entity is showing (what the renderer draws)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRef {
    pub strip: StripId,
    pub index: usize,
}

/// Outcome of an entity's per-tick update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Alive,
    /// Left the playfield; remove from its collection
    Despawn,
}

/// Position + animation state of one entity
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Top-left corner in world space
    pub pos: Vec2,
    /// Size of the active frame (cached from the catalog)
    pub size: Vec2,
    strip: StripId,
    /// Fractional animation cursor; the integer part selects the frame
    cursor: f32,
    /// Sprite faces left
    pub mirrored: bool,
}

impl Body {
    pub fn new(pos: Vec2, strip: StripId, sprites: &SpriteCatalog) -> Self {
        Self {
            pos,
            size: sprites.size(strip),
            strip,
            cursor: 0.0,
            mirrored: false,
        }
    }

    /// Bounding box derived from position and active frame
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    #[inline]
    pub fn strip(&self) -> StripId {
        self.strip
    }

    #[inline]
    pub fn frame_index(&self) -> usize {
        self.cursor as usize
    }

    pub fn frame_ref(&self) -> FrameRef {
        FrameRef {
            strip: self.strip,
            index: self.frame_index(),
        }
    }

    pub fn frame<'a>(&self, sprites: &'a SpriteCatalog) -> &'a FrameInfo {
        sprites.frame(self.strip, self.frame_index())
    }

    /// Switch to another strip. The cursor is kept (wrapped into the new
    /// strip) so looping animations don't restart on every state change.
    pub fn set_strip(&mut self, strip: StripId, sprites: &SpriteCatalog) {
        if strip != self.strip {
            self.strip = strip;
            let len = sprites.strip(strip).len() as f32;
            self.cursor %= len;
        }
        self.size = self.frame(sprites).size;
    }

    /// Advance the animation cursor by `step` frames, looping
    pub fn advance(&mut self, step: f32, sprites: &SpriteCatalog) {
        let len = sprites.strip(self.strip).len() as f32;
        self.cursor = (self.cursor + step) % len;
        self.size = self.frame(sprites).size;
    }
}
