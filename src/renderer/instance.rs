//! Per-sprite instance data handed to the renderer

use bytemuck::{Pod, Zeroable};

use crate::sim::Body;

/// Sprite faces left
pub const FLAG_MIRRORED: u32 = 1 << 0;
/// Player is invincible (renderer may blink it)
pub const FLAG_INVINCIBLE: u32 = 1 << 1;
/// World is frozen (renderer may tint it)
pub const FLAG_FROZEN: u32 = 1 << 2;

/// One sprite to draw this frame
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Top-left corner in world pixels
    pub position: [f32; 2],
    /// Unscaled frame size
    pub size: [f32; 2],
    /// `StripId` discriminant
    pub strip: u32,
    pub frame: u32,
    pub flags: u32,
    /// Draw scale about the bottom-centre
    pub scale: f32,
}

impl SpriteInstance {
    pub fn from_body(body: &Body, scale: f32, extra_flags: u32) -> Self {
        let mirrored = if body.mirrored { FLAG_MIRRORED } else { 0 };
        Self {
            position: body.pos.to_array(),
            size: body.size.to_array(),
            strip: body.strip() as u32,
            frame: body.frame_index() as u32,
            flags: mirrored | extra_flags,
            scale,
        }
    }

    #[inline]
    pub fn is_mirrored(&self) -> bool {
        self.flags & FLAG_MIRRORED != 0
    }
}
