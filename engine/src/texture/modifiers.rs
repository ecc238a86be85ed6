//! Texture modifiers for decal preparation
//!
//! Stencil images usually arrive as flat artwork on a solid backdrop. These
//! modifiers clean them up before they are placed on the skin.

use super::TextureBuffer;

/// Trait for texture modifiers
pub trait TextureModifier {
    /// Apply the modification to the texture buffer
    fn apply(&self, buffer: &mut TextureBuffer);
}

/// Extension trait for fluent modifier application
pub trait TextureApply {
    /// Apply a modifier and return self for chaining
    fn apply<M: TextureModifier>(&mut self, modifier: M) -> &mut Self;
}

impl TextureApply for TextureBuffer {
    fn apply<M: TextureModifier>(&mut self, modifier: M) -> &mut Self {
        modifier.apply(self);
        self
    }
}

/// Invert colors (RGB only, alpha unchanged)
pub struct Invert;

impl TextureModifier for Invert {
    fn apply(&self, buffer: &mut TextureBuffer) {
        for pixel in buffer.pixels.chunks_exact_mut(4) {
            pixel[0] = 255 - pixel[0];
            pixel[1] = 255 - pixel[1];
            pixel[2] = 255 - pixel[2];
        }
    }
}

/// Mirror the image left-to-right
pub struct ReflectX;

impl TextureModifier for ReflectX {
    fn apply(&self, buffer: &mut TextureBuffer) {
        let row_len = buffer.width as usize * 4;
        if row_len == 0 {
            return;
        }
        for row in buffer.pixels.chunks_exact_mut(row_len) {
            let width = row.len() / 4;
            for x in 0..width / 2 {
                let mirror = width - 1 - x;
                for c in 0..4 {
                    row.swap(x * 4 + c, mirror * 4 + c);
                }
            }
        }
    }
}

/// Make the backdrop transparent
///
/// The top-left pixel is taken as the backdrop color. Every pixel whose RGB
/// distance to it (channels normalized to 0..1) is below `threshold` keeps its
/// color but loses all opacity.
pub struct RemoveBackground {
    /// Euclidean RGB distance below which a pixel counts as backdrop
    pub threshold: f32,
}

impl Default for RemoveBackground {
    fn default() -> Self {
        Self { threshold: 0.18 }
    }
}

impl TextureModifier for RemoveBackground {
    fn apply(&self, buffer: &mut TextureBuffer) {
        if buffer.is_empty() {
            return;
        }
        let key = buffer.get_pixel(0, 0);
        let limit_sq = self.threshold * self.threshold;
        for pixel in buffer.pixels.chunks_exact_mut(4) {
            let dist_sq: f32 = (0..3)
                .map(|c| {
                    let d = (pixel[c] as f32 - key[c] as f32) / 255.0;
                    d * d
                })
                .sum();
            if dist_sq < limit_sq {
                pixel[3] = 0;
            }
        }
    }
}

/// Multiply RGB channels by a tint color
///
/// White leaves the texture untouched. Alpha is preserved.
pub struct Tint {
    pub color: [u8; 3],
}

impl TextureModifier for Tint {
    fn apply(&self, buffer: &mut TextureBuffer) {
        if self.color == [255, 255, 255] {
            return;
        }
        for pixel in buffer.pixels.chunks_exact_mut(4) {
            for c in 0..3 {
                pixel[c] = multiply_channel(pixel[c], self.color[c]);
            }
        }
    }
}

#[inline]
fn multiply_channel(a: u8, b: u8) -> u8 {
    ((a as u32 * b as u32 + 127) / 255) as u8
}
