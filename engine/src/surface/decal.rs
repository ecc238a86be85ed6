//! Placed tattoo decals

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::texture::TextureBuffer;

/// Error type for decal construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecalError {
    #[error("decal scale must be positive and finite, got {width} x {height}")]
    InvalidScale { width: f32, height: f32 },

    #[error("decal image has no pixels ({0}x{1})")]
    EmptyImage(u32, u32),
}

/// Persisted placement of a decal, without its pixels
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecalParams {
    pub u: f32,
    pub v: f32,
    pub width_scale: f32,
    pub height_scale: f32,
    /// Degrees, clockwise on the texture
    pub rotation: f32,
    pub opacity: f32,
}

impl Default for DecalParams {
    fn default() -> Self {
        Self {
            u: 0.5,
            v: 0.5,
            width_scale: 1.0,
            height_scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
        }
    }
}

/// A tattoo image placed on the UV surface
///
/// Immutable: every `with_*` method returns a new decal. The image is shared,
/// so cloning never copies pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Decal {
    image: Arc<TextureBuffer>,
    u: f32,
    v: f32,
    width_scale: f32,
    height_scale: f32,
    rotation_degrees: f32,
    opacity: f32,
}

impl Decal {
    /// Decal at `(u, v)` with unit scale, no rotation and full opacity.
    /// Coordinates are clamped to `[0, 1]`.
    pub fn new(image: Arc<TextureBuffer>, u: f32, v: f32) -> Result<Self, DecalError> {
        if image.is_empty() {
            return Err(DecalError::EmptyImage(image.width, image.height));
        }
        Ok(Self {
            image,
            u: clamp_unit(u),
            v: clamp_unit(v),
            width_scale: 1.0,
            height_scale: 1.0,
            rotation_degrees: 0.0,
            opacity: 1.0,
        })
    }

    /// Rebuild a decal from persisted metadata
    pub fn from_params(image: Arc<TextureBuffer>, params: &DecalParams) -> Result<Self, DecalError> {
        Ok(Self::new(image, params.u, params.v)?
            .with_scale(params.width_scale, params.height_scale)?
            .with_rotation(params.rotation)
            .with_opacity(params.opacity))
    }

    pub fn params(&self) -> DecalParams {
        DecalParams {
            u: self.u,
            v: self.v,
            width_scale: self.width_scale,
            height_scale: self.height_scale,
            rotation: self.rotation_degrees,
            opacity: self.opacity,
        }
    }

    pub fn with_position(&self, u: f32, v: f32) -> Self {
        Self {
            u: clamp_unit(u),
            v: clamp_unit(v),
            ..self.clone()
        }
    }

    pub fn with_scale(&self, width_scale: f32, height_scale: f32) -> Result<Self, DecalError> {
        let valid = |s: f32| s.is_finite() && s > 0.0;
        if !valid(width_scale) || !valid(height_scale) {
            return Err(DecalError::InvalidScale {
                width: width_scale,
                height: height_scale,
            });
        }
        Ok(Self {
            width_scale,
            height_scale,
            ..self.clone()
        })
    }

    pub fn with_uniform_scale(&self, scale: f32) -> Result<Self, DecalError> {
        self.with_scale(scale, scale)
    }

    /// Non-finite angles are treated as 0
    pub fn with_rotation(&self, degrees: f32) -> Self {
        Self {
            rotation_degrees: if degrees.is_finite() { degrees } else { 0.0 },
            ..self.clone()
        }
    }

    pub fn with_opacity(&self, opacity: f32) -> Self {
        Self {
            opacity: if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) },
            ..self.clone()
        }
    }

    pub fn image(&self) -> &Arc<TextureBuffer> {
        &self.image
    }

    pub fn u(&self) -> f32 {
        self.u
    }

    pub fn v(&self) -> f32 {
        self.v
    }

    pub fn width_scale(&self) -> f32 {
        self.width_scale
    }

    pub fn height_scale(&self) -> f32 {
        self.height_scale
    }

    /// Mean of width and height scale
    pub fn scale(&self) -> f32 {
        (self.width_scale + self.height_scale) * 0.5
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Drawn size in pixels (`image size * scale`)
    pub fn draw_size(&self) -> (f32, f32) {
        (
            self.image.width as f32 * self.width_scale,
            self.image.height as f32 * self.height_scale,
        )
    }
}

fn clamp_unit(x: f32) -> f32 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}
