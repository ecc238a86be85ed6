//! Imported mesh data

use std::path::PathBuf;

use crate::texture::TextureBuffer;

/// Skin-like diffuse color used when the material gives none (`#f2d0b4`)
pub const DEFAULT_DIFFUSE: [u8; 4] = [0xf2, 0xd0, 0xb4, 0xff];

/// Fraction of faces whose normal must point along Z before the model is
/// flagged as Z-up
pub(crate) const Z_UP_FACE_RATIO: f64 = 0.6;

/// Error type for model import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("OBJ file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("OBJ contained no faces: {0}")]
    NoFaces(PathBuf),
}

/// One named piece of an imported model
#[derive(Clone, Debug, PartialEq)]
pub struct MeshPart {
    /// Name from the `o`/`g` statement (`default` when there was none)
    pub name: String,
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Texture coordinates with V already mirrored, one per position
    pub uvs: Option<Vec<[f32; 2]>>,
    /// Triangle list, three indices per face
    pub indices: Vec<u32>,
}

impl MeshPart {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Copy of this part carrying a different position buffer
    ///
    /// Used to hand deformed geometry to exporters without touching the
    /// pristine import.
    pub fn with_positions(&self, positions: Vec<[f32; 3]>) -> MeshPart {
        debug_assert_eq!(positions.len(), self.positions.len());
        MeshPart {
            name: self.name.clone(),
            positions,
            uvs: self.uvs.clone(),
            indices: self.indices.clone(),
        }
    }
}

/// Diffuse material resolved from `mtllib`
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// RGBA diffuse color (`Kd`), or [`DEFAULT_DIFFUSE`]
    pub diffuse_color: [u8; 4],
    /// Decoded `map_Kd` texture, if one was found and readable
    pub diffuse_map: Option<TextureBuffer>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse_color: DEFAULT_DIFFUSE,
            diffuse_map: None,
        }
    }
}

/// Result of [`load`](super::load)
#[derive(Clone, Debug)]
pub struct LoadedModel {
    /// Parts in order of first appearance
    pub parts: Vec<MeshPart>,
    pub material: Material,
    /// Most faces point along Z; the caller should rotate before classifying
    pub requires_z_up_correction: bool,
}

impl LoadedModel {
    /// True when at least one part carries texture coordinates
    pub fn has_uvs(&self) -> bool {
        self.parts.iter().any(|p| p.uvs.is_some())
    }

    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(MeshPart::vertex_count).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(MeshPart::triangle_count).sum()
    }

    /// Every position of every part, in part order
    pub fn all_positions(&self) -> Vec<[f32; 3]> {
        self.parts
            .iter()
            .flat_map(|p| p.positions.iter().copied())
            .collect()
    }

    /// Rotate a Z-up model to Y-up (`(x, y, z) -> (x, z, -y)`)
    ///
    /// Returns the model unchanged when it was not flagged.
    pub fn corrected_z_up(mut self) -> Self {
        if !self.requires_z_up_correction {
            return self;
        }
        for part in &mut self.parts {
            for p in &mut part.positions {
                *p = [p[0], p[2], -p[1]];
            }
        }
        self.requires_z_up_correction = false;
        self
    }
}
