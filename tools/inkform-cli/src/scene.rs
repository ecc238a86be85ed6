//! inkform.toml scene manifest parsing
//!
//! A scene names one body model, the proportion knobs to apply, the skin
//! surface setup and the decals to paint on it.

use anyhow::{Context, Result};
use inkform_engine::deform::ProportionKnobs;
use inkform_engine::surface::DecalParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// inkform.toml manifest structure
#[derive(Debug, Deserialize)]
pub struct SceneManifest {
    pub model: ModelSection,
    #[serde(default)]
    pub proportions: ProportionKnobs,
    #[serde(default)]
    pub surface: SurfaceSection,
    #[serde(default)]
    pub decals: Vec<DecalEntry>,
    #[serde(default)]
    pub output: OutputSection,
}

/// Body model section
#[derive(Debug, Deserialize)]
pub struct ModelSection {
    /// OBJ file, relative to the manifest
    pub path: String,

    /// Rotate Z-up models to Y-up when the importer flags them.
    /// Default: true
    #[serde(default = "default_true")]
    pub correct_z_up: bool,
}

fn default_true() -> bool {
    true
}

/// Skin texture section
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SurfaceSection {
    pub width: u32,
    pub height: u32,

    /// RGB multiplied into the base texture. Default: white (no tint)
    pub skin_tone: Option<[u8; 3]>,

    /// Base texture overriding the model's diffuse map
    pub base_texture: Option<String>,
}

impl Default for SurfaceSection {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            skin_tone: None,
            base_texture: None,
        }
    }
}

/// Single decal entry
#[derive(Debug, Deserialize)]
pub struct DecalEntry {
    pub image: String,

    /// Placement keys (`u`, `v`, `width_scale`, `height_scale`, `rotation`,
    /// `opacity`) inline in the entry
    #[serde(flatten)]
    pub params: DecalParams,

    /// Key out the backdrop color (taken from the top-left pixel)
    #[serde(default)]
    pub remove_background: bool,
    #[serde(default)]
    pub invert: bool,
    /// Mirror left-to-right
    #[serde(default)]
    pub reflect: bool,
}

/// Output section
#[derive(Debug, Default, Deserialize)]
pub struct OutputSection {
    /// Output directory, relative to the manifest. Default: "out"
    pub dir: Option<String>,

    /// Client height in inches; when set, `build` prints a price estimate
    pub client_height: Option<f64>,
}

impl SceneManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid manifest: {}", path.display()))
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse inkform.toml")
    }

    /// Validate manifest fields
    pub fn validate(&self) -> Result<()> {
        if self.model.path.trim().is_empty() {
            anyhow::bail!("model.path must not be empty");
        }

        if self.surface.width == 0 || self.surface.height == 0 {
            anyhow::bail!(
                "Invalid surface size {}x{} in inkform.toml (both sides must be at least 1)",
                self.surface.width,
                self.surface.height
            );
        }

        for (knob, value) in self.proportions.iter() {
            if !value.is_finite() || value <= 0.0 {
                anyhow::bail!("Invalid {} {} (must be a positive number)", knob, value);
            }
            if !(0.5..=1.8).contains(&value) {
                tracing::warn!("{} {} is outside the usual range 0.5-1.8", knob, value);
            }
        }

        for (i, decal) in self.decals.iter().enumerate() {
            if decal.image.trim().is_empty() {
                anyhow::bail!("decals[{}].image must not be empty", i);
            }
            let p = &decal.params;
            let scales = [p.width_scale, p.height_scale];
            if scales.iter().any(|s| !s.is_finite() || *s <= 0.0) {
                anyhow::bail!(
                    "Invalid scale {} x {} for decals[{}] (must be positive)",
                    p.width_scale,
                    p.height_scale,
                    i
                );
            }
            if !(0.0..=1.0).contains(&p.u) || !(0.0..=1.0).contains(&p.v) {
                tracing::warn!(
                    "decals[{}] position ({}, {}) will be clamped to the texture",
                    i,
                    p.u,
                    p.v
                );
            }
        }

        if let Some(height) = self.output.client_height {
            if !height.is_finite() || height <= 0.0 {
                anyhow::bail!("Invalid output.client_height {} (must be positive inches)", height);
            }
        }

        Ok(())
    }

    /// Every file the scene reads, resolved against `base_dir`
    pub fn referenced_files(&self, base_dir: &Path) -> Vec<PathBuf> {
        let mut files = vec![base_dir.join(&self.model.path)];
        if let Some(base) = &self.surface.base_texture {
            files.push(base_dir.join(base));
        }
        files.extend(self.decals.iter().map(|d| base_dir.join(&d.image)));
        files
    }

    /// Output directory resolved against `base_dir`
    pub fn output_dir(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(self.output.dir.as_deref().unwrap_or("out"))
    }
}

/// Directory that relative manifest paths are resolved against
pub fn manifest_dir(manifest_path: &Path) -> PathBuf {
    match manifest_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
