//! Scene build: import, deform, composite, export

use anyhow::{Context, Result};
use inkform_engine::deform::ModelDeformer;
use inkform_engine::estimate::{Estimate, estimate};
use inkform_engine::mesh::{self, LoadedModel, write_obj};
use inkform_engine::surface::{Decal, Surface};
use inkform_engine::texture::{
    Invert, ReflectX, RemoveBackground, TextureApply, TextureBuffer, load_texture, write_png,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::scene::{DecalEntry, SceneManifest};

/// Files written by [`build_scene`]
#[derive(Debug)]
pub struct BuildOutput {
    pub mesh_path: PathBuf,
    pub texture_path: PathBuf,
    pub estimate: Option<Estimate>,
}

/// Run the whole scene and write `<stem>.obj` and `<stem>_skin.png`
///
/// `output_override` replaces the manifest's output directory.
pub fn build_scene(
    manifest: &SceneManifest,
    base_dir: &Path,
    output_override: Option<&Path>,
) -> Result<BuildOutput> {
    manifest.validate()?;

    let model_path = base_dir.join(&manifest.model.path);
    let model = load_model(&model_path, manifest.model.correct_z_up)?;

    let deformer = ModelDeformer::new(model.parts.clone());
    let parts = deformer.deformed_parts(&manifest.proportions);
    tracing::debug!("Landmarks: {:?}", deformer.landmarks());

    let out_dir = output_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest.output_dir(base_dir));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let stem = model_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model");

    let mesh_path = out_dir.join(format!("{}.obj", stem));
    write_obj(&parts, &mesh_path)
        .with_context(|| format!("Failed to write mesh: {}", mesh_path.display()))?;

    if !model.has_uvs() && !manifest.decals.is_empty() {
        tracing::warn!(
            "{} has no texture coordinates; decals will not show on the mesh",
            model_path.display()
        );
    }

    let surface = composite(manifest, base_dir, &model)?;
    let texture = surface
        .composited()
        .context("Surface was not configured")?;
    let texture_path = out_dir.join(format!("{}_skin.png", stem));
    write_png(texture, &texture_path)
        .with_context(|| format!("Failed to write texture: {}", texture_path.display()))?;
    tracing::info!(
        "Wrote {}x{} texture with {} decals to {}",
        texture.width,
        texture.height,
        surface.decals().len(),
        texture_path.display()
    );

    let estimate = manifest
        .output
        .client_height
        .and_then(|h| estimate(surface.decals(), h));

    Ok(BuildOutput {
        mesh_path,
        texture_path,
        estimate,
    })
}

/// Import a model, applying the Z-up correction when requested and flagged
pub fn load_model(path: &Path, correct_z_up: bool) -> Result<LoadedModel> {
    let model =
        mesh::load(path).with_context(|| format!("Failed to import model: {}", path.display()))?;
    if model.requires_z_up_correction && correct_z_up {
        tracing::info!("Rotating Z-up model to Y-up");
        return Ok(model.corrected_z_up());
    }
    Ok(model)
}

/// Configure a surface from the scene and paint every decal onto it
pub fn composite(manifest: &SceneManifest, base_dir: &Path, model: &LoadedModel) -> Result<Surface> {
    let base = match &manifest.surface.base_texture {
        Some(path) => {
            let path = base_dir.join(path);
            let tex = load_texture(&path)
                .with_context(|| format!("Failed to load base texture: {}", path.display()))?;
            Some(tex)
        }
        None => model.material.diffuse_map.clone(),
    };

    let mut surface = Surface::new();
    if let Some(tone) = manifest.surface.skin_tone {
        surface.set_skin_tone(tone);
    }
    if !surface.configure(base, manifest.surface.width, manifest.surface.height) {
        anyhow::bail!(
            "Cannot configure a {}x{} surface",
            manifest.surface.width,
            manifest.surface.height
        );
    }

    surface.replace_decals(load_decals(manifest, base_dir)?);
    Ok(surface)
}

/// Load and prepare every decal image named by the scene
pub fn load_decals(manifest: &SceneManifest, base_dir: &Path) -> Result<Vec<Decal>> {
    manifest
        .decals
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let path = base_dir.join(&entry.image);
            let image = load_texture(&path)
                .with_context(|| format!("Failed to load decal image: {}", path.display()))?;
            let image = prepare_image(image, entry);
            Decal::from_params(Arc::new(image), &entry.params)
                .with_context(|| format!("Invalid decals[{}]", i))
        })
        .collect()
}

/// Apply the entry's stencil modifiers in a fixed order
fn prepare_image(mut image: TextureBuffer, entry: &DecalEntry) -> TextureBuffer {
    if entry.remove_background {
        image.apply(RemoveBackground::default());
    }
    if entry.invert {
        image.apply(Invert);
    }
    if entry.reflect {
        image.apply(ReflectX);
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkform_engine::surface::DecalParams;

    fn entry() -> DecalEntry {
        DecalEntry {
            image: "stencil.png".to_string(),
            params: DecalParams::default(),
            remove_background: false,
            invert: false,
            reflect: false,
        }
    }

    fn stencil() -> TextureBuffer {
        let mut tex = TextureBuffer::filled(2, 1, [255, 255, 255, 255]);
        tex.set_pixel(1, 0, [0, 0, 0, 255]);
        tex
    }

    #[test]
    fn test_prepare_without_modifiers() {
        assert_eq!(prepare_image(stencil(), &entry()), stencil());
    }

    #[test]
    fn test_prepare_all_modifiers() {
        let e = DecalEntry {
            remove_background: true,
            invert: true,
            reflect: true,
            ..entry()
        };
        let out = prepare_image(stencil(), &e);
        // Backdrop keyed out, mark inverted to white, then mirrored to the left
        assert_eq!(out.get_pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(1, 0)[3], 0);
    }
}
