//! Material library (`.mtl`) lookup

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::types::Material;
use crate::texture::load_texture;

/// Resolve the model's material from its `mtllib` statements
///
/// The first library file that exists wins, even if it defines neither `Kd`
/// nor `map_Kd`. Any failure degrades to [`Material::default`].
pub(crate) fn resolve_material(obj_path: &Path, mtllibs: &[String]) -> Material {
    for name in mtllibs {
        let mtl_path = resolve_sibling(obj_path, name);
        if !mtl_path.exists() {
            tracing::debug!("mtllib {:?} not found", mtl_path);
            continue;
        }
        match parse_mtl(&mtl_path) {
            Ok(material) => return material,
            Err(e) => {
                tracing::warn!("Failed to read material {:?}: {}", mtl_path, e);
                return Material::default();
            }
        }
    }
    Material::default()
}

/// Read the first usable `Kd` and `map_Kd` from a material file
fn parse_mtl(mtl_path: &Path) -> std::io::Result<Material> {
    let reader = BufReader::new(File::open(mtl_path)?);

    let mut color: Option<[u8; 4]> = None;
    let mut map = None;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (keyword, rest) = split_keyword(line);
        if color.is_none() && keyword.eq_ignore_ascii_case("kd") {
            color = parse_kd(rest);
        } else if map.is_none() && keyword.eq_ignore_ascii_case("map_kd") && !rest.is_empty() {
            let texture_path = resolve_sibling(mtl_path, rest);
            if texture_path.exists() {
                match load_texture(&texture_path) {
                    Ok(tex) => map = Some(tex),
                    Err(e) => tracing::warn!("Ignoring diffuse map: {}", e),
                }
            }
        }

        if color.is_some() && map.is_some() {
            break;
        }
    }

    Ok(Material {
        diffuse_color: color.unwrap_or(super::DEFAULT_DIFFUSE),
        diffuse_map: map,
    })
}

fn parse_kd(rest: &str) -> Option<[u8; 4]> {
    let values: Vec<f32> = rest
        .split_whitespace()
        .take(3)
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    if values.len() < 3 {
        return None;
    }
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Some([channel(values[0]), channel(values[1]), channel(values[2]), 255])
}

/// Split `keyword rest of line`, trimming the remainder
pub(crate) fn split_keyword(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    }
}

/// Resolve a path written inside `reference` relative to its directory
fn resolve_sibling(reference: &Path, relative: &str) -> PathBuf {
    match reference.parent() {
        Some(dir) => dir.join(relative),
        None => PathBuf::from(relative),
    }
}
