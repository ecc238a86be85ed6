//! Wavefront OBJ import

use hashbrown::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::mtl::{resolve_material, split_keyword};
use super::types::{ImportError, LoadedModel, MeshPart, Z_UP_FACE_RATIO};

const DEFAULT_PART: &str = "default";

/// Load an OBJ file with its material into named mesh parts
///
/// Faces are fan-triangulated, texture V is mirrored (`v' = 1 - v`), and
/// corners sharing a position/texcoord pair are welded into one vertex.
pub fn load(path: &Path) -> Result<LoadedModel, ImportError> {
    if !path.exists() {
        return Err(ImportError::NotFound(path.to_path_buf()));
    }
    let io_err = |source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let reader = BufReader::new(file);

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut mtllibs: Vec<String> = Vec::new();

    let mut parts: Vec<PartBuilder> = Vec::new();
    let mut part_lookup: HashMap<String, usize> = HashMap::new();
    let mut current: Option<usize> = None;
    let mut current_name = DEFAULT_PART.to_string();

    let mut face_count = 0usize;
    let mut z_up_faces = 0usize;
    let mut skipped = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err)?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (keyword, rest) = split_keyword(line);
        match keyword {
            "v" => {
                let mut it = rest.split_whitespace();
                let mut next = || it.next().and_then(|s| s.parse::<f32>().ok()).unwrap_or(0.0);
                positions.push([next(), next(), next()]);
            }
            "vt" => {
                let mut it = rest.split_whitespace();
                let mut next = || it.next().and_then(|s| s.parse::<f32>().ok()).unwrap_or(0.0);
                tex_coords.push([next(), next()]);
            }
            "o" | "g" => {
                current_name = if rest.is_empty() {
                    DEFAULT_PART.to_string()
                } else {
                    rest.to_string()
                };
                current = None;
            }
            "f" => {
                let tokens: Vec<&str> = rest.split_whitespace().collect();
                if tokens.len() < 3 {
                    continue;
                }
                let corners: Option<Vec<Corner>> = tokens
                    .iter()
                    .map(|t| parse_corner(t, positions.len(), tex_coords.len()))
                    .collect();
                let Some(corners) = corners else {
                    tracing::warn!("Skipping face on line {}: bad vertex reference", line_no + 1);
                    skipped += 1;
                    continue;
                };

                if is_z_facing(
                    positions[corners[0].position],
                    positions[corners[1].position],
                    positions[corners[2].position],
                ) {
                    z_up_faces += 1;
                }
                face_count += 1;

                let idx = *current.get_or_insert_with(|| {
                    *part_lookup.entry(current_name.clone()).or_insert_with(|| {
                        parts.push(PartBuilder::new(&current_name));
                        parts.len() - 1
                    })
                });
                parts[idx].add_face(&corners, &positions, &tex_coords);
            }
            "mtllib" if !rest.is_empty() => mtllibs.push(rest.to_string()),
            _ => {}
        }
    }

    if face_count == 0 {
        return Err(ImportError::NoFaces(path.to_path_buf()));
    }

    let parts: Vec<MeshPart> = parts
        .into_iter()
        .map(PartBuilder::finish)
        .filter(|p| !p.indices.is_empty())
        .collect();

    let material = resolve_material(path, &mtllibs);
    let requires_z_up_correction = z_up_faces as f64 > face_count as f64 * Z_UP_FACE_RATIO;

    let model = LoadedModel {
        parts,
        material,
        requires_z_up_correction,
    };

    tracing::info!(
        "Imported {:?}: {} parts, {} vertices, {} triangles, uvs={}, z_up={}",
        path,
        model.parts.len(),
        model.vertex_count(),
        model.triangle_count(),
        model.has_uvs(),
        requires_z_up_correction
    );
    if skipped > 0 {
        tracing::warn!("Skipped {} faces with invalid references", skipped);
    }

    Ok(model)
}

/// One face corner: position index plus optional texcoord index (0-based)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Corner {
    position: usize,
    tex_coord: Option<usize>,
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
///
/// Returns `None` when the position reference is missing or out of range.
/// A bad texcoord reference only drops the texcoord.
fn parse_corner(s: &str, position_count: usize, tex_count: usize) -> Option<Corner> {
    let mut fields = s.split('/');
    let position = resolve_index(fields.next()?, position_count)?;
    let tex_coord = fields
        .next()
        .filter(|f| !f.is_empty())
        .and_then(|f| resolve_index(f, tex_count));
    Some(Corner {
        position,
        tex_coord,
    })
}

/// Resolve a 1-based or negative (relative) OBJ index
fn resolve_index(field: &str, count: usize) -> Option<usize> {
    let raw: i64 = field.parse().ok()?;
    let idx = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        count as i64 + raw
    } else {
        return None;
    };
    (0..count as i64).contains(&idx).then_some(idx as usize)
}

/// Normal of the triangle points more along Z than along X or Y
fn is_z_facing(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> bool {
    let ab = glam::Vec3::from(b) - glam::Vec3::from(a);
    let ac = glam::Vec3::from(c) - glam::Vec3::from(a);
    let n = ab.cross(ac).abs();
    n.z > n.y && n.z > n.x
}

struct PartBuilder {
    name: String,
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    any_uv: bool,
    indices: Vec<u32>,
    welded: HashMap<Corner, u32>,
}

impl PartBuilder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            positions: Vec::new(),
            uvs: Vec::new(),
            any_uv: false,
            indices: Vec::new(),
            welded: HashMap::new(),
        }
    }

    fn add_face(&mut self, corners: &[Corner], positions: &[[f32; 3]], tex_coords: &[[f32; 2]]) {
        // Triangulate (fan from corner 0)
        for i in 1..corners.len() - 1 {
            for &corner in &[corners[0], corners[i], corners[i + 1]] {
                let index = self.vertex(corner, positions, tex_coords);
                self.indices.push(index);
            }
        }
    }

    fn vertex(&mut self, corner: Corner, positions: &[[f32; 3]], tex_coords: &[[f32; 2]]) -> u32 {
        if let Some(&index) = self.welded.get(&corner) {
            return index;
        }
        let index = self.positions.len() as u32;
        self.positions.push(positions[corner.position]);
        let uv = match corner.tex_coord {
            Some(t) => {
                self.any_uv = true;
                let [u, v] = tex_coords[t];
                [u, 1.0 - v]
            }
            None => [0.0, 0.0],
        };
        self.uvs.push(uv);
        self.welded.insert(corner, index);
        index
    }

    fn finish(self) -> MeshPart {
        MeshPart {
            name: self.name,
            positions: self.positions,
            uvs: self.any_uv.then_some(self.uvs),
            indices: self.indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_corner_forms() {
        let c = parse_corner("3", 5, 5).unwrap();
        assert_eq!((c.position, c.tex_coord), (2, None));

        let c = parse_corner("3/2", 5, 5).unwrap();
        assert_eq!((c.position, c.tex_coord), (2, Some(1)));

        let c = parse_corner("3/2/1", 5, 5).unwrap();
        assert_eq!((c.position, c.tex_coord), (2, Some(1)));

        let c = parse_corner("3//1", 5, 5).unwrap();
        assert_eq!((c.position, c.tex_coord), (2, None));
    }

    #[test]
    fn test_negative_indices_are_relative() {
        assert_eq!(resolve_index("-1", 4), Some(3));
        assert_eq!(resolve_index("-4", 4), Some(0));
        assert_eq!(resolve_index("-5", 4), None);
    }

    #[test]
    fn test_out_of_range_position_rejected() {
        assert!(parse_corner("0", 3, 0).is_none());
        assert!(parse_corner("4", 3, 0).is_none());
        assert!(parse_corner("x/1", 3, 1).is_none());
        // Bad texcoord only drops the uv
        let c = parse_corner("1/9", 3, 1).unwrap();
        assert_eq!(c.tex_coord, None);
    }

    #[test]
    fn test_z_facing() {
        // Triangle in the XY plane faces along Z
        assert!(is_z_facing([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]));
        // Triangle in the XZ plane faces along Y
        assert!(!is_z_facing([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_quad_welds_shared_corners() {
        let positions = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
        let tex = vec![[0.0, 0.25]];
        let corners: Vec<Corner> = (0..4)
            .map(|i| Corner {
                position: i,
                tex_coord: Some(0),
            })
            .collect();

        let mut part = PartBuilder::new("quad");
        part.add_face(&corners, &positions, &tex);
        let part = part.finish();

        assert_eq!(part.vertex_count(), 4);
        assert_eq!(part.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(part.uvs.as_ref().unwrap()[0], [0.0, 0.75]);
    }
}
