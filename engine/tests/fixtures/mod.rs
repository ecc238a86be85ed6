//! Test assets written to temp directories

#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::Path;

use inkform_engine::mesh::MeshPart;

/// Unit cube: 8 positions, 4 texcoords spanning the unit square, 6 quads
pub fn write_cube_obj(path: &Path, mtllib: Option<&str>) -> io::Result<()> {
    let mut obj = String::from("# cube\n");
    if let Some(lib) = mtllib {
        obj.push_str(&format!("mtllib {}\n", lib));
    }
    obj.push_str(
        "o cube
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
v 1 0 1
v 1 1 1
v 0 1 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1 4/4 3/3 2/2
f 5/1/1 6/2/1 7/3/1 8/4/1
f 1/1 2/2 6/3 5/4
f 4/1 8/2 7/3 3/4
f 1/1 5/2 8/3 4/4
f 2/1 3/2 7/3 6/4
",
    );
    fs::write(path, obj)
}

/// Box-shaped humanoid as separate parts: legs, torso, arms, head
///
/// Y-up, feet at y=0, top of head at y=180, arms hanging beside the torso.
pub fn humanoid_parts() -> Vec<MeshPart> {
    vec![
        box_part("left_leg", [-14.0, 0.0, -5.0], [-4.0, 85.0, 5.0]),
        box_part("right_leg", [4.0, 0.0, -5.0], [14.0, 85.0, 5.0]),
        box_part("torso", [-18.0, 85.0, -8.0], [18.0, 150.0, 8.0]),
        box_part("left_arm", [-32.0, 80.0, -4.0], [-24.0, 148.0, 4.0]),
        box_part("right_arm", [24.0, 80.0, -4.0], [32.0, 148.0, 4.0]),
        box_part("head", [-8.0, 150.0, -8.0], [8.0, 180.0, 8.0]),
    ]
}

/// Axis-aligned box subdivided along Y so the classifier sees a height
/// distribution, with planar UVs
pub fn box_part(name: &str, min: [f32; 3], max: [f32; 3]) -> MeshPart {
    const RINGS: usize = 12;
    let corners = [
        (min[0], min[2]),
        (max[0], min[2]),
        (max[0], max[2]),
        (min[0], max[2]),
    ];

    let mut positions = Vec::new();
    let mut uvs = Vec::new();
    for ring in 0..=RINGS {
        let t = ring as f32 / RINGS as f32;
        let y = min[1] + (max[1] - min[1]) * t;
        for (i, &(x, z)) in corners.iter().enumerate() {
            positions.push([x, y, z]);
            uvs.push([i as f32 / 4.0, 1.0 - t]);
        }
    }

    let mut indices = Vec::new();
    for ring in 0..RINGS as u32 {
        let base = ring * 4;
        for side in 0..4u32 {
            let a = base + side;
            let b = base + (side + 1) % 4;
            let c = a + 4;
            let d = b + 4;
            indices.extend_from_slice(&[a, b, d, a, d, c]);
        }
    }

    MeshPart {
        name: name.to_string(),
        positions,
        uvs: Some(uvs),
        indices,
    }
}
