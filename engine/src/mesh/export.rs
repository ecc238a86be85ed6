//! Write mesh parts back out as OBJ

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::types::MeshPart;

/// Write parts to an OBJ file, one `o` block per part
///
/// Texture V is mirrored back so the file round-trips through [`load`](super::load).
pub fn write_obj(parts: &[MeshPart], path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "# inkform export")?;

    // OBJ indices are global and 1-based
    let mut position_base = 1usize;
    let mut uv_base = 1usize;

    for part in parts {
        writeln!(w, "o {}", part.name)?;
        for [x, y, z] in &part.positions {
            writeln!(w, "v {} {} {}", x, y, z)?;
        }
        if let Some(uvs) = &part.uvs {
            for [u, v] in uvs {
                writeln!(w, "vt {} {}", u, 1.0 - v)?;
            }
        }

        for tri in part.indices.chunks_exact(3) {
            write!(w, "f")?;
            for &i in tri {
                let p = position_base + i as usize;
                if part.uvs.is_some() {
                    write!(w, " {}/{}", p, uv_base + i as usize)?;
                } else {
                    write!(w, " {}", p)?;
                }
            }
            writeln!(w)?;
        }

        position_base += part.positions.len();
        if let Some(uvs) = &part.uvs {
            uv_base += uvs.len();
        }
    }

    w.flush()?;
    tracing::info!("Wrote {} parts to {:?}", parts.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_obj_offsets_second_part() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("out.obj");

        let tri = |name: &str| MeshPart {
            name: name.to_string(),
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            uvs: None,
            indices: vec![0, 1, 2],
        };
        write_obj(&[tri("a"), tri("b")], &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("o a\n"));
        assert!(text.contains("f 1 2 3\n"));
        assert!(text.contains("f 4 5 6\n"));
        assert!(!text.contains("vt"));
    }
}
