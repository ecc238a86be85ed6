//! Integration tests for the inkform binary
//!
//! Writes a small scene to a temp dir, runs the CLI and checks the outputs.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const CUBE_OBJ: &str = "o cube
v -1 0 -1
v 1 0 -1
v 1 2 -1
v -1 2 -1
v -1 0 1
v 1 0 1
v 1 2 1
v -1 2 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 4/4 3/3 2/2
f 5/1 6/2 7/3 8/4
f 1/1 2/2 6/3 5/4
f 4/1 8/2 7/3 3/4
f 1/1 5/2 8/3 4/4
f 2/1 3/2 7/3 6/4
";

fn inkform(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_inkform"))
        .args(args)
        .output()
        .expect("Failed to run inkform")
}

/// Cube model, a 2x2 red stencil on a white backdrop, and a manifest
fn write_scene(dir: &Path, extra: &str) -> std::path::PathBuf {
    fs::write(dir.join("cube.obj"), CUBE_OBJ).expect("Failed to write OBJ");

    let mut stencil = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 255, 255, 255]));
    for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
        stencil.put_pixel(x, y, image::Rgba([200, 0, 0, 255]));
    }
    stencil.save(dir.join("stencil.png")).expect("Failed to write PNG");

    let manifest = dir.join("inkform.toml");
    fs::write(
        &manifest,
        format!(
            r#"
[model]
path = "cube.obj"

[proportions]
leg_length = 1.2

[surface]
width = 8
height = 8

[[decals]]
image = "stencil.png"
remove_background = true
{}
"#,
            extra
        ),
    )
    .expect("Failed to write manifest");
    manifest
}

#[test]
fn test_build_writes_mesh_and_texture() {
    let dir = tempdir().expect("Failed to create temp dir");
    let manifest = write_scene(dir.path(), "");
    let out = dir.path().join("out");

    let result = inkform(&[
        "build",
        manifest.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(result.status.success(), "inkform build failed: {:?}", result);

    let mesh = fs::read_to_string(out.join("cube.obj")).expect("mesh should exist");
    assert!(mesh.contains("o cube"));
    // Corners sharing a position and texcoord are welded: 18 unique pairs
    assert_eq!(mesh.lines().filter(|l| l.starts_with("v ")).count(), 18);

    let skin = image::open(out.join("cube_skin.png"))
        .expect("texture should exist")
        .to_rgba8();
    assert_eq!(skin.dimensions(), (8, 8));
    // Stencil mark lands in the middle; the keyed backdrop shows the neutral skin
    assert_eq!(skin.get_pixel(3, 3).0, [200, 0, 0, 255]);
    assert_eq!(skin.get_pixel(4, 4).0, [200, 0, 0, 255]);
    assert_eq!(skin.get_pixel(2, 2).0, [225, 200, 180, 255]);
    assert_eq!(skin.get_pixel(0, 7).0, [225, 200, 180, 255]);
}

#[test]
fn test_build_uses_manifest_output_dir() {
    let dir = tempdir().expect("Failed to create temp dir");
    let manifest = write_scene(dir.path(), "\n[output]\ndir = \"renders\"\n");

    let result = inkform(&["build", manifest.to_str().unwrap()]);
    assert!(result.status.success(), "inkform build failed: {:?}", result);
    assert!(dir.path().join("renders").join("cube.obj").exists());
    assert!(dir.path().join("renders").join("cube_skin.png").exists());
}

#[test]
fn test_check_reports_missing_files() {
    let dir = tempdir().expect("Failed to create temp dir");
    let manifest = write_scene(dir.path(), "");

    let ok = inkform(&["check", manifest.to_str().unwrap()]);
    assert!(ok.status.success(), "check should pass: {:?}", ok);

    fs::remove_file(dir.path().join("stencil.png")).unwrap();
    let missing = inkform(&["check", manifest.to_str().unwrap()]);
    assert!(!missing.status.success());
}

#[test]
fn test_check_rejects_unknown_knob() {
    let dir = tempdir().expect("Failed to create temp dir");
    let manifest = dir.path().join("inkform.toml");
    fs::write(&manifest, "[model]\npath = \"cube.obj\"\n\n[proportions]\nwingspan = 2.0\n").unwrap();

    let result = inkform(&["check", manifest.to_str().unwrap()]);
    assert!(!result.status.success());
}

#[test]
fn test_estimate_prints_total() {
    let dir = tempdir().expect("Failed to create temp dir");
    let manifest = write_scene(dir.path(), "");

    let result = inkform(&["estimate", manifest.to_str().unwrap(), "--height", "66"]);
    assert!(result.status.success(), "inkform estimate failed: {:?}", result);
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("decal 1:"));
    // One 4 px decal bills at the 0.5 inch minimum
    assert!(stdout.contains("total: $175.00"), "stdout: {}", stdout);

    let no_height = inkform(&["estimate", manifest.to_str().unwrap()]);
    assert!(!no_height.status.success());
}

#[test]
fn test_inspect_lists_parts() {
    let dir = tempdir().expect("Failed to create temp dir");
    write_scene(dir.path(), "");

    let result = inkform(&["inspect", dir.path().join("cube.obj").to_str().unwrap()]);
    assert!(result.status.success(), "inkform inspect failed: {:?}", result);
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("1 parts, 18 vertices, 12 triangles, uvs: yes"), "stdout: {}", stdout);
    assert!(stdout.contains("- cube"));
    assert!(stdout.contains("material: #f2d0b4, map: none"));
}
