//! Integration tests for the deform + composite pipeline

mod fixtures;

use std::sync::Arc;

use inkform_engine::deform::{Knob, ModelDeformer, ProportionKnobs};
use inkform_engine::surface::{Decal, DecalHistory, DecalParams, Surface};
use inkform_engine::texture::{Invert, RemoveBackground, TextureApply, TextureBuffer};
use inkform_engine::body::classify;
use inkform_engine::estimate;

#[test]
fn test_humanoid_landmarks_are_anatomical() {
    let parts = fixtures::humanoid_parts();
    let deformer = ModelDeformer::new(parts);
    let lm = deformer.landmarks();

    assert!(lm.has_head);
    assert!(lm.knee_level < lm.hip_level);
    assert!(lm.hip_level <= lm.torso_bottom);
    assert!(lm.torso_bottom <= lm.shoulder_level);
    assert!(lm.shoulder_level <= lm.head_threshold);
    assert!(lm.left_arm_center.x < lm.center_x);
    assert!(lm.right_arm_center.x > lm.center_x);
    assert!(lm.left_leg_center.x < lm.center_x);
    assert!(lm.right_leg_center.x > lm.center_x);
}

#[test]
fn test_default_knobs_reproduce_import() {
    let parts = fixtures::humanoid_parts();
    let deformer = ModelDeformer::new(parts.clone());
    let deformed = deformer.deformed_parts(&ProportionKnobs::default());
    assert_eq!(deformed, parts);
}

#[test]
fn test_knobs_change_only_positions() {
    let parts = fixtures::humanoid_parts();
    let deformer = ModelDeformer::new(parts.clone());
    let knobs = ProportionKnobs::from_named([
        ("Head Size", 1.3),
        ("Shoulder Width", 1.2),
        ("Hip Width", 0.8),
        ("Leg Length", 1.1),
        ("Arm Thickness", 1.4),
    ])
    .unwrap();
    let deformed = deformer.deformed_parts(&knobs);

    for (d, p) in deformed.iter().zip(&parts) {
        assert_eq!(d.name, p.name);
        assert_eq!(d.indices, p.indices);
        assert_eq!(d.uvs, p.uvs);
        assert!(d.positions.iter().flatten().all(|c| c.is_finite()));
    }
    assert_ne!(deformed, parts);

    // Feet stay on the ground
    let min_y = deformed
        .iter()
        .flat_map(|p| p.positions.iter().map(|q| q[1]))
        .fold(f32::INFINITY, f32::min);
    assert_eq!(min_y, 0.0);

    // Deforming again from the pristine parts gives the same answer
    assert_eq!(deformer.deformed_parts(&knobs), deformed);
}

#[test]
fn test_longer_legs_raise_the_head() {
    let parts = fixtures::humanoid_parts();
    let all: Vec<[f32; 3]> = parts.iter().flat_map(|p| p.positions.clone()).collect();
    let lm = classify(&all);

    let deformer = ModelDeformer::new(parts);
    let knobs = ProportionKnobs::default().with(Knob::LegLength, 1.25);
    let head = deformer.deform(&knobs).pop().unwrap();
    let top = head.iter().map(|p| p[1]).fold(f32::NEG_INFINITY, f32::max);

    let expected = 180.0 + 0.25 * (lm.hip_level - lm.leg_min_y);
    assert!((top - expected).abs() < 1e-3, "top {} expected {}", top, expected);
}

#[test]
fn test_stencil_composited_on_skin() {
    // White backdrop with a black 2x2 mark in the middle
    let mut stencil = TextureBuffer::filled(4, 4, [255, 255, 255, 255]);
    for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
        stencil.set_pixel(x, y, [0, 0, 0, 255]);
    }
    stencil.apply(RemoveBackground::default()).apply(Invert);
    let stencil = Arc::new(stencil);

    let base = TextureBuffer::filled(1, 1, [100, 100, 100, 255]);
    let mut surface = Surface::new();
    assert!(surface.configure(Some(base), 8, 8));

    surface.add_decal(Decal::new(stencil, 0.5, 0.5).unwrap());
    let out = surface.rebuild().unwrap().clone();

    // Inverted mark is white; the keyed-out backdrop leaves the base visible
    assert_eq!(out.get_pixel(3, 3), [255, 255, 255, 255]);
    assert_eq!(out.get_pixel(4, 4), [255, 255, 255, 255]);
    assert_eq!(out.get_pixel(2, 2), [100, 100, 100, 255]);
    assert_eq!(out.get_pixel(0, 0), [100, 100, 100, 255]);

    assert_eq!(surface.rebuild().unwrap(), &out);
}

#[test]
fn test_overlapping_decals_hit_and_undo() {
    let mut surface = Surface::new();
    surface.configure(None, 32, 32);

    let red = Arc::new(TextureBuffer::filled(8, 8, [255, 0, 0, 255]));
    let blue = Arc::new(TextureBuffer::filled(8, 8, [0, 0, 255, 255]));
    surface.add_decal(Decal::new(red, 0.5, 0.5).unwrap());
    surface.add_decal(Decal::new(blue, 0.55, 0.5).unwrap());

    assert_eq!(surface.hit_test(0.52, 0.5), Some(1));
    assert_eq!(surface.composited().unwrap().get_pixel(17, 16), [0, 0, 255, 255]);

    let mut history = DecalHistory::default();
    history.push(surface.delete_selected().unwrap());
    assert_eq!(surface.hit_test(0.52, 0.5), Some(0));
    assert_eq!(surface.composited().unwrap().get_pixel(17, 16), [255, 0, 0, 255]);

    assert_eq!(surface.undo_delete(&mut history), Some(1));
    assert_eq!(surface.composited().unwrap().get_pixel(17, 16), [0, 0, 255, 255]);
}

#[test]
fn test_saved_params_restore_identical_texture() {
    let image = Arc::new(TextureBuffer::filled(6, 3, [20, 160, 90, 200]));
    let mut first = Surface::new();
    first.configure(None, 24, 24);
    first.add_decal(
        Decal::new(image.clone(), 0.3, 0.6)
            .unwrap()
            .with_scale(1.5, 0.75)
            .unwrap()
            .with_rotation(-20.0)
            .with_opacity(0.8),
    );

    let saved: Vec<DecalParams> = first.decals().iter().map(Decal::params).collect();

    let mut second = Surface::new();
    second.configure(None, 24, 24);
    let restored = saved
        .iter()
        .map(|p| Decal::from_params(image.clone(), p))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    second.replace_decals(restored);

    assert_eq!(first.composited(), second.composited());
}

#[test]
fn test_estimate_for_surface_decals() {
    let mut surface = Surface::new();
    surface.configure(None, 64, 64);
    let image = Arc::new(TextureBuffer::filled(100, 50, [0, 0, 0, 255]));
    surface.add_decal(Decal::new(image, 0.5, 0.5).unwrap());

    let est = estimate(surface.decals(), 66.0).unwrap();
    assert_eq!(est.rows.len(), 1);
    assert!(est.rows[0].width_inches > est.rows[0].height_inches);
    assert!(est.total > 100.0);
}
