//! Proportion deformer
//!
//! Rewrites vertex positions from the pristine buffer on every call. Height is
//! remapped first (arms, legs, torso, then the rigid head/neck shift), then a
//! set of lateral passes scales X/Z around the body center or a limb centroid.
//!
//! Arm membership and the head ramp use the original vertex height. The
//! shoulder, torso, hip and limb weights, and leg membership, use the
//! remapped height, so a width knob acts where the body ends up after the
//! length knobs have stretched it.

mod falloff;
mod knobs;

pub use falloff::{MAX_LATERAL_SCALE, MIN_LATERAL_SCALE, band_weight, lateral_scale, smoothstep};
pub use knobs::{Knob, ProportionKnobs, UnknownKnob};

use glam::Vec3;

use crate::body::{BodyLandmarks, QuantileClassifier, RegionClassifier};
use crate::mesh::MeshPart;

/// Knobs closer than this to 1.0 skip their lateral pass
const KNOB_EPSILON: f32 = 1e-3;

/// Share of the shoulder-width scale that reaches arm vertices
const SHOULDER_ARM_ATTENUATION: f32 = 0.35;
/// Depth (Z) share of each width knob
const SHOULDER_DEPTH: f32 = 0.35;
const TORSO_DEPTH: f32 = 0.5;
const HIP_DEPTH: f32 = 0.45;

/// Deform `original` according to `knobs`
///
/// Pure: the input is never modified. Empty landmarks return an unchanged
/// copy, and all-default knobs reproduce the input exactly.
pub fn deform(
    original: &[[f32; 3]],
    landmarks: &BodyLandmarks,
    knobs: &ProportionKnobs,
) -> Vec<[f32; 3]> {
    if landmarks.is_empty() || knobs.is_identity() {
        return original.to_vec();
    }
    let pass = DeformPass::new(landmarks, knobs);
    original.iter().map(|&p| pass.apply(p)).collect()
}

/// Per-call constants derived from landmarks and knobs
struct DeformPass<'a> {
    lm: &'a BodyLandmarks,
    knobs: &'a ProportionKnobs,
    arm_span: f32,
    torso_delta: f32,
    leg_delta: f32,
    shoulder_radius: f32,
    hip_radius: f32,
}

impl<'a> DeformPass<'a> {
    fn new(lm: &'a BodyLandmarks, knobs: &'a ProportionKnobs) -> Self {
        let height = lm.height();
        Self {
            lm,
            knobs,
            arm_span: lm.arm_span(),
            torso_delta: (knobs.torso_length - 1.0) * (lm.shoulder_level - lm.torso_bottom),
            leg_delta: (knobs.leg_length - 1.0) * (lm.hip_level - lm.leg_min_y),
            shoulder_radius: (0.08 * height).max(0.35 * lm.torso_span()),
            hip_radius: (0.08 * height).max(0.30 * lm.leg_span()),
        }
    }

    fn apply(&self, [x, y, z]: [f32; 3]) -> [f32; 3] {
        let lm = self.lm;
        let k = self.knobs;
        let is_arm = lm.is_arm(x, y);

        let ny = self.remap_height(y, is_arm);
        let is_leg = ny <= lm.hip_level;
        let mut p = Vec3::new(x, ny, z);

        if lm.has_head && y >= lm.head_threshold && active(k.head_size) {
            let w = smoothstep(lm.head_threshold, lm.bounds_max.y, y);
            let s = lateral_scale(k.head_size, w);
            scale_xz(&mut p, lm.head_center, s, s);
        }

        if active(k.shoulder_width) {
            let w = band_weight(ny, lm.shoulder_level, self.shoulder_radius);
            if w > 0.0 {
                let atten = if is_arm { SHOULDER_ARM_ATTENUATION } else { 1.0 };
                let sx = lateral_scale(k.shoulder_width, w * atten);
                let sz = lateral_scale(k.shoulder_width, SHOULDER_DEPTH * w * atten);
                scale_xz(&mut p, self.body_center(), sx, sz);
            }
        }

        if !is_arm && active(k.torso_width) {
            let w = smoothstep(lm.torso_bottom, lm.shoulder_level, ny);
            if w > 0.0 {
                let sx = lateral_scale(k.torso_width, w);
                let sz = lateral_scale(k.torso_width, TORSO_DEPTH * w);
                scale_xz(&mut p, self.body_center(), sx, sz);
            }
        }

        if active(k.hip_width) {
            let w = band_weight(ny, lm.hip_level, self.hip_radius);
            if w > 0.0 {
                let atten = if is_leg {
                    let leg_blend_down = 1.0 - smoothstep(lm.leg_min_y, lm.hip_level, ny);
                    0.5 * (1.0 - 0.7 * leg_blend_down)
                } else {
                    1.0
                };
                let sx = lateral_scale(k.hip_width, w * atten);
                let sz = lateral_scale(k.hip_width, HIP_DEPTH * w * atten);
                scale_xz(&mut p, self.body_center(), sx, sz);
            }
        }

        if is_arm && active(k.arm_thickness) {
            let w = smoothstep(lm.arm_min_y, lm.shoulder_level, ny);
            if w > 0.0 {
                let s = lateral_scale(k.arm_thickness, w);
                scale_xz(&mut p, lm.arm_center(x), s, s);
            }
        }

        // Arms stretched below the hip line thicken with the legs
        if is_leg && active(k.leg_thickness) {
            let w = 1.0 - smoothstep(lm.leg_min_y, lm.hip_level, ny);
            if w > 0.0 {
                let s = lateral_scale(k.leg_thickness, w);
                scale_xz(&mut p, lm.leg_center(x), s, s);
            }
        }

        p.to_array()
    }

    /// Piecewise height remap
    ///
    /// Feet stay planted: legs stretch up from `leg_min_y`, and everything
    /// above the hip rides on the resulting shift. Arms hang from the
    /// shoulder, which itself rides on the torso and leg shifts.
    fn remap_height(&self, y: f32, is_arm: bool) -> f32 {
        let lm = self.lm;
        let k = self.knobs;

        if is_arm {
            if y <= lm.shoulder_level {
                let drop = lm.shoulder_level - y;
                let stretched = if drop <= self.arm_span {
                    drop * k.arm_length
                } else {
                    drop + (k.arm_length - 1.0) * self.arm_span
                };
                return lm.shoulder_level - stretched + self.torso_delta + self.leg_delta;
            }
            return y + self.torso_delta + self.leg_delta;
        }

        if y <= lm.hip_level {
            lm.leg_min_y + (y - lm.leg_min_y) * k.leg_length
        } else if y < lm.torso_bottom {
            y + self.leg_delta
        } else if y <= lm.shoulder_level {
            lm.torso_bottom + (y - lm.torso_bottom) * k.torso_length + self.leg_delta
        } else {
            y + self.torso_delta + self.leg_delta
        }
    }

    fn body_center(&self) -> Vec3 {
        Vec3::new(self.lm.center_x, 0.0, self.lm.center_z)
    }
}

#[inline]
fn active(knob: f32) -> bool {
    (knob - 1.0).abs() >= KNOB_EPSILON
}

#[inline]
fn scale_xz(p: &mut Vec3, center: Vec3, sx: f32, sz: f32) {
    p.x = center.x + (p.x - center.x) * sx;
    p.z = center.z + (p.z - center.z) * sz;
}

/// Holds a model's pristine geometry and landmarks for repeated deformation
///
/// Landmarks are computed once from the union of all parts; each call to
/// [`deform`](Self::deform) starts from the untouched positions.
#[derive(Clone, Debug)]
pub struct ModelDeformer {
    parts: Vec<MeshPart>,
    landmarks: BodyLandmarks,
}

impl ModelDeformer {
    /// Classify with [`QuantileClassifier`]
    pub fn new(parts: Vec<MeshPart>) -> Self {
        Self::with_classifier(parts, &QuantileClassifier)
    }

    pub fn with_classifier<C: RegionClassifier + ?Sized>(parts: Vec<MeshPart>, classifier: &C) -> Self {
        let all: Vec<[f32; 3]> = parts
            .iter()
            .flat_map(|p| p.positions.iter().copied())
            .collect();
        let landmarks = classifier.classify(&all);
        Self { parts, landmarks }
    }

    pub fn landmarks(&self) -> &BodyLandmarks {
        &self.landmarks
    }

    /// Pristine parts as imported
    pub fn parts(&self) -> &[MeshPart] {
        &self.parts
    }

    /// Deformed position buffers, one per part
    pub fn deform(&self, knobs: &ProportionKnobs) -> Vec<Vec<[f32; 3]>> {
        self.parts
            .iter()
            .map(|p| deform(&p.positions, &self.landmarks, knobs))
            .collect()
    }

    /// Deformed copies of every part (names, UVs and indices unchanged)
    pub fn deformed_parts(&self, knobs: &ProportionKnobs) -> Vec<MeshPart> {
        self.parts
            .iter()
            .map(|p| p.with_positions(deform(&p.positions, &self.landmarks, knobs)))
            .collect()
    }
}
