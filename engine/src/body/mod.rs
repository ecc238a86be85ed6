//! Body region classification
//!
//! Derives landmark heights and limb centroids from a raw vertex cloud. There
//! is no skeleton: every landmark is a statistic of the Y distribution or a
//! mean over the vertices that fall into a region.

use glam::Vec3;

/// Quantile of the Y distribution used for each landmark
pub const HEAD_QUANTILE: f32 = 0.88;
pub const SHOULDER_QUANTILE: f32 = 0.79;
pub const TORSO_BOTTOM_QUANTILE: f32 = 0.42;
pub const HIP_QUANTILE: f32 = 0.35;
pub const KNEE_QUANTILE: f32 = 0.20;

/// Lateral distance from center (as a fraction of width) beyond which a
/// vertex above the knee counts as arm
const ARM_WIDTH_FRACTION: f32 = 0.35;
/// Fallback leg centroid offset (as a fraction of width)
const HIP_WIDTH_FRACTION: f32 = 0.2;

/// Landmarks of one model, computed once from its pristine vertices
///
/// Heights satisfy `knee_level <= hip_level <= torso_bottom <= shoulder_level
/// <= head_threshold`. An empty vertex cloud yields `BodyLandmarks::default()`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyLandmarks {
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    pub center_x: f32,
    pub center_z: f32,

    pub head_threshold: f32,
    pub shoulder_level: f32,
    pub torso_bottom: f32,
    pub hip_level: f32,
    pub knee_level: f32,

    /// Lateral cutoff for arm vertices
    pub arm_threshold: f32,

    pub head_center: Vec3,
    pub left_arm_center: Vec3,
    pub right_arm_center: Vec3,
    pub left_leg_center: Vec3,
    pub right_leg_center: Vec3,

    /// Lowest arm vertex (always below `shoulder_level` for non-empty input)
    pub arm_min_y: f32,
    /// Lowest leg vertex
    pub leg_min_y: f32,
    pub has_head: bool,
    pub vertex_count: usize,
}

impl BodyLandmarks {
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Model height, at least one unit
    pub fn height(&self) -> f32 {
        (self.bounds_max.y - self.bounds_min.y).max(1.0)
    }

    pub fn width(&self) -> f32 {
        self.bounds_max.x - self.bounds_min.x
    }

    pub fn torso_span(&self) -> f32 {
        (self.shoulder_level - self.torso_bottom).max(1.0)
    }

    pub fn arm_span(&self) -> f32 {
        (self.shoulder_level - self.arm_min_y).max(1.0)
    }

    pub fn leg_span(&self) -> f32 {
        (self.hip_level - self.leg_min_y).max(1.0)
    }

    /// Arm membership uses the vertex's original (undeformed) position
    #[inline]
    pub fn is_arm(&self, x: f32, y: f32) -> bool {
        (x - self.center_x).abs() > self.arm_threshold && y > self.knee_level
    }

    /// Arm centroid on the side of `x`
    #[inline]
    pub fn arm_center(&self, x: f32) -> Vec3 {
        if x < self.center_x {
            self.left_arm_center
        } else {
            self.right_arm_center
        }
    }

    /// Leg centroid on the side of `x`
    #[inline]
    pub fn leg_center(&self, x: f32) -> Vec3 {
        if x < self.center_x {
            self.left_leg_center
        } else {
            self.right_leg_center
        }
    }
}

/// Strategy for deriving landmarks from a vertex cloud
///
/// [`QuantileClassifier`] is the statistical default; a rig-aware classifier
/// can be substituted without touching the deformer.
pub trait RegionClassifier {
    fn classify(&self, vertices: &[[f32; 3]]) -> BodyLandmarks;
}

/// Landmarks from fixed quantiles of the vertex heights
#[derive(Clone, Copy, Debug, Default)]
pub struct QuantileClassifier;

impl RegionClassifier for QuantileClassifier {
    fn classify(&self, vertices: &[[f32; 3]]) -> BodyLandmarks {
        classify(vertices)
    }
}

/// Classify with the default [`QuantileClassifier`] rules
pub fn classify(vertices: &[[f32; 3]]) -> BodyLandmarks {
    if vertices.is_empty() {
        return BodyLandmarks::default();
    }

    let mut bounds_min = Vec3::splat(f32::INFINITY);
    let mut bounds_max = Vec3::splat(f32::NEG_INFINITY);
    for &p in vertices {
        let p = Vec3::from(p);
        bounds_min = bounds_min.min(p);
        bounds_max = bounds_max.max(p);
    }
    let center_x = (bounds_min.x + bounds_max.x) * 0.5;
    let center_z = (bounds_min.z + bounds_max.z) * 0.5;

    let mut sorted_y: Vec<f32> = vertices.iter().map(|p| p[1]).collect();
    sorted_y.sort_by(f32::total_cmp);

    // Each landmark is at least the one below it. Knee is the 0.20 quantile
    // and hip the 0.35 quantile, so the knee comes first going up; the
    // running max only matters for pathological input where quantiles tie.
    let knee_level = quantile(&sorted_y, KNEE_QUANTILE);
    let hip_level = quantile(&sorted_y, HIP_QUANTILE).max(knee_level);
    let torso_bottom = quantile(&sorted_y, TORSO_BOTTOM_QUANTILE).max(hip_level);
    let shoulder_level = quantile(&sorted_y, SHOULDER_QUANTILE).max(torso_bottom);
    let head_threshold = quantile(&sorted_y, HEAD_QUANTILE).max(shoulder_level);

    let width = bounds_max.x - bounds_min.x;
    let height = (bounds_max.y - bounds_min.y).max(1.0);
    let arm_threshold = (width * ARM_WIDTH_FRACTION).max(1.0);

    let mut head = Accumulator::default();
    let mut left_arm = Accumulator::default();
    let mut right_arm = Accumulator::default();
    let mut left_leg = Accumulator::default();
    let mut right_leg = Accumulator::default();
    let mut arm_min_y = f32::INFINITY;
    let mut leg_min_y = f32::INFINITY;

    for &p in vertices {
        let [x, y, _] = p;
        let v = Vec3::from(p);

        if y >= head_threshold {
            head.add(v);
        }

        if (x - center_x).abs() > arm_threshold && y > knee_level {
            if x < center_x {
                left_arm.add(v);
            } else {
                right_arm.add(v);
            }
            arm_min_y = arm_min_y.min(y);
        }

        if y <= hip_level {
            if x < center_x {
                left_leg.add(v);
            } else {
                right_leg.add(v);
            }
            leg_min_y = leg_min_y.min(y);
        }
    }

    let arm_fallback = |dx: f32| Vec3::new(center_x + dx, shoulder_level, center_z);
    let hip_offset = (width * HIP_WIDTH_FRACTION).max(1.0);
    let leg_fallback =
        |dx: f32| Vec3::new(center_x + dx, hip_level - height * 0.25, center_z);

    if arm_min_y.is_infinite() {
        arm_min_y = shoulder_level.min(knee_level + height * 0.1);
    }
    if arm_min_y >= shoulder_level {
        arm_min_y = shoulder_level - (height * 0.05).max(1.0);
    }
    if leg_min_y.is_infinite() {
        leg_min_y = bounds_min.y;
    }

    let landmarks = BodyLandmarks {
        bounds_min,
        bounds_max,
        center_x,
        center_z,
        head_threshold,
        shoulder_level,
        torso_bottom,
        hip_level,
        knee_level,
        arm_threshold,
        head_center: head
            .mean()
            .unwrap_or(Vec3::new(center_x, head_threshold, center_z)),
        left_arm_center: left_arm.mean().unwrap_or(arm_fallback(-arm_threshold)),
        right_arm_center: right_arm.mean().unwrap_or(arm_fallback(arm_threshold)),
        left_leg_center: left_leg.mean().unwrap_or(leg_fallback(-hip_offset)),
        right_leg_center: right_leg.mean().unwrap_or(leg_fallback(hip_offset)),
        arm_min_y,
        leg_min_y,
        has_head: head.count > 0,
        vertex_count: vertices.len(),
    };

    tracing::debug!(
        "Landmarks: knee={:.3} hip={:.3} torso={:.3} shoulder={:.3} head={:.3} arm_threshold={:.3}",
        knee_level,
        hip_level,
        torso_bottom,
        shoulder_level,
        head_threshold,
        arm_threshold
    );

    landmarks
}

/// Quantile of an ascending slice, interpolating between the two bracketing
/// samples. `q` is clamped to `[0, 1]`; an empty slice gives 0.
pub fn quantile(sorted: &[f32], q: f32) -> f32 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f32;
            let lo = (pos.floor() as usize).min(n - 1);
            let hi = (lo + 1).min(n - 1);
            let t = pos - lo as f32;
            sorted[lo] + (sorted[hi] - sorted[lo]) * t
        }
    }
}

#[derive(Default)]
struct Accumulator {
    sum: Vec3,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, v: Vec3) {
        self.sum += v;
        self.count += 1;
    }

    fn mean(&self) -> Option<Vec3> {
        (self.count > 0).then(|| self.sum / self.count as f32)
    }
}
