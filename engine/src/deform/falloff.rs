//! Weight curves for region blending

/// Lower bound for any lateral scale factor
pub const MIN_LATERAL_SCALE: f32 = 0.4;
/// Upper bound for any lateral scale factor
pub const MAX_LATERAL_SCALE: f32 = 2.5;

/// Cubic Hermite ramp from 0 at `edge0` to 1 at `edge1`
///
/// When the edges (nearly) coincide this becomes a step at `edge1`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let span = edge1 - edge0;
    if span.abs() < 1e-5 {
        return if x >= edge1 { 1.0 } else { 0.0 };
    }
    let t = ((x - edge0) / span).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Bell-shaped weight, 1 at `center` and 0 at `radius` away or further
#[inline]
pub fn band_weight(y: f32, center: f32, radius: f32) -> f32 {
    let d = (y - center).abs();
    if radius <= 1e-6 || d >= radius {
        return 0.0;
    }
    let t = 1.0 - d / radius;
    let s = t * t * (3.0 - 2.0 * t);
    s * s
}

/// Scale factor for a knob at the given blend weight, clamped to
/// [`MIN_LATERAL_SCALE`, `MAX_LATERAL_SCALE`]
#[inline]
pub fn lateral_scale(knob: f32, weight: f32) -> f32 {
    let s = 1.0 + (knob - 1.0) * weight;
    if s.is_nan() {
        return 1.0;
    }
    s.clamp(MIN_LATERAL_SCALE, MAX_LATERAL_SCALE)
}
