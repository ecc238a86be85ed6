//! Software rasterization for the compositor
//!
//! Pixel `(x, y)` samples at its center `(x + 0.5, y + 0.5)`. A decal covers
//! a sample when the sample's un-rotated local offset lies in `(-half, +half]`
//! on both axes, and texels are picked nearest-neighbour with the same
//! convention. All math is `f64` so output is reproducible bit for bit.

use super::decal::Decal;
use crate::texture::{TextureApply, TextureBuffer, Tint};

/// Stretch `base` to `width x height` (nearest neighbour), then apply the
/// skin tone as a [`Tint`]
pub(crate) fn draw_base(base: &TextureBuffer, tone: [u8; 3], width: u32, height: u32) -> TextureBuffer {
    let mut out = TextureBuffer::new(width, height);
    if base.is_empty() {
        return out;
    }
    let (bw, bh) = (base.width as u64, base.height as u64);
    let (w, h) = (width as u64, height as u64);
    for y in 0..height {
        let sy = ((2 * y as u64 + 1) * bh / (2 * h)) as u32;
        for x in 0..width {
            let sx = ((2 * x as u64 + 1) * bw / (2 * w)) as u32;
            out.set_pixel(x, y, base.get_pixel(sx, sy));
        }
    }
    out.apply(Tint { color: tone });
    out
}

/// Source-over one decal onto the canvas
pub(crate) fn draw_decal(canvas: &mut TextureBuffer, decal: &Decal) {
    if canvas.is_empty() || decal.opacity() <= 0.0 {
        return;
    }
    let image = decal.image();
    let img_w = image.width as f64;
    let img_h = image.height as f64;

    let cx = decal.u() as f64 * canvas.width as f64;
    let cy = decal.v() as f64 * canvas.height as f64;
    let draw_w = img_w * decal.width_scale() as f64;
    let draw_h = img_h * decal.height_scale() as f64;
    let half_w = draw_w * 0.5;
    let half_h = draw_h * 0.5;

    let (sin, cos) = (decal.rotation_degrees() as f64).to_radians().sin_cos();

    // Bounding box of the rotated rectangle
    let ext_x = cos.abs() * half_w + sin.abs() * half_h;
    let ext_y = sin.abs() * half_w + cos.abs() * half_h;
    let x0 = ((cx - ext_x).floor() - 1.0).max(0.0) as u32;
    let y0 = ((cy - ext_y).floor() - 1.0).max(0.0) as u32;
    let x1 = ((cx + ext_x).ceil() + 1.0).min(canvas.width as f64) as u32;
    let y1 = ((cy + ext_y).ceil() + 1.0).min(canvas.height as f64) as u32;

    let opacity = decal.opacity() as f64;

    for py in y0..y1 {
        let dy = py as f64 + 0.5 - cy;
        for px in x0..x1 {
            let dx = px as f64 + 0.5 - cx;
            let lx = cos * dx + sin * dy;
            let ly = -sin * dx + cos * dy;
            if !(lx > -half_w && lx <= half_w && ly > -half_h && ly <= half_h) {
                continue;
            }

            let tx = texel_index(lx + half_w, draw_w, image.width);
            let ty = texel_index(ly + half_h, draw_h, image.height);
            let src = image.get_pixel(tx, ty);
            let src_alpha = src[3] as f64 / 255.0 * opacity;
            if src_alpha <= 0.0 {
                continue;
            }
            blend_over(canvas.pixel_mut(px, py), src, src_alpha);
        }
    }
}

/// Texel for an offset in `(0, extent]` along an axis of `count` texels
#[inline]
fn texel_index(offset: f64, extent: f64, count: u32) -> u32 {
    let t = (offset / extent * count as f64).ceil() as i64 - 1;
    t.clamp(0, count as i64 - 1) as u32
}

/// Straight-alpha source-over
#[inline]
fn blend_over(dst: &mut [u8], src: [u8; 4], src_alpha: f64) {
    let dst_alpha = dst[3] as f64 / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha <= 0.0 {
        return;
    }
    for c in 0..3 {
        let s = src[c] as f64 * src_alpha;
        let d = dst[c] as f64 * dst_alpha * (1.0 - src_alpha);
        dst[c] = ((s + d) / out_alpha).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
}
