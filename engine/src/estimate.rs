//! Price estimate for placed decals

use crate::surface::Decal;

/// Client height (inches) at which drawn pixels map 1:1 onto the scale below
pub const REFERENCE_HEIGHT_INCHES: f64 = 66.0;
/// Square inches per drawn pixel at the reference height
pub const PIXEL_TO_SQUARE_INCH: f64 = 1.0 / 500.0;
pub const BASE_RATE: f64 = 100.0;
pub const RATE_PER_INCH: f64 = 150.0;

const MIN_SIDE_INCHES: f64 = 0.1;
const MIN_BILLED_INCHES: f64 = 0.5;

/// Price breakdown for one decal
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EstimateRow {
    pub width_inches: f64,
    pub height_inches: f64,
    pub price: f64,
}

impl EstimateRow {
    /// Larger of the two sides
    pub fn dominant_inches(&self) -> f64 {
        self.width_inches.max(self.height_inches)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Estimate {
    /// One row per decal, in list order
    pub rows: Vec<EstimateRow>,
    pub total: f64,
}

/// Estimate the price of `decals` on a client of the given height
///
/// Returns `None` when the height is not a positive number.
pub fn estimate(decals: &[Decal], client_height_inches: f64) -> Option<Estimate> {
    if !client_height_inches.is_finite() || client_height_inches <= 0.0 {
        return None;
    }
    let height_scale = (client_height_inches / REFERENCE_HEIGHT_INCHES).clamp(0.5, 1.8);
    let factor = (height_scale * PIXEL_TO_SQUARE_INCH).sqrt();

    let rows: Vec<EstimateRow> = decals
        .iter()
        .map(|decal| {
            let (w, h) = decal.draw_size();
            let width_inches = (w as f64 * factor).max(MIN_SIDE_INCHES);
            let height_inches = (h as f64 * factor).max(MIN_SIDE_INCHES);
            let billed = width_inches.max(height_inches).max(MIN_BILLED_INCHES);
            EstimateRow {
                width_inches,
                height_inches,
                price: BASE_RATE + RATE_PER_INCH * billed,
            }
        })
        .collect();

    let total = rows.iter().map(|r| r.price).sum();
    Some(Estimate { rows, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureBuffer;
    use std::sync::Arc;

    fn decal(w: u32, h: u32) -> Decal {
        Decal::new(Arc::new(TextureBuffer::filled(w, h, [0, 0, 0, 255])), 0.5, 0.5).unwrap()
    }

    #[test]
    fn test_reference_height() {
        // 500 px at scale 1: sqrt(1/500) * 500 = sqrt(500) inches
        let est = estimate(&[decal(500, 250)], 66.0).unwrap();
        let row = est.rows[0];
        assert!((row.width_inches - 500f64.sqrt()).abs() < 1e-9);
        assert!((row.height_inches - 250.0 / 500f64.sqrt()).abs() < 1e-9);
        assert!((row.price - (100.0 + 150.0 * 500f64.sqrt())).abs() < 1e-9);
        assert_eq!(est.total, row.price);
    }

    #[test]
    fn test_small_decal_billed_at_minimum() {
        let est = estimate(&[decal(1, 1)], 66.0).unwrap();
        assert_eq!(est.rows[0].price, 100.0 + 150.0 * 0.5);
        assert!(est.rows[0].width_inches >= 0.1);
    }

    #[test]
    fn test_height_scale_clamped() {
        let tall = estimate(&[decal(100, 100)], 500.0).unwrap();
        let taller = estimate(&[decal(100, 100)], 900.0).unwrap();
        assert_eq!(tall, taller);

        let short = estimate(&[decal(100, 100)], 10.0).unwrap();
        let half = estimate(&[decal(100, 100)], 33.0).unwrap();
        assert_eq!(short, half);
    }

    #[test]
    fn test_total_sums_rows() {
        let est = estimate(&[decal(100, 20), decal(40, 300)], 70.0).unwrap();
        assert_eq!(est.rows.len(), 2);
        assert!((est.total - (est.rows[0].price + est.rows[1].price)).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_height() {
        assert!(estimate(&[], 0.0).is_none());
        assert!(estimate(&[], -3.0).is_none());
        assert!(estimate(&[], f64::NAN).is_none());
        assert_eq!(estimate(&[], 60.0).unwrap().total, 0.0);
    }
}
