//! Skin tones

/// Base color synthesized when the model has no diffuse texture
pub const NEUTRAL_BASE: [u8; 4] = [225, 200, 180, 255];

/// Tone that leaves the base texture unchanged
pub const NO_TINT: [u8; 3] = [255, 255, 255];

/// Selectable skin tones, darkest first
pub const SKIN_TONE_PALETTE: [[u8; 3]; 27] = [
    [110, 66, 24],
    [120, 72, 28],
    [133, 80, 32],
    [146, 90, 36],
    [156, 97, 40],
    [163, 103, 42],
    [170, 108, 45],
    [177, 114, 49],
    [185, 121, 55],
    [193, 128, 60],
    [198, 134, 66],
    [205, 143, 75],
    [213, 153, 85],
    [219, 163, 94],
    [224, 172, 105],
    [229, 178, 111],
    [233, 183, 115],
    [237, 189, 120],
    [241, 194, 125],
    [244, 201, 136],
    [250, 212, 153],
    [255, 219, 172],
    [255, 227, 190],
    [255, 234, 205],
    [255, 237, 211],
    [255, 242, 224],
    [255, 247, 236],
];

/// Index of the palette entry closest to `color` (squared RGB distance).
/// Ties go to the darker entry.
pub fn nearest_skin_tone(color: [u8; 3]) -> usize {
    let mut best = 0;
    let mut best_dist = u32::MAX;
    for (i, tone) in SKIN_TONE_PALETTE.iter().enumerate() {
        let dist: u32 = (0..3)
            .map(|c| {
                let d = tone[c] as i32 - color[c] as i32;
                (d * d) as u32
            })
            .sum();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}
