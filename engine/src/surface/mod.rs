//! Tattoo compositor
//!
//! A [`Surface`] owns the skin base texture and an ordered list of decals and
//! keeps a composited texture in sync with them. Every mutation rebuilds the
//! composited texture, so [`Surface::composited`] is always current.
//!
//! A surface that was never configured (typically a model without UVs) turns
//! every operation into a no-op; check [`Surface::is_placement_available`].

mod decal;
mod history;
mod raster;
mod skin;

pub use decal::{Decal, DecalError, DecalParams};
pub use history::{DEFAULT_HISTORY_CAPACITY, DecalHistory, RemovedDecal};
pub use skin::{NEUTRAL_BASE, NO_TINT, SKIN_TONE_PALETTE, nearest_skin_tone};

use std::sync::Arc;

use crate::texture::TextureBuffer;

/// Squared normalized distance within which a UV query hits a decal.
/// Slightly larger than the inscribed ellipse so edges are easy to grab.
pub const HIT_TOLERANCE: f32 = 1.15;

/// Configured drawing state
#[derive(Clone, Debug)]
struct Canvas {
    /// Unstretched, untinted base
    template: TextureBuffer,
    /// Base stretched to canvas size with the skin tone applied
    tinted: TextureBuffer,
    composited: TextureBuffer,
}

impl Canvas {
    fn width(&self) -> u32 {
        self.composited.width
    }

    fn height(&self) -> u32 {
        self.composited.height
    }
}

#[derive(Clone, Debug)]
pub struct Surface {
    canvas: Option<Canvas>,
    skin_tone: [u8; 3],
    decals: Vec<Decal>,
    selected: Option<usize>,
    pending: Option<Arc<TextureBuffer>>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// Unconfigured surface with a white (neutral) skin tone
    pub fn new() -> Self {
        Self {
            canvas: None,
            skin_tone: NO_TINT,
            decals: Vec::new(),
            selected: None,
            pending: None,
        }
    }

    /// (Re)initialize the canvas at `width x height` and drop all decals
    ///
    /// Without a base texture a neutral skin color is synthesized. Zero
    /// dimensions are rejected and leave the surface untouched.
    pub fn configure(&mut self, base: Option<TextureBuffer>, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            tracing::warn!("Rejecting surface size {}x{}", width, height);
            return false;
        }
        let template = match base {
            Some(tex) if !tex.is_empty() => tex,
            _ => TextureBuffer::filled(1, 1, NEUTRAL_BASE),
        };
        let tinted = raster::draw_base(&template, self.skin_tone, width, height);
        self.canvas = Some(Canvas {
            template,
            composited: tinted.clone(),
            tinted,
        });
        self.decals.clear();
        self.selected = None;
        tracing::debug!("Configured {}x{} surface", width, height);
        true
    }

    /// Drop the canvas, decals, selection and pending image (model reload)
    pub fn clear(&mut self) {
        self.canvas = None;
        self.decals.clear();
        self.selected = None;
        self.pending = None;
    }

    pub fn is_placement_available(&self) -> bool {
        self.canvas.is_some()
    }

    /// Canvas size, if configured
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.canvas.as_ref().map(|c| (c.width(), c.height()))
    }

    pub fn skin_tone(&self) -> [u8; 3] {
        self.skin_tone
    }

    /// Multiply the base texture by `tone` (white leaves it unchanged)
    pub fn set_skin_tone(&mut self, tone: [u8; 3]) {
        if tone == self.skin_tone {
            return;
        }
        self.skin_tone = tone;
        if let Some(canvas) = &mut self.canvas {
            canvas.tinted =
                raster::draw_base(&canvas.template, tone, canvas.width(), canvas.height());
            self.rebuild();
        }
    }

    /// Tinted base at canvas size
    pub fn base_texture(&self) -> Option<&TextureBuffer> {
        self.canvas.as_ref().map(|c| &c.tinted)
    }

    /// Base plus every decal, as of the last mutation
    pub fn composited(&self) -> Option<&TextureBuffer> {
        self.canvas.as_ref().map(|c| &c.composited)
    }

    /// Redraw the composited texture from the base and the decal list
    ///
    /// Deterministic: the same base, tone and decals give identical bytes.
    pub fn rebuild(&mut self) -> Option<&TextureBuffer> {
        let canvas = self.canvas.as_mut()?;
        canvas.composited.pixels.copy_from_slice(&canvas.tinted.pixels);
        for decal in &self.decals {
            raster::draw_decal(&mut canvas.composited, decal);
        }
        Some(&canvas.composited)
    }

    pub fn decals(&self) -> &[Decal] {
        &self.decals
    }

    pub fn decal(&self, index: usize) -> Option<&Decal> {
        self.decals.get(index)
    }

    /// Append a decal on top and select it
    pub fn add_decal(&mut self, decal: Decal) -> Option<usize> {
        self.insert_decal(usize::MAX, decal)
    }

    /// Insert at `index`, appending when the index is past the end, and
    /// select the inserted decal
    pub fn insert_decal(&mut self, index: usize, decal: Decal) -> Option<usize> {
        if !self.is_placement_available() {
            return None;
        }
        let index = index.min(self.decals.len());
        self.decals.insert(index, decal);
        self.selected = Some(index);
        self.rebuild();
        Some(index)
    }

    pub fn update_decal(&mut self, index: usize, decal: Decal) -> bool {
        if !self.is_placement_available() {
            return false;
        }
        let Some(slot) = self.decals.get_mut(index) else {
            return false;
        };
        *slot = decal;
        self.rebuild();
        true
    }

    /// Remove a decal, returning it with its index for undo
    ///
    /// A selection on the removed decal moves to the decal now at that index
    /// (or the new last one).
    pub fn delete_decal(&mut self, index: usize) -> Option<RemovedDecal> {
        if !self.is_placement_available() || index >= self.decals.len() {
            return None;
        }
        let decal = self.decals.remove(index);
        self.selected = match self.selected {
            _ if self.decals.is_empty() => None,
            Some(s) if s > index => Some(s - 1),
            Some(s) if s == index => Some(index.min(self.decals.len() - 1)),
            other => other,
        };
        self.rebuild();
        Some(RemovedDecal { index, decal })
    }

    /// Reinsert the most recent deletion from `history`
    ///
    /// The recorded index is re-validated against the current list, so a
    /// stale index appends instead of panicking.
    pub fn undo_delete(&mut self, history: &mut DecalHistory) -> Option<usize> {
        if !self.is_placement_available() {
            return None;
        }
        let removed = history.pop()?;
        self.insert_decal(removed.index, removed.decal)
    }

    /// Replace the whole decal list (e.g. when loading saved work)
    pub fn replace_decals(&mut self, decals: Vec<Decal>) {
        if !self.is_placement_available() {
            return;
        }
        self.decals = decals;
        self.selected = None;
        self.rebuild();
    }

    /// Topmost decal under `(u, v)`
    ///
    /// Each decal is treated as an axis-aligned ellipse with its drawn
    /// half-extents in UV units; rotation is ignored.
    pub fn hit_test(&self, u: f32, v: f32) -> Option<usize> {
        let canvas = self.canvas.as_ref()?;
        let canvas_w = canvas.width() as f32;
        let canvas_h = canvas.height() as f32;
        self.decals.iter().rposition(|decal| {
            let (draw_w, draw_h) = decal.draw_size();
            let half_w = draw_w / (2.0 * canvas_w);
            let half_h = draw_h / (2.0 * canvas_h);
            if half_w <= 0.0 || half_h <= 0.0 {
                return false;
            }
            let nx = (u - decal.u()) / half_w;
            let ny = (v - decal.v()) / half_h;
            nx * nx + ny * ny <= HIT_TOLERANCE
        })
    }

    /// Select the topmost decal under `(u, v)`; a miss clears the selection
    pub fn select_at(&mut self, u: f32, v: f32) -> Option<usize> {
        self.selected = self.hit_test(u, v);
        self.selected
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index < self.decals.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected.filter(|&i| i < self.decals.len())
    }

    pub fn selected(&self) -> Option<&Decal> {
        self.selected_index().map(|i| &self.decals[i])
    }

    pub fn update_selected(&mut self, decal: Decal) -> bool {
        match self.selected_index() {
            Some(index) => self.update_decal(index, decal),
            None => false,
        }
    }

    /// Replace the selected decal with `edit(selected)`
    pub fn edit_selected<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&Decal) -> Decal,
    {
        match self.selected() {
            Some(current) => {
                let updated = edit(current);
                self.update_selected(updated)
            }
            None => false,
        }
    }

    pub fn delete_selected(&mut self) -> Option<RemovedDecal> {
        let index = self.selected_index()?;
        self.delete_decal(index)
    }

    /// Stage an image for the next [`place_pending`](Self::place_pending)
    pub fn prepare_pending(&mut self, image: Arc<TextureBuffer>) {
        self.pending = Some(image);
        self.selected = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    pub fn take_pending(&mut self) -> Option<Arc<TextureBuffer>> {
        self.pending.take()
    }

    /// Place the pending image at `(u, v)` with default placement
    ///
    /// The pending image is kept when the surface is unavailable.
    pub fn place_pending(&mut self, u: f32, v: f32) -> Option<usize> {
        if !self.is_placement_available() {
            return None;
        }
        let image = self.pending.take()?;
        match Decal::new(image, u, v) {
            Ok(decal) => self.add_decal(decal),
            Err(e) => {
                tracing::warn!("Cannot place pending image: {}", e);
                None
            }
        }
    }
}
