//! RGBA pixel buffers
//!
//! `TextureBuffer` is the one pixel type used across the engine: the importer
//! decodes diffuse maps into it, decal images are stored in it, and the
//! surface compositor writes its output into it.
//!
//! # Example
//! ```no_run
//! use inkform_engine::texture::*;
//! use std::path::Path;
//!
//! let mut stencil = load_texture(Path::new("rose.png"))?;
//! stencil.apply(RemoveBackground::default()).apply(Invert);
//! write_png(&stencil, Path::new("rose_clean.png"))?;
//! # Ok::<(), TextureError>(())
//! ```

mod io;
mod modifiers;

// Core type
pub use self::buffer::TextureBuffer;

// File I/O
pub use io::{TextureError, load_texture, write_png};

// Modifiers
pub use modifiers::{Invert, ReflectX, RemoveBackground, TextureApply, TextureModifier, Tint};

mod buffer {
    /// RGBA texture buffer
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct TextureBuffer {
        /// Width in pixels
        pub width: u32,
        /// Height in pixels
        pub height: u32,
        /// RGBA pixel data (4 bytes per pixel, row-major order)
        pub pixels: Vec<u8>,
    }

    impl TextureBuffer {
        /// Create a new texture buffer initialized to transparent black
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![0u8; (width as usize) * (height as usize) * 4],
            }
        }

        /// Create a texture buffer filled with a solid color
        pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
            let mut buffer = Self::new(width, height);
            buffer.fill(color);
            buffer
        }

        /// Wrap raw RGBA bytes. Returns `None` if the length does not match
        /// `width * height * 4`.
        pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
            if pixels.len() != (width as usize) * (height as usize) * 4 {
                return None;
            }
            Some(Self {
                width,
                height,
                pixels,
            })
        }

        /// True when the buffer holds no pixels
        pub fn is_empty(&self) -> bool {
            self.width == 0 || self.height == 0
        }

        /// Overwrite every pixel with `color`
        pub fn fill(&mut self, color: [u8; 4]) {
            for chunk in self.pixels.chunks_exact_mut(4) {
                chunk.copy_from_slice(&color);
            }
        }

        #[inline]
        fn index(&self, x: u32, y: u32) -> usize {
            ((y as usize) * (self.width as usize) + x as usize) * 4
        }

        /// Get pixel at (x, y)
        #[inline]
        pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
            let idx = self.index(x, y);
            [
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            ]
        }

        /// Set pixel at (x, y)
        #[inline]
        pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
            let idx = self.index(x, y);
            self.pixels[idx..idx + 4].copy_from_slice(&color);
        }

        /// Get mutable slice of pixel data at (x, y)
        #[inline]
        pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
            let idx = self.index(x, y);
            &mut self.pixels[idx..idx + 4]
        }
    }

    impl From<image::RgbaImage> for TextureBuffer {
        fn from(img: image::RgbaImage) -> Self {
            let (width, height) = img.dimensions();
            Self {
                width,
                height,
                pixels: img.into_raw(),
            }
        }
    }

    impl TextureBuffer {
        /// Convert into an `image` crate buffer for encoding
        pub fn into_rgba_image(self) -> Option<image::RgbaImage> {
            image::RgbaImage::from_raw(self.width, self.height, self.pixels)
        }
    }
}
