//! PNG/JPEG decode and PNG export for texture buffers

use super::TextureBuffer;
use std::path::{Path, PathBuf};

/// Error type for texture file I/O.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write PNG {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture has invalid dimensions {0}x{1}")]
    InvalidDimensions(u32, u32),
}

/// Load any PNG/JPEG file as an RGBA texture
pub fn load_texture(path: &Path) -> Result<TextureBuffer, TextureError> {
    let img = image::open(path).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let buffer = TextureBuffer::from(img.to_rgba8());
    if buffer.is_empty() {
        return Err(TextureError::InvalidDimensions(buffer.width, buffer.height));
    }
    Ok(buffer)
}

/// Write a TextureBuffer to a PNG file
///
/// # Example
/// ```no_run
/// use inkform_engine::texture::{TextureBuffer, write_png};
/// use std::path::Path;
///
/// let tex = TextureBuffer::filled(64, 64, [255, 0, 0, 255]);
/// write_png(&tex, Path::new("red.png")).unwrap();
/// ```
pub fn write_png(texture: &TextureBuffer, path: &Path) -> Result<(), TextureError> {
    if texture.is_empty() {
        return Err(TextureError::InvalidDimensions(texture.width, texture.height));
    }
    image::save_buffer_with_format(
        path,
        &texture.pixels,
        texture.width,
        texture.height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|source| TextureError::Encode {
        path: path.to_path_buf(),
        source,
    })
}
