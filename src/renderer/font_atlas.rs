//! CPU side of the bitmap font.
//!
//! A [`FontAtlas`] is a decoded RGBA image plus the grid geometry used to find
//! a character's cell inside it. Pixels matching the color key are made fully
//! transparent at load time, so the GPU only has to alpha-blend.

use crate::config::GlyphGeometry;
use crate::error::{InitError, InitResult};
use crate::renderer::backend::{Color, Rect};
use image::{DynamicImage, RgbaImage};
use std::path::Path;
use tracing::{debug, info};

/// A decoded font image divided into fixed-size glyph cells.
#[derive(Debug, Clone)]
pub struct FontAtlas {
    pixels: RgbaImage,
    geometry: GlyphGeometry,
}

impl FontAtlas {
    /// Loads the font image at `path` and applies `color_key`.
    ///
    /// # Errors
    /// Returns [`InitError::FontLoad`] if the file cannot be opened or decoded.
    pub fn load(path: &Path, color_key: Color, geometry: GlyphGeometry) -> InitResult<Self> {
        let image = image::open(path).map_err(|source| InitError::FontLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let atlas = Self::from_image(image, color_key, geometry);
        info!(
            path = %path.display(),
            width = atlas.width(),
            height = atlas.height(),
            "Loaded bitmap font"
        );
        Ok(atlas)
    }

    /// Builds an atlas from an already decoded image.
    pub fn from_image(image: DynamicImage, color_key: Color, geometry: GlyphGeometry) -> Self {
        let mut pixels = image.to_rgba8();
        let keyed = apply_color_key(&mut pixels, color_key);
        debug!(keyed, "Applied font color key");
        Self { pixels, geometry }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Raw RGBA8 bytes, row-major, 4 bytes per pixel.
    pub fn rgba(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// The decoded pixels.
    #[cfg(test)]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Source rectangle of the glyph with the given ordinal, or `None` when the
    /// cell lies outside the image.
    pub fn glyph_cell(&self, ordinal: u32) -> Option<Rect> {
        cell_within(&self.geometry, ordinal, self.width(), self.height())
    }
}

/// Column and row of `ordinal` in a grid `columns` wide.
pub fn cell_position(columns: u32, ordinal: u32) -> (u32, u32) {
    (ordinal % columns, ordinal / columns)
}

/// Source rectangle of `ordinal` in an atlas laid out as `geometry`, without bounds checks.
pub fn cell_rect(geometry: &GlyphGeometry, ordinal: u32) -> Rect {
    let (column, row) = cell_position(geometry.columns, ordinal);
    let offset = |index: u32, size: u32| i32::try_from(index.saturating_mul(size)).unwrap_or(i32::MAX);
    Rect::new(
        offset(column, geometry.cell_width),
        offset(row, geometry.cell_height),
        geometry.cell_width,
        geometry.cell_height,
    )
}

/// Source rectangle of `ordinal`, or `None` when it lies past the declared
/// rows or does not fit a `width` x `height` image.
pub fn cell_within(geometry: &GlyphGeometry, ordinal: u32, width: u32, height: u32) -> Option<Rect> {
    let (_, row) = cell_position(geometry.columns, ordinal);
    if row >= geometry.rows {
        return None;
    }
    let cell = cell_rect(geometry, ordinal);
    (cell.right() <= i64::from(width) && cell.bottom() <= i64::from(height)).then_some(cell)
}

/// Zeroes the alpha of every pixel whose RGB equals `key`. Returns how many pixels changed.
pub fn apply_color_key(pixels: &mut RgbaImage, key: Color) -> usize {
    let mut keyed = 0;
    for pixel in pixels.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        if (r, g, b) == (key.r, key.g, key.b) {
            pixel.0[3] = 0;
            keyed += 1;
        }
    }
    keyed
}
