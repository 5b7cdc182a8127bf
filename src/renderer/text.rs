//! Bitmap font text rendering.
//!
//! [`TextRenderer`] is a stateless mapping from characters to copies of glyph
//! cells. It never owns the font texture: the caller passes the currently
//! loaded [`LoadedFont`] (or `None`) on every call.

use crate::config::GlyphGeometry;
use crate::renderer::backend::{Canvas, Rect};
use crate::renderer::font_atlas::FontAtlas;

/// Ordinal drawn in place of characters outside the 8-bit range.
const REPLACEMENT_ORDINAL: u32 = b'?' as u32;
/// Highest ordinal [`glyph_ordinal`] produces.
const MAX_ORDINAL: u32 = 0xFF;

/// A font texture together with the atlas cell of every drawable ordinal.
#[derive(Debug)]
pub struct LoadedFont<T> {
    /// The drawable texture.
    pub texture: T,
    cells: Vec<Option<Rect>>,
}

impl<T> LoadedFont<T> {
    /// Pairs `texture` with the glyph cells of the `atlas` it was created from.
    pub fn new(texture: T, atlas: &FontAtlas) -> Self {
        let cells = (0..=MAX_ORDINAL)
            .map(|ordinal| atlas.glyph_cell(ordinal))
            .collect();
        Self { texture, cells }
    }

    /// Source rectangle of `ordinal`, `None` when the atlas has no such cell.
    pub fn cell(&self, ordinal: u32) -> Option<Rect> {
        self.cells.get(ordinal as usize).copied().flatten()
    }
}

/// Draws fixed-width text from a grid-based font atlas.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    geometry: GlyphGeometry,
}

impl TextRenderer {
    /// Creates a renderer for atlases laid out as `geometry`.
    pub fn new(geometry: GlyphGeometry) -> Self {
        Self { geometry }
    }

    /// The geometry lookups use.
    pub fn geometry(&self) -> GlyphGeometry {
        self.geometry
    }

    /// Copies the glyph for `c` to `(x, y)` at its native cell size.
    ///
    /// Does nothing when `font` is `None` or when the glyph's cell lies outside
    /// the atlas image.
    pub fn render_character<C: Canvas>(
        &self,
        canvas: &mut C,
        font: Option<&LoadedFont<C::Texture>>,
        c: char,
        x: i32,
        y: i32,
    ) {
        let Some(font) = font else {
            return;
        };

        let Some(src) = font.cell(glyph_ordinal(c)) else {
            tracing::trace!(?c, "Glyph cell outside font atlas, skipping");
            return;
        };

        let dst = Rect::new(x, y, self.geometry.cell_width, self.geometry.cell_height);
        canvas.copy(&font.texture, src, dst);
    }

    /// Draws `text` starting at the configured origin.
    pub fn draw_text<C: Canvas>(
        &self,
        canvas: &mut C,
        font: Option<&LoadedFont<C::Texture>>,
        text: &str,
    ) {
        let (x, y) = self.geometry.origin;
        self.draw_text_at(canvas, font, text, x, y);
    }

    /// Draws `text` left to right from `(x, y)`, advancing by the fixed advance
    /// after every character. No wrapping; `'\n'` is looked up like any glyph.
    pub fn draw_text_at<C: Canvas>(
        &self,
        canvas: &mut C,
        font: Option<&LoadedFont<C::Texture>>,
        text: &str,
        x: i32,
        y: i32,
    ) {
        let mut cursor = x;
        for c in text.chars() {
            self.render_character(canvas, font, c, cursor, y);
            cursor = cursor.saturating_add(self.geometry.advance);
        }
    }
}

/// Atlas ordinal for `c`: its scalar value when it fits in a byte, `'?'` otherwise.
pub fn glyph_ordinal(c: char) -> u32 {
    let ordinal = c as u32;
    if ordinal <= MAX_ORDINAL {
        ordinal
    } else {
        REPLACEMENT_ORDINAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::font_atlas::cell_rect;
    use crate::test_utils::{RecordingCanvas, font_of, mock_texture};

    fn renderer() -> TextRenderer {
        TextRenderer::new(GlyphGeometry::default())
    }

    /// Tests source and destination rectangles for "AB".
    #[test]
    fn test_draw_text_ab_positions() {
        let mut canvas = RecordingCanvas::default();
        let font = font_of(1, 192, 192);

        renderer().draw_text(&mut canvas, Some(&font), "AB");

        let copies = canvas.copies();
        assert_eq!(copies.len(), 2);
        assert_eq!(copies[0].dst, Rect::new(10, 10, 12, 12));
        assert_eq!(copies[1].dst, Rect::new(26, 10, 12, 12));
        // 'A' = 65, 'B' = 66 -> row 4, columns 1 and 2
        assert_eq!(copies[0].src, Rect::new(12, 48, 12, 12));
        assert_eq!(copies[1].src, Rect::new(24, 48, 12, 12));
        assert!(copies.iter().all(|copy| copy.texture == 1));
    }

    /// Tests that empty text issues no copies.
    #[test]
    fn test_draw_empty_text_draws_nothing() {
        let mut canvas = RecordingCanvas::default();
        let font = font_of(1, 192, 192);

        renderer().draw_text(&mut canvas, Some(&font), "");

        assert!(canvas.copies().is_empty());
        assert_eq!(renderer().geometry().origin, (10, 10));
    }

    /// Tests that drawing without a loaded font is silent.
    #[test]
    fn test_render_without_font_is_noop() {
        let mut canvas = RecordingCanvas::default();

        renderer().render_character(&mut canvas, None, 'A', 0, 0);
        renderer().draw_text(&mut canvas, None, "Hello World!");

        assert!(canvas.copies().is_empty());
    }

    /// Tests the fixed advance across "Hello World!".
    #[test]
    fn test_hello_world_advance() {
        let mut canvas = RecordingCanvas::default();
        let font = font_of(1, 192, 192);

        renderer().draw_text(&mut canvas, Some(&font), "Hello World!");

        let xs: Vec<i32> = canvas.copies().iter().map(|copy| copy.dst.x).collect();
        let expected: Vec<i32> = (0..12).map(|i| 10 + 16 * i).collect();
        assert_eq!(xs, expected);
        // Draw width stays at the cell width even though the advance is wider.
        assert!(canvas.copies().iter().all(|copy| copy.dst.width == 12));
    }

    /// Tests that a newline is drawn as glyph 10 without breaking the line.
    #[test]
    fn test_newline_is_looked_up_as_glyph() {
        let mut canvas = RecordingCanvas::default();
        let font = font_of(1, 192, 192);

        renderer().draw_text(&mut canvas, Some(&font), "a\nb");

        let copies = canvas.copies();
        assert_eq!(copies.len(), 3);
        // '\n' = 10 -> column 10, row 0
        assert_eq!(copies[1].src, Rect::new(120, 0, 12, 12));
        assert_eq!(copies[2].dst.y, 10);
        assert_eq!(copies[2].dst.x, 42);
    }

    /// Tests that characters past U+00FF draw as `?`.
    #[test]
    fn test_wide_characters_use_replacement_glyph() {
        assert_eq!(glyph_ordinal('é'), 0xE9);
        assert_eq!(glyph_ordinal('€'), b'?' as u32);

        let mut canvas = RecordingCanvas::default();
        let font = font_of(1, 192, 192);
        renderer().render_character(&mut canvas, Some(&font), '€', 0, 0);
        assert_eq!(canvas.copies()[0].src, cell_rect(&GlyphGeometry::default(), 63));
    }

    /// Tests that a loaded font caches the atlas cell lookups.
    #[test]
    fn test_font_cells_come_from_atlas_lookup() {
        let font = font_of(1, 192, 192);

        assert_eq!(font.cell(65), Some(Rect::new(12, 48, 12, 12)));
        assert_eq!(font.cell(255), Some(Rect::new(180, 180, 12, 12)));
        assert_eq!(font.cell(256), None);
    }

    /// Tests that ordinals beyond the declared grid rows draw nothing.
    #[test]
    fn test_ordinals_past_declared_rows_are_skipped() {
        let geometry = GlyphGeometry {
            columns: 32,
            rows: 4,
            ..GlyphGeometry::default()
        };
        let atlas = FontAtlas::from_image(
            image::DynamicImage::new_rgba8(384, 192),
            crate::renderer::backend::Color::rgb(255, 0, 255),
            geometry,
        );
        let font = LoadedFont::new(mock_texture(7), &atlas);
        let mut canvas = RecordingCanvas::default();

        // DEL (127) is the last cell of row 3, 0x80 would be row 4.
        TextRenderer::new(geometry).draw_text(&mut canvas, Some(&font), "\u{7f}\u{80}");

        let copies = canvas.copies();
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].src, Rect::new(372, 36, 12, 12));
    }

    /// Tests that cells past the atlas image are skipped.
    #[test]
    fn test_glyph_outside_small_atlas_is_skipped() {
        let mut canvas = RecordingCanvas::default();
        // Atlas only holds the first four glyph rows.
        let font = font_of(1, 192, 48);

        renderer().draw_text(&mut canvas, Some(&font), "0A");

        // '0' = 48 is row 3, 'A' = 65 is row 4.
        let copies = canvas.copies();
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].dst.x, 10);
    }
}
