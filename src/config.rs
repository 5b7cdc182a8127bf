//! Application configuration.
//!
//! Every constant the application relies on (window size, frame cap, glyph
//! geometry, font file, colors and the text to draw) lives in [`Config`]. The
//! controller receives one immutable value at construction, so tests can swap
//! in alternate grid layouts without touching the rendering code.

use crate::error::InitError;
use crate::renderer::backend::Color;
use std::path::PathBuf;

/// Layout of the glyph grid inside the font atlas and of glyphs on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphGeometry {
    /// Width of one glyph cell in the atlas, in pixels.
    pub cell_width: u32,
    /// Height of one glyph cell in the atlas, in pixels.
    pub cell_height: u32,
    /// Number of glyph columns per atlas row.
    pub columns: u32,
    /// Number of glyph rows in the atlas.
    pub rows: u32,
    /// Horizontal cursor advance after each character, in pixels.
    pub advance: i32,
    /// Where [`draw_text`](crate::renderer::text::TextRenderer::draw_text) starts.
    pub origin: (i32, i32),
}

impl Default for GlyphGeometry {
    fn default() -> Self {
        Self {
            cell_width: 12,
            cell_height: 12,
            columns: 16,
            rows: 16,
            advance: 16,
            origin: (10, 10),
        }
    }
}

/// Font atlas source and transparency settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontConfig {
    /// Path of the bitmap font image.
    pub path: PathBuf,
    /// Pixels of this color become fully transparent.
    pub color_key: Color,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("font.bmp"),
            color_key: Color::rgb(255, 0, 255),
        }
    }
}

/// Immutable configuration handed to [`App`](crate::app::App).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Window title.
    pub title: String,
    /// Window width in pixels.
    pub screen_width: u32,
    /// Window height in pixels.
    pub screen_height: u32,
    /// Upper bound on frames per second.
    pub fps_cap: u32,
    /// Color the frame buffer is cleared to every frame.
    pub clear_color: Color,
    /// Text drawn every frame.
    pub text: String,
    /// Draw a measured frames-per-second line under the main text.
    pub show_fps: bool,
    /// Font atlas settings.
    pub font: FontConfig,
    /// Glyph grid and placement.
    pub glyphs: GlyphGeometry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "BadGuyInc".to_string(),
            screen_width: 640,
            screen_height: 480,
            fps_cap: 60,
            clear_color: Color::BLACK,
            text: "Hello World!".to_string(),
            show_fps: false,
            font: FontConfig::default(),
            glyphs: GlyphGeometry::default(),
        }
    }
}

impl Config {
    /// Target duration of one frame in whole milliseconds (`1000 / fps_cap`, truncated).
    ///
    /// A zero frame cap yields a zero budget, which disables the frame delay;
    /// [`Config::validate`] rejects that value before the loop ever starts.
    pub fn frame_budget_ms(&self) -> u32 {
        1000u32.checked_div(self.fps_cap).unwrap_or(0)
    }

    /// Checks the values the frame loop and glyph lookup divide by or draw with.
    ///
    /// # Errors
    /// Returns [`InitError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), InitError> {
        let invalid = |field: &str| Err(InitError::InvalidConfig(format!("{field} must be non-zero")));

        if self.screen_width == 0 || self.screen_height == 0 {
            return invalid("screen size");
        }
        if self.fps_cap == 0 {
            return invalid("fps_cap");
        }
        if self.glyphs.cell_width == 0 || self.glyphs.cell_height == 0 {
            return invalid("glyph cell size");
        }
        if self.glyphs.columns == 0 || self.glyphs.rows == 0 {
            return invalid("glyph grid");
        }
        Ok(())
    }
}
