//! Seam between the application and the windowing/graphics library.
//!
//! [`App`](crate::app::App) only talks to the outside world through the
//! [`Backend`] and [`Canvas`] traits defined here. The production
//! implementation lives in [`wgpu_lib`](crate::renderer::wgpu_lib); tests plug
//! in a recording backend instead.
//!
//! Resources are plain owned values. Dropping a [`Backend::Display`],
//! [`Backend::Context`] or [`Canvas::Texture`] releases it, which lets the
//! controller express cleanup as ordered `Option::take` calls.

use crate::config::Config;
use crate::error::InitResult;
use crate::renderer::font_atlas::FontAtlas;

/// An axis-aligned rectangle in pixels, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl Rect {
    /// Creates a new [`Rect`].
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }
}

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Converts to the normalized floating point form GPU APIs expect.
    pub fn to_f64_array(self) -> [f64; 4] {
        [
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64 / 255.0,
        ]
    }

    /// Like [`Color::to_f64_array`] with the color channels decoded from sRGB to
    /// linear light, the form an sRGB render target expects for clear values.
    /// Alpha is already linear.
    pub fn to_linear_f64_array(self) -> [f64; 4] {
        let [r, g, b, a] = self.to_f64_array();
        [srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a]
    }
}

fn srgb_to_linear(channel: f64) -> f64 {
    if channel <= 0.04045 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

/// Input the controller cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The window was closed or the process was asked to stop.
    Quit,
    /// Anything else; drained and ignored.
    Other,
}

/// A render target that can clear, copy texture regions and present.
pub trait Canvas {
    /// Drawable texture created from a [`FontAtlas`].
    type Texture;

    /// Uploads the atlas pixels as a texture composited with alpha blending.
    ///
    /// # Errors
    /// Returns [`InitError::FontConversion`](crate::error::InitError::FontConversion)
    /// if the texture cannot be created.
    fn create_texture(&mut self, atlas: &FontAtlas) -> InitResult<Self::Texture>;

    /// Starts a new frame filled with `color`.
    fn clear(&mut self, color: Color);

    /// Copies `src` of `texture` into `dst` on the current frame.
    fn copy(&mut self, texture: &Self::Texture, src: Rect, dst: Rect);

    /// Shows everything drawn since the last [`Canvas::clear`].
    fn present(&mut self);
}

/// Windowing, timing and context creation.
///
/// Calls happen in this order during startup: [`Backend::init`],
/// [`Backend::create_display`], [`Backend::create_context`]. During shutdown the
/// context and display are dropped before [`Backend::shutdown`] is called.
pub trait Backend {
    /// The window.
    type Display;
    /// The render context bound to the window.
    type Context: Canvas;

    /// Starts the windowing and graphics library.
    fn init(&mut self) -> InitResult<()>;

    /// Opens the fixed-size window described by `config`.
    fn create_display(&mut self, config: &Config) -> InitResult<Self::Display>;

    /// Creates the render context for `display`.
    fn create_context(
        &mut self,
        display: &Self::Display,
        config: &Config,
    ) -> InitResult<Self::Context>;

    /// Drains every pending input event without blocking.
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Milliseconds since [`Backend::init`]. Wraps around like a 32-bit tick counter.
    fn ticks(&self) -> u32;

    /// Blocks the calling thread for `ms` milliseconds.
    fn delay(&mut self, ms: u32);

    /// Stops the library. Only called after every display and context was dropped.
    fn shutdown(&mut self);
}
