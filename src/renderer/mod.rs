//! Rendering.
//!
//! [`backend`] defines the seam the controller draws through. [`text`] and
//! [`font_atlas`] turn strings into glyph copies, and [`window`] with
//! [`wgpu_lib`] put those copies on screen.

pub mod backend;
pub mod font_atlas;
/// Pipeline building utilities for WGPU.
pub mod pipeline_builder;
pub mod text;
pub mod vertex;
pub mod wgpu_lib;
pub mod window;
