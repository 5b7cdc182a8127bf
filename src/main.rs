//! Glyphloop - a minimal 2D render loop
//!
//! Opens a fixed-size window, loads a bitmap font atlas and draws a line of
//! text every frame at a capped frame rate until the window is closed or the
//! process is interrupted.
//!
//! # Architecture
//! - `app/`: the controller, its lifecycle state and the frame loop
//! - `renderer/`: the backend seam, bitmap font text rendering and the
//!   winit/wgpu implementation
//! - `config`: every tunable constant
//! - `error`: initialization errors
//! - `logging`: `tracing` subscriber setup
//!
//! # Usage
//! Run with `cargo run` from a directory containing `font.bmp`. Set
//! `GLYPHLOOP_LOG=debug` to see per-second frame statistics.

#![warn(missing_docs)]
pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod renderer;

#[cfg(test)]
mod test_utils;

use app::App;
use config::Config;
use renderer::window::WinitBackend;

/// Entry point: initialize, run, clean up.
///
/// Initialization failures are logged by the controller, after which the
/// frame loop is skipped and the process exits normally.
fn main() {
    logging::init();

    let mut app = App::new(Config::default(), WinitBackend::new());
    app.run();
    app.cleanup();
}
