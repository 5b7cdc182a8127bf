//! Initialization errors.
//!
//! Every failure the application can hit happens while acquiring resources.
//! The controller never propagates these to its caller: it logs the error and
//! moves to [`AppState::Terminating`](crate::app::AppState::Terminating).

use std::path::PathBuf;
use thiserror::Error;

/// Error raised while bringing up the window, render context or font.
#[derive(Error, Debug)]
pub enum InitError {
    /// A configuration value would make the frame loop or glyph lookup meaningless.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// The windowing or graphics library could not start.
    #[error("Graphics subsystem could not initialize! {0}")]
    GraphicsSubsystem(String),
    /// The window, surface, adapter or device could not be created.
    #[error("Window or render context could not be created! {0}")]
    SurfaceOrContext(String),
    /// The font image could not be read or decoded.
    #[error("Unable to load bitmap font {path:?}! {source}")]
    FontLoad {
        /// Path that was read.
        path: PathBuf,
        /// The [`image::ImageError`] from decoding.
        source: image::ImageError,
    },
    /// The decoded font image could not be turned into a drawable texture.
    #[error("Unable to create texture from bitmap font! {0}")]
    FontConversion(String),
}

/// Shorthand type for [`Result<T, InitError>`]
pub type InitResult<T> = Result<T, InitError>;
