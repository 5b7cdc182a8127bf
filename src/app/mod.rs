//! Application controller.
//!
//! [`App`] owns every external resource (window, render context, font
//! texture) and drives the lifecycle: initialize on construction, run the
//! frame loop, release everything on cleanup or drop.
//!
//! # Module Structure
//!
//! - [`app_state`]: the [`AppState`] lifecycle enum
//! - [`event_handler`]: input polling and the quit transition
//! - [`frame_timer`]: frame budget and frame statistics
//! - [`update`]: the frame loop and per-frame rendering
//!
//! # Resource Order
//!
//! Resources are acquired as display → context → font texture and released in
//! the reverse order. Each release is guarded by an `Option`, so cleanup can
//! run any number of times and after any partial initialization.

pub mod app_state;
pub mod event_handler;
pub mod frame_timer;
pub mod update;

pub use app_state::AppState;

use crate::config::Config;
use crate::error::InitResult;
use crate::renderer::backend::{Backend, Canvas};
use crate::renderer::font_atlas::FontAtlas;
use crate::renderer::text::{LoadedFont, TextRenderer};
use frame_timer::{FrameLimiter, FrameStats};
use tracing::{debug, error, info};

/// Font texture type produced by a backend's context.
pub type BackendTexture<B> = <<B as Backend>::Context as Canvas>::Texture;

/// The application controller.
///
/// # Lifecycle
/// 1. [`App::new`] acquires all resources; any failure is logged and leaves
///    the app in [`AppState::Terminating`]
/// 2. [`App::run`] runs the frame loop until a quit signal
/// 3. [`App::cleanup`] (also called on drop) releases resources in reverse order
pub struct App<B: Backend> {
    config: Config,
    backend: B,
    state: AppState,
    text_renderer: TextRenderer,
    limiter: FrameLimiter,
    stats: FrameStats,
    font: Option<LoadedFont<BackendTexture<B>>>,
    context: Option<B::Context>,
    display: Option<B::Display>,
    subsystem_active: bool,
}

impl<B: Backend> App<B> {
    /// Creates the controller and immediately initializes all resources.
    ///
    /// Initialization failures are not returned. They are logged and the app
    /// starts out in [`AppState::Terminating`], which turns [`App::run`] into a
    /// no-op.
    pub fn new(config: Config, backend: B) -> Self {
        let text_renderer = TextRenderer::new(config.glyphs);
        let limiter = FrameLimiter::new(config.frame_budget_ms());
        let mut app = Self {
            config,
            backend,
            state: AppState::Running,
            text_renderer,
            limiter,
            stats: FrameStats::new(),
            font: None,
            context: None,
            display: None,
            subsystem_active: false,
        };
        app.initialize();
        app
    }

    /// Current lifecycle state.
    #[cfg(test)]
    pub fn state(&self) -> AppState {
        self.state
    }

    /// Frame counters collected by the loop.
    #[cfg(test)]
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Returns `true` once the font texture is ready to draw with.
    #[cfg(test)]
    pub fn font_loaded(&self) -> bool {
        self.font.is_some()
    }

    /// Releases the font texture, render context and display, in that order,
    /// then stops the graphics subsystem.
    ///
    /// Safe to call repeatedly; resources that were never acquired or were
    /// already released are skipped. The app is left in
    /// [`AppState::Terminating`].
    pub fn cleanup(&mut self) {
        if let Some(font) = self.font.take() {
            drop(font);
            debug!("Released font texture");
        }
        if let Some(context) = self.context.take() {
            drop(context);
            debug!("Released render context");
        }
        if let Some(display) = self.display.take() {
            drop(display);
            debug!("Released display");
        }
        if self.subsystem_active {
            self.backend.shutdown();
            self.subsystem_active = false;
            info!("Cleanup complete");
        }
        self.state = AppState::Terminating;
    }

    fn initialize(&mut self) {
        if let Err(err) = self.acquire_resources() {
            error!("{err}");
            self.state = AppState::Terminating;
        }
    }

    fn acquire_resources(&mut self) -> InitResult<()> {
        self.config.validate()?;

        self.backend.init()?;
        self.subsystem_active = true;

        let display = self.display.insert(self.backend.create_display(&self.config)?);
        let context = self
            .context
            .insert(self.backend.create_context(display, &self.config)?);

        let font = &self.config.font;
        let atlas = FontAtlas::load(&font.path, font.color_key, self.config.glyphs)?;
        let texture = context.create_texture(&atlas)?;
        self.font = Some(LoadedFont::new(texture, &atlas));

        info!(
            width = self.config.screen_width,
            height = self.config.screen_height,
            "Initialization complete"
        );
        Ok(())
    }
}

impl<B: Backend> Drop for App<B> {
    fn drop(&mut self) {
        self.cleanup();
    }
}
