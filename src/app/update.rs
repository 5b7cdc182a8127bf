//! The frame loop.

use super::App;
use crate::renderer::backend::{Backend, Canvas};
use tracing::{info, warn};

/// Vertical gap between the main text and the frame-rate line, in pixels.
const FPS_LINE_SPACING: i32 = 4;

impl<B: Backend> App<B> {
    /// Runs frames until a quit signal arrives.
    ///
    /// Returns immediately when initialization failed. Cleanup is left to
    /// [`App::cleanup`] or to dropping the app.
    pub fn run(&mut self) {
        if !self.state.is_running() {
            warn!("Initialization failed, skipping frame loop");
            return;
        }

        info!(
            budget_ms = self.limiter.budget_ms(),
            "Entering frame loop"
        );
        while self.state.is_running() {
            self.frame();
        }
        info!(total_frames = self.stats.total_frames(), "Frame loop finished");
    }

    /// Produces one frame: input, clear, draw, present, then sleep off the rest
    /// of the frame budget.
    pub(crate) fn frame(&mut self) {
        let frame_start = self.backend.ticks();

        self.handle_events();
        self.render();

        let frame_end = self.backend.ticks();
        self.stats.record_frame(frame_end);
        if let Some(ms) = self.limiter.remaining(frame_end.wrapping_sub(frame_start)) {
            self.backend.delay(ms);
        }
    }

    fn render(&mut self) {
        let Some(context) = self.context.as_mut() else {
            return;
        };
        let font = self.font.as_ref();

        context.clear(self.config.clear_color);
        self.text_renderer.draw_text(context, font, &self.config.text);

        if self.config.show_fps {
            let geometry = self.text_renderer.geometry();
            let (x, y) = geometry.origin;
            let line_height = i32::try_from(geometry.cell_height).unwrap_or(i32::MAX);
            let y = y.saturating_add(line_height).saturating_add(FPS_LINE_SPACING);
            let line = format!("FPS: {}", self.stats.fps());
            self.text_renderer.draw_text_at(context, font, &line, x, y);
        }

        context.present();
    }
}
