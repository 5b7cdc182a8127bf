//! Input handling for [`App`].
//!
//! The only input the application reacts to is a quit request. Everything
//! else is drained and ignored.

use super::App;
use crate::app::AppState;
use crate::renderer::backend::{Backend, InputEvent};
use tracing::{info, trace};

impl<B: Backend> App<B> {
    /// Drains every pending input event.
    ///
    /// A [`InputEvent::Quit`] moves the app to [`AppState::Terminating`]. The
    /// rest of the batch is still drained and the current frame still renders;
    /// the loop stops at its next check.
    pub(crate) fn handle_events(&mut self) {
        for event in self.backend.poll_events() {
            match event {
                InputEvent::Quit => {
                    if self.state.is_running() {
                        info!("Quit requested");
                    }
                    self.state = AppState::Terminating;
                }
                InputEvent::Other => trace!("Ignoring input event"),
            }
        }
    }
}
