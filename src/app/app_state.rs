//! Lifecycle state of the application.

/// Whether the frame loop should keep going.
///
/// The only transition is `Running` → `Terminating`, taken on a quit signal or
/// on any initialization failure. Nothing moves the state back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Resources are held and frames are being produced.
    #[default]
    Running,
    /// The loop must stop; cleanup follows.
    Terminating,
}

impl AppState {
    /// Returns `true` while the frame loop should run.
    pub fn is_running(self) -> bool {
        self == AppState::Running
    }
}
