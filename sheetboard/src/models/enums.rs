//! Enums used throughout sheetboard

/// Whether a render pass is currently running in the background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Idle,
    Loading, // A pass is in flight
    Queued,  // A pass is in flight and another was requested meanwhile
}

impl RefreshState {
    pub fn is_busy(&self) -> bool {
        !matches!(self, RefreshState::Idle)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RefreshState::Idle => "idle",
            RefreshState::Loading | RefreshState::Queued => "loading…",
        }
    }
}
