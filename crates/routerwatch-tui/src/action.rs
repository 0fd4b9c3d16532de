//! UI actions. Every state change in the dashboard goes through one of these.

use std::fmt;

use routerwatch_core::RouterId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Resize(u16, u16),
    Tick,
    Render,

    // ── Overlays ──
    ToggleHelp,

    // ── Router list ──
    CursorUp,
    CursorDown,

    // ── Panel transitions ──
    Select(RouterId),
    Pause(RouterId),
    Resume(RouterId),
    /// Expand the selected panel, or compress the expanded one.
    ToggleExpand,
    Close(RouterId),
    Refresh(RouterId),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(r) => write!(f, "select {r}"),
            Self::Pause(r) => write!(f, "pause {r}"),
            Self::Resume(r) => write!(f, "resume {r}"),
            Self::Close(r) => write!(f, "close {r}"),
            Self::Refresh(r) => write!(f, "refresh {r}"),
            other => write!(f, "{other:?}"),
        }
    }
}
