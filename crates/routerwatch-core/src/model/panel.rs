use serde::Serialize;
use strum::Display;

/// Lifecycle of one router panel.
///
/// `Idle → Polling ⇄ Paused → Closed`. `Closed` is terminal for a panel
/// identity; selecting the router again opens a fresh panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum PanelState {
    #[default]
    Idle,
    Polling,
    Paused,
    Closed,
}

impl PanelState {
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// Which panel controls are visible, derived from panel state.
///
/// Mirrors what a user can do next: a polling panel offers pause, a paused
/// one offers resume, and expand/compress swap depending on layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub pause: bool,
    pub resume: bool,
    pub expand: bool,
    pub compress: bool,
    /// `Last sync: …` text, present once a fetch has succeeded.
    pub last_sync: Option<String>,
}
