// ── Domain model ──
//
// Canonical types shared by the scheduler, the controller, and UI
// consumers. Wire types from `routerwatch-api` are converted into these
// by `crate::convert`.

pub mod panel;
pub mod router_id;
pub mod series;

pub use panel::{Controls, PanelState};
pub use router_id::{ContainerId, RouterId};
pub use series::Series;
