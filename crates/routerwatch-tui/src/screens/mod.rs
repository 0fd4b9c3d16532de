//! Screen regions composed by the app.

pub mod panels;
pub mod router_list;

pub use panels::PanelGrid;
pub use router_list::RouterList;
