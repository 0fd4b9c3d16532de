pub mod chart;
pub mod panel;
