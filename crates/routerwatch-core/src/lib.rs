//! Polling engine and panel state between `routerwatch-api` and UI consumers.
//!
//! - **[`PanelController`]**: one object owning every router panel. Maps
//!   user actions (select, pause, resume, expand, compress, close) onto
//!   per-panel state transitions and drives the scheduler.
//!
//! - **[`PollScheduler`]**: the poll registry. At most one repeating timer
//!   per [`RouterId`]; each tick spawns a fetch without waiting on the
//!   previous one.
//!
//! - **[`DataFetcher`]**: one read per call through a [`SeriesSource`]
//!   (the HTTP [`GraphClient`](routerwatch_api::GraphClient) in
//!   production). Results land on the [`ChartBoard`].
//!
//! - **[`ChartBoard`]**: named chart containers (`graph<router>`) holding a
//!   loading indicator, a [`ChartSpec`], or an inline error, plus a
//!   `watch` version counter UI loops can wait on.
//!
//! Panels carry a lifetime `CancellationToken`; closing a panel cancels it
//! and any response still in flight is discarded.

pub mod board;
pub mod chart;
pub mod clock;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod scheduler;

// ── Primary re-exports ──────────────────────────────────────────────
pub use board::{ChartBoard, Container, ContainerContent, UNABLE_TO_LOAD};
pub use chart::{AxisScale, ChartLayout, ChartSpec, Trace, TraceMode};
pub use config::DashboardConfig;
pub use controller::{Panel, PanelController};
pub use error::CoreError;
pub use fetcher::{DataFetcher, FetchOutcome, SeriesSource};
pub use model::{ContainerId, Controls, PanelState, RouterId, Series};
pub use scheduler::PollScheduler;
