// ── Chart board ──
//
// Named chart containers, one per open panel. Fetch completions write
// here; UI consumers read snapshots when they draw. Every write replaces
// the container's content wholesale and bumps a version counter.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use crate::chart::ChartSpec;
use crate::model::ContainerId;

/// Message shown in a container whose last fetch failed.
pub const UNABLE_TO_LOAD: &str = "Unable to load";

/// What a container currently displays.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerContent {
    /// Waiting for the first response after selection.
    Loading { label: String },
    Chart(Arc<ChartSpec>),
    Error { message: String },
}

/// One chart container.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub content: ContainerContent,
    /// Stamp of the last successful fetch, if any since the panel was shown.
    pub last_sync: Option<String>,
}

/// Chart renderer target: a keyed set of containers.
///
/// Uses `DashMap` so fetch tasks can write without holding the
/// controller, and a `watch` channel so readers can wait for changes.
pub struct ChartBoard {
    containers: DashMap<ContainerId, Arc<Container>>,
    version: watch::Sender<u64>,
}

impl Default for ChartBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartBoard {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        Self {
            containers: DashMap::new(),
            version,
        }
    }

    /// Replace a container's content with a loading indicator and hide its
    /// last-sync stamp.
    pub fn show_loading(&self, id: &ContainerId, label: &str) {
        self.containers.insert(
            id.clone(),
            Arc::new(Container {
                content: ContainerContent::Loading {
                    label: label.to_owned(),
                },
                last_sync: None,
            }),
        );
        self.bump_version();
    }

    /// Clear a container and draw `spec` in its place.
    pub fn render(&self, id: &ContainerId, spec: ChartSpec) {
        self.replace_content(id, ContainerContent::Chart(spec.shared()));
    }

    /// Replace a container's content with an inline error message.
    pub fn show_error(&self, id: &ContainerId, message: &str) {
        self.replace_content(
            id,
            ContainerContent::Error {
                message: message.to_owned(),
            },
        );
    }

    /// Record a successful sync for a container.
    pub fn mark_synced(&self, id: &ContainerId, stamp: String) {
        let content = self.containers.get(id).map_or_else(
            || ContainerContent::Loading {
                label: String::new(),
            },
            |c| c.content.clone(),
        );
        self.containers.insert(
            id.clone(),
            Arc::new(Container {
                content,
                last_sync: Some(stamp),
            }),
        );
        self.bump_version();
    }

    /// Remove a container entirely.
    pub fn clear(&self, id: &ContainerId) {
        if self.containers.remove(id).is_some() {
            self.bump_version();
        }
    }

    /// Snapshot of one container.
    pub fn container(&self, id: &ContainerId) -> Option<Arc<Container>> {
        self.containers.get(id).map(|c| Arc::clone(c.value()))
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Current version; bumped on every mutation.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Subscribe to version changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    fn replace_content(&self, id: &ContainerId, content: ContainerContent) {
        let last_sync = self.containers.get(id).and_then(|c| c.last_sync.clone());
        self.containers
            .insert(id.clone(), Arc::new(Container { content, last_sync }));
        self.bump_version();
    }

    fn bump_version(&self) {
        self.version.send_modify(|v| *v = v.wrapping_add(1));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::chart::AxisScale;
    use crate::model::{RouterId, Series};

    fn container() -> ContainerId {
        RouterId::new("R1").unwrap().container()
    }

    fn spec(label: &str) -> ChartSpec {
        ChartSpec::from_series(&Series {
            label: label.into(),
            x: vec![1.0],
            x_labels: vec!["1".into()],
            q_stat: vec![1.0],
            d_stat: vec![1.0],
            q_limit: vec![1.0],
            d_limit: vec![1.0],
        })
    }

    #[test]
    fn render_replaces_previous_content() {
        let board = ChartBoard::new();
        let id = container();
        board.show_loading(&id, "loading");
        board.render(&id, spec("first"));
        board.render(&id, spec("second"));

        let c = board.container(&id).unwrap();
        match &c.content {
            ContainerContent::Chart(s) => {
                assert_eq!(s.layout.title, "second graph");
                assert_eq!(s.layout.y_scale, AxisScale::Log);
            }
            other => panic!("expected chart, got {other:?}"),
        }
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn identical_renders_are_idempotent() {
        let board = ChartBoard::new();
        let id = container();
        board.render(&id, spec("R1"));
        let first = board.container(&id).unwrap();
        board.render(&id, spec("R1"));
        assert_eq!(*board.container(&id).unwrap(), *first);
    }

    #[test]
    fn error_keeps_last_sync() {
        let board = ChartBoard::new();
        let id = container();
        board.render(&id, spec("R1"));
        board.mark_synced(&id, "01/01/2024 - 00:00:00".into());
        board.show_error(&id, UNABLE_TO_LOAD);

        let c = board.container(&id).unwrap();
        assert_eq!(
            c.content,
            ContainerContent::Error {
                message: UNABLE_TO_LOAD.into()
            }
        );
        assert_eq!(c.last_sync.as_deref(), Some("01/01/2024 - 00:00:00"));
    }

    #[test]
    fn loading_hides_last_sync() {
        let board = ChartBoard::new();
        let id = container();
        board.mark_synced(&id, "stamp".into());
        board.show_loading(&id, "loading");
        assert_eq!(board.container(&id).unwrap().last_sync, None);
    }

    #[test]
    fn every_mutation_bumps_version() {
        let board = ChartBoard::new();
        let id = container();
        let rx = board.subscribe();
        assert_eq!(board.version(), 0);

        board.render(&id, spec("R1"));
        board.clear(&id);
        board.clear(&id); // absent: no bump

        assert_eq!(board.version(), 2);
        assert!(rx.has_changed().unwrap());
        assert!(board.is_empty());
    }
}
