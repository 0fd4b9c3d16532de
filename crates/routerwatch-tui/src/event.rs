//! Terminal event reader running in a background task.
//!
//! Merges crossterm input with two clocks: a slow tick for spinner
//! animation and a fast render tick. Board changes wake a redraw too.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Animation tick (4 Hz).
    Tick,
    /// Render tick (~30 FPS).
    Render,
    /// A chart container changed.
    BoardChanged,
}

/// Reads terminal events in a background task and sends them over a channel.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Spawn the reader. `board` is the chart board's version channel.
    pub fn new(tick_rate: Duration, render_rate: Duration, mut board: watch::Receiver<u64>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut input = EventStream::new();
            let mut tick = tokio::time::interval(tick_rate);
            let mut render = tokio::time::interval(render_rate);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            render.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut board_open = true;

            loop {
                let event = tokio::select! {
                    () = task_cancel.cancelled() => break,

                    _ = tick.tick() => Event::Tick,

                    _ = render.tick() => Event::Render,

                    changed = board.changed(), if board_open => {
                        if changed.is_err() {
                            board_open = false;
                            continue;
                        }
                        Event::BoardChanged
                    }

                    Some(Ok(raw)) = input.next() => match raw {
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
                        CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
                        _ => continue,
                    },
                };

                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, cancel }
    }

    /// Next event, or `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
