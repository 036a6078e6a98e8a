//! Terminal input plus tick and render heartbeats, merged into one channel
//! by a background task.

use std::time::Duration;

use crossterm::event::{Event as TermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// New size as (columns, rows).
    Resize(u16, u16),
    /// Drives spinners and toast expiry.
    Tick,
    /// Time to draw a frame.
    Render,
}

/// Keeps only key presses and resizes. Releases, repeats, mouse, focus and
/// paste events are dropped.
fn translate(event: TermEvent) -> Option<Event> {
    match event {
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        TermEvent::Resize(cols, rows) => Some(Event::Resize(cols, rows)),
        _ => None,
    }
}

fn heartbeat(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Handle on the reader task. Dropping it stops the task.
pub struct EventReader {
    events: mpsc::UnboundedReceiver<Event>,
    shutdown: CancellationToken,
}

impl EventReader {
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        tokio::spawn(async move {
            let mut input = EventStream::new();
            let mut ticks = heartbeat(tick_rate);
            let mut frames = heartbeat(render_rate);

            loop {
                let event = tokio::select! {
                    () = token.cancelled() => break,
                    _ = ticks.tick() => Event::Tick,
                    _ = frames.tick() => Event::Render,
                    next = input.next() => match next {
                        Some(Ok(raw)) => match translate(raw) {
                            Some(event) => event,
                            None => continue,
                        },
                        Some(Err(e)) => {
                            debug!(error = %e, "terminal read failed");
                            continue;
                        }
                        None => break,
                    },
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
            debug!("event reader stopped");
        });

        Self { events, shutdown }
    }

    /// `None` once the reader task has ended.
    pub async fn next(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    pub fn stop(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key(kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn only_presses_become_key_events() {
        let press = key(KeyEventKind::Press);
        assert_eq!(translate(TermEvent::Key(press)), Some(Event::Key(press)));
        assert_eq!(translate(TermEvent::Key(key(KeyEventKind::Release))), None);
        assert_eq!(translate(TermEvent::Key(key(KeyEventKind::Repeat))), None);
    }

    #[test]
    fn resize_passes_through_and_focus_is_dropped() {
        assert_eq!(translate(TermEvent::Resize(120, 40)), Some(Event::Resize(120, 40)));
        assert_eq!(translate(TermEvent::FocusGained), None);
    }
}
