use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent};
use futures::StreamExt;
use tokio::sync::{mpsc, watch};

use crate::system::snapshot::Snapshot;

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Snapshot(Box<Snapshot>),
    Resize,
}

fn from_terminal(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) => Some(Event::Key(key)),
        CrosstermEvent::Resize(_, _) => Some(Event::Resize),
        _ => None,
    }
}

/// Merges terminal input with sampler output into one stream for the UI loop.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(mut snapshots: watch::Receiver<Option<Snapshot>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();

        let task = tokio::spawn(async move {
            let mut terminal = EventStream::new();
            let mut sampler_alive = true;

            loop {
                let next = tokio::select! {
                    input = terminal.next() => match input {
                        Some(Ok(evt)) => from_terminal(evt),
                        // Input stream closed or broken: nothing left to drive the UI.
                        Some(Err(_)) | None => break,
                    },
                    changed = snapshots.changed(), if sampler_alive => {
                        if changed.is_err() {
                            // Sampler dropped; keep serving keys so the user can quit.
                            sampler_alive = false;
                            continue;
                        }
                        // Only the newest value matters; older ones are already stale.
                        snapshots
                            .borrow_and_update()
                            .clone()
                            .map(|snapshot| Event::Snapshot(Box::new(snapshot)))
                    }
                };

                if let Some(event) = next
                    && tx.send(event).is_err()
                {
                    break;
                }
            }
        });

        Self { rx, _task: task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
