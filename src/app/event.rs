//! Terminal input reader.
//!
//! A background task polls crossterm once per frame interval and forwards
//! input over a channel.  When a whole interval passes without input it
//! sends `Tick` so the animation keeps running while the user is idle.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

/// Input and clock events consumed by the main loop.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

impl AppEvent {
    fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            // Release/repeat reports would double every key press.
            CtEvent::Key(k) if k.kind == KeyEventKind::Press => Some(AppEvent::Key(k)),
            CtEvent::Mouse(m) => Some(AppEvent::Mouse(m)),
            CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        }
    }
}

/// Spawn the reader task.  It stops once the receiver is dropped.
pub fn spawn_event_reader(frame: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let next = match event::poll(frame) {
                Ok(true) => match event::read() {
                    Ok(ev) => AppEvent::from_crossterm(ev),
                    Err(e) => {
                        tracing::warn!("reading terminal event: {e}");
                        None
                    }
                },
                Ok(false) => Some(AppEvent::Tick),
                Err(e) => {
                    tracing::warn!("polling terminal: {e}");
                    Some(AppEvent::Tick)
                }
            };
            let Some(next) = next else {
                continue;
            };
            if tx.send(next).is_err() {
                break;
            }
        }
    });

    rx
}
