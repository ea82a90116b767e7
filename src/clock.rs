use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::tracker::TrackerCommand;

/// Background ticker that sends one `TrackerCommand::Tick` per interval.
///
/// Every tick carries the generation it was started with; the tracker drops ticks
/// whose generation is no longer current, so nothing queued before `stop` is applied.
pub struct GameClock {
    generation: u64,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl GameClock {
    pub fn start(interval: Duration, generation: u64, tx: Sender<TrackerCommand>) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if tx.send(TrackerCommand::Tick { generation }).is_err() {
                            break;
                        }
                    }
                    // Explicit stop or the owning clock was dropped.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            tracing::debug!(generation, "game clock worker exited");
        });
        Self {
            generation,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }

    /// Stops the worker and waits for it to exit. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!(generation = self.generation, "game clock worker panicked");
            }
        }
    }
}

impl Drop for GameClock {
    fn drop(&mut self) {
        self.stop();
    }
}
