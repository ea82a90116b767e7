use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::stats::{PlayerId, StatType};
use crate::tracker::TrackerCommand;

/// Demo scorer that types random stat events for the given players.
///
/// The feed starts paused; the owner opens it with `set_accepting` while the
/// tracker takes stats.
pub struct SimFeed {
    accepting: Arc<AtomicBool>,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SimFeed {
    pub fn spawn(players: Vec<PlayerId>, interval: Duration, tx: Sender<TrackerCommand>) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let accepting = Arc::new(AtomicBool::new(false));
        let gate = Arc::clone(&accepting);
        let handle = thread::spawn(move || {
            let mut rng = rand::thread_rng();
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
                if !gate.load(Ordering::Relaxed) {
                    continue;
                }
                let Some(player_id) = players.choose(&mut rng).copied() else {
                    break;
                };
                let stat = random_stat(&mut rng);
                let cmd = TrackerCommand::RecordStat {
                    player_id,
                    stat,
                    value: 1,
                };
                if tx.send(cmd).is_err() {
                    break;
                }
            }
        });
        Self {
            accepting,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn set_accepting(&self, accepting: bool) {
        self.accepting.store(accepting, Ordering::Relaxed);
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::Relaxed)
    }

    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SimFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Rough real-game mix: lots of shots and rebounds, fewer blocks and steals.
pub fn random_stat<R: Rng>(rng: &mut R) -> StatType {
    const WEIGHTED: &[(StatType, u32)] = &[
        (StatType::FieldGoalMade, 14),
        (StatType::FieldGoalMissed, 16),
        (StatType::ThreePointerMade, 5),
        (StatType::ThreePointerMissed, 9),
        (StatType::FreeThrowMade, 7),
        (StatType::FreeThrowMissed, 3),
        (StatType::Rebound, 14),
        (StatType::OffensiveRebound, 4),
        (StatType::Assist, 9),
        (StatType::Steal, 3),
        (StatType::Block, 2),
        (StatType::Turnover, 5),
        (StatType::Foul, 7),
    ];
    let total: u32 = WEIGHTED.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total);
    for (stat, weight) in WEIGHTED {
        if roll < *weight {
            return *stat;
        }
        roll -= weight;
    }
    StatType::Rebound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_only_sends_while_accepting() {
        let (tx, rx) = mpsc::channel();
        let mut feed = SimFeed::spawn(vec![7], Duration::from_millis(5), tx);
        assert!(!feed.is_accepting());
        assert!(rx.recv_timeout(Duration::from_millis(60)).is_err());

        feed.set_accepting(true);
        let cmd = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(cmd, TrackerCommand::RecordStat { player_id: 7, value: 1, .. }));

        feed.set_accepting(false);
        // Drain anything sent before the gate closed.
        while rx.recv_timeout(Duration::from_millis(30)).is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(60)).is_err());
        feed.stop();
    }
}
