//! Presentation signals.
//!
//! Observers are notified synchronously from inside the controller. No
//! ordering between observers is promised.

use crate::types::Stats;

/// Signals a presentation layer can subscribe to
pub trait EngineObserver {
    /// Obstacle count or level changed
    fn stats_changed(&mut self, _stats: Stats) {}

    /// No legal move remains while obstacles are left
    fn game_over(&mut self, _stats: Stats) {}

    /// The last obstacle of the level was cleared
    fn level_complete(&mut self, _stats: Stats) {}
}

/// Channel form of the observer callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    StatsChanged(Stats),
    GameOver(Stats),
    LevelComplete(Stats),
}

impl EngineObserver for std::sync::mpsc::Sender<Signal> {
    fn stats_changed(&mut self, stats: Stats) {
        let _ = self.send(Signal::StatsChanged(stats));
    }

    fn game_over(&mut self, stats: Stats) {
        let _ = self.send(Signal::GameOver(stats));
    }

    fn level_complete(&mut self, stats: Stats) {
        let _ = self.send(Signal::LevelComplete(stats));
    }
}

impl EngineObserver for tokio::sync::mpsc::UnboundedSender<Signal> {
    fn stats_changed(&mut self, stats: Stats) {
        let _ = self.send(Signal::StatsChanged(stats));
    }

    fn game_over(&mut self, stats: Stats) {
        let _ = self.send(Signal::GameOver(stats));
    }

    fn level_complete(&mut self, stats: Stats) {
        let _ = self.send(Signal::LevelComplete(stats));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_sender_forwards_signals() {
        let (mut tx, rx) = std::sync::mpsc::channel();
        let stats = Stats {
            obstacles_remaining: 2,
            level: 1,
        };
        tx.stats_changed(stats);
        tx.game_over(stats);
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![Signal::StatsChanged(stats), Signal::GameOver(stats)]
        );
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (mut tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        tx.level_complete(Stats::default());
    }
}
