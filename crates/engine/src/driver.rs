//! Animation driver - runs a turn's intents on tokio.
//!
//! Blocking intents are spawned as concurrent tasks and joined before the
//! turn is allowed to close. Detached intents (obstacle breaks, spawns) are
//! spawned and forgotten: a slow or stuck detached effect never delays the
//! next turn.
//!
//! Must be used from inside a tokio runtime.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::controller::{Submit, Turn, TurnClose, TurnController};
use crate::types::{AnimationIntent, Direction};

/// Presentation hook that plays one animation intent.
///
/// The returned future resolving means the effect finished.
pub trait Animator: Send + Sync + 'static {
    fn play(&self, intent: AnimationIntent) -> impl Future<Output = ()> + Send;
}

/// Completes every intent immediately (headless play, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantAnimator;

impl Animator for InstantAnimator {
    fn play(&self, _intent: AnimationIntent) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }
}

/// Sleeps a fixed time per intent, by channel
#[derive(Debug, Clone, Copy)]
pub struct DelayAnimator {
    pub blocking: Duration,
    pub detached: Duration,
}

impl DelayAnimator {
    pub fn new(blocking: Duration, detached: Duration) -> Self {
        Self { blocking, detached }
    }
}

impl Animator for DelayAnimator {
    fn play(&self, intent: AnimationIntent) -> impl Future<Output = ()> + Send {
        let delay = if intent.is_blocking() {
            self.blocking
        } else {
            self.detached
        };
        tokio::time::sleep(delay)
    }
}

/// Outcome of one [`AnimationDriver::play_turn`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnReport {
    Dropped,
    NoMove,
    Completed { turn: Turn, close: TurnClose },
}

impl TurnReport {
    pub fn is_completed(&self) -> bool {
        matches!(self, TurnReport::Completed { .. })
    }
}

pub struct AnimationDriver<A: Animator> {
    animator: Arc<A>,
}

impl<A: Animator> AnimationDriver<A> {
    pub fn new(animator: A) -> Self {
        Self {
            animator: Arc::new(animator),
        }
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    /// Submit `direction`, play its intents and close the turn.
    ///
    /// Holding `&mut TurnController` for the whole turn is what keeps a
    /// second move from starting before the barrier releases.
    pub async fn play_turn(&self, controller: &mut TurnController, direction: Direction) -> TurnReport {
        let turn = match controller.submit_move(direction) {
            Submit::Dropped => return TurnReport::Dropped,
            Submit::NoMove => return TurnReport::NoMove,
            Submit::Started(turn) => turn,
        };

        for intent in &turn.detached {
            self.detach(*intent);
        }

        let handles: Vec<_> = turn
            .blocking
            .iter()
            .map(|intent| {
                let animator = Arc::clone(&self.animator);
                let intent = *intent;
                (intent.id, tokio::spawn(async move { animator.play(intent).await }))
            })
            .collect();

        let mut close = None;
        for (id, handle) in handles {
            if let Err(err) = handle.await {
                // A crashed effect still counts as finished; the board is already settled.
                warn!(?id, %err, "blocking animation task failed");
            }
            if let Some(done) = controller.complete_animation(id) {
                close = Some(done);
            }
        }

        let Some(close) = close else {
            // Every blocking id was reported above, so the barrier has released.
            unreachable!("turn {} did not close after its barrier", turn.number);
        };

        for intent in &close.detached {
            self.detach(*intent);
        }
        debug!(turn = close.number, phase = close.phase.as_str(), "turn closed");

        TurnReport::Completed { turn, close }
    }

    fn detach(&self, intent: AnimationIntent) {
        let animator = Arc::clone(&self.animator);
        tokio::spawn(async move { animator.play(intent).await });
    }
}
