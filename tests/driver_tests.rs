use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use icebreak::core::LevelConfig;
use icebreak::engine::{AnimationDriver, Animator, InstantAnimator, Signal, TurnController, TurnReport};
use icebreak::types::{AnimationIntent, AnimationKind, Direction, Outcome, TurnPhase};

/// Blocking effects finish at once; detached effects never do
struct StallingAnimator;

impl Animator for StallingAnimator {
    fn play(&self, intent: AnimationIntent) -> impl Future<Output = ()> + Send {
        let blocking = intent.is_blocking();
        async move {
            if !blocking {
                std::future::pending::<()>().await;
            }
        }
    }
}

#[derive(Default, Clone)]
struct RecordingAnimator {
    played: Arc<Mutex<Vec<AnimationKind>>>,
}

impl Animator for RecordingAnimator {
    fn play(&self, intent: AnimationIntent) -> impl Future<Output = ()> + Send {
        let played = Arc::clone(&self.played);
        async move {
            tokio::task::yield_now().await;
            played.lock().unwrap().push(intent.kind);
        }
    }
}

fn level(rows: &[&str]) -> TurnController {
    TurnController::new(LevelConfig::literal(rows.iter().copied(), 2), 21).unwrap()
}

#[tokio::test]
async fn stuck_detached_effects_never_block_the_next_turn() {
    let mut game = level(&["0 . . .", ". # . .", ". . . .", ". . . #"]);
    let driver = AnimationDriver::new(StallingAnimator);

    for dir in [Direction::Right, Direction::Down, Direction::Left, Direction::Up] {
        let report = tokio::time::timeout(Duration::from_secs(5), driver.play_turn(&mut game, dir))
            .await
            .expect("turn stalled on a detached effect");
        assert!(!matches!(report, TurnReport::Dropped));
        if game.is_terminal() {
            break;
        }
        assert_eq!(game.phase(), TurnPhase::Idle);
    }
}

#[tokio::test]
async fn winning_turn_plays_both_channels() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut game = level(&["0 # .", ". . .", "0 . ."]);
    game.subscribe(tx);
    let animator = RecordingAnimator::default();
    let driver = AnimationDriver::new(animator.clone());

    let TurnReport::Completed { turn, close } = driver.play_turn(&mut game, Direction::Up).await else {
        panic!("expected a completed turn");
    };
    assert_eq!(turn.blocking.len(), 2);
    assert_eq!(turn.detached.len(), 1);
    assert_eq!(close.phase, TurnPhase::Terminal(Outcome::Won));

    // Let the detached obstacle break finish.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    let mut played = animator.played.lock().unwrap().clone();
    played.sort_by_key(|kind| *kind as u8);
    assert_eq!(
        played,
        vec![AnimationKind::Slide, AnimationKind::MergePop, AnimationKind::ObstacleBreak]
    );

    let mut signals = Vec::new();
    while let Ok(signal) = rx.try_recv() {
        signals.push(signal);
    }
    assert!(matches!(signals.last(), Some(Signal::LevelComplete(_))));

    assert_eq!(driver.play_turn(&mut game, Direction::Down).await, TurnReport::Dropped);
}

#[tokio::test]
async fn no_move_reports_without_touching_the_board() {
    let mut game = level(&["0 # 0", ". . .", ". . ."]);
    let before = game.snapshot();
    let driver = AnimationDriver::new(InstantAnimator);

    assert_eq!(driver.play_turn(&mut game, Direction::Up).await, TurnReport::NoMove);
    assert_eq!(game.snapshot(), before);
}
