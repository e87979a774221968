//! Headless autoplay runner (default binary).
//!
//! Plays the procedural campaign with a seeded move order and no rendering.
//! Useful for soak runs and for eyeballing the engine's logs:
//!
//! ```text
//! ICEBREAK_SEED=9 ICEBREAK_LOG=icebreak_engine=debug cargo run
//! ```

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use icebreak::core::{LevelProvider, ProceduralLevels, SimpleRng};
use icebreak::engine::{
    AnimationDriver, Animator, DelayAnimator, EngineConfig, TurnController, TurnReport,
};
use icebreak::types::{Direction, Outcome, TurnPhase};

#[tokio::main]
async fn main() -> Result<()> {
    let config = EngineConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter).context("invalid ICEBREAK_LOG")?)
        .with_target(true)
        .init();

    // Detached effects play at twice the blocking time; they never hold a turn.
    let animator = DelayAnimator::new(config.animation, config.animation * 2);
    let driver = AnimationDriver::new(animator);
    let summary = run(&config, &driver).await?;

    info!(
        levels_won = summary.levels_won,
        turns = summary.turns,
        final_level = summary.final_level,
        lost = summary.lost,
        "autoplay finished"
    );
    Ok(())
}

#[derive(Debug, Default)]
struct Summary {
    levels_won: u32,
    turns: u32,
    final_level: u32,
    lost: bool,
}

async fn run<A: Animator>(config: &EngineConfig, driver: &AnimationDriver<A>) -> Result<Summary> {
    let levels = ProceduralLevels::default();
    let mut level = config.start_level;
    let mut controller = TurnController::with_level(level, levels.level(level), config.seed)
        .with_context(|| format!("failed to build level {}", level))?;
    let mut moves = SimpleRng::new(config.seed.wrapping_mul(31).wrapping_add(7));
    let mut summary = Summary {
        final_level: level,
        ..Summary::default()
    };

    while summary.turns < config.max_turns {
        match controller.phase() {
            TurnPhase::Terminal(Outcome::Won) => {
                summary.levels_won += 1;
                level += 1;
                controller
                    .start_level(level, levels.level(level))
                    .with_context(|| format!("failed to build level {}", level))?;
                summary.final_level = level;
                continue;
            }
            TurnPhase::Terminal(Outcome::Lost) => {
                summary.lost = true;
                break;
            }
            _ => {}
        }

        let mut order = Direction::ALL;
        moves.shuffle(&mut order);

        let mut played = false;
        for direction in order {
            match driver.play_turn(&mut controller, direction).await {
                TurnReport::Completed { .. } => {
                    played = true;
                    break;
                }
                TurnReport::NoMove => continue,
                TurnReport::Dropped => {
                    warn!(?direction, "move dropped between turns");
                    break;
                }
            }
        }

        if !played {
            // Empty cells walled off by obstacles keep the board "playable" with no move.
            warn!(level, "no direction moved anything; stopping");
            break;
        }
        summary.turns += 1;
    }

    Ok(summary)
}
