//! Turn engine - sequencing, signals and animation timing
//!
//! This crate drives the pure rules in `icebreak-core` through complete
//! turns. It owns the board, enforces one turn in flight at a time, and
//! splits the visual work of each turn into two channels:
//!
//! - **blocking** intents (tile slides, merge pops) that must finish before
//!   the turn can close
//! - **detached** intents (obstacle breaks, spawns) that are played
//!   fire-and-forget
//!
//! # Module Structure
//!
//! - [`controller`]: the `Idle → Resolving → AwaitingAnimations → Idle | Terminal` state machine
//! - [`observer`]: stats-changed, game-over and level-complete signals
//! - [`driver`]: tokio runner that joins blocking intents and detaches the rest
//! - [`config`]: environment configuration for runners
//!
//! # Example
//!
//! ```
//! use icebreak_engine::{Submit, TurnController};
//! use icebreak_engine::core::LevelConfig;
//! use icebreak_engine::types::{Direction, TurnPhase};
//!
//! let config = LevelConfig::literal(["0 0 .", ". # .", ". . ."], 2);
//! let mut game = TurnController::new(config, 7).unwrap();
//!
//! let Submit::Started(turn) = game.submit_move(Direction::Left) else {
//!     panic!("tiles should move");
//! };
//! assert!(game.is_turn_in_flight());
//!
//! // The presentation layer reports each blocking effect as it finishes.
//! let mut close = None;
//! for intent in &turn.blocking {
//!     close = game.complete_animation(intent.id);
//! }
//! assert_eq!(close.unwrap().phase, TurnPhase::Idle);
//! ```

pub mod config;
pub mod controller;
pub mod driver;
pub mod observer;

pub use icebreak_core as core;
pub use icebreak_types as types;

pub use config::EngineConfig;
pub use controller::{Submit, Turn, TurnClose, TurnController};
pub use driver::{AnimationDriver, Animator, DelayAnimator, InstantAnimator, TurnReport};
pub use observer::{EngineObserver, Signal};
