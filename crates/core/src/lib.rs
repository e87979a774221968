//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the grid-merge game: how tiles slide and
//! merge, how merges shatter neighbouring obstacles, how new tiles spawn,
//! and when a level is lost. It has **no** knowledge of rendering, audio,
//! storage or networking:
//!
//! - **Deterministic**: the same seed, level and moves reproduce the same game
//! - **Pure**: resolvers and evaluators take a grid reference and return decisions
//! - **Testable**: every rule is exercised by unit tests next to it
//!
//! # Module Structure
//!
//! - [`grid`]: the board of cells and the live obstacle counter
//! - [`resolver`]: per-tile destinations and merges for one direction
//! - [`obstacles`]: obstacle removal around a merge
//! - [`spawn`]: one random tile after a turn that moved something
//! - [`terminal`]: no-moves-left detection
//! - [`level`]: level configuration, procedural and literal boards
//! - [`rng`]: seeded LCG shared by spawn and level layout
//! - [`snapshot`]: serialisable read-only view with a stable board hash
//!
//! # Example
//!
//! ```
//! use icebreak_core::{resolve, Grid};
//! use icebreak_core::resolver::apply_decision;
//! use icebreak_core::types::Direction;
//!
//! let mut grid = Grid::from_rows(&["0 0 #", ". . .", ". . ."]).unwrap();
//! let outcome = resolve(&grid, Direction::Left);
//! assert!(outcome.moved());
//! for decision in &outcome.decisions {
//!     apply_decision(&mut grid, decision);
//! }
//! assert_eq!(grid.get(0, 0).tile().map(|t| t.value), Some(4));
//! ```

pub mod grid;
pub mod level;
pub mod obstacles;
pub mod resolver;
pub mod rng;
pub mod snapshot;
pub mod spawn;
pub mod terminal;

pub use icebreak_types as types;

// Re-export commonly used types for convenience
pub use grid::Grid;
pub use level::{Layout, LevelConfig, LevelError, LevelPack, LevelProvider, ProceduralLevels};
pub use obstacles::{break_adjacent, ObstacleBreak};
pub use resolver::{resolve, MoveDecision, MoveOutcome};
pub use rng::SimpleRng;
pub use snapshot::{board_hash, GridSnapshot};
pub use spawn::{SpawnEvent, SpawnPolicy};
pub use terminal::{evaluate, Verdict};
