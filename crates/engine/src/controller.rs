//! Turn controller - the state machine that sequences one turn
//!
//! ```text
//!            submit_move                 nothing moved
//!   Idle ──────────────▶ Resolving ─────────────────────▶ Idle
//!    ▲                       │ moved: decisions applied,
//!    │                       │ obstacles broken
//!    │                       ▼
//!    │              AwaitingAnimations
//!    │                       │ last blocking intent completed
//!    │                       ▼
//!    │      obstacles == 0 ──▶ Terminal(Won)
//!    └── playable ◀── spawn + evaluate ──▶ Terminal(Lost)
//! ```
//!
//! The controller exclusively owns the grid. All mutation for a turn happens
//! inside [`TurnController::submit_move`] (moves, merges, obstacle breaks)
//! and [`TurnController::complete_animation`] (spawn, terminal check), so a
//! reader never sees a half-resolved board.
//!
//! Blocking intents (slides and merge pops) form the completion barrier.
//! Obstacle-break and spawn intents are handed out for fire-and-forget
//! playback and are never waited on.

use tracing::{debug, info, warn};

use crate::core::resolver::apply_decision;
use crate::core::{
    break_adjacent, evaluate, resolve, Grid, GridSnapshot, LevelConfig, LevelError, MoveDecision,
    ObstacleBreak, SimpleRng, SpawnEvent, SpawnPolicy, Verdict,
};
use crate::observer::EngineObserver;
use crate::types::{
    AnimationIntent, AnimationKind, Coord, Direction, IntentId, Outcome, Stats, TileId, TurnPhase,
};

/// Everything one accepted direction produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub number: u32,
    pub direction: Direction,
    /// Applied decisions, in resolution order
    pub decisions: Vec<MoveDecision>,
    pub breaks: Vec<ObstacleBreak>,
    /// Slide and merge-pop intents; the turn closes once all have completed
    pub blocking: Vec<AnimationIntent>,
    /// Obstacle-break intents; never awaited
    pub detached: Vec<AnimationIntent>,
}

/// What happened when the barrier released
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnClose {
    pub number: u32,
    pub spawn: Option<SpawnEvent>,
    /// Spawn intent, if any; never awaited
    pub detached: Vec<AnimationIntent>,
    /// Phase the controller settled in
    pub phase: TurnPhase,
}

/// Result of [`TurnController::submit_move`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submit {
    /// A turn is in flight or the level is over
    Dropped,
    /// Nothing could move in that direction; no spawn, no obstacle check
    NoMove,
    Started(Turn),
}

pub struct TurnController {
    grid: Grid,
    config: LevelConfig,
    level: u32,
    spawner: SpawnPolicy,
    phase: TurnPhase,
    /// Blocking intents still outstanding for the current turn
    pending: Vec<IntentId>,
    next_intent: u32,
    turn: u32,
    episode_id: u32,
    seed: u32,
    observers: Vec<Box<dyn EngineObserver + Send>>,
}

impl std::fmt::Debug for TurnController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnController")
            .field("level", &self.level)
            .field("phase", &self.phase)
            .field("turn", &self.turn)
            .field("pending", &self.pending)
            .field("obstacles_remaining", &self.grid.obstacles_remaining())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl TurnController {
    /// Build level 1 from `config`, seeding every random choice with `seed`
    pub fn new(config: LevelConfig, seed: u32) -> Result<Self, LevelError> {
        Self::with_level(1, config, seed)
    }

    /// Build an arbitrary level number
    pub fn with_level(level: u32, config: LevelConfig, seed: u32) -> Result<Self, LevelError> {
        let mut rng = SimpleRng::new(seed);
        let grid = config.build(&mut rng)?;
        let spawner = SpawnPolicy::new(rng, config.max_colors);
        let mut controller = Self {
            grid,
            config,
            level,
            spawner,
            phase: TurnPhase::Idle,
            pending: Vec::new(),
            next_intent: 0,
            turn: 0,
            episode_id: 0,
            seed,
            observers: Vec::new(),
        };
        controller.settle_initial_phase();
        info!(level, seed, obstacles = controller.grid.obstacles_remaining(), "level started");
        Ok(controller)
    }

    /// Register a presentation observer
    pub fn subscribe(&mut self, observer: impl EngineObserver + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Replace the board with a new level.
    ///
    /// On error nothing changes, the RNG included. Layout randomness
    /// continues from the controller's RNG so a seeded campaign stays
    /// reproducible.
    pub fn start_level(&mut self, level: u32, config: LevelConfig) -> Result<(), LevelError> {
        let grid = self.build_committed(&config)?;
        self.spawner.set_max_colors(config.max_colors);
        self.grid = grid;
        self.config = config;
        self.level = level;
        self.reset_turn_state();
        info!(level, obstacles = self.grid.obstacles_remaining(), "level started");
        self.emit_stats();
        self.settle_initial_phase();
        Ok(())
    }

    /// Rebuild the current level as a new episode
    pub fn restart(&mut self) -> Result<(), LevelError> {
        let config = self.config.clone();
        let grid = self.build_committed(&config)?;
        self.grid = grid;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.reset_turn_state();
        info!(level = self.level, episode = self.episode_id, "level restarted");
        self.emit_stats();
        self.settle_initial_phase();
        Ok(())
    }

    /// Build on a copy of the RNG and keep the advanced state only on success
    fn build_committed(&mut self, config: &LevelConfig) -> Result<Grid, LevelError> {
        let mut rng = self.spawner.rng_mut().clone();
        let grid = config.build(&mut rng)?;
        *self.spawner.rng_mut() = rng;
        Ok(grid)
    }

    fn reset_turn_state(&mut self) {
        self.phase = TurnPhase::Idle;
        self.pending.clear();
        self.turn = 0;
    }

    /// A board that starts with no legal move is lost before the first turn
    fn settle_initial_phase(&mut self) {
        if evaluate(&self.grid) == Verdict::Lost {
            self.phase = TurnPhase::Terminal(Outcome::Lost);
            info!(level = self.level, "level starts without a legal move");
            self.emit_game_over();
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Read-only view of the board
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    /// Number of turns that moved something this episode
    pub fn turn_number(&self) -> u32 {
        self.turn
    }

    pub fn obstacles_remaining(&self) -> u32 {
        self.grid.obstacles_remaining()
    }

    pub fn is_turn_in_flight(&self) -> bool {
        matches!(self.phase, TurnPhase::Resolving | TurnPhase::AwaitingAnimations)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, TurnPhase::Terminal(_))
    }

    /// Blocking intents the current turn is still waiting for
    pub fn pending_animations(&self) -> &[IntentId] {
        &self.pending
    }

    pub fn stats(&self) -> Stats {
        Stats {
            obstacles_remaining: self.grid.obstacles_remaining(),
            level: self.level,
        }
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            level: self.level,
            episode_id: self.episode_id,
            turn: self.turn,
            seed: self.seed,
            phase: self.phase.as_str().to_string(),
            ..GridSnapshot::from_grid(&self.grid)
        }
    }

    /// Start a turn in `direction`.
    ///
    /// Commands are dropped unless the controller is `Idle`.
    pub fn submit_move(&mut self, direction: Direction) -> Submit {
        if self.phase != TurnPhase::Idle {
            debug!(?direction, phase = self.phase.as_str(), "move dropped");
            return Submit::Dropped;
        }

        self.phase = TurnPhase::Resolving;
        self.grid.reset_merge_flags();
        let outcome = resolve(&self.grid, direction);
        if !outcome.moved() {
            self.phase = TurnPhase::Idle;
            debug!(?direction, "nothing moved");
            return Submit::NoMove;
        }

        self.turn = self.turn.wrapping_add(1);
        let obstacles_before = self.grid.obstacles_remaining();
        let mut turn = Turn {
            number: self.turn,
            direction,
            decisions: Vec::with_capacity(outcome.decisions.len()),
            breaks: Vec::new(),
            blocking: Vec::with_capacity(outcome.decisions.len()),
            detached: Vec::new(),
        };

        for decision in outcome.decisions {
            let color = self.grid.at(decision.from).tile().map(|t| t.color);
            let merged = apply_decision(&mut self.grid, &decision);

            let slide = self.intent(
                AnimationKind::Slide,
                Some(decision.tile),
                decision.from,
                decision.to,
                color,
            );
            turn.blocking.push(slide);

            if let Some(tile) = merged {
                let pop = self.intent(
                    AnimationKind::MergePop,
                    Some(tile.id),
                    decision.to,
                    decision.to,
                    Some(tile.color),
                );
                turn.blocking.push(pop);

                for broken in break_adjacent(&mut self.grid, decision.to, tile.color) {
                    let effect = self.intent(
                        AnimationKind::ObstacleBreak,
                        None,
                        broken.at,
                        broken.at,
                        Some(broken.color),
                    );
                    turn.detached.push(effect);
                    turn.breaks.push(broken);
                }
            }
            turn.decisions.push(decision);
        }

        self.pending = turn.blocking.iter().map(|intent| intent.id).collect();
        self.phase = TurnPhase::AwaitingAnimations;
        debug!(
            turn = turn.number,
            ?direction,
            moves = turn.decisions.len(),
            merges = turn.decisions.iter().filter(|d| d.is_merge()).count(),
            breaks = turn.breaks.len(),
            "turn resolved"
        );

        if self.grid.obstacles_remaining() != obstacles_before {
            self.emit_stats();
        }
        Submit::Started(turn)
    }

    /// Report that a blocking intent finished playing.
    ///
    /// Returns the turn close once the last outstanding blocking intent is
    /// reported. Unknown, repeated and non-blocking ids are ignored.
    pub fn complete_animation(&mut self, id: IntentId) -> Option<TurnClose> {
        if self.phase != TurnPhase::AwaitingAnimations {
            warn!(?id, phase = self.phase.as_str(), "animation completion outside a turn");
            return None;
        }
        let Some(pos) = self.pending.iter().position(|pending| *pending == id) else {
            warn!(?id, "completion for an intent the turn is not waiting on");
            return None;
        };
        self.pending.swap_remove(pos);
        if !self.pending.is_empty() {
            return None;
        }
        Some(self.close_turn())
    }

    /// Mark every outstanding blocking intent complete (headless play)
    pub fn complete_all(&mut self) -> Option<TurnClose> {
        let pending = std::mem::take(&mut self.pending);
        let last = *pending.last()?;
        self.pending = vec![last];
        self.complete_animation(last)
    }

    fn close_turn(&mut self) -> TurnClose {
        let number = self.turn;

        if self.grid.obstacles_remaining() == 0 {
            self.phase = TurnPhase::Terminal(Outcome::Won);
            info!(level = self.level, turn = number, "level complete");
            self.emit_level_complete();
            return TurnClose {
                number,
                spawn: None,
                detached: Vec::new(),
                phase: self.phase,
            };
        }

        let spawn = self.spawner.spawn(&mut self.grid);
        let detached: Vec<_> = spawn
            .map(|event| {
                self.intent(
                    AnimationKind::Spawn,
                    Some(event.tile),
                    event.at,
                    event.at,
                    Some(event.color),
                )
            })
            .into_iter()
            .collect();

        self.phase = match evaluate(&self.grid) {
            Verdict::Playable => TurnPhase::Idle,
            Verdict::Lost => {
                info!(level = self.level, turn = number, "no legal move left");
                TurnPhase::Terminal(Outcome::Lost)
            }
        };
        if self.phase == TurnPhase::Terminal(Outcome::Lost) {
            self.emit_game_over();
        }

        TurnClose {
            number,
            spawn,
            detached,
            phase: self.phase,
        }
    }

    fn intent(
        &mut self,
        kind: AnimationKind,
        tile: Option<TileId>,
        from: Coord,
        to: Coord,
        color: Option<u8>,
    ) -> AnimationIntent {
        let id = IntentId(self.next_intent);
        self.next_intent = self.next_intent.wrapping_add(1);
        AnimationIntent {
            id,
            kind,
            tile,
            from,
            to,
            color,
        }
    }

    fn emit_stats(&mut self) {
        let stats = self.stats();
        for observer in &mut self.observers {
            observer.stats_changed(stats);
        }
    }

    fn emit_game_over(&mut self) {
        let stats = self.stats();
        for observer in &mut self.observers {
            observer.game_over(stats);
        }
    }

    fn emit_level_complete(&mut self) {
        let stats = self.stats();
        for observer in &mut self.observers {
            observer.level_complete(stats);
        }
    }
}
