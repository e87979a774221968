//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be
//! used anywhere (rules, turn control, presentation bindings).
//!
//! # Coordinates
//!
//! Cells are addressed as `(x, z)`: `x` grows to the right, `z` grows
//! downward. Directions map to unit vectors:
//!
//! | Direction | (dx, dz) |
//! |-----------|----------|
//! | Up        | (0, -1)  |
//! | Down      | (0, 1)   |
//! | Left      | (-1, 0)  |
//! | Right     | (1, 0)   |
//!
//! # Tile values
//!
//! A tile's value is always `2 << color`: colorId 0 is worth 2, colorId 1 is
//! worth 4, and so on. Merging two tiles of colorId `c` yields one tile of
//! colorId `c + 1`.
//!
//! # Examples
//!
//! ```
//! use icebreak_types::{Direction, Tile, TileId};
//!
//! assert_eq!(Direction::Right.delta(), (1, 0));
//! assert_eq!(Direction::from_str("UP"), Some(Direction::Up));
//!
//! let tile = Tile::new(TileId(7), 2);
//! assert_eq!(tile.value, 8);
//! ```

/// Smallest supported board edge length
pub const MIN_BOARD_SIZE: u8 = 2;

/// Largest supported board edge length
pub const MAX_BOARD_SIZE: u8 = 16;

/// Highest colorId a tile may carry (`2 << 30` still fits in a `u32`).
/// Tiles at this colorId are final: they never merge.
pub const MAX_COLOR_ID: u8 = 30;

/// Value of a colorId 0 tile
pub const BASE_TILE_VALUE: u32 = 2;

/// Value of a tile with the given colorId
#[inline]
pub const fn tile_value(color: u8) -> u32 {
    BASE_TILE_VALUE << color
}

/// The four slide directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in a fixed order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector `(dx, dz)` for this direction
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Inverse of [`Direction::delta`]; `None` for anything but a unit vector
    pub fn from_delta(dx: i8, dz: i8) -> Option<Self> {
        match (dx, dz) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }

    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "up" | "u", "down" | "d",
    /// "left" | "l", "right" | "r"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// A cell coordinate on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: u8,
    pub z: u8,
}

impl Coord {
    pub const fn new(x: u8, z: u8) -> Self {
        Self { x, z }
    }
}

/// Stable identity of a tile within one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

/// A movable grid occupant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub color: u8,
    pub value: u32,
    /// Set once the tile has absorbed another tile this turn
    pub merging: bool,
}

impl Tile {
    /// Create a tile whose value matches its colorId
    pub fn new(id: TileId, color: u8) -> Self {
        Self {
            id,
            color,
            value: tile_value(color),
            merging: false,
        }
    }
}

/// One board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Tile(Tile),
    Obstacle,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self, Cell::Obstacle)
    }

    pub fn tile(&self) -> Option<&Tile> {
        match self {
            Cell::Tile(tile) => Some(tile),
            _ => None,
        }
    }
}

/// How a level ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Every obstacle was cleared
    Won,
    /// No legal move remains
    Lost,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Won => "won",
            Outcome::Lost => "lost",
        }
    }
}

/// Turn controller states
///
/// `Idle → Resolving → AwaitingAnimations → Idle | Terminal(_)`.
/// A no-op direction goes straight from `Resolving` back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    Idle,
    Resolving,
    AwaitingAnimations,
    Terminal(Outcome),
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::Resolving => "resolving",
            TurnPhase::AwaitingAnimations => "awaiting_animations",
            TurnPhase::Terminal(Outcome::Won) => "won",
            TurnPhase::Terminal(Outcome::Lost) => "lost",
        }
    }
}

/// Identity of one emitted animation intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntentId(pub u32);

/// Kinds of visual effect the engine asks the presentation layer for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// Tile translation from `from` to `to`
    Slide,
    /// Surviving tile of a merge, at `to`
    MergePop,
    /// Obstacle removed at `from`
    ObstacleBreak,
    /// New tile appeared at `to`
    Spawn,
}

impl AnimationKind {
    /// Blocking intents gate the end of a turn; the rest are fire-and-forget.
    pub fn is_blocking(&self) -> bool {
        matches!(self, AnimationKind::Slide | AnimationKind::MergePop)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationKind::Slide => "slide",
            AnimationKind::MergePop => "merge_pop",
            AnimationKind::ObstacleBreak => "obstacle_break",
            AnimationKind::Spawn => "spawn",
        }
    }
}

/// A request for the presentation layer to play one effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationIntent {
    pub id: IntentId,
    pub kind: AnimationKind,
    /// Tile the effect belongs to (`None` for obstacle breaks)
    pub tile: Option<TileId>,
    pub from: Coord,
    pub to: Coord,
    /// ColorId to theme the effect with
    pub color: Option<u8>,
}

impl AnimationIntent {
    pub fn is_blocking(&self) -> bool {
        self.kind.is_blocking()
    }
}

/// Values carried by every presentation signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Stats {
    pub obstacles_remaining: u32,
    pub level: u32,
}
