//! Level module - level/mode configuration and initial board construction
//!
//! A level is either procedural (board size, obstacle density, number of
//! starting tiles, all placed with the seeded RNG) or a literal puzzle grid.
//! Configurations are plain serde data so modes can ship them as JSON:
//!
//! ```
//! use icebreak_core::level::{Layout, LevelConfig};
//!
//! let config = LevelConfig::from_json(
//!     r#"{"size":3,"max_colors":2,"layout":{"kind":"literal","rows":["0 # .",". . .",". . 0"]}}"#,
//! )
//! .unwrap();
//! assert!(matches!(config.layout, Layout::Literal { .. }));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::types::{MAX_BOARD_SIZE, MAX_COLOR_ID, MIN_BOARD_SIZE};

/// Reasons a level configuration cannot produce a board
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level layout has no cells")]
    EmptyLayout,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("literal grid is {width}x{height}, expected a {size}x{size} square")]
    NotSquare { size: u8, width: u8, height: u8 },
    #[error("unknown token {token:?} at row {row}, column {column}")]
    UnknownToken {
        token: String,
        row: usize,
        column: usize,
    },
    #[error("colorId {color} exceeds the maximum of {max}", max = MAX_COLOR_ID)]
    ColorOutOfRange { color: u8 },
    #[error("board size {size} outside {min}..={max}", min = MIN_BOARD_SIZE, max = MAX_BOARD_SIZE)]
    SizeOutOfRange { size: usize },
    #[error("max_colors must be in 1..={max}, got {max_colors}", max = MAX_COLOR_ID as u32 + 1)]
    BadColorCount { max_colors: u8 },
    #[error("obstacle density {density} outside [0, 1]")]
    BadDensity { density: f32 },
    #[error("level starts without obstacles")]
    NoObstacles,
    #[error("{needed} cells requested on a board of {available}")]
    Overfull { needed: usize, available: usize },
    #[error("invalid level json: {0}")]
    Json(#[from] serde_json::Error),
}

/// How the starting board is produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    /// Random placement: `round(obstacle_density * cells)` obstacles (at
    /// least one) plus `initial_tiles` tiles
    Procedural {
        obstacle_density: f32,
        initial_tiles: u8,
    },
    /// A fixed puzzle board, in [`Grid::from_rows`] syntax
    Literal { rows: Vec<String> },
}

/// Level/mode configuration handed to the engine before a level starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Board edge length
    pub size: u8,
    /// Spawned tiles draw their colorId from `[0, max_colors)`
    pub max_colors: u8,
    pub layout: Layout,
}

impl LevelConfig {
    pub fn procedural(size: u8, max_colors: u8, obstacle_density: f32, initial_tiles: u8) -> Self {
        Self {
            size,
            max_colors,
            layout: Layout::Procedural {
                obstacle_density,
                initial_tiles,
            },
        }
    }

    /// A puzzle level; `size` is taken from the number of rows
    pub fn literal<S: Into<String>>(rows: impl IntoIterator<Item = S>, max_colors: u8) -> Self {
        let rows: Vec<String> = rows.into_iter().map(Into::into).collect();
        Self {
            size: rows.len().min(u8::MAX as usize) as u8,
            max_colors,
            layout: Layout::Literal { rows },
        }
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the configuration without building a board
    pub fn validate(&self) -> Result<(), LevelError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.size) {
            return Err(LevelError::SizeOutOfRange {
                size: self.size as usize,
            });
        }
        if self.max_colors == 0 || self.max_colors > MAX_COLOR_ID + 1 {
            return Err(LevelError::BadColorCount {
                max_colors: self.max_colors,
            });
        }
        if let Layout::Procedural {
            obstacle_density, ..
        } = self.layout
        {
            if !(0.0..=1.0).contains(&obstacle_density) {
                return Err(LevelError::BadDensity {
                    density: obstacle_density,
                });
            }
        }
        Ok(())
    }

    /// Build the starting board for this level
    pub fn build(&self, rng: &mut SimpleRng) -> Result<Grid, LevelError> {
        self.validate()?;
        let grid = match &self.layout {
            Layout::Literal { rows } => {
                let grid = Grid::from_rows(rows.as_slice())?;
                if grid.width() != self.size || grid.height() != self.size {
                    return Err(LevelError::NotSquare {
                        size: self.size,
                        width: grid.width(),
                        height: grid.height(),
                    });
                }
                grid
            }
            Layout::Procedural {
                obstacle_density,
                initial_tiles,
            } => self.scatter(*obstacle_density, *initial_tiles, rng)?,
        };

        if grid.obstacles_remaining() == 0 {
            return Err(LevelError::NoObstacles);
        }
        tracing::debug!(
            size = self.size,
            obstacles = grid.obstacles_remaining(),
            empty = grid.count_empty(),
            "level board built"
        );
        Ok(grid)
    }

    fn scatter(&self, density: f32, initial_tiles: u8, rng: &mut SimpleRng) -> Result<Grid, LevelError> {
        let mut grid = Grid::square(self.size);
        let cells = grid.len();
        let obstacles = ((cells as f32 * density).round() as usize).max(1);
        // One cell always stays open so the first turn has somewhere to go.
        let needed = obstacles + initial_tiles as usize + 1;
        if needed > cells {
            return Err(LevelError::Overfull {
                needed,
                available: cells,
            });
        }

        let mut open: Vec<_> = grid.coords().collect();
        rng.shuffle(&mut open);
        let mut open = open.into_iter();

        for at in open.by_ref().take(obstacles) {
            grid.place_obstacle(at);
        }
        for at in open.take(initial_tiles as usize) {
            let color = rng.next_below(self.max_colors as u32) as u8;
            grid.place_tile(at, color);
        }
        Ok(grid)
    }
}

/// Supplies the configuration for each level number (1-based)
pub trait LevelProvider {
    fn level(&self, number: u32) -> LevelConfig;
}

/// Built-in progression: boards grow and obstacles thicken as levels advance
///
/// | Level | Size | Colors | Density |
/// |-------|------|--------|---------|
/// | 1     | 4    | 2      | 0.125   |
/// | 4     | 5    | 3      | 0.17    |
/// | 7     | 6    | 4      | 0.22    |
/// | 10+   | 7    | 5      | 0.25 (cap) |
#[derive(Debug, Clone, PartialEq)]
pub struct ProceduralLevels {
    pub base_size: u8,
    pub max_size: u8,
    pub base_colors: u8,
    pub max_colors: u8,
    pub base_density: f32,
    pub density_step: f32,
    pub max_density: f32,
    pub initial_tiles: u8,
}

impl Default for ProceduralLevels {
    fn default() -> Self {
        Self {
            base_size: 4,
            max_size: 7,
            base_colors: 2,
            max_colors: 5,
            base_density: 0.125,
            density_step: 0.015,
            max_density: 0.25,
            initial_tiles: 2,
        }
    }
}

impl LevelProvider for ProceduralLevels {
    fn level(&self, number: u32) -> LevelConfig {
        let step = number.saturating_sub(1);
        let tier = (step / 3).min(u8::MAX as u32) as u8;
        let size = self.base_size.saturating_add(tier).min(self.max_size);
        let colors = self.base_colors.saturating_add(tier).min(self.max_colors);
        let density = (self.base_density + self.density_step * step as f32).min(self.max_density);
        LevelConfig::procedural(size, colors, density, self.initial_tiles)
    }
}

/// A fixed list of levels, e.g. a puzzle pack; numbers past the end wrap around
#[derive(Debug, Clone, PartialEq)]
pub struct LevelPack {
    levels: Vec<LevelConfig>,
}

impl LevelPack {
    pub fn new(levels: Vec<LevelConfig>) -> Self {
        assert!(!levels.is_empty(), "a level pack needs at least one level");
        Self { levels }
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
        if levels.is_empty() {
            return Err(LevelError::EmptyLayout);
        }
        Ok(Self { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl LevelProvider for LevelPack {
    fn level(&self, number: u32) -> LevelConfig {
        let idx = number.saturating_sub(1) as usize % self.levels.len();
        self.levels[idx].clone()
    }
}
