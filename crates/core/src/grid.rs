//! Grid module - the board of cells and its obstacle counter
//!
//! The grid is a `width x height` array of [`Cell`]s stored row-major
//! (`z * width + x`). Levels are always square; rectangular grids exist so
//! single-row rule fixtures can be written directly.
//!
//! Every accessor that takes a coordinate treats an out-of-range value as a
//! caller bug and panics. Use [`Grid::try_get`] or [`Grid::neighbor`] to
//! probe positions that may fall off the board.
//!
//! `obstacles_remaining` always equals the number of [`Cell::Obstacle`]
//! cells; every mutation path keeps it in sync.

use crate::level::LevelError;
use crate::types::{tile_value, Cell, Coord, Direction, Tile, TileId, MAX_BOARD_SIZE, MAX_COLOR_ID};

/// Snapshot code for an empty cell
pub const CODE_EMPTY: u8 = 0;

/// Snapshot code for an obstacle
pub const CODE_OBSTACLE: u8 = u8::MAX;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: u8,
    height: u8,
    cells: Vec<Cell>,
    obstacles_remaining: u32,
    next_tile_id: u32,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: u8, height: u8) -> Self {
        assert!(
            (1..=MAX_BOARD_SIZE).contains(&width) && (1..=MAX_BOARD_SIZE).contains(&height),
            "grid dimensions {}x{} outside 1..={}",
            width,
            height,
            MAX_BOARD_SIZE
        );
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width as usize * height as usize],
            obstacles_remaining: 0,
            next_tile_id: 0,
        }
    }

    /// Create an empty square grid
    pub fn square(size: u8) -> Self {
        Self::new(size, size)
    }

    /// Build a grid from text rows.
    ///
    /// Rows are whitespace-separated tokens: `.` empty, `#` obstacle, a
    /// decimal number for a tile of that colorId. The first row is `z = 0`.
    ///
    /// ```
    /// use icebreak_core::Grid;
    ///
    /// let grid = Grid::from_rows(&["0 # .", ". . 1"]).unwrap();
    /// assert_eq!(grid.width(), 3);
    /// assert_eq!(grid.obstacles_remaining(), 1);
    /// ```
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LevelError> {
        if rows.is_empty() {
            return Err(LevelError::EmptyLayout);
        }
        let parsed: Vec<Vec<&str>> = rows
            .iter()
            .map(|row| row.as_ref().split_whitespace().collect())
            .collect();

        let width = parsed[0].len();
        if width == 0 {
            return Err(LevelError::EmptyLayout);
        }
        if let Some((row, tokens)) = parsed.iter().enumerate().find(|(_, t)| t.len() != width) {
            return Err(LevelError::RaggedRow {
                row,
                expected: width,
                found: tokens.len(),
            });
        }
        let max = MAX_BOARD_SIZE as usize;
        if width > max || parsed.len() > max {
            return Err(LevelError::SizeOutOfRange {
                size: width.max(parsed.len()),
            });
        }

        let mut grid = Self::new(width as u8, parsed.len() as u8);
        for (z, tokens) in parsed.iter().enumerate() {
            for (x, token) in tokens.iter().enumerate() {
                let at = Coord::new(x as u8, z as u8);
                match *token {
                    "." => {}
                    "#" => grid.place_obstacle(at),
                    other => {
                        let color: u8 = other.parse().map_err(|_| LevelError::UnknownToken {
                            token: other.to_string(),
                            row: z,
                            column: x,
                        })?;
                        if color > MAX_COLOR_ID {
                            return Err(LevelError::ColorOutOfRange { color });
                        }
                        grid.place_tile(at, color);
                    }
                }
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of cells on the board
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline(always)]
    fn index(&self, x: u8, z: u8) -> Option<usize> {
        if x >= self.width || z >= self.height {
            return None;
        }
        Some(z as usize * self.width as usize + x as usize)
    }

    #[inline]
    fn checked_index(&self, x: u8, z: u8) -> usize {
        match self.index(x, z) {
            Some(idx) => idx,
            None => panic!(
                "coordinate ({}, {}) outside {}x{} grid",
                x, z, self.width, self.height
            ),
        }
    }

    pub fn contains(&self, at: Coord) -> bool {
        self.index(at.x, at.z).is_some()
    }

    /// Cell at `(x, z)`; panics when out of range
    pub fn get(&self, x: u8, z: u8) -> Cell {
        self.cells[self.checked_index(x, z)]
    }

    /// Cell at `at`; panics when out of range
    pub fn at(&self, at: Coord) -> Cell {
        self.get(at.x, at.z)
    }

    /// Cell at `(x, z)`, or `None` off the board
    pub fn try_get(&self, x: i16, z: i16) -> Option<Cell> {
        if x < 0 || z < 0 || x > u8::MAX as i16 || z > u8::MAX as i16 {
            return None;
        }
        self.index(x as u8, z as u8).map(|idx| self.cells[idx])
    }

    /// The adjacent coordinate one step in `dir`, or `None` past the edge
    pub fn neighbor(&self, at: Coord, dir: Direction) -> Option<Coord> {
        let (dx, dz) = dir.delta();
        let x = at.x as i16 + dx as i16;
        let z = at.z as i16 + dz as i16;
        if x < 0 || z < 0 || x >= self.width as i16 || z >= self.height as i16 {
            return None;
        }
        Some(Coord::new(x as u8, z as u8))
    }

    /// Overwrite a cell; panics when out of range
    pub fn set(&mut self, x: u8, z: u8, cell: Cell) {
        let idx = self.checked_index(x, z);
        if self.cells[idx].is_obstacle() {
            self.obstacles_remaining -= 1;
        }
        if cell.is_obstacle() {
            self.obstacles_remaining += 1;
        }
        if let Cell::Tile(tile) = cell {
            self.next_tile_id = self.next_tile_id.max(tile.id.0.wrapping_add(1));
        }
        self.cells[idx] = cell;
    }

    /// Empty a cell; panics when out of range
    pub fn clear(&mut self, x: u8, z: u8) {
        self.set(x, z, Cell::Empty);
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    pub fn obstacles_remaining(&self) -> u32 {
        self.obstacles_remaining
    }

    /// Iterate over every empty coordinate in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords().filter(move |c| self.at(*c).is_empty())
    }

    /// Iterate over every coordinate in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |z| (0..w).map(move |x| Coord::new(x, z)))
    }

    /// Iterate over `(coord, tile)` pairs in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = (Coord, Tile)> + '_ {
        self.coords()
            .filter_map(move |c| self.at(c).tile().map(|t| (c, *t)))
    }

    /// Put a fresh tile on an empty cell and return its id
    pub fn place_tile(&mut self, at: Coord, color: u8) -> TileId {
        assert!(
            self.at(at).is_empty(),
            "place_tile on occupied cell ({}, {})",
            at.x,
            at.z
        );
        let id = TileId(self.next_tile_id);
        self.set(at.x, at.z, Cell::Tile(Tile::new(id, color)));
        id
    }

    /// Put an obstacle on an empty cell
    pub fn place_obstacle(&mut self, at: Coord) {
        assert!(
            self.at(at).is_empty(),
            "place_obstacle on occupied cell ({}, {})",
            at.x,
            at.z
        );
        self.set(at.x, at.z, Cell::Obstacle);
    }

    /// Remove an obstacle; returns `false` (and changes nothing) if `at` holds none
    pub fn remove_obstacle(&mut self, at: Coord) -> bool {
        if !self.at(at).is_obstacle() {
            return false;
        }
        self.clear(at.x, at.z);
        true
    }

    /// Move the tile at `from` onto the empty cell `to`
    pub fn relocate(&mut self, from: Coord, to: Coord) {
        let Cell::Tile(tile) = self.at(from) else {
            panic!("relocate from ({}, {}) which holds no tile", from.x, from.z);
        };
        if from == to {
            return;
        }
        assert!(
            self.at(to).is_empty(),
            "relocate onto occupied cell ({}, {})",
            to.x,
            to.z
        );
        self.clear(from.x, from.z);
        self.set(to.x, to.z, Cell::Tile(tile));
    }

    /// Merge the tile at `from` into the tile at `into`.
    ///
    /// The moving tile disappears; the target keeps its id, doubles its value,
    /// advances its colorId and is flagged as merging for the rest of the turn.
    /// Returns the updated target.
    pub fn merge_into(&mut self, from: Coord, into: Coord) -> Tile {
        let (Cell::Tile(mover), Cell::Tile(target)) = (self.at(from), self.at(into)) else {
            panic!(
                "merge_into needs tiles at ({}, {}) and ({}, {})",
                from.x, from.z, into.x, into.z
            );
        };
        assert!(
            mover.color == target.color
                && target.color < MAX_COLOR_ID
                && !mover.merging
                && !target.merging,
            "illegal merge of {:?} into {:?}",
            mover,
            target
        );
        let merged = Tile {
            id: target.id,
            color: target.color + 1,
            value: target.value * 2,
            merging: true,
        };
        debug_assert_eq!(merged.value, tile_value(merged.color));
        self.clear(from.x, from.z);
        self.set(into.x, into.z, Cell::Tile(merged));
        merged
    }

    /// Clear every tile's merging flag (start of a turn)
    pub fn reset_merge_flags(&mut self) {
        for cell in &mut self.cells {
            if let Cell::Tile(tile) = cell {
                tile.merging = false;
            }
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Encode each cell as a byte: 0 empty, 255 obstacle, colorId + 1 for tiles
    pub fn color_codes(&self) -> Vec<u8> {
        self.cells
            .iter()
            .map(|cell| match cell {
                Cell::Empty => CODE_EMPTY,
                Cell::Obstacle => CODE_OBSTACLE,
                Cell::Tile(tile) => tile.color + 1,
            })
            .collect()
    }

    /// Render back into the text form accepted by [`Grid::from_rows`]
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|z| {
                (0..self.width)
                    .map(|x| match self.get(x, z) {
                        Cell::Empty => ".".to_string(),
                        Cell::Obstacle => "#".to_string(),
                        Cell::Tile(tile) => tile.color.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}
