//! Spawn policy - one new random tile after a turn that moved something
//!
//! The cell is chosen uniformly among empty cells and the colorId uniformly
//! in `[0, max_colors)`. A full board is a silent no-op.

use crate::grid::Grid;
use crate::rng::SimpleRng;
use crate::types::{Coord, TileId};

/// A tile introduced by the spawn policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpawnEvent {
    pub tile: TileId,
    pub at: Coord,
    pub color: u8,
}

#[derive(Debug, Clone)]
pub struct SpawnPolicy {
    rng: SimpleRng,
    max_colors: u8,
}

impl SpawnPolicy {
    pub fn new(rng: SimpleRng, max_colors: u8) -> Self {
        assert!(max_colors > 0, "spawn policy needs at least one color");
        Self { rng, max_colors }
    }

    pub fn max_colors(&self) -> u8 {
        self.max_colors
    }

    /// Switch palettes (next level) while keeping the random sequence going
    pub fn set_max_colors(&mut self, max_colors: u8) {
        assert!(max_colors > 0, "spawn policy needs at least one color");
        self.max_colors = max_colors;
    }

    pub fn rng_mut(&mut self) -> &mut SimpleRng {
        &mut self.rng
    }

    pub fn seed(&self) -> u32 {
        self.rng.state()
    }

    /// Place one tile on a random empty cell
    pub fn spawn(&mut self, grid: &mut Grid) -> Option<SpawnEvent> {
        let empty: Vec<Coord> = grid.empty_cells().collect();
        let at = self.rng.pick(&empty)?;
        let color = self.rng.next_below(self.max_colors as u32) as u8;
        let tile = grid.place_tile(at, color);
        Some(SpawnEvent { tile, at, color })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_fills_an_empty_cell() {
        let mut grid = Grid::from_rows(&["0 # .", "1 1 0"]).unwrap();
        let mut policy = SpawnPolicy::new(SimpleRng::new(4), 3);
        let event = policy.spawn(&mut grid).unwrap();
        assert_eq!(event.at, Coord::new(2, 0));
        assert!(event.color < 3);
        assert_eq!(grid.count_empty(), 0);
        assert_eq!(grid.at(event.at).tile().map(|t| t.id), Some(event.tile));
    }

    #[test]
    fn test_spawn_on_full_board_is_noop() {
        let mut grid = Grid::from_rows(&["0 #", "1 0"]).unwrap();
        let before = grid.clone();
        let mut policy = SpawnPolicy::new(SimpleRng::new(4), 3);
        assert_eq!(policy.spawn(&mut grid), None);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_spawn_uses_every_color() {
        let mut policy = SpawnPolicy::new(SimpleRng::new(21), 4);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let mut grid = Grid::square(2);
            let event = policy.spawn(&mut grid).unwrap();
            seen[event.color as usize] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn test_spawn_is_deterministic_per_seed() {
        let run = || {
            let mut grid = Grid::square(4);
            let mut policy = SpawnPolicy::new(SimpleRng::new(8), 2);
            (0..5).filter_map(|_| policy.spawn(&mut grid)).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
