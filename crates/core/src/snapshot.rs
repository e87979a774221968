use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::types::TurnPhase;

/// Stable 64-bit FNV-1a over the snapshot cell codes.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions, so
/// replays and golden files hash with this instead.
pub fn board_hash(codes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    codes.iter().fold(OFFSET_BASIS, |h, &b| {
        (h ^ b as u64).wrapping_mul(PRIME)
    })
}

/// Read-only view of the engine for presentation, replays and tests
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major cell codes: 0 empty, 255 obstacle, colorId + 1 for tiles
    pub cells: Vec<u8>,
    pub board_hash: u64,
    pub obstacles_remaining: u32,
    pub level: u32,
    pub episode_id: u32,
    pub turn: u32,
    pub seed: u32,
    /// `TurnPhase::as_str` of the controller state
    pub phase: String,
}

impl GridSnapshot {
    pub fn from_grid(grid: &Grid) -> Self {
        let cells = grid.color_codes();
        Self {
            width: grid.width(),
            height: grid.height(),
            board_hash: board_hash(&cells),
            cells,
            obstacles_remaining: grid.obstacles_remaining(),
            level: 0,
            episode_id: 0,
            turn: 0,
            seed: 0,
            phase: TurnPhase::Idle.as_str().to_string(),
        }
    }

    /// Cell code at `(x, z)`, `None` off the board
    pub fn code(&self, x: u8, z: u8) -> Option<u8> {
        if x >= self.width || z >= self.height {
            return None;
        }
        self.cells
            .get(z as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn playable(&self) -> bool {
        self.phase == TurnPhase::Idle.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_hash_tracks_cells() {
        let grid = Grid::from_rows(&["0 #", ". 1"]).unwrap();
        let snap = GridSnapshot::from_grid(&grid);
        assert_eq!(snap.board_hash, board_hash(&[1, 255, 0, 2]));
        assert_eq!(snap.code(1, 1), Some(2));
        assert_eq!(snap.code(2, 0), None);

        let other = GridSnapshot::from_grid(&Grid::from_rows(&["0 #", "1 ."]).unwrap());
        assert_ne!(snap.board_hash, other.board_hash);
    }

    #[test]
    fn test_empty_hash_is_offset_basis() {
        assert_eq!(board_hash(&[]), 0xcbf29ce484222325);
    }

    #[test]
    fn test_snapshot_serializes() {
        let grid = Grid::from_rows(&["0 #"]).unwrap();
        let snap = GridSnapshot::from_grid(&grid);
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["cells"], serde_json::json!([1, 255]));
        assert_eq!(json["phase"], "idle");
    }
}
