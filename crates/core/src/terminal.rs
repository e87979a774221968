//! Terminal evaluator - has the level been lost?
//!
//! Runs only while obstacles remain (clearing the last obstacle wins the
//! level before this is consulted). The board is still playable if any cell
//! is empty, or if some tile has a right or down neighbour it could merge
//! with. Checking right/down only visits each adjacent pair exactly once.

use crate::grid::Grid;
use crate::types::{Cell, Coord, Direction, MAX_COLOR_ID};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// At least one move can still change the board
    Playable,
    /// Board is full and no adjacent pair shares a colorId
    Lost,
}

pub fn evaluate(grid: &Grid) -> Verdict {
    if grid.count_empty() > 0 {
        return Verdict::Playable;
    }
    if has_adjacent_pair(grid) {
        return Verdict::Playable;
    }
    Verdict::Lost
}

/// Any right/down neighbour pair that is mergeable (or has an empty side)
fn has_adjacent_pair(grid: &Grid) -> bool {
    grid.coords().any(|at| {
        let Cell::Tile(tile) = grid.at(at) else {
            return false;
        };
        [Direction::Right, Direction::Down]
            .into_iter()
            .filter_map(|dir| grid.neighbor(at, dir))
            .any(|next: Coord| match grid.at(next) {
                Cell::Empty => true,
                Cell::Tile(other) => other.color == tile.color && tile.color < MAX_COLOR_ID,
                Cell::Obstacle => false,
            })
    })
}
