//! Obstacle breaker - merges shatter orthogonally adjacent obstacles
//!
//! Removal is immediate: the grid and its obstacle counter change as soon as
//! the merge is applied, regardless of what the presentation layer does with
//! the resulting break events.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::types::{Coord, Direction};

/// One obstacle removed by a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObstacleBreak {
    /// Where the obstacle stood
    pub at: Coord,
    /// Merge destination that broke it
    pub merge_at: Coord,
    /// ColorId of the merged tile, used to theme the break effect
    pub color: u8,
}

/// Remove every obstacle orthogonally adjacent to `merge_at`.
///
/// Neighbours are checked in `Direction::ALL` order (up, down, left, right).
pub fn break_adjacent(grid: &mut Grid, merge_at: Coord, color: u8) -> ArrayVec<ObstacleBreak, 4> {
    let mut broken = ArrayVec::new();
    for dir in Direction::ALL {
        let Some(at) = grid.neighbor(merge_at, dir) else {
            continue;
        };
        if grid.remove_obstacle(at) {
            broken.push(ObstacleBreak {
                at,
                merge_at,
                color,
            });
        }
    }
    broken
}
