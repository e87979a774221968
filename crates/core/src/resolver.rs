//! Move resolver - per-tile destinations and merges for one slide
//!
//! Cells are visited starting from the wall the direction points at and
//! working backward, so a tile that already settled this turn is never
//! pushed again by a tile processed later. Each tile then walks along the
//! direction while the next cell is empty:
//!
//! - out of bounds or an obstacle: stop on the last empty cell
//! - a tile of the same colorId with neither side flagged as merging: merge
//!   into it (tiles at `MAX_COLOR_ID` are final and never merge)
//! - any other tile: stop on the last empty cell
//!
//! Resolution runs against a scratch copy of the grid. Replaying the
//! returned decisions in order (see [`apply_decision`]) reproduces the same
//! board on the real grid.

use crate::grid::Grid;
use crate::types::{Cell, Coord, Direction, Tile, TileId, MAX_COLOR_ID};

/// What one tile does this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveDecision {
    pub tile: TileId,
    pub from: Coord,
    pub to: Coord,
    /// Tile absorbed into at `to`, if this move is a merge
    pub merge_into: Option<TileId>,
}

impl MoveDecision {
    pub fn is_merge(&self) -> bool {
        self.merge_into.is_some()
    }
}

/// Result of resolving one direction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// One decision per tile that changed position, in processing order
    pub decisions: Vec<MoveDecision>,
}

impl MoveOutcome {
    /// Whether any tile changed position
    pub fn moved(&self) -> bool {
        !self.decisions.is_empty()
    }

    pub fn merges(&self) -> impl Iterator<Item = &MoveDecision> {
        self.decisions.iter().filter(|d| d.is_merge())
    }
}

/// Visit order for `dir`: the row/column touching the destination wall first
pub fn traversal(width: u8, height: u8, dir: Direction) -> impl Iterator<Item = Coord> {
    let (dx, dz) = dir.delta();
    (0..height).flat_map(move |i| {
        let z = if dz > 0 { height - 1 - i } else { i };
        (0..width).map(move |j| {
            let x = if dx > 0 { width - 1 - j } else { j };
            Coord::new(x, z)
        })
    })
}

/// Compute every tile's destination for `dir` without touching `grid`.
///
/// Merging flags already set on `grid` are honoured; callers reset them at
/// the start of each turn.
pub fn resolve(grid: &Grid, dir: Direction) -> MoveOutcome {
    let mut scratch = grid.clone();
    let mut outcome = MoveOutcome::default();

    for from in traversal(grid.width(), grid.height(), dir) {
        let Cell::Tile(tile) = scratch.at(from) else {
            continue;
        };
        let Some(decision) = slide(&scratch, from, tile, dir) else {
            continue;
        };
        apply_decision(&mut scratch, &decision);
        outcome.decisions.push(decision);
    }

    outcome
}

/// Walk one tile along `dir`; `None` if it stays put
fn slide(grid: &Grid, from: Coord, tile: Tile, dir: Direction) -> Option<MoveDecision> {
    let mut dest = from;
    let mut merge_into = None;

    while let Some(next) = grid.neighbor(dest, dir) {
        match grid.at(next) {
            Cell::Empty => dest = next,
            Cell::Obstacle => break,
            Cell::Tile(other) => {
                if can_merge(&tile, &other) {
                    dest = next;
                    merge_into = Some(other.id);
                }
                break;
            }
        }
    }

    (dest != from).then_some(MoveDecision {
        tile: tile.id,
        from,
        to: dest,
        merge_into,
    })
}

/// Equal colorIds, neither flagged this turn, and room to advance the colorId
pub fn can_merge(tile: &Tile, other: &Tile) -> bool {
    tile.color == other.color && tile.color < MAX_COLOR_ID && !tile.merging && !other.merging
}

/// Replay one decision onto `grid`; returns the merged tile for merges
pub fn apply_decision(grid: &mut Grid, decision: &MoveDecision) -> Option<Tile> {
    if decision.is_merge() {
        Some(grid.merge_into(decision.from, decision.to))
    } else {
        grid.relocate(decision.from, decision.to);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors(grid: &Grid) -> Vec<String> {
        grid.to_rows()
    }

    #[test]
    fn test_traversal_starts_at_destination_wall() {
        let right: Vec<_> = traversal(3, 1, Direction::Right).collect();
        assert_eq!(right, vec![Coord::new(2, 0), Coord::new(1, 0), Coord::new(0, 0)]);

        let up: Vec<_> = traversal(1, 3, Direction::Up).collect();
        assert_eq!(up, vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)]);

        let down: Vec<_> = traversal(2, 2, Direction::Down).collect();
        assert_eq!(down[0].z, 1);
        assert_eq!(down[3].z, 0);
    }

    #[test]
    fn test_slide_to_wall() {
        let grid = Grid::from_rows(&["0 . . ."]).unwrap();
        let outcome = resolve(&grid, Direction::Right);
        assert!(outcome.moved());
        assert_eq!(outcome.decisions[0].from, Coord::new(0, 0));
        assert_eq!(outcome.decisions[0].to, Coord::new(3, 0));
        assert_eq!(outcome.decisions[0].merge_into, None);
    }

    #[test]
    fn test_resolve_does_not_touch_input() {
        let grid = Grid::from_rows(&["0 0 . ."]).unwrap();
        let before = grid.clone();
        let _ = resolve(&grid, Direction::Right);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_obstacle_halts_without_merge() {
        let grid = Grid::from_rows(&["0 . # 0"]).unwrap();
        let outcome = resolve(&grid, Direction::Right);
        assert_eq!(outcome.decisions.len(), 1);
        assert_eq!(outcome.decisions[0].to, Coord::new(1, 0));
        assert!(!outcome.decisions[0].is_merge());
    }

    #[test]
    fn test_different_colors_stack() {
        let mut grid = Grid::from_rows(&["1 . 0 ."]).unwrap();
        let outcome = resolve(&grid, Direction::Right);
        for d in &outcome.decisions {
            apply_decision(&mut grid, d);
        }
        assert_eq!(colors(&grid), vec![". . 1 0"]);
    }

    #[test]
    fn test_full_row_merges_pairwise_from_wall() {
        let mut grid = Grid::from_rows(&["0 0 0 0"]).unwrap();
        let outcome = resolve(&grid, Direction::Right);
        assert_eq!(outcome.merges().count(), 2);
        for d in &outcome.decisions {
            apply_decision(&mut grid, d);
        }
        assert_eq!(colors(&grid), vec![". . 1 1"]);
    }

    #[test]
    fn test_three_in_a_row_merges_wall_pair() {
        let mut grid = Grid::from_rows(&["0 0 0"]).unwrap();
        let outcome = resolve(&grid, Direction::Left);
        for d in &outcome.decisions {
            apply_decision(&mut grid, d);
        }
        assert_eq!(colors(&grid), vec!["1 0 ."]);
    }

    #[test]
    fn test_merge_result_does_not_chain() {
        // 1 is produced by the first merge; the incoming 1 must not fold into it.
        let mut grid = Grid::from_rows(&["1 0 0"]).unwrap();
        let outcome = resolve(&grid, Direction::Right);
        assert_eq!(outcome.merges().count(), 1);
        for d in &outcome.decisions {
            apply_decision(&mut grid, d);
        }
        assert_eq!(colors(&grid), vec![". 1 1"]);
    }

    #[test]
    fn test_max_color_tiles_do_not_merge() {
        let grid = Grid::from_rows(&["30 30"]).unwrap();
        assert!(!resolve(&grid, Direction::Right).moved());

        let mut grid = Grid::from_rows(&["29 29 ."]).unwrap();
        let outcome = resolve(&grid, Direction::Right);
        for d in &outcome.decisions {
            apply_decision(&mut grid, d);
        }
        assert_eq!(colors(&grid), vec![". . 30"]);
        assert_eq!(grid.get(2, 0).tile().map(|t| t.value), Some(1 << 31));
    }

    #[test]
    fn test_flagged_tile_refuses_merge() {
        let mut grid = Grid::from_rows(&["0 0"]).unwrap();
        let Cell::Tile(mut tile) = grid.get(1, 0) else {
            unreachable!()
        };
        tile.merging = true;
        grid.set(1, 0, Cell::Tile(tile));
        assert!(!resolve(&grid, Direction::Right).moved());
    }

    #[test]
    fn test_vertical_slide() {
        let mut grid = Grid::from_rows(&["0", "#", ".", "0"]).unwrap();
        let outcome = resolve(&grid, Direction::Up);
        for d in &outcome.decisions {
            apply_decision(&mut grid, d);
        }
        assert_eq!(colors(&grid), vec!["0", "#", "0", "."]);
    }

    #[test]
    fn test_no_move_against_full_wall() {
        let grid = Grid::from_rows(&["0 1", "1 0"]).unwrap();
        for dir in Direction::ALL {
            assert!(!resolve(&grid, dir).moved(), "{:?} should not move", dir);
        }
    }
}
