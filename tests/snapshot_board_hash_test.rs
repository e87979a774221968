use icebreak::core::{board_hash, GridSnapshot, LevelConfig};
use icebreak::engine::{Submit, TurnController};
use icebreak::types::Direction;

fn fnv1a64_bytes(bytes: impl Iterator<Item = u8>) -> u64 {
    // FNV-1a 64-bit.
    let mut h: u64 = 0xcbf29ce484222325;
    for b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(0x00000100000001B3);
    }
    h
}

#[test]
fn snapshot_hash_matches_cell_codes() {
    let mut game = TurnController::new(LevelConfig::literal(["0 # .", ". . 1", ". . 1"], 2), 3).unwrap();
    let snap = game.snapshot();
    assert_eq!(snap.cells, vec![1, 255, 0, 0, 0, 2, 0, 0, 2]);
    assert_eq!(snap.board_hash, fnv1a64_bytes(snap.cells.iter().copied()));

    assert!(matches!(game.submit_move(Direction::Down), Submit::Started(_)));
    game.complete_all();
    let snap = game.snapshot();
    assert_eq!(snap.board_hash, board_hash(&snap.cells));
    assert_eq!(snap.board_hash, fnv1a64_bytes(snap.cells.iter().copied()));
    assert_eq!(snap.turn, 1);
    assert_eq!(snap.phase, "idle");
}

#[test]
fn meta_fields_do_not_change_board_hash() {
    let game = TurnController::new(LevelConfig::literal(["0 # .", ". . .", ". . 1"], 2), 3).unwrap();
    let from_grid = GridSnapshot::from_grid(game.grid());
    let full = game.snapshot();
    assert_eq!(full.board_hash, from_grid.board_hash);
    assert_ne!(full.seed, from_grid.seed);
}

#[test]
fn snapshot_serializes_to_json() {
    let game = TurnController::new(LevelConfig::literal(["0 #", ". ."], 2), 8).unwrap();
    let json = serde_json::to_string(&game.snapshot()).unwrap();
    let back: GridSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, game.snapshot());
    assert_eq!(back.code(1, 0), Some(255));
    assert_eq!(back.code(2, 0), None);
}
