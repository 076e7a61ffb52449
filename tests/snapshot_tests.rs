//! Snapshot tests - board hash stability and JSON shape

use tui_match3::core::{Engine, GameSnapshot, Grid};
use tui_match3::types::{EngineConfig, Pos, SpecialKind, Tile, TileColor};

fn fnv1a(bytes: impl IntoIterator<Item = u8>) -> u32 {
    bytes
        .into_iter()
        .fold(0x811c_9dc5u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193))
}

fn expected_hash(snap: &GameSnapshot) -> u32 {
    let dims = (snap.width as u32)
        .to_le_bytes()
        .into_iter()
        .chain((snap.height as u32).to_le_bytes());
    let cells = snap.cells.iter().map(|c| c.map_or(0, |t| t.code()));
    fnv1a(dims.chain(cells))
}

#[test]
fn test_board_hash_matches_reference_fnv() {
    let engine = Engine::new(EngineConfig::default().with_seed(99)).unwrap();
    let snap = engine.snapshot();
    assert_eq!(snap.board_hash, expected_hash(&snap));
}

#[test]
fn test_board_hash_covers_gaps_and_specials() {
    let mut grid = Grid::from_pattern(&["RG.", "BYR"]).unwrap();
    let plain = GameSnapshot::capture(&grid, 0, 0, 0, false, 1);
    assert_eq!(plain.board_hash, expected_hash(&plain));

    grid.set(Pos::new(1, 1), Some(Tile::special(40, TileColor::Yellow, SpecialKind::Bomb)));
    let special = GameSnapshot::capture(&grid, 0, 0, 0, false, 1);
    assert_eq!(special.board_hash, expected_hash(&special));
    assert_ne!(plain.board_hash, special.board_hash);
    assert_eq!(special.special_count(), 1);
    assert!(special.get(Pos::new(0, 2)).is_none());
}

#[test]
fn test_same_seed_same_hash() {
    let a = Engine::new(EngineConfig::default().with_seed(5)).unwrap().snapshot();
    let b = Engine::new(EngineConfig::default().with_seed(5)).unwrap().snapshot();
    let c = Engine::new(EngineConfig::default().with_seed(6)).unwrap().snapshot();
    assert_eq!(a.board_hash, b.board_hash);
    assert_ne!(a.board_hash, c.board_hash);
}

#[test]
fn test_snapshot_serializes_camel_case() {
    let engine = Engine::new(EngineConfig::default().with_dimensions(5, 4, 4)).unwrap();
    let value = serde_json::to_value(engine.snapshot()).unwrap();

    assert_eq!(value["width"], 5);
    assert_eq!(value["height"], 4);
    assert_eq!(value["cells"].as_array().unwrap().len(), 20);
    assert!(value["boardHash"].is_u64());
    assert!(value["cells"][0]["fallingMs"].is_u64());
    assert!(value.get("board_hash").is_none());
}

#[test]
fn test_snapshot_reports_falling_tiles() {
    let mut engine = Engine::with_grid(
        EngineConfig::default(),
        Grid::from_pattern(&["RGBYO", "GBYOR", "RROGB", "YORGB"]).unwrap(),
    )
    .unwrap();
    let outcome = engine.request_swap(Pos::new(3, 2), Pos::new(2, 2));
    assert!(outcome.is_applied());

    let snap = engine.snapshot();
    assert!(!snap.is_settled());
    assert_eq!(snap.turn, 1);
    assert_eq!(snap.score, engine.score());

    while !engine.is_settled() {
        engine.tick(16);
    }
    assert!(engine.snapshot().is_settled());
}
