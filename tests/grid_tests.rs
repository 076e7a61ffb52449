//! Grid tests - bounds, neighbours, compaction and generation

use tui_match3::core::{find_all_matches, Grid, SimpleRng};
use tui_match3::types::{Pos, Tile, TileColor, TileId};

#[test]
fn test_grid_new_is_empty() {
    let grid = Grid::new(8, 9);
    assert_eq!(grid.width(), 8);
    assert_eq!(grid.height(), 9);
    assert_eq!(grid.empty_count(), 72);
    assert!(!grid.is_full());
    assert_eq!(grid.get(Pos::new(0, 0)), None);
}

#[test]
fn test_set_get_and_bounds() {
    let mut grid = Grid::new(4, 3);
    let tile = Tile::normal(1, TileColor::Green);

    assert!(grid.set(Pos::new(2, 3), Some(tile)));
    assert_eq!(grid.get(Pos::new(2, 3)), Some(&tile));

    assert!(!grid.set(Pos::new(3, 0), Some(tile)));
    assert!(!grid.set(Pos::new(0, 4), Some(tile)));
    assert!(!grid.is_in_bounds(Pos::new(3, 0)));
    assert!(grid.is_in_bounds(Pos::new(2, 3)));

    assert_eq!(grid.take(Pos::new(2, 3)), Some(tile));
    assert_eq!(grid.get(Pos::new(2, 3)), None);
}

#[test]
fn test_neighbors_stay_in_bounds() {
    let grid = Grid::new(3, 3);
    let mut n: Vec<Pos> = grid.neighbors4(Pos::new(2, 2)).into_iter().collect();
    n.sort();
    assert_eq!(n, vec![Pos::new(1, 2), Pos::new(2, 1)]);
    assert_eq!(grid.neighbors4(Pos::new(1, 1)).len(), 4);
}

#[test]
fn test_swap_exchanges_tiles() {
    let mut grid = Grid::from_pattern(&["RG"]).unwrap();
    assert!(grid.swap(Pos::new(0, 0), Pos::new(0, 1)));
    assert_eq!(grid.to_pattern(), vec!["GR"]);
    assert!(!grid.swap(Pos::new(0, 0), Pos::new(0, 2)));
}

#[test]
fn test_compact_columns_keeps_relative_order() {
    let mut grid = Grid::from_pattern(&["RB", ".G", "Y.", "..", "OP"]).unwrap();
    let falls = grid.compact_columns();
    assert_eq!(grid.to_pattern(), vec!["..", "..", "RB", "YG", "OP"]);
    assert_eq!(falls.len(), 4);
    assert_eq!(grid.empty_count(), 4);
}

#[test]
fn test_generate_is_full_and_matchless() {
    for seed in 1..=20 {
        let mut rng = SimpleRng::new(seed);
        let mut next_id: TileId = 1;
        let grid = Grid::generate(8, 9, TileColor::palette(5), &mut rng, &mut next_id);
        assert!(grid.is_full(), "seed {seed}");
        assert!(find_all_matches(&grid).is_empty(), "seed {seed}");
        assert_eq!(next_id, 73);
        assert_eq!(grid.find_duplicate_id(), None);
    }
}

#[test]
fn test_generate_with_three_colors_still_matchless() {
    let mut rng = SimpleRng::new(99);
    let mut next_id: TileId = 1;
    let grid = Grid::generate(10, 10, TileColor::palette(3), &mut rng, &mut next_id);
    assert!(find_all_matches(&grid).is_empty());
    assert_eq!(grid.colors_present().len(), 3);
}

#[test]
fn test_pattern_round_trip_with_gaps() {
    let rows = ["RG.", ".BY", "OPC"];
    let grid = Grid::from_pattern(&rows).unwrap();
    assert_eq!(grid.to_pattern(), rows.to_vec());
    assert_eq!(grid.max_id(), Some(7));
}
