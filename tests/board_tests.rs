//! Board tests - line clearing, spawning and game over on the reference grid

use tilt_tetris::core::{Board, Grid, PieceState, Spawn};
use tilt_tetris::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH, SPAWN_POSITION};

fn fill_row(grid: &mut Grid, y: i32, except: &[i32]) {
    for x in 0..BOARD_WIDTH {
        if !except.contains(&x) {
            grid.set_tile(x, y, Some(PieceKind::J));
        }
    }
}

#[test]
fn test_new_grid_is_empty() {
    let grid = Grid::new(1);
    assert_eq!(grid.width(), BOARD_WIDTH);
    assert_eq!(grid.height(), BOARD_HEIGHT);
    assert_eq!(grid.spawn_position(), SPAWN_POSITION);
    assert!(grid.tiles().iter().all(|t| t.is_none()));
    assert_eq!(grid.games_over(), 0);
}

#[test]
fn test_out_of_bounds_is_never_valid() {
    let grid = Grid::new(1);
    let piece = PieceState::new(Spawn::new(PieceKind::O, (0, 0)));

    assert!(grid.is_valid_position(&piece, (0, 0)));
    assert!(grid.is_valid_position(&piece, (8, 18)));
    assert!(!grid.is_valid_position(&piece, (-1, 0)));
    assert!(!grid.is_valid_position(&piece, (9, 0)));
    assert!(!grid.is_valid_position(&piece, (0, -1)));
    assert!(!grid.is_valid_position(&piece, (0, 19)));
    assert_eq!(grid.get(-1, 0), None);
    assert_eq!(grid.get(0, BOARD_HEIGHT), None);
}

#[test]
fn test_set_and_clear_piece_footprint() {
    let mut grid = Grid::new(1);
    let piece = PieceState::new(Spawn::new(PieceKind::T, (4, 10)));

    grid.set(&piece);
    for (x, y) in piece.tiles() {
        assert_eq!(grid.get(x, y), Some(Some(PieceKind::T)));
    }
    assert!(!grid.is_valid_position(&piece, piece.position));

    grid.clear(&piece);
    assert!(grid.tiles().iter().all(|t| t.is_none()));
}

#[test]
fn test_clear_lines_counts_and_compacts() {
    let mut grid = Grid::new(1);
    fill_row(&mut grid, 0, &[]);
    fill_row(&mut grid, 1, &[7]);
    fill_row(&mut grid, 2, &[]);
    fill_row(&mut grid, 3, &[]);
    grid.set_tile(2, 4, Some(PieceKind::S));

    assert_eq!(grid.clear_lines(), 3);
    // Row 1 drops to the floor, row 4 lands on top of it
    assert_eq!(grid.get(7, 0), Some(None));
    assert_eq!(grid.get(0, 0), Some(Some(PieceKind::J)));
    assert_eq!(grid.get(2, 1), Some(Some(PieceKind::S)));
    assert_eq!(grid.get(3, 1), Some(None));
    for y in 2..BOARD_HEIGHT {
        assert!(!grid.is_row_full(y));
        for x in 0..BOARD_WIDTH {
            assert!(grid.is_empty(x, y));
        }
    }
    assert_eq!(grid.clear_lines(), 0);
}

#[test]
fn test_top_row_can_be_cleared() {
    let mut grid = Grid::new(1);
    fill_row(&mut grid, BOARD_HEIGHT - 1, &[]);
    assert_eq!(grid.clear_lines(), 1);
    assert!(grid.tiles().iter().all(|t| t.is_none()));
}

#[test]
fn test_spawn_sequence_is_seeded_seven_bag() {
    let mut a = Grid::new(99);
    let mut b = Grid::new(99);

    let mut kinds = Vec::new();
    for _ in 0..7 {
        let spawn = a.spawn_piece();
        assert_eq!(spawn.position, SPAWN_POSITION);
        assert_eq!(b.spawn_piece(), spawn);
        kinds.push(spawn.shape.kind);
    }

    for kind in PieceKind::ALL {
        assert!(kinds.contains(&kind), "{:?} missing from bag", kind);
    }
}

#[test]
fn test_blocked_spawn_resets_playfield() {
    let mut grid = Grid::new(5);
    for y in 10..BOARD_HEIGHT {
        fill_row(&mut grid, y, &[0]);
    }

    let spawn = grid.spawn_piece();
    assert_eq!(grid.games_over(), 1);
    assert!(grid.tiles().iter().all(|t| t.is_none()));

    // The returned spawn still fits the cleared field
    let piece = PieceState::new(spawn);
    assert!(grid.is_valid_position(&piece, spawn.position));
}

#[test]
fn test_cell_to_world_is_cell_centre() {
    let grid = Grid::new(1);
    assert_eq!(grid.cell_to_world((0, 0)), (0.5, 0.5));
    assert_eq!(grid.cell_to_world((9, 19)), (9.5, 19.5));
}
