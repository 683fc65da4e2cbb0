//! Board module - the playfield collaborator
//!
//! The piece controller only talks to the [`Board`] trait. [`Grid`] is the reference
//! playfield used by the game binary and the tests: a 10x20 flat array, y-up with row 0
//! at the bottom, spawning kinds from a seeded 7-bag.

use arrayvec::ArrayVec;

use crate::piece::{PieceState, Spawn};
use crate::rng::PieceQueue;
use crate::types::{Offset, Tile, BOARD_HEIGHT, BOARD_WIDTH, SPAWN_POSITION};

const BOARD_SIZE: usize = (BOARD_WIDTH * BOARD_HEIGHT) as usize;
const ROWS: usize = BOARD_HEIGHT as usize;

/// Playfield operations the piece controller depends on.
///
/// All calls happen on the simulation thread.
pub trait Board {
    /// Remove the piece's footprint
    fn clear(&mut self, piece: &PieceState);

    /// Write the piece's footprint
    fn set(&mut self, piece: &PieceState);

    /// Whether every cell of `piece` placed at `position` is inside the field and empty
    fn is_valid_position(&self, piece: &PieceState, position: Offset) -> bool;

    /// Remove full rows, returning how many were removed
    fn clear_lines(&mut self) -> usize;

    /// Choose the next piece. Always yields a spawn; a blocked spawn is the board's
    /// problem to resolve.
    fn spawn_piece(&mut self) -> Spawn;

    /// World-space centre of a grid cell
    fn cell_to_world(&self, cell: Offset) -> (f32, f32);
}

/// Reference playfield
#[derive(Debug, Clone)]
pub struct Grid {
    /// Row-major, row 0 at the bottom (y * WIDTH + x)
    tiles: [Tile; BOARD_SIZE],
    queue: PieceQueue,
    spawn_position: Offset,
    games_over: u32,
}

impl Grid {
    pub fn new(seed: u32) -> Self {
        Self {
            tiles: [None; BOARD_SIZE],
            queue: PieceQueue::new(seed),
            spawn_position: SPAWN_POSITION,
            games_over: 0,
        }
    }

    #[inline(always)]
    fn index(x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH || y < 0 || y >= BOARD_HEIGHT {
            return None;
        }
        Some((y * BOARD_WIDTH + x) as usize)
    }

    pub fn width(&self) -> i32 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> i32 {
        BOARD_HEIGHT
    }

    pub fn spawn_position(&self) -> Offset {
        self.spawn_position
    }

    /// How many times a blocked spawn wiped the field
    pub fn games_over(&self) -> u32 {
        self.games_over
    }

    /// Tile at (x, y); None when out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Tile> {
        Self::index(x, y).map(|idx| self.tiles[idx])
    }

    /// Set tile at (x, y); false when out of bounds
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.tiles[idx] = tile;
                true
            }
            None => false,
        }
    }

    /// In bounds and empty
    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    pub fn is_row_full(&self, y: i32) -> bool {
        if !(0..BOARD_HEIGHT).contains(&y) {
            return false;
        }
        let start = (y * BOARD_WIDTH) as usize;
        self.tiles[start..start + BOARD_WIDTH as usize]
            .iter()
            .all(|tile| tile.is_some())
    }

    /// Clear all full rows and drop the rows above them.
    ///
    /// Returns the cleared row indices, bottom first. Two-pointer compaction, no allocation.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, ROWS> {
        let mut cleared = ArrayVec::new();
        let width = BOARD_WIDTH as usize;
        let mut write_y = 0usize;

        for read_y in 0..ROWS {
            if self.is_row_full(read_y as i32) {
                cleared.push(read_y);
            } else {
                if write_y != read_y {
                    let src = read_y * width;
                    self.tiles.copy_within(src..src + width, write_y * width);
                }
                write_y += 1;
            }
        }

        for tile in &mut self.tiles[write_y * width..] {
            *tile = None;
        }

        cleared
    }

    /// Empty the whole field
    pub fn clear_all(&mut self) {
        self.tiles = [None; BOARD_SIZE];
    }

    /// Tiles, row-major with row 0 at the bottom
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Board for Grid {
    fn clear(&mut self, piece: &PieceState) {
        for (x, y) in piece.tiles() {
            self.set_tile(x, y, None);
        }
    }

    fn set(&mut self, piece: &PieceState) {
        for (x, y) in piece.tiles() {
            self.set_tile(x, y, Some(piece.kind()));
        }
    }

    fn is_valid_position(&self, piece: &PieceState, position: Offset) -> bool {
        piece
            .tiles_at(position)
            .iter()
            .all(|&(x, y)| self.is_empty(x, y))
    }

    fn clear_lines(&mut self) -> usize {
        self.clear_full_rows().len()
    }

    fn spawn_piece(&mut self) -> Spawn {
        let spawn = Spawn::new(self.queue.draw(), self.spawn_position);
        let piece = PieceState::new(spawn);

        if !self.is_valid_position(&piece, spawn.position) {
            self.games_over += 1;
            self.clear_all();
        }

        spawn
    }

    fn cell_to_world(&self, cell: Offset) -> (f32, f32) {
        (cell.0 as f32 + 0.5, cell.1 as f32 + 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    #[test]
    fn test_index_calculation() {
        assert_eq!(Grid::index(0, 0), Some(0));
        assert_eq!(Grid::index(9, 0), Some(9));
        assert_eq!(Grid::index(0, 1), Some(10));
        assert_eq!(Grid::index(9, 19), Some(199));
        assert_eq!(Grid::index(-1, 0), None);
        assert_eq!(Grid::index(10, 0), None);
        assert_eq!(Grid::index(0, 20), None);
    }

    #[test]
    fn test_clear_full_rows_drops_rows_above() {
        let mut grid = Grid::new(1);
        for x in 0..BOARD_WIDTH {
            grid.set_tile(x, 0, Some(PieceKind::I));
            grid.set_tile(x, 2, Some(PieceKind::I));
        }
        grid.set_tile(3, 1, Some(PieceKind::T));
        grid.set_tile(5, 3, Some(PieceKind::Z));

        let cleared = grid.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[0, 2]);
        assert_eq!(grid.get(3, 0), Some(Some(PieceKind::T)));
        assert_eq!(grid.get(5, 1), Some(Some(PieceKind::Z)));
        assert!(grid.is_empty(5, 3));
        assert!(!grid.is_row_full(0));
    }

    #[test]
    fn test_blocked_spawn_wipes_field() {
        let mut grid = Grid::new(1);
        for x in 0..BOARD_WIDTH {
            grid.set_tile(x, 18, Some(PieceKind::O));
            grid.set_tile(x, 19, Some(PieceKind::O));
        }
        grid.set_tile(0, 0, Some(PieceKind::L));

        let spawn = grid.spawn_piece();
        assert_eq!(spawn.position, SPAWN_POSITION);
        assert_eq!(grid.games_over(), 1);
        assert!(grid.tiles().iter().all(|t| t.is_none()));
    }

    #[test]
    fn test_cell_to_world_is_cell_centre() {
        let grid = Grid::new(1);
        assert_eq!(grid.cell_to_world((2, 3)), (2.5, 3.5));
    }
}
