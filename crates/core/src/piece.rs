//! Active piece state

use crate::shapes::{shape, PieceShape};
use crate::types::{Offset, PieceKind};

/// Where and what the board wants spawned next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub shape: PieceShape,
    pub position: Offset,
}

impl Spawn {
    pub fn new(kind: PieceKind, position: Offset) -> Self {
        Self {
            shape: shape(kind),
            position,
        }
    }
}

/// The falling piece: shape, rotated cells, grid origin and rotation index.
///
/// `Copy` so rotations and moves can build a candidate and only commit it once the
/// board accepts it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceState {
    pub shape: PieceShape,
    pub cells: [Offset; 4],
    pub position: Offset,
    pub rotation_index: u8,
}

impl PieceState {
    /// Fresh piece in spawn orientation
    pub fn new(spawn: Spawn) -> Self {
        Self {
            shape: spawn.shape,
            cells: spawn.shape.cells,
            position: spawn.position,
            rotation_index: 0,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.shape.kind
    }

    /// Absolute grid cells at the current position
    pub fn tiles(&self) -> [Offset; 4] {
        self.tiles_at(self.position)
    }

    /// Absolute grid cells if the piece were at `position`
    pub fn tiles_at(&self, position: Offset) -> [Offset; 4] {
        self.cells.map(|(x, y)| (x + position.0, y + position.1))
    }

    /// Same piece shifted by (dx, dy)
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: (self.position.0 + dx, self.position.1 + dy),
            ..*self
        }
    }
}
