//! Shapes module - tetromino cell data and wall kick tables
//!
//! Cells are local offsets around the piece origin in a y-up frame.
//! Kick tables hold 8 rows of 5 candidate translations; a row is selected by
//! [`crate::rotation::kick_index`] and tried left to right.

use crate::types::{Offset, PieceKind};

/// Wall kick table: 8 rows × 5 ordered candidate translations
pub type KickTable = [[Offset; 5]; 8];

/// 90° rotation matrix `[cos, sin, -sin, cos]`, scaled by the rotation direction
pub const ROTATION_MATRIX: [f32; 4] = [0.0, 1.0, -1.0, 0.0];

/// Immutable description of a tetromino kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceShape {
    pub kind: PieceKind,
    pub cells: [Offset; 4],
    pub wall_kicks: &'static KickTable,
}

/// Get the shape for a piece kind
pub fn shape(kind: PieceKind) -> PieceShape {
    let cells = match kind {
        PieceKind::I => [(-1, 1), (0, 1), (1, 1), (2, 1)],
        PieceKind::J => [(-1, 1), (-1, 0), (0, 0), (1, 0)],
        PieceKind::L => [(1, 1), (-1, 0), (0, 0), (1, 0)],
        PieceKind::O => [(0, 1), (1, 1), (0, 0), (1, 0)],
        PieceKind::S => [(0, 1), (1, 1), (-1, 0), (0, 0)],
        PieceKind::T => [(0, 1), (-1, 0), (0, 0), (1, 0)],
        PieceKind::Z => [(-1, 1), (0, 1), (0, 0), (1, 0)],
    };

    PieceShape {
        kind,
        cells,
        wall_kicks: kick_table(kind),
    }
}

/// Get kick table for a piece kind
pub fn kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::I => &I_KICKS,
        _ => &JLOSTZ_KICKS,
    }
}

/// I piece kick table
static I_KICKS: KickTable = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
];

/// Kick table shared by J, L, O, S, T and Z
static JLOSTZ_KICKS: KickTable = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kick_row_starts_with_identity() {
        for kind in PieceKind::ALL {
            for row in shape(kind).wall_kicks.iter() {
                assert_eq!(row[0], (0, 0));
            }
        }
    }

    #[test]
    fn only_i_uses_the_i_table() {
        assert!(std::ptr::eq(kick_table(PieceKind::I), &I_KICKS));
        for kind in [PieceKind::J, PieceKind::L, PieceKind::O, PieceKind::S, PieceKind::T, PieceKind::Z] {
            assert!(std::ptr::eq(kick_table(kind), &JLOSTZ_KICKS));
        }
    }

    #[test]
    fn cells_are_distinct() {
        for kind in PieceKind::ALL {
            let cells = shape(kind).cells;
            for i in 0..4 {
                for j in (i + 1)..4 {
                    assert_ne!(cells[i], cells[j], "{:?} repeats a cell", kind);
                }
            }
        }
    }
}
