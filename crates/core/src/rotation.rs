//! Rotation module - cell rotation and wall kick search
//!
//! Rotation is transactional: [`try_rotate`] builds a rotated candidate, walks the
//! kick row in table order and hands back the first candidate the caller's validity
//! check accepts. The input piece is never touched, so a failed rotation needs no
//! rollback.
//!
//! Two rounding policies coexist on purpose. I and O pivot between cells: their
//! coordinates are shifted by half a cell before the matrix is applied and the
//! result is rounded up. Every other kind pivots on a cell centre and rounds to the
//! nearest integer.

use crate::piece::PieceState;
use crate::shapes::ROTATION_MATRIX;
use crate::types::{Offset, PieceKind, RotationDirection};

/// Successful rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotated {
    pub piece: PieceState,
    /// Translation applied by the winning kick
    pub kick: Offset,
    /// Position of the winning kick inside its table row
    pub kick_slot: usize,
}

/// Wrap `input` into `[min, max)`
pub fn wrap(input: i32, min: i32, max: i32) -> i32 {
    min + (input - min).rem_euclid(max - min)
}

/// Row of the kick table to use after rotating into `rotation_index`
pub fn kick_index(rotation_index: u8, direction: RotationDirection, rows: usize) -> usize {
    let mut index = rotation_index as i32 * 2;
    if direction == RotationDirection::CounterClockwise {
        index -= 1;
    }
    wrap(index, 0, rows as i32) as usize
}

/// Apply the rotation matrix to local cells
pub fn rotate_cells(kind: PieceKind, cells: &[Offset; 4], direction: RotationDirection) -> [Offset; 4] {
    let d = direction.sign() as f32;
    let m = ROTATION_MATRIX;

    cells.map(|(x, y)| {
        if kind.has_offset_pivot() {
            let x = x as f32 - 0.5;
            let y = y as f32 - 0.5;
            (
                (x * m[0] * d + y * m[1] * d).ceil() as i32,
                (x * m[2] * d + y * m[3] * d).ceil() as i32,
            )
        } else {
            let x = x as f32;
            let y = y as f32;
            (
                (x * m[0] * d + y * m[1] * d).round() as i32,
                (x * m[2] * d + y * m[3] * d).round() as i32,
            )
        }
    })
}

/// Try to rotate a piece with wall kicks.
///
/// `is_valid` receives each kicked candidate in table order. Returns `None` when
/// every candidate is rejected.
pub fn try_rotate(
    piece: &PieceState,
    direction: RotationDirection,
    is_valid: impl Fn(&PieceState) -> bool,
) -> Option<Rotated> {
    let rotation_index = wrap(piece.rotation_index as i32 + direction.sign(), 0, 4) as u8;
    let rotated = PieceState {
        cells: rotate_cells(piece.kind(), &piece.cells, direction),
        rotation_index,
        ..*piece
    };

    let table = piece.shape.wall_kicks;
    let row = &table[kick_index(rotation_index, direction, table.len())];

    for (slot, &(dx, dy)) in row.iter().enumerate() {
        let candidate = rotated.translated(dx, dy);
        if is_valid(&candidate) {
            return Some(Rotated {
                piece: candidate,
                kick: (dx, dy),
                kick_slot: slot,
            });
        }
    }

    None
}
