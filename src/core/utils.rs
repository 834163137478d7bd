use crate::core::definitions::{Orientation, Square};

#[inline]
pub fn is_valid_coord(coord: u8) -> bool {
    coord & 0x88 == 0x00
}

#[inline]
pub fn compact_pos(rank: u8, file: u8) -> u8 {
    rank << 4 | file
}

#[inline]
pub fn unpack_pos<T: From<u8>, V: Into<u8>>(pos: V) -> (T, T) {
    let pos: u8 = pos.into();
    (((pos & 0xf0) >> 4).into(), (pos & 0x0f).into())
}

/// Grid cell `(x, y)` a square is drawn in; `(0, 0)` is the top-left cell.
///
/// With white at the bottom, `a8` is `(0, 0)` and `h1` is `(7, 7)`. Flipping
/// the board inverts both axes.
pub fn square_to_grid(square: Square, orientation: Orientation) -> (u8, u8) {
    let x = square.file();
    let y = 7 - square.rank();
    match orientation {
        Orientation::White => (x, y),
        Orientation::Black => (7 - x, 7 - y),
    }
}

/// Inverse of [`square_to_grid`]. Coordinates must already be clamped to `0..8`.
pub fn grid_to_square(x: u8, y: u8, orientation: Orientation) -> Square {
    debug_assert!(x < 8 && y < 8, "Grid coordinates out of range: ({x}, {y})");
    let (x, y) = match orientation {
        Orientation::White => (x, y),
        Orientation::Black => (7 - x, 7 - y),
    };
    Square::at(x, 7 - y.min(7))
}

/// Pixel bounds of the board on the rendering surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardGeometry {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl BoardGeometry {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        BoardGeometry {
            left,
            top,
            width,
            height,
        }
    }

    /// Grid cell under a pointer position, `None` when off the board.
    pub fn grid_at(&self, x: f32, y: f32) -> Option<(u8, u8)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let gx = ((x - self.left) / self.width * 8.0).floor();
        let gy = ((y - self.top) / self.height * 8.0).floor();
        if (0.0..8.0).contains(&gx) && (0.0..8.0).contains(&gy) {
            Some((gx as u8, gy as u8))
        } else {
            None
        }
    }

    pub fn square_at(&self, x: f32, y: f32, orientation: Orientation) -> Option<Square> {
        self.grid_at(x, y)
            .map(|(gx, gy)| grid_to_square(gx, gy, orientation))
    }

    /// Pixel centre of a square, handy for synthesising pointer events.
    pub fn square_center(&self, square: Square, orientation: Orientation) -> (f32, f32) {
        let (x, y) = square_to_grid(square, orientation);
        let cell_w = self.width / 8.0;
        let cell_h = self.height / 8.0;
        (
            self.left + (x as f32 + 0.5) * cell_w,
            self.top + (y as f32 + 0.5) * cell_h,
        )
    }
}

impl Default for BoardGeometry {
    fn default() -> Self {
        BoardGeometry::new(0.0, 0.0, 800.0, 800.0)
    }
}
