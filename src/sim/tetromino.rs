//! Falling pieces for the block-stacking game

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::board::Board;
use super::collision::{Aabb, is_blocked};
use super::entity::Cell;
use crate::renderer::{Color, palette};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl TetrominoKind {
    pub const ALL: [TetrominoKind; 7] = [
        TetrominoKind::I,
        TetrominoKind::O,
        TetrominoKind::T,
        TetrominoKind::S,
        TetrominoKind::Z,
        TetrominoKind::J,
        TetrominoKind::L,
    ];

    pub fn color(self) -> Color {
        match self {
            TetrominoKind::I => palette::RED,
            TetrominoKind::O => palette::YELLOW,
            TetrominoKind::T => palette::MAGENTA,
            TetrominoKind::S => palette::GREEN,
            TetrominoKind::Z => palette::BLUE,
            TetrominoKind::J => palette::ORANGE,
            TetrominoKind::L => palette::CYAN,
        }
    }

    fn rows(self) -> &'static [&'static [u8]] {
        match self {
            TetrominoKind::I => &[&[1, 1, 1, 1]],
            TetrominoKind::O => &[&[1, 1], &[1, 1]],
            TetrominoKind::T => &[&[0, 1, 0], &[1, 1, 1]],
            TetrominoKind::S => &[&[0, 1, 1], &[1, 1, 0]],
            TetrominoKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
            TetrominoKind::J => &[&[1, 0, 0], &[1, 1, 1]],
            TetrominoKind::L => &[&[0, 0, 1], &[1, 1, 1]],
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Shape matrix anchored at its top-left cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tetromino {
    pub kind: TetrominoKind,
    pub anchor: Cell,
    shape: Vec<Vec<bool>>,
}

impl Tetromino {
    pub fn new(kind: TetrominoKind, anchor: Cell) -> Self {
        let shape = kind
            .rows()
            .iter()
            .map(|row| row.iter().map(|&v| v != 0).collect())
            .collect();
        Self {
            kind,
            anchor,
            shape,
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.kind.color()
    }

    pub fn shape(&self) -> &[Vec<bool>] {
        &self.shape
    }

    /// Shifted copy
    pub fn moved(&self, drow: i32, dcol: i32) -> Self {
        Self {
            anchor: self.anchor.offset(drow, dcol),
            ..self.clone()
        }
    }

    /// Copy rotated clockwise (transpose, then reverse each row)
    pub fn rotated(&self) -> Self {
        let height = self.shape.len();
        let width = self.shape.first().map_or(0, Vec::len);
        let shape = (0..width)
            .map(|r| (0..height).map(|c| self.shape[height - 1 - c][r]).collect())
            .collect();
        Self {
            shape,
            ..self.clone()
        }
    }

    /// Board cells covered by the filled part of the shape
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.shape.iter().enumerate().flat_map(move |(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(c, _)| self.anchor.offset(r as i32, c as i32))
        })
    }

    /// Every filled cell is in bounds and empty
    pub fn fits<T>(&self, board: &Board<Option<T>>) -> bool {
        self.cells().all(|cell| !is_blocked(board, cell.row, cell.col))
    }

    /// Write the piece into the board with its colour
    pub fn place_on(&self, board: &mut Board<Option<Color>>) {
        for cell in self.cells() {
            board.set(cell.row, cell.col, Some(self.color()));
        }
    }

    /// Bounding box in cell units
    pub fn extent(&self) -> Aabb {
        let height = self.shape.len();
        let width = self.shape.first().map_or(0, Vec::len);
        Aabb::new(
            self.anchor.col as f32,
            self.anchor.row as f32,
            width as f32,
            height as f32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells_of(piece: &Tetromino) -> Vec<(i32, i32)> {
        let mut cells: Vec<_> = piece.cells().map(|c| (c.row, c.col)).collect();
        cells.sort();
        cells
    }

    #[test]
    fn test_rotate_t_clockwise() {
        let t = Tetromino::new(TetrominoKind::T, Cell::new(0, 0));
        // .X.      X.
        // XXX  ->  XX
        //          X.
        let r = t.rotated();
        assert_eq!(r.shape().len(), 3);
        assert_eq!(cells_of(&r), vec![(0, 0), (1, 0), (1, 1), (2, 0)]);
        // Four turns return to the start
        assert_eq!(r.rotated().rotated().rotated(), t);
    }

    #[test]
    fn test_rotate_i_changes_extent() {
        let i = Tetromino::new(TetrominoKind::I, Cell::new(2, 3));
        let r = i.rotated();
        assert_eq!(r.extent(), Aabb::new(3.0, 2.0, 1.0, 4.0));
    }

    #[test]
    fn test_fits_rejects_walls_and_stack() {
        let mut board: Board<Option<Color>> = Board::new(20, 10);
        let o = Tetromino::new(TetrominoKind::O, Cell::new(0, 4));
        assert!(o.fits(&board));
        assert!(!o.moved(0, 5).fits(&board));
        assert!(!o.moved(19, 0).fits(&board));
        assert!(!o.moved(0, -5).fits(&board));

        board.set(1, 5, Some(palette::RED));
        assert!(!o.fits(&board));
    }

    #[test]
    fn test_place_on_marks_cells() {
        let mut board: Board<Option<Color>> = Board::new(20, 10);
        let l = Tetromino::new(TetrominoKind::L, Cell::new(18, 0));
        l.place_on(&mut board);
        assert_eq!(board.occupied_count(), 4);
        assert_eq!(board.get(18, 2), Some(&Some(TetrominoKind::L.color())));
    }
}
