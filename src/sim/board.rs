//! Fixed-size grid store used by the maze, block-stacking and memory games
//!
//! Dimensions are fixed at construction. Every accessor takes signed
//! coordinates and range-checks them: reads outside the grid return `None`,
//! writes outside the grid are ignored.

use serde::{Deserialize, Serialize};

use super::entity::Cell;

/// Whether a cell blocks movement/placement
pub trait Occupancy {
    fn is_occupied(&self) -> bool;
}

impl<T> Occupancy for Option<T> {
    #[inline]
    fn is_occupied(&self) -> bool {
        self.is_some()
    }
}

/// Row-major 2D matrix of cell state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Clone> Board<T> {
    /// Board with every cell set to `value`
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }
}

impl<T: Clone + Default> Board<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::default())
    }

    /// Reset every cell to its default without resizing
    pub fn clear(&mut self) {
        self.cells.fill(T::default());
    }
}

impl<T> Board<T> {
    /// Build from row-major cells; `None` if the length does not match
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<T>) -> Option<Self> {
        (cells.len() == rows * cols).then_some(Self { rows, cols, cells })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    #[inline]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        self.contains(row, col)
            .then(|| row as usize * self.cols + col as usize)
    }

    pub fn get(&self, row: i32, col: i32) -> Option<&T> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    pub fn at(&self, cell: Cell) -> Option<&T> {
        self.get(cell.row, cell.col)
    }

    pub fn at_mut(&mut self, cell: Cell) -> Option<&mut T> {
        self.index(cell.row, cell.col).map(|i| &mut self.cells[i])
    }

    /// Write a cell; returns false (and changes nothing) when out of range
    pub fn set(&mut self, row: i32, col: i32, value: T) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    /// One row as a slice
    pub fn row(&self, row: usize) -> Option<&[T]> {
        (row < self.rows).then(|| &self.cells[row * self.cols..(row + 1) * self.cols])
    }

    /// All cells with their coordinates, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &T)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, value)| (Cell::new((i / cols) as i32, (i % cols) as i32), value))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.cells.iter()
    }
}

impl<T: Occupancy> Board<T> {
    /// A row is full iff every one of its cells is occupied
    pub fn is_row_full(&self, row: usize) -> bool {
        self.row(row)
            .is_some_and(|cells| cells.iter().all(Occupancy::is_occupied))
    }
}

impl<T: Occupancy + Clone + Default> Board<T> {
    /// Remove every full row at once and let the rows above fall
    ///
    /// Surviving rows keep their relative order; fresh empty rows are
    /// inserted at the top. Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> usize {
        let cols = self.cols;
        let full: Vec<bool> = (0..self.rows).map(|r| self.is_row_full(r)).collect();
        let cleared = full.iter().filter(|&&f| f).count();
        if cleared == 0 {
            return 0;
        }

        let mut cells = vec![T::default(); cleared * cols];
        cells.reserve(self.cells.len() - cleared * cols);
        for (row, chunk) in self.cells.chunks(cols).enumerate() {
            if !full[row] {
                cells.extend_from_slice(chunk);
            }
        }
        self.cells = cells;
        cleared
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }
}
