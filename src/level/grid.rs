//! Sparse (row, column) -> Block index of the playfield.

use std::collections::HashMap;
use std::fmt;

use super::block::Block;

/// Position on the playfield, in the same units the character reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct GridCoord {
    pub row: i32,
    pub column: i32,
}

impl GridCoord {
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    pub fn offset(self, rows: i32, columns: i32) -> Self {
        Self::new(self.row + rows, self.column + columns)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Missing keys are pits; lookups never insert.
#[derive(Debug, Default)]
pub struct BlockGrid {
    cells: HashMap<GridCoord, Block>,
}

impl BlockGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins.
    pub fn set(&mut self, row: i32, column: i32, block: Block) {
        self.cells.insert(GridCoord::new(row, column), block);
    }

    pub fn get(&self, row: i32, column: i32) -> Option<&Block> {
        self.cells.get(&GridCoord::new(row, column))
    }

    pub fn get_mut(&mut self, row: i32, column: i32) -> Option<&mut Block> {
        self.cells.get_mut(&GridCoord::new(row, column))
    }

    pub fn at(&self, coord: GridCoord) -> Option<&Block> {
        self.cells.get(&coord)
    }

    pub fn at_mut(&mut self, coord: GridCoord) -> Option<&mut Block> {
        self.cells.get_mut(&coord)
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &Block)> {
        self.cells.iter().map(|(c, b)| (*c, b))
    }

    pub fn blocks_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        self.cells.values_mut()
    }

    /// Sorted top-to-bottom, left-to-right (draw order).
    pub fn coords(&self) -> Vec<GridCoord> {
        let mut coords: Vec<GridCoord> = self.cells.keys().copied().collect();
        coords.sort();
        coords
    }

    /// First block (in draw order) whose rotation is still playing.
    pub fn rotating(&self) -> Option<GridCoord> {
        self.coords()
            .into_iter()
            .find(|c| self.cells.get(c).is_some_and(Block::is_rotating))
    }
}
