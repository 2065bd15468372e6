// Packed occupancy grid keyed by `y * width + x`
//
// Every blocked/visited/food/hazard set in the engine is a CellSet, so
// membership tests never allocate or hash.

use crate::types::Coord;

/// Largest width or height a grid is built with
pub const MAX_DIMENSION: i32 = 255;

/// Set of board cells backed by a flat boolean grid
///
/// Out-of-bounds coordinates are never members; inserting one is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSet {
    width: i32,
    height: i32,
    cells: Vec<bool>,
    len: usize,
}

impl CellSet {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.clamp(1, MAX_DIMENSION);
        let height = height.clamp(1, MAX_DIMENSION);
        CellSet {
            width,
            height,
            cells: vec![false; (width as usize) * (height as usize)],
            len: 0,
        }
    }

    pub fn from_coords<'a, I>(width: i32, height: i32, coords: I) -> Self
    where
        I: IntoIterator<Item = &'a Coord>,
    {
        let mut set = CellSet::new(width, height);
        set.extend(coords);
        set
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells on the grid
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    pub fn in_bounds(&self, coord: &Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// Flat index of an in-bounds coordinate
    pub fn index_of(&self, coord: &Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some((coord.y * self.width + coord.x) as usize)
        } else {
            None
        }
    }

    pub fn coord_of(&self, index: usize) -> Coord {
        let index = index as i32;
        Coord {
            x: index % self.width,
            y: index / self.width,
        }
    }

    pub fn contains(&self, coord: &Coord) -> bool {
        self.index_of(coord).map_or(false, |idx| self.cells[idx])
    }

    /// Adds a cell, returning true if it was not already present
    pub fn insert(&mut self, coord: Coord) -> bool {
        match self.index_of(&coord) {
            Some(idx) if !self.cells[idx] => {
                self.cells[idx] = true;
                self.len += 1;
                true
            }
            _ => false,
        }
    }

    /// Removes a cell, returning true if it was present
    pub fn remove(&mut self, coord: &Coord) -> bool {
        match self.index_of(coord) {
            Some(idx) if self.cells[idx] => {
                self.cells[idx] = false;
                self.len -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn extend<'a, I>(&mut self, coords: I)
    where
        I: IntoIterator<Item = &'a Coord>,
    {
        for coord in coords {
            self.insert(*coord);
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &set)| set)
            .map(move |(idx, _)| self.coord_of(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove_tracks_len() {
        let mut set = CellSet::new(5, 4);
        assert!(set.insert(Coord::new(4, 3)));
        assert!(!set.insert(Coord::new(4, 3)));
        assert!(set.insert(Coord::new(0, 0)));
        assert_eq!(set.len(), 2);
        assert!(set.remove(&Coord::new(4, 3)));
        assert!(!set.remove(&Coord::new(4, 3)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_out_of_bounds_is_never_member() {
        let mut set = CellSet::new(3, 3);
        assert!(!set.insert(Coord::new(-1, 0)));
        assert!(!set.insert(Coord::new(0, 3)));
        assert!(set.is_empty());
        assert!(!set.contains(&Coord::new(3, 0)));
    }

    #[test]
    fn test_dimensions_are_clamped() {
        let set = CellSet::new(i32::MAX, -4);
        assert_eq!(set.width(), MAX_DIMENSION);
        assert_eq!(set.height(), 1);
        assert_eq!(set.area(), MAX_DIMENSION as usize);
    }

    #[test]
    fn test_index_is_row_major() {
        let set = CellSet::new(7, 5);
        let coord = Coord::new(3, 2);
        assert_eq!(set.index_of(&coord), Some(2 * 7 + 3));
        assert_eq!(set.coord_of(17), coord);
        assert_eq!(
            CellSet::from_coords(7, 5, &[coord]).iter().collect::<Vec<_>>(),
            vec![coord]
        );
    }
}
