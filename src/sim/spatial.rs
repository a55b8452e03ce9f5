//! Uniform grid broad phase for disc-disc contacts.
//!
//! Only prey are binned: they all share one radius, so a cell size of one
//! prey diameter keeps prey-prey queries to a 3×3 block. Predators are few and
//! query the grid with their own (growing) radius instead of being inserted.
//!
//! Results are a conservative over-approximation; callers do the exact
//! distance check.

use std::collections::HashMap;

use glam::Vec2;

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    /// Cell -> dense entity indices, in insertion order
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
        }
    }

    fn world_to_cell(&self, pos: Vec2) -> (i32, i32) {
        let x = (pos.x / self.cell_size).floor() as i32;
        let y = (pos.y / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Insert an entity index at a position
    pub fn insert(&mut self, index: usize, pos: Vec2) {
        let cell = self.world_to_cell(pos);
        self.cells.entry(cell).or_default().push(index);
    }

    /// Indices in every cell overlapping the square around `pos` of half-size `reach`
    pub fn query(&self, pos: Vec2, reach: f32) -> Vec<usize> {
        let cell = self.world_to_cell(pos);
        let span = ((reach / self.cell_size).ceil() as i32).max(1);

        let mut found = Vec::new();
        for dx in -span..=span {
            for dy in -span..=span {
                if let Some(indices) = self.cells.get(&(cell.0 + dx, cell.1 + dy)) {
                    found.extend_from_slice(indices);
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_finds_neighbours_across_cells() {
        let mut grid = SpatialGrid::new(10.0);
        grid.insert(0, Vec2::new(9.0, 9.0));
        grid.insert(1, Vec2::new(11.0, 11.0));
        grid.insert(2, Vec2::new(200.0, 200.0));

        let mut found = grid.query(Vec2::new(9.0, 9.0), 10.0);
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn test_large_reach_scans_more_cells() {
        let mut grid = SpatialGrid::new(10.0);
        grid.insert(0, Vec2::new(-95.0, 0.0));
        assert!(grid.query(Vec2::ZERO, 10.0).is_empty());
        assert_eq!(grid.query(Vec2::ZERO, 100.0), vec![0]);
    }
}
