//! Next-state rule, CPU reference
//!
//! The authoritative copy of the rule runs on the GPU (`gfx/rule.wgsl`);
//! this is its pure ground truth, kept in lockstep for testing.

/// Next state of a cell from its 3x3 neighborhood sum
///
/// `sum` counts alive cells over the Moore neighborhood *including the
/// center cell*, so it ranges over 0..=9. Alive iff the sum is exactly 4 or
/// strictly greater than 5. Not Conway's Game of Life: this rule settles
/// into stable "spot" textures instead of producing gliders.
pub fn next_state(sum: u32) -> bool {
    matches!(sum, 4 | 6..=9)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Toroidal reference grid mirroring the shader, one bool per cell.
    struct Grid {
        width: usize,
        height: usize,
        cells: Vec<bool>,
    }

    impl Grid {
        fn new(width: usize, height: usize, alive: bool) -> Self {
            Self {
                width,
                height,
                cells: vec![alive; width * height],
            }
        }

        fn set(&mut self, x: usize, y: usize, alive: bool) {
            self.cells[y * self.width + x] = alive;
        }

        fn get(&self, x: isize, y: isize) -> bool {
            let x = x.rem_euclid(self.width as isize) as usize;
            let y = y.rem_euclid(self.height as isize) as usize;
            self.cells[y * self.width + x]
        }

        fn neighborhood_sum(&self, x: usize, y: usize) -> u32 {
            let mut sum = 0;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if self.get(x as isize + dx, y as isize + dy) {
                        sum += 1;
                    }
                }
            }
            sum
        }

        fn step(&mut self) {
            let mut next = vec![false; self.cells.len()];
            for y in 0..self.height {
                for x in 0..self.width {
                    next[y * self.width + x] = next_state(self.neighborhood_sum(x, y));
                }
            }
            self.cells = next;
        }

        fn all(&self, alive: bool) -> bool {
            self.cells.iter().all(|&cell| cell == alive)
        }
    }

    #[test]
    fn test_rule_table() {
        let expected = [
            false, false, false, false, // 0..=3
            true,  // 4
            false, // 5
            true, true, true, true, // 6..=9
        ];
        for (sum, &alive) in expected.iter().enumerate() {
            assert_eq!(next_state(sum as u32), alive, "sum = {sum}");
        }
    }

    #[test]
    fn test_all_dead_stays_dead() {
        let mut grid = Grid::new(4, 4, false);
        grid.step();
        assert!(grid.all(false));
    }

    #[test]
    fn test_all_alive_stays_alive() {
        // Every neighborhood sums to 9 because a cell counts itself.
        let mut grid = Grid::new(4, 4, true);
        grid.step();
        assert!(grid.all(true));
    }

    #[test]
    fn test_lone_cell_dies() {
        let mut grid = Grid::new(5, 5, false);
        grid.set(2, 2, true);
        grid.step();
        assert!(grid.all(false), "no cell can reach a sum of 4");
    }

    #[test]
    fn test_toroidal_wrap() {
        let mut grid = Grid::new(5, 5, false);
        grid.set(0, 2, true);

        // The alive cell in column 0 contributes to the sums of cells in
        // the opposite column, and vice versa across all four edges.
        assert_eq!(grid.neighborhood_sum(4, 2), 1);
        assert_eq!(grid.neighborhood_sum(4, 1), 1);
        assert_eq!(grid.neighborhood_sum(4, 3), 1);

        let mut grid = Grid::new(5, 5, false);
        grid.set(2, 0, true);
        assert_eq!(grid.neighborhood_sum(2, 4), 1);

        let mut grid = Grid::new(5, 5, false);
        grid.set(0, 0, true);
        assert_eq!(grid.neighborhood_sum(4, 4), 1);
    }
}
