use rand::{Rng, rngs::StdRng, seq::SliceRandom};

use crate::grid::{Direction, Grid};

/// One cell on the walk, with its shuffled direction order.
///
/// Steps 0..4 sweep the directions through passages that are already open;
/// steps 4..8 sweep the same order again, forcing a passage to any neighbor
/// still unvisited. The same shuffle serves both sweeps.
struct Frame {
    cell: usize,
    dirs: [Direction; 4],
    step: usize,
}

impl Frame {
    fn new(cell: usize, rng: &mut StdRng) -> Self {
        let mut dirs = Direction::ALL;
        dirs.shuffle(rng);
        Frame { cell, dirs, step: 0 }
    }
}

/// Makes every cell reachable from every other, whatever earlier passes left
/// disconnected.
///
/// A depth-first walk from a random start cell follows already-open passages
/// first, preserving openings created by earlier passes, and only when those
/// are exhausted knocks down a wall to each still-unvisited neighbor. On a
/// grid that is already fully connected the first sweep reaches everything
/// and no new wall comes down, so repeated calls are harmless.
///
/// The recursion is flattened onto an explicit frame stack; its depth is
/// bounded by the cell count.
pub fn connect_remaining(grid: &mut Grid, rng: &mut StdRng) {
    let start = {
        let row = rng.random_range(0..grid.rows());
        let col = rng.random_range(0..grid.cols());
        grid.index_of(row, col)
    };

    let mut visited = vec![false; grid.len()];
    visited[start] = true;
    let mut stack = vec![Frame::new(start, rng)];

    loop {
        let (cell, dir, forcing) = match stack.last_mut() {
            None => break,
            Some(frame) => {
                if frame.step == 8 {
                    stack.pop();
                    continue;
                }
                let dir = frame.dirs[frame.step % 4];
                let forcing = frame.step >= 4;
                frame.step += 1;
                (frame.cell, dir, forcing)
            }
        };

        let next = if forcing {
            grid.neighbor(cell, dir)
        } else {
            grid.open_neighbor(cell, dir)
        };
        let Some(next) = next.filter(|&n| !visited[n]) else {
            continue;
        };

        if forcing {
            grid.remove_wall(cell, dir);
        }
        visited[next] = true;
        stack.push(Frame::new(next, rng));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn reachable_count(grid: &Grid) -> usize {
        let mut seen = vec![false; grid.len()];
        let mut stack = vec![0];
        seen[0] = true;
        let mut count = 1;
        while let Some(cell) = stack.pop() {
            for dir in Direction::ALL {
                if let Some(next) = grid.open_neighbor(cell, dir) {
                    if !seen[next] {
                        seen[next] = true;
                        count += 1;
                        stack.push(next);
                    }
                }
            }
        }
        count
    }

    fn wall_snapshot(grid: &Grid) -> Vec<bool> {
        (0..grid.len())
            .flat_map(|cell| Direction::ALL.map(|dir| grid.has_wall(cell, dir)))
            .collect()
    }

    #[test]
    fn test_fresh_grid_becomes_spanning_tree() {
        let mut grid = Grid::new(6, 7).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        connect_remaining(&mut grid, &mut rng);
        // Every cell entered exactly once through one forced passage: a tree
        assert_eq!(grid.open_passages(), grid.len() - 1);
        assert_eq!(reachable_count(&grid), grid.len());
    }

    #[test]
    fn test_second_run_changes_nothing() {
        let mut grid = Grid::new(5, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        connect_remaining(&mut grid, &mut rng);
        let before = wall_snapshot(&grid);
        connect_remaining(&mut grid, &mut rng);
        assert_eq!(wall_snapshot(&grid), before);
    }

    #[test]
    fn test_preserves_existing_openings() {
        let mut grid = Grid::new(4, 6).unwrap();
        // Pre-open a corridor along the top row
        for col in 0..5 {
            let cell = grid.index_of(0, col);
            grid.remove_wall(cell, Direction::Right);
        }
        let mut rng = StdRng::seed_from_u64(2);
        connect_remaining(&mut grid, &mut rng);
        for col in 0..5 {
            let cell = grid.index_of(0, col);
            assert!(!grid.has_wall(cell, Direction::Right));
        }
        assert_eq!(reachable_count(&grid), grid.len());
    }

    #[test]
    fn test_single_cell_is_noop() {
        let mut grid = Grid::new(1, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        connect_remaining(&mut grid, &mut rng);
        assert_eq!(grid.open_passages(), 0);
    }

    #[test]
    fn test_connects_any_prior_wall_state() {
        // A few disjoint fragments from different carving orders
        for seed in [1, 17, 99] {
            let mut grid = Grid::new(9, 5).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            super::super::carve_spanning_tree(&mut grid, Some(0.2), &mut rng).unwrap();
            connect_remaining(&mut grid, &mut rng);
            assert_eq!(reachable_count(&grid), grid.len());
        }
    }
}
