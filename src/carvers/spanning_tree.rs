use rand::{Rng, rngs::StdRng, seq::SliceRandom};

use crate::error::MazeError;
use crate::grid::{Direction, Grid};

/// Connected components of cells, tracked while walls come down.
///
/// Every cell starts in its own singleton set. `union` always folds the
/// second argument's set into the first's, reassigning each moved member and
/// appending it to the winner's list, so the member bookkeeping stays exact.
struct Partition {
    set_of: Vec<usize>,
    members: Vec<Vec<usize>>,
}

impl Partition {
    fn new(len: usize) -> Self {
        Partition {
            set_of: (0..len).collect(),
            members: (0..len).map(|cell| vec![cell]).collect(),
        }
    }

    fn find(&self, cell: usize) -> usize {
        self.set_of[cell]
    }

    fn union(&mut self, a: usize, b: usize) {
        let winner = self.set_of[a];
        let loser = self.set_of[b];
        if winner == loser {
            return;
        }
        let moved = std::mem::take(&mut self.members[loser]);
        for &cell in &moved {
            self.set_of[cell] = winner;
        }
        self.members[winner].extend(moved);
    }
}

/// Candidate wall between two adjacent cells.
#[derive(Clone, Copy)]
struct Wall {
    a: usize,
    b: usize,
}

/// Every interior wall exactly once: the rightward edge and the downward
/// edge of each cell that has one.
fn interior_walls(grid: &Grid) -> Vec<Wall> {
    (0..grid.len())
        .flat_map(|cell| {
            [
                grid.neighbor(cell, Direction::Right).map(|b| Wall { a: cell, b }),
                grid.neighbor(cell, Direction::Down).map(|b| Wall { a: cell, b }),
            ]
        })
        .flatten()
        .collect()
}

/// Carves a randomized spanning tree over the grid graph (Kruskal's
/// algorithm): shuffle the interior walls, then knock down each wall whose
/// two cells still belong to different components.
///
/// With `probability: None` every eligible wall is carved and the grid ends
/// as a single component with exactly `rows * cols - 1` passages and no
/// cycles. With `Some(p)` an eligible wall is carved only with probability
/// `p` (each wall decided independently, on its single pass through the
/// shuffled list), which leaves several components behind; follow up with
/// [`connect_remaining`](super::connect_remaining) before treating the maze
/// as complete.
pub fn carve_spanning_tree(
    grid: &mut Grid,
    probability: Option<f64>,
    rng: &mut StdRng,
) -> Result<(), MazeError> {
    if let Some(p) = probability {
        if !(0.0..=1.0).contains(&p) {
            return Err(MazeError::ProbabilityOutOfRange { probability: p });
        }
    }

    let mut partition = Partition::new(grid.len());
    let mut walls = interior_walls(grid);
    walls.shuffle(rng);

    for wall in walls {
        if partition.find(wall.a) == partition.find(wall.b) {
            continue;
        }
        if let Some(p) = probability {
            if !rng.random_bool(p) {
                continue;
            }
        }
        grid.remove_wall_between(wall.a, wall.b);
        partition.union(wall.a, wall.b);
    }
    Ok(())
}
