use rand::{Rng, rngs::StdRng};

use crate::grid::{Direction, Grid};

/// Corridor shape carved by a hallway pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HallwayStyle {
    /// Endpoints drawn from the whole axis: corridors up to full width.
    Long,
    /// Endpoints drawn from the middle half of the axis, span at most a
    /// quarter of it: room-like pockets instead of full corridors.
    Short,
}

/// Punches straight corridors into the grid before other passes run.
///
/// Each horizontal pass picks a random row and removes the right-wall of
/// every cell across a random span; each vertical pass picks a random column
/// and removes up-walls along a span. The passes touch nothing but wall
/// flags, so they are always safe on a freshly built grid. A zero-length
/// span carves nothing.
pub fn carve_hallways(
    grid: &mut Grid,
    style: HallwayStyle,
    horizontal: u16,
    vertical: u16,
    rng: &mut StdRng,
) {
    for _ in 0..horizontal {
        let row = rng.random_range(0..grid.rows());
        let (start, end) = span(style, grid.cols(), rng);
        for col in start..end {
            let cell = grid.index_of(row, col);
            grid.remove_wall(cell, Direction::Right);
        }
    }

    for _ in 0..vertical {
        let col = rng.random_range(0..grid.cols());
        let (start, end) = span(style, grid.rows(), rng);
        for row in start..end {
            let cell = grid.index_of(row, col);
            // Row 0 has no upward neighbor; the removal is a no-op there
            grid.remove_wall(cell, Direction::Up);
        }
    }
}

/// Ordered endpoints of one corridor along an axis of the given length.
fn span(style: HallwayStyle, axis: u16, rng: &mut StdRng) -> (u16, u16) {
    match style {
        HallwayStyle::Long => {
            let s = rng.random_range(0..axis);
            let e = rng.random_range(0..axis);
            if s <= e { (s, e) } else { (e, s) }
        }
        HallwayStyle::Short => {
            let quarter = axis / 4;
            let s = rng.random_range(0..axis) / 2 + quarter;
            let e = s - rng.random_range(0..=quarter);
            (e, s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_wall_symmetry_after_hallways() {
        let mut grid = Grid::new(10, 12).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        carve_hallways(&mut grid, HallwayStyle::Long, 5, 5, &mut rng);
        carve_hallways(&mut grid, HallwayStyle::Short, 20, 20, &mut rng);
        for cell in 0..grid.len() {
            for dir in Direction::ALL {
                if let Some(neighbor) = grid.neighbor(cell, dir) {
                    assert_eq!(
                        grid.has_wall(cell, dir),
                        grid.has_wall(neighbor, dir.opposite())
                    );
                }
            }
        }
    }

    #[test]
    fn test_short_span_is_centered_and_bounded() {
        let mut rng = StdRng::seed_from_u64(13);
        for axis in [4u16, 9, 16, 33, 130] {
            let quarter = axis / 4;
            for _ in 0..200 {
                let (start, end) = span(HallwayStyle::Short, axis, &mut rng);
                assert!(start <= end);
                assert!(end - start <= quarter);
                // The far endpoint sits in the middle band of the axis
                assert!(end >= quarter);
                assert!(end <= quarter + axis / 2);
                assert!(end < axis);
            }
        }
    }

    #[test]
    fn test_long_span_is_ordered() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..200 {
            let (start, end) = span(HallwayStyle::Long, 20, &mut rng);
            assert!(start <= end);
            assert!(end < 20);
        }
    }

    #[test]
    fn test_zero_counts_carve_nothing() {
        let mut grid = Grid::new(6, 6).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        carve_hallways(&mut grid, HallwayStyle::Long, 0, 0, &mut rng);
        carve_hallways(&mut grid, HallwayStyle::Short, 0, 0, &mut rng);
        assert_eq!(grid.open_passages(), 0);
    }

    #[test]
    fn test_single_cell_is_noop() {
        let mut grid = Grid::new(1, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        carve_hallways(&mut grid, HallwayStyle::Long, 5, 5, &mut rng);
        carve_hallways(&mut grid, HallwayStyle::Short, 5, 5, &mut rng);
        assert_eq!(grid.open_passages(), 0);
    }

    #[test]
    fn test_long_pass_carves_along_one_line() {
        // With one row the horizontal passes can only open right-walls in it
        let mut grid = Grid::new(1, 30).unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        carve_hallways(&mut grid, HallwayStyle::Long, 3, 0, &mut rng);
        for cell in 0..grid.len() {
            assert!(grid.has_wall(cell, Direction::Up));
            assert!(grid.has_wall(cell, Direction::Down));
        }
    }
}
