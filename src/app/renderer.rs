use std::fmt;
use std::io::{Stdout, Write};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::grid::{Direction, Grid};

/// One position in the rendered lattice: solid masonry or open floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tile {
    Wall,
    Open,
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const TILE_WIDTH: u16 = 2;
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Tile::Wall => "⬜".with(Color::White),
            Tile::Open => "  ".with(Color::Reset),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Tile::TILE_WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Tile at position `(x, y)` of the `(2C+1) x (2R+1)` display lattice.
///
/// Cell interiors sit at odd/odd positions and are always open; the tile
/// between two interiors is open exactly when the shared wall is absent;
/// pillars and the outer boundary are always solid. Per cell, the four
/// surrounding boundary tiles follow that cell's four wall flags.
fn tile_at(grid: &Grid, x: usize, y: usize) -> Tile {
    match (y % 2 == 1, x % 2 == 1) {
        // Cell interior
        (true, true) => Tile::Open,
        // Pillar between four cells, or an outer corner
        (false, false) => Tile::Wall,
        // Vertical wall segment left/right of a cell
        (true, false) => {
            if x == 0 {
                return Tile::Wall;
            }
            let row = (y - 1) / 2;
            let col = x / 2 - 1;
            let cell = grid.index_of(row as u16, col as u16);
            if grid.has_wall(cell, Direction::Right) {
                Tile::Wall
            } else {
                Tile::Open
            }
        }
        // Horizontal wall segment above/below a cell
        (false, true) => {
            if y == 0 {
                return Tile::Wall;
            }
            let row = y / 2 - 1;
            let col = (x - 1) / 2;
            let cell = grid.index_of(row as u16, col as u16);
            if grid.has_wall(cell, Direction::Down) {
                Tile::Wall
            } else {
                Tile::Open
            }
        }
    }
}

pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
}

impl Renderer {
    /// Rows reserved below the maze for the status line.
    pub const NUM_LOG_ROWS: u16 = 2;

    pub fn new() -> Self {
        Renderer {
            stdout: std::io::stdout(),
        }
    }

    /// Whether the current terminal can display the grid plus the status rows.
    pub fn fits(grid: &Grid) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        let lattice_width = (grid.cols() as u32 * 2 + 1) * Tile::TILE_WIDTH as u32;
        let lattice_height = grid.rows() as u32 * 2 + 1 + Renderer::NUM_LOG_ROWS as u32;
        Ok(term_width as u32 >= lattice_width && term_height as u32 >= lattice_height)
    }

    /// Draws the whole grid, one queued tile at a time, then flushes.
    pub fn draw(&mut self, grid: &Grid) -> std::io::Result<()> {
        queue!(
            self.stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        let lattice_rows = grid.rows() as usize * 2 + 1;
        let lattice_cols = grid.cols() as usize * 2 + 1;
        for y in 0..lattice_rows {
            for x in 0..lattice_cols {
                self.stdout.queue(style::Print(tile_at(grid, x, y)))?;
            }
            self.stdout.queue(style::Print("\r\n"))?;
        }
        self.stdout.flush()
    }

    /// Writes a status line below the maze, truncated to the terminal width.
    pub fn status(&mut self, grid: &Grid, line: &str) -> std::io::Result<()> {
        let (term_width, _) = terminal::size()?;
        let (line, _) = line.unicode_truncate(term_width as usize);
        let y = (grid.rows() as u32 * 2 + 2).min(u16::MAX as u32) as u16;
        queue!(
            self.stdout,
            cursor::MoveTo(0, y),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(line.to_string().with(Color::Cyan))
        )?;
        self.stdout.flush()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cell_lattice() {
        let grid = Grid::new(1, 1).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                let expected = if x == 1 && y == 1 { Tile::Open } else { Tile::Wall };
                assert_eq!(tile_at(&grid, x, y), expected);
            }
        }
    }

    #[test]
    fn test_removed_wall_opens_shared_tile() {
        let mut grid = Grid::new(1, 2).unwrap();
        let left = grid.index_of(0, 0);
        grid.remove_wall(left, Direction::Right);
        // Lattice is 3 rows x 5 cols; the shared edge sits at (2, 1)
        assert_eq!(tile_at(&grid, 2, 1), Tile::Open);
        // Cell interiors open, outer boundary still solid
        assert_eq!(tile_at(&grid, 1, 1), Tile::Open);
        assert_eq!(tile_at(&grid, 3, 1), Tile::Open);
        assert_eq!(tile_at(&grid, 0, 1), Tile::Wall);
        assert_eq!(tile_at(&grid, 4, 1), Tile::Wall);
    }

    #[test]
    fn test_walled_grid_has_solid_edges() {
        let grid = Grid::new(2, 2).unwrap();
        let lattice = 5;
        for i in 0..lattice {
            assert_eq!(tile_at(&grid, i, 0), Tile::Wall);
            assert_eq!(tile_at(&grid, i, lattice - 1), Tile::Wall);
            assert_eq!(tile_at(&grid, 0, i), Tile::Wall);
            assert_eq!(tile_at(&grid, lattice - 1, i), Tile::Wall);
        }
        // All interior walls still up
        assert_eq!(tile_at(&grid, 2, 1), Tile::Wall);
        assert_eq!(tile_at(&grid, 1, 2), Tile::Wall);
        assert_eq!(tile_at(&grid, 3, 2), Tile::Wall);
        assert_eq!(tile_at(&grid, 2, 3), Tile::Wall);
    }
}
