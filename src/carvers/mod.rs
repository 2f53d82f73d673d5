use rand::{SeedableRng, rngs::StdRng};

mod backtracker;
mod hallways;
mod spanning_tree;

pub use backtracker::connect_remaining;
pub use hallways::{HallwayStyle, carve_hallways};
pub use spanning_tree::carve_spanning_tree;

use crate::error::MazeError;
use crate::grid::Grid;

/// Probability that an eligible wall comes down during a partial carve.
const PARTIAL_CARVE_PROBABILITY: f64 = 0.2;

/// Get a random number generator, optionally seeded for reproducibility.
fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Preset carving pipelines, each producing a different maze texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Texture {
    /// Pure depth-first carve: long winding corridors, few branches.
    Backtracker,
    /// Full randomized spanning tree: short dead ends everywhere.
    SpanningTree,
    /// Short hallways, a sparse partial carve, then connectivity repair:
    /// dense maze with open pockets.
    Hybrid,
    /// Long and short hallways over a dense maze.
    Hallways,
}

impl std::fmt::Display for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Texture::Backtracker => write!(f, "Randomized Backtracker"),
            Texture::SpanningTree => write!(f, "Spanning Tree (Kruskal's Algorithm)"),
            Texture::Hybrid => write!(f, "Hybrid (sparse carve with rooms)"),
            Texture::Hallways => write!(f, "Hallways"),
        }
    }
}

/// Runs the carving pipeline for `texture` over a freshly built grid.
///
/// One RNG is created up front and threaded through every step, so a fixed
/// seed makes the whole pipeline deterministic. Every texture ends fully
/// connected: the ones that can leave components behind finish with
/// [`connect_remaining`].
pub fn carve_texture(grid: &mut Grid, texture: Texture, seed: Option<u64>) -> Result<(), MazeError> {
    let mut rng = get_rng(seed);
    tracing::debug!(%texture, rows = grid.rows(), cols = grid.cols(), "carving maze");
    match texture {
        Texture::Backtracker => {
            connect_remaining(grid, &mut rng);
        }
        Texture::SpanningTree => {
            carve_spanning_tree(grid, None, &mut rng)?;
        }
        Texture::Hybrid => {
            carve_hallways(grid, HallwayStyle::Short, 5, 5, &mut rng);
            carve_spanning_tree(grid, Some(PARTIAL_CARVE_PROBABILITY), &mut rng)?;
            connect_remaining(grid, &mut rng);
        }
        Texture::Hallways => {
            carve_hallways(grid, HallwayStyle::Long, 5, 5, &mut rng);
            carve_hallways(grid, HallwayStyle::Short, 20, 20, &mut rng);
            connect_remaining(grid, &mut rng);
        }
    }
    tracing::debug!(passages = grid.open_passages(), "carve finished");
    Ok(())
}
