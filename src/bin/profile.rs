use mazecarve::MazeError;
use mazecarve::carvers::{Texture, carve_texture};
use mazecarve::grid::Grid;

/// Batch-generates mazes without rendering, for profiling the carvers.
fn main() -> Result<(), MazeError> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let iterations = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1);

    for texture in [
        Texture::Backtracker,
        Texture::SpanningTree,
        Texture::Hybrid,
        Texture::Hallways,
    ] {
        for _ in 0..iterations {
            let mut grid = Grid::new(255, 255)?;
            carve_texture(&mut grid, texture, None)?;
        }
    }
    Ok(())
}
