//! # Maze Generation
//!
//! Column-sweep maze generator.
//!
//! Odd columns hold the maze walls: their odd rows are always solid and their
//! even rows are decided by a coin flip. Even columns are open corridors,
//! except that column 0 also gets random walls on its odd rows when there is
//! an open column east of column 1 to reconnect its runs. After filling
//! an odd column, the generator walks every maximal run of passable cells in
//! the column to its left and knocks one opening into the current column for
//! each run, so every run keeps a way east. The result is always fully
//! connected, though it may contain loops.

use crate::{utils, CrawlError, CrawlResult, GenerationConfig, Generator, Vector, WallGrid};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// Seeded column-sweep maze generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MazeGenerator;

impl MazeGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Builds the wall grid for a `width` x `height` world.
    ///
    /// Random draws happen in a fixed column/row order, so the same seed and
    /// size reproduce the same grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use mazecrawl::MazeGenerator;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let first = MazeGenerator::new().generate_walls(15, 15, &mut StdRng::seed_from_u64(3));
    /// let second = MazeGenerator::new().generate_walls(15, 15, &mut StdRng::seed_from_u64(3));
    /// assert_eq!(first, second);
    /// ```
    pub fn generate_walls(&self, width: i32, height: i32, rng: &mut StdRng) -> WallGrid {
        let mut walls = WallGrid::open(width, height);

        for x in (1..width).step_by(2) {
            for y in (1..height).step_by(2) {
                walls.set(Vector::new(x, y), true);
            }
        }

        // A two-column world has no corridor east of column 1, so column 0
        // must stay open. The coin is still drawn to keep the stream aligned.
        let wall_first_column = width > 2;
        for y in (1..height).step_by(2) {
            let coin = rng.gen_bool(0.5);
            walls.set(Vector::new(0, y), wall_first_column && coin);
        }

        for x in (1..width).step_by(2) {
            for y in (0..height).step_by(2) {
                walls.set(Vector::new(x, y), rng.gen_bool(0.5));
            }
            self.open_passages(&mut walls, x, rng);
        }

        walls
    }

    /// Opens one cell of column `x` for every passable run of column `x - 1`.
    fn open_passages(&self, walls: &mut WallGrid, x: i32, rng: &mut StdRng) {
        let height = walls.height();
        let is_wall =
            |walls: &WallGrid, y: i32| walls.get(Vector::new(x - 1, y)) == Some(true);

        let mut start = 0;
        while start < height {
            if is_wall(&*walls, start) {
                start += 1;
                continue;
            }
            let mut end = start;
            while end < height && !is_wall(&*walls, end) {
                end += 1;
            }

            // Every run starts on an even row, so rounding down stays inside it.
            let row = rng.gen_range(start..end);
            walls.set(Vector::new(x, row - row % 2), false);

            start = end + 1;
        }
    }
}

impl Generator<WallGrid> for MazeGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CrawlResult<WallGrid> {
        if config.width < 2 || config.height < 2 {
            return Err(CrawlError::GenerationFailed(format!(
                "Maze must be at least 2x2, got {}x{}",
                config.width, config.height
            )));
        }

        let walls = self.generate_walls(config.width, config.height, rng);
        debug!(
            "{} built a {}x{} maze with {} walls",
            self.generator_type(),
            config.width,
            config.height,
            walls.wall_positions().len()
        );
        self.validate(&walls, config)?;
        Ok(walls)
    }

    fn validate(&self, walls: &WallGrid, config: &GenerationConfig) -> CrawlResult<()> {
        if walls.width() != config.width || walls.height() != config.height {
            return Err(CrawlError::GenerationFailed(format!(
                "Maze is {}x{}, expected {}x{}",
                walls.width(),
                walls.height(),
                config.width,
                config.height
            )));
        }
        if walls.walkable_positions().is_empty() {
            return Err(CrawlError::GenerationFailed("Maze has no walkable cells".to_string()));
        }
        if !utils::is_fully_connected(walls) {
            return Err(CrawlError::GenerationFailed(
                "Maze has unreachable walkable cells".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "MazeGenerator"
    }
}
