//! # Generation Module
//!
//! Seeded content generation: the maze, the enemy roster, the equipment and
//! the builders that assemble them into a fresh [`World`](crate::World).
//!
//! All randomness flows through one `StdRng` created from the configured
//! seed, consumed in a fixed order, so the same configuration always yields
//! the same world.

pub mod builder;
pub mod encounters;
pub mod items;
pub mod maze;
pub mod records;

pub use builder::*;
pub use encounters::*;
pub use items::*;
pub use maze::*;
pub use records::*;

use crate::config::{
    DEFAULT_ENEMY_COUNT, DEFAULT_EQUIPMENT_COUNT, DEFAULT_WORLD_HEIGHT, DEFAULT_WORLD_WIDTH,
};
use crate::{CrawlError, CrawlResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Relative weights of the enemy difficulty tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyWeights {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}

impl Default for DifficultyWeights {
    fn default() -> Self {
        Self {
            easy: 1,
            medium: 1,
            hard: 1,
        }
    }
}

/// Configuration for world generation.
///
/// Every field has a default, so a JSON config file only needs to name the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// World width in cells
    pub width: i32,
    /// World height in cells
    pub height: i32,
    /// Number of enemies to place
    pub enemy_count: usize,
    /// Number of equipment items to place
    pub equipment_count: usize,
    /// Relative frequency of easy, medium and hard enemies
    pub difficulty_weights: DifficultyWeights,
    /// Probability that a placed enemy is a slime (0.0 to 1.0)
    pub slime_ratio: f64,
    /// Probability that a placed item is a helmet rather than a sword (0.0 to 1.0)
    pub helmet_ratio: f64,
}

impl GenerationConfig {
    /// Creates the standard configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use mazecrawl::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(12345);
    /// assert_eq!(config.seed, 12345);
    /// assert_eq!((config.width, config.height), (15, 15));
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: DEFAULT_WORLD_WIDTH,
            height: DEFAULT_WORLD_HEIGHT,
            enemy_count: DEFAULT_ENEMY_COUNT,
            equipment_count: DEFAULT_EQUIPMENT_COUNT,
            difficulty_weights: DifficultyWeights::default(),
            slime_ratio: 0.5,
            helmet_ratio: 0.5,
        }
    }

    /// Creates a configuration for testing with a small, sparsely populated maze.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 9,
            height: 9,
            enemy_count: 3,
            equipment_count: 2,
            difficulty_weights: DifficultyWeights {
                easy: 2,
                medium: 1,
                hard: 0,
            },
            slime_ratio: 0.0,
            helmet_ratio: 0.5,
        }
    }

    /// Parses a configuration from JSON, filling missing fields with defaults.
    pub fn from_json_str(json: &str) -> CrawlResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> CrawlResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Rejects configurations no world can be built from.
    pub fn validate(&self) -> CrawlResult<()> {
        if self.width < 2 || self.height < 2 {
            return Err(CrawlError::GenerationFailed(format!(
                "World must be at least 2x2, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(CrawlError::GenerationFailed(format!(
                "World of {}x{} cells is too large",
                self.width, self.height
            )));
        }
        let weights = self.difficulty_weights;
        if weights.easy == 0 && weights.medium == 0 && weights.hard == 0 {
            return Err(CrawlError::GenerationFailed(
                "All difficulty weights are zero".to_string(),
            ));
        }
        let ratios = [("slime_ratio", self.slime_ratio), ("helmet_ratio", self.helmet_ratio)];
        for (name, ratio) in ratios {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(CrawlError::GenerationFailed(format!(
                    "{} must be within [0, 1], got {}",
                    name, ratio
                )));
            }
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CrawlResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> CrawlResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use crate::{Vector, WallGrid};
    use rand::SeedableRng;
    use std::collections::{HashSet, VecDeque};

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Flood fill over walkable cells through cardinal steps.
    pub fn reachable_from(walls: &WallGrid, start: Vector) -> HashSet<Vector> {
        let mut visited = HashSet::new();
        if walls.get(start) != Some(false) {
            return visited;
        }

        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            for next in pos.cardinal_neighbors() {
                if walls.get(next) == Some(false) && visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        visited
    }

    /// Whether every walkable cell can reach every other one.
    pub fn is_fully_connected(walls: &WallGrid) -> bool {
        let walkable = walls.walkable_positions();
        match walkable.first() {
            None => true,
            Some(&start) => reachable_from(walls, start).len() == walkable.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Vector, WallGrid};

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.enemy_count, 12);
        assert_eq!(config.equipment_count, 7);
        assert!(config.validate().is_ok());
        assert!(GenerationConfig::for_testing(1).validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        let mut config = GenerationConfig::new(1);
        config.width = 1;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::new(1);
        config.difficulty_weights = DifficultyWeights {
            easy: 0,
            medium: 0,
            hard: 0,
        };
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::new(1);
        config.slime_ratio = 1.5;
        assert!(config.validate().is_err());

        let mut config = GenerationConfig::new(1);
        config.width = 50_000;
        config.height = 50_000;
        assert!(matches!(config.validate(), Err(CrawlError::GenerationFailed(_))));
        assert!(GenerationConfig::from_json_str(r#"{ "width": 50000, "height": 50000 }"#).is_err());
    }

    #[test]
    fn test_partial_json_config_uses_defaults() {
        let config = GenerationConfig::from_json_str(r#"{ "seed": 7, "width": 21 }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.width, 21);
        assert_eq!(config.height, 15);
        assert_eq!(config.enemy_count, 12);
    }

    #[test]
    fn test_invalid_json_config_is_an_error() {
        assert!(matches!(
            GenerationConfig::from_json_str("{ \"seed\": \"abc\" }"),
            Err(CrawlError::Serde(_))
        ));
        assert!(matches!(
            GenerationConfig::from_json_str("{ \"height\": 0 }"),
            Err(CrawlError::GenerationFailed(_))
        ));
    }

    #[test]
    fn test_config_file_loading() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "seed": 99, "enemy_count": 4 }}"#).unwrap();
        let config = GenerationConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.enemy_count, 4);

        assert!(matches!(
            GenerationConfig::from_json_file("/definitely/not/here.json"),
            Err(CrawlError::Io(_))
        ));
    }

    #[test]
    fn test_flood_fill_stops_at_walls() {
        // Column 1 is a full wall: the left column is cut off.
        let walls = WallGrid::with_walls(3, 2, [Vector::new(1, 0), Vector::new(1, 1)]);
        let reachable = utils::reachable_from(&walls, Vector::new(0, 0));
        assert_eq!(reachable.len(), 2);
        assert!(!utils::is_fully_connected(&walls));

        let open = WallGrid::open(3, 2);
        assert!(utils::is_fully_connected(&open));
        assert!(utils::reachable_from(&walls, Vector::new(1, 0)).is_empty());
    }
}
