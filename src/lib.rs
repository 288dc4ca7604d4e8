//! # Mazecrawl
//!
//! The turn-based simulation core of a grid dungeon-crawler.
//!
//! ## Architecture Overview
//!
//! The crate generates a connected maze, places a player and adversaries in it,
//! and resolves discrete turns of movement, line-of-sight, combat, leveling,
//! status effects and enemy reproduction:
//!
//! - **Game**: the [`World`] with its wall grid, units, equipment and turn clock,
//!   plus the combat resolver, equipment decorators and enemy behaviors
//! - **Generation**: the seeded maze generator, enemy factory, equipment placement
//!   and the world builders that assemble a fresh [`World`]
//! - **Input**: player commands routed through the core's public operations
//!
//! Rendering, key bindings and camera handling live outside this crate. They read
//! the world through [`World::cell_at`], [`World::unit_at`] and the unit
//! accessors, and mutate it only through the player operations.

pub mod game;
pub mod generation;
pub mod input;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;

/// Core error type for the simulation.
#[derive(thiserror::Error, Debug)]
pub enum CrawlError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// A player command could not be parsed
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// A loaded world record does not describe a valid world
    #[error("Invalid world record: {0}")]
    InvalidRecord(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// No free cell remained while placing entities
    #[error(
        "No free cell left to place {entity}: requested {requested}, only {available} available"
    )]
    PlacementExhausted {
        entity: &'static str,
        requested: usize,
        available: usize,
    },
}

/// Result type used throughout the crate.
pub type CrawlResult<T> = Result<T, CrawlError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gameplay configuration constants.
pub mod config {
    /// Minimum time between two logical turns, in milliseconds
    pub const UPDATE_FREQUENCY_MS: u64 = 250;

    /// Default world width in cells
    pub const DEFAULT_WORLD_WIDTH: i32 = 15;

    /// Default world height in cells
    pub const DEFAULT_WORLD_HEIGHT: i32 = 15;

    /// Default number of enemies placed by the random builder
    pub const DEFAULT_ENEMY_COUNT: usize = 12;

    /// Default number of equipment items placed by the random builder
    pub const DEFAULT_EQUIPMENT_COUNT: usize = 7;

    /// Player starting health
    pub const PLAYER_HP: i32 = 10;

    /// Player starting maximum health
    pub const PLAYER_MAX_HP: i32 = 10;

    /// Player starting base damage
    pub const PLAYER_DAMAGE: i32 = 3;

    /// Experience needed (strictly exceeded) for the first level-up
    pub const INITIAL_XP_THRESHOLD: u32 = 2;

    /// Turns an enemy stays confused after being hit by the player
    pub const CONFUSION_DURATION_TURNS: u64 = 8;

    /// Chance that a player hit confuses a surviving enemy
    pub const CONFUSION_CHANCE: f64 = 0.5;

    /// Flat damage reduction granted by a helmet
    pub const HELMET_REDUCTION: i32 = 2;

    /// Outgoing damage multiplier granted by a sword
    pub const SWORD_MULTIPLIER: i32 = 2;
}
