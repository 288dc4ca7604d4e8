//! # Game Module
//!
//! Core simulation state: the world, its units, combat and enemy behavior.
//!
//! This module contains the fundamental building blocks of the crawler:
//! - World representation, spatial queries and the fixed-tick turn scheduler
//! - Player and enemy units with movement, leveling and inventory
//! - The first-strike combat resolver and equipment damage decorators
//! - The enemy behavior state machine

pub mod behavior;
pub mod combat;
pub mod entities;
pub mod equipment;
pub mod events;
pub mod world;

pub use behavior::*;
pub use combat::*;
pub use entities::*;
pub use equipment::*;
pub use events::*;
pub use world::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Integer 2D coordinate in the world grid.
///
/// `x` grows to the east and `y` grows to the south.
///
/// # Examples
///
/// ```
/// use mazecrawl::Vector;
///
/// let pos = Vector::new(4, 7);
/// assert_eq!(pos + Vector::new(1, -1), Vector::new(5, 6));
/// assert_eq!(pos.scale(2), Vector::new(8, 14));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
}

impl Vector {
    /// Creates a new vector with the given coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin (0, 0).
    pub const fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Multiplies both components by `k`.
    pub fn scale(self, k: i32) -> Self {
        Self::new(self.x * k, self.y * k)
    }

    /// Calculates the Manhattan distance to another vector.
    pub fn manhattan_distance(self, other: Vector) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Whether this vector is a single cardinal step (exactly one component is ±1).
    pub fn is_cardinal_unit(self) -> bool {
        self.x * self.y == 0 && self.x.abs() + self.y.abs() == 1
    }

    /// Returns the 4 cardinal neighbours (no diagonals).
    pub fn cardinal_neighbors(self) -> [Vector; 4] {
        Direction::ALL.map(|direction| self + direction.to_delta())
    }

    /// Canonical string key for this cell, as used in world records.
    ///
    /// # Examples
    ///
    /// ```
    /// use mazecrawl::Vector;
    ///
    /// let key = Vector::new(3, 12).to_index_string();
    /// assert_eq!(key, "3,12");
    /// assert_eq!(Vector::from_index_string(&key), Some(Vector::new(3, 12)));
    /// ```
    pub fn to_index_string(self) -> String {
        format!("{},{}", self.x, self.y)
    }

    /// Parses a key produced by [`Vector::to_index_string`].
    pub fn from_index_string(key: &str) -> Option<Vector> {
        let (x, y) = key.split_once(',')?;
        Some(Vector::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
    }
}

impl std::ops::Add for Vector {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Vector {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl std::fmt::Display for Vector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal directions for movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    West,
    South,
    East,
}

impl Direction {
    /// All four directions, in the order random steps index them.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::West,
        Direction::South,
        Direction::East,
    ];

    /// Converts a direction to a unit delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use mazecrawl::{Direction, Vector};
    ///
    /// assert_eq!(Direction::North.to_delta(), Vector::new(0, -1));
    /// assert_eq!(Direction::East.to_delta(), Vector::new(1, 0));
    /// ```
    pub fn to_delta(self) -> Vector {
        match self {
            Direction::North => Vector::new(0, -1),
            Direction::West => Vector::new(-1, 0),
            Direction::South => Vector::new(0, 1),
            Direction::East => Vector::new(1, 0),
        }
    }

    /// Converts a unit delta back to a direction.
    ///
    /// Returns None for zero, diagonal or longer deltas.
    pub fn from_delta(delta: Vector) -> Option<Direction> {
        match (delta.x, delta.y) {
            (0, -1) => Some(Direction::North),
            (-1, 0) => Some(Direction::West),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            _ => None,
        }
    }

    /// The direction pointing the other way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::West => Direction::East,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
        }
    }
}

/// Unique identifier for enemies.
pub type EntityId = Uuid;

/// Creates a new unique entity ID.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_arithmetic() {
        let v = Vector::new(1, -1);
        let u = Vector::new(-1, 1);
        assert_eq!(v + u, Vector::origin());
        assert_eq!(v - v, Vector::origin());
        assert_eq!(v.scale(2), Vector::new(2, -2));
        assert_ne!(v, u);
    }

    #[test]
    fn test_vector_manhattan_distance() {
        assert_eq!(Vector::new(0, 0).manhattan_distance(Vector::new(3, -4)), 7);
    }

    #[test]
    fn test_cardinal_unit_detection() {
        assert!(Vector::new(0, 1).is_cardinal_unit());
        assert!(Vector::new(-1, 0).is_cardinal_unit());
        assert!(!Vector::new(1, 1).is_cardinal_unit());
        assert!(!Vector::new(0, 0).is_cardinal_unit());
        assert!(!Vector::new(2, 0).is_cardinal_unit());
    }

    #[test]
    fn test_cardinal_neighbors() {
        let neighbors = Vector::new(5, 5).cardinal_neighbors();
        assert!(neighbors.contains(&Vector::new(5, 4)));
        assert!(neighbors.contains(&Vector::new(6, 5)));
        assert!(!neighbors.contains(&Vector::new(4, 4)));
    }

    #[test]
    fn test_index_string_rejects_garbage() {
        assert_eq!(Vector::from_index_string("-2, 5"), Some(Vector::new(-2, 5)));
        assert_eq!(Vector::from_index_string("2;5"), None);
        assert_eq!(Vector::from_index_string("a,5"), None);
    }

    #[test]
    fn test_direction_round_trip_and_opposite() {
        for direction in Direction::ALL {
            assert_eq!(Direction::from_delta(direction.to_delta()), Some(direction));
            assert_eq!(
                direction.to_delta() + direction.opposite().to_delta(),
                Vector::origin()
            );
        }
        assert_eq!(Direction::from_delta(Vector::new(1, 1)), None);
    }

    #[test]
    fn test_entity_id_uniqueness() {
        assert_ne!(new_entity_id(), new_entity_id());
    }
}
