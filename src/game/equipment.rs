//! # Equipment
//!
//! Items the player can carry and wear. Every item exposes two damage
//! decorators; wearing several chains them left to right in equip order.

use crate::config::{HELMET_REDUCTION, SWORD_MULTIPLIER};
use serde::{Deserialize, Serialize};

/// A piece of equipment lying in the world or held in an inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Equipment {
    /// Doubles outgoing damage.
    Sword,
    /// Reduces incoming damage by a flat amount, never below 1.
    Helmet,
}

impl Equipment {
    /// Transforms outgoing damage.
    ///
    /// # Examples
    ///
    /// ```
    /// use mazecrawl::Equipment;
    ///
    /// assert_eq!(Equipment::Sword.attack_decorator(3), 6);
    /// assert_eq!(Equipment::Helmet.attack_decorator(3), 3);
    /// ```
    pub fn attack_decorator(self, points: i32) -> i32 {
        match self {
            Equipment::Sword => points.saturating_mul(SWORD_MULTIPLIER),
            Equipment::Helmet => points,
        }
    }

    /// Transforms incoming damage.
    ///
    /// # Examples
    ///
    /// ```
    /// use mazecrawl::Equipment;
    ///
    /// assert_eq!(Equipment::Helmet.defense_decorator(10), 8);
    /// assert_eq!(Equipment::Helmet.defense_decorator(1), 1);
    /// assert_eq!(Equipment::Sword.defense_decorator(10), 10);
    /// ```
    pub fn defense_decorator(self, points: i32) -> i32 {
        match self {
            Equipment::Sword => points,
            Equipment::Helmet => points.saturating_sub(HELMET_REDUCTION).max(1),
        }
    }

    /// Display name used by world records and messages.
    pub fn name(self) -> &'static str {
        match self {
            Equipment::Sword => "Sword",
            Equipment::Helmet => "Helmet",
        }
    }

    /// Parses a record name ("Sword" or "Helmet").
    pub fn from_name(name: &str) -> Option<Equipment> {
        match name {
            "Sword" => Some(Equipment::Sword),
            "Helmet" => Some(Equipment::Helmet),
            _ => None,
        }
    }
}

/// Folds `items` left to right through their attack decorators.
pub fn decorate_attack<'a>(items: impl IntoIterator<Item = &'a Equipment>, base: i32) -> i32 {
    items
        .into_iter()
        .fold(base, |points, item| item.attack_decorator(points))
}

/// Folds `items` left to right through their defense decorators.
pub fn decorate_defense<'a>(items: impl IntoIterator<Item = &'a Equipment>, raw: i32) -> i32 {
    items
        .into_iter()
        .fold(raw, |points, item| item.defense_decorator(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sword_changes_only_attack() {
        assert_eq!(Equipment::Sword.attack_decorator(42), 84);
        assert_eq!(Equipment::Sword.defense_decorator(42), 42);
    }

    #[test]
    fn test_helmet_reduces_damage_with_floor() {
        assert!(Equipment::Helmet.defense_decorator(42) < 42);
        assert_eq!(Equipment::Helmet.defense_decorator(3), 1);
        assert_eq!(Equipment::Helmet.defense_decorator(2), 1);
        assert_eq!(Equipment::Helmet.attack_decorator(42), 42);
    }

    #[test]
    fn test_attack_chain_is_multiplicative() {
        assert_eq!(decorate_attack(&[], 3), 3);
        assert_eq!(decorate_attack(&[Equipment::Sword], 3), 6);
        assert_eq!(decorate_attack(&[Equipment::Sword, Equipment::Sword], 3), 12);
    }

    #[test]
    fn test_attack_chain_saturates() {
        let swords = [Equipment::Sword; 40];
        assert_eq!(decorate_attack(&swords, 3), i32::MAX);
        assert_eq!(decorate_attack(&swords[..29], 3), 3 << 29);
    }

    #[test]
    fn test_defense_chain_stacks_helmets() {
        let worn = [Equipment::Helmet, Equipment::Helmet];
        assert_eq!(decorate_defense(&worn, 10), 6);
        assert_eq!(decorate_defense(&worn, 4), 1);
    }

    #[test]
    fn test_names_round_trip() {
        for item in [Equipment::Sword, Equipment::Helmet] {
            assert_eq!(Equipment::from_name(item.name()), Some(item));
        }
        assert_eq!(Equipment::from_name("Shield"), None);
    }
}
