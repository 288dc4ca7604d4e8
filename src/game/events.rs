//! # Game Events
//!
//! Notifications the world buffers while resolving commands and turns, for a
//! presentation layer to drain, plus the running statistics built from them.

use crate::{Equipment, UnitRef, Vector};
use serde::{Deserialize, Serialize};

/// Something that happened in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    UnitMoved {
        unit: UnitRef,
        from: Vector,
        to: Vector,
    },
    UnitDamaged {
        unit: UnitRef,
        source: UnitRef,
        damage: i32,
    },
    UnitDied {
        unit: UnitRef,
        killer: UnitRef,
    },
    LeveledUp {
        unit: UnitRef,
        level: u32,
    },
    EnemyConfused {
        unit: UnitRef,
        until_turn: u64,
    },
    SlimeSplit {
        parent: UnitRef,
        clone: UnitRef,
        at: Vector,
    },
    EquipmentPickedUp {
        item: Equipment,
        at: Vector,
    },
    EquipmentPutOn {
        item: Equipment,
    },
    EquipmentTakenOff {
        item: Equipment,
    },
    GameOver {
        turns: u64,
    },
}

impl GameEvent {
    /// Short human readable description for message logs.
    pub fn describe(&self) -> String {
        match self {
            GameEvent::UnitMoved { unit, to, .. } => format!("{} moved to {}", name(unit), to),
            GameEvent::UnitDamaged {
                unit,
                source,
                damage,
            } => format!("{} hit {} for {}", name(source), name(unit), damage),
            GameEvent::UnitDied { unit, killer } => {
                format!("{} was slain by {}", name(unit), name(killer))
            }
            GameEvent::LeveledUp { unit, level } => {
                format!("{} reached level {}", name(unit), level)
            }
            GameEvent::EnemyConfused { until_turn, .. } => {
                format!("The enemy is confused until turn {}", until_turn)
            }
            GameEvent::SlimeSplit { at, .. } => format!("A slime split at {}", at),
            GameEvent::EquipmentPickedUp { item, .. } => format!("Picked up a {}", item.name()),
            GameEvent::EquipmentPutOn { item } => format!("Put on a {}", item.name()),
            GameEvent::EquipmentTakenOff { item } => format!("Took off a {}", item.name()),
            GameEvent::GameOver { turns } => format!("Game over after {} turns", turns),
        }
    }
}

fn name(unit: &UnitRef) -> &'static str {
    match unit {
        UnitRef::Player => "The player",
        UnitRef::Enemy(_) => "An enemy",
    }
}

/// Statistics tracking the player's progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Enemies killed by the player
    pub enemies_defeated: u32,
    /// Steps taken by the player
    pub steps_taken: u64,
    pub damage_dealt: u64,
    pub damage_taken: u64,
    pub items_collected: u32,
    pub slimes_spawned: u32,
    pub levels_gained: u32,
}

impl GameStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::UnitMoved {
                unit: UnitRef::Player,
                ..
            } => {
                self.steps_taken += 1;
            }
            GameEvent::UnitDamaged { unit, source, damage } => {
                let damage = (*damage).max(0) as u64;
                if *source == UnitRef::Player {
                    self.damage_dealt += damage;
                }
                if *unit == UnitRef::Player {
                    self.damage_taken += damage;
                }
            }
            GameEvent::UnitDied {
                killer: UnitRef::Player,
                ..
            } => {
                self.enemies_defeated += 1;
            }
            GameEvent::LeveledUp {
                unit: UnitRef::Player,
                ..
            } => {
                self.levels_gained += 1;
            }
            GameEvent::SlimeSplit { .. } => {
                self.slimes_spawned += 1;
            }
            GameEvent::EquipmentPickedUp { .. } => {
                self.items_collected += 1;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new_entity_id;

    #[test]
    fn test_statistics_update() {
        let mut stats = GameStatistics::new();
        let enemy = UnitRef::Enemy(new_entity_id());

        stats.update_from_event(&GameEvent::UnitMoved {
            unit: UnitRef::Player,
            from: Vector::new(0, 0),
            to: Vector::new(1, 0),
        });
        stats.update_from_event(&GameEvent::UnitMoved {
            unit: enemy,
            from: Vector::new(3, 0),
            to: Vector::new(4, 0),
        });
        assert_eq!(stats.steps_taken, 1);

        stats.update_from_event(&GameEvent::UnitDamaged {
            unit: enemy,
            source: UnitRef::Player,
            damage: 6,
        });
        stats.update_from_event(&GameEvent::UnitDamaged {
            unit: UnitRef::Player,
            source: enemy,
            damage: 2,
        });
        assert_eq!(stats.damage_dealt, 6);
        assert_eq!(stats.damage_taken, 2);

        stats.update_from_event(&GameEvent::UnitDied {
            unit: enemy,
            killer: UnitRef::Player,
        });
        assert_eq!(stats.enemies_defeated, 1);
    }

    #[test]
    fn test_describe_mentions_item() {
        let text = GameEvent::EquipmentPickedUp {
            item: Equipment::Helmet,
            at: Vector::new(2, 2),
        }
        .describe();
        assert!(text.contains("Helmet"));
    }
}
