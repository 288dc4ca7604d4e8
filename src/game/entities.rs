//! # Units
//!
//! The player and the enemies that share the maze with it.
//!
//! Units are plain data owned by the [`World`](crate::World). Everything that
//! needs to look at the surroundings (movement, combat, behavior) is a world
//! operation addressed with a [`UnitRef`], so units never hold a pointer back
//! to the world.

use crate::config::{INITIAL_XP_THRESHOLD, PLAYER_DAMAGE, PLAYER_HP, PLAYER_MAX_HP};
use crate::{
    decorate_attack, decorate_defense, new_entity_id, Behavior, EntityId, Equipment, Vector,
};
use serde::{Deserialize, Serialize};

/// Addresses one unit inside a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitRef {
    Player,
    Enemy(EntityId),
}

/// Combat and progression numbers shared by every unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitStats {
    pub hp: i32,
    pub max_hp: i32,
    /// Damage before any equipment is applied
    pub base_damage: i32,
    pub level: u32,
    pub xp: u32,
    /// Experience must strictly exceed this to gain a level
    pub xp_threshold: u32,
}

impl UnitStats {
    /// Creates level-1 stats with no experience.
    ///
    /// # Examples
    ///
    /// ```
    /// use mazecrawl::UnitStats;
    ///
    /// let stats = UnitStats::new(9, 10, 4);
    /// assert_eq!(stats.level, 1);
    /// assert_eq!(stats.xp_threshold, 2);
    /// assert!(stats.is_alive());
    /// ```
    pub fn new(hp: i32, max_hp: i32, base_damage: i32) -> Self {
        Self {
            hp,
            max_hp,
            base_damage,
            level: 1,
            xp: 0,
            xp_threshold: INITIAL_XP_THRESHOLD,
        }
    }

    /// Same as [`UnitStats::new`] but starting at `level`.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Awards experience for killing a unit of `killed_level`.
    ///
    /// Each level-up raises max hp and base damage by one, heals fully and
    /// grows the threshold by the new level. Returns the number of levels gained.
    pub fn on_kill(&mut self, killed_level: u32) -> u32 {
        self.xp += killed_level;
        let mut gained = 0;
        while self.xp > self.xp_threshold {
            self.xp %= self.xp_threshold;
            self.level += 1;
            self.max_hp += 1;
            self.base_damage += 1;
            self.hp = self.max_hp;
            self.xp_threshold += self.level;
            gained += 1;
        }
        gained
    }
}

/// The player's equipment, split into worn and carried items.
///
/// Both lists are ordered; equipping appends to the end of `equipped`, which
/// matters because decorators are applied in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub equipped: Vec<Equipment>,
    pub carried: Vec<Equipment>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a freshly picked up item to the carried list.
    pub fn add_carried(&mut self, item: Equipment) {
        self.carried.push(item);
    }

    /// Moves `carried[index]` to the end of `equipped`.
    ///
    /// Returns false (and changes nothing) if the index is out of range.
    pub fn put_on(&mut self, index: usize) -> bool {
        if index >= self.carried.len() {
            return false;
        }
        let item = self.carried.remove(index);
        self.equipped.push(item);
        true
    }

    /// Moves `equipped[index]` to the end of `carried`.
    ///
    /// Returns false (and changes nothing) if the index is out of range.
    pub fn take_off(&mut self, index: usize) -> bool {
        if index >= self.equipped.len() {
            return false;
        }
        let item = self.equipped.remove(index);
        self.carried.push(item);
        true
    }

    pub fn len(&self) -> usize {
        self.equipped.len() + self.carried.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The player-controlled unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Vector,
    pub stats: UnitStats,
    pub inventory: Inventory,
}

impl Player {
    pub fn new(position: Vector, hp: i32, max_hp: i32, damage: i32) -> Self {
        Self {
            position,
            stats: UnitStats::new(hp, max_hp, damage),
            inventory: Inventory::new(),
        }
    }

    /// A player with the default starting stats.
    pub fn with_default_stats(position: Vector) -> Self {
        Self::new(position, PLAYER_HP, PLAYER_MAX_HP, PLAYER_DAMAGE)
    }

    /// Outgoing damage: base damage folded through worn equipment.
    ///
    /// # Examples
    ///
    /// ```
    /// use mazecrawl::{Equipment, Player, Vector};
    ///
    /// let mut player = Player::new(Vector::origin(), 10, 10, 3);
    /// player.inventory.add_carried(Equipment::Sword);
    /// assert!(player.try_to_put_on_equipment(0));
    /// assert_eq!(player.damage(), 6);
    /// ```
    pub fn damage(&self) -> i32 {
        decorate_attack(&self.inventory.equipped, self.stats.base_damage)
    }

    /// Incoming damage after worn equipment has reduced it.
    pub fn defend(&self, raw: i32) -> i32 {
        decorate_defense(&self.inventory.equipped, raw)
    }

    /// Applies incoming damage and returns what was actually taken.
    pub fn take_damage(&mut self, raw: i32) -> i32 {
        let amount = self.defend(raw);
        self.stats.hp = self.stats.hp.saturating_sub(amount);
        amount
    }

    pub fn try_to_put_on_equipment(&mut self, index: usize) -> bool {
        self.inventory.put_on(index)
    }

    pub fn try_to_take_off_equipment(&mut self, index: usize) -> bool {
        self.inventory.take_off(index)
    }
}

/// Enemy specializations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal,
    /// Leaves a copy of itself behind after a successful move, with the given
    /// probability in `[0, 1]`.
    Slime { duplication_chance: f64 },
}

/// A hostile unit driven by a [`Behavior`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub position: Vector,
    pub stats: UnitStats,
    pub behavior: Behavior,
    /// Color tag for the renderer
    pub tag: String,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn new(
        position: Vector,
        behavior: Behavior,
        hp: i32,
        max_hp: i32,
        damage: i32,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            id: new_entity_id(),
            position,
            stats: UnitStats::new(hp, max_hp, damage),
            behavior,
            tag: tag.into(),
            kind: EnemyKind::Normal,
        }
    }

    /// Turns this enemy into a slime; the chance is clamped into `[0, 1]`.
    pub fn into_slime(mut self, duplication_chance: f64) -> Self {
        let duplication_chance = if duplication_chance.is_nan() {
            0.0
        } else {
            duplication_chance.clamp(0.0, 1.0)
        };
        self.kind = EnemyKind::Slime { duplication_chance };
        self
    }

    pub fn is_slime(&self) -> bool {
        matches!(self.kind, EnemyKind::Slime { .. })
    }

    /// Outgoing damage. Enemies wear no equipment.
    pub fn damage(&self) -> i32 {
        self.stats.base_damage
    }

    /// Applies incoming damage unchanged and returns it.
    pub fn take_damage(&mut self, raw: i32) -> i32 {
        self.stats.hp = self.stats.hp.saturating_sub(raw);
        raw
    }

    /// A copy with a fresh id standing at `position`.
    pub fn spawn_clone(&self, position: Vector) -> Enemy {
        Enemy {
            id: new_entity_id(),
            position,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kill_at_threshold_does_not_level() {
        let mut stats = UnitStats::new(10, 10, 3);
        assert_eq!(stats.on_kill(2), 0);
        assert_eq!(stats.xp, 2);
        assert_eq!(stats.level, 1);
    }

    #[test]
    fn test_kill_above_threshold_levels_up() {
        let mut stats = UnitStats::new(4, 10, 3);
        assert_eq!(stats.on_kill(3), 1);
        assert_eq!(stats.xp, 1);
        assert_eq!(stats.level, 2);
        assert_eq!(stats.max_hp, 11);
        assert_eq!(stats.hp, 11);
        assert_eq!(stats.base_damage, 4);
        assert_eq!(stats.xp_threshold, 4);
    }

    #[test]
    fn test_threshold_grows_with_level() {
        let mut stats = UnitStats::new(10, 10, 3);
        stats.on_kill(3); // level 2, threshold 4, xp 1
        stats.on_kill(4); // xp 5 > 4 -> level 3, threshold 7, xp 1
        assert_eq!(stats.level, 3);
        assert_eq!(stats.xp_threshold, 7);
        assert_eq!(stats.xp, 1);
    }

    #[test]
    fn test_inventory_moves_between_lists() {
        let mut player = Player::new(Vector::origin(), 0, 0, 0);
        let inv = &mut player.inventory;
        inv.add_carried(Equipment::Sword);
        inv.add_carried(Equipment::Helmet);
        inv.add_carried(Equipment::Helmet);
        assert_eq!((inv.carried.len(), inv.equipped.len()), (3, 0));

        assert!(player.try_to_put_on_equipment(0));
        assert_eq!(player.inventory.carried.len(), 2);
        assert_eq!(player.inventory.equipped, vec![Equipment::Sword]);

        assert!(player.try_to_put_on_equipment(1));
        assert_eq!(player.inventory.carried.len(), 1);
        assert_eq!(player.inventory.equipped.len(), 2);

        assert!(player.try_to_take_off_equipment(1));
        assert_eq!(player.inventory.carried.len(), 2);
        assert_eq!(player.inventory.equipped.len(), 1);
        assert_eq!(player.inventory.len(), 3);
    }

    #[test]
    fn test_inventory_rejects_bad_index() {
        let mut player = Player::with_default_stats(Vector::origin());
        assert!(!player.try_to_put_on_equipment(0));
        assert!(!player.try_to_take_off_equipment(5));
        assert!(player.inventory.is_empty());
    }

    #[test]
    fn test_player_damage_and_defense_fold_equipment() {
        let mut player = Player::new(Vector::origin(), 10, 10, 3);
        player.inventory.equipped = vec![Equipment::Sword, Equipment::Sword, Equipment::Helmet];
        assert_eq!(player.damage(), 12);
        assert_eq!(player.take_damage(10), 8);
        assert_eq!(player.stats.hp, 2);
        assert_eq!(player.take_damage(1), 1);
        assert_eq!(player.stats.hp, 1);
    }

    #[test]
    fn test_huge_blows_do_not_wrap_hp() {
        let mut player = Player::new(Vector::origin(), -5, 10, 3);
        player.take_damage(i32::MAX);
        assert_eq!(player.stats.hp, i32::MIN);
        assert!(!player.stats.is_alive());

        let mut enemy = Enemy::new(Vector::origin(), Behavior::Aggressive, 1, 1, 1, "#ff0000");
        enemy.take_damage(i32::MAX);
        enemy.take_damage(i32::MAX);
        assert_eq!(enemy.stats.hp, i32::MIN);
        assert!(!enemy.stats.is_alive());
    }

    #[test]
    fn test_slime_chance_is_clamped() {
        let slime = Enemy::new(Vector::origin(), Behavior::Aggressive, 1, 1, 1, "#7fff7f")
            .into_slime(1.5);
        assert_eq!(slime.kind, EnemyKind::Slime { duplication_chance: 1.0 });
        let slime = slime.into_slime(f64::NAN);
        assert_eq!(slime.kind, EnemyKind::Slime { duplication_chance: 0.0 });
    }

    #[test]
    fn test_spawn_clone_keeps_stats_with_new_id() {
        let mut enemy = Enemy::new(Vector::new(1, 1), Behavior::Coward, 3, 5, 2, "#ff0000")
            .into_slime(0.3);
        enemy.stats.hp = 2;
        let clone = enemy.spawn_clone(Vector::new(1, 2));
        assert_ne!(clone.id, enemy.id);
        assert_eq!(clone.position, Vector::new(1, 2));
        assert_eq!(clone.stats, enemy.stats);
        assert_eq!(clone.behavior, enemy.behavior);
        assert_eq!(clone.tag, enemy.tag);
        assert!(clone.is_slime());
    }
}
