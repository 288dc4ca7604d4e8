//! # Combat
//!
//! The `fight` protocol between two units. The unit that walks into another
//! always strikes first; if that blow kills, the defender never answers.

use crate::config::{CONFUSION_CHANCE, CONFUSION_DURATION_TURNS};
use crate::{Behavior, GameEvent, UnitRef, World};
use log::debug;
use rand::Rng;

impl World {
    /// Resolves a fight started by `attacker` walking into `defender`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mazecrawl::{Behavior, Enemy, Player, UnitRef, Vector, WallGrid, World};
    ///
    /// let player = Player::new(Vector::new(0, 0), 10, 10, 3);
    /// let mut world = World::new(WallGrid::open(3, 1), player, 1);
    /// let enemy = Enemy::new(Vector::new(1, 0), Behavior::Aggressive, 3, 3, 5, "#ff0000");
    /// let id = world.spawn_enemy(enemy);
    ///
    /// world.fight(UnitRef::Player, UnitRef::Enemy(id));
    /// assert!(world.enemies.is_empty());
    /// assert_eq!(world.player.stats.hp, 10);
    /// ```
    pub fn fight(&mut self, attacker: UnitRef, defender: UnitRef) {
        if attacker == defender {
            return;
        }
        debug!("{:?} attacks {:?}", attacker, defender);

        self.attack(attacker, defender);
        if !self.is_alive(defender) {
            self.resolve_kill(attacker, defender);
            return;
        }

        self.attack(defender, attacker);
        if !self.is_alive(attacker) {
            self.resolve_kill(defender, attacker);
        }
    }

    /// Outgoing damage of a unit, equipment included.
    pub fn damage_of(&self, unit: UnitRef) -> Option<i32> {
        match unit {
            UnitRef::Player => Some(self.player.damage()),
            UnitRef::Enemy(id) => self.enemy(id).map(|e| e.damage()),
        }
    }

    fn is_alive(&self, unit: UnitRef) -> bool {
        self.stats_of(unit).is_some_and(|stats| stats.is_alive())
    }

    /// One blow from `attacker` to `defender`.
    ///
    /// A player blow that leaves an enemy standing may confuse it.
    fn attack(&mut self, attacker: UnitRef, defender: UnitRef) {
        let Some(amount) = self.damage_of(attacker) else {
            return;
        };

        let taken = match defender {
            UnitRef::Player => self.player.take_damage(amount),
            UnitRef::Enemy(id) => match self.enemy_mut(id) {
                Some(enemy) => {
                    enemy.behavior.mark_attacked();
                    enemy.take_damage(amount)
                }
                None => return,
            },
        };
        self.push_event(GameEvent::UnitDamaged {
            unit: defender,
            source: attacker,
            damage: taken,
        });

        if let (UnitRef::Player, UnitRef::Enemy(id)) = (attacker, defender) {
            if self.is_alive(defender) && self.rng_mut().gen_bool(CONFUSION_CHANCE) {
                let turn_started = self.turns_count();
                if let Some(enemy) = self.enemy_mut(id) {
                    let current = std::mem::replace(&mut enemy.behavior, Behavior::Aggressive);
                    enemy.behavior = current.confuse(CONFUSION_DURATION_TURNS, turn_started);
                }
                self.push_event(GameEvent::EnemyConfused {
                    unit: defender,
                    until_turn: turn_started + CONFUSION_DURATION_TURNS,
                });
            }
        }
    }

    fn resolve_kill(&mut self, killer: UnitRef, killed: UnitRef) {
        let killed_level = self.stats_of(killed).map_or(0, |stats| stats.level);
        self.death(killed, killer);
        self.on_kill(killer, killed_level);
    }

    /// Removes a dead enemy; a dead player ends the game instead.
    fn death(&mut self, unit: UnitRef, killer: UnitRef) {
        match unit {
            UnitRef::Player => {
                self.game_over = true;
                self.push_event(GameEvent::UnitDied { unit, killer });
                let turns = self.turns_count();
                self.push_event(GameEvent::GameOver { turns });
            }
            UnitRef::Enemy(id) => {
                if self.remove_enemy(id).is_some() {
                    debug!("Enemy {} died", id);
                    self.push_event(GameEvent::UnitDied { unit, killer });
                }
            }
        }
    }

    fn on_kill(&mut self, killer: UnitRef, killed_level: u32) {
        let Some(stats) = self.stats_of_mut(killer) else {
            return;
        };
        if stats.on_kill(killed_level) > 0 {
            let level = stats.level;
            self.push_event(GameEvent::LeveledUp {
                unit: killer,
                level,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Behavior, Enemy, Equipment, GameEvent, Player, UnitRef, Vector, WallGrid, World};

    fn corridor(player: Player) -> World {
        World::new(WallGrid::open(5, 1), player, 11)
    }

    fn enemy(hp: i32, damage: i32) -> Enemy {
        Enemy::new(Vector::new(1, 0), Behavior::Aggressive, hp, hp, damage, "#ff0000")
    }

    #[test]
    fn test_lethal_first_strike_avoids_retaliation() {
        let mut world = corridor(Player::new(Vector::new(0, 0), 10, 10, 3));
        world.spawn_enemy(enemy(3, 9));

        assert!(!world.player_try_walk(Vector::new(1, 0)));
        assert!(world.enemies.is_empty());
        assert_eq!(world.player.stats.hp, 10);
        assert_eq!(world.player.position, Vector::new(0, 0));
        assert_eq!(world.statistics.enemies_defeated, 1);
    }

    #[test]
    fn test_survivor_retaliates() {
        let mut world = corridor(Player::new(Vector::new(0, 0), 10, 10, 3));
        let id = world.spawn_enemy(enemy(5, 4));

        world.player_try_walk(Vector::new(1, 0));
        let survivor = world.enemy(id).expect("enemy should survive");
        assert_eq!(survivor.stats.hp, 2);
        assert_eq!(world.player.stats.hp, 6);
    }

    #[test]
    fn test_enemy_initiating_strikes_first() {
        let mut world = corridor(Player::new(Vector::new(0, 0), 2, 10, 3));
        let id = world.spawn_enemy(enemy(50, 2));

        world.fight(UnitRef::Enemy(id), UnitRef::Player);
        assert!(world.game_over);
        assert_eq!(world.enemy(id).map(|e| e.stats.hp), Some(50));
        let events = world.drain_events();
        assert!(events.contains(&GameEvent::GameOver { turns: 0 }));
    }

    #[test]
    fn test_retaliation_kill_awards_defender() {
        let mut world = corridor(Player::new(Vector::new(0, 0), 10, 10, 3));
        let mut attacker = enemy(3, 1);
        attacker.stats = attacker.stats.with_level(3);
        let id = world.spawn_enemy(attacker);

        // The enemy hits for 1, the player answers with a lethal 3.
        world.fight(UnitRef::Enemy(id), UnitRef::Player);

        assert!(world.enemies.is_empty());
        assert_eq!(world.player.stats.level, 2);
        assert_eq!(world.player.stats.hp, 11);
        assert_eq!(world.player.stats.xp, 1);
    }

    #[test]
    fn test_sword_doubles_player_blow() {
        let mut player = Player::new(Vector::new(0, 0), 10, 10, 3);
        player.inventory.equipped.push(Equipment::Sword);
        let mut world = corridor(player);
        let id = world.spawn_enemy(enemy(6, 1));

        world.fight(UnitRef::Player, UnitRef::Enemy(id));
        assert!(world.enemy(id).is_none());
        assert_eq!(world.player.stats.hp, 10);
    }

    #[test]
    fn test_helmet_softens_retaliation() {
        let mut player = Player::new(Vector::new(0, 0), 20, 20, 1);
        player.inventory.equipped.push(Equipment::Helmet);
        let mut world = corridor(player);
        let id = world.spawn_enemy(enemy(50, 10));

        world.fight(UnitRef::Player, UnitRef::Enemy(id));
        assert_eq!(world.player.stats.hp, 12);
    }

    #[test]
    fn test_attack_wakes_passive_enemy() {
        let mut world = corridor(Player::new(Vector::new(0, 0), 10, 10, 1));
        let id = world.spawn_enemy(Enemy::new(
            Vector::new(1, 0),
            Behavior::passive(),
            50,
            50,
            1,
            "#ff0000",
        ));

        world.fight(UnitRef::Player, UnitRef::Enemy(id));
        let behavior = &world.enemy(id).unwrap().behavior;
        let woken = match behavior {
            Behavior::Passive { was_attacked } => *was_attacked,
            Behavior::Confusion { wrapped, .. } => {
                **wrapped == Behavior::Passive { was_attacked: true }
            }
            _ => false,
        };
        assert!(woken, "passive enemy should be flagged, got {behavior:?}");
    }

    #[test]
    fn test_player_hits_eventually_confuse() {
        let mut world = corridor(Player::new(Vector::new(0, 0), 1_000, 1_000, 1));
        let id = world.spawn_enemy(enemy(1_000, 0));

        let confused = (0..64).any(|_| {
            world.fight(UnitRef::Player, UnitRef::Enemy(id));
            world.enemy(id).is_some_and(|e| e.behavior.is_confused())
        });
        assert!(confused);
        assert!(world
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::EnemyConfused { .. })));
    }

    #[test]
    fn test_fight_with_itself_is_ignored() {
        let mut world = corridor(Player::new(Vector::new(0, 0), 10, 10, 3));
        world.fight(UnitRef::Player, UnitRef::Player);
        assert_eq!(world.player.stats.hp, 10);
        assert!(world.drain_events().is_empty());
    }
}
