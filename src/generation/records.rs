//! # World Records
//!
//! Loads hand-authored worlds from JSON. A record lists the size, the wall
//! cells, the units with their stats and the equipment keyed by `"x,y"`:
//!
//! ```json
//! {
//!   "size": { "x": 5, "y": 5 },
//!   "walls": [{ "x": 1, "y": 1 }],
//!   "player": { "pos": { "x": 3, "y": 4 }, "hp": 9, "maxHp": 10, "damage": 4 },
//!   "enemies": [
//!     { "pos": { "x": 2, "y": 4 }, "hp": 8, "maxHp": 9, "damage": 5, "behaviour": "COWARD" }
//!   ],
//!   "equipment": { "0,0": "Sword" }
//! }
//! ```

use crate::{
    BehaviorType, CrawlError, CrawlResult, Enemy, Equipment, Player, Vector, WallGrid, World,
    WorldBuilder,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Seed used when a record does not name one.
const DEFAULT_RECORD_SEED: u64 = 0;

/// Position and stats of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRecord {
    pub pos: Vector,
    pub hp: i32,
    pub max_hp: i32,
    pub damage: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyRecord {
    #[serde(flatten)]
    pub unit: UnitRecord,
    #[serde(default = "default_behaviour")]
    pub behaviour: BehaviorType,
    /// Present for slimes only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplication_chance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

fn default_behaviour() -> BehaviorType {
    BehaviorType::Aggressive
}

/// A complete serialized world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldRecord {
    pub size: Vector,
    #[serde(default)]
    pub walls: Vec<Vector>,
    pub player: UnitRecord,
    #[serde(default)]
    pub enemies: Vec<EnemyRecord>,
    /// Item names keyed by `"x,y"`
    #[serde(default)]
    pub equipment: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Builds a world from a [`WorldRecord`].
#[derive(Debug, Clone)]
pub struct RecordWorldBuilder {
    record: WorldRecord,
    seed: Option<u64>,
}

impl RecordWorldBuilder {
    pub fn from_record(record: WorldRecord) -> Self {
        Self { record, seed: None }
    }

    pub fn from_json(json: &str) -> CrawlResult<Self> {
        Ok(Self::from_record(serde_json::from_str(json)?))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> CrawlResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Overrides the seed of the world's random stream.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn record(&self) -> &WorldRecord {
        &self.record
    }

    fn check_cell(&self, walls: &WallGrid, pos: Vector, what: &str) -> CrawlResult<()> {
        match walls.get(pos) {
            None => Err(CrawlError::InvalidRecord(format!(
                "{} at {} is outside the world",
                what, pos
            ))),
            Some(true) => Err(CrawlError::InvalidRecord(format!(
                "{} at {} stands inside a wall",
                what, pos
            ))),
            Some(false) => Ok(()),
        }
    }
}

impl WorldBuilder for RecordWorldBuilder {
    fn build(&self) -> CrawlResult<World> {
        let record = &self.record;
        if record.size.x < 1 || record.size.y < 1 {
            return Err(CrawlError::InvalidRecord(format!(
                "World size {} is empty",
                record.size
            )));
        }

        let mut walls = WallGrid::open(record.size.x, record.size.y);
        for &pos in &record.walls {
            if !walls.set(pos, true) {
                return Err(CrawlError::InvalidRecord(format!(
                    "Wall at {} is outside the world",
                    pos
                )));
            }
        }

        let p = &record.player;
        self.check_cell(&walls, p.pos, "Player")?;
        let player = Player::new(p.pos, p.hp, p.max_hp, p.damage);

        let mut occupied = HashSet::from([p.pos]);
        let mut enemies = Vec::with_capacity(record.enemies.len());
        for entry in &record.enemies {
            let unit = &entry.unit;
            self.check_cell(&walls, unit.pos, "Enemy")?;
            if !occupied.insert(unit.pos) {
                return Err(CrawlError::InvalidRecord(format!(
                    "Two units share cell {}",
                    unit.pos
                )));
            }
            let mut enemy = Enemy::new(
                unit.pos,
                entry.behaviour.instantiate(),
                unit.hp,
                unit.max_hp,
                unit.damage,
                entry.tag.clone().unwrap_or_else(|| "#ff0000".to_string()),
            );
            if let Some(level) = entry.level {
                enemy.stats = enemy.stats.with_level(level);
            }
            if let Some(chance) = entry.duplication_chance {
                enemy = enemy.into_slime(chance);
            }
            enemies.push(enemy);
        }

        let mut items = Vec::with_capacity(record.equipment.len());
        for (key, name) in &record.equipment {
            let pos = Vector::from_index_string(key).ok_or_else(|| {
                CrawlError::InvalidRecord(format!("Bad equipment key '{}'", key))
            })?;
            self.check_cell(&walls, pos, "Equipment")?;
            let item = Equipment::from_name(name).ok_or_else(|| {
                CrawlError::InvalidRecord(format!("Unknown equipment '{}' at {}", name, key))
            })?;
            items.push((pos, item));
        }

        let seed = self.seed.or(record.seed).unwrap_or(DEFAULT_RECORD_SEED);
        let mut world = World::new(walls, player, seed);
        for enemy in enemies {
            world.spawn_enemy(enemy);
        }
        for (pos, item) in items {
            if !world.place_equipment(pos, item) {
                return Err(CrawlError::InvalidRecord(format!(
                    "Two items share cell {}",
                    pos
                )));
            }
        }

        info!(
            "Loaded {}x{} world with {} enemies and {} items",
            record.size.x,
            record.size.y,
            world.enemies.len(),
            world.equipment().len()
        );
        Ok(world)
    }
}
