//! # World Builders
//!
//! Assembles a playable [`World`]: maze, player, enemies and equipment.

use crate::{
    utils, CrawlError, CrawlResult, EncounterGenerator, EnemyFactory, GenerationConfig, Generator,
    ItemGenerator, MazeGenerator, Player, StandardEnemyFactory, Vector, WallGrid, World,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;

/// Anything that can produce a ready-to-play world.
pub trait WorldBuilder {
    fn build(&self) -> CrawlResult<World>;
}

/// Collision-free random cell selection.
///
/// Keeps the still-free cells in a list and removes each pick from it, so
/// every pick is distinct and runs in constant time no matter how unlucky
/// the random stream is.
#[derive(Debug, Clone)]
pub struct CellPicker {
    free: Vec<Vector>,
}

impl CellPicker {
    pub fn new(cells: Vec<Vector>) -> Self {
        Self { free: cells }
    }

    /// A picker over every walkable cell of `walls`.
    pub fn walkable(walls: &WallGrid) -> Self {
        Self::new(walls.walkable_positions())
    }

    pub fn remaining(&self) -> usize {
        self.free.len()
    }

    /// Removes and returns a uniformly random free cell.
    pub fn pick(&mut self, rng: &mut StdRng) -> Option<Vector> {
        if self.free.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.free.len());
        Some(self.free.swap_remove(index))
    }

    /// Like [`CellPicker::pick`], reporting exhaustion as an error.
    pub fn pick_for(
        &mut self,
        entity: &'static str,
        requested: usize,
        rng: &mut StdRng,
    ) -> CrawlResult<Vector> {
        let available = self.remaining();
        self.pick(rng).ok_or(CrawlError::PlacementExhausted {
            entity,
            requested,
            available,
        })
    }

    /// Fails up front when fewer than `requested` cells remain.
    pub fn ensure(&self, entity: &'static str, requested: usize) -> CrawlResult<()> {
        if self.remaining() < requested {
            return Err(CrawlError::PlacementExhausted {
                entity,
                requested,
                available: self.remaining(),
            });
        }
        Ok(())
    }
}

/// Builds a random world from a [`GenerationConfig`].
///
/// The whole build consumes one seeded random stream in a fixed order (maze,
/// player, enemies, equipment), and the finished world keeps drawing from the
/// same stream, so equal configs produce equal games.
///
/// # Examples
///
/// ```
/// use mazecrawl::{GenerationConfig, RandomWorldBuilder, WorldBuilder};
///
/// let world = RandomWorldBuilder::new(GenerationConfig::new(12345)).build().unwrap();
/// assert_eq!(world.enemies.len(), 12);
/// assert_eq!(world.equipment().len(), 7);
/// assert!(world.is_walkable(world.player.position));
/// ```
pub struct RandomWorldBuilder {
    config: GenerationConfig,
    enemy_factory: Box<dyn EnemyFactory>,
}

impl RandomWorldBuilder {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            enemy_factory: Box::new(StandardEnemyFactory),
        }
    }

    /// Replaces the factory that turns rolled templates into enemies.
    pub fn with_enemy_factory(mut self, factory: impl EnemyFactory + 'static) -> Self {
        self.enemy_factory = Box::new(factory);
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }
}

impl WorldBuilder for RandomWorldBuilder {
    fn build(&self) -> CrawlResult<World> {
        let config = &self.config;
        config.validate()?;
        let mut rng = utils::create_rng(config);

        let walls = MazeGenerator::new().generate(config, &mut rng)?;

        let mut units = CellPicker::walkable(&walls);
        units.ensure("units", config.enemy_count + 1)?;
        let player = Player::with_default_stats(units.pick_for("player", 1, &mut rng)?);

        let templates = EncounterGenerator::new().generate(config, &mut rng)?;
        let mut enemies = Vec::with_capacity(templates.len());
        for template in &templates {
            let position = units.pick_for("enemy", config.enemy_count, &mut rng)?;
            enemies.push(self.enemy_factory.create_enemy(template, position));
        }

        let items = ItemGenerator::new().generate(config, &mut rng)?;
        let mut cells = CellPicker::walkable(&walls);
        cells.ensure("equipment", items.len())?;
        let mut placed = Vec::with_capacity(items.len());
        for item in items {
            placed.push((cells.pick_for("equipment", config.equipment_count, &mut rng)?, item));
        }

        let mut world = World::with_rng(walls, player, rng);
        for enemy in enemies {
            world.spawn_enemy(enemy);
        }
        for (position, item) in placed {
            if !world.place_equipment(position, item) {
                return Err(CrawlError::InvalidState(format!(
                    "Equipment cell {} was picked twice",
                    position
                )));
            }
        }

        debug!("Player starts at {}", world.player.position);
        info!(
            "Built {}x{} world (seed {}) with {} enemies and {} items",
            config.width,
            config.height,
            config.seed,
            world.enemies.len(),
            world.equipment().len()
        );
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BehaviorType, Enemy, EnemyTemplate};
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_picker_never_repeats() {
        let cells: Vec<Vector> = (0..20).map(|i| Vector::new(i, 0)).collect();
        let mut picker = CellPicker::new(cells);
        let mut rng = StdRng::seed_from_u64(4);
        let picked: HashSet<Vector> = (0..20).filter_map(|_| picker.pick(&mut rng)).collect();
        assert_eq!(picked.len(), 20);
        assert_eq!(picker.pick(&mut rng), None);
        assert!(matches!(
            picker.pick_for("enemy", 21, &mut rng),
            Err(CrawlError::PlacementExhausted { available: 0, .. })
        ));
    }

    #[test]
    fn test_units_occupy_distinct_walkable_cells() {
        let world = RandomWorldBuilder::new(GenerationConfig::new(2024)).build().unwrap();
        let mut seen = HashSet::new();
        assert!(seen.insert(world.player.position));
        for enemy in &world.enemies {
            assert!(world.is_walkable(enemy.position));
            assert!(seen.insert(enemy.position), "two units at {}", enemy.position);
        }
        for pos in world.equipment().keys() {
            assert!(world.is_walkable(*pos));
        }
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = RandomWorldBuilder::new(GenerationConfig::new(8)).build().unwrap();
        let b = RandomWorldBuilder::new(GenerationConfig::new(8)).build().unwrap();
        assert_eq!(a.walls(), b.walls());
        assert_eq!(a.player.position, b.player.position);
        let positions = |w: &World| w.enemies.iter().map(|e| e.position).collect::<Vec<_>>();
        assert_eq!(positions(&a), positions(&b));
        assert_eq!(a.equipment(), b.equipment());
    }

    #[test]
    fn test_too_many_enemies_is_an_error() {
        let mut config = GenerationConfig::new(1);
        config.width = 3;
        config.height = 3;
        config.enemy_count = 50;
        match RandomWorldBuilder::new(config).build() {
            Err(CrawlError::PlacementExhausted { requested, available, .. }) => {
                assert_eq!(requested, 51);
                assert!(available < 51);
            }
            other => panic!("expected exhaustion, got {:?}", other.map(|w| w.enemies.len())),
        }
    }

    #[test]
    fn test_too_much_equipment_is_an_error() {
        let mut config = GenerationConfig::new(1);
        config.width = 3;
        config.height = 3;
        config.enemy_count = 0;
        config.equipment_count = 50;
        assert!(matches!(
            RandomWorldBuilder::new(config).build(),
            Err(CrawlError::PlacementExhausted { entity: "equipment", .. })
        ));
    }

    struct Dummies;

    impl EnemyFactory for Dummies {
        fn create_enemy(&self, template: &EnemyTemplate, position: Vector) -> Enemy {
            Enemy::new(position, template.behavior.instantiate(), 1, 1, 0, "#000000")
        }
    }

    #[test]
    fn test_custom_enemy_factory() {
        let world = RandomWorldBuilder::new(GenerationConfig::for_testing(3))
            .with_enemy_factory(Dummies)
            .build()
            .unwrap();
        assert_eq!(world.enemies.len(), 3);
        assert!(world.enemies.iter().all(|e| e.stats.hp == 1 && e.tag == "#000000"));
        assert!(world
            .enemies
            .iter()
            .all(|e| BehaviorType::ALL.contains(&e.behavior.behavior_type())));
    }
}
