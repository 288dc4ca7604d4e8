//! # Encounter Generation
//!
//! Difficulty-weighted enemy rolls and the factory that turns them into
//! concrete [`Enemy`] units.
//!
//! Generation is split in two: the [`EncounterGenerator`] draws an
//! [`EnemyTemplate`] per enemy (tier, variant and behavior) from the seeded
//! RNG, and an [`EnemyFactory`] fixes the stats of each tier. Swapping the
//! factory changes how strong enemies are without touching the random stream.

use crate::{BehaviorType, CrawlError, CrawlResult, Enemy, GenerationConfig, Generator, Vector};
use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Enemy strength tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

/// Plain enemy or self-duplicating slime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyVariant {
    Normal,
    Slime,
}

/// One rolled enemy, before it has stats or a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub difficulty: Difficulty,
    pub variant: EnemyVariant,
    pub behavior: BehaviorType,
}

/// Creates enemies for each difficulty tier and variant.
pub trait EnemyFactory {
    fn create_enemy(&self, template: &EnemyTemplate, position: Vector) -> Enemy;
}

/// Stats shared by every enemy of one tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierStats {
    pub hp: i32,
    pub damage: i32,
    pub level: u32,
    /// Duplication chance when the enemy is a slime
    pub duplication_chance: f64,
    pub tag: &'static str,
}

/// The stock factory used by the random world builder.
///
/// # Examples
///
/// ```
/// use mazecrawl::{
///     BehaviorType, Difficulty, EnemyFactory, EnemyTemplate, EnemyVariant, StandardEnemyFactory,
///     Vector,
/// };
///
/// let template = EnemyTemplate {
///     difficulty: Difficulty::Hard,
///     variant: EnemyVariant::Slime,
///     behavior: BehaviorType::Coward,
/// };
/// let enemy = StandardEnemyFactory.create_enemy(&template, Vector::new(2, 4));
/// assert_eq!(enemy.position, Vector::new(2, 4));
/// assert_eq!(enemy.stats.level, 3);
/// assert!(enemy.is_slime());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEnemyFactory;

impl StandardEnemyFactory {
    pub fn tier_stats(difficulty: Difficulty) -> TierStats {
        match difficulty {
            Difficulty::Easy => TierStats {
                hp: 3,
                damage: 1,
                level: 1,
                duplication_chance: 0.05,
                tag: "#7fbf7f",
            },
            Difficulty::Medium => TierStats {
                hp: 6,
                damage: 2,
                level: 2,
                duplication_chance: 0.1,
                tag: "#bfbf3f",
            },
            Difficulty::Hard => TierStats {
                hp: 10,
                damage: 4,
                level: 3,
                duplication_chance: 0.2,
                tag: "#bf3f3f",
            },
        }
    }
}

impl EnemyFactory for StandardEnemyFactory {
    fn create_enemy(&self, template: &EnemyTemplate, position: Vector) -> Enemy {
        let tier = Self::tier_stats(template.difficulty);
        let mut enemy = Enemy::new(
            position,
            template.behavior.instantiate(),
            tier.hp,
            tier.hp,
            tier.damage,
            tier.tag,
        );
        enemy.stats = enemy.stats.with_level(tier.level);
        match template.variant {
            EnemyVariant::Normal => enemy,
            EnemyVariant::Slime => enemy.into_slime(tier.duplication_chance),
        }
    }
}

/// Rolls the enemy roster for a world.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncounterGenerator;

impl EncounterGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Rolls one template: tier, then variant, then behavior.
    pub fn roll_template(
        &self,
        tiers: &WeightedIndex<u32>,
        slime_ratio: f64,
        rng: &mut StdRng,
    ) -> EnemyTemplate {
        let difficulty = Difficulty::ALL[tiers.sample(rng)];
        let variant = if rng.gen_bool(slime_ratio) {
            EnemyVariant::Slime
        } else {
            EnemyVariant::Normal
        };
        let behavior = BehaviorType::ALL[rng.gen_range(0..BehaviorType::ALL.len())];
        EnemyTemplate {
            difficulty,
            variant,
            behavior,
        }
    }
}

impl Generator<Vec<EnemyTemplate>> for EncounterGenerator {
    fn generate(
        &self,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> CrawlResult<Vec<EnemyTemplate>> {
        let weights = config.difficulty_weights;
        let tiers = WeightedIndex::new([weights.easy, weights.medium, weights.hard]).map_err(|e| {
            CrawlError::GenerationFailed(format!("Invalid difficulty weights: {}", e))
        })?;
        let slime_ratio = config.slime_ratio.clamp(0.0, 1.0);

        let templates: Vec<EnemyTemplate> = (0..config.enemy_count)
            .map(|_| self.roll_template(&tiers, slime_ratio, rng))
            .collect();

        debug!(
            "{} rolled {} enemies ({} slimes)",
            self.generator_type(),
            templates.len(),
            templates
                .iter()
                .filter(|t| t.variant == EnemyVariant::Slime)
                .count()
        );
        self.validate(&templates, config)?;
        Ok(templates)
    }

    fn validate(
        &self,
        templates: &Vec<EnemyTemplate>,
        config: &GenerationConfig,
    ) -> CrawlResult<()> {
        if templates.len() != config.enemy_count {
            return Err(CrawlError::GenerationFailed(format!(
                "Rolled {} enemies, expected {}",
                templates.len(),
                config.enemy_count
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "EncounterGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils;
    use crate::{DifficultyWeights, EnemyKind};

    #[test]
    fn test_generates_requested_count() {
        let config = GenerationConfig::new(5);
        let mut rng = utils::create_rng(&config);
        let templates = EncounterGenerator::new().generate(&config, &mut rng).unwrap();
        assert_eq!(templates.len(), 12);
    }

    #[test]
    fn test_zero_weight_tiers_never_appear() {
        let mut config = GenerationConfig::new(9);
        config.enemy_count = 200;
        config.difficulty_weights = DifficultyWeights {
            easy: 0,
            medium: 3,
            hard: 0,
        };
        let mut rng = utils::create_rng(&config);
        let templates = EncounterGenerator::new().generate(&config, &mut rng).unwrap();
        assert!(templates.iter().all(|t| t.difficulty == Difficulty::Medium));
    }

    #[test]
    fn test_slime_ratio_extremes() {
        let mut config = GenerationConfig::new(3);
        config.enemy_count = 50;
        config.slime_ratio = 0.0;
        let mut rng = utils::create_rng(&config);
        let templates = EncounterGenerator::new().generate(&config, &mut rng).unwrap();
        assert!(templates.iter().all(|t| t.variant == EnemyVariant::Normal));

        config.slime_ratio = 1.0;
        let templates = EncounterGenerator::new().generate(&config, &mut rng).unwrap();
        assert!(templates.iter().all(|t| t.variant == EnemyVariant::Slime));
    }

    #[test]
    fn test_zero_weights_fail() {
        let mut config = GenerationConfig::new(3);
        config.difficulty_weights = DifficultyWeights {
            easy: 0,
            medium: 0,
            hard: 0,
        };
        let mut rng = utils::create_rng(&config);
        assert!(matches!(
            EncounterGenerator::new().generate(&config, &mut rng),
            Err(CrawlError::GenerationFailed(_))
        ));
    }

    #[test]
    fn test_factory_applies_tier_stats() {
        let template = EnemyTemplate {
            difficulty: Difficulty::Medium,
            variant: EnemyVariant::Normal,
            behavior: BehaviorType::Passive,
        };
        let enemy = StandardEnemyFactory.create_enemy(&template, Vector::new(1, 2));
        assert_eq!(enemy.stats.hp, 6);
        assert_eq!(enemy.stats.max_hp, 6);
        assert_eq!(enemy.damage(), 2);
        assert_eq!(enemy.stats.level, 2);
        assert_eq!(enemy.kind, EnemyKind::Normal);
        assert_eq!(enemy.behavior.behavior_type(), BehaviorType::Passive);
    }

    #[test]
    fn test_factory_slime_uses_tier_chance() {
        let template = EnemyTemplate {
            difficulty: Difficulty::Easy,
            variant: EnemyVariant::Slime,
            behavior: BehaviorType::Aggressive,
        };
        let enemy = StandardEnemyFactory.create_enemy(&template, Vector::origin());
        assert_eq!(enemy.kind, EnemyKind::Slime { duplication_chance: 0.05 });
    }
}
