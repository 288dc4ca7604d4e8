//! # Item Generation
//!
//! Rolls the equipment scattered around a fresh world.

use crate::{CrawlError, CrawlResult, Equipment, GenerationConfig, Generator};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// Rolls `equipment_count` items, each a helmet with `helmet_ratio` chance
/// and a sword otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemGenerator;

impl ItemGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator<Vec<Equipment>> for ItemGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CrawlResult<Vec<Equipment>> {
        let helmet_ratio = config.helmet_ratio.clamp(0.0, 1.0);
        let items: Vec<Equipment> = (0..config.equipment_count)
            .map(|_| {
                if rng.gen_bool(helmet_ratio) {
                    Equipment::Helmet
                } else {
                    Equipment::Sword
                }
            })
            .collect();

        debug!("{} rolled {:?}", self.generator_type(), items);
        self.validate(&items, config)?;
        Ok(items)
    }

    fn validate(&self, items: &Vec<Equipment>, config: &GenerationConfig) -> CrawlResult<()> {
        if items.len() != config.equipment_count {
            return Err(CrawlError::GenerationFailed(format!(
                "Rolled {} items, expected {}",
                items.len(),
                config.equipment_count
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "ItemGenerator"
    }
}
