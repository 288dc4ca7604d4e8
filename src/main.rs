//! # Mazecrawl Headless Runner
//!
//! Builds a world, optionally replays a player command script, and drives the
//! turn scheduler with a synthetic clock until the turn limit or game over.

use clap::Parser;
use log::{info, warn};
use mazecrawl::{
    parse_script, CrawlResult, GenerationConfig, PlayerCommand, RandomWorldBuilder,
    RecordWorldBuilder, World, WorldBuilder,
};
use std::collections::VecDeque;
use std::path::PathBuf;
#[cfg(feature = "dev-tools")]
use tracing::Level;

/// Synthetic frame length fed to the scheduler, in milliseconds
const FRAME_MS: u64 = 50;

/// Command line arguments for the headless runner.
#[derive(Parser, Debug)]
#[command(name = "mazecrawl")]
#[command(about = "Headless runner for the mazecrawl simulation core")]
#[command(version)]
struct Args {
    /// Random seed for world generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// World width in cells
    #[arg(long)]
    width: Option<i32>,

    /// World height in cells
    #[arg(long)]
    height: Option<i32>,

    /// Number of enemies to place
    #[arg(long)]
    enemies: Option<usize>,

    /// Number of equipment items to place
    #[arg(long)]
    equipment: Option<usize>,

    /// JSON generation config; command line values override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Load a JSON world record instead of generating a world
    #[arg(long, conflicts_with = "config")]
    world: Option<PathBuf>,

    /// Stop after this many turns
    #[arg(long, default_value_t = 100)]
    turns: u64,

    /// Player commands to replay, one per line
    #[arg(long)]
    script: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> CrawlResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting mazecrawl v{}", mazecrawl::VERSION);

    let mut world = build_world(&args)?;
    let mut script: VecDeque<PlayerCommand> = match &args.script {
        Some(path) => parse_script(&std::fs::read_to_string(path)?)?.into(),
        None => VecDeque::new(),
    };

    run(&mut world, &mut script, args.turns);

    if !script.is_empty() {
        warn!("{} script commands were not replayed", script.len());
    }
    info!(
        "Finished after {} turns: player level {} with {} hp, {} enemies left{}",
        world.turns_count(),
        world.player.stats.level,
        world.player.stats.hp,
        world.enemies.len(),
        if world.game_over { " (game over)" } else { "" }
    );
    println!("{}", serde_json::to_string_pretty(&world.statistics)?);
    Ok(())
}

/// Initializes logging for the given level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .format_timestamp(None)
            .init();
    }
}

fn build_world(args: &Args) -> CrawlResult<World> {
    if let Some(path) = &args.world {
        let mut builder = RecordWorldBuilder::from_json_file(path)?;
        if let Some(seed) = args.seed {
            builder = builder.with_seed(seed);
        }
        return builder.build();
    }

    let mut config = match &args.config {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(enemies) = args.enemies {
        config.enemy_count = enemies;
    }
    if let Some(equipment) = args.equipment {
        config.equipment_count = equipment;
    }

    RandomWorldBuilder::new(config).build()
}

/// Host loop: advances a monotonic clock frame by frame and lets the world
/// decide when a turn runs. The player issues the next scripted command before
/// each turn.
fn run(world: &mut World, script: &mut VecDeque<PlayerCommand>, max_turns: u64) {
    let mut now = 0;
    let mut player_ready = true;

    while world.turns_count() < max_turns && !world.game_over {
        if player_ready {
            if let Some(command) = script.pop_front() {
                if !command.execute(world) {
                    info!("Command '{}' had no effect", command);
                }
            }
            player_ready = false;
        }

        now += FRAME_MS;
        if world.update(now, FRAME_MS) {
            player_ready = true;
        }

        for event in world.drain_events() {
            info!("[turn {}] {}", world.turns_count(), event.describe());
        }
    }
}
