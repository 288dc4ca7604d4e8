//! # Input Module
//!
//! Player commands and their text form.
//!
//! Every command runs through the world's public player operations, so a
//! front end only has to turn key presses or text into a [`PlayerCommand`].
//! Item indices are 1-based in text, matching what is shown to the player.

use crate::{CrawlError, CrawlResult, Direction, World};
use log::debug;
use std::fmt;
use std::str::FromStr;

/// One player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Step one cell, attacking whoever stands there
    Walk(Direction),
    /// Pick up the item under the player
    TakeEquipment,
    /// Wear the carried item at this 0-based index
    PutOn(usize),
    /// Take off the worn item at this 0-based index
    TakeOff(usize),
    /// Do nothing and let the world tick
    Wait,
}

impl PlayerCommand {
    /// Maps a single key to a command that takes no argument.
    pub fn from_key(key: char) -> Option<PlayerCommand> {
        match key.to_ascii_lowercase() {
            'w' => Some(PlayerCommand::Walk(Direction::North)),
            'a' => Some(PlayerCommand::Walk(Direction::West)),
            's' => Some(PlayerCommand::Walk(Direction::South)),
            'd' => Some(PlayerCommand::Walk(Direction::East)),
            't' => Some(PlayerCommand::TakeEquipment),
            '.' => Some(PlayerCommand::Wait),
            _ => None,
        }
    }

    /// Runs the command against the world.
    ///
    /// Returns what the underlying operation returned; waiting always
    /// succeeds.
    ///
    /// # Examples
    ///
    /// ```
    /// use mazecrawl::{Player, PlayerCommand, Vector, WallGrid, World};
    ///
    /// let player = Player::with_default_stats(Vector::origin());
    /// let mut world = World::new(WallGrid::open(3, 3), player, 1);
    /// let command: PlayerCommand = "s".parse().unwrap();
    /// assert!(command.execute(&mut world));
    /// assert_eq!(world.player.position, Vector::new(0, 1));
    /// ```
    pub fn execute(self, world: &mut World) -> bool {
        let done = match self {
            PlayerCommand::Walk(direction) => world.player_try_walk(direction.to_delta()),
            PlayerCommand::TakeEquipment => world.player_try_to_take_equipment(),
            PlayerCommand::PutOn(index) => world.player_try_to_put_on_equipment(index),
            PlayerCommand::TakeOff(index) => world.player_try_to_take_off_equipment(index),
            PlayerCommand::Wait => true,
        };
        debug!("{} -> {}", self, done);
        done
    }
}

fn parse_index(verb: &str, arg: Option<&str>) -> CrawlResult<usize> {
    let arg = arg.ok_or_else(|| {
        CrawlError::InvalidCommand(format!("'{}' needs an item number", verb))
    })?;
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CrawlError::InvalidCommand(format!(
            "'{}' is not an item number (1, 2, ...)",
            arg
        ))),
    }
}

impl FromStr for PlayerCommand {
    type Err = CrawlError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut words = text.split_whitespace();
        let verb = words
            .next()
            .ok_or_else(|| CrawlError::InvalidCommand("empty command".to_string()))?
            .to_ascii_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            return Err(CrawlError::InvalidCommand(format!(
                "too many arguments in '{}'",
                text.trim()
            )));
        }

        let command = match verb.as_str() {
            "e" | "equip" => PlayerCommand::PutOn(parse_index(&verb, arg)?),
            "u" | "unequip" => PlayerCommand::TakeOff(parse_index(&verb, arg)?),
            "north" => PlayerCommand::Walk(Direction::North),
            "west" => PlayerCommand::Walk(Direction::West),
            "south" => PlayerCommand::Walk(Direction::South),
            "east" => PlayerCommand::Walk(Direction::East),
            "take" => PlayerCommand::TakeEquipment,
            "wait" => PlayerCommand::Wait,
            _ => {
                let mut chars = verb.chars();
                match (chars.next(), chars.next()) {
                    (Some(key), None) => PlayerCommand::from_key(key).ok_or_else(|| {
                        CrawlError::InvalidCommand(format!("unknown key '{}'", key))
                    })?,
                    _ => {
                        return Err(CrawlError::InvalidCommand(format!(
                            "unknown command '{}'",
                            verb
                        )))
                    }
                }
            }
        };

        let takes_index = matches!(command, PlayerCommand::PutOn(_) | PlayerCommand::TakeOff(_));
        if arg.is_some() && !takes_index {
            return Err(CrawlError::InvalidCommand(format!("'{}' takes no argument", verb)));
        }
        Ok(command)
    }
}

impl fmt::Display for PlayerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerCommand::Walk(direction) => write!(f, "walk {:?}", direction),
            PlayerCommand::TakeEquipment => write!(f, "take"),
            PlayerCommand::PutOn(index) => write!(f, "equip {}", index + 1),
            PlayerCommand::TakeOff(index) => write!(f, "unequip {}", index + 1),
            PlayerCommand::Wait => write!(f, "wait"),
        }
    }
}

/// Parses a command script: one command per line, blank lines and lines
/// starting with `#` skipped.
pub fn parse_script(script: &str) -> CrawlResult<Vec<PlayerCommand>> {
    script
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| {
            line.parse().map_err(|e| match e {
                CrawlError::InvalidCommand(msg) => {
                    CrawlError::InvalidCommand(format!("line {}: {}", n, msg))
                }
                other => other,
            })
        })
        .collect()
}
