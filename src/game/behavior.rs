//! # Enemy Behavior
//!
//! The per-turn state machine that drives every enemy.
//!
//! A behavior never touches the world directly. Each turn the world hands it an
//! [`Observation`] of the enemy's surroundings; the behavior answers with a
//! [`Decision`] holding the step to attempt and the behavior to keep for the
//! next turn. The world then installs the next behavior and performs the step,
//! so anything the step provokes (such as the player confusing the enemy
//! during retaliation) lands on the behavior that is already in place.

use crate::{Direction, Vector};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What an enemy knows when it decides its move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub enemy: Vector,
    pub player: Vector,
    /// Result of the straight-line sight check between the two
    pub player_visible: bool,
    pub turns_count: u64,
}

/// The outcome of one behavior step.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Cardinal step to attempt this turn, if any
    pub step: Option<Direction>,
    /// Behavior to hold for the following turn
    pub next: Behavior,
}

/// Behavior tags used by world records and enemy factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BehaviorType {
    Aggressive,
    Passive,
    Coward,
}

impl BehaviorType {
    pub const ALL: [BehaviorType; 3] = [
        BehaviorType::Aggressive,
        BehaviorType::Passive,
        BehaviorType::Coward,
    ];

    /// A fresh behavior of this type.
    pub fn instantiate(self) -> Behavior {
        match self {
            BehaviorType::Aggressive => Behavior::Aggressive,
            BehaviorType::Passive => Behavior::passive(),
            BehaviorType::Coward => Behavior::Coward,
        }
    }
}

/// Enemy behavior states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Chases the player when it is in sight, wanders otherwise.
    Aggressive,
    /// Stays put until attacked, then acts like [`Behavior::Aggressive`].
    Passive { was_attacked: bool },
    /// Flees the player when it is in sight, wanders otherwise.
    Coward,
    /// Wanders at random for a number of turns, then reverts to `wrapped`.
    Confusion {
        wrapped: Box<Behavior>,
        duration_turns: u64,
        turn_started: u64,
    },
}

impl Behavior {
    /// A passive behavior that has not been attacked yet.
    pub fn passive() -> Self {
        Behavior::Passive {
            was_attacked: false,
        }
    }

    /// Decides this turn's step and the behavior for the next turn.
    ///
    /// # Examples
    ///
    /// ```
    /// use mazecrawl::{Behavior, Direction, Observation, Vector};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let view = Observation {
    ///     enemy: Vector::new(4, 7),
    ///     player: Vector::new(4, 4),
    ///     player_visible: true,
    ///     turns_count: 1,
    /// };
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let decision = Behavior::Aggressive.decide(&view, &mut rng);
    /// assert_eq!(decision.step, Some(Direction::North));
    /// assert_eq!(decision.next, Behavior::Aggressive);
    /// ```
    pub fn decide<R: Rng + ?Sized>(&self, view: &Observation, rng: &mut R) -> Decision {
        match self {
            Behavior::Aggressive => Decision {
                step: chase_or_wander(view, rng),
                next: self.clone(),
            },
            Behavior::Passive { was_attacked } => Decision {
                step: if *was_attacked {
                    chase_or_wander(view, rng)
                } else {
                    None
                },
                next: self.clone(),
            },
            Behavior::Coward => {
                let step = if view.player_visible {
                    direction_towards(view.enemy, view.player).map(Direction::opposite)
                } else {
                    Some(random_direction(rng))
                };
                Decision {
                    step,
                    next: self.clone(),
                }
            }
            Behavior::Confusion {
                wrapped,
                duration_turns,
                turn_started,
            } => {
                if view.turns_count.saturating_sub(*turn_started) <= *duration_turns {
                    Decision {
                        step: Some(random_direction(rng)),
                        next: self.clone(),
                    }
                } else {
                    Decision {
                        step: None,
                        next: (**wrapped).clone(),
                    }
                }
            }
        }
    }

    /// Wraps this behavior in a confusion starting at `turn_started`.
    ///
    /// Confusing an already confused enemy restarts the timer instead of
    /// stacking wrappers.
    pub fn confuse(self, duration_turns: u64, turn_started: u64) -> Behavior {
        let wrapped = match self {
            Behavior::Confusion { wrapped, .. } => wrapped,
            other => Box::new(other),
        };
        Behavior::Confusion {
            wrapped,
            duration_turns,
            turn_started,
        }
    }

    /// Records that the enemy was hit, waking a passive behavior (also one
    /// hidden under a confusion).
    pub fn mark_attacked(&mut self) {
        match self {
            Behavior::Passive { was_attacked } => *was_attacked = true,
            Behavior::Confusion { wrapped, .. } => wrapped.mark_attacked(),
            Behavior::Aggressive | Behavior::Coward => {}
        }
    }

    pub fn is_confused(&self) -> bool {
        matches!(self, Behavior::Confusion { .. })
    }

    /// The underlying behavior type, looking through any confusion.
    pub fn behavior_type(&self) -> BehaviorType {
        match self {
            Behavior::Aggressive => BehaviorType::Aggressive,
            Behavior::Passive { .. } => BehaviorType::Passive,
            Behavior::Coward => BehaviorType::Coward,
            Behavior::Confusion { wrapped, .. } => wrapped.behavior_type(),
        }
    }
}

fn chase_or_wander<R: Rng + ?Sized>(view: &Observation, rng: &mut R) -> Option<Direction> {
    if view.player_visible {
        direction_towards(view.enemy, view.player)
    } else {
        Some(random_direction(rng))
    }
}

/// Single-axis direction from `from` to `to`.
///
/// Only defined when the two share exactly one coordinate; diagonal or equal
/// positions give None.
pub fn direction_towards(from: Vector, to: Vector) -> Option<Direction> {
    let delta = to - from;
    match (delta.x, delta.y) {
        (0, 0) => None,
        (0, dy) => Some(if dy > 0 {
            Direction::South
        } else {
            Direction::North
        }),
        (dx, 0) => Some(if dx > 0 {
            Direction::East
        } else {
            Direction::West
        }),
        _ => None,
    }
}

/// A uniformly random cardinal direction.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
}
