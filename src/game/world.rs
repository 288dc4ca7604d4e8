//! # World
//!
//! The world owns the wall grid, every unit, the equipment lying around and
//! the turn clock. It answers the spatial queries units need and runs the
//! fixed-tick scheduler that lets every enemy act once per turn.

use crate::config::UPDATE_FREQUENCY_MS;
use crate::{
    Behavior, Enemy, EnemyKind, EntityId, Equipment, GameEvent, GameStatistics, Observation,
    Player, UnitRef, UnitStats, Vector,
};
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Boolean wall grid addressed as `[x][y]`; `true` is impassable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WallGrid {
    width: i32,
    height: i32,
    /// Column-major: index is `x * height + y`
    cells: Vec<bool>,
}

impl WallGrid {
    /// A grid without any walls. Negative sizes are treated as zero.
    pub fn open(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    /// An open grid with walls at the given positions; out-of-bounds
    /// positions are ignored.
    pub fn with_walls(width: i32, height: i32, walls: impl IntoIterator<Item = Vector>) -> Self {
        let mut grid = Self::open(width, height);
        for pos in walls {
            grid.set(pos, true);
        }
        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Vector) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Vector) -> Option<usize> {
        self.in_bounds(pos).then(|| pos.x as usize * self.height as usize + pos.y as usize)
    }

    /// Wall flag at `pos`, or None outside the grid.
    pub fn get(&self, pos: Vector) -> Option<bool> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Sets the wall flag. Returns false if `pos` is outside the grid.
    pub fn set(&mut self, pos: Vector, wall: bool) -> bool {
        match self.index(pos) {
            Some(i) => {
                self.cells[i] = wall;
                true
            }
            None => false,
        }
    }

    /// All cells in column order (x outer, y inner).
    pub fn positions(&self) -> impl Iterator<Item = Vector> + '_ {
        let height = self.height;
        (0..self.width).flat_map(move |x| (0..height).map(move |y| Vector::new(x, y)))
    }

    pub fn wall_positions(&self) -> Vec<Vector> {
        self.positions()
            .filter(|&pos| self.get(pos) == Some(true))
            .collect()
    }

    pub fn walkable_positions(&self) -> Vec<Vector> {
        self.positions()
            .filter(|&pos| self.get(pos) == Some(false))
            .collect()
    }
}

/// What a renderer or unit sees when looking at a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// Outside the world boundaries
    Bedrock,
    Wall,
    Floor,
}

impl CellType {
    pub fn is_walkable(self) -> bool {
        matches!(self, CellType::Floor)
    }
}

/// Fixed-tick turn bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnClock {
    /// Absolute time of the last executed turn
    pub last_update_time: u64,
    pub turns_count: u64,
    /// A turn runs only when more than this much time has passed
    pub update_frequency: u64,
}

impl Default for TurnClock {
    fn default() -> Self {
        Self {
            last_update_time: 0,
            turns_count: 0,
            update_frequency: UPDATE_FREQUENCY_MS,
        }
    }
}

/// The simulated dungeon.
///
/// # Examples
///
/// ```
/// use mazecrawl::{Player, Vector, WallGrid, World};
///
/// let walls = WallGrid::with_walls(5, 5, [Vector::new(1, 0)]);
/// let mut world = World::new(walls, Player::with_default_stats(Vector::origin()), 42);
/// assert!(!world.player_try_walk(Vector::new(1, 0))); // wall
/// assert!(world.player_try_walk(Vector::new(0, 1)));
/// assert_eq!(world.player.position, Vector::new(0, 1));
/// ```
#[derive(Debug, Clone)]
pub struct World {
    boundaries: Vector,
    walls: WallGrid,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    equipment: HashMap<Vector, Equipment>,
    clock: TurnClock,
    pub game_over: bool,
    pub statistics: GameStatistics,
    events: Vec<GameEvent>,
    rng: StdRng,
}

impl World {
    /// Creates a world with no enemies or equipment, seeding its own RNG.
    pub fn new(walls: WallGrid, player: Player, seed: u64) -> Self {
        Self::with_rng(walls, player, StdRng::seed_from_u64(seed))
    }

    /// Creates a world that continues an existing random stream.
    pub fn with_rng(walls: WallGrid, player: Player, rng: StdRng) -> Self {
        Self {
            boundaries: Vector::new(walls.width(), walls.height()),
            walls,
            player,
            enemies: Vec::new(),
            equipment: HashMap::new(),
            clock: TurnClock::default(),
            game_over: false,
            statistics: GameStatistics::new(),
            events: Vec::new(),
            rng,
        }
    }

    /// World size as (width, height).
    pub fn boundaries(&self) -> Vector {
        self.boundaries
    }

    pub fn walls(&self) -> &WallGrid {
        &self.walls
    }

    pub fn clock(&self) -> &TurnClock {
        &self.clock
    }

    pub fn turns_count(&self) -> u64 {
        self.clock.turns_count
    }

    /// Overrides the minimum time between turns.
    pub fn set_update_frequency(&mut self, update_frequency: u64) {
        self.clock.update_frequency = update_frequency;
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Cell kind at `pos`; anything outside the boundaries is bedrock.
    pub fn cell_at(&self, pos: Vector) -> CellType {
        match self.walls.get(pos) {
            None => CellType::Bedrock,
            Some(true) => CellType::Wall,
            Some(false) => CellType::Floor,
        }
    }

    pub fn is_walkable(&self, pos: Vector) -> bool {
        self.cell_at(pos).is_walkable()
    }

    /// All units, player first, then enemies in collection order.
    pub fn units(&self) -> impl Iterator<Item = UnitRef> + '_ {
        std::iter::once(UnitRef::Player).chain(self.enemies.iter().map(|e| UnitRef::Enemy(e.id)))
    }

    /// The unit standing at `pos`, if any.
    pub fn unit_at(&self, pos: Vector) -> Option<UnitRef> {
        self.units()
            .find(|&unit| self.position_of(unit) == Some(pos))
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: EntityId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn position_of(&self, unit: UnitRef) -> Option<Vector> {
        match unit {
            UnitRef::Player => Some(self.player.position),
            UnitRef::Enemy(id) => self.enemy(id).map(|e| e.position),
        }
    }

    pub fn stats_of(&self, unit: UnitRef) -> Option<&UnitStats> {
        match unit {
            UnitRef::Player => Some(&self.player.stats),
            UnitRef::Enemy(id) => self.enemy(id).map(|e| &e.stats),
        }
    }

    pub fn stats_of_mut(&mut self, unit: UnitRef) -> Option<&mut UnitStats> {
        match unit {
            UnitRef::Player => Some(&mut self.player.stats),
            UnitRef::Enemy(id) => self.enemy_mut(id).map(|e| &mut e.stats),
        }
    }

    fn set_position(&mut self, unit: UnitRef, pos: Vector) {
        match unit {
            UnitRef::Player => self.player.position = pos,
            UnitRef::Enemy(id) => {
                if let Some(enemy) = self.enemy_mut(id) {
                    enemy.position = pos;
                }
            }
        }
    }

    /// Adds an enemy to the world and returns its id.
    pub fn spawn_enemy(&mut self, enemy: Enemy) -> EntityId {
        let id = enemy.id;
        self.enemies.push(enemy);
        id
    }

    pub(crate) fn remove_enemy(&mut self, id: EntityId) -> Option<Enemy> {
        let index = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(index))
    }

    /// Puts an item on a cell. Returns false if the cell already holds one.
    pub fn place_equipment(&mut self, pos: Vector, item: Equipment) -> bool {
        if self.equipment.contains_key(&pos) {
            return false;
        }
        self.equipment.insert(pos, item);
        true
    }

    /// The item lying at `pos`, without picking it up.
    pub fn equipment_at(&self, pos: Vector) -> Option<Equipment> {
        self.equipment.get(&pos).copied()
    }

    /// Takes the item lying at `pos`; a cell never yields an item twice.
    pub fn get_and_remove_equipment_at(&mut self, pos: Vector) -> Option<Equipment> {
        self.equipment.remove(&pos)
    }

    /// Every item lying in the world, keyed by cell.
    pub fn equipment(&self) -> &HashMap<Vector, Equipment> {
        &self.equipment
    }

    /// Straight-line sight between two cells.
    ///
    /// True only when the cells share exactly one coordinate and every cell
    /// strictly between them is walkable. Units do not block sight.
    pub fn can_see(&self, a: Vector, b: Vector) -> bool {
        if a.x == b.x && a.y != b.y {
            let (low, high) = (a.y.min(b.y), a.y.max(b.y));
            ((low + 1)..high).all(|y| self.is_walkable(Vector::new(a.x, y)))
        } else if a.y == b.y && a.x != b.x {
            let (low, high) = (a.x.min(b.x), a.x.max(b.x));
            ((low + 1)..high).all(|x| self.is_walkable(Vector::new(x, a.y)))
        } else {
            false
        }
    }

    /// [`World::can_see`] between two units.
    pub fn can_see_unit(&self, a: UnitRef, b: UnitRef) -> bool {
        match (self.position_of(a), self.position_of(b)) {
            (Some(a), Some(b)) => self.can_see(a, b),
            _ => false,
        }
    }

    /// Moves `unit` to `pos`, fighting whoever stands there instead.
    ///
    /// Returns true only if the unit ended up at `pos`. Moving onto its own
    /// cell succeeds without side effects. A slime that really moves may leave
    /// a copy of itself on the cell it vacated.
    pub fn try_move_to(&mut self, unit: UnitRef, pos: Vector) -> bool {
        let Some(from) = self.position_of(unit) else {
            return false;
        };
        if pos == from {
            return true;
        }
        if !self.is_walkable(pos) {
            return false;
        }
        if let Some(occupant) = self.unit_at(pos) {
            self.fight(unit, occupant);
            return false;
        }

        self.set_position(unit, pos);
        trace!("{:?} moved {} -> {}", unit, from, pos);
        self.push_event(GameEvent::UnitMoved { unit, from, to: pos });

        if let UnitRef::Enemy(id) = unit {
            self.maybe_split_slime(id, from);
        }
        true
    }

    /// One cardinal step. Any delta that is not a unit cardinal vector is
    /// rejected without touching the world.
    pub fn try_walk(&mut self, unit: UnitRef, delta: Vector) -> bool {
        if !delta.is_cardinal_unit() {
            return false;
        }
        match self.position_of(unit) {
            Some(from) => self.try_move_to(unit, from + delta),
            None => false,
        }
    }

    fn maybe_split_slime(&mut self, id: EntityId, vacated: Vector) {
        let Some(enemy) = self.enemy(id) else {
            return;
        };
        let EnemyKind::Slime { duplication_chance } = enemy.kind else {
            return;
        };
        if !self.rng.gen_bool(duplication_chance) {
            return;
        }
        let Some(clone) = self.enemy(id).map(|parent| parent.spawn_clone(vacated)) else {
            return;
        };
        let clone_id = self.spawn_enemy(clone);
        debug!("Slime {} split, clone {} at {}", id, clone_id, vacated);
        self.push_event(GameEvent::SlimeSplit {
            parent: UnitRef::Enemy(id),
            clone: UnitRef::Enemy(clone_id),
            at: vacated,
        });
    }

    /// Fixed-tick scheduler, called by the host loop every frame.
    ///
    /// A turn runs only when more than the update frequency has passed since
    /// the last one. Enemies act in collection order; the roster is taken when
    /// the turn starts, so clones spawned during the turn first act on the next
    /// one and enemies killed during the turn are skipped. Returns whether a
    /// turn ran.
    pub fn update(&mut self, absolute_time: u64, dt: u64) -> bool {
        if self.game_over {
            return false;
        }
        let elapsed = absolute_time.saturating_sub(self.clock.last_update_time);
        if elapsed <= self.clock.update_frequency {
            return false;
        }

        self.clock.turns_count += 1;
        let roster: Vec<EntityId> = self.enemies.iter().map(|e| e.id).collect();
        debug!(
            "Turn {} at t={} (dt={}): {} enemies",
            self.clock.turns_count,
            absolute_time,
            dt,
            roster.len()
        );

        for id in roster {
            if self.game_over {
                break;
            }
            self.run_enemy_turn(id);
        }

        self.clock.last_update_time = absolute_time;
        true
    }

    fn run_enemy_turn(&mut self, id: EntityId) {
        let Some(enemy) = self.enemy(id) else {
            return;
        };
        let behavior: Behavior = enemy.behavior.clone();
        let view = Observation {
            enemy: enemy.position,
            player: self.player.position,
            player_visible: self.can_see(self.player.position, enemy.position),
            turns_count: self.clock.turns_count,
        };

        let decision = behavior.decide(&view, &mut self.rng);
        if let Some(enemy) = self.enemy_mut(id) {
            enemy.behavior = decision.next;
        }
        if let Some(direction) = decision.step {
            self.try_walk(UnitRef::Enemy(id), direction.to_delta());
        }
    }

    /// Player walk command.
    pub fn player_try_walk(&mut self, delta: Vector) -> bool {
        if self.game_over {
            return false;
        }
        self.try_walk(UnitRef::Player, delta)
    }

    /// Picks up the item under the player, if there is one.
    pub fn player_try_to_take_equipment(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let at = self.player.position;
        match self.get_and_remove_equipment_at(at) {
            Some(item) => {
                self.player.inventory.add_carried(item);
                self.push_event(GameEvent::EquipmentPickedUp { item, at });
                true
            }
            None => false,
        }
    }

    /// Wears the carried item at `index`.
    pub fn player_try_to_put_on_equipment(&mut self, index: usize) -> bool {
        if self.game_over {
            return false;
        }
        let item = self.player.inventory.carried.get(index).copied();
        if !self.player.try_to_put_on_equipment(index) {
            return false;
        }
        if let Some(item) = item {
            self.push_event(GameEvent::EquipmentPutOn { item });
        }
        true
    }

    /// Takes off the worn item at `index`.
    pub fn player_try_to_take_off_equipment(&mut self, index: usize) -> bool {
        if self.game_over {
            return false;
        }
        let item = self.player.inventory.equipped.get(index).copied();
        if !self.player.try_to_take_off_equipment(index) {
            return false;
        }
        if let Some(item) = item {
            self.push_event(GameEvent::EquipmentTakenOff { item });
        }
        true
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.statistics.update_from_event(&event);
        if let GameEvent::GameOver { turns } = event {
            info!("Game over after {} turns", turns);
        }
        self.events.push(event);
    }

    /// Hands buffered events to the caller.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
