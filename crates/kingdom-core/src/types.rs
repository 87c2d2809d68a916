//! Fundamental grid, resource, and simulation-time types.

use std::ops::{Add, AddAssign};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFENSE_TILE_SIZE, MAX_GAME_SPEED, MIN_GAME_SPEED};

/// A cell on either the city grid or the defense grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub col: i32,
    pub row: i32,
}

impl Tile {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Whether the tile lies inside a `cols` × `rows` grid.
    pub fn in_grid(&self, cols: i32, rows: i32) -> bool {
        (0..cols).contains(&self.col) && (0..rows).contains(&self.row)
    }

    /// Field-space center of this tile on the defense grid.
    pub fn defense_center(&self) -> DVec2 {
        DVec2::new(
            (self.col as f64 + 0.5) * DEFENSE_TILE_SIZE,
            (self.row as f64 + 0.5) * DEFENSE_TILE_SIZE,
        )
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each unpaused tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds, already scaled by game speed.
    pub elapsed_secs: f64,
}

impl SimTime {
    pub fn advance(&mut self, scaled_dt: f64) {
        self.tick += 1;
        self.elapsed_secs += scaled_dt;
    }
}

/// Speed level chosen by the player. Multiplies every simulation timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSpeed(u8);

impl GameSpeed {
    /// Returns `None` for levels outside the supported range.
    pub fn new(level: u8) -> Option<Self> {
        (MIN_GAME_SPEED..=MAX_GAME_SPEED)
            .contains(&level)
            .then_some(Self(level))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    pub fn multiplier(&self) -> f64 {
        self.0 as f64
    }
}

impl Default for GameSpeed {
    fn default() -> Self {
        Self(MIN_GAME_SPEED)
    }
}

/// Amounts of every resource the city tracks. Used for balances, costs,
/// production, refunds, and loot alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceBundle {
    pub gold: f64,
    pub wood: f64,
    pub stone: f64,
    pub food: f64,
    /// Premium currency.
    pub shards: f64,
}

impl ResourceBundle {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0, 0.0);

    pub const fn new(gold: f64, wood: f64, stone: f64, food: f64, shards: f64) -> Self {
        Self {
            gold,
            wood,
            stone,
            food,
            shards,
        }
    }

    pub const fn gold(amount: f64) -> Self {
        Self::new(amount, 0.0, 0.0, 0.0, 0.0)
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(
            f(self.gold),
            f(self.wood),
            f(self.stone),
            f(self.food),
            f(self.shards),
        )
    }

    fn zip(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self::new(
            f(self.gold, other.gold),
            f(self.wood, other.wood),
            f(self.stone, other.stone),
            f(self.food, other.food),
            f(self.shards, other.shards),
        )
    }

    fn values(&self) -> [f64; 5] {
        [self.gold, self.wood, self.stone, self.food, self.shards]
    }

    /// True when every balance here is at least the matching cost.
    pub fn covers(&self, cost: &Self) -> bool {
        self.values()
            .iter()
            .zip(cost.values().iter())
            .all(|(have, need)| have >= need)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }

    pub fn floored(&self) -> Self {
        self.map(f64::floor)
    }

    pub fn rounded(&self) -> Self {
        self.map(f64::round)
    }

    /// Subtract, clamping each resource at zero.
    pub fn saturating_sub(&self, other: &Self) -> Self {
        self.zip(other, |a, b| (a - b).max(0.0))
    }

    /// Replace non-finite or negative amounts with zero.
    pub fn sanitized(&self) -> Self {
        self.map(|v| if v.is_finite() && v > 0.0 { v } else { 0.0 })
    }

    pub fn is_zero(&self) -> bool {
        self.values().iter().all(|v| *v == 0.0)
    }
}

impl Add for ResourceBundle {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.zip(&other, |a, b| a + b)
    }
}

impl AddAssign for ResourceBundle {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}
