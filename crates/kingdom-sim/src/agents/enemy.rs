//! Enemy state: walking the path, attacking the base, taking damage.

use kingdom_core::constants::ENEMY_ATTACK_INTERVAL_SECS;
use kingdom_core::enums::{EnemyPhase, EnemyType, PowerUp};
use kingdom_core::tables::enemy_spec;

use crate::difficulty;
use crate::path::PathModel;

#[derive(Debug, Clone)]
pub struct EnemyAgent {
    /// Stable id, unique for the lifetime of the engine.
    pub id: u32,
    pub kind: EnemyType,
    pub hp: f64,
    pub max_hp: f64,
    pub phase: EnemyPhase,
    /// Distance walked along the path (px). Never exceeds its length.
    pub progress: f64,
    /// Walking speed (px/s).
    pub speed: f64,
    /// Damage per attack on the health pool, fixed at spawn.
    pub attack_damage: f64,
    segment: usize,
    segment_progress: f64,
    /// Set on arrival; the first attack needs no cooldown.
    attack_ready: bool,
    attack_timer: f64,
}

impl EnemyAgent {
    pub fn new(
        id: u32,
        kind: EnemyType,
        wave: u32,
        power_up: Option<PowerUp>,
        path_length: f64,
    ) -> Self {
        let max_hp = difficulty::enemy_max_hp(kind, power_up);
        Self {
            id,
            kind,
            hp: max_hp,
            max_hp,
            phase: EnemyPhase::Moving,
            progress: 0.0,
            speed: difficulty::enemy_speed(path_length, enemy_spec(kind).difficulty_tier),
            attack_damage: difficulty::attack_damage(wave),
            segment: 0,
            segment_progress: 0.0,
            attack_ready: false,
            attack_timer: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.phase != EnemyPhase::Removed && self.hp > 0.0
    }

    pub fn health_ratio(&self) -> f64 {
        if self.max_hp > 0.0 {
            (self.hp / self.max_hp).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Apply a hit. Returns true when this hit killed the enemy.
    pub fn take_damage(&mut self, amount: f64) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.hp = (self.hp - amount.max(0.0)).max(0.0);
        if self.hp <= 0.0 {
            self.phase = EnemyPhase::Removed;
            true
        } else {
            false
        }
    }

    /// Walk `speed × dt` along the path, carrying leftover distance across
    /// segment boundaries. Returns true on the call that reaches the end.
    pub fn advance(&mut self, path: &PathModel, dt: f64) -> bool {
        if self.phase != EnemyPhase::Moving {
            return false;
        }

        let lengths = path.segment_lengths();
        let mut remaining = self.speed * dt;
        while remaining > 0.0 && self.segment < lengths.len() {
            let left = lengths[self.segment] - self.segment_progress;
            if left <= 0.0 {
                self.segment += 1;
                self.segment_progress = 0.0;
                continue;
            }
            if remaining < left {
                self.segment_progress += remaining;
                self.progress += remaining;
                remaining = 0.0;
            } else {
                self.progress += left;
                remaining -= left;
                self.segment += 1;
                self.segment_progress = 0.0;
            }
        }

        // Trailing zero-length segments count as arrived.
        while self.segment < lengths.len() && lengths[self.segment] <= 0.0 {
            self.segment += 1;
        }

        self.progress = self.progress.min(path.total_length());
        if self.segment >= lengths.len() {
            self.progress = path.total_length();
            self.phase = EnemyPhase::Attacking;
            self.attack_ready = true;
            true
        } else {
            false
        }
    }

    /// Run the attack cooldown. Returns how many attacks land this tick;
    /// the first one lands on the tick the enemy arrives.
    pub fn attacks_due(&mut self, dt: f64) -> u32 {
        if self.phase != EnemyPhase::Attacking {
            return 0;
        }
        if self.attack_ready {
            self.attack_ready = false;
            self.attack_timer = ENEMY_ATTACK_INTERVAL_SECS;
            return 1;
        }
        self.attack_timer -= dt;
        let mut due = 0;
        while self.attack_timer <= 0.0 {
            due += 1;
            self.attack_timer += ENEMY_ATTACK_INTERVAL_SECS;
        }
        due
    }
}
