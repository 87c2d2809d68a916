//! Wave lifecycle.
//!
//! The director owns the wave counter, the spawn queue, the failure streak,
//! and the power-up state. It moves strictly through
//! Idle → Spawning → Resolving → Success | Failure → Idle, announcing every
//! step as an event, and settles the economy when a wave ends.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use kingdom_core::commands::RejectReason;
use kingdom_core::constants::*;
use kingdom_core::enums::{EnemyType, PowerUp, WaveStatus};
use kingdom_core::events::SimEvent;
use kingdom_core::types::ResourceBundle;

use crate::difficulty;
use crate::economy::EconomyLedger;

/// How a finished wave ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveOutcome {
    Success,
    Failure,
}

/// Enemy groups for a regular wave. The base count is capped; once orcs
/// appear goblins make up about 60% of it.
pub fn composition(wave: u32) -> Vec<(EnemyType, u32)> {
    let wave = wave.max(1);
    let base = (WAVE_BASE_COUNT + WAVE_COUNT_GROWTH * (wave - 1)).min(WAVE_MAX_COUNT);
    if wave < ORC_FIRST_WAVE {
        return vec![(EnemyType::Goblin, base)];
    }

    let share = |fraction: f64, floor: u32| ((base as f64 * fraction).round() as u32).max(floor);
    let mut groups = vec![
        (EnemyType::Goblin, share(GOBLIN_SHARE, MIN_GOBLINS)),
        (EnemyType::Orc, share(ORC_SHARE, MIN_ORCS)),
    ];
    if wave >= DRAGON_FIRST_WAVE {
        groups.push((EnemyType::Dragon, 1 + (wave - DRAGON_FIRST_WAVE) / 2));
    }
    groups
}

pub fn is_boss_wave(wave: u32) -> bool {
    wave > 0 && wave % BOSS_WAVE_INTERVAL == 0
}

/// Spawn order for `wave`: one random boss on boss waves, otherwise the
/// regular composition shuffled.
pub fn build_queue<R: Rng>(wave: u32, rng: &mut R) -> Vec<EnemyType> {
    if is_boss_wave(wave) {
        let boss = EnemyType::BOSSES
            .choose(rng)
            .copied()
            .unwrap_or(EnemyType::BossGoblin);
        return vec![boss];
    }
    let mut queue: Vec<EnemyType> = composition(wave)
        .into_iter()
        .flat_map(|(kind, count)| std::iter::repeat(kind).take(count as usize))
        .collect();
    queue.shuffle(rng);
    queue
}

#[derive(Debug, Clone)]
pub struct WaveDirector {
    /// Wave being fought, or the next one while idle.
    wave: u32,
    status: WaveStatus,
    queue: VecDeque<EnemyType>,
    spawn_timer: f64,
    consecutive_failures: u32,
    power_up_pending: bool,
    active_power_up: Option<PowerUp>,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self {
            wave: 1,
            status: WaveStatus::Idle,
            queue: VecDeque::new(),
            spawn_timer: 0.0,
            consecutive_failures: 0,
            power_up_pending: false,
            active_power_up: None,
        }
    }
}

impl WaveDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an idle director from persisted values.
    pub fn restore(
        wave: u32,
        consecutive_failures: u32,
        power_up_pending: bool,
        active_power_up: Option<PowerUp>,
    ) -> Self {
        Self {
            wave: wave.max(1),
            consecutive_failures,
            power_up_pending: power_up_pending
                || consecutive_failures >= POWER_UP_FAILURE_THRESHOLD,
            active_power_up,
            ..Self::default()
        }
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn status(&self) -> WaveStatus {
        self.status
    }

    pub fn queued(&self) -> u32 {
        self.queue.len() as u32
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn power_up_pending(&self) -> bool {
        self.power_up_pending
    }

    pub fn active_power_up(&self) -> Option<PowerUp> {
        self.active_power_up
    }

    /// True while enemies are queued or on the field.
    pub fn is_active(&self) -> bool {
        matches!(self.status, WaveStatus::Spawning | WaveStatus::Resolving)
    }

    fn transition(&mut self, status: WaveStatus, events: &mut Vec<SimEvent>) {
        self.status = status;
        events.push(SimEvent::WaveStatusChanged {
            wave: self.wave,
            status,
        });
    }

    /// Queue the next wave. Returns the number of enemies queued.
    pub fn start<R: Rng>(
        &mut self,
        rng: &mut R,
        events: &mut Vec<SimEvent>,
    ) -> Result<u32, RejectReason> {
        if self.status != WaveStatus::Idle {
            return Err(RejectReason::WaveInProgress);
        }
        if self.power_up_pending {
            return Err(RejectReason::PowerUpRequired);
        }

        self.queue = build_queue(self.wave, rng).into();
        self.spawn_timer = if is_boss_wave(self.wave) {
            BOSS_SPAWN_DELAY_SECS
        } else {
            0.0
        };
        log::info!(
            "Wave {} started with {} enemies (power-up: {:?})",
            self.wave,
            self.queue.len(),
            self.active_power_up
        );
        self.transition(WaveStatus::Spawning, events);
        Ok(self.queued())
    }

    /// Activate the offered power-up and clear the failure streak.
    pub fn select_power_up(
        &mut self,
        power_up: PowerUp,
        events: &mut Vec<SimEvent>,
    ) -> Result<(), RejectReason> {
        if !self.power_up_pending {
            return Err(RejectReason::NoPowerUpPending);
        }
        self.power_up_pending = false;
        self.consecutive_failures = 0;
        self.active_power_up = Some(power_up);
        log::info!("Power-up {:?} selected for wave {}", power_up, self.wave);
        events.push(SimEvent::PowerUpActivated { power_up });
        Ok(())
    }

    /// Release every enemy whose spawn time has come. Moves to Resolving
    /// once the queue is empty.
    pub fn due_spawns(&mut self, dt: f64, events: &mut Vec<SimEvent>) -> Vec<EnemyType> {
        let mut due = Vec::new();
        if self.status != WaveStatus::Spawning {
            return due;
        }
        self.spawn_timer -= dt;
        while self.spawn_timer <= 0.0 {
            match self.queue.pop_front() {
                Some(kind) => due.push(kind),
                None => break,
            }
            self.spawn_timer += SPAWN_INTERVAL_SECS;
        }
        if self.queue.is_empty() {
            self.transition(WaveStatus::Resolving, events);
        }
        due
    }

    /// Decide whether the running wave has ended. `alive` is the number of
    /// enemies still on the field.
    pub fn evaluate(
        &mut self,
        alive: usize,
        ledger: &mut EconomyLedger,
        events: &mut Vec<SimEvent>,
    ) -> Option<WaveOutcome> {
        if !self.is_active() {
            return None;
        }
        if ledger.health().is_depleted() {
            self.fail(ledger, events);
            return Some(WaveOutcome::Failure);
        }
        if self.status == WaveStatus::Resolving && alive == 0 {
            self.succeed(ledger, events);
            return Some(WaveOutcome::Success);
        }
        None
    }

    /// Give up on the running wave. Settles as a failure.
    pub fn abandon(
        &mut self,
        ledger: &mut EconomyLedger,
        events: &mut Vec<SimEvent>,
    ) -> Result<u32, RejectReason> {
        if !self.is_active() {
            return Err(RejectReason::NoActiveWave);
        }
        let wave = self.wave;
        log::info!("Wave {} abandoned", wave);
        self.fail(ledger, events);
        Ok(wave)
    }

    fn succeed(&mut self, ledger: &mut EconomyLedger, events: &mut Vec<SimEvent>) {
        self.transition(WaveStatus::Success, events);

        let reward_gold = difficulty::wave_reward(self.wave);
        ledger.credit(&ResourceBundle::gold(reward_gold));
        events.push(SimEvent::WaveSucceeded {
            wave: self.wave,
            reward_gold,
        });
        log::info!("Wave {} cleared, +{} gold", self.wave, reward_gold);

        self.consecutive_failures = 0;
        if let Some(power_up) = self.active_power_up.take() {
            events.push(SimEvent::PowerUpExpired { power_up });
        }
        restore_health(ledger, events);

        self.wave += 1;
        self.transition(WaveStatus::Idle, events);
    }

    fn fail(&mut self, ledger: &mut EconomyLedger, events: &mut Vec<SimEvent>) {
        self.queue.clear();
        if self.status == WaveStatus::Spawning {
            self.transition(WaveStatus::Resolving, events);
        }
        self.transition(WaveStatus::Failure, events);

        let penalty_gold = ledger.apply_failure_penalty();
        self.consecutive_failures += 1;
        events.push(SimEvent::WaveFailed {
            wave: self.wave,
            penalty_gold,
            consecutive_failures: self.consecutive_failures,
        });
        log::info!(
            "Wave {} failed, -{} gold, {} in a row",
            self.wave,
            penalty_gold,
            self.consecutive_failures
        );

        if self.consecutive_failures >= POWER_UP_FAILURE_THRESHOLD && !self.power_up_pending {
            self.power_up_pending = true;
            events.push(SimEvent::PowerUpRequired {
                consecutive_failures: self.consecutive_failures,
            });
        }
        restore_health(ledger, events);

        self.transition(WaveStatus::Idle, events);
    }
}

fn restore_health(ledger: &mut EconomyLedger, events: &mut Vec<SimEvent>) {
    ledger.restore_health();
    events.push(SimEvent::HealthChanged {
        current: ledger.health().current(),
        max: ledger.health().max(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn statuses(events: &[SimEvent]) -> Vec<WaveStatus> {
        events
            .iter()
            .filter_map(|e| match e {
                SimEvent::WaveStatusChanged { status, .. } => Some(*status),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_first_wave_is_six_goblins() {
        assert_eq!(composition(1), vec![(EnemyType::Goblin, 6)]);
    }

    #[test]
    fn test_composition_grows() {
        let wave_2 = composition(2);
        assert_eq!(wave_2, vec![(EnemyType::Goblin, 5), (EnemyType::Orc, 2)]);
        let wave_6 = composition(6);
        assert_eq!(
            wave_6,
            vec![
                (EnemyType::Goblin, 10),
                (EnemyType::Orc, 5),
                (EnemyType::Dragon, 2)
            ]
        );
    }

    #[test]
    fn test_boss_waves() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for wave in [5, 10, 15] {
            let queue = build_queue(wave, &mut rng);
            assert_eq!(queue.len(), 1);
            assert!(queue[0].is_boss());
        }
        assert!(!is_boss_wave(4));
        assert!(!is_boss_wave(0));
    }

    #[test]
    fn test_queue_matches_composition() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let queue = build_queue(4, &mut rng);
        let total: u32 = composition(4).iter().map(|(_, n)| n).sum();
        assert_eq!(queue.len() as u32, total);
        let dragons = queue.iter().filter(|k| **k == EnemyType::Dragon).count();
        assert_eq!(dragons, 1);
    }

    #[test]
    fn test_start_rejected_unless_idle() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();
        let mut director = WaveDirector::new();
        assert_eq!(director.start(&mut rng, &mut events), Ok(6));
        assert_eq!(
            director.start(&mut rng, &mut events),
            Err(RejectReason::WaveInProgress)
        );
        assert_eq!(statuses(&events), vec![WaveStatus::Spawning]);
    }

    #[test]
    fn test_spawns_release_on_cadence() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();
        let mut director = WaveDirector::new();
        director.start(&mut rng, &mut events).unwrap();

        assert_eq!(director.due_spawns(0.25, &mut events).len(), 1);
        assert_eq!(director.due_spawns(0.25, &mut events).len(), 0);
        assert_eq!(director.due_spawns(0.25, &mut events).len(), 0);
        assert_eq!(director.due_spawns(0.25, &mut events).len(), 1);
        assert_eq!(director.due_spawns(10.0, &mut events).len(), 4);
        assert_eq!(director.status(), WaveStatus::Resolving);
    }

    #[test]
    fn test_success_settles_and_returns_to_idle() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();
        let mut ledger = EconomyLedger::new();
        let mut director = WaveDirector::new();
        director.start(&mut rng, &mut events).unwrap();
        director.due_spawns(100.0, &mut events);
        assert_eq!(director.evaluate(3, &mut ledger, &mut events), None);
        assert_eq!(
            director.evaluate(0, &mut ledger, &mut events),
            Some(WaveOutcome::Success)
        );
        assert_eq!(
            statuses(&events),
            vec![
                WaveStatus::Spawning,
                WaveStatus::Resolving,
                WaveStatus::Success,
                WaveStatus::Idle
            ]
        );
        assert_eq!(director.wave(), 2);
        assert_eq!(ledger.resources().gold, STARTING_GOLD + 75.0);
    }

    #[test]
    fn test_failure_while_spawning_passes_through_resolving() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();
        let mut ledger = EconomyLedger::new();
        let mut director = WaveDirector::new();
        director.start(&mut rng, &mut events).unwrap();
        ledger.damage_base(1000.0);

        assert_eq!(
            director.evaluate(1, &mut ledger, &mut events),
            Some(WaveOutcome::Failure)
        );
        assert_eq!(
            statuses(&events),
            vec![
                WaveStatus::Spawning,
                WaveStatus::Resolving,
                WaveStatus::Failure,
                WaveStatus::Idle
            ]
        );
        assert_eq!(director.queued(), 0);
        assert_eq!(director.wave(), 1);
        assert_eq!(director.consecutive_failures(), 1);
        assert_eq!(ledger.resources().gold, STARTING_GOLD - 100.0);
        assert_eq!(ledger.health().current(), BASE_MAX_HEALTH);
    }

    #[test]
    fn test_power_up_gate_after_three_failures() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();
        let mut ledger = EconomyLedger::new();
        let mut director = WaveDirector::new();
        for _ in 0..POWER_UP_FAILURE_THRESHOLD {
            director.start(&mut rng, &mut events).unwrap();
            director.abandon(&mut ledger, &mut events).unwrap();
        }
        assert!(director.power_up_pending());
        assert_eq!(
            director.start(&mut rng, &mut events),
            Err(RejectReason::PowerUpRequired)
        );

        director
            .select_power_up(PowerUp::WeakenedEnemies, &mut events)
            .unwrap();
        assert_eq!(director.consecutive_failures(), 0);
        assert_eq!(
            director.select_power_up(PowerUp::CheaperTowers, &mut events),
            Err(RejectReason::NoPowerUpPending)
        );
        assert!(director.start(&mut rng, &mut events).is_ok());
        assert_eq!(director.active_power_up(), Some(PowerUp::WeakenedEnemies));
    }

    #[test]
    fn test_power_up_expires_on_success_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = Vec::new();
        let mut ledger = EconomyLedger::new();
        let mut director = WaveDirector::restore(3, 3, false, None);
        director
            .select_power_up(PowerUp::EnhancedDamage, &mut events)
            .unwrap();

        director.start(&mut rng, &mut events).unwrap();
        director.abandon(&mut ledger, &mut events).unwrap();
        assert_eq!(director.active_power_up(), Some(PowerUp::EnhancedDamage));

        director.start(&mut rng, &mut events).unwrap();
        director.due_spawns(100.0, &mut events);
        director.evaluate(0, &mut ledger, &mut events);
        assert_eq!(director.active_power_up(), None);
        assert!(events.contains(&SimEvent::PowerUpExpired {
            power_up: PowerUp::EnhancedDamage
        }));
    }

    #[test]
    fn test_abandon_requires_active_wave() {
        let mut ledger = EconomyLedger::new();
        let mut events = Vec::new();
        let mut director = WaveDirector::new();
        assert_eq!(
            director.abandon(&mut ledger, &mut events),
            Err(RejectReason::NoActiveWave)
        );
    }
}
