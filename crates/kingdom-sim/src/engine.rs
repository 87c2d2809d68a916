//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, the economy ledger, the wave
//! director, and the seeded RNG. It applies player commands, runs all
//! systems in a fixed order, and produces `GameStateSnapshot`s. Completely
//! headless, enabling deterministic testing.

use std::collections::VecDeque;
use std::time::Duration;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use kingdom_core::commands::{CommandAck, CommandResult, PlayerCommand, RejectReason};
use kingdom_core::constants::*;
use kingdom_core::enums::{PowerUp, TowerType};
use kingdom_core::events::SimEvent;
use kingdom_core::save::{SaveSnapshot, SavedHealth, SavedTower, Settings};
use kingdom_core::state::GameStateSnapshot;
use kingdom_core::tables::tower_spec;
use kingdom_core::types::{GameSpeed, ResourceBundle, SimTime, Tile};

use crate::agents::{EnemyAgent, TowerAgent};
use crate::clock::FrameClock;
use crate::difficulty;
use crate::economy::EconomyLedger;
use crate::path::{FieldBounds, PathModel};
use crate::systems::{self, TickContext};
use crate::wave::WaveDirector;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same path and same waves.
    pub seed: u64,
    pub field: FieldBounds,
    /// Initial speed level (1..=5).
    pub game_speed: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            field: FieldBounds::default(),
            game_speed: MIN_GAME_SPEED,
        }
    }
}

/// Gold-discounted price of bringing a tower of `kind` to `tier`.
pub fn tower_cost(kind: TowerType, tier: u8, power_up: Option<PowerUp>) -> ResourceBundle {
    difficulty::discounted(
        difficulty::tier_cost(&tower_spec(kind).base_cost, tier),
        power_up,
    )
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    speed: GameSpeed,
    clock: FrameClock,
    seed: u64,
    rng: ChaCha8Rng,
    path: PathModel,
    ledger: EconomyLedger,
    waves: WaveDirector,
    settings: Settings,
    next_enemy_id: u32,
    next_tower_id: u32,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Create a fresh game. The path is the first thing drawn from the RNG.
    pub fn new(config: SimConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let path = PathModel::generate(&mut rng, config.field);
        let speed = GameSpeed::new(config.game_speed).unwrap_or_default();
        log::info!(
            "New game, seed {}, path {} ({:.0} px)",
            config.seed,
            path.template(),
            path.total_length()
        );

        Self {
            world: World::new(),
            time: SimTime::default(),
            speed,
            clock: FrameClock::new(),
            seed: config.seed,
            rng,
            path,
            ledger: EconomyLedger::new(),
            waves: WaveDirector::new(),
            settings: Settings {
                game_speed: speed.level(),
                ..Settings::default()
            },
            next_enemy_id: 0,
            next_tower_id: 0,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Rebuild a game from a save. The wave always restarts idle. Towers
    /// that no longer fit (off-grid, on the path, duplicated, over the
    /// support limit) are dropped and tiers are clamped.
    pub fn from_save(save: &SaveSnapshot, field: FieldBounds) -> Self {
        let mut engine = Self::new(SimConfig {
            seed: save.seed,
            field,
            game_speed: save.settings.game_speed,
        });
        engine.settings = Settings {
            game_speed: engine.speed.level(),
            ..save.settings
        };
        engine.ledger = EconomyLedger::restore(
            save.resources.sanitized(),
            save.population,
            save.health,
            &save.buildings,
        );
        engine.waves = WaveDirector::restore(
            save.wave_number,
            save.consecutive_failures,
            save.power_up_pending,
            save.active_power_up,
        );

        for saved in &save.towers {
            if let Err(reason) = engine.check_tower_site(saved.tile) {
                log::warn!(
                    "Dropping saved {:?} at ({}, {}): {}",
                    saved.tower,
                    saved.tile.col,
                    saved.tile.row,
                    reason
                );
                continue;
            }
            let tier = saved.tier.clamp(1, tower_spec(saved.tower).max_tier);
            engine.next_tower_id += 1;
            world_setup::spawn_tower(
                &mut engine.world,
                engine.next_tower_id,
                saved.tower,
                saved.tile,
                tier,
            );
        }

        log::info!(
            "Restored game at wave {} with {} buildings and {} towers",
            engine.waves.wave(),
            engine.ledger.buildings().count(),
            engine.tower_count()
        );
        engine
    }

    /// Persistable form of the current game. Enemies in flight are not
    /// saved; a restored game resumes before the current wave.
    pub fn to_save(&self) -> SaveSnapshot {
        let mut towers: Vec<(u32, SavedTower)> = self
            .world
            .query::<&TowerAgent>()
            .iter()
            .map(|(_, t)| {
                (
                    t.id,
                    SavedTower {
                        tower: t.kind,
                        tile: t.tile,
                        tier: t.tier,
                    },
                )
            })
            .collect();
        towers.sort_by_key(|(id, _)| *id);

        SaveSnapshot {
            seed: self.seed,
            resources: *self.ledger.resources(),
            population: self.ledger.population().count,
            wave_number: self.waves.wave(),
            health: SavedHealth {
                current: self.ledger.health().current(),
                max: self.ledger.health().max(),
            },
            buildings: self.ledger.saved_buildings(),
            towers: towers.into_iter().map(|(_, t)| t).collect(),
            settings: self.settings,
            consecutive_failures: self.waves.consecutive_failures(),
            power_up_pending: self.waves.power_up_pending(),
            active_power_up: self.waves.active_power_up(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance by a wall-clock delta (seconds) and return the resulting
    /// snapshot. The delta is clamped to `MAX_FRAME_DELTA_SECS`, then scaled
    /// by the game speed. Non-finite deltas count as zero.
    pub fn tick(&mut self, dt: f64) -> GameStateSnapshot {
        self.process_commands();

        if !self.clock.is_paused() {
            let dt = if dt.is_finite() {
                dt.clamp(0.0, MAX_FRAME_DELTA_SECS)
            } else {
                0.0
            };
            let scaled = dt * self.speed.multiplier();
            self.run_systems(scaled);
            self.time.advance(scaled);
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.clock.is_paused(),
            self.speed,
            &self.path,
            &self.ledger,
            &self.waves,
            events,
        )
    }

    /// Advance to the wall-clock instant `now`, measured from any fixed
    /// origin. Deltas are clamped and paused spans are skipped.
    pub fn tick_at(&mut self, now: Duration) -> GameStateSnapshot {
        let dt = self.clock.delta(now);
        self.tick(dt)
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn game_speed(&self) -> GameSpeed {
        self.speed
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn path(&self) -> &PathModel {
        &self.path
    }

    pub fn ledger(&self) -> &EconomyLedger {
        &self.ledger
    }

    pub fn waves(&self) -> &WaveDirector {
        &self.waves
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Swap in a hand-built path (for tests needing known geometry).
    #[cfg(test)]
    pub fn set_path(&mut self, path: PathModel) {
        self.path = path;
    }

    /// Process all queued commands. Rejections become events.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(reason) = self.apply(command) {
                self.events.push(SimEvent::CommandRejected { reason });
            }
        }
    }

    /// Apply a single player command right away.
    pub fn apply(&mut self, command: PlayerCommand) -> CommandResult {
        let power_up = self.waves.active_power_up();
        match command {
            PlayerCommand::PlaceBuilding { building, tile } => {
                let building_id = self.city_change(|ledger| {
                    ledger.place_building(building, tile, power_up)
                })?;
                self.events.push(SimEvent::BuildingPlaced {
                    building_id,
                    building,
                    tile,
                });
                Ok(CommandAck::BuildingPlaced { building_id })
            }
            PlayerCommand::UpgradeBuilding { tile } => {
                let (building_id, tier) =
                    self.city_change(|ledger| ledger.upgrade_building(tile, power_up))?;
                self.events
                    .push(SimEvent::BuildingUpgraded { building_id, tier });
                Ok(CommandAck::BuildingUpgraded { building_id, tier })
            }
            PlayerCommand::DemolishBuilding { tile } => {
                let (building_id, refund) =
                    self.city_change(|ledger| ledger.demolish_building(tile))?;
                self.events.push(SimEvent::BuildingDemolished {
                    building_id,
                    refund,
                });
                Ok(CommandAck::BuildingDemolished {
                    building_id,
                    refund,
                })
            }
            PlayerCommand::PurchaseShopItem { key } => {
                let granted = self.ledger.purchase(&key)?;
                log::debug!("Purchased {}", key);
                self.events.push(SimEvent::ItemPurchased { key, granted });
                Ok(CommandAck::ItemPurchased { granted })
            }
            PlayerCommand::PlaceTower { tower, tile } => {
                let tower_id = self.place_tower(tower, tile, power_up)?;
                Ok(CommandAck::TowerPlaced { tower_id })
            }
            PlayerCommand::UpgradeTower { tile } => {
                let (tower_id, tier) = self.upgrade_tower(tile, power_up)?;
                Ok(CommandAck::TowerUpgraded { tower_id, tier })
            }
            PlayerCommand::StartWave => {
                let enemies = self.waves.start(&mut self.rng, &mut self.events)?;
                Ok(CommandAck::WaveStarted {
                    wave: self.waves.wave(),
                    enemies,
                })
            }
            PlayerCommand::AbandonWave => {
                let wave = self.waves.abandon(&mut self.ledger, &mut self.events)?;
                world_setup::clear_battlefield(&mut self.world, &mut self.despawn_buffer);
                Ok(CommandAck::WaveAbandoned { wave })
            }
            PlayerCommand::SelectPowerUp { power_up } => {
                self.waves.select_power_up(power_up, &mut self.events)?;
                Ok(CommandAck::PowerUpSelected { power_up })
            }
            PlayerCommand::SetGameSpeed { level } => {
                self.speed = GameSpeed::new(level).ok_or(RejectReason::InvalidSpeed)?;
                self.settings.game_speed = level;
                self.events.push(SimEvent::SpeedChanged { level });
                Ok(CommandAck::SpeedSet { level })
            }
            PlayerCommand::Pause => {
                if !self.clock.is_paused() {
                    self.clock.pause();
                    self.events.push(SimEvent::Paused);
                }
                Ok(CommandAck::Paused)
            }
            PlayerCommand::Resume => {
                if self.clock.is_paused() {
                    self.clock.resume();
                    self.events.push(SimEvent::Resumed);
                }
                Ok(CommandAck::Resumed)
            }
        }
    }

    /// Run a city mutation and report any population or health change it
    /// caused.
    fn city_change<T>(
        &mut self,
        change: impl FnOnce(&mut EconomyLedger) -> Result<T, RejectReason>,
    ) -> Result<T, RejectReason> {
        let population = self.ledger.population();
        let health = *self.ledger.health();
        let result = change(&mut self.ledger)?;

        let after = self.ledger.population();
        if after.count != population.count || after.capacity != population.capacity {
            self.events.push(SimEvent::PopulationChanged {
                count: after.count,
                capacity: after.capacity,
            });
        }
        if *self.ledger.health() != health {
            self.events.push(SimEvent::HealthChanged {
                current: self.ledger.health().current(),
                max: self.ledger.health().max(),
            });
        }
        Ok(result)
    }

    fn tower_at(&self, tile: Tile) -> Option<Entity> {
        self.world
            .query::<&TowerAgent>()
            .iter()
            .find(|(_, tower)| tower.tile == tile)
            .map(|(entity, _)| entity)
    }

    fn tower_count(&self) -> u32 {
        self.world.query::<&TowerAgent>().iter().count() as u32
    }

    /// Whether a new tower may stand on `tile`.
    fn check_tower_site(&self, tile: Tile) -> Result<(), RejectReason> {
        if !tile.in_grid(DEFENSE_GRID_COLS, DEFENSE_GRID_ROWS)
            || self.path.distance_to(tile.defense_center()) < PATH_CLEARANCE
        {
            return Err(RejectReason::InvalidPlacement);
        }
        if self.tower_at(tile).is_some() {
            return Err(RejectReason::TileOccupied);
        }
        if self.tower_count() >= self.ledger.support_capacity() {
            return Err(RejectReason::InsufficientSupport);
        }
        Ok(())
    }

    fn place_tower(
        &mut self,
        kind: TowerType,
        tile: Tile,
        power_up: Option<PowerUp>,
    ) -> Result<u32, RejectReason> {
        self.check_tower_site(tile)?;
        self.ledger.spend(&tower_cost(kind, 1, power_up))?;

        self.next_tower_id += 1;
        let tower_id = self.next_tower_id;
        world_setup::spawn_tower(&mut self.world, tower_id, kind, tile, 1);
        log::debug!("Placed {:?} #{} at ({}, {})", kind, tower_id, tile.col, tile.row);
        self.events.push(SimEvent::TowerPlaced {
            tower_id,
            tower: kind,
            tile,
        });
        Ok(tower_id)
    }

    fn upgrade_tower(
        &mut self,
        tile: Tile,
        power_up: Option<PowerUp>,
    ) -> Result<(u32, u8), RejectReason> {
        let entity = self.tower_at(tile).ok_or(RejectReason::NoTower)?;
        let (kind, tier) = {
            let tower = self
                .world
                .get::<&TowerAgent>(entity)
                .map_err(|_| RejectReason::NoTower)?;
            (tower.kind, tower.tier)
        };
        if tier >= tower_spec(kind).max_tier {
            return Err(RejectReason::MaxTier);
        }
        self.ledger.spend(&tower_cost(kind, tier + 1, power_up))?;

        let (tower_id, tier) = {
            let mut tower = self
                .world
                .get::<&mut TowerAgent>(entity)
                .map_err(|_| RejectReason::NoTower)?;
            tower.tier += 1;
            (tower.id, tower.tier)
        };
        self.events.push(SimEvent::TowerUpgraded { tower_id, tier });
        Ok((tower_id, tier))
    }

    /// Run all systems in order for one tick of `dt` scaled seconds.
    fn run_systems(&mut self, dt: f64) {
        for report in self.ledger.advance(dt) {
            log::debug!(
                "Production cycle: +{:?} -{:?}",
                report.produced,
                report.consumed
            );
            self.events.push(SimEvent::ProductionCycle {
                produced: report.produced,
                consumed: report.consumed,
            });
            if report.grew {
                self.events.push(SimEvent::PopulationChanged {
                    count: report.population.count,
                    capacity: report.population.capacity,
                });
            }
        }

        let ctx = TickContext {
            dt,
            wave: self.waves.wave(),
            power_up: self.waves.active_power_up(),
        };

        // 1. Release due enemies onto the path
        systems::spawner::run(
            &mut self.world,
            &self.path,
            &mut self.waves,
            &ctx,
            &mut self.next_enemy_id,
            &mut self.events,
        );

        // 2. Walk enemies and let arrivals attack
        systems::movement::run(
            &mut self.world,
            &self.path,
            &mut self.ledger,
            &ctx,
            &mut self.events,
        );
        if self.settle() {
            return;
        }

        // 3. Towers acquire targets and fire
        systems::targeting::run(&mut self.world, &ctx, &mut self.events);

        // 4. Projectiles fly and resolve hits
        systems::projectiles::run(
            &mut self.world,
            &mut self.ledger,
            &mut self.rng,
            &ctx,
            &mut self.events,
            &mut self.despawn_buffer,
        );

        // 5. Remove the dead
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);

        self.settle();
    }

    /// Let the wave director judge the field. Returns true if the wave
    /// ended, in which case the field has been cleared.
    fn settle(&mut self) -> bool {
        let alive = self
            .world
            .query::<&EnemyAgent>()
            .iter()
            .filter(|(_, enemy)| enemy.is_alive())
            .count();
        if self
            .waves
            .evaluate(alive, &mut self.ledger, &mut self.events)
            .is_none()
        {
            return false;
        }
        world_setup::clear_battlefield(&mut self.world, &mut self.despawn_buffer);
        true
    }
}
