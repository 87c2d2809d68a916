//! A simple scripted player for headless runs.
//!
//! Between waves it keeps a house standing, fills free support slots with
//! archers near the first stretch of the path, picks a power-up when one is
//! offered, and starts the next wave. A plan is only made once the previous
//! one has landed, so snapshots that were published before the engine saw
//! the last commands never trigger a duplicate plan.

use kingdom_core::commands::PlayerCommand;
use kingdom_core::constants::{DEFENSE_GRID_COLS, DEFENSE_GRID_ROWS, PATH_CLEARANCE};
use kingdom_core::enums::{BuildingType, PowerUp, TowerType, WaveStatus};
use kingdom_core::events::SimEvent;
use kingdom_core::state::{GameStateSnapshot, ResourceView};
use kingdom_core::types::{ResourceBundle, Tile};
use kingdom_sim::economy::EconomyLedger;
use kingdom_sim::engine::tower_cost;
use kingdom_sim::path::PathModel;

/// Fraction of the path the first towers are grouped around.
const DEFENSE_ANCHOR: f64 = 0.3;

#[derive(Debug, Clone)]
pub struct Autopilot {
    target_waves: u32,
    settled: u32,
    cleared: u32,
    /// Waiting for the last `StartWave` to be applied or rejected.
    awaiting_start: bool,
}

impl Autopilot {
    pub fn new(target_waves: u32) -> Self {
        Self {
            target_waves,
            settled: 0,
            cleared: 0,
            awaiting_start: false,
        }
    }

    /// Whether the requested number of waves has been fought.
    pub fn finished(&self) -> bool {
        self.settled >= self.target_waves
    }

    pub fn settled(&self) -> u32 {
        self.settled
    }

    pub fn cleared(&self) -> u32 {
        self.cleared
    }

    /// Commands to send after seeing `snapshot`.
    pub fn plan(&mut self, snapshot: &GameStateSnapshot) -> Vec<PlayerCommand> {
        for event in &snapshot.events {
            match event {
                SimEvent::WaveSucceeded { .. } => {
                    self.settled += 1;
                    self.cleared += 1;
                }
                SimEvent::WaveFailed { .. } => self.settled += 1,
                SimEvent::CommandRejected { .. } => self.awaiting_start = false,
                _ => {}
            }
        }

        if snapshot.wave.status != WaveStatus::Idle {
            self.awaiting_start = false;
        }

        let mut commands = Vec::new();
        if self.finished() || self.awaiting_start || snapshot.wave.status != WaveStatus::Idle {
            return commands;
        }

        let power_up = if snapshot.wave.power_up_pending {
            commands.push(PlayerCommand::SelectPowerUp {
                power_up: PowerUp::EnhancedDamage,
            });
            Some(PowerUp::EnhancedDamage)
        } else {
            snapshot.wave.active_power_up
        };

        let mut budget = snapshot.resources;
        if snapshot.buildings.is_empty() {
            let cost = EconomyLedger::building_cost(BuildingType::House, 1, power_up);
            if try_spend(&mut budget, &cost) {
                commands.push(PlayerCommand::PlaceBuilding {
                    building: BuildingType::House,
                    tile: Tile::new(0, 0),
                });
            }
        }

        let free_slots = snapshot.support.capacity.saturating_sub(snapshot.support.used);
        let cost = tower_cost(TowerType::Archer, 1, power_up);
        for tile in tower_sites(snapshot).into_iter().take(free_slots as usize) {
            if !try_spend(&mut budget, &cost) {
                break;
            }
            commands.push(PlayerCommand::PlaceTower {
                tower: TowerType::Archer,
                tile,
            });
        }

        commands.push(PlayerCommand::StartWave);
        self.awaiting_start = true;
        commands
    }
}

/// Deduct `cost` from a whole-unit budget if it fits.
fn try_spend(budget: &mut ResourceView, cost: &ResourceBundle) -> bool {
    let need = |v: f64| v.max(0.0).ceil() as u64;
    let fits = budget.gold >= need(cost.gold)
        && budget.wood >= need(cost.wood)
        && budget.stone >= need(cost.stone)
        && budget.food >= need(cost.food)
        && budget.shards >= need(cost.shards);
    if fits {
        budget.gold -= need(cost.gold);
        budget.wood -= need(cost.wood);
        budget.stone -= need(cost.stone);
        budget.food -= need(cost.food);
        budget.shards -= need(cost.shards);
    }
    fits
}

/// Free defense tiles clear of the path, nearest the defense anchor first.
fn tower_sites(snapshot: &GameStateSnapshot) -> Vec<Tile> {
    let path = PathModel::from_waypoints(snapshot.path.clone());
    let anchor = path.point_at(path.total_length() * DEFENSE_ANCHOR).position;

    let mut tiles: Vec<Tile> = (0..DEFENSE_GRID_COLS)
        .flat_map(|col| (0..DEFENSE_GRID_ROWS).map(move |row| Tile::new(col, row)))
        .filter(|tile| path.distance_to(tile.defense_center()) >= PATH_CLEARANCE)
        .filter(|tile| snapshot.towers.iter().all(|t| t.tile != *tile))
        .collect();
    tiles.sort_by(|a, b| {
        a.defense_center()
            .distance(anchor)
            .total_cmp(&b.defense_center().distance(anchor))
    });
    tiles
}
