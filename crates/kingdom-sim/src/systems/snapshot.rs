//! Snapshot system: queries the ECS world and the ledgers and builds a
//! complete GameStateSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use kingdom_core::events::SimEvent;
use kingdom_core::state::*;
use kingdom_core::types::{GameSpeed, SimTime};

use crate::agents::{EnemyAgent, Position, ProjectileAgent, TowerAgent};
use crate::economy::EconomyLedger;
use crate::path::PathModel;
use crate::wave::WaveDirector;

/// Build a complete GameStateSnapshot from the current state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    paused: bool,
    speed: GameSpeed,
    path: &PathModel,
    ledger: &EconomyLedger,
    waves: &WaveDirector,
    events: Vec<SimEvent>,
) -> GameStateSnapshot {
    let enemies = build_enemies(world);
    let towers = build_towers(world, waves);
    let population = ledger.population();

    GameStateSnapshot {
        time: *time,
        paused,
        game_speed: speed.level(),
        resources: ResourceView::from(ledger.resources()),
        population: PopulationView {
            count: population.count,
            capacity: population.capacity,
            unassigned: population.unassigned,
        },
        health: HealthView {
            current: ledger.health().current(),
            max: ledger.health().max(),
        },
        wave: WaveView {
            number: waves.wave(),
            status: waves.status(),
            queued: waves.queued(),
            alive: enemies.len() as u32,
            consecutive_failures: waves.consecutive_failures(),
            power_up_pending: waves.power_up_pending(),
            active_power_up: waves.active_power_up(),
        },
        support: SupportView {
            capacity: ledger.support_capacity(),
            used: towers.len() as u32,
        },
        path: path.waypoints().to_vec(),
        buildings: build_buildings(ledger),
        towers,
        enemies,
        projectiles: build_projectiles(world),
        events,
    }
}

fn build_buildings(ledger: &EconomyLedger) -> Vec<BuildingView> {
    let mut buildings: Vec<BuildingView> = ledger
        .buildings()
        .map(|b| BuildingView {
            id: b.id,
            building: b.kind,
            tile: b.tile,
            tier: b.tier,
            assigned_workers: b.assigned_workers,
            required_workers: b.required_workers(),
            efficiency: b.efficiency(),
        })
        .collect();
    buildings.sort_by_key(|b| b.id);
    buildings
}

fn build_towers(world: &World, waves: &WaveDirector) -> Vec<TowerView> {
    let power_up = waves.active_power_up();
    let mut towers: Vec<TowerView> = world
        .query::<&TowerAgent>()
        .iter()
        .map(|(_, tower)| TowerView {
            id: tower.id,
            tower: tower.kind,
            tile: tower.tile,
            tier: tower.tier,
            position: tower.position(),
            range: tower.range(),
            damage: tower.damage(power_up),
            fire_interval_secs: tower.fire_interval(),
            cooldown_secs: tower.cooldown.max(0.0),
        })
        .collect();
    towers.sort_by_key(|t| t.id);
    towers
}

/// Enemies still on the field. Removed ones are gone from the view even
/// before cleanup despawns them.
fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Position, &EnemyAgent)>()
        .iter()
        .filter(|(_, (_, enemy))| enemy.is_alive())
        .map(|(_, (pos, enemy))| EnemyView {
            id: enemy.id,
            enemy: enemy.kind,
            phase: enemy.phase,
            position: pos.0,
            progress: enemy.progress,
            health_ratio: enemy.health_ratio(),
        })
        .collect();
    enemies.sort_by_key(|e| e.id);
    enemies
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&Position, &ProjectileAgent)>()
        .iter()
        .map(|(_, (pos, projectile))| ProjectileView {
            tower_id: projectile.tower_id,
            position: pos.0,
        })
        .collect();
    projectiles.sort_by(|a, b| {
        a.tower_id
            .cmp(&b.tower_id)
            .then(a.position.x.total_cmp(&b.position.x))
            .then(a.position.y.total_cmp(&b.position.y))
    });
    projectiles
}
