//! City economy: resource balances, buildings, citizens, the production
//! cycle, support capacity for towers, and the base's health pool.
//!
//! The ledger is the only owner of these numbers. Every mutation goes
//! through a method that keeps balances non-negative and re-derives
//! anything that depends on the set of buildings.

use std::collections::BTreeMap;

use kingdom_core::commands::RejectReason;
use kingdom_core::constants::*;
use kingdom_core::enums::{BuildingType, PowerUp};
use kingdom_core::save::{SavedBuilding, SavedHealth};
use kingdom_core::tables::{building_spec, house_capacity, shop_item};
use kingdom_core::types::{ResourceBundle, Tile};

use crate::difficulty;

/// A building on the city grid.
#[derive(Debug, Clone)]
pub struct Building {
    pub id: u32,
    pub kind: BuildingType,
    pub tile: Tile,
    pub tier: u8,
    pub assigned_workers: u32,
    /// Everything actually paid for this building across all tiers.
    pub invested: ResourceBundle,
}

impl Building {
    pub fn required_workers(&self) -> u32 {
        building_spec(self.kind).workers_required
    }

    /// Share of required staff present, 0.0 - 1.0.
    pub fn efficiency(&self) -> f64 {
        let required = self.required_workers();
        if required == 0 {
            1.0
        } else {
            (self.assigned_workers as f64 / required as f64).min(1.0)
        }
    }
}

/// The base's hit points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthPool {
    current: f64,
    max: f64,
}

impl Default for HealthPool {
    fn default() -> Self {
        Self {
            current: BASE_MAX_HEALTH,
            max: BASE_MAX_HEALTH,
        }
    }
}

impl HealthPool {
    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    fn set_max(&mut self, max: f64) {
        self.max = max.max(1.0);
        self.current = self.current.clamp(0.0, self.max);
    }

    /// Subtract `amount`, never going below zero. Returns what is left.
    fn damage(&mut self, amount: f64) -> f64 {
        self.current = (self.current - amount.max(0.0)).max(0.0);
        self.current
    }

    fn restore(&mut self) {
        self.current = self.max;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Population {
    pub count: u32,
    pub capacity: u32,
    /// Citizens not working in any building.
    pub unassigned: u32,
}

/// What one production cycle did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductionReport {
    pub produced: ResourceBundle,
    pub consumed: ResourceBundle,
    pub population: Population,
    pub grew: bool,
}

#[derive(Debug, Clone)]
pub struct EconomyLedger {
    resources: ResourceBundle,
    buildings: BTreeMap<Tile, Building>,
    next_building_id: u32,
    population: Population,
    health: HealthPool,
    production_timer: f64,
}

impl Default for EconomyLedger {
    fn default() -> Self {
        Self::with_resources(ResourceBundle::new(
            STARTING_GOLD,
            STARTING_WOOD,
            STARTING_STONE,
            STARTING_FOOD,
            STARTING_SHARDS,
        ))
    }
}

impl EconomyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resources(resources: ResourceBundle) -> Self {
        Self {
            resources: resources.sanitized(),
            buildings: BTreeMap::new(),
            next_building_id: 1,
            population: Population::default(),
            health: HealthPool::default(),
            production_timer: 0.0,
        }
    }

    /// Rebuild a ledger from persisted values. Entries that cannot be
    /// placed (off-grid, duplicate tile) are skipped; tiers are clamped.
    pub fn restore(
        resources: ResourceBundle,
        population: u32,
        health: SavedHealth,
        buildings: &[SavedBuilding],
    ) -> Self {
        let mut ledger = Self::with_resources(resources);
        for saved in buildings {
            if !saved.tile.in_grid(CITY_GRID_COLS, CITY_GRID_ROWS)
                || ledger.buildings.contains_key(&saved.tile)
            {
                log::warn!(
                    "Dropping saved {:?} at ({}, {})",
                    saved.building,
                    saved.tile.col,
                    saved.tile.row
                );
                continue;
            }
            let tier = saved.tier.clamp(1, MAX_BUILDING_TIER);
            let base = building_spec(saved.building).base_cost;
            let invested = (1..=tier).fold(ResourceBundle::ZERO, |sum, t| {
                sum + difficulty::tier_cost(&base, t)
            });
            let id = ledger.allocate_id();
            ledger.buildings.insert(
                saved.tile,
                Building {
                    id,
                    kind: saved.building,
                    tile: saved.tile,
                    tier,
                    assigned_workers: 0,
                    invested,
                },
            );
        }
        ledger.population.count = population;
        ledger.recalculate();

        let current = if health.current.is_finite() {
            health.current
        } else {
            ledger.health.max
        };
        ledger.health.current = current.clamp(0.0, ledger.health.max);
        ledger
    }

    // --- Reads ---

    pub fn resources(&self) -> &ResourceBundle {
        &self.resources
    }

    pub fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.buildings.values()
    }

    pub fn building_at(&self, tile: Tile) -> Option<&Building> {
        self.buildings.get(&tile)
    }

    pub fn population(&self) -> Population {
        self.population
    }

    pub fn health(&self) -> &HealthPool {
        &self.health
    }

    /// How many towers the city can keep manned.
    pub fn support_capacity(&self) -> u32 {
        let staffed: f64 = self
            .buildings
            .values()
            .map(|b| building_spec(b.kind).support_per_tier * b.tier as f64 * b.efficiency())
            .sum();
        BASE_SUPPORT_CAPACITY + staffed.floor() as u32
    }

    pub fn can_afford(&self, cost: &ResourceBundle) -> bool {
        self.resources.covers(cost)
    }

    /// Saved form of the current buildings.
    pub fn saved_buildings(&self) -> Vec<SavedBuilding> {
        self.buildings
            .values()
            .map(|b| SavedBuilding {
                building: b.kind,
                tile: b.tile,
                tier: b.tier,
            })
            .collect()
    }

    // --- Balances ---

    /// Deduct `cost` from every resource at once, or nothing at all.
    pub fn spend(&mut self, cost: &ResourceBundle) -> Result<(), RejectReason> {
        let cost = cost.sanitized();
        if !self.can_afford(&cost) {
            return Err(RejectReason::InsufficientResources);
        }
        self.resources = self.resources.saturating_sub(&cost);
        Ok(())
    }

    /// Add `amount`. Negative or non-finite parts are ignored.
    pub fn credit(&mut self, amount: &ResourceBundle) {
        self.resources += amount.sanitized();
    }

    /// Take the failure penalty out of the gold balance. Returns the loss.
    pub fn apply_failure_penalty(&mut self) -> f64 {
        let penalty = difficulty::failure_penalty(self.resources.gold);
        self.resources.gold = (self.resources.gold - penalty).max(0.0);
        penalty
    }

    // --- Health ---

    /// Returns the health left after the hit.
    pub fn damage_base(&mut self, amount: f64) -> f64 {
        self.health.damage(amount)
    }

    pub fn restore_health(&mut self) {
        self.health.restore();
    }

    // --- Buildings ---

    pub fn building_cost(kind: BuildingType, tier: u8, power_up: Option<PowerUp>) -> ResourceBundle {
        difficulty::discounted(
            difficulty::tier_cost(&building_spec(kind).base_cost, tier),
            power_up,
        )
    }

    pub fn place_building(
        &mut self,
        kind: BuildingType,
        tile: Tile,
        power_up: Option<PowerUp>,
    ) -> Result<u32, RejectReason> {
        if !tile.in_grid(CITY_GRID_COLS, CITY_GRID_ROWS) {
            return Err(RejectReason::InvalidPlacement);
        }
        if self.buildings.contains_key(&tile) {
            return Err(RejectReason::TileOccupied);
        }
        if self.population.count < building_spec(kind).min_population {
            return Err(RejectReason::InsufficientPopulation);
        }
        let cost = Self::building_cost(kind, 1, power_up);
        self.spend(&cost)?;

        let id = self.allocate_id();
        self.buildings.insert(
            tile,
            Building {
                id,
                kind,
                tile,
                tier: 1,
                assigned_workers: 0,
                invested: cost,
            },
        );
        self.recalculate();
        log::debug!("Placed {:?} #{} at ({}, {})", kind, id, tile.col, tile.row);
        Ok(id)
    }

    /// Returns the building id and its new tier.
    pub fn upgrade_building(
        &mut self,
        tile: Tile,
        power_up: Option<PowerUp>,
    ) -> Result<(u32, u8), RejectReason> {
        let (kind, tier) = match self.buildings.get(&tile) {
            Some(b) => (b.kind, b.tier),
            None => return Err(RejectReason::NoBuilding),
        };
        if tier >= MAX_BUILDING_TIER {
            return Err(RejectReason::MaxTier);
        }
        let cost = Self::building_cost(kind, tier + 1, power_up);
        self.spend(&cost)?;

        let mut result = Err(RejectReason::NoBuilding);
        if let Some(building) = self.buildings.get_mut(&tile) {
            building.tier += 1;
            building.invested += cost;
            result = Ok((building.id, building.tier));
        }
        self.recalculate();
        result
    }

    /// Remove a building and refund half its investment (floored).
    /// Returns the building id and the refund.
    pub fn demolish_building(&mut self, tile: Tile) -> Result<(u32, ResourceBundle), RejectReason> {
        let building = self
            .buildings
            .remove(&tile)
            .ok_or(RejectReason::NoBuilding)?;
        let refund = building.invested.scaled(DEMOLITION_REFUND_FACTOR).floored();
        self.credit(&refund);
        self.recalculate();
        Ok((building.id, refund))
    }

    /// Buy a shop bundle. Returns what was granted.
    pub fn purchase(&mut self, key: &str) -> Result<ResourceBundle, RejectReason> {
        let item = shop_item(key).ok_or(RejectReason::UnknownItem)?;
        self.spend(&item.price)?;
        self.credit(&item.grants);
        Ok(item.grants)
    }

    // --- Production ---

    /// Accumulate scaled time; returns a report for every cycle that completed.
    pub fn advance(&mut self, scaled_dt: f64) -> Vec<ProductionReport> {
        self.production_timer += scaled_dt.max(0.0);
        let mut reports = Vec::new();
        while self.production_timer >= PRODUCTION_INTERVAL_SECS {
            self.production_timer -= PRODUCTION_INTERVAL_SECS;
            reports.push(self.run_production_cycle());
        }
        reports
    }

    /// One production cycle: output and upkeep by tier and staffing, then
    /// citizens eat and the population may grow by one.
    pub fn run_production_cycle(&mut self) -> ProductionReport {
        self.assign_workers();

        let mut produced = ResourceBundle::ZERO;
        let mut consumed = ResourceBundle::ZERO;
        for building in self.buildings.values() {
            let spec = building_spec(building.kind);
            let scale = building.tier as f64 * building.efficiency();
            produced += spec.production.scaled(scale);
            consumed += spec.upkeep.scaled(scale);
        }

        let food_upkeep = self.population.count as f64 * FOOD_PER_CITIZEN;
        let fed = self.resources.food + produced.food > food_upkeep;
        consumed.food += food_upkeep;

        self.resources = (self.resources + produced).saturating_sub(&consumed);

        let grew = fed && self.population.count < self.population.capacity;
        if grew {
            self.population.count += 1;
        }
        self.recalculate();

        ProductionReport {
            produced,
            consumed,
            population: self.population,
            grew,
        }
    }

    /// Re-derive capacity, staffing, and the health maximum from the
    /// current buildings.
    fn recalculate(&mut self) {
        self.population.capacity = self
            .buildings
            .values()
            .filter(|b| b.kind == BuildingType::House)
            .map(|b| house_capacity(b.tier))
            .sum();
        self.population.count = self.population.count.min(self.population.capacity);
        self.assign_workers();

        let bonus: f64 = self
            .buildings
            .values()
            .filter(|b| building_spec(b.kind).heals)
            .map(|b| {
                (HOSPITAL_BASE_BONUS + HOSPITAL_BONUS_PER_TIER * (b.tier - 1) as f64)
                    * b.efficiency()
            })
            .sum();
        self.health.set_max((BASE_MAX_HEALTH * (1.0 + bonus)).round());
    }

    fn assign_workers(&mut self) {
        let mut free = self.population.count;
        for building in self.buildings.values_mut() {
            building.assigned_workers = 0;
        }
        for kind in BuildingType::STAFFING_PRIORITY {
            for building in self.buildings.values_mut().filter(|b| b.kind == kind) {
                let take = building.required_workers().min(free);
                building.assigned_workers = take;
                free -= take;
            }
        }
        self.population.unassigned = free;
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_building_id;
        self.next_building_id += 1;
        id
    }

    #[cfg(test)]
    pub(crate) fn set_population(&mut self, count: u32) {
        self.population.count = count;
        self.recalculate();
    }
}
