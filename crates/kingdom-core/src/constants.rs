//! Simulation constants and tuning parameters.

/// Game loop tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick at 1x speed.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Largest wall-clock gap fed into a single tick (seconds).
pub const MAX_FRAME_DELTA_SECS: f64 = 0.25;

/// Slowest selectable game speed.
pub const MIN_GAME_SPEED: u8 = 1;

/// Fastest selectable game speed.
pub const MAX_GAME_SPEED: u8 = 5;

/// Seed used when none is supplied.
pub const DEFAULT_SEED: u64 = 42;

// --- Battlefield ---

/// Battlefield width (px).
pub const FIELD_WIDTH: f64 = 800.0;

/// Battlefield height (px).
pub const FIELD_HEIGHT: f64 = 500.0;

/// Smallest margin kept between the path and the field edge (px).
pub const FIELD_MIN_MARGIN: f64 = 40.0;

/// Margin as a fraction of the shorter field side.
pub const FIELD_MARGIN_FRACTION: f64 = 0.08;

/// Space reserved on each side when capping the margin (px).
pub const FIELD_EDGE_RESERVE: f64 = 30.0;

/// Margin never drops below this, even on tiny fields (px).
pub const FIELD_MARGIN_FLOOR: f64 = 16.0;

/// Side of one defense-grid tile (px).
pub const DEFENSE_TILE_SIZE: f64 = 40.0;

/// Defense grid columns.
pub const DEFENSE_GRID_COLS: i32 = 20;

/// Defense grid rows.
pub const DEFENSE_GRID_ROWS: i32 = 12;

/// Tower tile centers closer than this to the path are blocked (px).
pub const PATH_CLEARANCE: f64 = 20.0;

/// City grid columns.
pub const CITY_GRID_COLS: i32 = 8;

/// City grid rows.
pub const CITY_GRID_ROWS: i32 = 6;

// --- Path ---

/// Spacing between re-sampled path waypoints (px).
pub const PATH_RESAMPLE_STEP: f64 = 12.0;

/// Horizontal jitter applied to interior control points (normalized, ±).
pub const PATH_JITTER_X: f64 = 0.04;

/// Vertical jitter applied to interior control points (normalized, ±).
pub const PATH_JITTER_Y: f64 = 0.06;

// --- Enemies ---

/// Seconds a difficulty-0 enemy takes to walk the whole path at 1x.
pub const ENEMY_BASE_TRAVEL_SECS: f64 = 30.0;

/// Speed used when the path has no length (px/s).
pub const ENEMY_FALLBACK_SPEED: f64 = 20.0;

/// Slowdown per difficulty tier: speed × 1 / (1 + k × tier).
pub const ENEMY_TIER_SLOWDOWN: f64 = 0.1;

/// Seconds between attacks once an enemy reaches the base.
pub const ENEMY_ATTACK_INTERVAL_SECS: f64 = 1.0;

/// Damage per attack on wave 1.
pub const BASE_ENEMY_DAMAGE: f64 = 10.0;

/// Attack damage growth per wave after the first.
pub const ENEMY_DAMAGE_GROWTH_PER_WAVE: f64 = 0.01;

/// Health factor under the weakened-enemies power-up.
pub const WEAKENED_HEALTH_FACTOR: f64 = 0.5;

// --- Loot ---

pub const SHARD_DROP_CHANCE: f64 = 0.005;
pub const SHARD_DROP_AMOUNT: f64 = 1.0;
pub const WOOD_DROP_CHANCE: f64 = 0.45;
pub const WOOD_DROP_BASE: f64 = 15.0;
pub const STONE_DROP_CHANCE: f64 = 0.15;
pub const STONE_DROP_BASE: f64 = 10.0;

// --- Towers ---

/// Range gained per tier above 1 (px).
pub const TOWER_RANGE_PER_TIER: f64 = 8.0;

/// Fire interval multiplier per tier above 1.
pub const TOWER_FIRE_RATE_DECAY: f64 = 0.95;

/// Fastest any tower may fire (seconds between shots).
pub const TOWER_MIN_FIRE_INTERVAL_SECS: f64 = 0.3;

/// Damage factor under the enhanced-damage power-up.
pub const ENHANCED_DAMAGE_FACTOR: f64 = 1.3;

/// Gold cost factor under the cheaper-towers power-up.
pub const CHEAPER_TOWERS_GOLD_FACTOR: f64 = 0.75;

// --- Projectiles ---

/// A projectile this close to its target hits (px).
pub const PROJECTILE_HIT_THRESHOLD: f64 = 5.0;

/// Seconds a projectile may fly before it is discarded.
pub const PROJECTILE_LIFESPAN_SECS: f64 = 2.0;

// --- Waves ---

/// Enemies on wave 1.
pub const WAVE_BASE_COUNT: u32 = 6;

/// Extra enemies per wave after the first.
pub const WAVE_COUNT_GROWTH: u32 = 2;

/// Upper bound on enemies in a single wave.
pub const WAVE_MAX_COUNT: u32 = 24;

/// Goblin share of the base count once other kinds appear.
pub const GOBLIN_SHARE: f64 = 0.6;
pub const MIN_GOBLINS: u32 = 4;

/// Orc share of the base count.
pub const ORC_SHARE: f64 = 0.3;
pub const MIN_ORCS: u32 = 2;

/// First wave that includes orcs.
pub const ORC_FIRST_WAVE: u32 = 2;

/// First wave that includes dragons.
pub const DRAGON_FIRST_WAVE: u32 = 4;

/// Every Nth wave is a single boss.
pub const BOSS_WAVE_INTERVAL: u32 = 5;

/// Seconds between queued spawns.
pub const SPAWN_INTERVAL_SECS: f64 = 1.0;

/// Delay before a boss enters the field.
pub const BOSS_SPAWN_DELAY_SECS: f64 = 1.0;

/// Gold for clearing any wave.
pub const WAVE_REWARD_BASE: f64 = 50.0;

/// Extra gold per wave number.
pub const WAVE_REWARD_PER_WAVE: f64 = 25.0;

/// Fraction of gold lost on a failed wave (floored).
pub const FAILURE_GOLD_PENALTY: f64 = 0.1;

/// Consecutive failures before a power-up must be chosen.
pub const POWER_UP_FAILURE_THRESHOLD: u32 = 3;

// --- Health pool ---

pub const BASE_MAX_HEALTH: f64 = 100.0;

/// Health bonus of a tier-1 hospital (fraction of base).
pub const HOSPITAL_BASE_BONUS: f64 = 0.15;

/// Additional health bonus per hospital tier above 1.
pub const HOSPITAL_BONUS_PER_TIER: f64 = 0.05;

// --- Economy ---

pub const STARTING_GOLD: f64 = 1000.0;
pub const STARTING_WOOD: f64 = 500.0;
pub const STARTING_STONE: f64 = 300.0;
pub const STARTING_FOOD: f64 = 100.0;
pub const STARTING_SHARDS: f64 = 0.0;

/// Scaled seconds between production cycles.
pub const PRODUCTION_INTERVAL_SECS: f64 = 60.0;

/// Food eaten per citizen per production cycle.
pub const FOOD_PER_CITIZEN: f64 = 0.5;

/// Highest tier any building can reach.
pub const MAX_BUILDING_TIER: u8 = 5;

/// Shard surcharge for reaching each tier, indexed by `tier - 1`.
pub const PREMIUM_SHARD_SURCHARGE: [f64; 5] = [0.0, 0.0, 0.0, 1.0, 2.0];

/// Fraction of the total investment returned on demolition (floored).
pub const DEMOLITION_REFUND_FACTOR: f64 = 0.5;

/// Towers supportable without any barracks.
pub const BASE_SUPPORT_CAPACITY: u32 = 2;

/// Tower slots per fully staffed barracks tier.
pub const SUPPORT_PER_BARRACKS_TIER: f64 = 2.0;

// --- Settings defaults ---

pub const DEFAULT_MUSIC_VOLUME: f64 = 0.5;
pub const DEFAULT_EFFECTS_VOLUME: f64 = 0.7;
