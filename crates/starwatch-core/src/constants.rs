//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

// --- Factions ---

/// Faction every object belongs to until told otherwise.
/// Always present in a faction table, at index 0.
pub const NEUTRAL_FACTION_INDEX: u32 = 0;

/// Name of the faction at index 0 when no config provides one.
pub const NEUTRAL_FACTION_NAME: &str = "Independent";

// --- Navigation ---

/// Edge length of one navigation sector (meters).
pub const SECTOR_SIZE: f32 = 20_000.0;

/// Sector grid offset so that the world origin lands in sector `F5`.
pub const SECTOR_ORIGIN_OFFSET: i32 = 5;

// --- Spatial index ---

/// Default cell size of the uniform grid broad phase (meters).
/// Roughly the size of a large station plus its weapon envelope.
pub const GRID_CELL_SIZE: f32 = 5_000.0;

// --- Replication ---

/// Default distance below which position changes are not replicated (meters).
pub const DEFAULT_SIGNIFICANT_RANGE: f32 = 1.0;

/// Rotation change below which rotation is not replicated (degrees).
pub const ROTATION_SIGNIFICANT_DEGREES: f32 = 1.0;

// --- Object archetypes ---

/// Mine trigger radius (m).
pub const MINE_RADIUS: f32 = 50.0;

/// Mine blast radius (m). The inner half takes full damage.
pub const MINE_BLAST_RANGE: f32 = 1_000.0;

/// Mine damage at the blast edge.
pub const MINE_DAMAGE_AT_EDGE: f32 = 30.0;

/// Mine damage inside the inner half of the blast.
pub const MINE_DAMAGE_AT_CENTER: f32 = 160.0;

/// Asteroid collision radius (m).
pub const ASTEROID_RADIUS: f32 = 120.0;

/// Station collision radius (m).
pub const STATION_RADIUS: f32 = 300.0;
pub const STATION_HULL: f32 = 400.0;
pub const STATION_SHIELDS: f32 = 800.0;

/// Frigate-class collision radius (m).
pub const SHIP_RADIUS: f32 = 100.0;
pub const SHIP_HULL: f32 = 70.0;
pub const SHIP_SHIELDS: f32 = 50.0;

/// Player cruiser collision radius (m).
pub const PLAYER_SHIP_RADIUS: f32 = 200.0;
pub const PLAYER_SHIP_HULL: f32 = 250.0;
pub const PLAYER_SHIP_SHIELDS: f32 = 160.0;
