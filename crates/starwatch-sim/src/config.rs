//! Simulation and faction configuration.
//!
//! Faction definitions ship as an embedded JSON file and can be overridden
//! with a file named by the `STARWATCH_FACTIONS_PATH` environment variable.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use starwatch_core::constants::{DEFAULT_SIGNIFICANT_RANGE, GRID_CELL_SIZE, SECTOR_SIZE};

pub const BUILTIN_FACTIONS: &str = include_str!("data/factions.json");

/// Environment variable naming a faction file to load instead of the builtin.
pub const FACTIONS_PATH_ENV: &str = "STARWATCH_FACTIONS_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("duplicate faction `{0}`")]
    DuplicateFaction(String),
    #[error("faction `{faction}` references unknown faction `{referenced}`")]
    UnknownFaction { faction: String, referenced: String },
}

/// Tunables of one simulation instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Cell size of the broad-phase grid (meters).
    pub grid_cell_size: f32,
    /// Edge length of a navigation sector (meters).
    pub sector_size: f32,
    /// Significant range given to objects that do not set their own.
    pub default_significant_range: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_cell_size: GRID_CELL_SIZE,
            sector_size: SECTOR_SIZE,
            default_significant_range: DEFAULT_SIGNIFICANT_RANGE,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(SimConfig::from_json_str(&contents)?)
    }
}

/// One faction as authored in config. `enemies` and `friends` fill this
/// faction's own row only.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FactionDef {
    pub name: String,
    pub description: String,
    pub enemies: Vec<String>,
    pub friends: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FactionConfig {
    pub factions: Vec<FactionDef>,
}

impl FactionConfig {
    pub fn builtin() -> Self {
        serde_json::from_str(BUILTIN_FACTIONS).expect("builtin faction config should parse")
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(FactionConfig::from_json_str(&contents)?)
    }
}

/// Load faction config from the path in [`FACTIONS_PATH_ENV`], falling back
/// to the builtin definitions when unset or unreadable.
pub fn load_factions_from_env() -> FactionConfig {
    if let Some(path) = env::var_os(FACTIONS_PATH_ENV).map(PathBuf::from) {
        match FactionConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!(
                    target: "starwatch::config",
                    path = %path.display(),
                    factions = config.factions.len(),
                    "faction_config.loaded=file"
                );
                return config;
            }
            Err(err) => {
                tracing::warn!(
                    target: "starwatch::config",
                    path = %path.display(),
                    error = %err,
                    "faction_config.load_failed"
                );
            }
        }
    }

    tracing::info!(target: "starwatch::config", "faction_config.loaded=builtin");
    FactionConfig::builtin()
}
