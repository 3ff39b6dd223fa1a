//! Faction relation table.
//!
//! Each faction owns one row of relations toward every faction, itself
//! included. Rows are authored independently, so `A -> B` and `B -> A` may
//! disagree; lookups always read the row of the faction asking.

use std::fmt;

use starwatch_core::constants::{NEUTRAL_FACTION_INDEX, NEUTRAL_FACTION_NAME};
use starwatch_core::enums::Relation;

use crate::config::{ConfigError, FactionConfig};

/// Index of a faction in a [`FactionTable`].
///
/// Only the table hands these out, and the table never shrinks, so an id
/// obtained from a table is always a valid row of that table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FactionId(u32);

impl FactionId {
    /// The unaffiliated faction at index 0, present in every table.
    pub const NEUTRAL: FactionId = FactionId(NEUTRAL_FACTION_INDEX);

    pub fn index(self) -> u32 {
        self.0
    }
}

impl Default for FactionId {
    fn default() -> Self {
        FactionId::NEUTRAL
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "faction:{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct FactionInfo {
    pub name: String,
    pub description: String,
    /// Relation of this faction toward each faction, by index.
    states: Vec<Relation>,
}

#[derive(Debug, Clone)]
pub struct FactionTable {
    factions: Vec<FactionInfo>,
}

impl Default for FactionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FactionTable {
    /// A table holding only the neutral faction.
    pub fn new() -> Self {
        Self {
            factions: vec![FactionInfo {
                name: NEUTRAL_FACTION_NAME.to_string(),
                description: String::new(),
                states: vec![Relation::Neutral],
            }],
        }
    }

    /// Build a table from config. The first entry becomes faction 0.
    pub fn from_config(config: &FactionConfig) -> Result<Self, ConfigError> {
        let mut table = FactionTable {
            factions: Vec::with_capacity(config.factions.len().max(1)),
        };
        if config.factions.is_empty() {
            return Ok(FactionTable::new());
        }

        for def in &config.factions {
            if table.id_by_name(&def.name).is_some() {
                return Err(ConfigError::DuplicateFaction(def.name.clone()));
            }
            table.add_faction(&def.name, &def.description);
        }

        for def in &config.factions {
            let Some(own) = table.id_by_name(&def.name) else {
                continue;
            };
            for (names, relation) in [
                (&def.enemies, Relation::Enemy),
                (&def.friends, Relation::Friendly),
            ] {
                for other_name in names {
                    let other =
                        table
                            .id_by_name(other_name)
                            .ok_or_else(|| ConfigError::UnknownFaction {
                                faction: def.name.clone(),
                                referenced: other_name.clone(),
                            })?;
                    table.set_relation(own, other, relation);
                }
            }
        }
        Ok(table)
    }

    /// Append a faction. Existing relations are untouched; every row gains a
    /// `Neutral` entry toward the newcomer and the newcomer's row starts
    /// all `Neutral`.
    ///
    /// Adding a name that already exists returns the existing id.
    pub fn add_faction(&mut self, name: &str, description: &str) -> FactionId {
        if let Some(existing) = self.id_by_name(name) {
            return existing;
        }
        let id = FactionId(self.factions.len() as u32);
        for info in &mut self.factions {
            info.states.push(Relation::Neutral);
        }
        self.factions.push(FactionInfo {
            name: name.to_string(),
            description: description.to_string(),
            states: vec![Relation::Neutral; self.factions.len() + 1],
        });
        id
    }

    pub fn len(&self) -> usize {
        self.factions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factions.is_empty()
    }

    /// Id for a numeric index, if the table has that row.
    pub fn id(&self, index: u32) -> Option<FactionId> {
        ((index as usize) < self.factions.len()).then_some(FactionId(index))
    }

    pub fn id_by_name(&self, name: &str) -> Option<FactionId> {
        self.factions
            .iter()
            .position(|info| info.name == name)
            .map(|idx| FactionId(idx as u32))
    }

    pub fn ids(&self) -> impl Iterator<Item = FactionId> + '_ {
        (0..self.factions.len() as u32).map(FactionId)
    }

    pub fn info(&self, id: FactionId) -> Option<&FactionInfo> {
        self.factions.get(id.0 as usize)
    }

    pub fn name(&self, id: FactionId) -> &str {
        self.info(id).map(|info| info.name.as_str()).unwrap_or("")
    }

    /// How `own` regards `other`. O(1).
    pub fn relation(&self, own: FactionId, other: FactionId) -> Relation {
        self.factions
            .get(own.0 as usize)
            .and_then(|info| info.states.get(other.0 as usize))
            .copied()
            .unwrap_or_default()
    }

    /// Author how `own` regards `other`. The reverse direction is unchanged.
    pub fn set_relation(&mut self, own: FactionId, other: FactionId, relation: Relation) {
        if let Some(cell) = self
            .factions
            .get_mut(own.0 as usize)
            .and_then(|info| info.states.get_mut(other.0 as usize))
        {
            *cell = relation;
        }
    }

    /// Author both directions at once.
    pub fn set_mutual(&mut self, a: FactionId, b: FactionId, relation: Relation) {
        self.set_relation(a, b, relation);
        self.set_relation(b, a, relation);
    }

    pub fn is_enemy(&self, own: FactionId, other: FactionId) -> bool {
        self.relation(own, other) == Relation::Enemy
    }

    pub fn is_friendly(&self, own: FactionId, other: FactionId) -> bool {
        self.relation(own, other) == Relation::Friendly
    }
}
