//! Stock object archetypes.
//!
//! Gives scenario code a starting [`ObjectSpec`] for the common object
//! kinds; callers chain further builder calls to place and name them.

use starwatch_core::enums::{DamageType, ObjectKind};
use starwatch_core::types::BlastParams;

use crate::registry::ObjectSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    Mine,
    Asteroid,
    Station,
    Ship,
    PlayerShip,
}

/// Construction parameters shared by every object of an archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchetypeProfile {
    pub kind: ObjectKind,
    /// Collision range (m).
    pub radius: f32,
    pub hull: Option<f32>,
    pub shields: Option<f32>,
    /// Blast released on destruction.
    pub blast: Option<(BlastParams, DamageType)>,
}

impl ArchetypeProfile {
    pub fn spec(&self) -> ObjectSpec {
        let mut spec = ObjectSpec::new(self.kind, self.radius);
        if let Some(hp) = self.hull {
            spec = spec.hull(hp);
        }
        if let Some(capacity) = self.shields {
            spec = spec.shields(capacity);
        }
        if let Some((blast, kind)) = self.blast {
            spec = spec.explosive(blast, kind);
        }
        spec
    }
}

pub fn get_profile(archetype: Archetype) -> ArchetypeProfile {
    use starwatch_core::constants::*;

    match archetype {
        Archetype::Mine => ArchetypeProfile {
            kind: ObjectKind::Mine,
            radius: MINE_RADIUS,
            hull: Some(1.0),
            shields: None,
            blast: Some((
                BlastParams::new(MINE_BLAST_RANGE, MINE_DAMAGE_AT_EDGE, MINE_DAMAGE_AT_CENTER)
                    .with_min_range(MINE_BLAST_RANGE / 2.0),
                DamageType::Kinetic,
            )),
        },
        // Any hit breaks an asteroid apart.
        Archetype::Asteroid => ArchetypeProfile {
            kind: ObjectKind::Asteroid,
            radius: ASTEROID_RADIUS,
            hull: Some(f32::MIN_POSITIVE),
            shields: None,
            blast: None,
        },
        Archetype::Station => ArchetypeProfile {
            kind: ObjectKind::Station,
            radius: STATION_RADIUS,
            hull: Some(STATION_HULL),
            shields: Some(STATION_SHIELDS),
            blast: None,
        },
        Archetype::Ship => ArchetypeProfile {
            kind: ObjectKind::Ship,
            radius: SHIP_RADIUS,
            hull: Some(SHIP_HULL),
            shields: Some(SHIP_SHIELDS),
            blast: None,
        },
        Archetype::PlayerShip => ArchetypeProfile {
            kind: ObjectKind::PlayerShip,
            radius: PLAYER_SHIP_RADIUS,
            hull: Some(PLAYER_SHIP_HULL),
            shields: Some(PLAYER_SHIP_SHIELDS),
            blast: None,
        },
    }
}

/// Shorthand for `get_profile(archetype).spec()`.
pub fn spec(archetype: Archetype) -> ObjectSpec {
    get_profile(archetype).spec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mine_blast_has_full_damage_core() {
        let profile = get_profile(Archetype::Mine);
        let (blast, kind) = profile.blast.unwrap();
        assert_eq!(kind, DamageType::Kinetic);
        assert_eq!(blast.min_range, 500.0);
        assert_eq!(blast.damage_at(400.0), Some(160.0));
        assert_eq!(blast.damage_at(1_000.0), None);
    }

    #[test]
    fn every_archetype_has_matching_kind() {
        for (archetype, kind) in [
            (Archetype::Mine, ObjectKind::Mine),
            (Archetype::Asteroid, ObjectKind::Asteroid),
            (Archetype::Station, ObjectKind::Station),
            (Archetype::Ship, ObjectKind::Ship),
            (Archetype::PlayerShip, ObjectKind::PlayerShip),
        ] {
            let spec = spec(archetype);
            assert_eq!(spec.kind, kind);
            assert!(spec.collision_range > 0.0);
            assert!(spec.hull.is_some());
        }
    }
}
