//! Fundamental geometric and simulation types.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::DamageType;

/// Serializable identity of a space object.
///
/// Produced from the registry's generational handle; two live objects never
/// share an `ObjectId`, and a destroyed object's id is never handed to a new
/// object while anything could still observe the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position, orientation and motion of a space object.
///
/// Position in meters, rotation in degrees (absolute), velocity in m/s,
/// angular velocity in degrees/s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
}

impl Transform {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Distance between the centers of two transforms (meters).
    pub fn range_to(&self, other: &Transform) -> f32 {
        self.position.distance(other.position)
    }

    /// Speed magnitude (m/s).
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// What kind of damage is being dealt and by whom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageInfo {
    pub kind: DamageType,
    /// Object responsible for the damage, if any.
    pub instigator: Option<ObjectId>,
}

impl DamageInfo {
    pub fn new(kind: DamageType) -> Self {
        Self {
            kind,
            instigator: None,
        }
    }

    /// Build from an optional script token (`"energy"`, `"kinetic"`, `"emp"`).
    /// Absent or unrecognized tokens give [`DamageType::Unspecified`].
    pub fn from_token(token: Option<&str>) -> Self {
        Self::new(token.map(DamageType::from_token).unwrap_or_default())
    }

    pub fn with_instigator(mut self, instigator: ObjectId) -> Self {
        self.instigator = Some(instigator);
        self
    }
}

/// Parameters of one area-effect damage pulse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlastParams {
    /// Outer radius of the effect (meters).
    pub blast_range: f32,
    /// Damage at the edge of the falloff band.
    pub min_damage: f32,
    /// Damage inside the blast core.
    pub max_damage: f32,
    /// Inner radius beyond an object's surface that takes full damage (meters).
    pub min_range: f32,
}

impl BlastParams {
    pub fn new(blast_range: f32, min_damage: f32, max_damage: f32) -> Self {
        Self {
            blast_range,
            min_damage,
            max_damage,
            min_range: 0.0,
        }
    }

    pub fn with_min_range(mut self, min_range: f32) -> Self {
        self.min_range = min_range;
        self
    }

    /// Damage dealt to an object whose surface is `surface_distance` meters
    /// from the epicenter, or `None` if it is outside the falloff band.
    ///
    /// `surface_distance` is center distance minus the object's radius; it may
    /// be negative when the epicenter lies inside the object.
    pub fn damage_at(&self, surface_distance: f32) -> Option<f32> {
        let dist = (surface_distance - self.min_range).max(0.0);
        let band = self.blast_range - self.min_range;
        if band == 0.0 {
            // No falloff band: only the blast core is affected.
            return (dist <= 0.0).then_some(self.max_damage);
        }
        // An inverted band (blast_range < min_range) reaches nothing.
        if dist < band {
            Some(self.max_damage - (self.max_damage - self.min_damage) * dist / band)
        } else {
            None
        }
    }
}

/// Simulation clock. Ticks are fixed-length; elapsed seconds follow from
/// the tick rate.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    pub tick: u64,
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Length of one tick (seconds).
    pub fn dt(&self) -> f64 {
        1.0 / crate::constants::TICK_RATE as f64
    }

    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}
