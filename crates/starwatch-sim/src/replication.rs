//! Change tracking for the replicated fields of every object.
//!
//! Faction and transform fields are synced to clients. A field is sent the
//! first time an object is seen and afterwards only when it changed by a
//! significant amount, so slow drift does not flood the wire.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use starwatch_core::constants::ROTATION_SIGNIFICANT_DEGREES;
use starwatch_core::types::{ObjectId, Transform};

use crate::components::{Allegiance, Replicated};
use crate::registry::{object_id, Registry};

/// Changed fields of one object. Unchanged fields are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectUpdate {
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angular_velocity: Option<f32>,
    /// Faction table index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<u32>,
}

impl ObjectUpdate {
    fn new(id: ObjectId) -> Self {
        Self {
            id,
            position: None,
            velocity: None,
            rotation: None,
            angular_velocity: None,
            faction: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.velocity.is_none()
            && self.rotation.is_none()
            && self.angular_velocity.is_none()
            && self.faction.is_none()
    }
}

/// Everything clients need to catch up with one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplicationFrame {
    pub tick: u64,
    /// Sorted by object id.
    pub updates: Vec<ObjectUpdate>,
    /// Objects unregistered since the previous frame, sorted.
    pub removed: Vec<ObjectId>,
}

impl ReplicationFrame {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.removed.is_empty()
    }

    pub fn update_for(&self, id: ObjectId) -> Option<&ObjectUpdate> {
        self.updates
            .binary_search_by_key(&id, |u| u.id)
            .ok()
            .map(|i| &self.updates[i])
    }
}

/// Smallest angle between two headings (degrees).
fn angle_between(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

fn diff(id: ObjectId, transform: &Transform, faction: u32, last: &mut Replicated) -> ObjectUpdate {
    let mut update = ObjectUpdate::new(id);

    let position = transform.position;
    let moved = match last.last_position {
        None => true,
        Some(prev) => prev != position && prev.distance(position) >= last.significant_range,
    };
    if moved {
        update.position = Some(position);
        last.last_position = Some(position);
    }

    if last.last_velocity != Some(transform.velocity) {
        update.velocity = Some(transform.velocity);
        last.last_velocity = Some(transform.velocity);
    }

    let turned = match last.last_rotation {
        None => true,
        Some(prev) => angle_between(prev, transform.rotation) >= ROTATION_SIGNIFICANT_DEGREES,
    };
    if turned {
        update.rotation = Some(transform.rotation);
        last.last_rotation = Some(transform.rotation);
    }

    if last.last_angular_velocity != Some(transform.angular_velocity) {
        update.angular_velocity = Some(transform.angular_velocity);
        last.last_angular_velocity = Some(transform.angular_velocity);
    }

    if last.last_faction.map(|f| f.index()) != Some(faction) {
        update.faction = Some(faction);
    }
    update
}

/// Build the frame for `tick` and mark everything in it as sent.
pub fn collect(registry: &mut Registry, tick: u64) -> ReplicationFrame {
    let mut updates = Vec::new();
    for (entity, (transform, allegiance, replicated)) in registry
        .world_mut()
        .query_mut::<(&Transform, &Allegiance, &mut Replicated)>()
    {
        let update = diff(object_id(entity), transform, allegiance.0.index(), replicated);
        if update.faction.is_some() {
            replicated.last_faction = Some(allegiance.0);
        }
        if !update.is_empty() {
            updates.push(update);
        }
    }
    updates.sort_unstable_by_key(|u| u.id);

    let mut removed = registry.take_removed();
    removed.sort_unstable();

    ReplicationFrame {
        tick,
        updates,
        removed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factions::FactionTable;
    use crate::registry::ObjectSpec;
    use crate::spatial::GridIndex;
    use starwatch_core::enums::ObjectKind;

    fn registry() -> Registry {
        Registry::new(Box::new(GridIndex::new(100.0)))
    }

    #[test]
    fn first_frame_sends_everything() {
        let mut reg = registry();
        let id = reg.register(
            ObjectSpec::new(ObjectKind::Ship, 10.0).at(Vec2::new(5.0, 5.0)),
            1.0,
        );
        let frame = collect(&mut reg, 1);
        let update = frame.update_for(object_id(id)).unwrap();
        assert_eq!(update.position, Some(Vec2::new(5.0, 5.0)));
        assert_eq!(update.faction, Some(0));
        assert_eq!(update.rotation, Some(0.0));

        assert!(collect(&mut reg, 2).is_empty());
    }

    #[test]
    fn small_moves_accumulate_until_significant() {
        let mut reg = registry();
        let id = reg.register(
            ObjectSpec::new(ObjectKind::Ship, 10.0).significant_range(10.0),
            1.0,
        );
        collect(&mut reg, 0);

        reg.set_position(id, Vec2::new(6.0, 0.0));
        assert!(collect(&mut reg, 1).is_empty());

        reg.set_position(id, Vec2::new(12.0, 0.0));
        let frame = collect(&mut reg, 2);
        assert_eq!(
            frame.update_for(object_id(id)).unwrap().position,
            Some(Vec2::new(12.0, 0.0))
        );
    }

    #[test]
    fn rotation_wraps_around_zero() {
        let mut reg = registry();
        let id = reg.register(ObjectSpec::new(ObjectKind::Ship, 10.0).rotation(359.8), 1.0);
        collect(&mut reg, 0);
        reg.set_rotation(id, 0.5);
        assert!(collect(&mut reg, 1).is_empty());
        reg.set_rotation(id, 2.0);
        assert_eq!(collect(&mut reg, 2).updates.len(), 1);
    }

    #[test]
    fn faction_change_is_sent() {
        let mut factions = FactionTable::new();
        let kraylor = factions.add_faction("Kraylor", "");
        let mut reg = registry();
        let id = reg.register(ObjectSpec::new(ObjectKind::Ship, 10.0), 1.0);
        collect(&mut reg, 0);

        reg.set_faction(id, kraylor);
        let frame = collect(&mut reg, 1);
        let update = frame.update_for(object_id(id)).unwrap();
        assert_eq!(update.faction, Some(kraylor.index()));
        assert_eq!(update.position, None);
    }

    #[test]
    fn removed_ids_reported_once() {
        let mut reg = registry();
        let id = reg.register(ObjectSpec::new(ObjectKind::Asteroid, 10.0), 1.0);
        collect(&mut reg, 0);
        reg.unregister(id);
        assert_eq!(collect(&mut reg, 1).removed, vec![object_id(id)]);
        assert!(collect(&mut reg, 2).removed.is_empty());
    }

    #[test]
    fn unchanged_fields_are_omitted_from_json() {
        let update = ObjectUpdate {
            faction: Some(3),
            ..ObjectUpdate::new(ObjectId(7))
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"id":7,"faction":3}"#);
    }
}
