//! Object destruction.

use glam::Vec2;
use hecs::Entity;

use starwatch_core::events::SimEvent;
use starwatch_core::types::DamageInfo;

use crate::comms;
use crate::components::{Destroying, Explosive};
use crate::damage::{self, BlastQueue, PendingBlast};
use crate::registry::{object_id, Registry};

/// Destroy an object: run its destruction hook while it is still registered
/// and indexed, then unregister it. A blast released by the object, and any
/// blast that one sets off, is resolved before returning.
///
/// Returns false if the object is gone or already being destroyed.
pub fn destroy(registry: &mut Registry, entity: Entity, events: &mut Vec<SimEvent>) -> bool {
    let mut queue = BlastQueue::new();
    let destroyed = destroy_deferred(registry, entity, events, &mut queue);
    damage::resolve_chain(registry, &mut queue, events);
    destroyed
}

/// Destroy an object, queueing its blast instead of resolving it.
pub(crate) fn destroy_deferred(
    registry: &mut Registry,
    entity: Entity,
    events: &mut Vec<SimEvent>,
    queue: &mut BlastQueue,
) -> bool {
    if !registry.contains(entity) || registry.has::<Destroying>(entity) {
        return false;
    }
    if registry.world_mut().insert_one(entity, Destroying).is_err() {
        return false;
    }
    on_destroyed(registry, entity, events, queue);
    registry.unregister(entity)
}

fn on_destroyed(
    registry: &mut Registry,
    entity: Entity,
    events: &mut Vec<SimEvent>,
    queue: &mut BlastQueue,
) {
    let id = object_id(entity);
    let kind = registry.kind(entity).unwrap_or_default();
    let position = registry.position(entity).unwrap_or(Vec2::ZERO);

    tracing::debug!(target: "starwatch::sim", %id, ?kind, "object.destroyed");
    events.push(SimEvent::Destroyed { id, kind, position });

    comms::release_counterpart(registry, entity, events);

    if let Some(explosive) = registry.get::<Explosive>(entity) {
        queue.push_back(PendingBlast {
            epicenter: position,
            blast: explosive.blast,
            info: DamageInfo::new(explosive.kind).with_instigator(id),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Hull;
    use crate::registry::ObjectSpec;
    use crate::spatial::GridIndex;
    use starwatch_core::enums::{DamageType, ObjectKind};
    use starwatch_core::types::BlastParams;

    fn registry() -> Registry {
        Registry::new(Box::new(GridIndex::new(100.0)))
    }

    #[test]
    fn destroy_twice_is_noop() {
        let mut reg = registry();
        let mut events = Vec::new();
        let id = reg.register(ObjectSpec::new(ObjectKind::Station, 100.0), 1.0);
        assert!(destroy(&mut reg, id, &mut events));
        assert!(!destroy(&mut reg, id, &mut events));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn explosive_damages_neighbours_but_not_itself() {
        let mut reg = registry();
        let mut events = Vec::new();
        let mine = reg.register(
            ObjectSpec::new(ObjectKind::Mine, 10.0)
                .hull(1.0)
                .explosive(BlastParams::new(200.0, 10.0, 50.0), DamageType::Kinetic),
            1.0,
        );
        let ship = reg.register(
            ObjectSpec::new(ObjectKind::Ship, 10.0)
                .hull(100.0)
                .at(Vec2::new(10.0, 0.0)),
            1.0,
        );

        assert!(destroy(&mut reg, mine, &mut events));
        assert!(!reg.contains(mine));
        assert_eq!(reg.get::<Hull>(ship).unwrap().current, 50.0);

        let damaged_ids: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Damaged { id, instigator, .. } => Some((*id, *instigator)),
                _ => None,
            })
            .collect();
        assert_eq!(damaged_ids, vec![(object_id(ship), Some(object_id(mine)))]);
    }

    #[test]
    fn blast_resolves_after_unregister() {
        let mut reg = registry();
        let mut events = Vec::new();
        let mine = reg.register(
            ObjectSpec::new(ObjectKind::Mine, 10.0)
                .explosive(BlastParams::new(100.0, 5.0, 5.0), DamageType::Kinetic),
            1.0,
        );
        let rock = reg.register(
            ObjectSpec::new(ObjectKind::Asteroid, 10.0)
                .hull(5.0)
                .at(Vec2::new(30.0, 0.0)),
            1.0,
        );
        destroy(&mut reg, mine, &mut events);
        assert!(!reg.contains(rock));
        assert!(reg.is_empty());
    }

    #[test]
    fn deferred_destroy_queues_blast() {
        let mut reg = registry();
        let mut events = Vec::new();
        let mut queue = BlastQueue::new();
        let mine = reg.register(
            ObjectSpec::new(ObjectKind::Mine, 10.0)
                .at(Vec2::new(40.0, 0.0))
                .explosive(BlastParams::new(100.0, 5.0, 5.0), DamageType::Kinetic),
            1.0,
        );
        let rock = reg.register(ObjectSpec::new(ObjectKind::Asteroid, 10.0).hull(5.0), 1.0);

        assert!(destroy_deferred(&mut reg, mine, &mut events, &mut queue));
        assert!(reg.contains(rock), "blast waits in the queue");
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].epicenter, Vec2::new(40.0, 0.0));
        assert_eq!(queue[0].info.instigator, Some(object_id(mine)));

        damage::resolve_chain(&mut reg, &mut queue, &mut events);
        assert!(queue.is_empty());
        assert!(!reg.contains(rock));
    }
}
