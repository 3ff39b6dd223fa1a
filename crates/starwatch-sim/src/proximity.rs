//! Proximity queries over the registry.
//!
//! The broad phase only promises bounding-box overlap. Every query here
//! re-checks candidates against their true circle, so objects sitting in the
//! corners of the query box are never reported.

use glam::Vec2;
use hecs::Entity;

use starwatch_core::enums::ObjectKind;

use crate::components::{Destroying, Hull};
use crate::factions::FactionTable;
use crate::registry::Registry;

/// Which objects a query should consider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjectFilter {
    /// Every registered space object.
    #[default]
    Any,
    /// Objects of one kind.
    Kind(ObjectKind),
    /// Objects with a hull that are not already being destroyed.
    Damageable,
}

impl ObjectFilter {
    pub fn matches(self, registry: &Registry, entity: Entity) -> bool {
        // Stale index entries are not space objects.
        let Some(kind) = registry.kind(entity) else {
            return false;
        };
        match self {
            ObjectFilter::Any => true,
            ObjectFilter::Kind(wanted) => kind == wanted,
            ObjectFilter::Damageable => {
                registry.has::<Hull>(entity) && !registry.has::<Destroying>(entity)
            }
        }
    }
}

/// Objects whose circle overlaps the circle at `center` with `radius`,
/// in ascending id order.
///
/// `exclude` is left out of the result even when it matches.
pub fn query_circle(
    registry: &Registry,
    center: Vec2,
    radius: f32,
    filter: ObjectFilter,
    exclude: Option<Entity>,
) -> Vec<Entity> {
    candidates(registry, center, radius)
        .filter(|&id| Some(id) != exclude)
        .filter(|&id| filter.matches(registry, id))
        .filter(|&id| overlaps(registry, id, center, radius))
        .collect()
}

/// Whether any enemy of `origin` lies within `range`. Stops at the first hit.
pub fn any_enemy_within(
    registry: &Registry,
    factions: &FactionTable,
    origin: Entity,
    range: f32,
) -> bool {
    let (Some(center), Some(own)) = (registry.position(origin), registry.faction(origin)) else {
        return false;
    };
    candidates(registry, center, range)
        .filter(|&id| id != origin)
        .any(|id| {
            registry
                .faction(id)
                .is_some_and(|other| factions.is_enemy(own, other))
                && overlaps(registry, id, center, range)
        })
}

/// Every other object within `range` of `origin`.
pub fn all_within(registry: &Registry, origin: Entity, range: f32) -> Vec<Entity> {
    match registry.position(origin) {
        Some(center) => query_circle(registry, center, range, ObjectFilter::Any, Some(origin)),
        None => Vec::new(),
    }
}

/// Enemies of `origin` within `range`.
pub fn enemies_within(
    registry: &Registry,
    factions: &FactionTable,
    origin: Entity,
    range: f32,
) -> Vec<Entity> {
    let Some(own) = registry.faction(origin) else {
        return Vec::new();
    };
    all_within(registry, origin, range)
        .into_iter()
        .filter(|&id| {
            registry
                .faction(id)
                .is_some_and(|other| factions.is_enemy(own, other))
        })
        .collect()
}

fn candidates(registry: &Registry, center: Vec2, radius: f32) -> impl Iterator<Item = Entity> {
    let hits = if radius.is_finite() && radius >= 0.0 && center.is_finite() {
        let extent = Vec2::splat(radius);
        registry.query_area(center - extent, center + extent)
    } else {
        Vec::new()
    };
    hits.into_iter()
}

fn overlaps(registry: &Registry, id: Entity, center: Vec2, radius: f32) -> bool {
    match (registry.position(id), registry.radius(id)) {
        (Some(position), Some(own_radius)) => center.distance(position) < radius + own_radius,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factions::FactionId;
    use crate::registry::ObjectSpec;
    use crate::spatial::GridIndex;
    use starwatch_core::enums::Relation;

    fn registry() -> Registry {
        Registry::new(Box::new(GridIndex::new(100.0)))
    }

    fn spawn(reg: &mut Registry, kind: ObjectKind, at: Vec2, radius: f32) -> Entity {
        reg.register(ObjectSpec::new(kind, radius).at(at), 1.0)
    }

    #[test]
    fn corner_candidate_is_rejected() {
        let mut reg = registry();
        let origin = spawn(&mut reg, ObjectKind::Ship, Vec2::ZERO, 1.0);
        // Inside the 100x100 query box around the origin, but 127m away.
        let corner = spawn(&mut reg, ObjectKind::Asteroid, Vec2::new(90.0, 90.0), 1.0);
        let near = spawn(&mut reg, ObjectKind::Asteroid, Vec2::new(50.0, 0.0), 1.0);

        assert!(reg
            .query_area(Vec2::splat(-100.0), Vec2::splat(100.0))
            .contains(&corner));

        let hits = all_within(&reg, origin, 100.0);
        assert_eq!(hits, vec![near]);
    }

    #[test]
    fn candidate_radius_extends_reach() {
        let mut reg = registry();
        let origin = spawn(&mut reg, ObjectKind::Ship, Vec2::ZERO, 1.0);
        let station = spawn(&mut reg, ObjectKind::Station, Vec2::new(150.0, 0.0), 60.0);
        assert_eq!(all_within(&reg, origin, 100.0), vec![station]);
    }

    #[test]
    fn exact_touch_is_not_overlap() {
        let mut reg = registry();
        let origin = spawn(&mut reg, ObjectKind::Ship, Vec2::ZERO, 1.0);
        spawn(&mut reg, ObjectKind::Asteroid, Vec2::new(110.0, 0.0), 10.0);
        assert!(all_within(&reg, origin, 100.0).is_empty());
    }

    #[test]
    fn never_returns_origin() {
        let mut reg = registry();
        let origin = spawn(&mut reg, ObjectKind::Ship, Vec2::ZERO, 50.0);
        let other = spawn(&mut reg, ObjectKind::Ship, Vec2::ZERO, 50.0);
        assert_eq!(all_within(&reg, origin, 10.0), vec![other]);
        assert!(!query_circle(&reg, Vec2::ZERO, 10.0, ObjectFilter::Any, Some(origin))
            .contains(&origin));
    }

    #[test]
    fn kind_filter() {
        let mut reg = registry();
        let origin = spawn(&mut reg, ObjectKind::Ship, Vec2::ZERO, 1.0);
        let rock = spawn(&mut reg, ObjectKind::Asteroid, Vec2::new(10.0, 0.0), 1.0);
        spawn(&mut reg, ObjectKind::Mine, Vec2::new(-10.0, 0.0), 1.0);

        let rocks = query_circle(
            &reg,
            Vec2::ZERO,
            50.0,
            ObjectFilter::Kind(ObjectKind::Asteroid),
            Some(origin),
        );
        assert_eq!(rocks, vec![rock]);
    }

    #[test]
    fn damageable_filter_requires_hull() {
        let mut reg = registry();
        let armored = reg.register(
            ObjectSpec::new(ObjectKind::Ship, 5.0).hull(50.0),
            1.0,
        );
        spawn(&mut reg, ObjectKind::Other, Vec2::new(1.0, 0.0), 5.0);
        let hits = query_circle(&reg, Vec2::ZERO, 20.0, ObjectFilter::Damageable, None);
        assert_eq!(hits, vec![armored]);
    }

    #[test]
    fn invalid_radius_yields_nothing() {
        let mut reg = registry();
        spawn(&mut reg, ObjectKind::Ship, Vec2::ZERO, 5.0);
        assert!(query_circle(&reg, Vec2::ZERO, -1.0, ObjectFilter::Any, None).is_empty());
        assert!(query_circle(&reg, Vec2::ZERO, f32::NAN, ObjectFilter::Any, None).is_empty());
    }

    #[test]
    fn enemy_detection_uses_own_row() {
        let mut factions = FactionTable::new();
        let navy = factions.add_faction("Navy", "");
        let raiders = factions.add_faction("Raiders", "");
        factions.set_relation(raiders, navy, Relation::Enemy);

        let mut reg = registry();
        let patrol = reg.register(
            ObjectSpec::new(ObjectKind::Ship, 10.0).faction(navy),
            1.0,
        );
        let raider = reg.register(
            ObjectSpec::new(ObjectKind::Ship, 10.0)
                .faction(raiders)
                .at(Vec2::new(200.0, 0.0)),
            1.0,
        );

        assert!(any_enemy_within(&reg, &factions, raider, 500.0));
        assert!(!any_enemy_within(&reg, &factions, patrol, 500.0));
        assert!(!any_enemy_within(&reg, &factions, raider, 100.0));

        assert_eq!(enemies_within(&reg, &factions, raider, 500.0), vec![patrol]);
        assert!(enemies_within(&reg, &factions, patrol, 500.0).is_empty());
    }

    #[test]
    fn self_hostile_faction_sees_members_as_enemies() {
        let mut factions = FactionTable::new();
        factions.set_relation(FactionId::NEUTRAL, FactionId::NEUTRAL, Relation::Enemy);
        let mut reg = registry();
        let a = spawn(&mut reg, ObjectKind::Ship, Vec2::ZERO, 1.0);
        spawn(&mut reg, ObjectKind::Ship, Vec2::new(5.0, 0.0), 1.0);
        assert!(any_enemy_within(&reg, &factions, a, 50.0));
    }
}
