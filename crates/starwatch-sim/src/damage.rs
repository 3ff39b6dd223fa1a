//! Damage application and the area damage resolver.
//!
//! Explosives destroyed by damage do not blast on the spot. Their blasts go
//! into a [`BlastQueue`] that the public entry points drain in order once the
//! current hit or pulse is complete, so a chain of any length resolves in
//! constant stack depth.

use std::collections::VecDeque;

use glam::Vec2;
use hecs::Entity;

use starwatch_core::enums::DamageType;
use starwatch_core::events::SimEvent;
use starwatch_core::types::{BlastParams, DamageInfo};

use crate::components::{Destroying, Hull, Shields};
use crate::lifecycle;
use crate::proximity::{self, ObjectFilter};
use crate::registry::{object_id, Registry};

/// What a single damage application did to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Nothing changed: no hull or shields, already dying, or zero damage.
    Ignored,
    /// Shields took all of it.
    Absorbed,
    /// Hull lost points but held.
    Damaged,
    /// Hull reached zero and the object was destroyed.
    Destroyed,
}

/// One object hit by an area pulse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageHit {
    pub id: Entity,
    /// Damage computed for this object from the falloff.
    pub amount: f32,
    pub outcome: DamageOutcome,
}

/// Result of one area pulse, in application order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageReport {
    pub hits: Vec<DamageHit>,
}

impl DamageReport {
    pub fn amount_for(&self, id: Entity) -> Option<f32> {
        self.hits.iter().find(|hit| hit.id == id).map(|hit| hit.amount)
    }

    pub fn destroyed(&self) -> impl Iterator<Item = Entity> + '_ {
        self.hits
            .iter()
            .filter(|hit| hit.outcome == DamageOutcome::Destroyed)
            .map(|hit| hit.id)
    }
}

/// A blast released by a destroyed explosive, waiting to be resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PendingBlast {
    pub epicenter: Vec2,
    pub blast: BlastParams,
    pub info: DamageInfo,
}

pub(crate) type BlastQueue = VecDeque<PendingBlast>;

/// Damage hook of a single object.
///
/// Shields soak damage first. EMP only ever drains shields. Whatever is left
/// comes off the hull, and an empty hull destroys the object. Blasts set off
/// by the destruction are resolved before returning.
pub fn apply_damage(
    registry: &mut Registry,
    target: Entity,
    amount: f32,
    info: DamageInfo,
    events: &mut Vec<SimEvent>,
) -> DamageOutcome {
    let mut queue = BlastQueue::new();
    let outcome = hit(registry, target, amount, info, events, &mut queue);
    resolve_chain(registry, &mut queue, events);
    outcome
}

fn hit(
    registry: &mut Registry,
    target: Entity,
    amount: f32,
    info: DamageInfo,
    events: &mut Vec<SimEvent>,
    queue: &mut BlastQueue,
) -> DamageOutcome {
    if !(amount.is_finite() && amount > 0.0) || registry.has::<Destroying>(target) {
        return DamageOutcome::Ignored;
    }

    let Ok((hull, shields)) = registry
        .world_mut()
        .query_one_mut::<(Option<&mut Hull>, Option<&mut Shields>)>(target)
    else {
        return DamageOutcome::Ignored;
    };

    let mut remaining = amount;
    let mut shield_loss = 0.0;
    if let Some(shields) = shields {
        shield_loss = remaining.min(shields.current.max(0.0));
        shields.current -= shield_loss;
        remaining -= shield_loss;
    }
    if info.kind == DamageType::Emp {
        remaining = 0.0;
    }

    let mut hull_loss = 0.0;
    let mut hull_empty = false;
    if let Some(hull) = hull {
        if remaining > 0.0 {
            hull.current -= remaining;
            hull_loss = remaining;
            hull_empty = hull.current <= 0.0;
        }
    }

    let outcome = if hull_empty {
        DamageOutcome::Destroyed
    } else if hull_loss > 0.0 {
        DamageOutcome::Damaged
    } else if shield_loss > 0.0 {
        DamageOutcome::Absorbed
    } else {
        return DamageOutcome::Ignored;
    };

    events.push(SimEvent::Damaged {
        id: object_id(target),
        amount: shield_loss + hull_loss,
        kind: info.kind,
        instigator: info.instigator,
    });

    if outcome == DamageOutcome::Destroyed {
        lifecycle::destroy_deferred(registry, target, events, queue);
    }
    outcome
}

/// Resolve one area-effect pulse centred on `epicenter`.
///
/// Every object within `blast.blast_range` is considered regardless of
/// faction. Damage is measured to the object's surface. The hit set is fixed
/// before any damage is applied and no object is hit twice by one pulse.
///
/// Explosives destroyed by the pulse blast afterwards, in the order they
/// were destroyed. The report lists only this pulse's hits; chained blasts
/// show up as events.
pub fn damage_area(
    registry: &mut Registry,
    epicenter: Vec2,
    blast: BlastParams,
    info: DamageInfo,
    events: &mut Vec<SimEvent>,
) -> DamageReport {
    let mut queue = BlastQueue::new();
    let report = pulse(registry, epicenter, blast, info, events, &mut queue);
    resolve_chain(registry, &mut queue, events);
    report
}

/// Resolve queued blasts, and every blast they set off, until none remain.
pub(crate) fn resolve_chain(
    registry: &mut Registry,
    queue: &mut BlastQueue,
    events: &mut Vec<SimEvent>,
) {
    let mut resolved = 0usize;
    while let Some(next) = queue.pop_front() {
        pulse(registry, next.epicenter, next.blast, next.info, events, queue);
        resolved += 1;
    }
    if resolved > 0 {
        tracing::debug!(target: "starwatch::damage", blasts = resolved, "chain.resolved");
    }
}

fn pulse(
    registry: &mut Registry,
    epicenter: Vec2,
    blast: BlastParams,
    info: DamageInfo,
    events: &mut Vec<SimEvent>,
    queue: &mut BlastQueue,
) -> DamageReport {
    let candidates = proximity::query_circle(
        registry,
        epicenter,
        blast.blast_range,
        ObjectFilter::Any,
        None,
    );

    let mut report = DamageReport::default();
    for id in candidates {
        if !registry.contains(id) || registry.has::<Destroying>(id) {
            continue;
        }
        let (Some(position), Some(radius)) = (registry.position(id), registry.radius(id)) else {
            continue;
        };
        let Some(amount) = blast.damage_at(epicenter.distance(position) - radius) else {
            continue;
        };
        let outcome = hit(registry, id, amount, info, events, queue);
        report.hits.push(DamageHit {
            id,
            amount,
            outcome,
        });
    }

    tracing::debug!(
        target: "starwatch::damage",
        x = epicenter.x,
        y = epicenter.y,
        blast_range = blast.blast_range,
        hits = report.hits.len(),
        "area_damage.resolved"
    );
    report
}
