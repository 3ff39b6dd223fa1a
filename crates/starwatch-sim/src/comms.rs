//! Hail arbitration for player ship comms sessions.
//!
//! Every player ship carries one [`CommsSession`]. Any live object may hail
//! a player ship; whether the hail lands depends only on the session's
//! current state and counterpart. The hailing side is never told whether
//! the crew later accepted or refused.

use hecs::Entity;

use starwatch_core::enums::CommsState;
use starwatch_core::events::SimEvent;

use crate::components::CommsSession;
use crate::registry::{object_id, Registry};

/// Hail `target` from `source`, leaving `message` for the crew to read once
/// they answer.
///
/// Returns false when the target is not a player ship or its session is
/// busy with someone else.
pub fn hail(
    registry: &mut Registry,
    source: Entity,
    target: Entity,
    message: &str,
    events: &mut Vec<SimEvent>,
) -> bool {
    if !registry.contains(source) {
        return false;
    }
    let Some(session) = registry.get::<CommsSession>(target) else {
        tracing::debug!(
            target: "starwatch::comms",
            source = %object_id(source),
            target = %object_id(target),
            "hail.no_receiver"
        );
        return false;
    };

    let accepted = match session.state {
        CommsState::OpeningChannel | CommsState::BeingHailed => session.target == Some(source),
        CommsState::BeingHailedByGM
        | CommsState::ChannelOpen
        | CommsState::ChannelOpenPlayer
        | CommsState::ChannelOpenGM => false,
        CommsState::Inactive | CommsState::ChannelFailed | CommsState::ChannelBroken => true,
    };
    if !accepted {
        tracing::debug!(
            target: "starwatch::comms",
            source = %object_id(source),
            target = %object_id(target),
            state = ?session.state,
            "hail.rejected"
        );
        return false;
    }

    let name = registry.call_sign(source).unwrap_or_default();
    let Ok(session) = registry
        .world_mut()
        .query_one_mut::<&mut CommsSession>(target)
    else {
        return false;
    };
    session.state = CommsState::BeingHailed;
    session.target = Some(source);
    session.target_name = name;
    session.incoming_message = message.to_owned();

    tracing::debug!(
        target: "starwatch::comms",
        source = %object_id(source),
        target = %object_id(target),
        "hail.accepted"
    );
    events.push(SimEvent::Hailed {
        source: object_id(source),
        target: object_id(target),
        message: message.to_owned(),
    });
    true
}

/// Hail without a message.
pub fn open_comms_to(
    registry: &mut Registry,
    source: Entity,
    target: Entity,
    events: &mut Vec<SimEvent>,
) -> bool {
    hail(registry, source, target, "", events)
}

pub fn session(registry: &Registry, ship: Entity) -> Option<CommsSession> {
    registry.get::<CommsSession>(ship)
}

/// Move a player ship's session to `state` on behalf of the crew-facing
/// layer (answering, refusing, closing a channel).
///
/// Returning to `Inactive` forgets the counterpart and any pending message.
pub fn set_state(
    registry: &mut Registry,
    ship: Entity,
    state: CommsState,
    events: &mut Vec<SimEvent>,
) -> bool {
    let Ok(session) = registry.world_mut().query_one_mut::<&mut CommsSession>(ship) else {
        return false;
    };
    session.state = state;
    if state == CommsState::Inactive {
        session.target = None;
        session.target_name.clear();
        session.incoming_message.clear();
    }
    events.push(SimEvent::CommsChanged {
        ship: object_id(ship),
        state,
    });
    true
}

/// Break every pending or open session whose counterpart is `gone`.
/// Runs from the destruction hook while `gone` is still registered.
pub(crate) fn release_counterpart(
    registry: &mut Registry,
    gone: Entity,
    events: &mut Vec<SimEvent>,
) {
    let mut broken = Vec::new();
    for (ship, session) in registry.world_mut().query_mut::<&mut CommsSession>() {
        if session.target != Some(gone) {
            continue;
        }
        if session.state.is_pending() || session.state == CommsState::ChannelOpen {
            session.state = CommsState::ChannelBroken;
            session.target = None;
            broken.push(ship);
        }
    }
    broken.sort_unstable_by_key(|ship| ship.to_bits());
    for ship in broken {
        tracing::debug!(
            target: "starwatch::comms",
            ship = %object_id(ship),
            counterpart = %object_id(gone),
            "session.broken"
        );
        events.push(SimEvent::CommsChanged {
            ship: object_id(ship),
            state: CommsState::ChannelBroken,
        });
    }
}
