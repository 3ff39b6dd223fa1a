use glam::Vec2;

use starwatch_sim::core::enums::{CommsState, DamageType, ObjectKind};
use starwatch_sim::core::events::SimEvent;
use starwatch_sim::core::types::{BlastParams, DamageInfo};
use starwatch_sim::templates::{self, Archetype};
use starwatch_sim::{FactionConfig, ReplicationFrame, SimConfig, Simulation};

const FACTIONS: &str = r#"{
    "factions": [
        { "name": "Independent" },
        { "name": "Navy", "enemies": ["Raiders"], "friends": ["Independent"] },
        { "name": "Raiders", "enemies": ["Navy", "Independent"] }
    ]
}"#;

fn scenario() -> Simulation {
    let factions = FactionConfig::from_json_str(FACTIONS).unwrap();
    Simulation::with_faction_config(SimConfig::default(), &factions).unwrap()
}

// --- Setup ---

#[test]
fn config_with_unknown_reference_is_rejected() {
    let factions =
        FactionConfig::from_json_str(r#"{ "factions": [{ "name": "A", "enemies": ["B"] }] }"#)
            .unwrap();
    assert!(Simulation::with_faction_config(SimConfig::default(), &factions).is_err());
}

#[test]
fn sim_config_partial_json_uses_defaults() {
    let config = SimConfig::from_json_str(r#"{ "sector_size": 5000.0 }"#).unwrap();
    assert_eq!(config.sector_size, 5_000.0);
    assert_eq!(config.grid_cell_size, SimConfig::default().grid_cell_size);
}

// --- Full flow ---

#[test]
fn raider_trips_mine_near_outpost() {
    let mut sim = scenario();

    let outpost = sim.spawn(
        templates::spec(Archetype::Station)
            .at(Vec2::new(0.0, 0.0))
            .call_sign("Outpost 7"),
    );
    let player = sim.spawn(templates::spec(Archetype::PlayerShip).at(Vec2::new(3_000.0, 0.0)));
    let mine = sim.spawn(templates::spec(Archetype::Mine).at(Vec2::new(1_500.0, 1_500.0)));
    let raider = sim.spawn(templates::spec(Archetype::Ship).at(Vec2::new(1_600.0, 1_500.0)));

    sim.object(outpost).unwrap().set_faction("Navy");
    sim.object(player).unwrap().set_faction("Navy");
    sim.object(raider).unwrap().set_faction("Raiders");
    sim.tick();

    // The outpost sees the raider and calls for help.
    assert!(sim.object(outpost).unwrap().are_enemies_in_range(2_500.0));
    assert!(sim
        .object(outpost)
        .unwrap()
        .send_comms_message(player, "Hostile contact near the minefield."));
    assert_eq!(sim.comms_session(player).unwrap().state, CommsState::BeingHailed);

    // The raider blunders into the mine.
    assert!(sim.destroy(mine));
    assert!(!sim.registry().contains(raider), "full-damage core wipes a frigate");
    assert!(sim.registry().contains(outpost));
    assert!(sim.registry().contains(player));

    let out = sim.tick();
    let raider_hit = out.events.iter().any(|e| {
        matches!(
            e,
            SimEvent::Damaged {
                kind: DamageType::Kinetic,
                instigator: Some(_),
                ..
            }
        )
    });
    assert!(raider_hit);
    assert_eq!(out.replication.removed.len(), 2);

    // Frames survive the wire.
    let json = serde_json::to_string(&out.replication).unwrap();
    let back: ReplicationFrame = serde_json::from_str(&json).unwrap();
    assert_eq!(back, out.replication);
}

#[test]
fn player_accepts_then_station_is_lost() {
    let mut sim = scenario();
    let station = sim.spawn(templates::spec(Archetype::Station));
    let player = sim.spawn(templates::spec(Archetype::PlayerShip).at(Vec2::new(5_000.0, 0.0)));

    assert!(sim.object(station).unwrap().open_comms_to(player));
    sim.set_comms_state(player, CommsState::ChannelOpen);

    let report = sim.damage_area(
        Vec2::ZERO,
        BlastParams::new(500.0, 2_000.0, 2_000.0),
        DamageInfo::new(DamageType::Energy),
    );
    assert_eq!(report.destroyed().collect::<Vec<_>>(), vec![station]);
    assert_eq!(
        sim.comms_session(player).unwrap().state,
        CommsState::ChannelBroken
    );

    let events = sim.tick().events;
    assert!(events.contains(&SimEvent::CommsChanged {
        ship: starwatch_sim::registry::object_id(player),
        state: CommsState::ChannelBroken,
    }));
}

#[test]
fn reputation_spent_on_supplies() {
    let mut sim = scenario();
    let player = sim.spawn(templates::spec(Archetype::PlayerShip));
    let mut ship = sim.object(player).unwrap();
    ship.set_faction("Navy");
    ship.add_reputation_points(40.0);

    assert!(!ship.take_reputation_points(50.0));
    assert!(ship.take_reputation_points(15.0));
    assert_eq!(ship.reputation_points(), 25.0);

    let navy = sim.factions().id_by_name("Navy").unwrap();
    assert_eq!(sim.reputation().get(navy), 25.0);
}

#[test]
fn objects_in_range_sorted_and_exclusive() {
    let mut sim = scenario();
    let observer = sim.spawn(starwatch_sim::ObjectSpec::new(ObjectKind::Other, 1.0));
    let mut expected: Vec<_> = (1..=5)
        .map(|i| {
            sim.spawn(templates::spec(Archetype::Asteroid).at(Vec2::new(i as f32 * 400.0, 0.0)))
        })
        .collect();
    expected.sort_unstable_by_key(|e| e.to_bits());

    let found = sim.object(observer).unwrap().objects_in_range(5_000.0);
    assert_eq!(found, expected);
    assert!(!found.contains(&observer));
}
