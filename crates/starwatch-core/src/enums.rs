//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Broad category of a space object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// AI-controlled ship.
    Ship,
    /// Ship crewed by players. Owns a comms session.
    PlayerShip,
    Station,
    Asteroid,
    Mine,
    /// Anything else that can be seen in space (beacons, artifacts, ...).
    #[default]
    Other,
}

impl ObjectKind {
    /// Prefix of the derived call sign for objects without an explicit one.
    pub fn call_sign_prefix(self) -> &'static str {
        match self {
            ObjectKind::Ship => "S",
            ObjectKind::PlayerShip => "PL",
            ObjectKind::Station => "DS",
            ObjectKind::Asteroid => "AST",
            ObjectKind::Mine => "MN",
            ObjectKind::Other => "OBJ",
        }
    }

    pub fn is_player_ship(self) -> bool {
        matches!(self, ObjectKind::PlayerShip)
    }
}

/// How one faction regards another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    Enemy,
    Friendly,
    #[default]
    Neutral,
}

/// Kind of damage carried by a hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    Energy,
    Kinetic,
    /// Drains shields, never touches the hull.
    Emp,
    #[default]
    Unspecified,
}

impl DamageType {
    /// Parse a script token, ignoring case. Unknown tokens are `Unspecified`.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "energy" => DamageType::Energy,
            "kinetic" => DamageType::Kinetic,
            "emp" => DamageType::Emp,
            _ => DamageType::Unspecified,
        }
    }
}

/// State of a player ship's comms session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommsState {
    #[default]
    Inactive,
    /// Player is hailing someone.
    OpeningChannel,
    /// An object is hailing the player.
    BeingHailed,
    /// The game master is hailing the player.
    BeingHailedByGM,
    ChannelOpen,
    /// Open channel with another player ship.
    ChannelOpenPlayer,
    ChannelOpenGM,
    /// The hailed party refused or never answered.
    ChannelFailed,
    /// The counterpart disappeared while the channel was up.
    ChannelBroken,
}

impl CommsState {
    /// A hail is pending in one direction or the other.
    pub fn is_pending(self) -> bool {
        matches!(self, CommsState::OpeningChannel | CommsState::BeingHailed)
    }

    /// A channel is open or reserved by the game master.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            CommsState::BeingHailedByGM
                | CommsState::ChannelOpen
                | CommsState::ChannelOpenPlayer
                | CommsState::ChannelOpenGM
        )
    }

    /// No channel is pending or open.
    pub fn is_idle(self) -> bool {
        matches!(
            self,
            CommsState::Inactive | CommsState::ChannelFailed | CommsState::ChannelBroken
        )
    }
}
