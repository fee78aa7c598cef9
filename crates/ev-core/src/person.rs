//! Passenger classification and lifecycle state.
//!
//! The `Person` entity itself lives in `ev-traffic`; these two enums are
//! shared vocabulary — calls carry the type, events carry the lifecycle
//! state, and the metrics aggregator breaks results down by type.

/// Passenger population segment.  Each type has its own arrival-rate curve,
/// destination range, and planned-stay range (defined in `ev-traffic`).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum PersonType {
    Resident,
    OfficeWorker,
    Shopper,
}

impl PersonType {
    /// All types in their canonical iteration order.  Arrival generation
    /// walks this array every tick; the fixed order is part of the
    /// determinism contract.
    pub const ALL: [PersonType; 3] = [
        PersonType::Resident,
        PersonType::OfficeWorker,
        PersonType::Shopper,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PersonType::Resident     => "Resident",
            PersonType::OfficeWorker => "OfficeWorker",
            PersonType::Shopper      => "Shopper",
        }
    }
}

impl std::fmt::Display for PersonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a person.
///
/// Transitions only move forward through
/// `NotSpawned → Waiting → Riding → (Staying → Waiting → Riding)* → Completed`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum PersonState {
    NotSpawned,
    Waiting,
    Riding,
    Staying,
    Completed,
}

impl PersonState {
    pub fn as_str(self) -> &'static str {
        match self {
            PersonState::NotSpawned => "NotSpawned",
            PersonState::Waiting    => "Waiting",
            PersonState::Riding     => "Riding",
            PersonState::Staying    => "Staying",
            PersonState::Completed  => "Completed",
        }
    }
}

impl std::fmt::Display for PersonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
