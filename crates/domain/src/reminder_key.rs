use crate::shared::entity::ID;
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Address of an entry in a keyed store of events
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReminderKey {
    /// The durable identifier of the event
    Event(ID),
    /// `"{destination}-{description}"`. Two distinct events sharing both
    /// values map to the same key and the later one replaces the earlier one.
    DestinationDescription(String),
}

impl Display for ReminderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Event(id) => write!(f, "event:{}", id),
            Self::DestinationDescription(key) => write!(f, "{}", key),
        }
    }
}

/// How the identity key of an event is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Key by the durable record id. Distinct events never collide.
    EventId,
    /// Key by destination and description text, overwriting on collision.
    DestinationAndDescription,
}

impl KeyStrategy {
    pub fn key(&self, event_id: ID, destination: &str, description: &str) -> ReminderKey {
        match self {
            Self::EventId => ReminderKey::Event(event_id),
            Self::DestinationAndDescription => {
                ReminderKey::DestinationDescription(format!("{}-{}", destination, description))
            }
        }
    }
}

impl Display for KeyStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventId => write!(f, "event_id"),
            Self::DestinationAndDescription => write!(f, "destination_description"),
        }
    }
}

impl Default for KeyStrategy {
    fn default() -> Self {
        Self::EventId
    }
}

#[derive(Error, Debug)]
#[error("Unknown key strategy: `{0}`. Expected `event_id` or `destination_description`")]
pub struct InvalidKeyStrategyError(String);

impl FromStr for KeyStrategy {
    type Err = InvalidKeyStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "event_id" => Ok(Self::EventId),
            "destination_description" => Ok(Self::DestinationAndDescription),
            _ => Err(InvalidKeyStrategyError(s.to_string())),
        }
    }
}
