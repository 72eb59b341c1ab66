use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub trait Entity {
    fn id(&self) -> &ID;
}

/// Identifier assigned to an event by the durable store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ID(i64);

impl ID {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn inner(self) -> i64 {
        self.0
    }
}

impl From<i64> for ID {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Display for ID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
