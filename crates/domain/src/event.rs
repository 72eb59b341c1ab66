use crate::{
    reminder_key::{KeyStrategy, ReminderKey},
    shared::entity::{Entity, ID},
};
use serde::{Deserialize, Serialize};

/// A `CalendarEvent` as it is stored in the durable store
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub id: ID,
    pub user_id: i64,
    /// Free text describing the event
    pub description: String,
    /// Timestamp in millis at which the event takes place
    pub occurs_at: i64,
    /// Where the reminder for this event should be delivered, e.g. a mail address
    pub destination: String,
    pub created: i64,
}

impl Entity for CalendarEvent {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// A `CalendarEvent` waiting in memory for its reminder to be sent.
/// This is also the payload handed to the notification sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingEvent {
    pub event_id: ID,
    pub user_id: i64,
    pub description: String,
    pub occurs_at: i64,
    pub destination: String,
    pub created: i64,
}

impl PendingEvent {
    pub fn key(&self, strategy: KeyStrategy) -> ReminderKey {
        strategy.key(self.event_id, &self.destination, &self.description)
    }

    /// Whether the event takes place within `[now, now + horizon]`
    pub fn is_due(&self, now: i64, horizon: i64) -> bool {
        self.occurs_at >= now && self.occurs_at <= now.saturating_add(horizon)
    }
}

impl From<&CalendarEvent> for PendingEvent {
    fn from(e: &CalendarEvent) -> Self {
        Self {
            event_id: e.id,
            user_id: e.user_id,
            description: e.description.clone(),
            occurs_at: e.occurs_at,
            destination: e.destination.clone(),
            created: e.created,
        }
    }
}

/// A `CalendarEvent` that has been moved out of the durable store after it
/// took place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedEvent {
    /// Id the event had in the durable store
    pub event_id: ID,
    pub user_id: i64,
    pub description: String,
    pub occurs_at: i64,
    pub destination: String,
    /// Creation timestamp of the original record
    pub created: i64,
    pub archived_at: i64,
}

impl ArchivedEvent {
    pub fn new(e: &CalendarEvent, archived_at: i64) -> Self {
        Self {
            event_id: e.id,
            user_id: e.user_id,
            description: e.description.clone(),
            occurs_at: e.occurs_at,
            destination: e.destination.clone(),
            created: e.created,
            archived_at,
        }
    }

    pub fn key(&self, strategy: KeyStrategy) -> ReminderKey {
        strategy.key(self.event_id, &self.destination, &self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_event(occurs_at: i64) -> PendingEvent {
        PendingEvent {
            event_id: ID::new(1),
            user_id: 10,
            description: "Dentist".into(),
            occurs_at,
            destination: "user@example.com".into(),
            created: 0,
        }
    }

    #[test]
    fn due_window_is_inclusive() {
        let now = 1000;
        let horizon = 500;
        assert!(pending_event(1000).is_due(now, horizon));
        assert!(pending_event(1200).is_due(now, horizon));
        assert!(pending_event(1500).is_due(now, horizon));
        assert!(!pending_event(999).is_due(now, horizon));
        assert!(!pending_event(1501).is_due(now, horizon));
    }

    #[test]
    fn due_window_does_not_overflow() {
        assert!(pending_event(i64::MAX).is_due(i64::MAX - 1, i64::MAX));
    }

    #[test]
    fn serializes_pending_event_as_json() {
        let event = pending_event(1500);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_id"], 1);
        assert_eq!(json["destination"], "user@example.com");
        assert_eq!(json["description"], "Dentist");
        let back: PendingEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn archived_event_keeps_original_identity() {
        let e = CalendarEvent {
            id: ID::new(5),
            user_id: 3,
            description: "Review".into(),
            occurs_at: 100,
            destination: "x@y.z".into(),
            created: 50,
        };
        let archived = ArchivedEvent::new(&e, 200);
        assert_eq!(archived.event_id, e.id);
        assert_eq!(archived.created, 50);
        assert_eq!(archived.archived_at, 200);
        assert_eq!(
            archived.key(KeyStrategy::EventId),
            PendingEvent::from(&e).key(KeyStrategy::EventId)
        );
    }
}
