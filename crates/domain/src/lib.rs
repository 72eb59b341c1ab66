mod event;
mod reminder_key;
mod shared;

pub use event::{ArchivedEvent, CalendarEvent, PendingEvent};
pub use reminder_key::{InvalidKeyStrategyError, KeyStrategy, ReminderKey};
pub use shared::entity::{Entity, ID};
