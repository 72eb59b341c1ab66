use reminder_service_domain::PendingEvent;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("The event feed is full")]
    Full(PendingEvent),
    #[error("The event feed is closed")]
    Closed(PendingEvent),
}

/// Handle producers use to hand newly created or updated events
/// to the `ReminderScheduler`
#[derive(Debug, Clone)]
pub struct EventFeed {
    sender: mpsc::Sender<PendingEvent>,
}

impl EventFeed {
    /// Creates a feed holding at most `capacity` events that have not been
    /// ingested yet
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<PendingEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Waits for a free slot if the feed is full
    pub async fn push(&self, event: PendingEvent) -> Result<(), FeedError> {
        self.sender
            .send(event)
            .await
            .map_err(|e| FeedError::Closed(e.0))
    }

    pub fn try_push(&self, event: PendingEvent) -> Result<(), FeedError> {
        self.sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(event) => FeedError::Full(event),
            TrySendError::Closed(event) => FeedError::Closed(event),
        })
    }
}
