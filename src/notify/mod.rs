pub mod messages;

use thiserror::Error;
use tokio::sync::broadcast;

pub use messages::GameEvent;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("no subscribers for game {0}")]
    NoSubscribers(uuid::Uuid),
}

/// Best-effort push of state changes. Called only after a commit has been
/// saved; a failure here never undoes the move.
pub trait NotificationSink: Send + Sync {
    fn publish(&self, event: &GameEvent) -> Result<(), NotifyError>;
}

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn publish(&self, _event: &GameEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Fans events out to any number of in-process subscribers
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    tx: broadcast::Sender<GameEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.tx.subscribe()
    }
}

impl NotificationSink for BroadcastSink {
    fn publish(&self, event: &GameEvent) -> Result<(), NotifyError> {
        self.tx
            .send(event.clone())
            .map(|_| ())
            .map_err(|_| NotifyError::NoSubscribers(event.game_id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn event() -> GameEvent {
        GameEvent::TurnPassed {
            game_id: Uuid::new_v4(),
            player_id: 1,
            next_player: 2,
        }
    }

    #[tokio::test]
    async fn test_broadcast_reaches_subscriber() {
        let sink = BroadcastSink::new(8);
        let mut rx = sink.subscribe();
        let sent = event();
        sink.publish(&sent).unwrap();
        assert_eq!(rx.recv().await.unwrap(), sent);
    }

    #[test]
    fn test_broadcast_without_subscribers_fails() {
        let sink = BroadcastSink::new(8);
        assert!(matches!(sink.publish(&event()), Err(NotifyError::NoSubscribers(_))));
    }
}
