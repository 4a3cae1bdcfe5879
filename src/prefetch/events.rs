//! Prefetch event bus.
//!
//! Publishes a `Started` and an `Ended` event for every prefetch attempt
//! that claims a key, so passive indicators can follow background work.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

/// Lifecycle notifications of a prefetch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrefetchEvent {
    /// A prefetch request is about to be sent.
    Started { term: String, key: String },
    /// The attempt finished, successfully or not.
    Ended {
        term: String,
        key: String,
        success: bool,
    },
}

/// Fan-out of [`PrefetchEvent`]s to the stats reporter and any other
/// observer of background work.
///
/// Observers that subscribe late miss earlier events; one that falls more
/// than the capacity behind sees `RecvError::Lagged` and resumes from the
/// oldest retained event.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PrefetchEvent>,
}

impl EventBus {
    /// Creates a bus retaining up to `capacity` unread events per observer.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Announces a prefetch lifecycle change. Prefetching does not depend
    /// on anyone listening, so an unobserved event is discarded.
    pub fn publish(&self, event: PrefetchEvent) {
        if self.tx.send(event).is_err() {
            trace!("prefetch event discarded, no observers");
        }
    }

    /// Starts observing events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PrefetchEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_observer() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(PrefetchEvent::Started {
            term: "coffee".into(),
            key: "search_coffee_1.000_2.000".into(),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            PrefetchEvent::Started {
                term: "coffee".into(),
                key: "search_coffee_1.000_2.000".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_late_observer_misses_earlier_events() {
        let bus = EventBus::new(4);
        bus.publish(PrefetchEvent::Started {
            term: "pizza".into(),
            key: "k".into(),
        });

        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());

        bus.publish(PrefetchEvent::Ended {
            term: "pizza".into(),
            key: "k".into(),
            success: false,
        });
        assert!(matches!(
            rx.recv().await.unwrap(),
            PrefetchEvent::Ended { success: false, .. }
        ));
    }

    #[test]
    fn test_event_serialization() {
        let event = PrefetchEvent::Ended {
            term: "pizza".into(),
            key: "k".into(),
            success: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ended");
        assert_eq!(json["success"], true);
    }
}
