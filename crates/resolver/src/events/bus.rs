use log::trace;
use tokio::sync::broadcast;

use super::{ResolverEvent, ResolverEventSink};

/// Broadcast bus that fans resolver events out to any number of subscribers.
///
/// Publishing never waits: subscribers that fall more than `capacity` events
/// behind lose the oldest ones and observe a `Lagged` error on their next
/// receive.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ResolverEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ResolverEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ResolverEvent) {
        // No subscribers is not an error.
        if let Err(broadcast::error::SendError(event)) = self.sender.send(event) {
            trace!("No subscribers for {}", event.name());
        }
    }
}

impl ResolverEventSink for EventBus {
    fn emit(&self, event: ResolverEvent) {
        self.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let bus = EventBus::new(8);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.sender.receiver_count(), 2);

        bus.emit(ResolverEvent::cache_hit("a.eth"));

        assert_eq!(first.recv().await.unwrap(), ResolverEvent::cache_hit("a.eth"));
        assert_eq!(second.recv().await.unwrap(), ResolverEvent::cache_hit("a.eth"));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(8);
        bus.publish(ResolverEvent::cache_cleared(0));
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags_instead_of_blocking() {
        let bus = EventBus::new(2);
        let mut slow = bus.subscribe();

        for i in 0..5 {
            bus.publish(ResolverEvent::cache_cleared(i));
        }

        assert!(matches!(
            slow.recv().await,
            Err(broadcast::error::RecvError::Lagged(3))
        ));
        assert_eq!(slow.recv().await.unwrap(), ResolverEvent::cache_cleared(3));
    }
}
