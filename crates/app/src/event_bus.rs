//! In-process response bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use devicehub_domain::command::CommandResponse;
use devicehub_domain::error::HubError;

use crate::ports::ResponsePublisher;

/// In-process response bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the response is simply dropped).
pub struct InProcessBus {
    sender: broadcast::Sender<CommandResponse>,
}

impl InProcessBus {
    /// Create a new bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to responses on this bus.
    ///
    /// Returns a receiver that will get all responses published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CommandResponse> {
        self.sender.subscribe()
    }
}

impl ResponsePublisher for InProcessBus {
    fn publish(
        &self,
        response: CommandResponse,
    ) -> impl Future<Output = Result<(), HubError>> + Send {
        // send only fails when nobody is listening
        let _ = self.sender.send(response);
        async { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devicehub_domain::id::{CorrelationId, DeviceId};

    fn response(correlation_id: &str) -> CommandResponse {
        CommandResponse {
            correlation_id: CorrelationId::new(correlation_id),
            device_type: "lights".to_string(),
            device_id: DeviceId::new("kitchen-lights"),
            success: true,
            message: "Kitchen Lights turned on".to_string(),
            timestamp: 0,
        }
    }

    #[tokio::test]
    async fn should_deliver_response_to_subscriber() {
        let bus = InProcessBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(response("req-1")).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.correlation_id.as_str(), "req-1");
    }

    #[tokio::test]
    async fn should_deliver_response_to_multiple_subscribers() {
        let bus = InProcessBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(response("req-2")).await.unwrap();

        assert_eq!(rx1.recv().await.unwrap().correlation_id.as_str(), "req-2");
        assert_eq!(rx2.recv().await.unwrap().correlation_id.as_str(), "req-2");
    }

    #[tokio::test]
    async fn should_succeed_when_no_subscribers() {
        let bus = InProcessBus::new(16);
        assert!(bus.publish(response("req-3")).await.is_ok());
    }

    #[tokio::test]
    async fn should_not_deliver_responses_published_before_subscription() {
        let bus = InProcessBus::new(16);
        bus.publish(response("early")).await.unwrap();

        let mut rx = bus.subscribe();
        bus.publish(response("late")).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().correlation_id.as_str(), "late");
    }
}
