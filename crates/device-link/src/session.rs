//! One-shot publish session state machine.
//!
//! A session owns its connection exclusively: it connects, publishes a single
//! payload at QoS 1, waits for the broker's acknowledgment, and tears the
//! connection down. The state machine settles exactly once, so an ack that
//! arrives after the deadline has already fired is never surfaced, and the
//! link is closed in every outcome.

use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{AsyncClient, ConnectReturnCode, Event, EventLoop, Packet, QoS};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

use crate::error::DispatchError;

/// Events a publish session reacts to, in the order the link reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LinkEvent {
    /// Broker accepted the connection.
    Connected,
    /// Broker acknowledged our publish.
    PublishAcked,
    /// Connection closed before any acknowledgment.
    Closed,
    /// Connection reported an error.
    TransportError(String),
}

/// One transport connection scoped to a single dispatch call.
#[async_trait]
pub(crate) trait Link {
    /// Wait for the next session-relevant event.
    async fn next_event(&mut self) -> LinkEvent;

    /// Enqueue the payload for publication at QoS 1.
    async fn publish(&mut self, topic: &str, payload: Vec<u8>) -> Result<(), DispatchError>;

    /// Terminate the connection. Must be safe to call in any state.
    async fn close(&mut self);
}

/// Drive one publish session to completion within `budget`.
///
/// Resolution is one-shot: the loop breaks on the first terminal event and
/// nothing the link emits afterwards can change the outcome. The link is
/// closed before the outcome is returned, so no connection outlives the call.
pub(crate) async fn run_session<L: Link>(
    link: &mut L,
    topic: &str,
    payload: Vec<u8>,
    budget: Duration,
) -> Result<(), DispatchError> {
    let deadline = Instant::now() + budget;

    let outcome = loop {
        let event = match timeout_at(deadline, link.next_event()).await {
            Ok(event) => event,
            Err(_) => break Err(DispatchError::ConnectTimeout),
        };

        match event {
            LinkEvent::Connected => {
                debug!(topic = %topic, "Connected to MQTT broker, publishing");
                if let Err(e) = link.publish(topic, payload.clone()).await {
                    break Err(e);
                }
            }
            LinkEvent::PublishAcked => break Ok(()),
            LinkEvent::TransportError(reason) => break Err(DispatchError::Transport(reason)),
            LinkEvent::Closed => {
                break Err(DispatchError::Transport(
                    "connection closed before acknowledgment".to_string(),
                ))
            }
        }
    };

    link.close().await;
    outcome
}

/// Production link over a rumqttc client and its event loop.
pub(crate) struct MqttLink {
    client: AsyncClient,
    eventloop: EventLoop,
}

impl MqttLink {
    pub(crate) fn new(client: AsyncClient, eventloop: EventLoop) -> Self {
        Self { client, eventloop }
    }
}

#[async_trait]
impl Link for MqttLink {
    async fn next_event(&mut self) -> LinkEvent {
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    if ack.code == ConnectReturnCode::Success {
                        return LinkEvent::Connected;
                    }
                    return LinkEvent::TransportError(format!(
                        "broker refused connection: {:?}",
                        ack.code
                    ));
                }
                Ok(Event::Incoming(Packet::PubAck(_))) => return LinkEvent::PublishAcked,
                Ok(Event::Incoming(Packet::Disconnect)) => return LinkEvent::Closed,
                // Pings, outgoing packets and anything else are not
                // session-relevant.
                Ok(_) => continue,
                Err(e) => return LinkEvent::TransportError(e.to_string()),
            }
        }
    }

    async fn publish(&mut self, topic: &str, payload: Vec<u8>) -> Result<(), DispatchError> {
        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|e| DispatchError::Publish(e.to_string()))
    }

    async fn close(&mut self) {
        // Best-effort clean disconnect; dropping the event loop forces the
        // socket closed either way.
        if let Err(e) = self.client.disconnect().await {
            warn!("MQTT disconnect failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use tokio::time::sleep;

    /// A link that replays a script of (delay, event) pairs.
    struct ScriptedLink {
        script: VecDeque<(Duration, LinkEvent)>,
        published: Vec<(String, Vec<u8>)>,
        publish_result: Option<DispatchError>,
        closed: bool,
    }

    impl ScriptedLink {
        fn new(script: Vec<(Duration, LinkEvent)>) -> Self {
            Self {
                script: script.into(),
                published: Vec::new(),
                publish_result: None,
                closed: false,
            }
        }

        fn failing_publish(mut self, error: DispatchError) -> Self {
            self.publish_result = Some(error);
            self
        }
    }

    #[async_trait]
    impl Link for ScriptedLink {
        async fn next_event(&mut self) -> LinkEvent {
            match self.script.front() {
                // Sleep before popping so a cancelled wait leaves the event
                // unconsumed, as a real link would.
                Some((delay, _)) => {
                    sleep(*delay).await;
                    self.script.pop_front().expect("event still queued").1
                }
                // Script exhausted: hang like a dead connection would.
                None => {
                    sleep(Duration::from_secs(86_400)).await;
                    LinkEvent::Closed
                }
            }
        }

        async fn publish(&mut self, topic: &str, payload: Vec<u8>) -> Result<(), DispatchError> {
            if let Some(error) = self.publish_result.take() {
                return Err(error);
            }
            self.published.push((topic.to_string(), payload));
            Ok(())
        }

        async fn close(&mut self) {
            self.closed = true;
        }
    }

    const BUDGET: Duration = Duration::from_secs(30);

    #[tokio::test(start_paused = true)]
    async fn test_connect_publish_ack() {
        let mut link = ScriptedLink::new(vec![
            (Duration::from_millis(50), LinkEvent::Connected),
            (Duration::from_millis(20), LinkEvent::PublishAcked),
        ]);

        let result = run_session(&mut link, "t/1", b"hello".to_vec(), BUDGET).await;

        assert!(result.is_ok());
        assert_eq!(link.published.len(), 1);
        assert_eq!(link.published[0].0, "t/1");
        assert!(link.closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_ack_never_observed_after_timeout() {
        // The ack arrives 5s after the session budget has already expired.
        // Only the timeout may be observed; the ack must stay unconsumed.
        let mut link = ScriptedLink::new(vec![
            (Duration::from_secs(1), LinkEvent::Connected),
            (Duration::from_secs(34), LinkEvent::PublishAcked),
        ]);

        let result = run_session(&mut link, "t/1", b"hello".to_vec(), BUDGET).await;

        assert!(matches!(result, Err(DispatchError::ConnectTimeout)));
        assert_eq!(link.script.len(), 1, "late ack must remain unconsumed");
        assert!(link.closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_connection_times_out() {
        let mut link = ScriptedLink::new(vec![]);

        let result = run_session(&mut link, "t/1", b"hello".to_vec(), BUDGET).await;

        assert!(matches!(result, Err(DispatchError::ConnectTimeout)));
        assert!(link.published.is_empty());
        assert!(link.closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_forces_close() {
        let mut link = ScriptedLink::new(vec![
            (Duration::from_millis(10), LinkEvent::Connected),
            (
                Duration::from_millis(10),
                LinkEvent::TransportError("broker went away".to_string()),
            ),
        ]);

        let result = run_session(&mut link, "t/1", b"hello".to_vec(), BUDGET).await;

        assert!(matches!(result, Err(DispatchError::Transport(_))));
        assert!(link.closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_before_ack_is_transport_error() {
        let mut link = ScriptedLink::new(vec![
            (Duration::from_millis(10), LinkEvent::Connected),
            (Duration::from_millis(10), LinkEvent::Closed),
        ]);

        let result = run_session(&mut link, "t/1", b"hello".to_vec(), BUDGET).await;

        assert!(matches!(result, Err(DispatchError::Transport(_))));
        assert!(link.closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_failure_settles_session() {
        let mut link = ScriptedLink::new(vec![
            (Duration::from_millis(10), LinkEvent::Connected),
            // A late ack after the failed publish must not flip the outcome.
            (Duration::from_millis(10), LinkEvent::PublishAcked),
        ])
        .failing_publish(DispatchError::Publish("queue full".to_string()));

        let result = run_session(&mut link, "t/1", b"hello".to_vec(), BUDGET).await;

        assert!(matches!(result, Err(DispatchError::Publish(_))));
        assert_eq!(link.script.len(), 1, "ack after failure must remain unconsumed");
        assert!(link.closed);
    }
}
