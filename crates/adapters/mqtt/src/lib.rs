//! # devicehub-adapter-mqtt
//!
//! MQTT adapter — the message bus devicehub listens and answers on.
//!
//! ## Responsibilities
//! - Connect to an MQTT broker (startup fails if the broker does not answer)
//! - Subscribe command topics for the registered [`Route`]s
//! - Decode inbound payloads into [`CommandRequest`]s and hand them to the
//!   dispatcher
//! - Publish [`CommandResponse`]s (implements [`ResponsePublisher`])
//!
//! See [`topic`] for the topic layout.
//!
//! ## Dependency rule
//! Same as other adapters: depends on `devicehub-app` and `devicehub-domain`.

mod config;
mod error;
pub mod topic;

pub use config::MqttConfig;
pub use error::MqttError;
pub use topic::Topics;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rumqttc::{
    AsyncClient, ConnectionError, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use devicehub_app::ports::ResponsePublisher;
use devicehub_app::routing::Route;
use devicehub_app::services::dispatcher::InboundCommand;
use devicehub_domain::command::{CommandRequest, CommandResponse};
use devicehub_domain::error::HubError;

use topic::RouteSet;

/// Capacity of rumqttc's internal request channel.
const REQUEST_CHANNEL_CAPACITY: usize = 10;

/// How long shutdown waits for the DISCONNECT to be written.
const DISCONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Map a numeric QoS level to the rumqttc enum.
///
/// # Errors
///
/// Returns [`MqttError::InvalidQos`] for anything above 2.
pub fn qos_from_level(level: u8) -> Result<QoS, MqttError> {
    match level {
        0 => Ok(QoS::AtMostOnce),
        1 => Ok(QoS::AtLeastOnce),
        2 => Ok(QoS::ExactlyOnce),
        other => Err(MqttError::InvalidQos(other)),
    }
}

/// MQTT-backed command bus.
pub struct MqttBus {
    client: AsyncClient,
    topics: Topics,
    qos: QoS,
    routes: Arc<Mutex<RouteSet>>,
    event_loop: Mutex<Option<JoinHandle<()>>>,
}

impl MqttBus {
    /// Connect to the broker and start forwarding commands into `inbox`.
    ///
    /// Waits for the broker's CONNACK before returning.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Connection`] if the broker refuses or cannot be
    /// reached, [`MqttError::ConnectTimeout`] if it does not answer in time,
    /// or [`MqttError::InvalidQos`] for a bad QoS setting.
    pub async fn connect(
        config: &MqttConfig,
        inbox: mpsc::Sender<InboundCommand>,
    ) -> Result<Self, MqttError> {
        let qos = qos_from_level(config.qos)?;

        let mut options = MqttOptions::new(
            config.client_id.clone(),
            config.broker_host.clone(),
            config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(config.keep_alive_secs)));
        if let Some((username, password)) = config.credentials() {
            options.set_credentials(username, password);
        }

        let (client, mut eventloop) = AsyncClient::new(options, REQUEST_CHANNEL_CAPACITY);
        wait_for_connack(&mut eventloop, config.connect_timeout_secs).await?;
        tracing::info!(
            host = %config.broker_host,
            port = config.broker_port,
            client_id = %config.client_id,
            "connected to MQTT broker"
        );

        let topics = Topics::new(config.base_topic.clone());
        let routes = Arc::new(Mutex::new(RouteSet::default()));
        let receiver = Receiver {
            client: client.clone(),
            topics: topics.clone(),
            qos,
            routes: Arc::clone(&routes),
            inbox,
            reconnect_delay: Duration::from_secs(u64::from(config.reconnect_delay_secs)),
        };
        let event_loop = tokio::spawn(receiver.run(eventloop));

        Ok(Self {
            client,
            topics,
            qos,
            routes,
            event_loop: Mutex::new(Some(event_loop)),
        })
    }

    /// Register `routes` and subscribe the broker to the filters they need.
    ///
    /// The filter set is computed for the whole batch first, so registering
    /// the catch-all together with specific routes subscribes only the
    /// wildcard and each command is delivered once.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::Client`] if a request cannot be queued.
    pub async fn subscribe_all(
        &self,
        routes: impl IntoIterator<Item = Route>,
    ) -> Result<(), MqttError> {
        let change = lock(&self.routes).register(routes, &self.topics);

        for filter in change.added {
            tracing::info!(topic = %filter, "subscribing");
            self.client
                .subscribe(filter, self.qos)
                .await
                .map_err(MqttError::Client)?;
        }
        for filter in change.removed {
            tracing::debug!(topic = %filter, "dropping filter covered by wildcard");
            self.client
                .unsubscribe(filter)
                .await
                .map_err(MqttError::Client)?;
        }
        Ok(())
    }

    /// Topic scheme in use.
    #[must_use]
    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    /// Send DISCONNECT to the broker and stop the receive loop.
    ///
    /// The receive loop writes the packet and exits; it is aborted only if
    /// that takes longer than [`DISCONNECT_TIMEOUT`].
    pub async fn shutdown(&self) {
        if let Err(err) = self.client.disconnect().await {
            tracing::warn!(%err, "failed to queue MQTT disconnect");
        }
        let handle = lock(&self.event_loop).take();
        let Some(mut handle) = handle else {
            return;
        };
        if tokio::time::timeout(DISCONNECT_TIMEOUT, &mut handle)
            .await
            .is_err()
        {
            tracing::warn!("MQTT receive loop did not stop in time, aborting");
            handle.abort();
        }
        tracing::info!("MQTT bus stopped");
    }
}

impl ResponsePublisher for MqttBus {
    async fn publish(&self, response: CommandResponse) -> Result<(), HubError> {
        let payload = serde_json::to_vec(&response).map_err(MqttError::PayloadEncode)?;
        self.client
            .publish(self.topics.response(), self.qos, false, payload)
            .await
            .map_err(MqttError::Client)?;
        Ok(())
    }
}

/// Background task that polls the event loop and forwards commands.
struct Receiver {
    client: AsyncClient,
    topics: Topics,
    qos: QoS,
    routes: Arc<Mutex<RouteSet>>,
    inbox: mpsc::Sender<InboundCommand>,
    reconnect_delay: Duration,
}

impl Receiver {
    async fn run(self, mut eventloop: EventLoop) {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    if !self.forward(&publish.topic, &publish.payload).await {
                        tracing::debug!("inbox closed, stopping MQTT receive loop");
                        return;
                    }
                }
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    tracing::info!("reconnected to MQTT broker");
                    self.resubscribe();
                }
                Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                    tracing::debug!("MQTT disconnect sent, stopping receive loop");
                    return;
                }
                Ok(_) => {}
                Err(ConnectionError::RequestsDone) => {
                    tracing::debug!("MQTT client dropped, stopping receive loop");
                    return;
                }
                Err(err) => {
                    tracing::warn!(%err, "MQTT connection error, retrying");
                    tokio::time::sleep(self.reconnect_delay).await;
                }
            }
        }
    }

    /// Route and decode one publish. Returns `false` once the inbox is closed.
    async fn forward(&self, topic: &str, payload: &[u8]) -> bool {
        let Some(device_type) = self.topics.device_type(topic) else {
            tracing::debug!(topic, "ignoring publish on non-command topic");
            return true;
        };
        let route = lock(&self.routes).route_for(device_type);
        let Some(route) = route else {
            tracing::debug!(topic, "no route registered for device type");
            return true;
        };

        let mut request = match decode_command(payload) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(%err, topic, "dropping malformed command");
                return true;
            }
        };
        if request.device_type.is_empty() {
            request.device_type = device_type.to_string();
        }

        self.inbox
            .send(InboundCommand { route, request })
            .await
            .is_ok()
    }

    /// A clean reconnect loses broker-side subscriptions.
    fn resubscribe(&self) {
        let filters = lock(&self.routes).broker_filters(&self.topics);
        for filter in filters {
            if let Err(err) = self.client.try_subscribe(filter.clone(), self.qos) {
                tracing::warn!(%err, topic = %filter, "failed to resubscribe");
            }
        }
    }
}

async fn wait_for_connack(eventloop: &mut EventLoop, timeout_secs: u16) -> Result<(), MqttError> {
    let connack = async {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => return Ok(()),
                Ok(_) => {}
                Err(err) => return Err(MqttError::Connection(err)),
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(u64::from(timeout_secs)), connack)
        .await
        .map_err(|_| MqttError::ConnectTimeout { secs: timeout_secs })?
}

fn decode_command(payload: &[u8]) -> Result<CommandRequest, MqttError> {
    serde_json::from_slice(payload).map_err(MqttError::PayloadParse)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
