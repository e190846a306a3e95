//! End-to-end tests for the devicehubd pipeline.
//!
//! Each test wires the real registry, command service and dispatcher to the
//! in-process response bus, then feeds commands through the dispatcher inbox
//! the same way the MQTT receive loop does. No broker is needed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use devicehub_app::event_bus::InProcessBus;
use devicehub_app::registry::DeviceRegistry;
use devicehub_app::routing::Route;
use devicehub_app::services::command_service::CommandService;
use devicehub_app::services::dispatcher::{self, InboundCommand};
use devicehub_domain::command::{CommandRequest, CommandResponse};
use devicehub_domain::device::DeviceState;

struct Harness {
    registry: Arc<DeviceRegistry>,
    inbox: mpsc::Sender<InboundCommand>,
    responses: broadcast::Receiver<CommandResponse>,
    worker: JoinHandle<()>,
}

impl Harness {
    fn start() -> Self {
        let registry = Arc::new(DeviceRegistry::seeded().expect("built-in seed is valid"));
        let bus = Arc::new(InProcessBus::new(256));
        let responses = bus.subscribe();
        let service = Arc::new(CommandService::new(Arc::clone(&registry), bus));
        let (inbox, commands) = dispatcher::channel(64);
        let worker = tokio::spawn(dispatcher::run(service, commands));
        Self {
            registry,
            inbox,
            responses,
            worker,
        }
    }

    /// Route a request the way the bus adapter does: by its device type.
    async fn send(&self, request: CommandRequest) {
        let route = Route::for_device_type(&request.device_type);
        self.inbox
            .send(InboundCommand { route, request })
            .await
            .expect("dispatcher is running");
    }

    async fn recv(&mut self) -> CommandResponse {
        tokio::time::timeout(Duration::from_secs(5), self.responses.recv())
            .await
            .expect("response within timeout")
            .expect("bus open")
    }

    async fn roundtrip(&mut self, request: CommandRequest) -> CommandResponse {
        self.send(request).await;
        self.recv().await
    }

    async fn stop(self) -> broadcast::Receiver<CommandResponse> {
        drop(self.inbox);
        self.worker.await.expect("dispatcher exits cleanly");
        self.responses
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_turn_on_kitchen_lights() {
    let mut hub = Harness::start();
    let request = CommandRequest::new("lights", "on").with_location("kitchen");

    let response = hub.roundtrip(request.clone()).await;

    assert!(response.success);
    assert_eq!(response.message, "Kitchen Lights turned on");
    assert_eq!(response.correlation_id, request.correlation_id);
    assert_eq!(response.device_type, "lights");
    assert_eq!(response.device_id.as_str(), "kitchen-lights");
    assert!(response.timestamp > 0);
    assert_eq!(
        hub.registry.snapshot("kitchen-lights").unwrap().state(),
        DeviceState::On
    );
    hub.stop().await;
}

#[tokio::test]
async fn should_report_already_on_when_repeated() {
    let mut hub = Harness::start();
    hub.roundtrip(CommandRequest::new("lights", "on").with_location("kitchen"))
        .await;

    let response = hub
        .roundtrip(CommandRequest::new("lights", "on").with_location("kitchen"))
        .await;

    assert!(response.success);
    assert_eq!(response.message, "Kitchen Lights is already on");
    hub.stop().await;
}

#[tokio::test]
async fn should_not_resolve_explicit_id_of_other_type() {
    let mut hub = Harness::start();
    let request = CommandRequest::new("audio", "play").with_device_id("bedroom-lights");

    let response = hub.roundtrip(request).await;

    assert!(!response.success);
    assert_eq!(response.message, "Audio device not found");
    assert_eq!(response.device_id.as_str(), "bedroom-lights");
    assert_eq!(
        hub.registry.snapshot("bedroom-lights").unwrap().state(),
        DeviceState::Off
    );
    hub.stop().await;
}

#[tokio::test]
async fn should_not_find_lights_in_unknown_location() {
    let mut hub = Harness::start();

    let response = hub
        .roundtrip(CommandRequest::new("lights", "on").with_location("garage"))
        .await;

    assert!(!response.success);
    assert_eq!(response.message, "Light not found");
    hub.stop().await;
}

#[tokio::test]
async fn should_reject_unknown_action() {
    let mut hub = Harness::start();

    let response = hub
        .roundtrip(CommandRequest::new("lights", "dance").with_location("bedroom"))
        .await;

    assert!(!response.success);
    assert_eq!(response.message, "Unknown action: dance");
    hub.stop().await;
}

#[tokio::test]
async fn should_reject_play_on_lights() {
    let mut hub = Harness::start();

    let response = hub
        .roundtrip(CommandRequest::new("lights", "play").with_device_id("kitchen-lights"))
        .await;

    assert!(!response.success);
    assert_eq!(
        hub.registry.snapshot("kitchen-lights").unwrap().state(),
        DeviceState::Off
    );
    hub.stop().await;
}

#[tokio::test]
async fn should_drive_audio_through_play_pause_stop() {
    let mut hub = Harness::start();

    for (action, state) in [
        ("play", DeviceState::Playing),
        ("pause", DeviceState::Paused),
        ("stop", DeviceState::Stopped),
    ] {
        let response = hub
            .roundtrip(CommandRequest::new("audio", action).with_location("living room"))
            .await;
        assert!(response.success, "{action}: {}", response.message);
        assert_eq!(response.device_id.as_str(), "living-room-audio");
        assert_eq!(
            hub.registry.snapshot("living-room-audio").unwrap().state(),
            state
        );
    }
    hub.stop().await;
}

// ---------------------------------------------------------------------------
// Routing and correlation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_stay_silent_for_unhandled_device_type() {
    let hub = Harness::start();
    hub.send(CommandRequest::new("thermostat", "on")).await;

    let mut responses = hub.stop().await;

    assert!(responses.try_recv().is_err());
}

#[tokio::test]
async fn should_answer_every_request_exactly_once_with_its_correlation_id() {
    let hub = Harness::start();
    let requests: Vec<_> = [
        ("lights", "on", "kitchen"),
        ("lights", "off", "bedroom"),
        ("audio", "play", ""),
        ("lights", "on", "garage"),
        ("audio", "dance", ""),
    ]
    .into_iter()
    .map(|(kind, action, location)| CommandRequest::new(kind, action).with_location(location))
    .collect();

    for request in &requests {
        hub.send(request.clone()).await;
    }
    let mut responses = hub.stop().await;

    let mut seen = Vec::new();
    while let Ok(response) = responses.try_recv() {
        seen.push(response.correlation_id);
    }
    assert_eq!(seen.len(), requests.len());
    for request in &requests {
        assert_eq!(
            seen.iter().filter(|id| **id == request.correlation_id).count(),
            1
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_report_turned_on_once_under_concurrent_commands() {
    let hub = Harness::start();
    for _ in 0..50 {
        hub.send(CommandRequest::new("lights", "on").with_device_id("kitchen-lights"))
            .await;
    }
    let registry = Arc::clone(&hub.registry);

    let mut responses = hub.stop().await;

    let mut turned_on = 0;
    let mut total = 0;
    while let Ok(response) = responses.try_recv() {
        assert!(response.success);
        total += 1;
        if response.message == "Kitchen Lights turned on" {
            turned_on += 1;
        }
    }
    assert_eq!(total, 50);
    assert_eq!(turned_on, 1);
    assert_eq!(
        registry.snapshot("kitchen-lights").unwrap().state(),
        DeviceState::On
    );
}
