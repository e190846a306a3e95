//! # devicehubd — devicehub daemon
//!
//! Composition root that wires the registry, command service and MQTT bus
//! together.
//!
//! ## Responsibilities
//! - Load configuration (`devicehub.toml`, env vars)
//! - Initialise tracing
//! - Build the device registry from the configured or built-in seed
//! - Connect to the MQTT broker and subscribe every route
//! - Run the dispatch loop until Ctrl+C / SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod shutdown;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use devicehub_adapter_mqtt::MqttBus;
use devicehub_app::routing::Route;
use devicehub_app::services::command_service::CommandService;
use devicehub_app::services::dispatcher;

use crate::config::{Config, LoggingConfig};
use crate::shutdown::shutdown_signal;

/// Commands buffered between the MQTT receive loop and the dispatcher.
const INBOX_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    // Registry
    let registry = Arc::new(config.registry().context("failed to build device registry")?);
    tracing::info!(devices = registry.len(), "device registry ready");
    registry.log_status();

    // Bus
    let (inbox, commands) = dispatcher::channel(INBOX_CAPACITY);
    let bus = MqttBus::connect(&config.mqtt, inbox)
        .await
        .context("failed to connect to MQTT broker")?;
    let bus = Arc::new(bus);
    bus.subscribe_all(Route::subscriptions())
        .await
        .context("failed to subscribe command topics")?;

    // Dispatch
    let service = Arc::new(CommandService::new(registry, Arc::clone(&bus)));
    let mut dispatch = tokio::spawn(dispatcher::run(service, commands));
    tracing::info!(
        response_topic = %bus.topics().response(),
        "devicehubd ready, waiting for commands"
    );

    tokio::select! {
        () = shutdown_signal() => {}
        joined = &mut dispatch => match joined {
            Ok(()) => tracing::warn!("dispatch loop stopped unexpectedly"),
            Err(err) => tracing::error!(%err, "dispatch loop failed"),
        },
    }

    bus.shutdown().await;
    dispatch.abort();
    tracing::info!("devicehubd stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {:?} ({err}), falling back to info", logging.filter);
        EnvFilter::new("info")
    });
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
