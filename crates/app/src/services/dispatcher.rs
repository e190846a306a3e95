//! Dispatcher — fans inbound commands out to concurrent handler tasks.
//!
//! Adapters push [`InboundCommand`]s into an mpsc channel; [`run`] spawns one
//! task per command so handlers overlap across and within routes. The loop
//! ends when every sender is dropped, after in-flight handlers finish.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use devicehub_domain::command::CommandRequest;

use crate::ports::ResponsePublisher;
use crate::routing::Route;
use crate::services::command_service::CommandService;

/// A decoded request together with the route it arrived on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    pub route: Route,
    pub request: CommandRequest,
}

/// Create the channel adapters feed inbound commands into.
#[must_use]
pub fn channel(capacity: usize) -> (mpsc::Sender<InboundCommand>, mpsc::Receiver<InboundCommand>) {
    mpsc::channel(capacity)
}

/// Drain `inbox`, handling each command on its own task.
pub async fn run<P>(service: Arc<CommandService<P>>, mut inbox: mpsc::Receiver<InboundCommand>)
where
    P: ResponsePublisher + Send + Sync + 'static,
{
    let mut tasks = JoinSet::new();

    while let Some(InboundCommand { route, request }) = inbox.recv().await {
        let service = Arc::clone(&service);
        tasks.spawn(async move {
            service.handle(route, request).await;
        });

        while let Some(joined) = tasks.try_join_next() {
            log_join_error(joined);
        }
    }

    tracing::debug!(in_flight = tasks.len(), "inbox closed, waiting for handlers");
    while let Some(joined) = tasks.join_next().await {
        log_join_error(joined);
    }
}

fn log_join_error(joined: Result<(), tokio::task::JoinError>) {
    if let Err(err) = joined {
        tracing::error!(%err, "command handler task failed");
    }
}
