use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace};

use tzbot_common::traits::platform_traits::MessageSink;

use crate::eventbus::{BotEvent, EventBus};
use crate::Error;
use crate::models::ChatMessage;
use crate::services::CommandService;

/// The MessageService takes chat messages off the EventBus, runs them through
/// the CommandService and sends any reply back to the originating channel.
pub struct MessageService {
    event_bus: Arc<EventBus>,
    command_service: Arc<CommandService>,
    sink: Arc<dyn MessageSink>,
}

impl MessageService {
    pub fn new(
        event_bus: Arc<EventBus>,
        command_service: Arc<CommandService>,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        debug!("MessageService::new() called");
        Self {
            event_bus,
            command_service,
            sink,
        }
    }

    /// Handle one inbound message: dispatch the command (if any) and send each reply line.
    pub async fn process_incoming_message(&self, msg: &ChatMessage) -> Result<(), Error> {
        debug!(
            "Message from {} ({}) in channel {}: {}",
            msg.author.display_name, msg.author.id, msg.channel_id, msg.text
        );

        let Some(response) = self.command_service.handle_chat_message(msg).await? else {
            return Ok(());
        };
        for text in &response.texts {
            self.sink.send_message(response.channel_id, text).await?;
        }
        Ok(())
    }

    /// Subscribe to the bus now and process events on a background task.
    ///
    /// Subscribing before spawning means nothing published after `start`
    /// returns can be missed.
    pub async fn start(self: Arc<Self>) -> JoinHandle<()> {
        let rx = self.event_bus.subscribe(None).await;
        tokio::spawn(async move { self.run(rx).await })
    }

    /// Listener loop; ends on bus shutdown or when every sender is gone.
    pub async fn run(&self, mut rx: mpsc::Receiver<BotEvent>) {
        let mut shutdown_rx = self.event_bus.shutdown_rx.clone();
        info!("MessageService: Started, listening on EventBus");

        while !self.event_bus.is_shutdown() {
            tokio::select! {
                maybe_event = rx.recv() => {
                    let Some(event) = maybe_event else { break };
                    self.dispatch_event(event).await;
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("MessageService: Shutting down listener loop");
    }

    async fn dispatch_event(&self, event: BotEvent) {
        match event {
            BotEvent::ChatMessage(msg) => {
                if let Err(e) = self.process_incoming_message(&msg).await {
                    error!("MessageService: failed to handle message in {}: {:?}", msg.channel_id, e);
                }
            }
            BotEvent::Ready { user_name } => {
                info!("Logged on as {user_name}!");
            }
            other => {
                trace!("MessageService: ignoring '{}' event", other.event_type());
            }
        }
    }
}
