use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use twilight_gateway::{
    self as gateway,
    CloseFrame,
    Config,
    Event,
    EventTypeFlags,
    Intents,
    MessageSender,
    Shard,
    StreamExt,
};
use twilight_http::Client as HttpClient;
use twilight_http::client::ClientBuilder;
use twilight_model::channel::Message;
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;

use tzbot_common::traits::platform_traits::{ConnectionStatus, MessageSink, PlatformIntegration};

use crate::eventbus::{BotEvent, EventBus};
use crate::Error;
use crate::models::{ChatMessage, ChatUser};

const SHARD_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Convert a gateway message into the platform-neutral form.
///
/// Display names prefer the guild nickname, then the global name, then the
/// account name. Mentions carry no global name, so they fall back from the
/// nickname straight to the account name.
pub fn to_chat_message(msg: &Message) -> ChatMessage {
    let author_name = msg
        .member
        .as_ref()
        .and_then(|m| m.nick.clone())
        .or_else(|| msg.author.global_name.clone())
        .unwrap_or_else(|| msg.author.name.clone());

    let mentions = msg
        .mentions
        .iter()
        .map(|m| ChatUser {
            id: m.id,
            display_name: m
                .member
                .as_ref()
                .and_then(|pm| pm.nick.clone())
                .unwrap_or_else(|| m.name.clone()),
            is_bot: m.bot,
        })
        .collect();

    ChatMessage {
        guild_id: msg.guild_id,
        channel_id: msg.channel_id,
        author: ChatUser {
            id: msg.author.id,
            display_name: author_name,
            is_bot: msg.author.bot,
        },
        mentions,
        text: msg.content.clone(),
    }
}

/// Reads gateway events from one shard and publishes the ones we care about.
async fn shard_runner(mut shard: Shard, event_bus: Arc<EventBus>) {
    let shard_id = shard.id().number();
    info!("(ShardRunner) Shard {shard_id} started. Listening for events.");

    let wanted = EventTypeFlags::READY | EventTypeFlags::MESSAGE_CREATE;
    while let Some(item) = shard.next_event(wanted).await {
        let event = match item {
            Ok(event) => event,
            Err(err) => {
                error!("Shard {shard_id} => error receiving event: {err:?}");
                continue;
            }
        };

        match event {
            Event::Ready(ready) => {
                info!(
                    "Shard {shard_id} => READY as {} (ID={})",
                    ready.user.name, ready.user.id
                );
                event_bus
                    .publish(BotEvent::Ready {
                        user_name: ready.user.name.clone(),
                    })
                    .await;
            }
            Event::MessageCreate(msg_create) => {
                if msg_create.author.bot {
                    debug!("Ignoring bot message from {}", msg_create.author.name);
                    continue;
                }
                event_bus
                    .publish(BotEvent::ChatMessage(to_chat_message(&msg_create.0)))
                    .await;
            }
            other => {
                trace!("Shard {shard_id} => unhandled event: {:?}", other.kind());
            }
        }
    }

    warn!("(ShardRunner) Shard {shard_id} event loop ended.");
}

/// Sends replies through Discord's REST API.
#[derive(Clone)]
pub struct DiscordSender {
    http: Arc<HttpClient>,
}

#[async_trait]
impl MessageSink for DiscordSender {
    async fn send_message(&self, channel_id: Id<ChannelMarker>, text: &str) -> Result<(), Error> {
        self.http
            .create_message(channel_id)
            .content(text)
            .await
            .map_err(|e| Error::Platform(format!("Error sending Discord message: {e:?}")))?;
        Ok(())
    }
}

/// Gateway connection plus the REST client used for replies.
pub struct DiscordPlatform {
    token: String,
    connection_status: ConnectionStatus,
    http: Arc<HttpClient>,
    event_bus: Arc<EventBus>,
    shard_tasks: Vec<JoinHandle<()>>,
    shard_senders: Vec<MessageSender>,
}

impl DiscordPlatform {
    pub fn new(token: String, event_bus: Arc<EventBus>) -> Self {
        let http = Arc::new(
            ClientBuilder::new()
                .token(token.clone())
                .timeout(Duration::from_secs(30))
                .build(),
        );
        Self {
            token,
            connection_status: ConnectionStatus::Disconnected,
            http,
            event_bus,
            shard_tasks: Vec::new(),
            shard_senders: Vec::new(),
        }
    }

    /// A cloneable handle for sending replies.
    pub fn sender(&self) -> DiscordSender {
        DiscordSender {
            http: self.http.clone(),
        }
    }
}

#[async_trait]
impl PlatformIntegration for DiscordPlatform {
    async fn connect(&mut self) -> Result<(), Error> {
        if self.token.trim().is_empty() {
            return Err(Error::Auth("Discord token is empty".into()));
        }
        if self.connection_status == ConnectionStatus::Connected {
            info!("(DiscordPlatform) Already connected => skipping");
            return Ok(());
        }

        let config = Config::new(
            self.token.clone(),
            Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT,
        );

        let shards = gateway::create_recommended(&self.http, config, |_, b| b.build())
            .await
            .map_err(|e| Error::Platform(format!("create_recommended error: {e}")))?;

        for shard in shards {
            self.shard_senders.push(shard.sender());
            let bus_for_shard = self.event_bus.clone();
            self.shard_tasks
                .push(tokio::spawn(shard_runner(shard, bus_for_shard)));
        }
        info!("(DiscordPlatform) Connected with {} shard(s)", self.shard_tasks.len());

        self.connection_status = ConnectionStatus::Connected;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), Error> {
        self.connection_status = ConnectionStatus::Disconnected;

        for sender in &self.shard_senders {
            let _ = sender.close(CloseFrame::NORMAL);
        }
        for mut task in self.shard_tasks.drain(..) {
            if tokio::time::timeout(SHARD_JOIN_TIMEOUT, &mut task).await.is_err() {
                warn!("(DiscordPlatform) Shard task did not stop in time; aborting");
                task.abort();
            }
        }
        self.shard_senders.clear();
        Ok(())
    }

    async fn get_connection_status(&self) -> Result<ConnectionStatus, Error> {
        Ok(self.connection_status.clone())
    }
}
