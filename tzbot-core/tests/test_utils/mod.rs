// File: tzbot-core/tests/test_utils/mod.rs
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;

use tzbot_common::traits::platform_traits::MessageSink;
use tzbot_core::models::{ChatMessage, ChatUser};
use tzbot_core::repositories::{JsonTimezoneRepository, TimezoneRepository};
use tzbot_core::services::CommandService;
use tzbot_core::{BotConfig, Error};

pub const GUILD: u64 = 1000;
pub const CHANNEL: u64 = 2000;

/// Collects every message that would have gone out to Discord.
#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<(Id<ChannelMarker>, String)>>,
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send_message(&self, channel_id: Id<ChannelMarker>, text: &str) -> Result<(), Error> {
        self.sent.lock().await.push((channel_id, text.to_string()));
        Ok(())
    }
}

pub fn user(id: u64, name: &str) -> ChatUser {
    ChatUser::new(Id::new(id), name)
}

/// A guild message from `author` mentioning `mentions`.
pub fn guild_message(author: &ChatUser, text: &str, mentions: &[ChatUser]) -> ChatMessage {
    ChatMessage {
        guild_id: Some(Id::new(GUILD)),
        channel_id: Id::new(CHANNEL),
        author: author.clone(),
        mentions: mentions.to_vec(),
        text: text.to_string(),
    }
}

pub fn dm_message(author: &ChatUser, text: &str) -> ChatMessage {
    ChatMessage {
        guild_id: None,
        ..guild_message(author, text, &[])
    }
}

/// A command service over a fresh JSON store inside `dir`.
pub async fn setup_command_service(
    dir: &tempfile::TempDir,
) -> Result<(CommandService, Arc<dyn TimezoneRepository>), Error> {
    let repo: Arc<dyn TimezoneRepository> =
        Arc::new(JsonTimezoneRepository::open(dir.path().join("timezones.json")).await?);
    let config = BotConfig {
        data_file: dir.path().join("timezones.json"),
        ..BotConfig::default()
    };
    Ok((CommandService::new(repo.clone(), config), repo))
}
