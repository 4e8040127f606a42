use async_trait::async_trait;
use twilight_model::id::Id;
use twilight_model::id::marker::ChannelMarker;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

/// Anything that can deliver a text reply into a channel.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send_message(&self, channel_id: Id<ChannelMarker>, text: &str) -> Result<(), Error>;
}

#[async_trait]
pub trait PlatformIntegration {
    async fn connect(&mut self) -> Result<(), Error>;
    async fn disconnect(&mut self) -> Result<(), Error>;
    async fn get_connection_status(&self) -> Result<ConnectionStatus, Error>;
}
