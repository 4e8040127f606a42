use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, UserMarker};

/// Author or mentioned user of a chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatUser {
    pub id: Id<UserMarker>,
    /// Guild nickname, else global name, else account name.
    pub display_name: String,
    pub is_bot: bool,
}

impl ChatUser {
    pub fn new(id: Id<UserMarker>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            is_bot: false,
        }
    }

    /// Discord mention markup, e.g. `<@1234>`.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// An inbound chat message, independent of the gateway payload it came from.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    /// `None` for direct messages.
    pub guild_id: Option<Id<GuildMarker>>,
    pub channel_id: Id<ChannelMarker>,
    pub author: ChatUser,
    pub mentions: Vec<ChatUser>,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention_markup() {
        let user = ChatUser::new(Id::new(42), "someone");
        assert_eq!(user.mention(), "<@42>");
        assert!(!user.is_bot);
    }
}
