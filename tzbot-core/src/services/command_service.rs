use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error};
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker};

use crate::config::BotConfig;
use crate::Error;
use crate::models::{ChatMessage, ChatUser};
use crate::repositories::TimezoneRepository;
use crate::services::builtin_commands::{handle_builtin_command, BuiltinCommand};

/// Context passed to built-in command handlers.
pub struct CommandContext<'a> {
    /// `None` when the command came from a DM.
    pub guild_id: Option<Id<GuildMarker>>,
    pub author: &'a ChatUser,
    pub mentions: &'a [ChatUser],
    pub config: &'a BotConfig,
    pub timezone_repo: &'a Arc<dyn TimezoneRepository>,

    /// Instant used for every local-time conversion of this command.
    pub now: DateTime<Utc>,
}

/// Response from command handlers. Each entry in `texts` is sent as its own message.
#[derive(Debug, Clone)]
pub struct CommandResponse {
    pub texts: Vec<String>,
    pub channel_id: Id<ChannelMarker>,
}

pub struct CommandService {
    timezone_repo: Arc<dyn TimezoneRepository>,
    config: BotConfig,
}

impl CommandService {
    pub fn new(timezone_repo: Arc<dyn TimezoneRepository>, config: BotConfig) -> Self {
        debug!("Initializing CommandService (prefix='{}')", config.command_prefix);
        Self {
            timezone_repo,
            config,
        }
    }

    /// Split `text` into a known command and its arguments.
    ///
    /// Returns `None` for text without the prefix, for a name that does not
    /// directly follow the prefix and for unknown commands.
    pub fn parse_command<'t>(&self, text: &'t str) -> Option<(BuiltinCommand, Vec<&'t str>)> {
        let rest = text.trim().strip_prefix(self.config.command_prefix.as_str())?;
        if rest.starts_with(char::is_whitespace) {
            return None;
        }
        let mut parts = rest.split_whitespace();
        let cmd = BuiltinCommand::from_name(parts.next()?)?;
        Some((cmd, parts.collect()))
    }

    /// Processes a chat message and returns a command response if applicable.
    pub async fn handle_chat_message(
        &self,
        msg: &ChatMessage,
    ) -> Result<Option<CommandResponse>, Error> {
        self.handle_chat_message_at(msg, Utc::now()).await
    }

    /// Same as [`handle_chat_message`](Self::handle_chat_message) with a fixed clock.
    pub async fn handle_chat_message_at(
        &self,
        msg: &ChatMessage,
        now: DateTime<Utc>,
    ) -> Result<Option<CommandResponse>, Error> {
        if msg.author.is_bot {
            return Ok(None);
        }

        let Some((cmd, args)) = self.parse_command(&msg.text) else {
            return Ok(None);
        };
        debug!("Parsed command: '{}', args: {:?}", cmd.name(), args);

        let ctx = CommandContext {
            guild_id: msg.guild_id,
            author: &msg.author,
            mentions: &msg.mentions,
            config: &self.config,
            timezone_repo: &self.timezone_repo,
            now,
        };

        let text = match handle_builtin_command(cmd, &ctx, &args).await {
            Ok(text) => text,
            Err(e) => {
                error!("Command '{}' from {} failed: {:?}", cmd.name(), msg.author.id, e);
                format!(
                    "Sorry {}, something went wrong while running `{}{}`. Please try again later.",
                    msg.author.mention(),
                    self.config.command_prefix,
                    cmd.name()
                )
            }
        };

        Ok(Some(CommandResponse {
            texts: vec![text],
            channel_id: msg.channel_id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::JsonTimezoneRepository;

    async fn service(dir: &tempfile::TempDir) -> CommandService {
        let repo = JsonTimezoneRepository::open(dir.path().join("tz.json"))
            .await
            .expect("open repo");
        CommandService::new(Arc::new(repo), BotConfig::default())
    }

    #[tokio::test]
    async fn test_parse_command() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(&dir).await;

        let (cmd, args) = svc.parse_command("  !setTZ Europe/London UK ").unwrap();
        assert_eq!(cmd, BuiltinCommand::SetTimezone);
        assert_eq!(args, vec!["Europe/London", "UK"]);

        let (cmd, args) = svc.parse_command("!list").unwrap();
        assert_eq!(cmd, BuiltinCommand::List);
        assert!(args.is_empty());

        assert!(svc.parse_command("hello there").is_none());
        assert!(svc.parse_command("!").is_none());
        assert!(svc.parse_command("!timezone").is_none());
        assert!(svc.parse_command("! help").is_none());
    }

    #[tokio::test]
    async fn test_custom_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonTimezoneRepository::open(dir.path().join("tz.json")).await.unwrap();
        let config = BotConfig {
            command_prefix: "tz!".to_string(),
            ..BotConfig::default()
        };
        let svc = CommandService::new(Arc::new(repo), config);

        assert!(svc.parse_command("!help").is_none());
        assert_eq!(svc.parse_command("tz!help").map(|(c, _)| c), Some(BuiltinCommand::Help));
    }
}
