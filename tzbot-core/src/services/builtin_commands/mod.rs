//! Handlers for the fixed set of chat commands.

pub mod check_time;
pub mod help;
pub mod list_users;
pub mod set_timezone;

use crate::Error;
use crate::services::command_service::CommandContext;

pub use check_time::handle_check_time;
pub use help::handle_help;
pub use list_users::handle_list_users;
pub use set_timezone::handle_set_timezone;

/// Reply for guild-only commands used in a DM.
pub const GUILD_ONLY_REPLY: &str = "This command can only be used in a server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinCommand {
    SetTimezone,
    Time,
    List,
    Help,
}

impl BuiltinCommand {
    /// Match a command name without its prefix, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "settz" => Some(Self::SetTimezone),
            "time" => Some(Self::Time),
            "list" => Some(Self::List),
            "help" => Some(Self::Help),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SetTimezone => "setTZ",
            Self::Time => "time",
            Self::List => "list",
            Self::Help => "help",
        }
    }
}

/// Run `cmd` and return the reply text.
pub async fn handle_builtin_command(
    cmd: BuiltinCommand,
    ctx: &CommandContext<'_>,
    args: &[&str],
) -> Result<String, Error> {
    let guild_id = match (cmd, ctx.guild_id) {
        (BuiltinCommand::Help, _) => return Ok(handle_help(ctx)),
        (_, Some(guild_id)) => guild_id,
        (_, None) => return Ok(GUILD_ONLY_REPLY.to_string()),
    };

    match cmd {
        BuiltinCommand::SetTimezone => handle_set_timezone(ctx, guild_id, args).await,
        BuiltinCommand::Time => handle_check_time(ctx, guild_id).await,
        BuiltinCommand::List => handle_list_users(ctx, guild_id, args).await,
        BuiltinCommand::Help => Ok(handle_help(ctx)),
    }
}
