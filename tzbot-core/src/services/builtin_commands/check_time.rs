use twilight_model::id::Id;
use twilight_model::id::marker::GuildMarker;

use crate::Error;
use crate::services::command_service::CommandContext;
use crate::utils::time::{format_clock, format_day_month};

/// `!time @user`: local time of the first mentioned user.
pub async fn handle_check_time(
    ctx: &CommandContext<'_>,
    guild_id: Id<GuildMarker>,
) -> Result<String, Error> {
    let Some(target) = ctx.mentions.first() else {
        return Ok("Please mention a user to get their current time.".to_string());
    };

    let Some(record) = ctx.timezone_repo.get(guild_id, target.id).await? else {
        return Ok(format!(
            "{} has not set a timezone. They can set it using the command `{}setTZ <timezone> <country>`.",
            target.mention(),
            ctx.config.command_prefix
        ));
    };

    let local = record.local_at(ctx.now);
    Ok(format!(
        "**Current Time for {}:**\n```Timezone: {} ({})\nDate: {}\nTime: {}```",
        target.mention(),
        record.timezone.name(),
        record.country,
        format_day_month(&local),
        format_clock(&local),
    ))
}
