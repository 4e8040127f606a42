use tracing::{debug, info};
use twilight_model::id::Id;
use twilight_model::id::marker::GuildMarker;

use crate::Error;
use crate::models::{parse_timezone, TimezoneRecord};
use crate::services::command_service::CommandContext;

/// `!setTZ <timezone> <country>`
pub async fn handle_set_timezone(
    ctx: &CommandContext<'_>,
    guild_id: Id<GuildMarker>,
    args: &[&str],
) -> Result<String, Error> {
    let [timezone, country] = args else {
        return Ok(format!(
            "Please use the correct format: `{}setTZ <timezone> <country>`",
            ctx.config.command_prefix
        ));
    };

    let mention = ctx.author.mention();
    if country.trim().is_empty() {
        return Ok(format!(
            "{mention}, invalid country! Please mention a country or city after the timezone."
        ));
    }

    let tz = match parse_timezone(timezone) {
        Ok(tz) => tz,
        Err(e) => {
            debug!("setTZ rejected for {}: {}", ctx.author.id, e);
            return Ok(format!(
                "{mention}, invalid timezone! Please refer to a list of IANA time zones."
            ));
        }
    };

    let mut record = TimezoneRecord::new(
        guild_id,
        ctx.author.id,
        ctx.author.display_name.clone(),
        tz,
        *country,
    );
    record.set_at = ctx.now;
    ctx.timezone_repo.upsert(&record).await?;

    info!(
        "Stored timezone {} for user {} in guild {}",
        tz.name(),
        ctx.author.id,
        guild_id
    );
    Ok(format!(
        "{mention}, your timezone has been set to {} ({country}).",
        tz.name()
    ))
}
