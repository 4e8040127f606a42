use twilight_model::id::Id;
use twilight_model::id::marker::GuildMarker;

use crate::Error;
use crate::services::command_service::CommandContext;
use crate::utils::table::{render_fancy_grid, truncate_cell};
use crate::utils::time::{format_clock, format_day_month};

/// Discord rejects messages longer than this.
pub const DISCORD_MAX_MESSAGE_CHARS: usize = 2000;

const HEADERS: [&str; 4] = ["User", "Timezone", "Current Time", "Date"];

/// Digits that overflow `usize` still count as a (huge) number.
fn parse_count(arg: &str) -> Option<usize> {
    if arg.is_empty() || !arg.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(arg.parse::<usize>().unwrap_or(usize::MAX))
}

/// `!list [n]`: table of the last `n` registrations in this guild.
pub async fn handle_list_users(
    ctx: &CommandContext<'_>,
    guild_id: Id<GuildMarker>,
    args: &[&str],
) -> Result<String, Error> {
    let count = args
        .first()
        .and_then(|a| parse_count(a))
        .filter(|n| *n > 0)
        .unwrap_or(ctx.config.default_list_count)
        .min(ctx.config.max_list_count);

    let records = ctx.timezone_repo.list_recent(guild_id, count).await?;
    if records.is_empty() {
        return Ok("No timezones have been set yet in this server.".to_string());
    }

    let mut rows: Vec<Vec<String>> = records
        .iter()
        .map(|rec| {
            let local = rec.local_at(ctx.now);
            vec![
                truncate_cell(&rec.name),
                truncate_cell(rec.timezone.name()),
                format_clock(&local),
                format_day_month(&local),
            ]
        })
        .collect();

    loop {
        let reply = format!("```\n{}\n```", render_fancy_grid(&HEADERS, &rows));
        if reply.chars().count() <= DISCORD_MAX_MESSAGE_CHARS || rows.len() <= 1 {
            return Ok(reply);
        }
        // oldest rows go first
        rows.remove(0);
    }
}
