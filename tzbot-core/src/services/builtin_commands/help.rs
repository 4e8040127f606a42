use crate::services::command_service::CommandContext;

const TZ_LIST_URL: &str = "https://en.wikipedia.org/wiki/List_of_tz_database_time_zones";

/// `!help`
pub fn handle_help(ctx: &CommandContext<'_>) -> String {
    let p = &ctx.config.command_prefix;
    format!(
        "**Bot Commands:**\n\
         `{p}setTZ <timezone> <country>` - Set your timezone. Use an IANA time zone code like `Europe/London` or `America/New_York`.\n\
         `{p}time @user` - Get the current time of the mentioned user.\n\
         `{p}list <number>` - Get the last <number> of people times added.\n\
         `{p}help` - Show this message.\n\
         **Time Zone List:** For a full list of IANA time zones, visit [this link]({TZ_LIST_URL})."
    )
}
