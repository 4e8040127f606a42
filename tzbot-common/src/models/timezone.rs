use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, UserMarker};

use crate::error::Error;

/// One member's timezone registration, scoped to a single guild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimezoneRecord {
    pub guild_id: Id<GuildMarker>,
    pub user_id: Id<UserMarker>,
    /// Display name at the time the timezone was set.
    pub name: String,
    pub timezone: Tz,
    /// Free-form country or city the member typed.
    pub country: String,
    pub set_at: DateTime<Utc>,
}

impl TimezoneRecord {
    pub fn new(
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
        name: impl Into<String>,
        timezone: Tz,
        country: impl Into<String>,
    ) -> Self {
        Self {
            guild_id,
            user_id,
            name: name.into(),
            timezone,
            country: country.into(),
            set_at: Utc::now(),
        }
    }

    pub fn local_at(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.timezone)
    }
}

/// Resolve an IANA zone name such as `Europe/London`.
///
/// Exact names win; otherwise a case-insensitive match is tried so that
/// `europe/london` is accepted too.
pub fn parse_timezone(name: &str) -> Result<Tz, Error> {
    if let Ok(tz) = name.parse::<Tz>() {
        return Ok(tz);
    }
    Tz::from_str_insensitive(name).map_err(|_| Error::UnknownTimezone(name.to_string()))
}
