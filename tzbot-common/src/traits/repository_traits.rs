use async_trait::async_trait;
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, UserMarker};

use crate::error::Error;
use crate::models::TimezoneRecord;

/// Per-guild, per-user timezone storage.
///
/// Records are kept in registration order inside each guild. Writing a
/// record for a user that already has one replaces it and makes it the
/// newest entry.
#[async_trait]
pub trait TimezoneRepository: Send + Sync {
    async fn upsert(&self, record: &TimezoneRecord) -> Result<(), Error>;

    async fn get(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> Result<Option<TimezoneRecord>, Error>;

    /// The last `limit` records of the guild, oldest first.
    async fn list_recent(
        &self,
        guild_id: Id<GuildMarker>,
        limit: usize,
    ) -> Result<Vec<TimezoneRecord>, Error>;

    async fn count(&self, guild_id: Id<GuildMarker>) -> Result<usize, Error>;
}
