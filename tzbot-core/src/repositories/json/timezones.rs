//! File-backed timezone repository.
//!
//! The whole store lives in memory and is rewritten to a single JSON file
//! after every mutation. Writes go to a temp file in the same directory
//! first and are then renamed over the target.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, UserMarker};

use crate::Error;
use crate::models::TimezoneRecord;
use crate::repositories::TimezoneRepository;

const STORE_VERSION: u32 = 1;

type GuildMap = HashMap<Id<GuildMarker>, Vec<TimezoneRecord>>;

/// On-disk layout. Records are flattened; order inside a guild is the
/// order in which they appear in the file.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    records: Vec<TimezoneRecord>,
}

pub struct JsonTimezoneRepository {
    path: PathBuf,
    guilds: RwLock<GuildMap>,
}

impl JsonTimezoneRepository {
    /// Load the store from `path`, or start empty if the file does not exist.
    ///
    /// A file that cannot be parsed is renamed to `<file>.corrupt-<secs>` and
    /// the store starts empty.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let guilds = load_guilds(&path).await?;
        let total: usize = guilds.values().map(Vec::len).sum();
        info!(
            "Timezone store loaded from {} ({} guild(s), {} record(s))",
            path.display(),
            guilds.len(),
            total
        );
        Ok(Self {
            path,
            guilds: RwLock::new(guilds),
        })
    }

    async fn persist(&self, guilds: &GuildMap) -> Result<(), Error> {
        let mut guild_ids: Vec<_> = guilds.keys().copied().collect();
        guild_ids.sort();

        let records = guild_ids
            .iter()
            .filter_map(|id| guilds.get(id))
            .flat_map(|members| members.iter().cloned())
            .collect();

        let file = StoreFile {
            version: STORE_VERSION,
            records,
        };
        let bytes = serde_json::to_vec_pretty(&file)?;
        write_atomically(&self.path, &bytes).await?;
        debug!("Persisted {} byte(s) to {}", bytes.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl TimezoneRepository for JsonTimezoneRepository {
    async fn upsert(&self, record: &TimezoneRecord) -> Result<(), Error> {
        let mut guilds = self.guilds.write().await;
        let previous = guilds.get(&record.guild_id).cloned();

        let members = guilds.entry(record.guild_id).or_default();
        members.retain(|r| r.user_id != record.user_id);
        members.push(record.clone());

        if let Err(e) = self.persist(&guilds).await {
            // keep memory and disk in agreement
            match previous {
                Some(members) => guilds.insert(record.guild_id, members),
                None => guilds.remove(&record.guild_id),
            };
            return Err(e);
        }
        Ok(())
    }

    async fn get(
        &self,
        guild_id: Id<GuildMarker>,
        user_id: Id<UserMarker>,
    ) -> Result<Option<TimezoneRecord>, Error> {
        let guilds = self.guilds.read().await;
        Ok(guilds
            .get(&guild_id)
            .and_then(|members| members.iter().find(|r| r.user_id == user_id))
            .cloned())
    }

    async fn list_recent(
        &self,
        guild_id: Id<GuildMarker>,
        limit: usize,
    ) -> Result<Vec<TimezoneRecord>, Error> {
        let guilds = self.guilds.read().await;
        let Some(members) = guilds.get(&guild_id) else {
            return Ok(Vec::new());
        };
        let start = members.len().saturating_sub(limit);
        Ok(members[start..].to_vec())
    }

    async fn count(&self, guild_id: Id<GuildMarker>) -> Result<usize, Error> {
        let guilds = self.guilds.read().await;
        Ok(guilds.get(&guild_id).map(Vec::len).unwrap_or(0))
    }
}

async fn load_guilds(path: &Path) -> Result<GuildMap, Error> {
    let raw = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No timezone store at {}; starting empty", path.display());
            return Ok(GuildMap::new());
        }
        Err(e) => return Err(e.into()),
    };

    let file: StoreFile = match serde_json::from_slice(&raw) {
        Ok(file) => file,
        Err(e) => {
            let backup = corrupt_backup_path(path);
            warn!(
                "Timezone store {} is unreadable ({}); moving it to {} and starting empty",
                path.display(),
                e,
                backup.display()
            );
            tokio::fs::rename(path, &backup).await?;
            return Ok(GuildMap::new());
        }
    };

    if file.version != STORE_VERSION {
        warn!(
            "Timezone store {} has version {}, expected {}; loading anyway",
            path.display(),
            file.version,
            STORE_VERSION
        );
    }

    let mut guilds = GuildMap::new();
    for record in file.records {
        let members = guilds.entry(record.guild_id).or_default();
        // a later duplicate wins and takes the newer position
        members.retain(|r| r.user_id != record.user_id);
        members.push(record);
    }
    Ok(guilds)
}

fn corrupt_backup_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "timezones.json".to_string());
    path.with_file_name(format!("{file_name}.corrupt-{}", Utc::now().timestamp()))
}

async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "timezones.json".to_string());
    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{file_name}.{stamp}.tmp"));

    let written = async {
        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&temp_path, path).await
    }
    .await;

    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(guild: u64, user: u64, name: &str, tz: chrono_tz::Tz) -> TimezoneRecord {
        TimezoneRecord::new(Id::new(guild), Id::new(user), name, tz, "Somewhere")
    }

    #[tokio::test]
    async fn test_open_missing_file_starts_empty() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let repo = JsonTimezoneRepository::open(dir.path().join("nested/tz.json")).await?;
        assert_eq!(repo.count(Id::new(1)).await?, 0);
        assert!(repo.get(Id::new(1), Id::new(2)).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_persists_and_reloads_in_order() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("data/tz.json");

        {
            let repo = JsonTimezoneRepository::open(&path).await?;
            repo.upsert(&record(1, 10, "alice", chrono_tz::Europe::London)).await?;
            repo.upsert(&record(1, 11, "bob", chrono_tz::Asia::Tokyo)).await?;
            repo.upsert(&record(2, 10, "alice", chrono_tz::America::Chicago)).await?;
        }
        assert!(path.exists(), "store file should be created with its directory");

        let repo = JsonTimezoneRepository::open(&path).await?;
        let names: Vec<_> = repo
            .list_recent(Id::new(1), 10)
            .await?
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["alice", "bob"]);

        let other = repo.get(Id::new(2), Id::new(10)).await?.expect("guild 2 record");
        assert_eq!(other.timezone, chrono_tz::America::Chicago);
        Ok(())
    }

    #[tokio::test]
    async fn test_reregister_moves_to_newest() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let repo = JsonTimezoneRepository::open(dir.path().join("tz.json")).await?;

        repo.upsert(&record(1, 10, "alice", chrono_tz::Europe::London)).await?;
        repo.upsert(&record(1, 11, "bob", chrono_tz::Asia::Tokyo)).await?;
        repo.upsert(&record(1, 10, "alice", chrono_tz::Europe::Paris)).await?;

        assert_eq!(repo.count(Id::new(1)).await?, 2);
        let recent = repo.list_recent(Id::new(1), 1).await?;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].user_id, Id::new(10));
        assert_eq!(recent[0].timezone, chrono_tz::Europe::Paris);
        Ok(())
    }

    #[tokio::test]
    async fn test_newer_version_is_loaded_anyway() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tz.json");
        let raw = r#"{
            "version": 2,
            "records": [
                { "guild_id": "1", "user_id": "10", "name": "alice",
                  "timezone": "Europe/London", "country": "UK",
                  "set_at": "2024-06-01T12:00:00Z" },
                { "guild_id": "1", "user_id": "11", "name": "bob",
                  "timezone": "Asia/Tokyo", "country": "Japan",
                  "set_at": "2024-06-01T12:05:00Z" }
            ]
        }"#;
        std::fs::write(&path, raw)?;

        let repo = JsonTimezoneRepository::open(&path).await?;
        assert!(path.exists(), "a readable file is never moved aside");
        assert_eq!(repo.count(Id::new(1)).await?, 2);
        let rec = repo.get(Id::new(1), Id::new(11)).await?.expect("bob reloaded");
        assert_eq!(rec.timezone, chrono_tz::Asia::Tokyo);
        assert_eq!(rec.country, "Japan");
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_temp_file() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        // the target is a directory, so the final rename cannot succeed
        let path = dir.path().join("tz.json");
        std::fs::create_dir(&path)?;
        std::fs::write(path.join("keep"), b"x")?;

        assert!(write_atomically(&path, b"{}").await.is_err());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_file_is_moved_aside() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tz.json");
        std::fs::write(&path, b"{ not json")?;

        let repo = JsonTimezoneRepository::open(&path).await?;
        assert_eq!(repo.count(Id::new(1)).await?, 0);
        assert!(!path.exists());

        let backups: Vec<_> = std::fs::read_dir(dir.path())?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("tz.json.corrupt-"))
            .collect();
        assert_eq!(backups.len(), 1);
        Ok(())
    }
}
