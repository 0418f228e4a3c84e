use std::path::{Path, PathBuf};

use chrono::Utc;
use sled::transaction::{
    ConflictableTransactionError, ConflictableTransactionResult, TransactionError,
    TransactionalTree,
};
use sled::{IVec, Transactional};

use crate::rpg::errors::RpgError;
use crate::rpg::types::{
    ActivityEntry, ExperienceRecord, PlayerSheet, ProjectRecord, QuestRecord, SkillRecord,
    ACTIVITY_SCHEMA_VERSION, CONTENT_SCHEMA_VERSION, PLAYER_SCHEMA_VERSION, QUEST_SCHEMA_VERSION,
    SKILL_SCHEMA_VERSION,
};

const TREE_PRIMARY: &str = "rpg";
const TREE_ACTIVITY: &str = "rpg_activity";
const TREE_CONTENT: &str = "rpg_content";

/// Singleton player sheet lives under a fixed key.
const PLAYER_KEY: &[u8] = b"player:main";
const ACTIVITY_PREFIX: &[u8] = b"activity:";

fn next_timestamp_nanos() -> i64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros() * 1000)
}

fn quest_key(quest_id: &str) -> Vec<u8> {
    format!("quests:{}", quest_id).into_bytes()
}

fn skill_key(skill_id: &str) -> Vec<u8> {
    format!("skills:{}", skill_id).into_bytes()
}

fn project_key(project_id: &str) -> Vec<u8> {
    format!("projects:{}", project_id).into_bytes()
}

fn experience_key(experience_id: &str) -> Vec<u8> {
    format!("experience:{}", experience_id).into_bytes()
}

/// Activity keys are zero-padded nanosecond timestamps so a prefix scan
/// yields chronological order; the record id breaks ties.
fn activity_key(nanos: i64, entry_id: &str) -> Vec<u8> {
    format!("activity:{:020}:{}", nanos, entry_id).into_bytes()
}

fn decode_player(bytes: &IVec) -> Result<PlayerSheet, RpgError> {
    let sheet: PlayerSheet = bincode::deserialize(bytes)?;
    if sheet.schema_version != PLAYER_SCHEMA_VERSION {
        return Err(RpgError::SchemaMismatch {
            entity: "player",
            expected: PLAYER_SCHEMA_VERSION,
            found: sheet.schema_version,
        });
    }
    Ok(sheet)
}

fn decode_quest(bytes: &IVec) -> Result<QuestRecord, RpgError> {
    let quest: QuestRecord = bincode::deserialize(bytes)?;
    if quest.schema_version != QUEST_SCHEMA_VERSION {
        return Err(RpgError::SchemaMismatch {
            entity: "quest",
            expected: QUEST_SCHEMA_VERSION,
            found: quest.schema_version,
        });
    }
    Ok(quest)
}

fn decode_skill(bytes: &IVec) -> Result<SkillRecord, RpgError> {
    let skill: SkillRecord = bincode::deserialize(bytes)?;
    if skill.schema_version != SKILL_SCHEMA_VERSION {
        return Err(RpgError::SchemaMismatch {
            entity: "skill",
            expected: SKILL_SCHEMA_VERSION,
            found: skill.schema_version,
        });
    }
    Ok(skill)
}

fn decode_activity(bytes: &IVec) -> Result<ActivityEntry, RpgError> {
    let entry: ActivityEntry = bincode::deserialize(bytes)?;
    if entry.schema_version != ACTIVITY_SCHEMA_VERSION {
        return Err(RpgError::SchemaMismatch {
            entity: "activity",
            expected: ACTIVITY_SCHEMA_VERSION,
            found: entry.schema_version,
        });
    }
    Ok(entry)
}

fn abort<T>(err: RpgError) -> ConflictableTransactionResult<T, RpgError> {
    Err(ConflictableTransactionError::Abort(err))
}

fn abort_on<E: Into<RpgError>>(err: E) -> ConflictableTransactionError<RpgError> {
    ConflictableTransactionError::Abort(err.into())
}

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct RpgStoreBuilder {
    path: PathBuf,
}

impl RpgStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open(self) -> Result<RpgStore, RpgError> {
        RpgStore::open(self.path)
    }
}

/// Sled-backed persistence for the player sheet, quests, skills, the activity
/// feed, and portfolio content. The store is always constructed and passed
/// explicitly; operations that cannot reach the backing files fail fast with
/// [`RpgError::StoreUnavailable`] instead of silently no-op-ing.
pub struct RpgStore {
    _db: sled::Db,
    primary: sled::Tree,
    activity: sled::Tree,
    content: sled::Tree,
}

impl RpgStore {
    /// Open (or create) the progression store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RpgError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref).map_err(|e| {
            RpgError::StoreUnavailable(format!("{}: {}", path_ref.display(), e))
        })?;
        let primary = db.open_tree(TREE_PRIMARY)?;
        let activity = db.open_tree(TREE_ACTIVITY)?;
        let content = db.open_tree(TREE_CONTENT)?;
        Ok(Self {
            _db: db,
            primary,
            activity,
            content,
        })
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, RpgError> {
        Ok(bincode::serialize(value)?)
    }

    /// Insert or update the singleton player sheet.
    pub fn put_player(&self, mut sheet: PlayerSheet) -> Result<(), RpgError> {
        sheet.schema_version = PLAYER_SCHEMA_VERSION;
        sheet.touch();
        let bytes = Self::serialize(&sheet)?;
        self.primary.insert(PLAYER_KEY, bytes)?;
        self.primary.flush()?;
        Ok(())
    }

    /// Fetch the singleton player sheet.
    pub fn get_player(&self) -> Result<PlayerSheet, RpgError> {
        let Some(bytes) = self.primary.get(PLAYER_KEY)? else {
            return Err(RpgError::NotFound("player sheet".to_string()));
        };
        decode_player(&bytes)
    }

    pub fn player_exists(&self) -> Result<bool, RpgError> {
        Ok(self.primary.contains_key(PLAYER_KEY)?)
    }

    /// Insert or update a quest record.
    pub fn put_quest(&self, mut quest: QuestRecord) -> Result<(), RpgError> {
        quest.schema_version = QUEST_SCHEMA_VERSION;
        let key = quest_key(&quest.id);
        let bytes = Self::serialize(&quest)?;
        self.primary.insert(key, bytes)?;
        self.primary.flush()?;
        Ok(())
    }

    pub fn get_quest(&self, quest_id: &str) -> Result<QuestRecord, RpgError> {
        let Some(bytes) = self.primary.get(quest_key(quest_id))? else {
            return Err(RpgError::NotFound(format!("quest: {}", quest_id)));
        };
        decode_quest(&bytes)
    }

    pub fn quest_exists(&self, quest_id: &str) -> Result<bool, RpgError> {
        Ok(self.primary.contains_key(quest_key(quest_id))?)
    }

    /// List all quest records in id order.
    pub fn list_quests(&self) -> Result<Vec<QuestRecord>, RpgError> {
        let mut quests = Vec::new();
        for entry in self.primary.scan_prefix(b"quests:") {
            let (_, bytes) = entry?;
            quests.push(decode_quest(&bytes)?);
        }
        Ok(quests)
    }

    /// Insert or update a skill record.
    pub fn put_skill(&self, mut skill: SkillRecord) -> Result<(), RpgError> {
        skill.schema_version = SKILL_SCHEMA_VERSION;
        let key = skill_key(&skill.id);
        let bytes = Self::serialize(&skill)?;
        self.primary.insert(key, bytes)?;
        self.primary.flush()?;
        Ok(())
    }

    pub fn get_skill(&self, skill_id: &str) -> Result<SkillRecord, RpgError> {
        let Some(bytes) = self.primary.get(skill_key(skill_id))? else {
            return Err(RpgError::NotFound(format!("skill: {}", skill_id)));
        };
        decode_skill(&bytes)
    }

    pub fn skill_exists(&self, skill_id: &str) -> Result<bool, RpgError> {
        Ok(self.primary.contains_key(skill_key(skill_id))?)
    }

    /// List all skill records in id order.
    pub fn list_skills(&self) -> Result<Vec<SkillRecord>, RpgError> {
        let mut skills = Vec::new();
        for entry in self.primary.scan_prefix(b"skills:") {
            let (_, bytes) = entry?;
            skills.push(decode_skill(&bytes)?);
        }
        Ok(skills)
    }

    /// Append one activity entry. Entries are keyed by timestamp so the feed
    /// reads back in chronological order; they are never updated or removed.
    pub fn append_activity(&self, entry: &ActivityEntry) -> Result<(), RpgError> {
        let key = activity_key(next_timestamp_nanos(), &entry.id);
        let bytes = Self::serialize(entry)?;
        self.activity.insert(key, bytes)?;
        self.activity.flush()?;
        Ok(())
    }

    /// Fetch up to `limit` activity entries, newest first.
    pub fn recent_activity(&self, limit: usize) -> Result<Vec<ActivityEntry>, RpgError> {
        let mut entries = Vec::new();
        for item in self.activity.scan_prefix(ACTIVITY_PREFIX).rev().take(limit) {
            let (_, bytes) = item?;
            entries.push(decode_activity(&bytes)?);
        }
        Ok(entries)
    }

    pub fn activity_count(&self) -> Result<usize, RpgError> {
        Ok(self.activity.scan_prefix(ACTIVITY_PREFIX).count())
    }

    /// Insert or update a portfolio project.
    pub fn put_project(&self, mut project: ProjectRecord) -> Result<(), RpgError> {
        project.schema_version = CONTENT_SCHEMA_VERSION;
        let key = project_key(&project.id);
        let bytes = Self::serialize(&project)?;
        self.content.insert(key, bytes)?;
        self.content.flush()?;
        Ok(())
    }

    pub fn project_exists(&self, project_id: &str) -> Result<bool, RpgError> {
        Ok(self.content.contains_key(project_key(project_id))?)
    }

    pub fn list_projects(&self) -> Result<Vec<ProjectRecord>, RpgError> {
        let mut projects = Vec::new();
        for entry in self.content.scan_prefix(b"projects:") {
            let (_, bytes) = entry?;
            projects.push(bincode::deserialize(&bytes)?);
        }
        Ok(projects)
    }

    /// Insert or update a timeline entry.
    pub fn put_experience(&self, mut experience: ExperienceRecord) -> Result<(), RpgError> {
        experience.schema_version = CONTENT_SCHEMA_VERSION;
        let key = experience_key(&experience.id);
        let bytes = Self::serialize(&experience)?;
        self.content.insert(key, bytes)?;
        self.content.flush()?;
        Ok(())
    }

    pub fn experience_exists(&self, experience_id: &str) -> Result<bool, RpgError> {
        Ok(self.content.contains_key(experience_key(experience_id))?)
    }

    pub fn list_experience(&self) -> Result<Vec<ExperienceRecord>, RpgError> {
        let mut entries = Vec::new();
        for entry in self.content.scan_prefix(b"experience:") {
            let (_, bytes) = entry?;
            entries.push(bincode::deserialize(&bytes)?);
        }
        Ok(entries)
    }

    /// Run `f` atomically over the progression records and the activity feed.
    /// Quest completion and skill unlock mutate two documents plus the feed;
    /// the whole read-modify-write runs in one sled transaction. Domain
    /// failures abort the transaction, so partial writes never land.
    pub fn transact<T, F>(&self, f: F) -> Result<T, RpgError>
    where
        F: Fn(&ProgressTx<'_>) -> ConflictableTransactionResult<T, RpgError>,
    {
        let result = (&self.primary, &self.activity).transaction(|(primary, activity)| {
            f(&ProgressTx { primary, activity })
        });
        match result {
            Ok(value) => {
                self.primary.flush()?;
                self.activity.flush()?;
                Ok(value)
            }
            Err(TransactionError::Abort(err)) => Err(err),
            Err(TransactionError::Storage(err)) => Err(RpgError::Sled(err)),
        }
    }
}

/// Transactional view over the progression records. Reads observe a
/// consistent snapshot; writes commit together or not at all.
pub struct ProgressTx<'a> {
    primary: &'a TransactionalTree,
    activity: &'a TransactionalTree,
}

impl ProgressTx<'_> {
    pub fn get_player(&self) -> ConflictableTransactionResult<Option<PlayerSheet>, RpgError> {
        let Some(bytes) = self.primary.get(PLAYER_KEY)? else {
            return Ok(None);
        };
        decode_player(&bytes).map(Some).map_err(abort_on)
    }

    pub fn put_player(&self, sheet: &PlayerSheet) -> ConflictableTransactionResult<(), RpgError> {
        let bytes = bincode::serialize(sheet).map_err(abort_on)?;
        self.primary.insert(PLAYER_KEY, bytes)?;
        Ok(())
    }

    pub fn get_quest(
        &self,
        quest_id: &str,
    ) -> ConflictableTransactionResult<Option<QuestRecord>, RpgError> {
        let Some(bytes) = self.primary.get(quest_key(quest_id))? else {
            return Ok(None);
        };
        decode_quest(&bytes).map(Some).map_err(abort_on)
    }

    pub fn put_quest(&self, quest: &QuestRecord) -> ConflictableTransactionResult<(), RpgError> {
        let bytes = bincode::serialize(quest).map_err(abort_on)?;
        self.primary.insert(quest_key(&quest.id), bytes)?;
        Ok(())
    }

    pub fn get_skill(
        &self,
        skill_id: &str,
    ) -> ConflictableTransactionResult<Option<SkillRecord>, RpgError> {
        let Some(bytes) = self.primary.get(skill_key(skill_id))? else {
            return Ok(None);
        };
        decode_skill(&bytes).map(Some).map_err(abort_on)
    }

    pub fn put_skill(&self, skill: &SkillRecord) -> ConflictableTransactionResult<(), RpgError> {
        let bytes = bincode::serialize(skill).map_err(abort_on)?;
        self.primary.insert(skill_key(&skill.id), bytes)?;
        Ok(())
    }

    pub fn append_activity(
        &self,
        entry: &ActivityEntry,
    ) -> ConflictableTransactionResult<(), RpgError> {
        let key = activity_key(next_timestamp_nanos(), &entry.id);
        let bytes = bincode::serialize(entry).map_err(abort_on)?;
        self.activity.insert(key, bytes)?;
        Ok(())
    }

    /// Abort the surrounding transaction with a domain error.
    pub fn fail<T>(&self, err: RpgError) -> ConflictableTransactionResult<T, RpgError> {
        abort(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpg::types::{ActivityKind, Attribute, PlayerIdentity};
    use tempfile::TempDir;

    #[test]
    fn store_round_trip_player() {
        let dir = TempDir::new().expect("tempdir");
        let store = RpgStoreBuilder::new(dir.path()).open().expect("store");
        let mut sheet = PlayerSheet::new(&PlayerIdentity::default());
        sheet.total_xp = 42;
        store.put_player(sheet.clone()).expect("put");
        let fetched = store.get_player().expect("get");
        assert_eq!(fetched.name, sheet.name);
        assert_eq!(fetched.total_xp, 42);
        assert_eq!(fetched.schema_version, PLAYER_SCHEMA_VERSION);
    }

    #[test]
    fn missing_player_reports_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let store = RpgStoreBuilder::new(dir.path()).open().expect("store");
        assert!(!store.player_exists().expect("exists"));
        assert!(matches!(store.get_player(), Err(RpgError::NotFound(_))));
    }

    #[test]
    fn store_round_trip_quest_and_skill() {
        let dir = TempDir::new().expect("tempdir");
        let store = RpgStoreBuilder::new(dir.path()).open().expect("store");

        let quest = QuestRecord::new("q1", "First Quest", "Do the thing", 100)
            .with_attribute_reward(Attribute::Technical, 25);
        store.put_quest(quest.clone()).expect("put quest");
        let fetched = store.get_quest("q1").expect("get quest");
        assert_eq!(fetched.title, quest.title);
        assert_eq!(fetched.attribute_reward[&Attribute::Technical], 25);

        let skill = SkillRecord::new("rust", "Rust", "systems", 3, 150)
            .with_attribute_bonus(Attribute::Intelligence, 2);
        store.put_skill(skill).expect("put skill");
        let fetched = store.get_skill("rust").expect("get skill");
        assert_eq!(fetched.required_level, 3);
        assert!(fetched.is_locked());
    }

    #[test]
    fn recent_activity_is_newest_first() {
        let dir = TempDir::new().expect("tempdir");
        let store = RpgStoreBuilder::new(dir.path()).open().expect("store");
        for i in 0..5 {
            let entry = ActivityEntry::new(format!("event {}", i), 0, false, ActivityKind::Quest);
            store.append_activity(&entry).expect("append");
        }
        let recent = store.recent_activity(3).expect("recent");
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].message, "event 4");
        assert_eq!(recent[2].message, "event 2");
        assert_eq!(store.activity_count().expect("count"), 5);
    }

    #[test]
    fn transact_aborts_leave_no_writes() {
        let dir = TempDir::new().expect("tempdir");
        let store = RpgStoreBuilder::new(dir.path()).open().expect("store");
        let result: Result<(), RpgError> = store.transact(|tx| {
            let entry = ActivityEntry::new("doomed".to_string(), 0, false, ActivityKind::Quest);
            tx.append_activity(&entry)?;
            tx.fail(RpgError::NotFound("boom".to_string()))
        });
        assert!(matches!(result, Err(RpgError::NotFound(_))));
        assert_eq!(store.activity_count().expect("count"), 0);
    }
}
