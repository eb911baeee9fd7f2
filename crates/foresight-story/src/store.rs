//! StoryStore — backend selection and the redb-backed store.
//!
//! `StoryStore` is the caller-facing type: it assigns ids, then delegates
//! to whichever backend configuration selected. The redb backend
//! JSON-serializes records into `&[u8]` value columns; the file backend
//! lives in [`crate::file`].

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;
use uuid::Uuid;

use foresight_core::config::{StoryBackend, StoryConfig};

use crate::error::{StoryError, StoryResult};
use crate::file::FileStoryStore;
use crate::tables::STORIES;
use crate::types::IncidentStory;

/// Convert any `Display` error into a `StoryError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StoryError::$variant(e.to_string())
    };
}

/// redb-backed story store.
#[derive(Clone)]
pub struct DbStoryStore {
    db: Arc<Database>,
}

impl DbStoryStore {
    /// Open (or create) a persistent store at the given path.
    pub fn open(path: &Path) -> StoryResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "db story store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store (for testing).
    pub fn open_in_memory() -> StoryResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        Ok(store)
    }

    fn ensure_tables(&self) -> StoryResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(STORIES).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Insert or replace a story under its id.
    pub fn save(&self, story: &IncidentStory) -> StoryResult<()> {
        let value = serde_json::to_vec(story).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(STORIES).map_err(map_err!(Table))?;
            table
                .insert(story.story_id.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(story_id = %story.story_id, "story saved");
        Ok(())
    }

    /// Load a story by id.
    pub fn load(&self, story_id: &str) -> StoryResult<Option<IncidentStory>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(STORIES).map_err(map_err!(Table))?;
        match table.get(story_id).map_err(map_err!(Read))? {
            Some(guard) => {
                let story: IncidentStory =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(story))
            }
            None => Ok(None),
        }
    }

    /// All stored stories.
    pub fn list(&self) -> StoryResult<Vec<IncidentStory>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(STORIES).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let story: IncidentStory =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(story);
        }
        Ok(results)
    }
}

/// Caller-facing story store with a configuration-selected backend.
pub enum StoryStore {
    File(FileStoryStore),
    Db(DbStoryStore),
}

impl StoryStore {
    /// Construct the backend named by configuration.
    ///
    /// Returns `None` when neither the environment nor the config selects
    /// a backend.
    pub fn from_config(config: &StoryConfig) -> StoryResult<Option<Self>> {
        match config.backend() {
            Some(StoryBackend::File(dir)) => Ok(Some(Self::File(FileStoryStore::open(&dir)?))),
            Some(StoryBackend::Database(path)) => Ok(Some(Self::Db(DbStoryStore::open(&path)?))),
            None => Ok(None),
        }
    }

    /// Persist a story, assigning a fresh id when the payload has none.
    ///
    /// Returns the stored payload with its id set. A payload that already
    /// carries an id overwrites the stored record in place. An id that
    /// cannot be produced is an error surfaced to the caller: a story
    /// without a stable id cannot be retried idempotently.
    pub fn save(&self, mut story: IncidentStory) -> StoryResult<IncidentStory> {
        if story.story_id.is_empty() {
            let id = Uuid::new_v4().to_string();
            if id.is_empty() {
                return Err(StoryError::Id("generated id was empty".to_string()));
            }
            story.story_id = id;
        }

        match self {
            Self::File(store) => store.save(&story)?,
            Self::Db(store) => store.save(&story)?,
        }
        Ok(story)
    }

    /// Load a story by id.
    pub fn load(&self, story_id: &str) -> StoryResult<Option<IncidentStory>> {
        match self {
            Self::File(store) => store.load(story_id),
            Self::Db(store) => store.load(story_id),
        }
    }

    /// All stored stories.
    pub fn list(&self) -> StoryResult<Vec<IncidentStory>> {
        match self {
            Self::File(store) => store.list(),
            Self::Db(store) => store.list(),
        }
    }
}
