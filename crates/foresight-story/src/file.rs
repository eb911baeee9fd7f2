//! File-backed story store — whole-file JSON with atomic replacement.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{StoryError, StoryResult};
use crate::types::IncidentStory;

const STORE_FILE: &str = "stories.json";

/// Story store persisting every record into one JSON document.
///
/// Writes go through read-modify-write of the whole file, replaced
/// atomically via a temp file and rename so a crashed or concurrent writer
/// never leaves a torn document. An in-process mutex serializes writers
/// within this process.
pub struct FileStoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStoryStore {
    /// Open (or create) the store under the given directory.
    pub fn open(dir: &Path) -> StoryResult<Self> {
        std::fs::create_dir_all(dir).map_err(|e| StoryError::Open(e.to_string()))?;
        let path = dir.join(STORE_FILE);
        debug!(?path, "file story store opened");
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Insert or replace a story under its id.
    pub fn save(&self, story: &IncidentStory) -> StoryResult<()> {
        let _guard = self.write_lock.lock().expect("story write lock poisoned");

        let mut stories = self.read_all()?;
        stories.insert(story.story_id.clone(), story.clone());
        self.replace_file(&stories)?;

        debug!(story_id = %story.story_id, "story saved");
        Ok(())
    }

    /// Load a story by id.
    pub fn load(&self, story_id: &str) -> StoryResult<Option<IncidentStory>> {
        let stories = self.read_all()?;
        Ok(stories.get(story_id).cloned())
    }

    /// All stored stories, ordered by id.
    pub fn list(&self) -> StoryResult<Vec<IncidentStory>> {
        let stories = self.read_all()?;
        Ok(stories.into_values().collect())
    }

    fn read_all(&self) -> StoryResult<BTreeMap<String, IncidentStory>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| StoryError::Deserialize(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(StoryError::Read(e.to_string())),
        }
    }

    /// Write the whole document to a temp file, then rename over the store.
    fn replace_file(&self, stories: &BTreeMap<String, IncidentStory>) -> StoryResult<()> {
        let bytes =
            serde_json::to_vec_pretty(stories).map_err(|e| StoryError::Serialize(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &bytes).map_err(|e| StoryError::Write(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoryError::Write(e.to_string()))?;
        Ok(())
    }
}
