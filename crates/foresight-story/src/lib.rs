//! foresight-story — durable incident narratives with stable identifiers.
//!
//! Stories are append-style narrative records a host attaches to alerts:
//! once saved, a story's id is stable and re-saving under it overwrites in
//! place. Persistence is pluggable and chosen at construction time from
//! configuration, transparent to callers:
//!
//! - **file** — one JSON document per directory, whole-file
//!   read-modify-write with write-temp-then-rename atomic replacement
//! - **redb** — embedded database, `&str` keys and JSON `&[u8]` values
//!
//! Both backends serve `save` / `load` / `list`; the in-memory redb
//! constructor exists for tests.

pub mod error;
pub mod file;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StoryError, StoryResult};
pub use file::FileStoryStore;
pub use store::{DbStoryStore, StoryStore};
pub use types::{IncidentStory, TimeWindow};
