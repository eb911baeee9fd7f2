//! redb table definitions for the story store.

use redb::TableDefinition;

/// Incident stories keyed by `{story_id}`, values JSON-serialized.
pub const STORIES: TableDefinition<&str, &[u8]> = TableDefinition::new("stories");
