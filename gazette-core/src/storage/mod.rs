pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;

/// The persisted local storage seam: a synchronous string-keyed key-value
/// store holding JSON-serialized progress records under game-specific keys.
///
/// There is exactly one logical writer per store (the current session);
/// concurrent processes are not coordinated and the last write wins.
pub trait ProgressStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
