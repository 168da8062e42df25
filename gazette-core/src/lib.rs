//! Gazette Games core - deterministic daily-round scheduling for the
//! newsroom's casual puzzle games.
//!
//! A seeded generator, a calendar day key, and a shuffle engine carve a
//! content pool into the same ordered rounds for every player on a given
//! day; a locally persisted ledger gates how many rounds each player has
//! left and rolls over at the day boundary.

pub mod config;
pub mod daykey;
pub mod error;
pub mod ledger;
pub mod rng;
pub mod rounds;
pub mod session;
pub mod shuffle;
pub mod storage;
pub mod types;

pub use config::GameConfig;
pub use daykey::{Clock, DayBoundary, DayKey, FixedClock, SystemClock};
pub use error::{GazetteError, Result};
pub use ledger::ProgressLedger;
pub use rng::SeededRandom;
pub use rounds::{DailyRoundBuilder, RoundShape, Variant};
pub use session::{GamePhase, GameSession};
pub use storage::{MemoryStore, ProgressStore, SqliteStore};
pub use types::{ContentItem, DailyRoundSet, ProgressRecord, ProgressSnapshot, Round};
