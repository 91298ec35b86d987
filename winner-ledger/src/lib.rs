//! Persistence for the lottery: settings and the winner ledger.
//!
//! The crate exposes:
//! - [`KeyValueStore`]: the durable backend seam, with [`FileStore`] (one json file per
//!   record under a state directory) and [`MemoryStore`] (test double).
//! - [`LotteryStore`]: typed load/save of the settings record and the winner ledger.

pub mod config;
pub mod error;
pub mod ledger;
pub mod storage;

pub use config::LedgerConfig;
pub use error::{LedgerError, Result};
pub use ledger::{LotteryStore, SETTINGS_KEY, WINNERS_KEY};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
