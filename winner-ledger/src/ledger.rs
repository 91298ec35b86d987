use log::{info, warn};
use lottery_types::{Settings, Winner};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{LedgerError, Result},
    storage::KeyValueStore,
};

pub const SETTINGS_KEY: &str = "lottery_settings";
pub const WINNERS_KEY: &str = "lottery_winners";

/// Typed access to the two lottery records held in a [`KeyValueStore`].
///
/// Absent records load as defaults (settings) or an empty ledger (winners). Records that
/// fail to parse are treated the same way and reported with a warning, so a corrupt file
/// never blocks the operator.
pub struct LotteryStore<S> {
    store: S,
}

impl<S: KeyValueStore> LotteryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    pub fn load_settings(&self) -> Result<Settings> {
        Ok(load_record(&self.store, SETTINGS_KEY)?.unwrap_or_default())
    }

    /// Wholesale overwrite; callers validate before saving.
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        save_record(&self.store, SETTINGS_KEY, settings)?;
        info!("saved lottery settings '{}'", settings.title);
        Ok(())
    }

    pub fn load_winners(&self) -> Result<Vec<Winner>> {
        Ok(load_record(&self.store, WINNERS_KEY)?.unwrap_or_default())
    }

    pub fn save_winners(&self, winners: &[Winner]) -> Result<()> {
        save_record(&self.store, WINNERS_KEY, winners)
    }

    /// Append one winner and persist the ledger. Returns the ledger as stored.
    pub fn append_winner(&self, winner: Winner) -> Result<Vec<Winner>> {
        let mut winners = self.load_winners()?;
        winners.push(winner);
        self.save_winners(&winners)?;
        Ok(winners)
    }

    /// Drop every winner. Settings stay untouched.
    pub fn clear_winners(&self) -> Result<()> {
        self.store.remove(WINNERS_KEY)?;
        info!("cleared winner ledger");
        Ok(())
    }
}

fn load_record<S, T>(store: &S, key: &'static str) -> Result<Option<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!("ignoring malformed record {key}: {err}");
            Ok(None)
        }
    }
}

fn save_record<S, T>(store: &S, key: &'static str, value: &T) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw =
        serde_json::to_string_pretty(value).map_err(|source| LedgerError::Encode { key, source })?;
    store.put(key, &raw)
}
