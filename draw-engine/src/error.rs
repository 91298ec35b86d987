use lottery_types::{PrizeTier, SettingsError};
use thiserror::Error;
use winner_ledger::LedgerError;

pub type DrawResult<T> = Result<T, DrawError>;

#[derive(Debug, Error)]
pub enum DrawError {
    #[error("no eligible ticket numbers remain for {tier}")]
    PoolExhausted { tier: PrizeTier },
    #[error("{tier} already has its {count} configured winner(s)")]
    TierCapacityReached { tier: PrizeTier, count: u32 },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
