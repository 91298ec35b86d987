//! Draw engine for the tiered prize lottery.
//!
//! - [`pool`]: pure eligibility rules over a settings/ledger snapshot.
//! - [`DrawEngine`]: store-backed draws, eligibility checks and ledger queries.
//! - [`DrawSummary`] / [`TierSummary`]: per-tier status for operators.

pub mod engine;
pub mod error;
pub mod pool;
pub mod summary;

pub use engine::DrawEngine;
pub use error::{DrawError, DrawResult};
pub use pool::{PoolPreview, can_draw, compute_eligible_pool, eligible_count};
pub use summary::{DrawSummary, TierSummary};
