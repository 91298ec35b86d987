use chrono::Utc;
use log::{debug, info, warn};
use lottery_types::{PrizeTier, Settings, Winner, encode_uid, normalize_ticket, winner_uid};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use winner_ledger::{KeyValueStore, LotteryStore};

use crate::{
    error::{DrawError, DrawResult},
    pool::{self, PoolPreview},
    summary::{DrawSummary, TierSummary},
};

/// Draws winners against an injected store.
///
/// The engine keeps no lottery state: every call re-reads settings and the ledger. A draw
/// holds the rng lock across read pool -> pick -> append, so draws through one engine never
/// interleave. Separate processes sharing a state directory are not coordinated.
pub struct DrawEngine<S, R = Pcg64> {
    store: LotteryStore<S>,
    rng: Mutex<R>,
}

impl<S: KeyValueStore> DrawEngine<S, Pcg64> {
    pub fn new(store: S) -> Self {
        Self::with_rng(store, Pcg64::from_entropy())
    }

    pub fn seeded(store: S, seed: u64) -> Self {
        Self::with_rng(store, Pcg64::seed_from_u64(seed))
    }
}

impl<S: KeyValueStore, R: Rng> DrawEngine<S, R> {
    pub fn with_rng(store: S, rng: R) -> Self {
        Self {
            store: LotteryStore::new(store),
            rng: Mutex::new(rng),
        }
    }

    pub fn store(&self) -> &LotteryStore<S> {
        &self.store
    }

    pub fn load_settings(&self) -> DrawResult<Settings> {
        Ok(self.store.load_settings()?)
    }

    pub fn save_settings(&self, settings: &Settings) -> DrawResult<()> {
        Ok(self.store.save_settings(settings)?)
    }

    pub fn load_winners(&self) -> DrawResult<Vec<Winner>> {
        Ok(self.store.load_winners()?)
    }

    pub fn clear_winners(&self) -> DrawResult<()> {
        Ok(self.store.clear_winners()?)
    }

    pub fn eligible_pool(&self, tier: PrizeTier) -> DrawResult<Vec<String>> {
        let (settings, winners) = self.snapshot()?;
        Ok(pool::compute_eligible_pool(tier, &settings, &winners))
    }

    pub fn eligible_count(&self, tier: PrizeTier) -> DrawResult<u64> {
        let (settings, winners) = self.snapshot()?;
        Ok(pool::eligible_count(tier, &settings, &winners))
    }

    /// Eligible total plus at most `limit` tickets, in ascending order.
    pub fn pool_preview(&self, tier: PrizeTier, limit: usize) -> DrawResult<PoolPreview> {
        let (settings, winners) = self.snapshot()?;
        Ok(pool::preview(tier, &settings, &winners, limit))
    }

    pub fn can_draw(&self, tier: PrizeTier) -> DrawResult<bool> {
        let (settings, winners) = self.snapshot()?;
        Ok(pool::can_draw(tier, &settings, &winners))
    }

    pub fn remaining_count(&self, tier: PrizeTier) -> DrawResult<u32> {
        let (settings, winners) = self.snapshot()?;
        Ok(pool::remaining_count(tier, &settings, &winners))
    }

    /// Draw one winner for `tier`, stamped with the current time.
    pub fn draw(&self, tier: PrizeTier) -> DrawResult<Winner> {
        self.draw_at(tier, Utc::now().timestamp_millis())
    }

    /// Draw one winner for `tier` stamped with `timestamp_ms`. On any error the ledger is
    /// left as it was.
    pub fn draw_at(&self, tier: PrizeTier, timestamp_ms: i64) -> DrawResult<Winner> {
        let mut rng = self.rng.lock();
        let (settings, winners) = self.snapshot()?;

        if !pool::has_capacity(tier, &settings, &winners) {
            let count = settings.tier(tier).count;
            warn!("refusing draw for {tier}: capacity of {count} reached");
            return Err(DrawError::TierCapacityReached { tier, count });
        }

        debug!(
            "{tier} pool has {} eligible tickets",
            pool::eligible_count(tier, &settings, &winners)
        );
        let Some(number) = pool::pick(tier, &settings, &winners, &mut *rng) else {
            warn!("refusing draw for {tier}: pool exhausted");
            return Err(DrawError::PoolExhausted { tier });
        };

        let nonce = rng.next_u64();
        let id = encode_uid(&winner_uid(tier, &number, timestamp_ms, nonce));
        let winner = Winner::new(id, number, tier, timestamp_ms);
        let winners = self.store.append_winner(winner.clone())?;
        info!(
            "drew {} for {tier} ({} of {})",
            winner.number,
            pool::tier_winner_count(tier, &winners),
            settings.tier(tier).count
        );
        Ok(winner)
    }

    /// Look up the winner holding `raw` (normalized like operator input).
    pub fn find_winner(&self, raw: &str) -> DrawResult<Option<Winner>> {
        let number = normalize_ticket(raw)?;
        Ok(self
            .store
            .load_winners()?
            .into_iter()
            .find(|w| w.number == number))
    }

    /// The tier's winners, most recent first. Ledger order is draw order.
    pub fn winners_for_tier(&self, tier: PrizeTier) -> DrawResult<Vec<Winner>> {
        Ok(self
            .store
            .load_winners()?
            .into_iter()
            .rev()
            .filter(|w| w.tier == tier)
            .collect())
    }

    pub fn tier_summary(&self, tier: PrizeTier) -> DrawResult<TierSummary> {
        let (settings, winners) = self.snapshot()?;
        Ok(TierSummary::from_state(tier, &settings, &winners))
    }

    pub fn summary(&self) -> DrawResult<DrawSummary> {
        let (settings, winners) = self.snapshot()?;
        Ok(DrawSummary::from_state(&settings, &winners))
    }

    fn snapshot(&self) -> DrawResult<(Settings, Vec<Winner>)> {
        Ok((self.store.load_settings()?, self.store.load_winners()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use winner_ledger::{MemoryStore, WINNERS_KEY};

    fn engine_with(settings: &Settings) -> DrawEngine<Arc<MemoryStore>> {
        let engine = DrawEngine::seeded(Arc::new(MemoryStore::new()), 42);
        engine.save_settings(settings).unwrap();
        engine
    }

    #[test]
    fn draw_appends_exactly_one_winner() {
        let engine = engine_with(&Settings::default());
        let winner = engine.draw_at(PrizeTier::Second, 1_000).unwrap();
        let ledger = engine.load_winners().unwrap();
        assert_eq!(ledger, vec![winner.clone()]);
        assert_eq!(winner.tier, PrizeTier::Second);
        assert_eq!(winner.timestamp, 1_000);
        assert_eq!(winner.id.len(), 32);
    }

    #[test]
    fn failed_draw_leaves_ledger_untouched() {
        let mut settings = Settings::default();
        settings.set_pool_range(PrizeTier::First, 1, 1).unwrap();
        settings.exclude_number("1").unwrap();
        let engine = engine_with(&settings);

        assert!(matches!(
            engine.draw(PrizeTier::First),
            Err(DrawError::PoolExhausted {
                tier: PrizeTier::First
            })
        ));
        assert!(engine.load_winners().unwrap().is_empty());
        assert!(engine.store().backend().get(WINNERS_KEY).unwrap().is_none());
    }

    #[test]
    fn draw_refuses_when_capacity_reached() {
        let mut settings = Settings::default();
        settings.set_count(PrizeTier::First, 1).unwrap();
        let engine = engine_with(&settings);
        engine.draw(PrizeTier::First).unwrap();
        match engine.draw(PrizeTier::First) {
            Err(DrawError::TierCapacityReached { tier, count }) => {
                assert_eq!(tier, PrizeTier::First);
                assert_eq!(count, 1);
            }
            other => panic!("expected capacity error, got {other:?}"),
        }
        assert_eq!(engine.load_winners().unwrap().len(), 1);
    }

    #[test]
    fn same_seed_draws_same_numbers() {
        let settings = Settings::default();
        let a = engine_with(&settings);
        let b = engine_with(&settings);
        for tier in PrizeTier::ALL {
            assert_eq!(a.draw_at(tier, 5).unwrap(), b.draw_at(tier, 5).unwrap());
        }
    }

    #[test]
    fn search_and_tier_listing() {
        let engine = engine_with(&Settings::default());
        let first = engine.draw_at(PrizeTier::Third, 10).unwrap();
        let second = engine.draw_at(PrizeTier::Third, 20).unwrap();
        engine.draw_at(PrizeTier::First, 30).unwrap();

        let listed = engine.winners_for_tier(PrizeTier::Third).unwrap();
        assert_eq!(listed, vec![second.clone(), first.clone()]);

        let bare = first.number.trim_start_matches('0');
        assert_eq!(engine.find_winner(bare).unwrap(), Some(first));
        assert!(matches!(
            engine.find_winner("nope"),
            Err(DrawError::Settings(_))
        ));
        assert_eq!(engine.remaining_count(PrizeTier::Third).unwrap(), 8);
    }

    #[test]
    fn listing_keeps_draw_order_within_one_millisecond() {
        let engine = engine_with(&Settings::default());
        let earlier = engine.draw_at(PrizeTier::Second, 500).unwrap();
        let later = engine.draw_at(PrizeTier::Second, 500).unwrap();
        assert_eq!(
            engine.winners_for_tier(PrizeTier::Second).unwrap(),
            vec![later, earlier]
        );
    }

    #[test]
    fn wide_range_draws_without_listing_the_pool() {
        let mut settings = Settings::default();
        settings.set_pool_range(PrizeTier::First, 1, u32::MAX).unwrap();
        settings.exclude_number("2").unwrap();
        let engine = engine_with(&settings);

        assert!(engine.can_draw(PrizeTier::First).unwrap());
        assert_eq!(
            engine.eligible_count(PrizeTier::First).unwrap(),
            u64::from(u32::MAX) - 1
        );
        let winner = engine.draw(PrizeTier::First).unwrap();
        assert_ne!(winner.number, "002");
        assert_eq!(
            engine.eligible_count(PrizeTier::First).unwrap(),
            u64::from(u32::MAX) - 2
        );

        let preview = engine.pool_preview(PrizeTier::Second, 2).unwrap();
        let full = engine.eligible_pool(PrizeTier::Second).unwrap();
        assert_eq!(preview.total, full.len() as u64);
        assert_eq!(preview.tickets, full[..2].to_vec());
        assert!(!full.contains(&"002".to_string()));
    }
}
