//! Pure eligibility rules. Nothing here touches storage.
//!
//! Counting and picking work on the tier's numeric range minus the blocked numbers
//! (excluded or already won) that fall inside it, so their cost follows the size of
//! the ledger and exclusion list rather than the width of the range.

use lottery_types::{PoolRange, PrizeTier, Settings, Winner, format_ticket};
use rand::Rng;

/// A tier's range together with the blocked numbers inside it, ascending and deduplicated.
struct Eligibility {
    range: PoolRange,
    blocked: Vec<u32>,
}

impl Eligibility {
    fn new(tier: PrizeTier, settings: &Settings, winners: &[Winner]) -> Self {
        let range = settings.tier(tier).pool_range;
        let mut blocked: Vec<u32> = winners
            .iter()
            .map(|w| w.number.as_str())
            .chain(settings.excluded_numbers.iter().map(String::as_str))
            .filter_map(|ticket| {
                let number: u32 = ticket.parse().ok()?;
                // "+7" and unpadded "7" parse but never match a rendered ticket.
                (range.numbers().contains(&number) && format_ticket(number) == ticket)
                    .then_some(number)
            })
            .collect();
        blocked.sort_unstable();
        blocked.dedup();
        Self { range, blocked }
    }

    fn count(&self) -> u64 {
        self.range.len() as u64 - self.blocked.len() as u64
    }

    /// The `index`-th eligible ticket in ascending order.
    fn nth(&self, index: u64) -> Option<String> {
        if index >= self.count() {
            return None;
        }
        let mut candidate = u64::from(self.range.start) + index;
        for &number in &self.blocked {
            if u64::from(number) > candidate {
                break;
            }
            candidate += 1;
        }
        u32::try_from(candidate).ok().map(format_ticket)
    }

    fn into_tickets(self) -> impl Iterator<Item = String> {
        let Self { range, blocked } = self;
        range
            .numbers()
            .filter(move |number| blocked.binary_search(number).is_err())
            .map(format_ticket)
    }
}

/// Eligible tickets for operator display: the total plus the first few in ascending order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolPreview {
    pub total: u64,
    pub tickets: Vec<String>,
}

impl PoolPreview {
    pub fn hidden(&self) -> u64 {
        self.total - self.tickets.len() as u64
    }
}

/// Tickets in the tier's range that have not won in any tier and are not excluded,
/// in ascending order.
pub fn compute_eligible_pool(
    tier: PrizeTier,
    settings: &Settings,
    winners: &[Winner],
) -> Vec<String> {
    Eligibility::new(tier, settings, winners)
        .into_tickets()
        .collect()
}

/// Size of [`compute_eligible_pool`] without building it.
pub fn eligible_count(tier: PrizeTier, settings: &Settings, winners: &[Winner]) -> u64 {
    Eligibility::new(tier, settings, winners).count()
}

pub fn preview(
    tier: PrizeTier,
    settings: &Settings,
    winners: &[Winner],
    limit: usize,
) -> PoolPreview {
    let eligibility = Eligibility::new(tier, settings, winners);
    let total = eligibility.count();
    PoolPreview {
        total,
        tickets: eligibility.into_tickets().take(limit).collect(),
    }
}

pub fn tier_winner_count(tier: PrizeTier, winners: &[Winner]) -> usize {
    winners.iter().filter(|w| w.tier == tier).count()
}

pub fn has_capacity(tier: PrizeTier, settings: &Settings, winners: &[Winner]) -> bool {
    tier_winner_count(tier, winners) < settings.tier(tier).count as usize
}

pub fn remaining_count(tier: PrizeTier, settings: &Settings, winners: &[Winner]) -> u32 {
    let drawn = tier_winner_count(tier, winners);
    (settings.tier(tier).count as usize).saturating_sub(drawn) as u32
}

pub fn can_draw(tier: PrizeTier, settings: &Settings, winners: &[Winner]) -> bool {
    has_capacity(tier, settings, winners) && eligible_count(tier, settings, winners) > 0
}

/// Uniform pick over the tier's eligible tickets; `None` when there are none.
pub fn pick<R: Rng + ?Sized>(
    tier: PrizeTier,
    settings: &Settings,
    winners: &[Winner],
    rng: &mut R,
) -> Option<String> {
    let eligibility = Eligibility::new(tier, settings, winners);
    let count = eligibility.count();
    if count == 0 {
        return None;
    }
    eligibility.nth(rng.gen_range(0..count))
}
