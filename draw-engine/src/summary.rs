use std::fmt;

use lottery_types::{PrizeTier, Settings, Winner};

use crate::pool;

/// Point-in-time view of one tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierSummary {
    pub tier: PrizeTier,
    pub label: String,
    pub count: u32,
    pub winners: usize,
    pub remaining: u32,
    pub pool_size: u64,
    pub can_draw: bool,
}

impl TierSummary {
    pub fn from_state(tier: PrizeTier, settings: &Settings, winners: &[Winner]) -> Self {
        let config = settings.tier(tier);
        let pool_size = pool::eligible_count(tier, settings, winners);
        let remaining = pool::remaining_count(tier, settings, winners);
        Self {
            tier,
            label: config.label.clone(),
            count: config.count,
            winners: pool::tier_winner_count(tier, winners),
            remaining,
            pool_size,
            can_draw: remaining > 0 && pool_size > 0,
        }
    }
}

impl fmt::Display for TierSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>6} {:<16} winners={}/{}, remaining={}, pool={}, drawable={}",
            self.tier.as_str(),
            self.label,
            self.winners,
            self.count,
            self.remaining,
            self.pool_size,
            if self.can_draw { "yes" } else { "no" }
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawSummary {
    pub title: String,
    pub tiers: Vec<TierSummary>,
}

impl DrawSummary {
    pub fn from_state(settings: &Settings, winners: &[Winner]) -> Self {
        Self {
            title: settings.title.clone(),
            tiers: PrizeTier::ALL
                .into_iter()
                .map(|tier| TierSummary::from_state(tier, settings, winners))
                .collect(),
        }
    }

    pub fn total_winners(&self) -> usize {
        self.tiers.iter().map(|t| t.winners).sum()
    }

    /// `true` once no tier can be drawn any more.
    pub fn is_complete(&self) -> bool {
        self.tiers.iter().all(|t| !t.can_draw)
    }
}

impl fmt::Display for DrawSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} winners drawn)", self.title, self.total_winners())?;
        for tier in &self.tiers {
            writeln!(f, "  {tier}")?;
        }
        if self.is_complete() {
            writeln!(f, "  all tiers complete")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_each_tier() {
        let mut settings = Settings::default();
        settings.set_pool_range(PrizeTier::First, 1, 3).unwrap();
        let winners = vec![Winner::new("a".into(), "002".into(), PrizeTier::First, 0)];

        let summary = DrawSummary::from_state(&settings, &winners);
        assert_eq!(summary.tiers.len(), 3);
        let first = &summary.tiers[0];
        assert_eq!(first.tier, PrizeTier::First);
        assert_eq!(first.winners, 1);
        assert_eq!(first.remaining, 0);
        assert_eq!(first.pool_size, 2);
        assert!(!first.can_draw);

        let second = &summary.tiers[1];
        assert_eq!(second.pool_size, 998);
        assert!(second.can_draw);
        assert!(!summary.is_complete());
        assert_eq!(summary.total_winners(), 1);

        let rendered = summary.to_string();
        assert!(rendered.starts_with("Wedding Lottery (1 winners drawn)"));
        assert!(rendered.contains("winners=1/1, remaining=0, pool=2, drawable=no"));
        assert!(!rendered.contains("all tiers complete"));
    }

    #[test]
    fn summary_flags_completion_once_nothing_is_drawable() {
        let mut settings = Settings::default();
        for tier in PrizeTier::ALL {
            settings.set_pool_range(tier, 1, 1).unwrap();
        }
        let winners = vec![Winner::new("a".into(), "001".into(), PrizeTier::Third, 0)];

        let summary = DrawSummary::from_state(&settings, &winners);
        assert!(summary.is_complete());
        assert!(summary.tiers.iter().all(|t| t.pool_size == 0));
        assert!(summary.to_string().ends_with("  all tiers complete\n"));
    }
}
