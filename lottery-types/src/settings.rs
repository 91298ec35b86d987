// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Lottery settings record and its typed setters.

use std::{collections::HashSet, ops::RangeInclusive};

use serde::{Deserialize, Serialize};

use crate::{
    error::SettingsError,
    types::{PrizeTier, normalize_ticket},
};

const DEFAULT_TITLE: &str = "Wedding Lottery";
const DEFAULT_TOTAL_TICKETS: u32 = 999;

/// Inclusive ticket-number bounds for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRange {
    pub start: u32,
    pub end: u32,
}

impl PoolRange {
    pub fn new(start: u32, end: u32) -> Result<Self, SettingsError> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.start < 1 || self.end < self.start {
            return Err(SettingsError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn numbers(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }

    /// Number of tickets in the range; zero for an inverted range.
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrizeConfig {
    /// Maximum number of winners for the tier.
    pub count: u32,
    pub label: String,
    pub pool_range: PoolRange,
}

impl PrizeConfig {
    fn with_defaults(count: u32, label: &str) -> Self {
        Self {
            count,
            label: label.to_string(),
            pool_range: PoolRange {
                start: 1,
                end: DEFAULT_TOTAL_TICKETS,
            },
        }
    }
}

/// Per-tier configuration. Every tier is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfigs {
    #[serde(rename = "FIRST")]
    pub first: PrizeConfig,
    #[serde(rename = "SECOND")]
    pub second: PrizeConfig,
    #[serde(rename = "THIRD")]
    pub third: PrizeConfig,
}

impl TierConfigs {
    pub fn get(&self, tier: PrizeTier) -> &PrizeConfig {
        match tier {
            PrizeTier::First => &self.first,
            PrizeTier::Second => &self.second,
            PrizeTier::Third => &self.third,
        }
    }

    pub fn get_mut(&mut self, tier: PrizeTier) -> &mut PrizeConfig {
        match tier {
            PrizeTier::First => &mut self.first,
            PrizeTier::Second => &mut self.second,
            PrizeTier::Third => &mut self.third,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PrizeTier, &PrizeConfig)> {
        PrizeTier::ALL.into_iter().map(move |tier| (tier, self.get(tier)))
    }
}

impl Default for TierConfigs {
    fn default() -> Self {
        Self {
            first: PrizeConfig::with_defaults(1, "First Prize"),
            second: PrizeConfig::with_defaults(5, "Second Prize"),
            third: PrizeConfig::with_defaults(10, "Third Prize"),
        }
    }
}

/// The settings record. Saved and loaded wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub title: String,
    /// Informational only; pools are driven by each tier's range.
    pub total_tickets: u32,
    pub config: TierConfigs,
    /// Ticket numbers barred from every tier, in insertion order.
    pub excluded_numbers: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            total_tickets: DEFAULT_TOTAL_TICKETS,
            config: TierConfigs::default(),
            excluded_numbers: Vec::new(),
        }
    }
}

impl Settings {
    pub fn tier(&self, tier: PrizeTier) -> &PrizeConfig {
        self.config.get(tier)
    }

    pub fn excluded_set(&self) -> HashSet<&str> {
        self.excluded_numbers.iter().map(String::as_str).collect()
    }

    pub fn is_excluded(&self, number: &str) -> bool {
        self.excluded_numbers.iter().any(|n| n == number)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_total_tickets(&mut self, total: u32) {
        self.total_tickets = total;
    }

    pub fn set_label(&mut self, tier: PrizeTier, label: impl Into<String>) {
        self.config.get_mut(tier).label = label.into();
    }

    pub fn set_count(&mut self, tier: PrizeTier, count: u32) -> Result<(), SettingsError> {
        if count == 0 {
            return Err(SettingsError::InvalidCount { tier });
        }
        self.config.get_mut(tier).count = count;
        Ok(())
    }

    pub fn set_pool_range(
        &mut self,
        tier: PrizeTier,
        start: u32,
        end: u32,
    ) -> Result<(), SettingsError> {
        self.config.get_mut(tier).pool_range = PoolRange::new(start, end)?;
        Ok(())
    }

    /// Returns `true` when the number was newly excluded.
    pub fn exclude_number(&mut self, raw: &str) -> Result<bool, SettingsError> {
        let number = normalize_ticket(raw)?;
        if self.is_excluded(&number) {
            return Ok(false);
        }
        self.excluded_numbers.push(number);
        Ok(true)
    }

    /// Returns `true` when the number was previously excluded.
    pub fn include_number(&mut self, raw: &str) -> Result<bool, SettingsError> {
        let number = normalize_ticket(raw)?;
        let before = self.excluded_numbers.len();
        self.excluded_numbers.retain(|n| *n != number);
        Ok(self.excluded_numbers.len() != before)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        for (tier, config) in self.config.iter() {
            if config.count == 0 {
                return Err(SettingsError::InvalidCount { tier });
            }
            config.pool_range.validate()?;
        }
        Ok(())
    }
}
