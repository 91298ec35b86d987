// Copyright (c) James Kassemi, SC, US. All rights reserved.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Fixed width of a rendered ticket number (`7` -> `"007"`).
pub const TICKET_NUMBER_WIDTH: usize = 3;

/// Prize level. Ordering is display order only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrizeTier {
    First,
    Second,
    Third,
}

impl PrizeTier {
    pub const ALL: [PrizeTier; 3] = [PrizeTier::First, PrizeTier::Second, PrizeTier::Third];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrizeTier::First => "FIRST",
            PrizeTier::Second => "SECOND",
            PrizeTier::Third => "THIRD",
        }
    }
}

impl fmt::Display for PrizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrizeTier {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first" | "1" => Ok(PrizeTier::First),
            "second" | "2" => Ok(PrizeTier::Second),
            "third" | "3" => Ok(PrizeTier::Third),
            other => Err(SettingsError::UnknownTier {
                value: other.to_string(),
            }),
        }
    }
}

/// Render a ticket number zero-padded to [`TICKET_NUMBER_WIDTH`]. Wider numbers are kept whole.
pub fn format_ticket(number: u32) -> String {
    format!("{number:0width$}", width = TICKET_NUMBER_WIDTH)
}

/// Parse operator input (`"7"`, `"007"`, `" 12 "`) into the canonical ticket form.
pub fn normalize_ticket(raw: &str) -> Result<String, SettingsError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SettingsError::InvalidTicket {
            value: raw.to_string(),
        });
    }
    trimmed
        .parse::<u32>()
        .map(format_ticket)
        .map_err(|_| SettingsError::InvalidTicket {
            value: raw.to_string(),
        })
}

/// One draw result as stored in the winner ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub id: String,
    pub number: String,
    pub tier: PrizeTier,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Winner {
    pub fn new(id: String, number: String, tier: PrizeTier, timestamp: i64) -> Self {
        Self {
            id,
            number,
            tier,
            timestamp,
        }
    }

    pub fn drawn_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}
