// Copyright (c) James Kassemi, SC, US. All rights reserved.

use thiserror::Error;

use crate::types::PrizeTier;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("winner count for {tier} must be at least 1")]
    InvalidCount { tier: PrizeTier },
    #[error("invalid pool range [{start}, {end}]: expected 1 <= start <= end")]
    InvalidRange { start: u32, end: u32 },
    #[error("invalid ticket number '{value}'")]
    InvalidTicket { value: String },
    #[error("unknown prize tier '{value}' (expected first, second or third)")]
    UnknownTier { value: String },
}
