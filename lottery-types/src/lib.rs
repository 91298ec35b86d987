// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! Shared data model, ticket formatting, identifiers and configuration for the lottery.

pub mod config;
pub mod error;
pub mod settings;
pub mod types;
pub mod uid;

pub use crate::config::{AppConfig, ConfigError};
pub use error::SettingsError;
pub use settings::{PoolRange, PrizeConfig, Settings, TierConfigs};
pub use types::{PrizeTier, TICKET_NUMBER_WIDTH, Winner, format_ticket, normalize_ticket};
pub use uid::{WinnerUid, encode_uid, winner_uid};
