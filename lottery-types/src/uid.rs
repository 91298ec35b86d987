// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! 128-bit identifiers for winner records.

use std::fmt::Write;

use blake3::Hasher;

use crate::types::PrizeTier;

pub const UID_LEN: usize = 16;
pub type WinnerUid = [u8; UID_LEN];

struct UidBuilder {
    hasher: Hasher,
}

impl UidBuilder {
    fn new(domain: &[u8]) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(&(domain.len() as u32).to_le_bytes());
        hasher.update(domain);
        Self { hasher }
    }

    fn write_str(&mut self, value: &str) -> &mut Self {
        self.hasher.update(&(value.len() as u32).to_le_bytes());
        self.hasher.update(value.as_bytes());
        self
    }

    fn write_i64(&mut self, value: i64) -> &mut Self {
        self.hasher.update(&value.to_le_bytes());
        self
    }

    fn write_u64(&mut self, value: u64) -> &mut Self {
        self.hasher.update(&value.to_le_bytes());
        self
    }

    fn finish(self) -> WinnerUid {
        let hash = self.hasher.finalize();
        let mut bytes = [0u8; UID_LEN];
        bytes.copy_from_slice(&hash.as_bytes()[..UID_LEN]);
        bytes
    }
}

/// Build a winner UID. `nonce` should come from the draw rng so repeated draws of the
/// same number (after a ledger clear) still get distinct ids.
pub fn winner_uid(tier: PrizeTier, number: &str, timestamp_ms: i64, nonce: u64) -> WinnerUid {
    let mut builder = UidBuilder::new(b"winner_uid.v1");
    builder
        .write_str(tier.as_str())
        .write_str(number)
        .write_i64(timestamp_ms)
        .write_u64(nonce);
    builder.finish()
}

/// Lowercase hex rendering used for `Winner::id`.
pub fn encode_uid(uid: &WinnerUid) -> String {
    uid.iter().fold(String::with_capacity(UID_LEN * 2), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}
