//! Player status catalogue.
//!
//! The players feed carries a comma-separated `status` attribute. This module
//! provides:
//! - The known status tokens with human labels
//! - The default exclusion set (every known status)
//! - Token splitting used by the XML extractor

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::StatusSet;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PlayerStatus {
    Inactive,
    LongInactive,
    Vacation,
    VacationInactive,
    VacationLongInactive,
    Admin,
    BannedTemp,
    BannedPerm,
}

pub const ALL_STATUSES: [PlayerStatus; 8] = [
    PlayerStatus::Inactive,
    PlayerStatus::LongInactive,
    PlayerStatus::Vacation,
    PlayerStatus::VacationInactive,
    PlayerStatus::VacationLongInactive,
    PlayerStatus::Admin,
    PlayerStatus::BannedTemp,
    PlayerStatus::BannedPerm,
];

impl PlayerStatus {
    /// Token as it appears in the feed. Case matters: `i` and `I` differ.
    pub fn token(self) -> &'static str {
        match self {
            PlayerStatus::Inactive => "i",
            PlayerStatus::LongInactive => "I",
            PlayerStatus::Vacation => "v",
            PlayerStatus::VacationInactive => "vi",
            PlayerStatus::VacationLongInactive => "vI",
            PlayerStatus::Admin => "a",
            PlayerStatus::BannedTemp => "vib",
            PlayerStatus::BannedPerm => "vIb",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerStatus::Inactive => "Inactive (7d)",
            PlayerStatus::LongInactive => "Inactive (28d)",
            PlayerStatus::Vacation => "Vacation (<7d)",
            PlayerStatus::VacationInactive => "Vacation (7d)",
            PlayerStatus::VacationLongInactive => "Vacation (28d)",
            PlayerStatus::Admin => "Admin",
            PlayerStatus::BannedTemp => "Banned (Temp)",
            PlayerStatus::BannedPerm => "Banned (Perm)",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        ALL_STATUSES.iter().copied().find(|s| s.token() == token)
    }
}

/// Every known status; a player carrying any of them is left out of the map.
pub fn default_excluded() -> StatusSet {
    ALL_STATUSES.iter().map(|s| s.token().to_string()).collect()
}

/// Split a raw `status` attribute on `,`, dropping empty tokens and repeats.
pub fn split_tokens(raw: &str) -> StatusSet {
    let mut out = StatusSet::new();
    for tok in raw.split(',').filter(|t| !t.is_empty()) {
        if !out.iter().any(|t| t == tok) { out.push(tok.to_string()); }
    }
    out
}
