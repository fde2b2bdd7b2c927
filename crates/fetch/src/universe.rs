//! Universe shorthand (`178-cz`) and the public API URLs derived from it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FetchError;

/// Ranking the highscore feed is ordered by (`type` query parameter).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum HighscoreType {
    #[default]
    Total,
    Economy,
    Research,
    Military,
    MilitaryLost,
    MilitaryBuilt,
    MilitaryDestroyed,
    Honor,
}

pub const ALL_HIGHSCORE_TYPES: [HighscoreType; 8] = [
    HighscoreType::Total,
    HighscoreType::Economy,
    HighscoreType::Research,
    HighscoreType::Military,
    HighscoreType::MilitaryLost,
    HighscoreType::MilitaryBuilt,
    HighscoreType::MilitaryDestroyed,
    HighscoreType::Honor,
];

impl HighscoreType {
    pub fn code(self) -> u8 {
        match self {
            HighscoreType::Total => 0,
            HighscoreType::Economy => 1,
            HighscoreType::Research => 2,
            HighscoreType::Military => 3,
            HighscoreType::MilitaryLost => 4,
            HighscoreType::MilitaryBuilt => 5,
            HighscoreType::MilitaryDestroyed => 6,
            HighscoreType::Honor => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HighscoreType::Total => "Total Score",
            HighscoreType::Economy => "Economy",
            HighscoreType::Research => "Research",
            HighscoreType::Military => "Military",
            HighscoreType::MilitaryLost => "Military Lost",
            HighscoreType::MilitaryBuilt => "Military Built",
            HighscoreType::MilitaryDestroyed => "Military Destroyed",
            HighscoreType::Honor => "Honor",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        ALL_HIGHSCORE_TYPES.iter().copied().find(|t| t.code() == code)
    }
}

/// A game server, written `<number>-<community>` as in its host name
/// (`s178-cz.ogame.gameforge.com` is `178-cz`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Universe {
    pub number: u32,
    pub community: String,
}

impl Universe {
    pub fn base_url(&self) -> String {
        format!("https://s{}-{}.ogame.gameforge.com/api", self.number, self.community)
    }

    pub fn players_url(&self) -> String { format!("{}/players.xml", self.base_url()) }

    pub fn planets_url(&self) -> String { format!("{}/universe.xml", self.base_url()) }

    /// Player ranking (`category=1`) of the given type.
    pub fn highscore_url(&self, kind: HighscoreType) -> String {
        format!("{}/highscore.xml?category=1&type={}", self.base_url(), kind.code())
    }
}

impl FromStr for Universe {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FetchError::InvalidUniverse(s.to_string());
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('s').unwrap_or(trimmed);
        let (number, community) = trimmed.split_once('-').ok_or_else(invalid)?;
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) { return Err(invalid()); }
        if community.is_empty() || !community.bytes().all(|b| b.is_ascii_alphabetic()) { return Err(invalid()); }
        let number = number.parse().map_err(|_| invalid())?;
        Ok(Self { number, community: community.to_ascii_lowercase() })
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}-{}", self.number, self.community) }
}
