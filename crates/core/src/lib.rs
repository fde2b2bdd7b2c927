//! ogmap core types: coordinates, normalized feed records, run configuration.

#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub mod coords;
pub mod status;

pub use coords::Coordinate;
pub use status::PlayerStatus;

/// Status tokens of one player, or the tokens a run excludes. Small and
/// unordered; membership is a linear scan.
pub type StatusSet = SmallVec<[String; 4]>;

/// Which feed a document came from. Carried by parse errors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentRole {
    Players,
    Planets,
    Highscore,
}

impl DocumentRole {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentRole::Players => "players",
            DocumentRole::Planets => "planets",
            DocumentRole::Highscore => "highscore",
        }
    }
}

impl fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{role} document is not well-formed XML: {message}")]
    DocumentParse { role: DocumentRole, message: String },
    #[error("malformed coordinate {raw:?} (expected G:S:P)")]
    MalformedCoordinate { raw: String },
}

/// A `<player>` element of the players or highscore feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: String,
    /// May be empty; the id stands in for it downstream.
    pub name: String,
    pub status: StatusSet,
    /// Only the highscore feed carries it; 0 when absent or not a number.
    pub score: u64,
}

impl PlayerRecord {
    pub fn has_any_status(&self, excluded: &[String]) -> bool {
        self.status.iter().any(|t| excluded.contains(t))
    }
}

/// A `<planet>` element of the universe feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanetRecord {
    pub player: String,
    /// Verbatim `coords` attribute; parsed during projection.
    pub coords: String,
}

/// What to do with a planet whose `coords` does not parse.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoordPolicy {
    #[default]
    Skip,
    Abort,
}

/// Run-scoped filter options. Built once by the caller and passed by reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterConfig {
    pub excluded_statuses: StatusSet,
    /// `Some(min)` turns score filtering on.
    pub min_score: Option<u64>,
    /// Emit one `G:S` row per solar system instead of one row per planet.
    pub systems_only: bool,
    pub coord_policy: CoordPolicy,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            excluded_statuses: status::default_excluded(),
            min_score: None,
            systems_only: false,
            coord_policy: CoordPolicy::Skip,
        }
    }
}

impl FilterConfig {
    /// No status exclusion, no score filter, full rows.
    pub fn permissive() -> Self {
        Self { excluded_statuses: StatusSet::new(), ..Self::default() }
    }

    pub fn score_filter_active(&self) -> bool { self.min_score.is_some() }
}

/// One report line and the key it sorts by.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct OutputRow {
    pub sort_key: u64,
    pub payload: String,
}

pub mod prelude {
    pub use super::{
        CoordPolicy, Coordinate, DocumentRole, Error, FilterConfig, OutputRow, PlanetRecord, PlayerRecord,
        PlayerStatus, StatusSet,
    };
}
