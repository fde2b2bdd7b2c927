//! Galaxy coordinates (`G:S:P`) and their ordering.
//!
//! The sort key packs a coordinate into one integer:
//! `galaxy * 1_000_000 + system * 1_000 + position`. It is collision free while
//! every component stays below 1000; larger values are accepted but may
//! collide (not validated).

#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

const GALAXY_WEIGHT: u64 = 1_000_000;
const SYSTEM_WEIGHT: u64 = 1_000;

/// A planet location. `position` is `None` once collapsed to system level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub galaxy: u32,
    pub system: u32,
    pub position: Option<u32>,
}

impl Coordinate {
    pub fn new(galaxy: u32, system: u32, position: u32) -> Self {
        Self { galaxy, system, position: Some(position) }
    }

    /// Parse a full `G:S:P` triple.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let malformed = || Error::MalformedCoordinate { raw: raw.to_string() };
        let mut parts = raw.split(':');
        let mut next = || parts.next().ok_or_else(malformed).and_then(|p| parse_part(p).ok_or_else(malformed));
        let galaxy = next()?;
        let system = next()?;
        let position = next()?;
        if parts.next().is_some() { return Err(malformed()); }
        Ok(Self::new(galaxy, system, position))
    }

    /// Drop the position, keeping galaxy and system.
    pub fn collapse(self) -> Self {
        Self { position: None, ..self }
    }

    pub fn is_collapsed(&self) -> bool { self.position.is_none() }

    pub fn sort_key(&self) -> u64 {
        self.galaxy as u64 * GALAXY_WEIGHT + self.system as u64 * SYSTEM_WEIGHT + self.position.unwrap_or(0) as u64
    }
}

/// The first two segments of a raw `G:S:P` string, verbatim (`"01:2:3"` gives
/// `"01:2"`). Planets of one solar system share this key; call it only on
/// text that [`Coordinate::parse`] accepted.
pub fn system_key(raw: &str) -> Option<&str> {
    raw.rsplit_once(':').map(|(system, _)| system)
}

// Digits only: `u32::from_str` would also take a leading '+'.
fn parse_part(part: &str) -> Option<u32> {
    let part = part.trim_matches(|c: char| c.is_ascii_whitespace());
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) { return None; }
    part.parse().ok()
}

impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(p) => write!(f, "{}:{}:{}", self.galaxy, self.system, p),
            None => write!(f, "{}:{}", self.galaxy, self.system),
        }
    }
}
