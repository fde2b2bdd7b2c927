//! Planet join & projection: planets of kept players become report rows.

use metrics::counter;
use ogmap_core::{coords, CoordPolicy, Coordinate, Error, FilterConfig, OutputRow, PlanetRecord};
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::players::KeptPlayers;

/// Rows in document order plus what was left out on the way.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    pub rows: Vec<OutputRow>,
    /// Owner not among the kept players.
    pub dropped_owner: usize,
    /// `coords` did not parse (skip policy only).
    pub malformed: usize,
    /// Further planets of an already emitted system (systems-only mode).
    pub collapsed: usize,
}

/// Join planets against the kept players.
///
/// Full mode emits `"{name} ; {coords}"` per planet, keeping `coords` exactly
/// as the feed spelled it. Systems-only mode emits the verbatim `"G:S"` prefix
/// once per distinct prefix, sorted by the numeric system key.
pub fn project_planets(planets: &[PlanetRecord], players: &KeptPlayers, config: &FilterConfig) -> Result<Projection, Error> {
    let mut out = Projection::default();
    let mut seen_systems: FxHashSet<&str> = FxHashSet::default();

    for planet in planets {
        if !players.contains(&planet.player) {
            out.dropped_owner += 1;
            continue;
        }
        let coord = match Coordinate::parse(&planet.coords) {
            Ok(c) => c,
            Err(e) => match config.coord_policy {
                CoordPolicy::Abort => return Err(e),
                CoordPolicy::Skip => {
                    warn!(player = %planet.player, coords = %planet.coords, "skipping planet with malformed coordinates");
                    out.malformed += 1;
                    continue;
                }
            },
        };

        if config.systems_only {
            // Parsed above, so there are exactly three segments.
            let Some(key) = coords::system_key(&planet.coords) else { continue };
            if !seen_systems.insert(key) {
                out.collapsed += 1;
                continue;
            }
            out.rows.push(OutputRow { sort_key: coord.collapse().sort_key(), payload: key.to_string() });
        } else {
            let name = players.display_name(&planet.player);
            out.rows.push(OutputRow { sort_key: coord.sort_key(), payload: format!("{} ; {}", name, planet.coords) });
        }
    }

    debug!(rows = out.rows.len(), dropped_owner = out.dropped_owner, malformed = out.malformed, collapsed = out.collapsed, "planets projected");
    counter!("planets_dropped_total", out.dropped_owner as u64);
    counter!("coords_malformed_total", out.malformed as u64);
    Ok(out)
}
