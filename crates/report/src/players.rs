//! Player filter: decides which player ids make it into the report.

use metrics::{counter, gauge};
use ogmap_core::{FilterConfig, PlayerRecord};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::score::ScoreIndex;

/// Result of the player filter: the kept ids plus their display names.
#[derive(Debug, Clone, Default)]
pub struct KeptPlayers {
    kept: FxHashSet<String>,
    names: FxHashMap<String, String>,
    excluded_by_status: usize,
    excluded_by_score: usize,
}

impl KeptPlayers {
    pub fn contains(&self, id: &str) -> bool { self.kept.contains(id) }

    /// Recorded name, or the id itself for players without one.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.names.get(id).map(String::as_str).unwrap_or(id)
    }

    pub fn len(&self) -> usize { self.kept.len() }
    pub fn is_empty(&self) -> bool { self.kept.is_empty() }
    pub fn excluded_by_status(&self) -> usize { self.excluded_by_status }
    pub fn excluded_by_score(&self) -> usize { self.excluded_by_score }

    fn keep(&mut self, p: &PlayerRecord) {
        self.kept.insert(p.id.clone());
        if p.name.is_empty() {
            self.names.remove(&p.id);
        } else {
            self.names.insert(p.id.clone(), p.name.clone());
        }
    }

    fn drop_id(&mut self, id: &str) {
        self.kept.remove(id);
        self.names.remove(id);
    }
}

/// Apply status and score exclusion to every player, in document order.
///
/// A player is dropped when *any* of its status tokens is excluded, even if
/// other tokens would be fine. With `config.min_score` set, players scoring
/// below it are dropped too; players missing from `scores` (or all players,
/// when no index is given) score 0. A repeated id takes the outcome of its
/// last occurrence.
pub fn filter_players(players: &[PlayerRecord], config: &FilterConfig, scores: Option<&ScoreIndex>) -> KeptPlayers {
    let mut out = KeptPlayers::default();
    for p in players {
        if p.has_any_status(&config.excluded_statuses) {
            out.excluded_by_status += 1;
            out.drop_id(&p.id);
            continue;
        }
        if let Some(min) = config.min_score {
            let score = scores.map(|s| s.get(&p.id)).unwrap_or(0);
            if score < min {
                out.excluded_by_score += 1;
                out.drop_id(&p.id);
                continue;
            }
        }
        out.keep(p);
    }
    debug!(kept = out.len(), by_status = out.excluded_by_status, by_score = out.excluded_by_score, "players filtered");
    gauge!("players_kept", out.len() as f64);
    counter!("players_excluded_total", out.excluded_by_status as u64, "reason" => "status");
    counter!("players_excluded_total", out.excluded_by_score as u64, "reason" => "score");
    out
}
