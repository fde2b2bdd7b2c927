//! Player id -> score lookup built from the highscore feed.

use ogmap_core::PlayerRecord;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct ScoreIndex {
    scores: FxHashMap<String, u64>,
}

impl ScoreIndex {
    /// Later entries for the same id replace earlier ones.
    pub fn from_records(records: &[PlayerRecord]) -> Self {
        let mut scores = FxHashMap::default();
        scores.reserve(records.len());
        for r in records {
            scores.insert(r.id.clone(), r.score);
        }
        Self { scores }
    }

    /// Unknown players score 0.
    pub fn get(&self, id: &str) -> u64 { self.scores.get(id).copied().unwrap_or(0) }

    pub fn len(&self) -> usize { self.scores.len() }
    pub fn is_empty(&self) -> bool { self.scores.is_empty() }
}
