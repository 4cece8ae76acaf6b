//! Per-depth visit counters

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Number of heuristic-search visits at each remaining depth.
///
/// Reset at the start of every move; merged into run-level totals by the
/// trace and scoreboard layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvalStats {
    per_depth: BTreeMap<u32, u64>,
}

impl EvalStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&mut self, depth: u32) {
        *self.per_depth.entry(depth).or_insert(0) += 1;
    }

    /// Visits recorded at `depth`
    pub fn get(&self, depth: u32) -> u64 {
        self.per_depth.get(&depth).copied().unwrap_or(0)
    }

    /// Total visits over all depths
    pub fn total(&self) -> u64 {
        self.per_depth.values().sum()
    }

    pub fn per_depth(&self) -> &BTreeMap<u32, u64> {
        &self.per_depth
    }

    pub fn is_empty(&self) -> bool {
        self.per_depth.is_empty()
    }

    pub fn clear(&mut self) {
        self.per_depth.clear();
    }

    /// Add another set of counters into this one
    pub fn merge(&mut self, other: &EvalStats) {
        for (&depth, &count) in &other.per_depth {
            *self.per_depth.entry(depth).or_insert(0) += count;
        }
    }

    /// Visit-weighted mean of the recorded depths
    pub fn average_depth(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let weighted: u64 = self
            .per_depth
            .iter()
            .map(|(&depth, &count)| u64::from(depth) * count)
            .sum();
        weighted as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_total() {
        let mut stats = EvalStats::new();
        stats.record(3);
        stats.record(2);
        stats.record(2);
        assert_eq!(stats.get(2), 2);
        assert_eq!(stats.get(3), 1);
        assert_eq!(stats.get(1), 0);
        assert_eq!(stats.total(), 3);
    }

    #[test]
    fn test_merge() {
        let mut run = EvalStats::new();
        run.record(1);

        let mut per_move = EvalStats::new();
        per_move.record(1);
        per_move.record(4);
        run.merge(&per_move);

        assert_eq!(run.get(1), 2);
        assert_eq!(run.get(4), 1);
        assert_eq!(run.total(), 3);
    }

    #[test]
    fn test_average_depth() {
        let mut stats = EvalStats::new();
        assert_eq!(stats.average_depth(), 0.0);
        stats.record(1);
        stats.record(3);
        assert_eq!(stats.average_depth(), 2.0);
    }

    #[test]
    fn test_serializes_as_map() {
        let mut stats = EvalStats::new();
        stats.record(2);
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"2":1}"#);
    }
}
