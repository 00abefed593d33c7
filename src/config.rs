//! Search configuration.
//!
//! Holds the two resource bounds of the engine: how many partial schedules
//! the ranker may queue, and how many days past the earliest allowable date
//! a single game placement may look.

use serde::{Deserialize, Serialize};

/// Default frontier bound for [`Ranker`](crate::scheduler::Ranker).
pub const DEFAULT_FRONTIER_LIMIT: usize = 10_000;

/// Default lookahead (days) for single-game placement.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 31;

/// Resource bounds for scheduling and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of queued partial schedules before the search gives up.
    pub frontier_limit: usize,
    /// Number of consecutive dates tried when placing one game.
    pub lookahead_days: u32,
}

impl SearchConfig {
    /// Creates a configuration with the default bounds.
    pub fn new() -> Self {
        Self {
            frontier_limit: DEFAULT_FRONTIER_LIMIT,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        }
    }

    /// Sets the frontier bound.
    pub fn with_frontier_limit(mut self, limit: usize) -> Self {
        self.frontier_limit = limit;
        self
    }

    /// Sets the per-game date lookahead.
    pub fn with_lookahead_days(mut self, days: u32) -> Self {
        self.lookahead_days = days;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SearchConfig::default();
        assert_eq!(c.frontier_limit, 10_000);
        assert_eq!(c.lookahead_days, 31);
    }

    #[test]
    fn test_builder() {
        let c = SearchConfig::new()
            .with_frontier_limit(50)
            .with_lookahead_days(7);
        assert_eq!(c.frontier_limit, 50);
        assert_eq!(c.lookahead_days, 7);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c: SearchConfig = serde_json::from_str(r#"{"frontier_limit": 12}"#).unwrap();
        assert_eq!(c.frontier_limit, 12);
        assert_eq!(c.lookahead_days, DEFAULT_LOOKAHEAD_DAYS);
    }
}
