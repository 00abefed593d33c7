//! Breadth-first search over tied scheduling choices.
//!
//! # Algorithm
//!
//! 1. Queue the starting schedule.
//! 2. Pop the front schedule and compute its best-ranked placements.
//!    - None left: the schedule is a finalist (complete or stuck).
//!    - Otherwise branch: every option but the last is applied to a
//!      clone; the last is applied to the popped schedule itself.
//! 3. A branch is queued only if no queued schedule has the same game
//!    count and canonical hash.
//! 4. Fail once the queue outgrows the frontier limit.
//! 5. When the queue drains, return the finalist with the lowest rank
//!    penalty (first found wins ties).
//!
//! The hash ignores fields and start times, so branches that put the same
//! games on the same days collapse into whichever was queued first.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::error::ScheduleError;

use super::TourneyDef;

/// Result of a completed search.
#[derive(Debug, Clone)]
pub struct RankOutcome {
    /// Lowest-penalty finalist.
    pub best: TourneyDef,
    /// Number of finalists compared.
    pub finalists: usize,
    /// Number of schedules popped and expanded.
    pub expanded: usize,
    /// Largest queue length seen.
    pub peak_frontier: usize,
}

/// Tie-branching schedule search.
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    config: SearchConfig,
}

type StateKey = (usize, String);

fn state_key(tourney: &TourneyDef) -> StateKey {
    (tourney.len(), tourney.get_hash().to_string())
}

struct Frontier {
    queue: VecDeque<TourneyDef>,
    queued: HashSet<StateKey>,
    limit: usize,
    peak: usize,
}

impl Frontier {
    fn new(limit: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
            limit,
            peak: 0,
        }
    }

    fn pop(&mut self) -> Option<TourneyDef> {
        let next = self.queue.pop_front()?;
        self.queued.remove(&state_key(&next));
        Some(next)
    }

    /// Queues a schedule unless an equivalent one is already queued.
    fn push(&mut self, tourney: TourneyDef) -> Result<(), ScheduleError> {
        if !self.queued.insert(state_key(&tourney)) {
            return Ok(());
        }
        self.queue.push_back(tourney);
        self.peak = self.peak.max(self.queue.len());

        if self.queue.len() > self.limit {
            warn!(limit = self.limit, "search frontier exhausted");
            return Err(ScheduleError::SearchExhausted { limit: self.limit });
        }
        Ok(())
    }
}

impl Ranker {
    /// Creates a ranker with the default frontier bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration. The frontier bound applies to the search;
    /// the lookahead replaces the starting schedule's own.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Searches tied placements from `start` for the best-ranked schedule.
    ///
    /// `start` and every branch from it run under this ranker's
    /// configuration.
    ///
    /// # Errors
    /// [`ScheduleError::SearchExhausted`] if the frontier outgrows its
    /// bound, and any fault raised while placing games.
    pub fn rank(&self, start: TourneyDef) -> Result<RankOutcome, ScheduleError> {
        let start = start.with_config(self.config);
        info!(
            placed = start.len(),
            games = start.bracket().len(),
            limit = self.config.frontier_limit,
            lookahead = self.config.lookahead_days,
            "starting schedule search"
        );

        let mut frontier = Frontier::new(self.config.frontier_limit);
        frontier.push(start)?;

        let mut finalists: Vec<TourneyDef> = Vec::new();
        let mut expanded = 0usize;

        while let Some(mut current) = frontier.pop() {
            expanded += 1;
            let mut options = current.get_next_game_options_to_schedule()?;
            debug!(
                placed = current.len(),
                options = options.len(),
                queued = frontier.queue.len(),
                "expanding schedule"
            );

            let Some(last) = options.pop() else {
                finalists.push(current);
                continue;
            };

            for option in options {
                let mut branch = current.clone();
                branch.add_game(option)?;
                frontier.push(branch)?;
            }
            current.add_game(last)?;
            frontier.push(current)?;
        }

        let finalist_count = finalists.len();
        let mut best: Option<TourneyDef> = None;
        for candidate in finalists {
            let better = match &best {
                Some(current) => candidate.calculate_rank_penalty() < current.calculate_rank_penalty(),
                None => true,
            };
            if better {
                best = Some(candidate);
            }
        }
        let best = best.ok_or(ScheduleError::NoFinalist)?;

        info!(
            finalists = finalist_count,
            expanded,
            peak_frontier = frontier.peak,
            penalty = best.calculate_rank_penalty(),
            "schedule search finished"
        );

        Ok(RankOutcome {
            best,
            finalists: finalist_count,
            expanded,
            peak_frontier: frontier.peak,
        })
    }
}
