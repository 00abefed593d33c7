//! Schedule summary figures.
//!
//! | Figure | Definition |
//! |--------|-----------|
//! | Games scheduled | Placed games out of the bracket's total |
//! | Span | Days from the earliest to the latest placed game |
//! | Rank penalty | Championship date minus earliest date |
//! | Load | Games per date and per field |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::DateWithoutTime;

use super::TourneyDef;

/// Summary figures for a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Placed games.
    pub games_scheduled: usize,
    /// Games in the bracket.
    pub total_games: usize,
    /// Days between the earliest and latest placed game (0 when empty).
    pub span_days: i64,
    /// Tournament rank penalty. `PENALTY_MAX` while the championship is unplaced.
    pub rank_penalty: i64,
    /// Games per date.
    pub games_per_date: BTreeMap<DateWithoutTime, usize>,
    /// Games per field name.
    pub games_per_field: BTreeMap<String, usize>,
}

impl ScheduleSummary {
    /// Computes the summary of a schedule.
    pub fn calculate(tourney: &TourneyDef) -> Self {
        let mut games_per_date = BTreeMap::new();
        let mut games_per_field = BTreeMap::new();

        for game in tourney.games() {
            *games_per_date.entry(game.date).or_insert(0) += 1;
            *games_per_field.entry(game.field_name().to_string()).or_insert(0) += 1;
        }

        let span_days = match (
            games_per_date.keys().next(),
            games_per_date.keys().next_back(),
        ) {
            (Some(first), Some(last)) => last.days_since(first),
            _ => 0,
        };

        Self {
            games_scheduled: tourney.len(),
            total_games: tourney.bracket().len(),
            span_days,
            rank_penalty: tourney.calculate_rank_penalty(),
            games_per_date,
            games_per_field,
        }
    }

    /// Whether every bracket game is placed.
    pub fn is_complete(&self) -> bool {
        self.games_scheduled == self.total_games
    }

    /// Largest number of games on any single date.
    pub fn busiest_date_load(&self) -> usize {
        self.games_per_date.values().copied().max().unwrap_or(0)
    }
}
