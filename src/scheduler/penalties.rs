//! Penalty model.
//!
//! Pure scoring functions over a schedule and a candidate placement.
//! Lower is better everywhere.
//!
//! | Penalty | Definition |
//! |---------|-----------|
//! | Tourney | Championship date minus earliest date (span in days) |
//! | Date | Placement date minus earliest date |
//! | Elimination | 0, 50, or 100 depending on first-round completion |
//!
//! The earliest date is the earliest scheduled game's date, or the
//! tournament start date while nothing is scheduled.

use std::cmp::Ordering;

use crate::models::{BracketGame, TourneyGameDef};

use super::TourneyDef;

/// Rank of an infeasible placement or incomplete schedule.
pub const PENALTY_MAX: i64 = 65_535;

/// Elimination game placed before first-round play has finished.
pub const ELIMINATION_PENALTY: i64 = 100;

/// Elimination game ending exactly when a first-round game ends.
pub const ELIMINATION_TIE_PENALTY: i64 = 50;

/// Scoring functions.
pub struct Penalties;

impl Penalties {
    /// Tournament span in days, or [`PENALTY_MAX`] if the championship
    /// game is not scheduled.
    pub fn calculate_tourney_penalty(tourney: &TourneyDef) -> i64 {
        let championship = tourney
            .bracket()
            .championship_game()
            .and_then(|n| tourney.game(n));
        match championship {
            Some(game) => game.date.days_since(&tourney.earliest_date()),
            None => PENALTY_MAX,
        }
    }

    /// Days between the earliest date and the placement.
    pub fn calculate_date_penalty(tourney: &TourneyDef, placement: &TourneyGameDef) -> i64 {
        placement.date.days_since(&tourney.earliest_date())
    }

    /// Fairness penalty for placing an elimination game before every team
    /// has played its first-round game.
    ///
    /// First-round games are checked in bracket order, skipping the
    /// placement's own game. An unscheduled one, or one ending after the
    /// placement, costs [`ELIMINATION_PENALTY`]; one ending at the same
    /// time costs [`ELIMINATION_TIE_PENALTY`]. The scan stops at the first
    /// game that did not end strictly earlier.
    pub fn calculate_elimination_penalty(
        tourney: &TourneyDef,
        game_def: &BracketGame,
        placement: &TourneyGameDef,
    ) -> i64 {
        if !game_def.is_elimination() {
            return 0;
        }

        let candidate_end = (placement.date, placement.end());
        for first_round in tourney.bracket().get_first_round_games() {
            if first_round == placement.game_num {
                continue;
            }
            let Some(other) = tourney.game(first_round) else {
                return ELIMINATION_PENALTY;
            };
            match (other.date, other.end()).cmp(&candidate_end) {
                Ordering::Less => continue,
                Ordering::Equal => return ELIMINATION_TIE_PENALTY,
                Ordering::Greater => return ELIMINATION_PENALTY,
            }
        }

        0
    }
}
