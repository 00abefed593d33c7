//! Error types for scheduling faults.
//!
//! Infeasible placements are not errors: they surface as `None` placements
//! or as [`PENALTY_MAX`](crate::scheduler::PENALTY_MAX) ranks. Everything
//! here is either a caller contract breach (malformed input data) or an
//! exhausted search.

use thiserror::Error;

use crate::models::{DateWithoutTime, GameNum};

/// Faults raised by the scheduling core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The slot packer found more than one in-use slot overlapping a candidate.
    #[error("field '{field}' on {date} has {count} slots overlapping one candidate")]
    OverlappingSlots {
        field: String,
        date: DateWithoutTime,
        count: usize,
    },

    /// A game was added to a schedule that already contains it.
    #[error("game {0} is already scheduled")]
    DuplicateGame(GameNum),

    /// A field name did not match any field in the catalog.
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// A game number outside the bracket's game list.
    #[error("game {0} is not part of the bracket")]
    UnknownGame(GameNum),

    /// A team source token could not be parsed.
    #[error("invalid team source token '{0}'")]
    InvalidToken(String),

    /// The search frontier grew past its bound.
    #[error("search frontier exceeded {limit} queued schedules")]
    SearchExhausted { limit: usize },

    /// The search drained without producing any candidate schedule.
    #[error("search produced no finalist schedule")]
    NoFinalist,
}
