//! Slot packing, scoring, and schedule search.
//!
//! # Algorithm
//!
//! `AvailableSlots` packs each date's open slots field by field, skipping
//! past games already placed. `TourneyDef` places one game at a time at
//! its earliest open slot, ranked by `Penalties`. `Ranker` branches over
//! tied placements breadth-first and keeps the schedule with the shortest
//! span between the first game and the championship.
//!
//! # Summary
//!
//! `ScheduleSummary` reports per-date and per-field load of a schedule.

mod penalties;
mod ranker;
mod slot_manager;
mod slots;
mod summary;
mod tourney;

pub use penalties::{Penalties, ELIMINATION_PENALTY, ELIMINATION_TIE_PENALTY, PENALTY_MAX};
pub use ranker::{RankOutcome, Ranker};
pub use slot_manager::SlotManager;
pub use slots::AvailableSlots;
pub use summary::ScheduleSummary;
pub use tourney::{GameRank, TourneyDef};
