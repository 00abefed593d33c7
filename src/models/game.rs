//! Concrete game placements.

use serde::{Deserialize, Serialize};

use super::{DateWithoutTime, FieldSlot, GameNum, TimeWithoutDate};

/// A bracket game placed on a date, field, and start time.
///
/// Immutable once created; schedules copy placements by value when they
/// branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TourneyGameDef {
    /// Bracket position of the game.
    pub game_num: GameNum,
    /// Date the game is played.
    pub date: DateWithoutTime,
    /// Field and start time.
    pub slot: FieldSlot,
}

impl TourneyGameDef {
    /// Creates a new placement.
    pub fn new(game_num: GameNum, date: DateWithoutTime, slot: FieldSlot) -> Self {
        Self {
            game_num,
            date,
            slot,
        }
    }

    /// Start time.
    #[inline]
    pub fn start(&self) -> TimeWithoutDate {
        self.slot.start
    }

    /// End time, clipped to the end of the day if the slot wraps.
    #[inline]
    pub fn end(&self) -> TimeWithoutDate {
        self.slot.effective_end()
    }

    /// Name of the hosting field.
    #[inline]
    pub fn field_name(&self) -> &str {
        &self.slot.field.name
    }

    /// Chronological sort key: date, start time, then field name.
    pub fn chronological_key(&self) -> (DateWithoutTime, TimeWithoutDate, &str) {
        (self.date, self.slot.start, self.field_name())
    }
}
