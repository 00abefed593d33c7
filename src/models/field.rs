//! Venue model.
//!
//! A [`Field`] is a playable venue with a fixed game length; a
//! [`FieldSlot`] pins a field to a start time.

use serde::{Deserialize, Serialize};

use super::TimeWithoutDate;

/// A playing field.
///
/// Immutable after construction. Names are unique within a rules catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// Unique field name.
    pub name: String,
    /// Whether the field can host evening games.
    pub has_lights: bool,
    /// Length of one game slot (minutes).
    pub slot_length_minutes: u32,
}

impl Field {
    /// Creates a new field.
    pub fn new(name: impl Into<String>, has_lights: bool, slot_length_minutes: u32) -> Self {
        Self {
            name: name.into(),
            has_lights,
            slot_length_minutes,
        }
    }
}

/// A field paired with a start time.
///
/// The end is derived from the field's slot length and may wrap past
/// midnight; [`FieldSlot::effective_end`] clips such slots to the end of
/// the day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSlot {
    /// Slot start time.
    pub start: TimeWithoutDate,
    /// Field hosting the slot.
    pub field: Field,
}

impl FieldSlot {
    /// Creates a new slot.
    pub fn new(field: Field, start: TimeWithoutDate) -> Self {
        Self { start, field }
    }

    /// Raw end time (`start + slot length`, wrapping past midnight).
    #[inline]
    pub fn end(&self) -> TimeWithoutDate {
        self.start.add_minutes(self.field.slot_length_minutes)
    }

    /// Whether the slot runs past midnight.
    #[inline]
    pub fn wraps_midnight(&self) -> bool {
        self.end() <= self.start
    }

    /// End time, clipped to 23:59:59 when the slot wraps past midnight.
    pub fn effective_end(&self) -> TimeWithoutDate {
        if self.wraps_midnight() {
            TimeWithoutDate::END_OF_DAY
        } else {
            self.end()
        }
    }

    /// Whether another slot on the same date overlaps this one.
    ///
    /// Accepts `other` starting inside `[start, end)`, ending inside
    /// `(start, end]`, or fully containing this slot.
    pub fn overlaps(&self, other: &FieldSlot) -> bool {
        let (start, end) = (self.start, self.effective_end());
        let (other_start, other_end) = (other.start, other.effective_end());

        let starts_inside = other_start >= start && other_start < end;
        let ends_inside = other_end > start && other_end <= end;
        let contains = other_start <= start && other_end >= end;
        starts_inside || ends_inside || contains
    }
}
