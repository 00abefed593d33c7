//! Per-date memoization of packed slots.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::ScheduleError;
use crate::models::{DateWithoutTime, FieldSlot, Rules, TourneyGameDef};

use super::AvailableSlots;

/// Cache of [`AvailableSlots`] keyed by epoch day.
///
/// Interior mutability lets read-only schedule queries fill the cache.
/// The owning schedule calls [`SlotManager::invalidate`] whenever it adds
/// a game.
#[derive(Debug, Clone, Default)]
pub struct SlotManager {
    cache: RefCell<HashMap<i64, AvailableSlots>>,
}

impl SlotManager {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The earliest open slot on `date`, packing the date on first use.
    pub fn get_first_slot_available_or_null_for_date<'a>(
        &self,
        rules: &Rules,
        scheduled: impl IntoIterator<Item = &'a TourneyGameDef>,
        date: DateWithoutTime,
    ) -> Result<Option<FieldSlot>, ScheduleError> {
        let key = date.epoch_day();
        if let Some(slots) = self.cache.borrow().get(&key) {
            return Ok(slots.first().cloned());
        }

        let slots = AvailableSlots::compute(rules, scheduled, date)?;
        let first = slots.first().cloned();
        self.cache.borrow_mut().insert(key, slots);
        Ok(first)
    }

    /// Drops every cached date.
    pub fn invalidate(&mut self) {
        self.cache.get_mut().clear();
    }

    /// Number of cached dates.
    pub fn cached_dates(&self) -> usize {
        self.cache.borrow().len()
    }
}
