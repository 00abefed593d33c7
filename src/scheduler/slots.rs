//! Per-date slot packing.
//!
//! # Algorithm
//!
//! For each field independently:
//! 1. Collect the slots already used on that field and date.
//! 2. Start from the first slot the rules allow.
//! 3. Stop once the candidate start breaks a restriction.
//! 4. If an in-use slot overlaps the candidate, move the candidate to the
//!    end of that slot and retry.
//! 5. Otherwise accept the candidate and move to its end. A slot that
//!    runs past midnight is the last one for the field.
//!
//! The per-field lists are then merged into one sequence ordered by start
//! time, ties going to the field listed first in the catalog. Scheduling
//! consumes the earliest slot across all fields, not per-field-first.
//!
//! # Complexity
//! O(f * s * u) to pack and O(n * f) to merge, where f = fields,
//! s = slots per field, u = in-use slots per field, n = total slots.

use tracing::{trace, warn};

use crate::error::ScheduleError;
use crate::models::{DateWithoutTime, Field, FieldSlot, Rules, TourneyGameDef};

/// Open slots on one date, ordered by start time across all fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableSlots {
    date: DateWithoutTime,
    slots: Vec<FieldSlot>,
}

impl AvailableSlots {
    /// Packs the open slots for `date`.
    ///
    /// `scheduled` may contain games on any date; only those on `date`
    /// block slots.
    ///
    /// # Errors
    /// [`ScheduleError::OverlappingSlots`] if a candidate overlaps more than
    /// one in-use slot, which only happens with malformed placements.
    pub fn compute<'a>(
        rules: &Rules,
        scheduled: impl IntoIterator<Item = &'a TourneyGameDef>,
        date: DateWithoutTime,
    ) -> Result<Self, ScheduleError> {
        let on_date: Vec<&TourneyGameDef> =
            scheduled.into_iter().filter(|g| g.date == date).collect();

        let mut per_field = Vec::with_capacity(rules.fields.len());
        for field in &rules.fields {
            let in_use: Vec<&FieldSlot> = on_date
                .iter()
                .filter(|g| g.slot.field.name == field.name)
                .map(|g| &g.slot)
                .collect();

            let mut packed = pack_field(rules, field, &date, &in_use)?;
            packed.sort_by_key(|s| s.start);
            trace!(field = %field.name, %date, open = packed.len(), "packed field");
            per_field.push(packed);
        }

        Ok(Self {
            date,
            slots: merge_by_start(per_field),
        })
    }

    /// Date the slots belong to.
    pub fn date(&self) -> DateWithoutTime {
        self.date
    }

    /// The earliest open slot, if any.
    pub fn first(&self) -> Option<&FieldSlot> {
        self.slots.first()
    }

    /// All open slots in merged start-time order.
    pub fn slots(&self) -> &[FieldSlot] {
        &self.slots
    }

    /// Number of open slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is open.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Walks one field's day from the first allowed start, skipping past
/// in-use slots.
fn pack_field(
    rules: &Rules,
    field: &Field,
    date: &DateWithoutTime,
    in_use: &[&FieldSlot],
) -> Result<Vec<FieldSlot>, ScheduleError> {
    if field.slot_length_minutes == 0 {
        warn!(field = %field.name, "field has zero slot length, skipping");
        return Ok(Vec::new());
    }

    let mut accepted = Vec::new();
    let mut candidate = rules.get_first_slot_for_field_date_after_time(field, date, None);

    loop {
        if rules.does_proposal_violate_restrictions(field, date, candidate.start) {
            break;
        }

        let overlaps: Vec<&FieldSlot> = in_use
            .iter()
            .copied()
            .filter(|s| candidate.overlaps(s))
            .collect();

        match overlaps.as_slice() {
            [] => {
                let next = candidate.end();
                let wrapped = candidate.wraps_midnight();
                accepted.push(candidate);
                if wrapped {
                    break;
                }
                candidate = FieldSlot::new(field.clone(), next);
            }
            [blocking] => {
                // A blocking game that runs past midnight holds the rest of the day.
                if blocking.wraps_midnight() {
                    break;
                }
                candidate = FieldSlot::new(field.clone(), blocking.end());
            }
            _ => {
                return Err(ScheduleError::OverlappingSlots {
                    field: field.name.clone(),
                    date: *date,
                    count: overlaps.len(),
                });
            }
        }
    }

    Ok(accepted)
}

/// Merges per-field sorted lists by repeatedly taking the earliest head.
/// Ties go to the lower list index.
fn merge_by_start(lists: Vec<Vec<FieldSlot>>) -> Vec<FieldSlot> {
    let total = lists.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    let mut heads: Vec<std::vec::IntoIter<FieldSlot>> =
        lists.into_iter().map(Vec::into_iter).collect();
    let mut peeked: Vec<Option<FieldSlot>> = heads.iter_mut().map(Iterator::next).collect();

    loop {
        let mut best: Option<usize> = None;
        for (idx, head) in peeked.iter().enumerate() {
            let Some(slot) = head else { continue };
            let better = match best.and_then(|b| peeked[b].as_ref()) {
                Some(current) => slot.start < current.start,
                None => true,
            };
            if better {
                best = Some(idx);
            }
        }

        let Some(idx) = best else { break };
        if let Some(slot) = peeked[idx].take() {
            merged.push(slot);
        }
        peeked[idx] = heads[idx].next();
    }

    merged
}
