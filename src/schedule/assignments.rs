use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::roster::Roster;
use super::types::{Day, EmployeeId, Slot};

/// Day -> Hour -> employees working that hour. Slots never hold duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekSchedule {
    days: BTreeMap<Day, BTreeMap<u8, Vec<EmployeeId>>>,
}

impl WeekSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Employees in a slot; empty if the slot was never filled.
    pub fn slot(&self, slot: Slot) -> &[EmployeeId] {
        self.days
            .get(&slot.day)
            .and_then(|hours| hours.get(&slot.hour))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn set_slot(&mut self, slot: Slot, ids: Vec<EmployeeId>) {
        self.days.entry(slot.day).or_default().insert(slot.hour, ids);
    }

    pub(crate) fn slot_mut(&mut self, slot: Slot) -> &mut Vec<EmployeeId> {
        self.days.entry(slot.day).or_default().entry(slot.hour).or_default()
    }

    pub fn contains(&self, slot: Slot, id: EmployeeId) -> bool {
        self.slot(slot).contains(&id)
    }

    /// Drops `id` from every slot. Returns how many slots it was removed from.
    pub fn remove_employee(&mut self, id: EmployeeId) -> usize {
        let mut removed = 0;
        for ids in self.days.values_mut().flat_map(|hours| hours.values_mut()) {
            let before = ids.len();
            ids.retain(|&other| other != id);
            removed += before - ids.len();
        }
        removed
    }

    /// Keeps only roster employees and collapses duplicates, first occurrence wins.
    pub fn retain_roster(&mut self, roster: &Roster) -> usize {
        let mut dropped = 0;
        for ids in self.days.values_mut().flat_map(|hours| hours.values_mut()) {
            let before = ids.len();
            let mut seen = Vec::with_capacity(before);
            ids.retain(|&id| {
                if roster.contains(id) && !seen.contains(&id) {
                    seen.push(id);
                    true
                } else {
                    false
                }
            });
            dropped += before - ids.len();
        }
        dropped
    }

    pub fn clear(&mut self) {
        self.days.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().flat_map(|hours| hours.values()).all(Vec::is_empty)
    }

    /// Filled slots as (slot, employees), Day then Hour order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &[EmployeeId])> {
        self.days.iter().flat_map(|(&day, hours)| {
            hours
                .iter()
                .map(move |(&hour, ids)| (Slot { day, hour }, ids.as_slice()))
        })
    }

    /// Total assigned hours per employee.
    pub fn hours_by_employee(&self) -> HashMap<EmployeeId, u32> {
        let mut totals = HashMap::new();
        for (_, ids) in self.iter() {
            for &id in ids {
                *totals.entry(id).or_insert(0) += 1;
            }
        }
        totals
    }

    /// Slots of the week with nobody assigned.
    pub fn unstaffed_slots(&self) -> Vec<Slot> {
        Slot::all().filter(|&slot| self.slot(slot).is_empty()).collect()
    }
}
