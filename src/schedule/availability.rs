use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::roster::Roster;
use super::types::{hours, Day, EmployeeId};

type DayHours = BTreeMap<Day, BTreeMap<u8, bool>>;

/// Employee -> Day -> Hour -> available. A missing entry reads as unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Availability {
    employees: BTreeMap<EmployeeId, DayHours>,
}

impl Availability {
    /// Fully-false matrix for every employee on the roster.
    pub fn for_roster(roster: &Roster) -> Self {
        let mut availability = Availability::default();
        for id in roster.ids() {
            availability.clear_employee(id);
        }
        availability
    }

    pub fn is_available(&self, id: EmployeeId, day: Day, hour: u8) -> bool {
        self.employees
            .get(&id)
            .and_then(|days| days.get(&day))
            .and_then(|hours| hours.get(&hour))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, id: EmployeeId, day: Day, hour: u8, available: bool) {
        self.employees
            .entry(id)
            .or_default()
            .entry(day)
            .or_default()
            .insert(hour, available);
    }

    /// Flips one cell, creating missing levels as unavailable first.
    /// Returns the new value.
    pub fn toggle(&mut self, id: EmployeeId, day: Day, hour: u8) -> bool {
        let cell = self
            .employees
            .entry(id)
            .or_default()
            .entry(day)
            .or_default()
            .entry(hour)
            .or_insert(false);
        *cell = !*cell;
        *cell
    }

    /// Resets one employee to a fully-populated, all-false sub-map.
    pub fn clear_employee(&mut self, id: EmployeeId) {
        let days = Day::ALL
            .into_iter()
            .map(|day| (day, hours().map(|hour| (hour, false)).collect()))
            .collect();
        self.employees.insert(id, days);
    }

    /// Overlays stored entries on top of `self`, employee by employee.
    pub fn merge(&mut self, stored: Availability) {
        self.employees.extend(stored.employees);
    }

    pub fn remove_employee(&mut self, id: EmployeeId) -> bool {
        self.employees.remove(&id).is_some()
    }

    pub fn contains_employee(&self, id: EmployeeId) -> bool {
        self.employees.contains_key(&id)
    }

    /// Roster employees free at (day, hour), in roster order.
    pub fn available_ids(&self, roster: &Roster, day: Day, hour: u8) -> Vec<EmployeeId> {
        roster
            .ids()
            .filter(|&id| self.is_available(id, day, hour))
            .collect()
    }

    pub fn hours_available(&self, id: EmployeeId) -> usize {
        self.employees
            .get(&id)
            .map(|days| days.values().flat_map(|h| h.values()).filter(|&&a| a).count())
            .unwrap_or(0)
    }
}
