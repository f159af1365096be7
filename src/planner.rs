//! The planner owns every piece of scheduling state and exposes each
//! operation as one method that finishes before returning, so callers only
//! ever observe committed states.

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::schedule::{
    apply_move, generate_schedule, remove_assignments, reset, Availability, Day, EditSession,
    Employee, EmployeeId, Move, MoveOutcome, Roster, Slot, StaffingCap, WeekSchedule,
};

#[derive(Debug, Clone)]
pub struct Planner {
    roster: Roster,
    availability: Availability,
    schedule: WeekSchedule,
    cap: StaffingCap,
}

/// Per-employee totals for reports.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeHours {
    pub id: EmployeeId,
    pub name: String,
    pub assigned_hours: u32,
    pub available_hours: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleStats {
    pub employees: Vec<EmployeeHours>,
    pub unstaffed_slots: Vec<Slot>,
}

impl Planner {
    /// Assembles a planner from loaded parts. Every roster employee gets a
    /// full availability matrix and the schedule is cleaned of unknown ids.
    pub fn new(roster: Roster, stored: Availability, mut schedule: WeekSchedule, cap: StaffingCap) -> Self {
        let mut availability = Availability::for_roster(&roster);
        availability.merge(stored);
        let dropped = schedule.retain_roster(&roster);
        if dropped > 0 {
            info!(dropped, "dropped schedule entries for unknown employees");
        }
        Planner { roster, availability, schedule, cap }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn availability(&self) -> &Availability {
        &self.availability
    }

    pub fn schedule(&self) -> &WeekSchedule {
        &self.schedule
    }

    pub fn cap(&self) -> StaffingCap {
        self.cap
    }

    pub fn set_cap(&mut self, cap: StaffingCap) {
        self.cap = cap;
    }

    /// Adds an employee with an all-unavailable week. Blank names are ignored.
    pub fn add_employee(&mut self, name: &str) -> Option<EmployeeId> {
        let id = self.roster.add(name)?;
        self.availability.clear_employee(id);
        info!(id, name = name.trim(), "employee added");
        Some(id)
    }

    /// Removes an employee and takes them off the schedule. Their
    /// availability entries are left in place.
    pub fn remove_employee(&mut self, id: EmployeeId) -> Option<Employee> {
        let employee = self.roster.remove(id)?;
        let slots = self.schedule.remove_employee(id);
        info!(id, slots, "employee removed");
        Some(employee)
    }

    /// Flips one availability cell, only while `session` is editing `id`.
    /// Returns the new value, or `None` if the toggle was not permitted.
    pub fn toggle_availability(&mut self, session: &EditSession, id: EmployeeId, day: Day, hour: u8) -> Option<bool> {
        if !session.allows(id) || !self.roster.contains(id) {
            return None;
        }
        let slot = Slot::new(day, hour).ok()?;
        Some(self.availability.toggle(id, slot.day, slot.hour))
    }

    /// Replaces an employee's whole week with the given available slots.
    pub fn replace_availability(&mut self, id: EmployeeId, slots: &[Slot]) {
        self.availability.clear_employee(id);
        for slot in slots {
            self.availability.set(id, slot.day, slot.hour, true);
        }
    }

    /// Regenerates the schedule, keeping placements that are still valid.
    pub fn generate(&mut self) -> &WeekSchedule {
        self.schedule = generate_schedule(&self.roster, &self.availability, &self.schedule, self.cap);
        info!(unstaffed = self.schedule.unstaffed_slots().len(), "schedule regenerated");
        &self.schedule
    }

    /// Manual drag of an assignment. Unknown employees are ignored.
    pub fn move_assignment(&mut self, mv: &Move) -> Result<MoveOutcome> {
        if !self.roster.contains(mv.employee_id) {
            return Ok(MoveOutcome::Ignored);
        }
        apply_move(&mut self.schedule, self.cap, mv)
    }

    pub fn remove_assignment(&mut self, id: EmployeeId) -> usize {
        remove_assignments(&mut self.schedule, id)
    }

    /// Clears the schedule and every roster employee's availability.
    pub fn reset(&mut self) {
        reset(&mut self.schedule, &mut self.availability, &self.roster);
        info!("schedule and availability reset");
    }

    pub fn stats(&self) -> ScheduleStats {
        let totals = self.schedule.hours_by_employee();
        let employees = self
            .roster
            .iter()
            .map(|e| EmployeeHours {
                id: e.id,
                name: e.name.clone(),
                assigned_hours: totals.get(&e.id).copied().unwrap_or(0),
                available_hours: self.availability.hours_available(e.id),
            })
            .collect();
        ScheduleStats {
            employees,
            unstaffed_slots: self.schedule.unstaffed_slots(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchedulerError;

    fn alice_and_bob() -> Planner {
        let roster = Roster::new(vec![
            Employee { id: 1, name: "Alice".into() },
            Employee { id: 2, name: "Bob".into() },
        ]);
        Planner::new(roster, Availability::default(), WeekSchedule::new(), StaffingCap::new(1))
    }

    fn mon9() -> Slot {
        Slot::new(Day::Mon, 9).unwrap()
    }

    #[test]
    fn generate_scenario_prefers_roster_order() {
        let mut planner = alice_and_bob();
        for id in [1, 2] {
            let mut session = EditSession::default();
            session.select(id);
            assert_eq!(planner.toggle_availability(&session, id, Day::Mon, 9), Some(true));
            session.save();
        }

        planner.generate();
        assert_eq!(planner.schedule().slot(mon9()), &[1]);
    }

    #[test]
    fn toggle_requires_matching_session() {
        let mut planner = alice_and_bob();
        let mut session = EditSession::default();
        assert_eq!(planner.toggle_availability(&session, 1, Day::Mon, 9), None);

        session.select(2);
        assert_eq!(planner.toggle_availability(&session, 1, Day::Mon, 9), None);
        assert_eq!(planner.toggle_availability(&session, 2, Day::Mon, 30), None);
        assert!(!planner.availability().is_available(1, Day::Mon, 9));
    }

    #[test]
    fn removing_employee_cascades_to_schedule() {
        let mut schedule = WeekSchedule::new();
        schedule.set_slot(mon9(), vec![1, 2]);
        let roster = Roster::new(vec![
            Employee { id: 1, name: "Alice".into() },
            Employee { id: 2, name: "Bob".into() },
        ]);
        let mut planner = Planner::new(roster, Availability::default(), schedule, StaffingCap::new(2));

        let removed = planner.remove_employee(2).unwrap();
        assert_eq!(removed.name, "Bob");
        assert_eq!(planner.schedule().slot(mon9()), &[1]);
        assert_eq!(planner.roster().ids().collect::<Vec<_>>(), vec![1]);
        assert!(planner.availability().contains_employee(2));
    }

    #[test]
    fn new_employee_gets_blank_week() {
        let mut planner = alice_and_bob();
        let id = planner.add_employee("Cara").unwrap();
        assert_eq!(id, 3);
        assert!(planner.availability().contains_employee(3));
        assert_eq!(planner.availability().hours_available(3), 0);
        assert_eq!(planner.add_employee(""), None);
    }

    #[test]
    fn move_reports_capacity_violation() {
        let mut schedule = WeekSchedule::new();
        let mon10 = Slot::new(Day::Mon, 10).unwrap();
        schedule.set_slot(mon9(), vec![1]);
        schedule.set_slot(mon10, vec![2]);
        let mut planner = Planner::new(Roster::seeded(), Availability::default(), schedule, StaffingCap::new(1));
        let before = planner.schedule().clone();

        let result = planner.move_assignment(&Move { employee_id: 1, from: Some(mon9()), to: Some(mon10) });
        assert!(matches!(result, Err(SchedulerError::CapacityExceeded { .. })));
        assert_eq!(planner.schedule(), &before);

        let ignored = planner.move_assignment(&Move { employee_id: 99, from: None, to: Some(mon10) });
        assert_eq!(ignored.unwrap(), MoveOutcome::Ignored);
    }

    #[test]
    fn reset_keeps_roster() {
        let mut planner = alice_and_bob();
        let mut session = EditSession::default();
        session.select(1);
        planner.toggle_availability(&session, 1, Day::Tue, 11);
        planner.generate();

        planner.reset();
        assert!(planner.schedule().is_empty());
        assert_eq!(planner.availability(), &Availability::for_roster(planner.roster()));
        assert_eq!(planner.roster().len(), 2);
    }

    #[test]
    fn stats_follow_roster_order() {
        let mut planner = alice_and_bob();
        planner.replace_availability(2, &[mon9(), Slot::new(Day::Sat, 23).unwrap()]);
        planner.generate();

        let stats = planner.stats();
        assert_eq!(stats.employees[0].name, "Alice");
        assert_eq!(stats.employees[0].assigned_hours, 0);
        assert_eq!(stats.employees[1].assigned_hours, 2);
        assert_eq!(stats.employees[1].available_hours, 2);
        assert_eq!(stats.unstaffed_slots.len(), Slot::all().count() - 2);
    }
}
