use serde::Serialize;
use tracing::warn;

use crate::error::{Result, SchedulerError};

use super::assignments::WeekSchedule;
use super::availability::Availability;
use super::roster::Roster;
use super::types::{EmployeeId, Move, StaffingCap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The employee now sits in the target slot.
    Moved,
    /// No target slot (cancelled drop); nothing changed.
    Ignored,
}

/// Applies a manual drag. Availability is not consulted.
///
/// Fails with `CapacityExceeded` when the target slot would be full after the
/// employee leaves the source slot; in that case the schedule is untouched.
pub fn apply_move(schedule: &mut WeekSchedule, cap: StaffingCap, mv: &Move) -> Result<MoveOutcome> {
    let Some(to) = mv.to else {
        return Ok(MoveOutcome::Ignored);
    };

    let leaving_target = mv.from == Some(to) && schedule.contains(to, mv.employee_id);
    let occupied = schedule.slot(to).len() - usize::from(leaving_target);
    if cap.is_full(occupied) {
        warn!(employee = mv.employee_id, slot = %to, cap = cap.value(), "move rejected, slot full");
        return Err(SchedulerError::CapacityExceeded {
            day: to.day,
            hour: to.hour,
            cap: cap.value(),
        });
    }

    if let Some(from) = mv.from {
        schedule.slot_mut(from).retain(|&id| id != mv.employee_id);
    }
    let target = schedule.slot_mut(to);
    if !target.contains(&mv.employee_id) {
        target.push(mv.employee_id);
    }
    Ok(MoveOutcome::Moved)
}

/// Takes an employee off every slot of the week.
pub fn remove_assignments(schedule: &mut WeekSchedule, id: EmployeeId) -> usize {
    schedule.remove_employee(id)
}

/// Empties the schedule and sets every roster employee back to unavailable.
/// Availability of employees no longer on the roster is discarded.
pub fn reset(schedule: &mut WeekSchedule, availability: &mut Availability, roster: &Roster) {
    schedule.clear();
    *availability = Availability::for_roster(roster);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::{Day, Slot};

    fn slot(day: Day, hour: u8) -> Slot {
        Slot::new(day, hour).unwrap()
    }

    fn mv(employee_id: EmployeeId, from: Option<Slot>, to: Option<Slot>) -> Move {
        Move { employee_id, from, to }
    }

    #[test]
    fn move_to_full_slot_rolls_back() {
        let a = slot(Day::Mon, 9);
        let b = slot(Day::Mon, 10);
        let mut schedule = WeekSchedule::new();
        schedule.set_slot(a, vec![1, 2]);
        schedule.set_slot(b, vec![3, 4]);
        let before = schedule.clone();

        let err = apply_move(&mut schedule, StaffingCap::new(2), &mv(1, Some(a), Some(b))).unwrap_err();
        assert!(matches!(err, SchedulerError::CapacityExceeded { day: Day::Mon, hour: 10, cap: 2 }));
        assert_eq!(schedule, before);
    }

    #[test]
    fn move_between_slots() {
        let a = slot(Day::Tue, 12);
        let b = slot(Day::Thu, 18);
        let mut schedule = WeekSchedule::new();
        schedule.set_slot(a, vec![1, 2]);

        let outcome = apply_move(&mut schedule, StaffingCap::new(2), &mv(1, Some(a), Some(b))).unwrap();
        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(schedule.slot(a), &[2]);
        assert_eq!(schedule.slot(b), &[1]);
    }

    #[test]
    fn cancelled_drop_changes_nothing() {
        let a = slot(Day::Mon, 9);
        let mut schedule = WeekSchedule::new();
        schedule.set_slot(a, vec![1]);
        let before = schedule.clone();

        let outcome = apply_move(&mut schedule, StaffingCap::new(1), &mv(1, Some(a), None)).unwrap();
        assert_eq!(outcome, MoveOutcome::Ignored);
        assert_eq!(schedule, before);
    }

    #[test]
    fn dropping_back_on_own_full_slot_is_allowed() {
        let a = slot(Day::Fri, 15);
        let mut schedule = WeekSchedule::new();
        schedule.set_slot(a, vec![1, 2]);

        apply_move(&mut schedule, StaffingCap::new(2), &mv(2, Some(a), Some(a))).unwrap();
        assert_eq!(schedule.slot(a), &[1, 2]);
    }

    #[test]
    fn duplicate_drop_is_idempotent() {
        let b = slot(Day::Sat, 9);
        let mut schedule = WeekSchedule::new();
        schedule.set_slot(b, vec![5]);

        apply_move(&mut schedule, StaffingCap::UNLIMITED, &mv(5, None, Some(b))).unwrap();
        assert_eq!(schedule.slot(b), &[5]);
    }

    #[test]
    fn unlimited_cap_never_rejects() {
        let b = slot(Day::Wed, 11);
        let mut schedule = WeekSchedule::new();
        schedule.set_slot(b, (1..=20).collect());

        apply_move(&mut schedule, StaffingCap::UNLIMITED, &mv(21, None, Some(b))).unwrap();
        assert_eq!(schedule.slot(b).len(), 21);
    }

    #[test]
    fn reset_clears_schedule_and_availability() {
        let roster = Roster::seeded();
        let mut availability = Availability::for_roster(&roster);
        availability.set(1, Day::Mon, 9, true);
        availability.set(77, Day::Mon, 9, true);
        let mut schedule = WeekSchedule::new();
        schedule.set_slot(slot(Day::Mon, 9), vec![1]);

        reset(&mut schedule, &mut availability, &roster);
        assert!(schedule.is_empty());
        assert_eq!(availability, Availability::for_roster(&roster));
        assert!(!availability.contains_employee(77));
    }
}
