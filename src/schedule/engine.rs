use std::collections::HashMap;

use tracing::debug;

use super::assignments::WeekSchedule;
use super::availability::Availability;
use super::roster::Roster;
use super::types::{EmployeeId, Slot, StaffingCap};

/// Builds a new week schedule from availability, keeping prior placements
/// that are still valid.
///
/// Slots are visited in Day then Hour order. For each slot:
/// 1. employees still scheduled there and still available are carried over
///    (duplicates collapsed, truncated to the cap if it was lowered);
/// 2. the remaining available employees are ranked by hours handed out so far
///    in this run, ties keeping roster order;
/// 3. the best ranked fill whatever capacity is left, and each gets one hour
///    added to their running total.
pub fn generate_schedule(
    roster: &Roster,
    availability: &Availability,
    current: &WeekSchedule,
    cap: StaffingCap,
) -> WeekSchedule {
    let mut schedule = WeekSchedule::new();
    let mut assigned_hours: HashMap<EmployeeId, u32> = roster.ids().map(|id| (id, 0)).collect();
    let mut filled = 0usize;
    let mut unstaffed = 0usize;

    for slot in Slot::all() {
        let available = availability.available_ids(roster, slot.day, slot.hour);

        let mut staff: Vec<EmployeeId> = Vec::with_capacity(available.len());
        for &id in current.slot(slot) {
            if available.contains(&id) && !staff.contains(&id) {
                staff.push(id);
            }
        }
        if let Some(max) = cap.remaining(0) {
            staff.truncate(max);
        }

        let mut candidates: Vec<EmployeeId> = available
            .into_iter()
            .filter(|id| !staff.contains(id))
            .collect();
        // sort_by_key is stable, so equal totals keep roster order
        candidates.sort_by_key(|id| assigned_hours.get(id).copied().unwrap_or(0));

        let take = cap.remaining(staff.len()).unwrap_or(candidates.len());
        for id in candidates.into_iter().take(take) {
            staff.push(id);
            *assigned_hours.entry(id).or_insert(0) += 1;
            filled += 1;
        }

        if staff.is_empty() {
            unstaffed += 1;
        }
        schedule.set_slot(slot, staff);
    }

    debug!(
        employees = roster.len(),
        cap = cap.value(),
        new_assignments = filled,
        unstaffed_slots = unstaffed,
        "schedule generated"
    );

    schedule
}
