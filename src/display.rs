use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::planner::Planner;
use crate::schedule::types::hours;
use crate::schedule::{Day, Slot};
use crate::week::{format_hour, Week};

/// Names of the staff in a slot, or `[NO STAFF]`.
pub fn format_slot_staff(planner: &Planner, slot: Slot) -> String {
    let ids = planner.schedule().slot(slot);
    if ids.is_empty() {
        "[NO STAFF]".to_string()
    } else {
        ids.iter()
            .map(|&id| planner.roster().name_of(id))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Writes the weekly schedule followed by per-employee hour totals.
pub fn write_schedule<W: Write>(out: &mut W, planner: &Planner, week: Option<&Week>) -> Result<()> {
    match week {
        Some(week) => writeln!(out, "** Shift schedule {} **", week.label())?,
        None => writeln!(out, "** Shift schedule **")?,
    }

    for day in Day::ALL {
        match week {
            Some(week) => writeln!(out, "\n{} {}", day, week.date_of(day).format("%-m/%-d"))?,
            None => writeln!(out, "\n{}", day)?,
        }
        for hour in hours() {
            let slot = Slot { day, hour };
            writeln!(out, "  {:>5} {}", format_hour(hour), format_slot_staff(planner, slot))?;
        }
    }

    writeln!(out, "\nAssigned hours:")?;
    for employee in planner.stats().employees {
        writeln!(out, "  {} {}", employee.name, employee.assigned_hours)?;
    }
    Ok(())
}

pub fn write_schedule_to_file(planner: &Planner, week: Option<&Week>, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    write_schedule(&mut file, planner, week)
}

/// Renders the schedule to a string.
pub fn render_schedule(planner: &Planner, week: Option<&Week>) -> Result<String> {
    let mut buf = Vec::new();
    write_schedule(&mut buf, planner, week)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn print_schedule(planner: &Planner, week: Option<&Week>) -> Result<()> {
    let stdout = std::io::stdout();
    write_schedule(&mut stdout.lock(), planner, week)
}
