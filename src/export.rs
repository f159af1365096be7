use std::io::Write;

use csv::WriterBuilder;

use crate::error::Result;
use crate::planner::Planner;
use crate::schedule::types::hours;
use crate::schedule::{Day, Slot};
use crate::week::format_hour;

/// Writes the schedule as a CSV grid: one row per hour, one column per day.
/// A cell holds the staff names joined by `" / "`; empty cells mean no staff.
pub fn export_schedule_csv<W: Write>(planner: &Planner, out: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(out);

    let mut header = vec!["Hour".to_string()];
    header.extend(Day::ALL.iter().map(|day| day.label().to_string()));
    wtr.write_record(&header)?;

    for hour in hours() {
        let mut row = vec![format_hour(hour)];
        for day in Day::ALL {
            let names: Vec<&str> = planner
                .schedule()
                .slot(Slot { day, hour })
                .iter()
                .map(|&id| planner.roster().name_of(id))
                .collect();
            row.push(names.join(" / "));
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
