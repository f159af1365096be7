use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::planner::Planner;
use crate::schedule::types::hours;
use crate::schedule::{Day, EmployeeId, Slot};

/// One employee's requested availability for the week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftRequest {
    pub name: String,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub added: Vec<EmployeeId>,
    pub updated: Vec<EmployeeId>,
}

/// Parses an hour token such as `"9"`, `"18:00"` or `"13h"`.
fn parse_hour(token: &str) -> Option<u8> {
    let digits: String = token
        .trim()
        .split(':')
        .next()
        .unwrap_or("")
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Parses a cell like `"9-12, 15"` or `"9 - 12 15"` into hours of the
/// working day. Ranges are inclusive; hours outside the day are skipped.
fn parse_hours(cell: &str) -> Vec<u8> {
    // "9 - 12" becomes "9-12" so whitespace can separate entries
    let cell = cell.split('-').map(str::trim).collect::<Vec<_>>().join("-");
    let mut result = Vec::new();
    for part in cell.split(|c: char| c == ',' || c == ';' || c.is_whitespace()) {
        if part.is_empty() {
            continue;
        }
        let (start, end) = match part.split_once('-') {
            Some((a, b)) => (parse_hour(a), parse_hour(b)),
            None => (parse_hour(part), parse_hour(part)),
        };
        let (Some(start), Some(end)) = (start, end) else {
            debug!(token = part, "skipping unreadable hour");
            continue;
        };
        for hour in start.min(end)..=start.max(end) {
            if hours().contains(&hour) && !result.contains(&hour) {
                result.push(hour);
            }
        }
    }
    result.sort_unstable();
    result
}

/// Reads shift requests from CSV with a `name` column and one column per day.
/// A later row for the same name replaces the earlier one.
pub fn load_requests<R: Read>(input: R) -> Result<Vec<ShiftRequest>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(input);
    let headers = reader.headers()?.clone();

    let name_col = headers
        .iter()
        .position(|h| h.trim().to_lowercase().contains("name"))
        .unwrap_or(0);
    let day_cols: Vec<(usize, Day)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| h.parse::<Day>().ok().map(|day| (i, day)))
        .collect();

    let mut requests: Vec<ShiftRequest> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let name = record.get(name_col).unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }

        let mut slots = Vec::new();
        for &(col, day) in &day_cols {
            for hour in parse_hours(record.get(col).unwrap_or("")) {
                slots.push(Slot { day, hour });
            }
        }

        let request = ShiftRequest { name, slots };
        match requests
            .iter_mut()
            .find(|r| r.name.to_lowercase() == request.name.to_lowercase())
        {
            Some(existing) => *existing = request,
            None => requests.push(request),
        }
    }

    Ok(requests)
}

pub fn load_requests_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ShiftRequest>> {
    let file = std::fs::File::open(path)?;
    load_requests(file)
}

/// Applies requests to the planner. Unknown names join the roster; each
/// requester's week is replaced by the request.
pub fn apply_requests(planner: &mut Planner, requests: &[ShiftRequest]) -> ImportSummary {
    let mut summary = ImportSummary::default();
    for request in requests {
        let id = match planner.roster().find_by_name(&request.name) {
            Some(employee) => {
                summary.updated.push(employee.id);
                employee.id
            }
            None => match planner.add_employee(&request.name) {
                Some(id) => {
                    summary.added.push(id);
                    id
                }
                None => continue,
            },
        };
        planner.replace_availability(id, &request.slots);
    }
    info!(added = summary.added.len(), updated = summary.updated.len(), "shift requests imported");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Availability, Roster, StaffingCap, WeekSchedule};

    #[test]
    fn hour_cells() {
        assert_eq!(parse_hours("9-11, 15"), vec![9, 10, 11, 15]);
        assert_eq!(parse_hours("18:00; 7; 22-25"), vec![18, 22, 23]);
        assert_eq!(parse_hours("9 15"), vec![9, 15]);
        assert_eq!(parse_hours("9 12 18"), vec![9, 12, 18]);
        assert_eq!(parse_hours(" 9 - 11  20"), vec![9, 10, 11, 20]);
        assert_eq!(parse_hours("evening"), Vec::<u8>::new());
        assert_eq!(parse_hours(""), Vec::<u8>::new());
    }

    #[test]
    fn resubmission_replaces_earlier_row() {
        let csv = "name,Mon,Tue,Wed,Thu,Fri,Sat\n\
                   Alice,9-10,,,,,\n\
                   Bob,,12,,,,\n\
                   alice,,,,,,20\n";
        let requests = load_requests(csv.as_bytes()).unwrap();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].name, "alice");
        assert_eq!(requests[0].slots, vec![Slot { day: Day::Sat, hour: 20 }]);
        assert_eq!(requests[1].slots, vec![Slot { day: Day::Tue, hour: 12 }]);
    }

    #[test]
    fn only_day_named_columns_are_read() {
        let csv = "name,Monthly total,Mon,Saturation,Sat\n\
                   Alice,12,9 11,10,20\n";
        let requests = load_requests(csv.as_bytes()).unwrap();

        assert_eq!(
            requests[0].slots,
            vec![
                Slot { day: Day::Mon, hour: 9 },
                Slot { day: Day::Mon, hour: 11 },
                Slot { day: Day::Sat, hour: 20 },
            ]
        );
    }

    #[test]
    fn import_updates_known_and_adds_new_employees() {
        let mut planner = Planner::new(
            Roster::seeded(),
            Availability::default(),
            WeekSchedule::new(),
            StaffingCap::default(),
        );
        let mut session = crate::schedule::EditSession::default();
        session.select(5);
        planner.toggle_availability(&session, 5, Day::Fri, 9);

        let csv = "Name,Monday,Friday\nSarah Banfield,10,\nNew Hire,,9-10\n";
        let requests = load_requests(csv.as_bytes()).unwrap();
        let summary = apply_requests(&mut planner, &requests);

        assert_eq!(summary.updated, vec![5]);
        assert_eq!(summary.added, vec![6]);
        assert!(planner.availability().is_available(5, Day::Mon, 10));
        assert!(!planner.availability().is_available(5, Day::Fri, 9));
        assert_eq!(planner.availability().hours_available(6), 2);
    }
}
