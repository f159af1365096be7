use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

pub type EmployeeId = u32;

/// First bookable hour of the day (inclusive).
pub const FIRST_HOUR: u8 = 9;
/// Last bookable hour of the day (inclusive).
pub const LAST_HOUR: u8 = 23;
pub const HOURS_PER_DAY: usize = (LAST_HOUR - FIRST_HOUR + 1) as usize;

/// Staffing cap applied when nothing else is configured.
pub const DEFAULT_MAX_STAFF: u32 = 2;

/// Hours of a working day, in scheduling order.
pub fn hours() -> RangeInclusive<u8> {
    FIRST_HOUR..=LAST_HOUR
}

/// A working day. Declaration order is the week order used everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    pub const ALL: [Day; 6] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri, Day::Sat];

    pub fn label(self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Day::Mon => "Monday",
            Day::Tue => "Tuesday",
            Day::Wed => "Wednesday",
            Day::Thu => "Thursday",
            Day::Fri => "Friday",
            Day::Sat => "Saturday",
        }
    }

    /// Days since Monday.
    pub fn offset(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Day {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Day::ALL
            .into_iter()
            .find(|day| lower == day.label().to_lowercase() || lower == day.full_name().to_lowercase())
            .ok_or_else(|| SchedulerError::UnknownDay(s.to_string()))
    }
}

/// One (Day, Hour) cell, the atomic unit of staffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSlot")]
pub struct Slot {
    pub day: Day,
    pub hour: u8,
}

#[derive(Deserialize)]
struct RawSlot {
    day: Day,
    hour: u8,
}

impl TryFrom<RawSlot> for Slot {
    type Error = SchedulerError;

    fn try_from(raw: RawSlot) -> Result<Self, Self::Error> {
        Slot::new(raw.day, raw.hour)
    }
}

impl Slot {
    pub fn new(day: Day, hour: u8) -> Result<Self, SchedulerError> {
        if hours().contains(&hour) {
            Ok(Slot { day, hour })
        } else {
            Err(SchedulerError::HourOutOfRange(hour))
        }
    }

    /// Every slot of the week, Day order then Hour order.
    pub fn all() -> impl Iterator<Item = Slot> {
        Day::ALL
            .into_iter()
            .flat_map(|day| hours().map(move |hour| Slot { day, hour }))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:00", self.day, self.hour)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
}

/// Maximum number of employees per slot. Zero means unlimited, not "closed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffingCap(u32);

impl StaffingCap {
    pub const UNLIMITED: StaffingCap = StaffingCap(0);

    pub fn new(max_staff_per_slot: u32) -> Self {
        StaffingCap(max_staff_per_slot)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_unlimited(self) -> bool {
        self.0 == 0
    }

    /// Whether a slot holding `occupied` employees can take no one else.
    pub fn is_full(self, occupied: usize) -> bool {
        !self.is_unlimited() && occupied >= self.0 as usize
    }

    /// Free places left in a slot, `None` when unlimited.
    pub fn remaining(self, occupied: usize) -> Option<usize> {
        if self.is_unlimited() {
            None
        } else {
            Some((self.0 as usize).saturating_sub(occupied))
        }
    }
}

impl Default for StaffingCap {
    fn default() -> Self {
        StaffingCap(DEFAULT_MAX_STAFF)
    }
}

/// A manual drag of one assignment. A missing `to` is a cancelled drop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Move {
    pub employee_id: EmployeeId,
    #[serde(default)]
    pub from: Option<Slot>,
    #[serde(default)]
    pub to: Option<Slot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_has_ninety_slots_in_order() {
        let slots: Vec<Slot> = Slot::all().collect();
        assert_eq!(slots.len(), Day::ALL.len() * HOURS_PER_DAY);
        assert_eq!(slots[0], Slot { day: Day::Mon, hour: 9 });
        assert_eq!(slots[14], Slot { day: Day::Mon, hour: 23 });
        assert_eq!(slots[15], Slot { day: Day::Tue, hour: 9 });
        assert!(slots.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn slot_rejects_hours_outside_range() {
        assert!(Slot::new(Day::Mon, 8).is_err());
        assert!(Slot::new(Day::Mon, 24).is_err());
        assert!(Slot::new(Day::Sat, 23).is_ok());

        let parsed: Result<Slot, _> = serde_json::from_str(r#"{"day":"Wed","hour":7}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn day_parses_labels_and_full_names() {
        assert_eq!("Mon".parse::<Day>().unwrap(), Day::Mon);
        assert_eq!(" saturday ".parse::<Day>().unwrap(), Day::Sat);
        assert!("Sun".parse::<Day>().is_err());
        assert!("Monthly total".parse::<Day>().is_err());
        assert!("Saturation".parse::<Day>().is_err());
        assert!("Mond".parse::<Day>().is_err());
    }

    #[test]
    fn zero_cap_is_unlimited() {
        let cap = StaffingCap::new(0);
        assert!(cap.is_unlimited());
        assert!(!cap.is_full(1_000));
        assert_eq!(cap.remaining(5), None);

        let cap = StaffingCap::new(2);
        assert!(cap.is_full(2));
        assert_eq!(cap.remaining(1), Some(1));
        assert_eq!(cap.remaining(3), Some(0));
    }
}
