use thiserror::Error;

use crate::schedule::types::{Day, EmployeeId};

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Slot {day} {hour}:00 is full (max {cap} staff per slot)")]
    CapacityExceeded { day: Day, hour: u8, cap: u32 },

    #[error("Unknown day: {0}")]
    UnknownDay(String),

    #[error("Hour {0} is outside the scheduling range")]
    HourOutOfRange(u8),

    #[error("Week is outside the supported date range")]
    WeekOutOfRange,

    #[error("Employee not found: {0}")]
    EmployeeNotFound(EmployeeId),

    #[error("Stored document {key} has version {found} (supported up to {supported})")]
    UnsupportedVersion { key: String, found: u32, supported: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SchedulerError {
    /// Short error code returned to HTTP clients.
    pub fn code(&self) -> &'static str {
        match self {
            SchedulerError::CapacityExceeded { .. } => "CAPACITY_EXCEEDED",
            SchedulerError::UnknownDay(_) => "UNKNOWN_DAY",
            SchedulerError::HourOutOfRange(_) => "HOUR_OUT_OF_RANGE",
            SchedulerError::WeekOutOfRange => "WEEK_OUT_OF_RANGE",
            SchedulerError::EmployeeNotFound(_) => "EMPLOYEE_NOT_FOUND",
            SchedulerError::UnsupportedVersion { .. } => "UNSUPPORTED_VERSION",
            SchedulerError::Io(_) => "IO_ERROR",
            SchedulerError::Serialization(_) => "SERIALIZATION_ERROR",
            SchedulerError::Csv(_) => "CSV_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
