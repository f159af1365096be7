//! Weekly shift scheduling: employees mark hourly availability and a greedy
//! engine spreads the week's hours across them, honouring a per-slot
//! staffing cap and keeping manual placements that are still valid.

pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod import;
pub mod planner;
pub mod schedule;
pub mod storage;
pub mod web;
pub mod week;

pub use error::{Result, SchedulerError};
pub use planner::Planner;
