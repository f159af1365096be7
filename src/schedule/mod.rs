pub mod types;
pub mod roster;
pub mod availability;
pub mod assignments;
pub mod engine;
pub mod edits;
pub mod session;

pub use types::{Day, Employee, EmployeeId, Move, Slot, StaffingCap};
pub use roster::Roster;
pub use availability::Availability;
pub use assignments::WeekSchedule;
pub use engine::generate_schedule;
pub use edits::{apply_move, remove_assignments, reset, MoveOutcome};
pub use session::EditSession;
