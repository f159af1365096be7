use serde::{Deserialize, Serialize};

use super::types::EmployeeId;

/// Which employee's availability is open for editing. Held by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "employee_id", rename_all = "snake_case")]
pub enum EditSession {
    #[default]
    Idle,
    Editing(EmployeeId),
}

impl EditSession {
    /// Opens editing for `id`, replacing any other open session.
    pub fn select(&mut self, id: EmployeeId) {
        *self = EditSession::Editing(id);
    }

    /// Closes the session. Edits were applied as they were made.
    pub fn save(&mut self) {
        *self = EditSession::Idle;
    }

    pub fn editing(&self) -> Option<EmployeeId> {
        match *self {
            EditSession::Editing(id) => Some(id),
            EditSession::Idle => None,
        }
    }

    pub fn allows(&self, id: EmployeeId) -> bool {
        self.editing() == Some(id)
    }
}
