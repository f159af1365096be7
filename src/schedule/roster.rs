use serde::{Deserialize, Serialize};

use super::types::{Employee, EmployeeId};

/// Ordered list of employees. Roster order is the engine's tie-break order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    employees: Vec<Employee>,
}

impl Roster {
    pub fn new(employees: Vec<Employee>) -> Self {
        Roster { employees }
    }

    /// Roster used when nothing has been saved yet.
    pub fn seeded() -> Self {
        let names = [
            "Joey Swanger",
            "Mallory Coleman",
            "Mathew Henman",
            "Skyler-Bailey Manapat",
            "Sarah Banfield",
        ];
        Roster {
            employees: names
                .iter()
                .zip(1..)
                .map(|(name, id)| Employee { id, name: name.to_string() })
                .collect(),
        }
    }

    /// Appends a new employee and returns its id. Blank names are ignored.
    pub fn add(&mut self, name: &str) -> Option<EmployeeId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id = self.employees.iter().map(|e| e.id).max().map_or(1, |max| max + 1);
        self.employees.push(Employee { id, name: name.to_string() });
        Some(id)
    }

    pub fn remove(&mut self, id: EmployeeId) -> Option<Employee> {
        let index = self.employees.iter().position(|e| e.id == id)?;
        Some(self.employees.remove(index))
    }

    pub fn get(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EmployeeId) -> bool {
        self.get(id).is_some()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Employee> {
        let wanted = name.trim().to_lowercase();
        self.employees.iter().find(|e| e.name.trim().to_lowercase() == wanted)
    }

    /// Display name for an id, `"Unknown"` if it is not on the roster.
    pub fn name_of(&self, id: EmployeeId) -> &str {
        self.get(id).map_or("Unknown", |e| e.name.as_str())
    }

    pub fn ids(&self) -> impl Iterator<Item = EmployeeId> + '_ {
        self.employees.iter().map(|e| e.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Employee> {
        self.employees.iter()
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}
