use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SchedulerError};
use crate::planner::Planner;
use crate::schedule::{Availability, Roster, StaffingCap, WeekSchedule};

pub const ROSTER_KEY: &str = "shift-employees";
pub const AVAILABILITY_KEY: &str = "shift-availability";
pub const SCHEDULE_KEY: &str = "shift-schedule";

/// Version written into every stored document.
pub const CURRENT_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a, T> {
    version: u32,
    data: &'a T,
}

/// Named JSON blobs in one directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Store { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Reads a blob, `None` if it was never saved.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw = match fs::read_to_string(self.path(key)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let data = match serde_json::from_str::<Value>(&raw)? {
            Value::Object(mut doc) if doc.contains_key("version") && doc.contains_key("data") => {
                let version = doc.get("version").and_then(Value::as_u64).unwrap_or(0);
                if version > u64::from(CURRENT_VERSION) {
                    return Err(SchedulerError::UnsupportedVersion {
                        key: key.to_string(),
                        found: u32::try_from(version).unwrap_or(u32::MAX),
                        supported: CURRENT_VERSION,
                    });
                }
                doc.remove("data").unwrap_or(Value::Null)
            }
            // written before documents carried a version
            bare => bare,
        };
        Ok(Some(serde_json::from_value(data)?))
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_vec_pretty(&Envelope { version: CURRENT_VERSION, data: value })?;
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        debug!(key, path = %path.display(), "saved");
        Ok(())
    }

    /// Loads the planner. A missing roster falls back to the seeded one and
    /// the schedule is checked against the roster before use.
    pub fn load_planner(&self, cap: StaffingCap) -> Result<Planner> {
        let roster = self.load::<Roster>(ROSTER_KEY)?.unwrap_or_else(Roster::seeded);
        let availability = self.load::<Availability>(AVAILABILITY_KEY)?.unwrap_or_default();
        let schedule = self.load::<WeekSchedule>(SCHEDULE_KEY)?.unwrap_or_default();
        Ok(Planner::new(roster, availability, schedule, cap))
    }

    pub fn save_planner(&self, planner: &Planner) -> Result<()> {
        self.save(ROSTER_KEY, planner.roster())?;
        self.save(AVAILABILITY_KEY, planner.availability())?;
        self.save(SCHEDULE_KEY, planner.schedule())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Day, Slot};

    #[test]
    fn empty_directory_gives_seeded_roster() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());

        let planner = store.load_planner(StaffingCap::default()).unwrap();
        assert_eq!(planner.roster(), &Roster::seeded());
        assert!(planner.schedule().is_empty());
        assert!(planner.availability().contains_employee(5));
    }

    #[test]
    fn saved_state_is_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("nested"));
        let mut planner = store.load_planner(StaffingCap::new(1)).unwrap();
        let id = planner.add_employee("Dana").unwrap();
        planner.replace_availability(id, &[Slot::new(Day::Thu, 20).unwrap()]);
        planner.generate();
        store.save_planner(&planner).unwrap();

        let loaded = store.load_planner(StaffingCap::new(1)).unwrap();
        assert_eq!(loaded.roster(), planner.roster());
        assert_eq!(loaded.availability(), planner.availability());
        assert_eq!(loaded.schedule(), planner.schedule());

        let raw = fs::read_to_string(dir.path().join("nested/shift-employees.json")).unwrap();
        assert!(raw.contains("\"version\": 1"));
    }

    #[test]
    fn legacy_documents_are_validated_against_roster() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("shift-employees.json"), r#"[{"id":1,"name":"Alice"}]"#).unwrap();
        fs::write(
            dir.path().join("shift-schedule.json"),
            r#"{"Mon":{"9":[1,2]},"Fri":{"13":[2]}}"#,
        )
        .unwrap();

        let planner = Store::new(dir.path()).load_planner(StaffingCap::default()).unwrap();
        assert_eq!(planner.schedule().slot(Slot::new(Day::Mon, 9).unwrap()), &[1]);
        assert!(planner.schedule().slot(Slot::new(Day::Fri, 13).unwrap()).is_empty());
    }

    #[test]
    fn newer_versions_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("shift-employees.json"), r#"{"version":9,"data":[]}"#).unwrap();

        let err = Store::new(dir.path()).load::<Roster>(ROSTER_KEY).unwrap_err();
        assert!(matches!(err, SchedulerError::UnsupportedVersion { found: 9, .. }));
    }
}
