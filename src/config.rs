use std::path::PathBuf;

use crate::schedule::StaffingCap;
use crate::storage::Store;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime settings, built once by the binary and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the stored roster, availability and schedule.
    pub data_dir: PathBuf,
    /// Staffing cap for every slot; zero means unlimited.
    pub max_staff_per_slot: StaffingCap,
    pub bind: String,
    pub port: u16,
    /// Front-end assets served at `/`.
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            max_staff_per_slot: StaffingCap::default(),
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl Config {
    pub fn store(&self) -> Store {
        Store::new(&self.data_dir)
    }
}
