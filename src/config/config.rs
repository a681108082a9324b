use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time;
use thiserror::Error;

pub const ELEV_NUM_FLOORS: u8 = 10;
pub const ELEV_NUM_ELEVATORS: usize = 4;

pub const TICK_DURATION: time::Duration = time::Duration::from_secs(1);
pub const DOOR_TIMER_DURATION: time::Duration = time::Duration::from_secs(3);

/// Extra cost, in floors, for an elevator that shares the caller's intent but has already passed the floor.
pub const PASSED_CALL_PENALTY: u32 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("a bank needs at least one elevator")]
    NoElevators,
    #[error("a building needs at least 2 floors, got {0}")]
    TooFewFloors(u8),
    #[error("{0} must be longer than zero")]
    ZeroDuration(&'static str),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub num_floors: u8,
    pub num_elevators: usize,
    pub tick_interval_ms: u64,
    pub door_dwell_ms: u64,
    pub passed_penalty: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_floors: ELEV_NUM_FLOORS,
            num_elevators: ELEV_NUM_ELEVATORS,
            tick_interval_ms: TICK_DURATION.as_millis() as u64,
            door_dwell_ms: DOOR_TIMER_DURATION.as_millis() as u64,
            passed_penalty: PASSED_CALL_PENALTY,
        }
    }
}

impl Config {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_elevators == 0 {
            return Err(ConfigError::NoElevators);
        }
        if self.num_floors < 2 {
            return Err(ConfigError::TooFewFloors(self.num_floors));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration("tick interval"));
        }
        if self.door_dwell_ms == 0 {
            return Err(ConfigError::ZeroDuration("door dwell"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> time::Duration {
        time::Duration::from_millis(self.tick_interval_ms)
    }

    pub fn door_dwell(&self) -> time::Duration {
        time::Duration::from_millis(self.door_dwell_ms)
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            num_floors: self.num_floors,
            tick_interval: self.tick_interval(),
            door_dwell: self.door_dwell(),
        }
    }
}

/// The slice of the configuration a single controller needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub num_floors: u8,
    pub tick_interval: time::Duration,
    pub door_dwell: time::Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Config::default().controller_settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_building() {
        let config = Config::default();
        assert_eq!(config.num_floors, 10);
        assert_eq!(config.num_elevators, 4);
        assert_eq!(config.tick_interval(), time::Duration::from_secs(1));
        assert_eq!(config.door_dwell(), time::Duration::from_secs(3));
        assert_eq!(config.passed_penalty, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{ "numFloors": 6, "doorDwellMs": 500 }"#).unwrap();
        assert_eq!(config.num_floors, 6);
        assert_eq!(config.door_dwell_ms, 500);
        assert_eq!(config.num_elevators, ELEV_NUM_ELEVATORS);
        assert_eq!(config.tick_interval_ms, 1000);
    }

    #[test]
    fn validate_rejects_unusable_values() {
        let config = Config { num_elevators: 0, ..Config::default() };
        assert!(matches!(config.validate(), Err(ConfigError::NoElevators)));

        let config = Config { num_floors: 1, ..Config::default() };
        assert!(matches!(config.validate(), Err(ConfigError::TooFewFloors(1))));

        let config = Config { tick_interval_ms: 0, ..Config::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroDuration(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = Config::from_json_file("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
