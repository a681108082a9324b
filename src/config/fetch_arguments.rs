use crate::config::config::{Config, ConfigError};
use crate::simulation::script::ScriptStep;

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Runs a scripted day in an elevator bank.
#[derive(Debug, Parser)]
#[command(name = "elevator-bank", version)]
pub struct Args {
    /// JSON file with any of numFloors, numElevators, tickIntervalMs, doorDwellMs, passedPenalty
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    #[arg(long, short)]
    pub floors: Option<u8>,

    #[arg(long, short)]
    pub elevators: Option<usize>,

    #[arg(long)]
    pub tick_ms: Option<u64>,

    #[arg(long)]
    pub dwell_ms: Option<u64>,

    #[arg(long)]
    pub penalty: Option<u32>,

    /// Print events as JSON lines instead of log lines
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// How long to wait for the bank to come to rest after the last step
    #[arg(long, default_value_t = 60_000)]
    pub settle_ms: u64,

    /// hall:<floor>:<up|down>, cabin:<elevator>:<floor>, open:<elevator>, close:<elevator>, wait:<ms>
    pub steps: Vec<ScriptStep>,
}

impl Args {
    /// Defaults, then the config file, then flags.
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };

        if let Some(floors) = self.floors {
            config.num_floors = floors;
        }
        if let Some(elevators) = self.elevators {
            config.num_elevators = elevators;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(dwell_ms) = self.dwell_ms {
            config.door_dwell_ms = dwell_ms;
        }
        if let Some(penalty) = self.penalty {
            config.passed_penalty = penalty;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}
