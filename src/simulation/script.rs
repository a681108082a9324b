use crate::elevator_controller::direction::HallDirection;
use crate::elevator_controller::state::ElevatorId;
use crate::simulation::bank::{BankError, ElevatorBank};

use std::str::FromStr;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// One step of a scripted run, written as `hall:5:up`, `cabin:2:7`, `open:1`, `close:1` or `wait:1500`.
///
/// Elevators are numbered from 1 in scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStep {
    Hall { floor: u8, direction: HallDirection },
    Cabin { elevator: ElevatorId, floor: u8 },
    Open { elevator: ElevatorId },
    Close { elevator: ElevatorId },
    Wait(Duration),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("'{step}': {reason}")]
    Invalid { step: String, reason: String },
}

fn invalid(step: &str, reason: impl Into<String>) -> ScriptError {
    ScriptError::Invalid {
        step: step.to_string(),
        reason: reason.into(),
    }
}

fn number<T: FromStr>(step: &str, field: Option<&str>, what: &str) -> Result<T, ScriptError> {
    let field = field.ok_or_else(|| invalid(step, format!("missing {}", what)))?;
    field
        .parse()
        .map_err(|_| invalid(step, format!("'{}' is not a valid {}", field, what)))
}

fn elevator(step: &str, field: Option<&str>) -> Result<ElevatorId, ScriptError> {
    let number: usize = number(step, field, "elevator number")?;
    number
        .checked_sub(1)
        .map(ElevatorId)
        .ok_or_else(|| invalid(step, "elevators are numbered from 1"))
}

impl FromStr for ScriptStep {
    type Err = ScriptError;

    fn from_str(step: &str) -> Result<Self, Self::Err> {
        let mut fields = step.trim().split(':');
        let verb = fields.next().unwrap_or_default().to_ascii_lowercase();

        let parsed = match verb.as_str() {
            "hall" => {
                let floor = number(step, fields.next(), "floor")?;
                let direction = fields
                    .next()
                    .ok_or_else(|| invalid(step, "missing direction"))?
                    .parse::<HallDirection>()
                    .map_err(|reason| invalid(step, reason))?;
                ScriptStep::Hall { floor, direction }
            }
            "cabin" => {
                let elevator = elevator(step, fields.next())?;
                let floor = number(step, fields.next(), "floor")?;
                ScriptStep::Cabin { elevator, floor }
            }
            "open" => ScriptStep::Open {
                elevator: elevator(step, fields.next())?,
            },
            "close" => ScriptStep::Close {
                elevator: elevator(step, fields.next())?,
            },
            "wait" => ScriptStep::Wait(Duration::from_millis(number(step, fields.next(), "duration in ms")?)),
            other => return Err(invalid(step, format!("unknown step '{}'", other))),
        };

        match fields.next() {
            Some(extra) => Err(invalid(step, format!("unexpected '{}'", extra))),
            None => Ok(parsed),
        }
    }
}

impl ScriptStep {
    pub fn run(&self, bank: &ElevatorBank) -> Result<(), BankError> {
        match *self {
            ScriptStep::Hall { floor, direction } => bank.hall_call(floor, direction),
            ScriptStep::Cabin { elevator, floor } => bank.cabin_call(elevator, floor),
            ScriptStep::Open { elevator } => bank.open_door(elevator),
            ScriptStep::Close { elevator } => bank.close_door(elevator),
            ScriptStep::Wait(duration) => {
                thread::sleep(duration);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_step() {
        assert_eq!(
            "hall:5:up".parse::<ScriptStep>(),
            Ok(ScriptStep::Hall {
                floor: 5,
                direction: HallDirection::Up
            })
        );
        assert_eq!(
            "cabin:2:7".parse::<ScriptStep>(),
            Ok(ScriptStep::Cabin {
                elevator: ElevatorId(1),
                floor: 7
            })
        );
        assert_eq!("open:1".parse::<ScriptStep>(), Ok(ScriptStep::Open { elevator: ElevatorId(0) }));
        assert_eq!("CLOSE:4".parse::<ScriptStep>(), Ok(ScriptStep::Close { elevator: ElevatorId(3) }));
        assert_eq!("wait:250".parse::<ScriptStep>(), Ok(ScriptStep::Wait(Duration::from_millis(250))));
    }

    #[test]
    fn rejects_malformed_steps() {
        for step in ["", "hall:5", "hall:x:up", "hall:5:left", "cabin:0:3", "open", "wait:soon", "jump:3", "open:1:2"] {
            assert!(step.parse::<ScriptStep>().is_err(), "{} should not parse", step);
        }
    }
}
