use crate::elevator_controller::direction::Direction;
use crate::elevator_controller::requests::RequestSet;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ElevatorId(pub usize);

impl ElevatorId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ElevatorId {
    /// Elevators are numbered from 1 for people.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "elevator {}", self.0 + 1)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Idle,
    Moving,
    DoorOpen,
}

impl fmt::Display for Behaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Behaviour::Idle => "idle",
            Behaviour::Moving => "moving",
            Behaviour::DoorOpen => "doorOpen",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub floor: u8,
    #[serde(rename = "physicalDirection")]
    pub direction: Direction,
    pub service_direction: Direction,
    pub is_moving: bool,
    pub door_open: bool,
}

impl StatusSnapshot {
    /// Ground floor, nothing to do, door closed.
    pub fn initial() -> Self {
        Self {
            floor: 1,
            direction: Direction::Idle,
            service_direction: Direction::Idle,
            is_moving: false,
            door_open: false,
        }
    }

    pub fn behaviour(&self) -> Behaviour {
        if self.door_open {
            Behaviour::DoorOpen
        } else if self.is_moving {
            Behaviour::Moving
        } else {
            Behaviour::Idle
        }
    }

    pub fn is_resting(&self) -> bool {
        !self.is_moving && !self.door_open && self.direction.is_idle()
    }

    pub fn directions_in_sync(&self) -> bool {
        self.direction.is_idle() == self.service_direction.is_idle()
    }
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "floor {} {} (moving {}, serving {})",
            self.floor,
            self.behaviour(),
            self.direction,
            self.service_direction
        )
    }
}

/// What a controller pushes to its observers.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum ElevatorEvent {
    StatusUpdate(StatusSnapshot),
    Arrived { status: StatusSnapshot, served: RequestSet },
}

impl ElevatorEvent {
    pub fn status(&self) -> &StatusSnapshot {
        match self {
            ElevatorEvent::StatusUpdate(status) => status,
            ElevatorEvent::Arrived { status, .. } => status,
        }
    }
}
