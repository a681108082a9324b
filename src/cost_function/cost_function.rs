use crate::elevator_controller::direction::{Direction, HallDirection};
use crate::elevator_controller::state::StatusSnapshot;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Price of sending one elevator to a hall call. Every finite cost ranks below `Unavailable`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Cost {
    Finite(u32),
    Unavailable,
}

impl Cost {
    pub fn is_finite(&self) -> bool {
        matches!(self, Cost::Finite(_))
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Finite(cost) => write!(f, "{}", cost),
            Cost::Unavailable => f.write_str("inf"),
        }
    }
}

pub fn cost(status: &StatusSnapshot, target_floor: u8, direction: HallDirection, passed_penalty: u32) -> Cost {
    let distance = u32::from(status.floor.abs_diff(target_floor));

    if status.direction.is_idle() || status.service_direction.is_idle() {
        return Cost::Finite(distance);
    }
    if status.service_direction != Direction::from(direction) {
        return Cost::Unavailable;
    }

    let incoming = match status.direction {
        Direction::Up => status.floor < target_floor,
        Direction::Down => status.floor > target_floor,
        Direction::Idle => false,
    };
    if incoming {
        Cost::Finite(distance)
    } else {
        Cost::Finite(distance.saturating_add(passed_penalty))
    }
}
