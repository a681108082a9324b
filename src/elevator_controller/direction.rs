use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Used both for where the cabin is heading and for the intent it has committed to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Idle,
    Up,
    Down,
}

impl Direction {
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Idle => Direction::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Direction::Idle
    }

    /// Direction of travel needed to get from `from` to `to`.
    pub fn between(from: u8, to: u8) -> Self {
        if to > from {
            Direction::Up
        } else if to < from {
            Direction::Down
        } else {
            Direction::Idle
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Idle => "idle",
            Direction::Up => "up",
            Direction::Down => "down",
        };
        f.write_str(name)
    }
}

/// The direction carried by a hall call.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HallDirection {
    Up,
    Down,
}

impl From<HallDirection> for Direction {
    fn from(direction: HallDirection) -> Self {
        match direction {
            HallDirection::Up => Direction::Up,
            HallDirection::Down => Direction::Down,
        }
    }
}

impl fmt::Display for HallDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Direction::from(*self).fmt(f)
    }
}

impl FromStr for HallDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(HallDirection::Up),
            "down" | "d" => Ok(HallDirection::Down),
            other => Err(format!("unknown hall direction '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_keeps_idle() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Idle.opposite(), Direction::Idle);
    }

    #[test]
    fn between_floors() {
        assert_eq!(Direction::between(1, 5), Direction::Up);
        assert_eq!(Direction::between(5, 1), Direction::Down);
        assert_eq!(Direction::between(3, 3), Direction::Idle);
    }

    #[test]
    fn hall_direction_parses_and_serializes_lowercase() {
        assert_eq!("UP".parse::<HallDirection>(), Ok(HallDirection::Up));
        assert_eq!("d".parse::<HallDirection>(), Ok(HallDirection::Down));
        assert!("sideways".parse::<HallDirection>().is_err());
        assert_eq!(serde_json::to_string(&Direction::Idle).unwrap(), "\"idle\"");
    }
}
