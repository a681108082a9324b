use crate::elevator_controller::direction::HallDirection;
use crate::elevator_controller::requests::RequestSet;
use crate::elevator_controller::state::ElevatorId;

use serde::{Deserialize, Serialize};

/// Button lamps of the whole bank. Row `f - 1` is floor `f`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LampPanel {
    /// `[up, down]` per floor.
    pub hall: Vec<[bool; 2]>,
    /// One row per elevator, one lamp per floor.
    pub cabin: Vec<Vec<bool>>,
}

fn hall_slot(direction: HallDirection) -> usize {
    match direction {
        HallDirection::Up => 0,
        HallDirection::Down => 1,
    }
}

impl LampPanel {
    pub fn new(num_floors: u8, num_elevators: usize) -> Self {
        Self {
            hall: vec![[false; 2]; num_floors as usize],
            cabin: vec![vec![false; num_floors as usize]; num_elevators],
        }
    }

    pub fn light_hall(&mut self, floor: u8, direction: HallDirection) {
        if let Some(lamps) = floor.checked_sub(1).and_then(|row| self.hall.get_mut(row as usize)) {
            lamps[hall_slot(direction)] = true;
        }
    }

    pub fn light_cabin(&mut self, elevator: ElevatorId, floor: u8) {
        if let Some(lamp) = self.cabin_lamp(elevator, floor) {
            *lamp = true;
        }
    }

    pub fn hall_lit(&self, floor: u8, direction: HallDirection) -> bool {
        floor
            .checked_sub(1)
            .and_then(|row| self.hall.get(row as usize))
            .map_or(false, |lamps| lamps[hall_slot(direction)])
    }

    pub fn cabin_lit(&self, elevator: ElevatorId, floor: u8) -> bool {
        floor
            .checked_sub(1)
            .and_then(|row| self.cabin.get(elevator.index())?.get(row as usize))
            .copied()
            .unwrap_or(false)
    }

    pub fn is_dark(&self) -> bool {
        self.hall.iter().all(|lamps| !lamps[0] && !lamps[1]) && self.cabin.iter().flatten().all(|lit| !lit)
    }

    /// Turns off whatever `elevator` just served at `floor`.
    pub fn clear_served(&mut self, elevator: ElevatorId, floor: u8, served: &RequestSet) {
        if let Some(lamps) = floor.checked_sub(1).and_then(|row| self.hall.get_mut(row as usize)) {
            if served.hall_up {
                lamps[hall_slot(HallDirection::Up)] = false;
            }
            if served.hall_down {
                lamps[hall_slot(HallDirection::Down)] = false;
            }
        }
        if served.cabin_exit {
            if let Some(lamp) = self.cabin_lamp(elevator, floor) {
                *lamp = false;
            }
        }
    }

    fn cabin_lamp(&mut self, elevator: ElevatorId, floor: u8) -> Option<&mut bool> {
        let row = floor.checked_sub(1)?;
        self.cabin.get_mut(elevator.index())?.get_mut(row as usize)
    }
}
