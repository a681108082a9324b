use crate::cost_function::cost_function::{self, Cost};
use crate::elevator_controller::direction::HallDirection;
use crate::elevator_controller::state::{ElevatorId, StatusSnapshot};

use log::{debug, trace};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AssignError {
    #[error("no elevator can take a {direction} call at floor {floor}")]
    NoneAvailable { floor: u8, direction: HallDirection },
    #[error("floor {floor} is outside 1..={num_floors}")]
    FloorOutOfRange { floor: u8, num_floors: u8 },
}

/// Picks an elevator for each hall call from the last status every controller pushed.
///
/// The mirror may lag behind the controllers; assignments are best-effort.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    mirror: Vec<StatusSnapshot>,
    num_floors: u8,
    passed_penalty: u32,
}

impl Dispatcher {
    pub fn new(num_elevators: usize, num_floors: u8, passed_penalty: u32) -> Self {
        Self {
            mirror: vec![StatusSnapshot::initial(); num_elevators],
            num_floors,
            passed_penalty,
        }
    }

    pub fn update(&mut self, id: ElevatorId, status: StatusSnapshot) {
        match self.mirror.get_mut(id.index()) {
            Some(slot) => *slot = status,
            None => debug!("status from unknown {} dropped", id),
        }
    }

    pub fn status(&self, id: ElevatorId) -> Option<&StatusSnapshot> {
        self.mirror.get(id.index())
    }

    pub fn statuses(&self) -> &[StatusSnapshot] {
        &self.mirror
    }

    pub fn costs(&self, target_floor: u8, direction: HallDirection) -> Vec<Cost> {
        self.mirror
            .iter()
            .map(|status| cost_function::cost(status, target_floor, direction, self.passed_penalty))
            .collect()
    }

    /// Cheapest elevator for the call. Equal costs go to the lowest id.
    pub fn assign(&self, target_floor: u8, direction: HallDirection) -> Result<ElevatorId, AssignError> {
        if target_floor < 1 || target_floor > self.num_floors {
            return Err(AssignError::FloorOutOfRange {
                floor: target_floor,
                num_floors: self.num_floors,
            });
        }

        let mut best: Option<(ElevatorId, Cost)> = None;
        for (index, cost) in self.costs(target_floor, direction).into_iter().enumerate() {
            trace!("{} prices {} call at floor {} at {}", ElevatorId(index), direction, target_floor, cost);
            if !cost.is_finite() {
                continue;
            }
            if best.map_or(true, |(_, best_cost)| cost < best_cost) {
                best = Some((ElevatorId(index), cost));
            }
        }

        best.map(|(id, _)| id).ok_or(AssignError::NoneAvailable {
            floor: target_floor,
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevator_controller::direction::Direction;

    fn moving(floor: u8, direction: Direction, service_direction: Direction) -> StatusSnapshot {
        StatusSnapshot {
            floor,
            direction,
            service_direction,
            is_moving: true,
            door_open: false,
        }
    }

    #[test]
    fn ties_go_to_the_lowest_id() {
        let dispatcher = Dispatcher::new(4, 10, 20);
        assert_eq!(dispatcher.costs(4, HallDirection::Down), vec![Cost::Finite(3); 4]);
        assert_eq!(dispatcher.assign(4, HallDirection::Down), Ok(ElevatorId(0)));
    }

    #[test]
    fn strictly_cheaper_elevator_wins() {
        let mut dispatcher = Dispatcher::new(3, 10, 20);
        dispatcher.update(ElevatorId(2), StatusSnapshot { floor: 6, ..StatusSnapshot::initial() });
        assert_eq!(dispatcher.assign(7, HallDirection::Up), Ok(ElevatorId(2)));
    }

    #[test]
    fn mismatched_intent_is_skipped_for_any_finite_option() {
        let mut dispatcher = Dispatcher::new(2, 10, 20);
        dispatcher.update(ElevatorId(0), moving(5, Direction::Down, Direction::Down));
        dispatcher.update(ElevatorId(1), moving(1, Direction::Down, Direction::Down));
        // Elevator 1 is right there but serving down; elevator 2 is far but the only taker once it idles.
        assert!(dispatcher.assign(5, HallDirection::Up).is_err());

        dispatcher.update(ElevatorId(1), StatusSnapshot { floor: 10, ..StatusSnapshot::initial() });
        assert_eq!(dispatcher.assign(5, HallDirection::Up), Ok(ElevatorId(1)));
    }

    #[test]
    fn passed_elevator_is_a_last_resort() {
        let mut dispatcher = Dispatcher::new(2, 10, 20);
        dispatcher.update(ElevatorId(0), moving(5, Direction::Up, Direction::Up));
        dispatcher.update(ElevatorId(1), StatusSnapshot { floor: 10, ..StatusSnapshot::initial() });
        assert_eq!(dispatcher.assign(4, HallDirection::Up), Ok(ElevatorId(1)));

        dispatcher.update(ElevatorId(1), moving(2, Direction::Down, Direction::Down));
        assert_eq!(dispatcher.assign(4, HallDirection::Up), Ok(ElevatorId(0)));
    }

    #[test]
    fn none_available_is_explicit() {
        let mut dispatcher = Dispatcher::new(1, 10, 20);
        dispatcher.update(ElevatorId(0), moving(3, Direction::Up, Direction::Up));
        assert_eq!(
            dispatcher.assign(8, HallDirection::Down),
            Err(AssignError::NoneAvailable {
                floor: 8,
                direction: HallDirection::Down
            })
        );
    }

    #[test]
    fn out_of_range_floor_is_rejected() {
        let dispatcher = Dispatcher::new(4, 10, 20);
        assert!(matches!(dispatcher.assign(0, HallDirection::Up), Err(AssignError::FloorOutOfRange { .. })));
        assert!(matches!(dispatcher.assign(11, HallDirection::Up), Err(AssignError::FloorOutOfRange { .. })));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut dispatcher = Dispatcher::new(1, 10, 20);
        dispatcher.update(ElevatorId(7), StatusSnapshot { floor: 9, ..StatusSnapshot::initial() });
        assert_eq!(dispatcher.statuses(), &[StatusSnapshot::initial()]);
    }
}
