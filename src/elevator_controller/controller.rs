use crate::config::config::ControllerSettings;
use crate::elevator_controller::clock::{Clock, SystemClock};
use crate::elevator_controller::direction::{Direction, HallDirection};
use crate::elevator_controller::doors::Door;
use crate::elevator_controller::requests::{RequestBoard, RequestKind, RequestSet};
use crate::elevator_controller::state::{ElevatorEvent, ElevatorId, StatusSnapshot};

use crossbeam_channel as cbc;
use log::{debug, info, trace, warn};
use std::time::Duration;

/// Decision engine for one elevator.
///
/// Every public operation runs to completion against the controller's own
/// clock. Ticks and door dwell are absolute deadlines; `poll` fires the ones
/// that are due, so the same controller works under a real clock in its own
/// thread and under a `ManualClock` in tests.
pub struct ElevatorController<C: Clock = SystemClock> {
    id: ElevatorId,
    settings: ControllerSettings,
    clock: C,
    board: RequestBoard,
    floor: u8,
    direction: Direction,
    service_direction: Direction,
    is_moving: bool,
    door: Door,
    next_tick: Option<Duration>,
    // Intent of the first call that arrived while the door was open with nothing to serve.
    deferred_intent: Option<Direction>,
    event_tx: cbc::Sender<(ElevatorId, ElevatorEvent)>,
}

impl<C: Clock> ElevatorController<C> {
    pub fn new(
        id: ElevatorId,
        settings: ControllerSettings,
        clock: C,
        event_tx: cbc::Sender<(ElevatorId, ElevatorEvent)>,
    ) -> Self {
        Self {
            id,
            settings,
            clock,
            board: RequestBoard::new(settings.num_floors),
            floor: 1,
            direction: Direction::Idle,
            service_direction: Direction::Idle,
            is_moving: false,
            door: Door::new(settings.door_dwell),
            next_tick: None,
            deferred_intent: None,
            event_tx,
        }
    }

    pub fn id(&self) -> ElevatorId {
        self.id
    }

    pub fn board(&self) -> &RequestBoard {
        &self.board
    }

    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            floor: self.floor,
            direction: self.direction,
            service_direction: self.service_direction,
            is_moving: self.is_moving,
            door_open: self.door.is_open(),
        }
    }

    /// Earliest pending tick or door deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.next_tick, self.door.close_at()) {
            (Some(tick), Some(close)) => Some(tick.min(close)),
            (tick, close) => tick.or(close),
        }
    }

    pub fn time_until_next_deadline(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.next_deadline().map(|deadline| deadline.saturating_sub(now))
    }

    /// Registers a hall call (`Some(direction)`) or a cabin call (`None`) and wakes the elevator if it rests.
    pub fn dispatch(&mut self, target_floor: u8, direction: Option<HallDirection>) {
        let now = self.clock.now();
        if !self.board.contains_floor(target_floor) {
            debug!(
                "{}: ignoring call to floor {} outside 1..={}",
                self.id, target_floor, self.settings.num_floors
            );
            return;
        }

        let kind = match direction {
            Some(HallDirection::Up) => RequestKind::HallUp,
            Some(HallDirection::Down) => RequestKind::HallDown,
            None => RequestKind::CabinExit,
        };
        self.board.add(target_floor, kind);
        trace!("{}: {:?} registered at floor {}", self.id, kind, target_floor);

        if self.service_direction.is_idle() {
            let intent = match direction {
                Some(direction) => Direction::from(direction),
                None => Direction::between(self.floor, target_floor),
            };
            if self.is_resting() {
                self.service_direction = intent;
            } else if self.deferred_intent.is_none() && !intent.is_idle() {
                self.deferred_intent = Some(intent);
            }
        }

        if self.is_resting() {
            self.decide_direction();
            info!(
                "{}: waking at floor {}, heading {} to serve {}",
                self.id, self.floor, self.direction, self.service_direction
            );
            self.is_moving = true;
            self.step(now);
        }
        self.check_invariants();
    }

    /// Opens the door of a stopped elevator, or restarts the dwell of an open one.
    pub fn open_door(&mut self) {
        let now = self.clock.now();
        if self.door.is_open() {
            self.door.extend(now);
            debug!("{}: door held open at floor {}", self.id, self.floor);
        } else if !self.is_moving && self.direction.is_idle() {
            self.arrive(now, RequestSet::empty());
        } else {
            debug!("{}: door cannot open in transit", self.id);
        }
        self.check_invariants();
    }

    pub fn close_door(&mut self) {
        if self.door.is_open() {
            let now = self.clock.now();
            self.close_and_continue(now);
        } else {
            trace!("{}: door already closed", self.id);
        }
        self.check_invariants();
    }

    /// Fires every tick and dwell deadline that is due on the clock, oldest first.
    pub fn poll(&mut self) {
        let now = self.clock.now();
        while let Some(deadline) = self.next_deadline().filter(|deadline| *deadline <= now) {
            if self.door.is_due(deadline) {
                self.close_and_continue(deadline);
            } else {
                self.next_tick = None;
                self.step(deadline);
            }
        }
        self.check_invariants();
    }

    fn is_resting(&self) -> bool {
        !self.door.is_open() && !self.is_moving
    }

    fn step(&mut self, now: Duration) {
        let floor = self.floor;
        let here = self.board.at(floor);
        let mut served = RequestSet::empty();

        if here.cabin_exit {
            self.board.clear(floor, RequestKind::CabinExit);
            served.insert(RequestKind::CabinExit);
        }

        match self.direction {
            Direction::Up => {
                if here.hall_up && self.service_direction != Direction::Down {
                    self.board.clear(floor, RequestKind::HallUp);
                    served.insert(RequestKind::HallUp);
                }
                if here.hall_down && !self.board.has_any_above(floor) {
                    self.board.clear(floor, RequestKind::HallDown);
                    served.insert(RequestKind::HallDown);
                    self.turn_around(Direction::Down);
                }
            }
            Direction::Down => {
                if here.hall_down && self.service_direction != Direction::Up {
                    self.board.clear(floor, RequestKind::HallDown);
                    served.insert(RequestKind::HallDown);
                }
                if here.hall_up && !self.board.has_any_below(floor) {
                    self.board.clear(floor, RequestKind::HallUp);
                    served.insert(RequestKind::HallUp);
                    self.turn_around(Direction::Up);
                }
            }
            Direction::Idle => {
                served = served.union(&self.board.clear_all(floor));
            }
        }

        let only_work_is_here = served.is_empty()
            && !self.direction.is_idle()
            && !here.is_empty()
            && !self.board.has_any_above(floor)
            && !self.board.has_any_below(floor);
        if only_work_is_here {
            // Nothing pending on any other floor and no stop rule matched: serve this floor in place.
            debug!(
                "{}: serving {:?} in place at floor {} while going {} to serve {}",
                self.id, here, floor, self.direction, self.service_direction
            );
            served = self.board.clear_all(floor);
            self.direction = Direction::Idle;
            self.service_direction = Direction::Idle;
        }

        if !served.is_empty() {
            self.next_tick = None;
            self.arrive(now, served);
            return;
        }

        self.decide_direction();
        let next_floor = match self.direction {
            Direction::Idle => {
                self.is_moving = false;
                self.next_tick = None;
                info!("{}: idle at floor {}", self.id, floor);
                self.publish_status();
                return;
            }
            Direction::Up => floor.checked_add(1),
            Direction::Down => floor.checked_sub(1),
        };

        match next_floor.filter(|next| self.board.contains_floor(*next)) {
            Some(next) => {
                self.floor = next;
                self.is_moving = true;
                self.next_tick = Some(now + self.settings.tick_interval);
                trace!("{}: floor {} -> {} ({})", self.id, floor, next, self.direction);
                self.publish_status();
            }
            None => {
                // The only work left is on this floor; serve it in place.
                warn!(
                    "{}: no floor beyond {} going {}, serving in place",
                    self.id, floor, self.direction
                );
                self.direction = Direction::Idle;
                self.service_direction = Direction::Idle;
                self.step(now);
            }
        }
    }

    /// LOOK: keep going while work lies ahead, reverse at the end of the scan.
    fn decide_direction(&mut self) {
        let floor = self.floor;
        let top = self.board.num_floors();
        let previous = self.direction;

        self.direction = match previous {
            Direction::Up => {
                if self.board.has_any_above(floor) {
                    Direction::Up
                } else if self.board.has_any(1..=floor) {
                    Direction::Down
                } else {
                    Direction::Idle
                }
            }
            Direction::Down => {
                if self.board.has_any_below(floor) {
                    Direction::Down
                } else if self.board.has_any(floor..=top) {
                    Direction::Up
                } else {
                    Direction::Idle
                }
            }
            Direction::Idle => {
                if self.board.has_any_above(floor) {
                    Direction::Up
                } else if self.board.has_any_below(floor) {
                    Direction::Down
                } else if !self.board.at(floor).is_empty() {
                    self.service_direction
                } else {
                    Direction::Idle
                }
            }
        };

        if self.direction.is_idle() {
            self.service_direction = Direction::Idle;
        } else if self.service_direction.is_idle() {
            self.service_direction = self.direction;
        }

        if self.direction != previous && !previous.is_idle() {
            debug!(
                "{}: reversing at floor {}, now {} serving {}",
                self.id, floor, self.direction, self.service_direction
            );
        }
    }

    fn turn_around(&mut self, direction: Direction) {
        debug!("{}: turning around at floor {} to go {}", self.id, self.floor, direction);
        self.direction = direction;
        self.service_direction = direction;
    }

    fn arrive(&mut self, now: Duration, served: RequestSet) {
        self.door.open(now);
        debug!("{}: door open at floor {}, served {:?}", self.id, self.floor, served);
        let status = self.status();
        self.emit(ElevatorEvent::Arrived { status, served });
        self.emit(ElevatorEvent::StatusUpdate(status));
    }

    fn close_and_continue(&mut self, now: Duration) {
        self.door.close();
        if let Some(intent) = self.deferred_intent.take() {
            if self.service_direction.is_idle() {
                self.service_direction = intent;
            }
        }
        self.decide_direction();
        debug!("{}: door closed at floor {}", self.id, self.floor);
        self.publish_status();
        self.step(now);
    }

    fn publish_status(&self) {
        self.emit(ElevatorEvent::StatusUpdate(self.status()));
    }

    fn emit(&self, event: ElevatorEvent) {
        // Observers are best-effort; nobody listening is fine.
        let _ = self.event_tx.send((self.id, event));
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.board.contains_floor(self.floor),
            "{} left the shaft at floor {}",
            self.id,
            self.floor
        );
        debug_assert_eq!(
            self.direction.is_idle(),
            self.service_direction.is_idle(),
            "{} moving {} but serving {}",
            self.id,
            self.direction,
            self.service_direction
        );
    }
}
