use crate::distributor::dispatcher::{AssignError, Dispatcher};
use crate::distributor::lights::LampPanel;
use crate::elevator_controller::direction::{Direction, HallDirection};
use crate::elevator_controller::elevator_fsm::Command;
use crate::elevator_controller::state::{ElevatorEvent, ElevatorId};

use crossbeam_channel as cbc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// What the floor panels and cabin panels ask of the bank.
#[derive(Debug, Clone)]
pub enum PanelRequest {
    HallCall { floor: u8, direction: HallDirection },
    CabinCall { elevator: ElevatorId, floor: u8 },
    Lamps { reply: cbc::Sender<LampPanel> },
}

/// Everything an observer of the bank gets to see.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum BankEvent {
    Assigned {
        floor: u8,
        direction: HallDirection,
        elevator: ElevatorId,
    },
    Unserved {
        floor: u8,
        direction: HallDirection,
    },
    CabinIgnored {
        elevator: ElevatorId,
        floor: u8,
    },
    Elevator {
        elevator: ElevatorId,
        event: ElevatorEvent,
    },
}

/// State owned by the distributor thread.
pub struct Distributor {
    dispatcher: Dispatcher,
    lamps: LampPanel,
    controllers: Vec<cbc::Sender<Command>>,
    observer_tx: cbc::Sender<BankEvent>,
}

impl Distributor {
    pub fn new(
        dispatcher: Dispatcher,
        lamps: LampPanel,
        controllers: Vec<cbc::Sender<Command>>,
        observer_tx: cbc::Sender<BankEvent>,
    ) -> Self {
        Self {
            dispatcher,
            lamps,
            controllers,
            observer_tx,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn lamps(&self) -> &LampPanel {
        &self.lamps
    }

    pub fn handle_panel(&mut self, request: PanelRequest) {
        match request {
            PanelRequest::HallCall { floor, direction } => self.hall_call(floor, direction),
            PanelRequest::CabinCall { elevator, floor } => self.cabin_call(elevator, floor),
            PanelRequest::Lamps { reply } => {
                let _ = reply.send(self.lamps.clone());
            }
        }
    }

    pub fn handle_elevator_event(&mut self, elevator: ElevatorId, event: ElevatorEvent) {
        self.dispatcher.update(elevator, *event.status());
        if let ElevatorEvent::Arrived { status, served } = &event {
            info!("{} arrived at floor {}", elevator, status.floor);
            self.lamps.clear_served(elevator, status.floor, served);
        }
        self.publish(BankEvent::Elevator { elevator, event });
    }

    fn hall_call(&mut self, floor: u8, direction: HallDirection) {
        match self.dispatcher.assign(floor, direction) {
            Ok(elevator) => {
                info!("assigning {} to {} call at floor {}", elevator, direction, floor);
                self.send(
                    elevator,
                    Command::Dispatch {
                        target_floor: floor,
                        direction: Some(direction),
                    },
                );
                self.lamps.light_hall(floor, direction);
                self.publish(BankEvent::Assigned {
                    floor,
                    direction,
                    elevator,
                });
            }
            Err(AssignError::NoneAvailable { .. }) => {
                warn!("no elevator available for {} call at floor {}", direction, floor);
                self.publish(BankEvent::Unserved { floor, direction });
            }
            Err(error @ AssignError::FloorOutOfRange { .. }) => {
                debug!("hall call rejected: {}", error);
            }
        }
    }

    fn cabin_call(&mut self, elevator: ElevatorId, floor: u8) {
        let Some(status) = self.dispatcher.status(elevator) else {
            debug!("cabin call for unknown {} dropped", elevator);
            return;
        };

        // A cabin travelling away from the pressed floor ignores the button.
        let against_travel = (floor > status.floor && status.direction == Direction::Down)
            || (floor < status.floor && status.direction == Direction::Up);
        if against_travel {
            debug!("{} ignores floor {} while going {}", elevator, floor, status.direction);
            self.publish(BankEvent::CabinIgnored { elevator, floor });
            return;
        }

        self.send(
            elevator,
            Command::Dispatch {
                target_floor: floor,
                direction: None,
            },
        );
        self.lamps.light_cabin(elevator, floor);
    }

    fn send(&self, elevator: ElevatorId, command: Command) {
        match self.controllers.get(elevator.index()) {
            Some(controller) => {
                if controller.send(command).is_err() {
                    warn!("{} is not listening", elevator);
                }
            }
            None => debug!("no controller for {}", elevator),
        }
    }

    fn publish(&self, event: BankEvent) {
        let _ = self.observer_tx.send(event);
    }
}

/// Runs the distributor until the panel side hangs up.
pub fn distributor(
    mut distributor: Distributor,
    panel_rx: cbc::Receiver<PanelRequest>,
    elevator_event_rx: cbc::Receiver<(ElevatorId, ElevatorEvent)>,
) {
    loop {
        cbc::select! {
            recv(panel_rx) -> request => {
                match request {
                    Ok(request) => distributor.handle_panel(request),
                    Err(_) => break,
                }
            },
            recv(elevator_event_rx) -> message => {
                match message {
                    Ok((elevator, event)) => distributor.handle_elevator_event(elevator, event),
                    Err(_) => break,
                }
            }
        }
    }
    info!("distributor shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevator_controller::requests::RequestSet;
    use crate::elevator_controller::state::StatusSnapshot;

    fn distributor(
        num_elevators: usize,
    ) -> (Distributor, Vec<cbc::Receiver<Command>>, cbc::Receiver<BankEvent>) {
        let (senders, receivers): (Vec<_>, Vec<_>) = (0..num_elevators).map(|_| cbc::unbounded()).unzip();
        let (observer_tx, observer_rx) = cbc::unbounded();
        let distributor = Distributor::new(
            Dispatcher::new(num_elevators, 10, 20),
            LampPanel::new(10, num_elevators),
            senders,
            observer_tx,
        );
        (distributor, receivers, observer_rx)
    }

    #[test]
    fn hall_call_goes_to_the_assigned_controller() {
        let (mut distributor, controllers, observer) = distributor(2);
        distributor.handle_elevator_event(
            ElevatorId(1),
            ElevatorEvent::StatusUpdate(StatusSnapshot { floor: 6, ..StatusSnapshot::initial() }),
        );
        let _ = observer.try_recv();

        distributor.handle_panel(PanelRequest::HallCall {
            floor: 7,
            direction: HallDirection::Down,
        });

        assert!(controllers[0].try_recv().is_err());
        assert!(matches!(
            controllers[1].try_recv(),
            Ok(Command::Dispatch {
                target_floor: 7,
                direction: Some(HallDirection::Down)
            })
        ));
        assert_eq!(
            observer.try_recv(),
            Ok(BankEvent::Assigned {
                floor: 7,
                direction: HallDirection::Down,
                elevator: ElevatorId(1)
            })
        );
        assert!(distributor.lamps().hall_lit(7, HallDirection::Down));
    }

    #[test]
    fn unserved_calls_are_reported() {
        let (mut distributor, controllers, observer) = distributor(1);
        let busy = StatusSnapshot {
            floor: 3,
            direction: Direction::Up,
            service_direction: Direction::Up,
            is_moving: true,
            door_open: false,
        };
        distributor.handle_elevator_event(ElevatorId(0), ElevatorEvent::StatusUpdate(busy));
        let _ = observer.try_recv();

        distributor.handle_panel(PanelRequest::HallCall {
            floor: 2,
            direction: HallDirection::Down,
        });
        assert!(controllers[0].try_recv().is_err());
        assert_eq!(
            observer.try_recv(),
            Ok(BankEvent::Unserved {
                floor: 2,
                direction: HallDirection::Down
            })
        );
        assert!(!distributor.lamps().hall_lit(2, HallDirection::Down));
    }

    #[test]
    fn cabin_press_against_travel_is_ignored() {
        let (mut distributor, controllers, observer) = distributor(1);
        let going_up = StatusSnapshot {
            floor: 5,
            direction: Direction::Up,
            service_direction: Direction::Up,
            is_moving: true,
            door_open: false,
        };
        distributor.handle_elevator_event(ElevatorId(0), ElevatorEvent::StatusUpdate(going_up));
        let _ = observer.try_recv();

        distributor.handle_panel(PanelRequest::CabinCall {
            elevator: ElevatorId(0),
            floor: 2,
        });
        assert!(controllers[0].try_recv().is_err());
        assert_eq!(
            observer.try_recv(),
            Ok(BankEvent::CabinIgnored {
                elevator: ElevatorId(0),
                floor: 2
            })
        );

        distributor.handle_panel(PanelRequest::CabinCall {
            elevator: ElevatorId(0),
            floor: 9,
        });
        assert!(matches!(
            controllers[0].try_recv(),
            Ok(Command::Dispatch {
                target_floor: 9,
                direction: None
            })
        ));
        assert!(distributor.lamps().cabin_lit(ElevatorId(0), 9));
    }

    #[test]
    fn arrival_clears_lamps_and_is_republished() {
        let (mut distributor, _controllers, observer) = distributor(1);
        distributor.handle_panel(PanelRequest::HallCall {
            floor: 4,
            direction: HallDirection::Up,
        });
        let _ = observer.try_recv();
        assert!(distributor.lamps().hall_lit(4, HallDirection::Up));

        let status = StatusSnapshot {
            floor: 4,
            direction: Direction::Up,
            service_direction: Direction::Up,
            is_moving: true,
            door_open: true,
        };
        let served = RequestSet {
            hall_up: true,
            ..RequestSet::empty()
        };
        distributor.handle_elevator_event(ElevatorId(0), ElevatorEvent::Arrived { status, served });

        assert!(!distributor.lamps().hall_lit(4, HallDirection::Up));
        assert_eq!(distributor.dispatcher().status(ElevatorId(0)), Some(&status));
        assert!(matches!(observer.try_recv(), Ok(BankEvent::Elevator { .. })));
    }

    #[test]
    fn lamp_query_replies_with_a_copy() {
        let (mut distributor, _controllers, _observer) = distributor(1);
        let (reply_tx, reply_rx) = cbc::bounded(1);
        distributor.handle_panel(PanelRequest::Lamps { reply: reply_tx });
        assert_eq!(reply_rx.try_recv(), Ok(LampPanel::new(10, 1)));
    }
}
