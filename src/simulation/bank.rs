use crate::config::config::Config;
use crate::distributor::dispatcher::Dispatcher;
use crate::distributor::distributor::{self, BankEvent, Distributor, PanelRequest};
use crate::distributor::lights::LampPanel;
use crate::elevator_controller::clock::SystemClock;
use crate::elevator_controller::controller::ElevatorController;
use crate::elevator_controller::direction::HallDirection;
use crate::elevator_controller::elevator_fsm::{self, Command};
use crate::elevator_controller::state::{ElevatorId, StatusSnapshot};

use crossbeam_channel as cbc;
use log::{error, info};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

const REPLY_TIMEOUT: Duration = Duration::from_secs(1);
const SETTLE_POLL: Duration = Duration::from_millis(20);

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BankError {
    #[error("there is no {0}")]
    UnknownElevator(ElevatorId),
    #[error("the bank is no longer running")]
    Disconnected,
}

/// Handle to a running bank: one thread per controller plus the distributor.
pub struct ElevatorBank {
    panel_tx: cbc::Sender<PanelRequest>,
    controllers: Vec<cbc::Sender<Command>>,
    threads: Vec<JoinHandle<()>>,
}

impl ElevatorBank {
    /// Spawns the bank. The receiver carries every assignment and controller event.
    pub fn start(config: &Config) -> (Self, cbc::Receiver<BankEvent>) {
        let settings = config.controller_settings();
        let clock = SystemClock::new();

        let (elevator_event_tx, elevator_event_rx) = cbc::unbounded();
        let (observer_tx, observer_rx) = cbc::unbounded::<BankEvent>();
        let (panel_tx, panel_rx) = cbc::unbounded::<PanelRequest>();

        let mut controllers = Vec::with_capacity(config.num_elevators);
        let mut threads = Vec::with_capacity(config.num_elevators + 1);

        for index in 0..config.num_elevators {
            let (command_tx, command_rx) = cbc::unbounded::<Command>();
            let controller = ElevatorController::new(ElevatorId(index), settings, clock, elevator_event_tx.clone());
            threads.push(thread::spawn(move || elevator_fsm::elevator_fsm(controller, command_rx)));
            controllers.push(command_tx);
        }
        drop(elevator_event_tx);

        {
            let router = Distributor::new(
                Dispatcher::new(config.num_elevators, config.num_floors, config.passed_penalty),
                LampPanel::new(config.num_floors, config.num_elevators),
                controllers.clone(),
                observer_tx,
            );
            threads.push(thread::spawn(move || {
                distributor::distributor(router, panel_rx, elevator_event_rx)
            }));
        }

        info!(
            "bank of {} elevators over {} floors started",
            config.num_elevators, config.num_floors
        );

        let bank = Self {
            panel_tx,
            controllers,
            threads,
        };
        (bank, observer_rx)
    }

    pub fn num_elevators(&self) -> usize {
        self.controllers.len()
    }

    pub fn hall_call(&self, floor: u8, direction: HallDirection) -> Result<(), BankError> {
        self.panel(PanelRequest::HallCall { floor, direction })
    }

    pub fn cabin_call(&self, elevator: ElevatorId, floor: u8) -> Result<(), BankError> {
        self.controller(elevator)?;
        self.panel(PanelRequest::CabinCall { elevator, floor })
    }

    pub fn open_door(&self, elevator: ElevatorId) -> Result<(), BankError> {
        self.command(elevator, Command::OpenDoor)
    }

    pub fn close_door(&self, elevator: ElevatorId) -> Result<(), BankError> {
        self.command(elevator, Command::CloseDoor)
    }

    /// Asks the controller itself, not the dispatcher's mirror.
    pub fn status(&self, elevator: ElevatorId) -> Result<StatusSnapshot, BankError> {
        let (reply_tx, reply_rx) = cbc::bounded(1);
        self.command(elevator, Command::GetStatus { reply: reply_tx })?;
        reply_rx.recv_timeout(REPLY_TIMEOUT).map_err(|_| BankError::Disconnected)
    }

    pub fn statuses(&self) -> Result<Vec<StatusSnapshot>, BankError> {
        (0..self.num_elevators()).map(|index| self.status(ElevatorId(index))).collect()
    }

    pub fn lamps(&self) -> Result<LampPanel, BankError> {
        let (reply_tx, reply_rx) = cbc::bounded(1);
        self.panel(PanelRequest::Lamps { reply: reply_tx })?;
        reply_rx.recv_timeout(REPLY_TIMEOUT).map_err(|_| BankError::Disconnected)
    }

    /// Waits until every lamp is dark and every elevator rests with its door closed.
    /// Returns `false` if that did not happen within `timeout`.
    pub fn wait_until_settled(&self, timeout: Duration) -> Result<bool, BankError> {
        let deadline = Instant::now() + timeout;
        loop {
            // Lamps first: once the distributor answers, every call it routed is queued at its controller.
            let lamps = self.lamps()?;
            let statuses = self.statuses()?;
            if lamps.is_dark() && statuses.iter().all(StatusSnapshot::is_resting) {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            thread::sleep(SETTLE_POLL);
        }
    }

    /// Hangs up on every thread and waits for them to finish.
    pub fn shutdown(self) {
        let Self {
            panel_tx,
            controllers,
            threads,
        } = self;
        drop(panel_tx);
        drop(controllers);
        for handle in threads {
            if handle.join().is_err() {
                error!("a bank thread panicked");
            }
        }
        info!("bank stopped");
    }

    fn controller(&self, elevator: ElevatorId) -> Result<&cbc::Sender<Command>, BankError> {
        self.controllers
            .get(elevator.index())
            .ok_or(BankError::UnknownElevator(elevator))
    }

    fn command(&self, elevator: ElevatorId, command: Command) -> Result<(), BankError> {
        self.controller(elevator)?
            .send(command)
            .map_err(|_| BankError::Disconnected)
    }

    fn panel(&self, request: PanelRequest) -> Result<(), BankError> {
        self.panel_tx.send(request).map_err(|_| BankError::Disconnected)
    }
}
