use crate::elevator_controller::clock::Clock;
use crate::elevator_controller::controller::ElevatorController;
use crate::elevator_controller::direction::HallDirection;
use crate::elevator_controller::state::StatusSnapshot;

use crossbeam_channel as cbc;
use log::{debug, info};

#[derive(Debug, Clone)]
pub enum Command {
    Dispatch {
        target_floor: u8,
        direction: Option<HallDirection>,
    },
    GetStatus {
        reply: cbc::Sender<StatusSnapshot>,
    },
    OpenDoor,
    CloseDoor,
}

pub fn handle_command<C: Clock>(controller: &mut ElevatorController<C>, command: Command) {
    match command {
        Command::Dispatch {
            target_floor,
            direction,
        } => controller.dispatch(target_floor, direction),
        Command::GetStatus { reply } => {
            let _ = reply.send(controller.status());
        }
        Command::OpenDoor => controller.open_door(),
        Command::CloseDoor => controller.close_door(),
    }
}

/// Runs one controller until every command sender is gone.
///
/// Commands and timer expirations are handled one at a time, so nothing else
/// ever touches the controller's state.
pub fn elevator_fsm<C: Clock>(mut controller: ElevatorController<C>, command_rx: cbc::Receiver<Command>) {
    info!("{} online at floor {}", controller.id(), controller.status().floor);

    loop {
        let timer = match controller.time_until_next_deadline() {
            Some(wait) => cbc::after(wait),
            None => cbc::never(),
        };

        cbc::select! {
            recv(command_rx) -> command => {
                match command {
                    Ok(command) => {
                        debug!("{} <- {:?}", controller.id(), command);
                        handle_command(&mut controller, command);
                    }
                    Err(_) => break,
                }
            },
            recv(timer) -> _ => {
                controller.poll();
            }
        }
    }

    info!("{} shutting down", controller.id());
}
