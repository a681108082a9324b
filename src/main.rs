use elevator_bank::config::fetch_arguments::Args;
use elevator_bank::distributor::distributor::BankEvent;
use elevator_bank::elevator_controller::state::ElevatorEvent;
use elevator_bank::simulation::bank::ElevatorBank;

use anyhow::Context;
use clap::Parser;
use crossbeam_channel as cbc;
use env_logger::Env;
use log::{info, warn};
use std::thread::{self, JoinHandle};

fn describe(event: &BankEvent) -> String {
    match event {
        BankEvent::Assigned {
            floor,
            direction,
            elevator,
        } => format!("{} call at floor {} -> {}", direction, floor, elevator),
        BankEvent::Unserved { floor, direction } => {
            format!("{} call at floor {} could not be served", direction, floor)
        }
        BankEvent::CabinIgnored { elevator, floor } => {
            format!("{} ignored floor {} (travelling away)", elevator, floor)
        }
        BankEvent::Elevator { elevator, event } => match event {
            ElevatorEvent::Arrived { status, .. } => format!("{} arrived: {}", elevator, status),
            ElevatorEvent::StatusUpdate(status) => format!("{}: {}", elevator, status),
        },
    }
}

fn spawn_printer(events: cbc::Receiver<BankEvent>, json: bool) -> JoinHandle<()> {
    thread::spawn(move || {
        for event in events.iter() {
            if json {
                match serde_json::to_string(&event) {
                    Ok(line) => println!("{}", line),
                    Err(error) => warn!("could not encode {:?}: {}", event, error),
                }
            } else {
                info!("{}", describe(&event));
            }
        }
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.to_config().context("invalid configuration")?;

    let (bank, events) = ElevatorBank::start(&config);
    let printer = spawn_printer(events, args.json);

    for step in &args.steps {
        step.run(&bank).with_context(|| format!("step {:?} failed", step))?;
    }

    if !bank
        .wait_until_settled(args.settle_timeout())
        .context("bank stopped while settling")?
    {
        warn!("bank still busy after {} ms, stopping anyway", args.settle_ms);
    }

    bank.shutdown();
    if printer.join().is_err() {
        warn!("event printer panicked");
    }
    Ok(())
}
