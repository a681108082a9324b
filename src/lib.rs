pub mod config {
    pub mod config;
    pub mod fetch_arguments;
}

pub mod elevator_controller {
    pub mod clock;
    pub mod controller;
    pub mod direction;
    pub mod doors;
    pub mod elevator_fsm;
    pub mod requests;
    pub mod state;
}

pub mod cost_function {
    pub mod cost_function;
}

pub mod distributor {
    pub mod dispatcher;
    pub mod distributor;
    pub mod lights;
}

pub mod simulation {
    pub mod bank;
    pub mod script;
}
