pub mod core {
    pub mod handle_session;
    pub mod horse;
    pub mod orchestrator;
    pub mod outcome;
    pub mod program;
    pub mod race;
    pub mod roster;
    pub mod state_handler;
}

pub mod interfaces {
    pub mod view_interface;
}

pub mod post {
    pub mod horse_stats;
    pub mod race_result;
}

pub mod pre {
    pub mod read_sim_pars;
    pub mod sim_opts;
}
