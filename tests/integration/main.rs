mod autoscroll_flow;
mod config_loading;
mod helpers;
mod runtime_loops;
mod scenario_replay;
