//! Command-line interface for the randmst estimator.
//!
//! Takes the reporting level, vertex count, trial count and dimension as
//! positional arguments, runs the experiment and renders reports whose detail
//! depends on the reporting level. The final line is always
//! `average_weight vertex_count trial_count dimension`.

mod commands;
mod format;

pub use commands::{
    Cli, CliError, ExecutionSummary, PolicyArg, render_instance, render_summary, render_trial,
    run_cli,
};
