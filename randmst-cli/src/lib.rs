//! Support library for the randmst binary.
//!
//! Exposes argument parsing, report rendering and logging setup so doctests
//! and integration tests can drive an experiment without spawning a process.

pub mod cli;
pub mod logging;
