//! Terminal demo client for a remote Monte Carlo AEP simulation.

pub mod analysis;
pub mod cli;
pub mod client;
pub mod config;
pub mod io;
pub mod report;
/// Interactive terminal front end.
#[cfg(feature = "tui")]
pub mod tui;
pub mod view;
