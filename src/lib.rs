//! Common functionality for sosim, a tool for coupling infrastructure models into
//! system-of-systems simulations.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod dependency;
pub mod error;
pub mod graph;
pub mod id;
pub mod input;
pub mod interval;
pub mod log;
pub mod model;
pub mod output;
pub mod port;
pub mod region;
pub mod settings;
pub mod simulation;
pub mod timeseries;
pub mod value;

#[cfg(test)]
mod fixture;

/// Get the folder where program configuration files are stored.
///
/// Falls back to the current directory if the platform has no config directory.
pub fn get_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_default();
    path.push("sosim");

    path
}
