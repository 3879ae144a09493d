//! Port traits the domain talks to.

pub mod config_port;
pub mod data_port;
pub mod signal_port;
