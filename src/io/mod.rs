//! I/O layer: recorded rides and synthetic rides.
//!
//! # Contents
//!
//! - [`replay`]: JSON replay files (route + recorded fixes)
//! - [`simulation`]: constant-speed fix generation along a route

pub mod replay;
pub mod simulation;

pub use replay::{FixRecord, ReplayLog};
pub use simulation::RideSimulator;
