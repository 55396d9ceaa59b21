//! Live navigation: instruction cursor, progress and route deviation.
//!
//! The [`NavigationTracker`] consumes position fixes and returns a
//! [`NavigationUpdate`] per fix. Transitions ("events") are read off the
//! update rather than pushed through callbacks.

mod state;
mod tracker;

pub use state::{NavState, NavigationSnapshot, NavigationUpdate, ReachedInstruction};
pub use tracker::NavigationTracker;
