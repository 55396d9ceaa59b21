//! Marga - Turn-by-turn route navigation
//!
//! Converts a route polyline into turn instructions, tracks a rider's
//! progress along it from live position fixes, detects route deviation and
//! decides when instructions are announced.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      main.rs                        │  ← Replay CLI
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                 session.rs, io/                     │  ← Orchestration
//! │         (navigation session, replay files)          │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              navigation/, announce/                 │  ← Live state
//! │     (tracker, announcement gate, phrasebooks)       │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     route/                          │  ← Route analysis
//! │          (polyline, turn instructions)              │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │               (types, geodesy)                      │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use marga::{Coordinate, MargaConfig, NavState, NavigationSession, Timestamped};
//! use marga::announce::Announcement;
//!
//! let route = [
//!     Coordinate::new(59.9000, 10.7000),
//!     Coordinate::new(59.9045, 10.7000),
//!     Coordinate::new(59.9045, 10.7090),
//! ];
//!
//! let mut session = NavigationSession::new(&MargaConfig::default(), Vec::<Announcement>::new());
//! session.start_coordinates(&route)?;
//!
//! let update = session.update(&Timestamped::new(route[0], 0));
//! assert_eq!(update.snapshot.state, NavState::Navigating);
//! # Ok::<(), marga::MargaError>(())
//! ```

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Route analysis (depends on core)
// ============================================================================
pub mod route;

// ============================================================================
// Layer 3: Live navigation and announcements (depends on core, route)
// ============================================================================
pub mod announce;
pub mod navigation;

// ============================================================================
// Layer 4: Orchestration and I/O (depends on all layers)
// ============================================================================
pub mod io;
pub mod session;

pub mod config;
pub mod error;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use config::{AnnouncerConfig, MargaConfig, TrackerConfig};
pub use error::{MargaError, Result};

// Core types
pub use crate::core::geo;
pub use crate::core::{Coordinate, PositionFix, Timestamped};

// Route analysis
pub use route::{
    DeviationMetric, NamedPoint, Polyline, Route, RoutePoint, TurnInstruction, TurnKind, analyze,
    analyze_coordinates, classify_turn,
};

// Navigation
pub use navigation::{NavState, NavigationSnapshot, NavigationTracker, NavigationUpdate};

// Announcements
pub use announce::{
    Announcement, AnnouncementGate, AnnouncementKind, AnnouncementSink, EnglishPhrasebook,
    LogSink, Phrasebook, Tier, Urgency,
};

// Orchestration
pub use io::{ReplayLog, RideSimulator};
pub use session::NavigationSession;
