//! # Waypoint - a typed screen-navigation workflow engine in Rust
//!
//! This crate provides a coordination layer for screen-based UIs: flows own
//! a graph of workflow nodes, each node lazily builds one screen, and
//! declared transitions route a screen's outcomes to the next screen, back
//! to an existing one, or out of the flow entirely.
//!
//! ## Usage
//!
//! Add the crate to your dependencies:
//!
//! ```toml
//! [dependencies]
//! waypoint = "0.3"
//! ```

/// Initialize the framework with default settings.
///
/// This sets up tracing so flows log wiring, screen resolution, and
/// completion.
pub fn init() {
    // Initialize tracing for better logs
    tracing_subscriber::fmt::init();
}

// Re-export the core crate
pub use waypoint_core as core;

pub use waypoint_core::{
    AnyTransition, Flow, FlowHandle, FlowOutcome, FlowState, Navigator, NodeHandle, Presentable,
    Registration, Resolver, Screen, Transition, TransitionError, TransitionId, View, Window,
};
