//! # Waypoint Core
//!
//! Core components of the waypoint screen-navigation engine: typed
//! transitions, workflow nodes with lazily built screens, and nestable
//! flows with reserved end/cancel outcomes.

// Modules
pub mod error;
pub mod flow;
pub mod graph;
pub mod navigator;
pub mod node;
pub mod registration;
pub mod resolver;
pub mod routing;
pub mod screen;
pub mod transition;

// Re-exports
pub use error::TransitionError;
pub use flow::{Flow, FlowHandle, FlowOutcome, FlowState};
pub use graph::NodeHandle;
pub use navigator::Navigator;
pub use node::{NodeId, WorkflowNode};
pub use registration::Registration;
pub use resolver::Resolver;
pub use routing::{Presentable, View, Window};
pub use screen::Screen;
pub use transition::{AnyTransition, Transition, TransitionId};
