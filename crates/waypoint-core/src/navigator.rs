use std::any::TypeId;
use std::rc::Weak;

use crate::error::TransitionError;
use crate::flow::FlowCore;
use crate::graph::NodeHandle;
use crate::node::Connector;
use crate::screen::Screen;
use crate::transition::Transition;

/// Dispatch handle a screen uses to report "transition T fired with payload
/// P" to its owning node, without knowing what happens next.
///
/// The flow is held weakly: screens never keep their flow alive, and firing
/// through a navigator whose flow is gone fails with
/// [`TransitionError::Released`].
pub struct Navigator<S> {
    core: Weak<FlowCore>,
    node: NodeHandle<S>,
}

impl<S> Clone for Navigator<S> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            node: self.node,
        }
    }
}

impl<S: Screen> Navigator<S> {
    pub(crate) fn new(core: Weak<FlowCore>, node: NodeHandle<S>) -> Self {
        Self { core, node }
    }

    /// Deliver a fired transition to the owning node.
    ///
    /// Resolution order: the reserved flow endings complete the flow with no
    /// per-node wiring; otherwise the connector registered for the
    /// transition's identity runs, provided its declared payload type
    /// matches the caller's.
    pub fn navigate<P: 'static>(
        &self,
        transition: &Transition<P>,
        payload: P,
        source: &S,
    ) -> Result<(), TransitionError> {
        let Some(core) = self.core.upgrade() else {
            return Err(TransitionError::Released);
        };
        if core.is_completed() {
            return Err(TransitionError::Completed);
        }

        if let Some(outcome) = FlowCore::reserved_outcome(transition.id()) {
            if TypeId::of::<P>() != TypeId::of::<()>() {
                return Err(TransitionError::TypeMismatch(transition.name().to_string()));
            }
            core.complete(outcome);
            return Ok(());
        }

        let node = core.graph().node::<S>(self.node);
        let connector = node.borrow().connector(transition.id());
        let Some(connector) = connector else {
            return Err(TransitionError::NotRegistered(transition.name().to_string()));
        };

        match connector {
            Connector::WithSource { payload: declared, run } => {
                if declared != TypeId::of::<P>() {
                    return Err(TransitionError::TypeMismatch(transition.name().to_string()));
                }
                (*run)(&core, Box::new(payload), source);
            }
            Connector::Terminal { payload: declared, run } => {
                if declared != TypeId::of::<P>() {
                    return Err(TransitionError::TypeMismatch(transition.name().to_string()));
                }
                (*run)(&core, Box::new(payload));
            }
        }
        Ok(())
    }
}
