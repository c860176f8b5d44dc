use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::flow::FlowCore;
use crate::registration::Registration;
use crate::screen::Screen;
use crate::transition::TransitionId;

/// Unique identifier for a node in a flow.
pub type NodeId = String;

/// One wired outcome of a node's screen.
///
/// The payload crosses the connector map type-erased; `payload` records the
/// declared type so dispatch can refuse a mismatched call before invoking
/// anything. The shape is explicit: either the wiring sees a destination
/// screen, or the transition is terminal and ends the owning flow.
pub(crate) enum Connector<S: Screen> {
    /// Builds (or fetches) a destination screen and wires source to it.
    WithSource {
        payload: TypeId,
        run: Rc<dyn Fn(&Rc<FlowCore>, Box<dyn Any>, &S)>,
    },
    /// No destination screen; completes or escalates the owning flow.
    Terminal {
        payload: TypeId,
        run: Rc<dyn Fn(&Rc<FlowCore>, Box<dyn Any>)>,
    },
}

impl<S: Screen> Clone for Connector<S> {
    fn clone(&self) -> Self {
        match self {
            Self::WithSource { payload, run } => Self::WithSource {
                payload: *payload,
                run: Rc::clone(run),
            },
            Self::Terminal { payload, run } => Self::Terminal {
                payload: *payload,
                run: Rc::clone(run),
            },
        }
    }
}

/// The routing unit owning one screen's construction and its outgoing
/// transition wiring.
pub struct WorkflowNode<S: Screen> {
    id: NodeId,
    registration: Registration<S>,
    connectors: HashMap<TransitionId, Connector<S>>,
}

impl<S: Screen> WorkflowNode<S> {
    pub(crate) fn new(registration: Registration<S>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            registration,
            connectors: HashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn label(&self) -> String {
        format!("<{} : {}>", type_name::<S>(), self.id)
    }

    pub(crate) fn build(&mut self, input: S::Input) -> Rc<S> {
        debug!(node = %self.label(), "resolving screen");
        self.registration.build(input)
    }

    pub(crate) fn existing_instance(&self) -> Option<Rc<S>> {
        self.registration.instance()
    }

    pub(crate) fn wire(&mut self, id: TransitionId, name: &str, connector: Connector<S>) {
        if self.connectors.insert(id, connector).is_some() {
            warn!(node = %self.label(), transition = name, "replacing connector already wired for this transition");
        } else {
            debug!(node = %self.label(), transition = name, "wired transition");
        }
    }

    pub(crate) fn connector(&self, id: &TransitionId) -> Option<Connector<S>> {
        self.connectors.get(id).cloned()
    }
}

impl<S: Screen> Drop for WorkflowNode<S> {
    fn drop(&mut self) {
        debug!(node = %self.label(), "released");
    }
}
