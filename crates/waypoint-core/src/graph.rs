use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::node::WorkflowNode;
use crate::registration::Registration;
use crate::screen::Screen;

/// Stable, copyable reference to a node inside one flow's arena. Connectors
/// capture handles instead of nodes, so the wiring graph may be cyclic
/// without creating reference cycles.
pub struct NodeHandle<S> {
    index: usize,
    _screen: PhantomData<fn(S)>,
}

impl<S> NodeHandle<S> {
    fn new(index: usize) -> Self {
        Self {
            index,
            _screen: PhantomData,
        }
    }
}

impl<S> Clone for NodeHandle<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for NodeHandle<S> {}

impl<S> fmt::Debug for NodeHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeHandle").field("index", &self.index).finish()
    }
}

/// Arena of type-erased node slots. The owning flow keeps every wired node
/// alive for its whole lifetime; handles re-enter a slot with its screen
/// type.
pub(crate) struct Graph {
    slots: RefCell<Vec<Rc<dyn Any>>>,
}

impl Graph {
    pub(crate) fn new() -> Self {
        Self {
            slots: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn insert<S: Screen>(&self, registration: Registration<S>) -> NodeHandle<S> {
        let mut slots = self.slots.borrow_mut();
        let handle = NodeHandle::new(slots.len());
        slots.push(Rc::new(RefCell::new(WorkflowNode::new(registration))));
        handle
    }

    /// Panics when the handle was minted by a different flow.
    pub(crate) fn node<S: Screen>(&self, handle: NodeHandle<S>) -> Rc<RefCell<WorkflowNode<S>>> {
        let slot = self.slots.borrow().get(handle.index).cloned();
        match slot.and_then(|slot| slot.downcast::<RefCell<WorkflowNode<S>>>().ok()) {
            Some(node) => node,
            None => panic!("node handle does not belong to this flow"),
        }
    }
}
