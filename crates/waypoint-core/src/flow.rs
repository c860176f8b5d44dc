use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::graph::{Graph, NodeHandle};
use crate::navigator::Navigator;
use crate::node::Connector;
use crate::registration::Registration;
use crate::routing::Presentable;
use crate::screen::Screen;
use crate::transition::{AnyTransition, Transition, TransitionId};

/// Identities shared by every flow's reserved endings.
const END_ID: &str = "flow.end";
const CANCEL_ID: &str = "flow.cancel";

/// Lifecycle of a flow container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Created,
    Active,
    Ended,
    Cancelled,
}

/// How a flow finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    Ended,
    Cancelled,
}

pub(crate) struct FlowCore {
    graph: Graph,
    state: Cell<FlowState>,
    completion: RefCell<Option<Box<dyn FnOnce(FlowOutcome)>>>,
}

impl FlowCore {
    fn new() -> Self {
        Self {
            graph: Graph::new(),
            state: Cell::new(FlowState::Created),
            completion: RefCell::new(None),
        }
    }

    pub(crate) fn graph(&self) -> &Graph {
        &self.graph
    }

    pub(crate) fn is_completed(&self) -> bool {
        matches!(self.state.get(), FlowState::Ended | FlowState::Cancelled)
    }

    pub(crate) fn reserved_outcome(id: &TransitionId) -> Option<FlowOutcome> {
        match id.as_str() {
            END_ID => Some(FlowOutcome::Ended),
            CANCEL_ID => Some(FlowOutcome::Cancelled),
            _ => None,
        }
    }

    /// Build `handle`'s screen and hand it a navigator for this flow.
    pub(crate) fn resolve<S: Screen>(
        core: &Rc<Self>,
        handle: NodeHandle<S>,
        input: S::Input,
    ) -> Rc<S> {
        let node = core.graph.node(handle);
        let screen = node.borrow_mut().build(input);
        screen.bind_navigator(Navigator::new(Rc::downgrade(core), handle));
        screen
    }

    pub(crate) fn complete(&self, outcome: FlowOutcome) {
        if self.is_completed() {
            warn!(?outcome, "ignoring completion of an already-completed flow");
            return;
        }
        self.state.set(match outcome {
            FlowOutcome::Ended => FlowState::Ended,
            FlowOutcome::Cancelled => FlowState::Cancelled,
        });
        debug!(?outcome, "flow completed");
        let callback = self.completion.borrow_mut().take();
        if let Some(callback) = callback {
            callback(outcome);
        }
    }
}

/// A directed graph of workflow nodes forming one complete, nestable
/// navigable unit with its own end/cancel outcomes.
///
/// Wiring happens once, between [`Flow::new`] and [`Flow::start`]; after the
/// entry screen is built the graph is only read. Connectors reference their
/// destinations by handle, so the flow owns every node for its whole
/// lifetime and cyclic screen graphs need no special handling.
pub struct Flow {
    core: Rc<FlowCore>,
}

impl Flow {
    pub fn new() -> Self {
        Self {
            core: Rc::new(FlowCore::new()),
        }
    }

    /// The reserved ending transition; equal across all flows and handled
    /// without per-node wiring.
    pub fn end_transition() -> Transition<()> {
        Transition::with_id(END_ID, "end")
    }

    /// The reserved cancellation transition; equal across all flows and
    /// handled without per-node wiring.
    pub fn cancel_transition() -> Transition<()> {
        Transition::with_id(CANCEL_ID, "cancel")
    }

    /// Add a node to the flow's graph.
    pub fn add_node<S: Screen>(&self, registration: Registration<S>) -> NodeHandle<S> {
        self.core.graph.insert(registration)
    }

    /// Install the callback invoked once when the flow ends or cancels.
    /// Parent flows install their own ending here; capture them weakly (via
    /// [`FlowHandle`]) to keep nested flows cycle-free.
    pub fn on_complete(&self, callback: impl FnOnce(FlowOutcome) + 'static) {
        *self.core.completion.borrow_mut() = Some(Box::new(callback));
    }

    /// Weak handle for completion wiring from outros and parents.
    pub fn handle(&self) -> FlowHandle {
        FlowHandle {
            core: Rc::downgrade(&self.core),
        }
    }

    pub fn state(&self) -> FlowState {
        self.core.state.get()
    }

    /// The node's screen, if its registration has a cached instance.
    pub fn existing<S: Screen>(&self, node: NodeHandle<S>) -> Option<Rc<S>> {
        self.core.graph.node(node).borrow().existing_instance()
    }

    /// Build the entry node's screen, activating the flow.
    pub fn start<S: Screen>(&self, entry: NodeHandle<S>, input: S::Input) -> Rc<S> {
        if self.core.state.get() == FlowState::Created {
            self.core.state.set(FlowState::Active);
        } else {
            debug_assert!(false, "flow started twice");
            warn!(state = ?self.core.state.get(), "starting a flow that is not in its created state");
        }
        FlowCore::resolve(&self.core, entry, input)
    }

    /// Wire `transition` to build `dest` from the transition payload, then
    /// run `connector(source, destination)` for app-specific data wiring.
    pub fn connect<S, D, P>(
        &self,
        source: NodeHandle<S>,
        transition: &Transition<P>,
        dest: NodeHandle<D>,
        connector: impl Fn(&S, &D) + 'static,
    ) where
        S: Screen,
        D: Screen<Input = P>,
        P: 'static,
    {
        self.connect_via(source, transition, dest, |payload| payload, connector);
    }

    /// Wire `transition` to build `dest` from a fixed input producer,
    /// ignoring the transition payload.
    pub fn connect_with<S, D, P>(
        &self,
        source: NodeHandle<S>,
        transition: &Transition<P>,
        dest: NodeHandle<D>,
        input: impl Fn() -> D::Input + 'static,
        connector: impl Fn(&S, &D) + 'static,
    ) where
        S: Screen,
        D: Screen,
        P: 'static,
    {
        self.connect_via(source, transition, dest, move |_| input(), connector);
    }

    /// General wiring: bridge the transition payload into the destination's
    /// input, build the destination, run the connector.
    pub fn connect_via<S, D, P>(
        &self,
        source: NodeHandle<S>,
        transition: &Transition<P>,
        dest: NodeHandle<D>,
        bridge: impl Fn(P) -> D::Input + 'static,
        connector: impl Fn(&S, &D) + 'static,
    ) where
        S: Screen,
        D: Screen,
        P: 'static,
    {
        let run = move |core: &Rc<FlowCore>, payload: Box<dyn Any>, src: &S| {
            let Ok(payload) = payload.downcast::<P>() else {
                // Unreachable: dispatch checks the payload tag first.
                return;
            };
            let destination = FlowCore::resolve(core, dest, bridge(*payload));
            connector(src, &destination);
        };
        self.wire(
            source,
            transition,
            Connector::WithSource {
                payload: TypeId::of::<P>(),
                run: Rc::new(run),
            },
        );
    }

    /// Wire `transition` to push the destination's view from the source's.
    pub fn push<S, D, P>(
        &self,
        source: NodeHandle<S>,
        transition: &Transition<P>,
        dest: NodeHandle<D>,
        animated: bool,
    ) where
        S: Presentable,
        D: Presentable + Screen<Input = P>,
        P: 'static,
    {
        self.connect(source, transition, dest, move |src: &S, dst: &D| {
            src.view().push(dst.view(), animated);
        });
    }

    /// Wire `transition` to present the destination's view from the
    /// source's.
    pub fn present<S, D, P>(
        &self,
        source: NodeHandle<S>,
        transition: &Transition<P>,
        dest: NodeHandle<D>,
        animated: bool,
    ) where
        S: Presentable,
        D: Presentable + Screen<Input = P>,
        P: 'static,
    {
        self.connect(source, transition, dest, move |src: &S, dst: &D| {
            src.view().present(dst.view(), animated);
        });
    }

    /// Wire void transitions back to `dest`'s already-built screen, if any,
    /// instead of building a new one. The connector receives `None` when the
    /// destination was never built; that is not an error.
    ///
    /// A transition declared with a non-void payload cannot unwind: it is
    /// skipped with an assertion in debug builds and a warning otherwise.
    pub fn unwind<S, D>(
        &self,
        source: NodeHandle<S>,
        transitions: &[AnyTransition],
        dest: NodeHandle<D>,
        connector: impl Fn(&S, Option<&D>) + 'static,
    ) where
        S: Screen,
        D: Screen,
    {
        let connector = Rc::new(connector);
        for transition in transitions {
            let Some(transition) = transition.downcast::<()>() else {
                debug_assert!(
                    false,
                    "unwind transition `{}` must carry no payload",
                    transition.name()
                );
                warn!(transition = %transition.name(), "skipping unwind wiring for a payload-carrying transition");
                continue;
            };
            let connector = Rc::clone(&connector);
            let run = move |core: &Rc<FlowCore>, _payload: Box<dyn Any>, src: &S| {
                let existing = core.graph.node(dest).borrow().existing_instance();
                (*connector)(src, existing.as_deref());
            };
            self.wire(
                source,
                &transition,
                Connector::WithSource {
                    payload: TypeId::of::<()>(),
                    run: Rc::new(run),
                },
            );
        }
    }

    /// Wire a terminal transition: no destination screen is built; `outro`
    /// receives a weak handle to this flow plus the payload, and typically
    /// escalates to a parent flow's own ending.
    pub fn finish<S, P>(
        &self,
        source: NodeHandle<S>,
        transition: &Transition<P>,
        outro: impl Fn(FlowHandle, P) + 'static,
    ) where
        S: Screen,
        P: 'static,
    {
        let run = move |core: &Rc<FlowCore>, payload: Box<dyn Any>| {
            let Ok(payload) = payload.downcast::<P>() else {
                // Unreachable: dispatch checks the payload tag first.
                return;
            };
            let handle = FlowHandle {
                core: Rc::downgrade(core),
            };
            outro(handle, *payload);
        };
        self.wire(
            source,
            transition,
            Connector::Terminal {
                payload: TypeId::of::<P>(),
                run: Rc::new(run),
            },
        );
    }

    /// Map one of the source screen's own outcomes to this flow ending.
    pub fn end_on<S: Screen, P: 'static>(
        &self,
        source: NodeHandle<S>,
        transition: &Transition<P>,
    ) {
        self.complete_on(source, transition, FlowOutcome::Ended);
    }

    /// Map one of the source screen's own outcomes to this flow cancelling.
    pub fn cancel_on<S: Screen, P: 'static>(
        &self,
        source: NodeHandle<S>,
        transition: &Transition<P>,
    ) {
        self.complete_on(source, transition, FlowOutcome::Cancelled);
    }

    fn complete_on<S: Screen, P: 'static>(
        &self,
        source: NodeHandle<S>,
        transition: &Transition<P>,
        outcome: FlowOutcome,
    ) {
        let run = move |core: &Rc<FlowCore>, _payload: Box<dyn Any>| {
            core.complete(outcome);
        };
        self.wire(
            source,
            transition,
            Connector::Terminal {
                payload: TypeId::of::<P>(),
                run: Rc::new(run),
            },
        );
    }

    fn wire<S: Screen, P: 'static>(
        &self,
        source: NodeHandle<S>,
        transition: &Transition<P>,
        connector: Connector<S>,
    ) {
        self.core
            .graph
            .node(source)
            .borrow_mut()
            .wire(transition.id().clone(), transition.name(), connector);
    }
}

impl Default for Flow {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak reference to a flow, safe to store in outros and parent completion
/// callbacks without keeping the flow alive.
#[derive(Clone)]
pub struct FlowHandle {
    core: Weak<FlowCore>,
}

impl FlowHandle {
    /// End the flow, if it is still alive and not yet completed.
    pub fn end(&self) {
        self.complete(FlowOutcome::Ended);
    }

    /// Cancel the flow, if it is still alive and not yet completed.
    pub fn cancel(&self) {
        self.complete(FlowOutcome::Cancelled);
    }

    pub fn state(&self) -> Option<FlowState> {
        self.core.upgrade().map(|core| core.state.get())
    }

    fn complete(&self, outcome: FlowOutcome) {
        match self.core.upgrade() {
            Some(core) => core.complete(outcome),
            None => warn!(?outcome, "completion requested on a released flow"),
        }
    }
}
