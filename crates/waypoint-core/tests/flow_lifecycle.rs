use std::cell::RefCell;
use std::rc::Rc;

use waypoint_core::{
    Flow, FlowOutcome, FlowState, Navigator, Registration, Screen, Transition, TransitionError,
};

type Outcomes = Rc<RefCell<Vec<FlowOutcome>>>;

struct StepScreen {
    navigator: RefCell<Option<Navigator<StepScreen>>>,
}

impl StepScreen {
    fn new() -> Self {
        Self {
            navigator: RefCell::new(None),
        }
    }

    fn fire<P: 'static>(
        &self,
        transition: &Transition<P>,
        payload: P,
    ) -> Result<(), TransitionError> {
        self.navigator
            .borrow()
            .as_ref()
            .expect("navigator bound")
            .navigate(transition, payload, self)
    }
}

impl Screen for StepScreen {
    type Input = ();

    fn bind_navigator(&self, navigator: Navigator<Self>) {
        *self.navigator.borrow_mut() = Some(navigator);
    }
}

fn single_step_flow() -> (Flow, Rc<StepScreen>, Outcomes) {
    let outcomes: Outcomes = Outcomes::default();
    let flow = Flow::new();
    flow.on_complete({
        let outcomes = outcomes.clone();
        move |outcome| outcomes.borrow_mut().push(outcome)
    });
    let entry = flow.add_node(Registration::singleton(|_| StepScreen::new()));
    let screen = flow.start(entry, ());
    (flow, screen, outcomes)
}

#[test]
fn test_start_activates_the_flow() {
    let flow = Flow::new();
    assert_eq!(flow.state(), FlowState::Created);

    let entry = flow.add_node(Registration::singleton(|_| StepScreen::new()));
    flow.start(entry, ());
    assert_eq!(flow.state(), FlowState::Active);
}

#[test]
fn test_reserved_end_completes_and_notifies_once() {
    let (flow, screen, outcomes) = single_step_flow();

    screen
        .fire(&Flow::end_transition(), ())
        .expect("reserved end needs no wiring");
    assert_eq!(flow.state(), FlowState::Ended);
    assert_eq!(*outcomes.borrow(), [FlowOutcome::Ended]);

    let err = screen.fire(&Flow::end_transition(), ()).unwrap_err();
    assert!(matches!(err, TransitionError::Completed));
    assert_eq!(outcomes.borrow().len(), 1);
}

#[test]
fn test_reserved_cancel_completes_with_cancelled() {
    let (flow, screen, outcomes) = single_step_flow();

    screen
        .fire(&Flow::cancel_transition(), ())
        .expect("reserved cancel needs no wiring");
    assert_eq!(flow.state(), FlowState::Cancelled);
    assert_eq!(*outcomes.borrow(), [FlowOutcome::Cancelled]);
}

#[test]
fn test_forged_reserved_identity_with_payload_is_rejected() {
    let (flow, screen, outcomes) = single_step_flow();

    let forged = Transition::<u32>::with_id(Flow::end_transition().id().as_str(), "forged");
    let err = screen.fire(&forged, 7).unwrap_err();
    assert!(matches!(err, TransitionError::TypeMismatch(name) if name == "forged"));
    assert_eq!(flow.state(), FlowState::Active);
    assert!(outcomes.borrow().is_empty());
}

#[test]
fn test_screen_outcome_mapped_to_flow_end() {
    let outcomes: Outcomes = Outcomes::default();
    let flow = Flow::new();
    flow.on_complete({
        let outcomes = outcomes.clone();
        move |outcome| outcomes.borrow_mut().push(outcome)
    });

    let entry = flow.add_node(Registration::singleton(|_| StepScreen::new()));
    let done = Transition::<()>::new("done");
    flow.end_on(entry, &done);

    let screen = flow.start(entry, ());
    screen.fire(&done, ()).expect("mapped ending");

    assert_eq!(flow.state(), FlowState::Ended);
    assert_eq!(*outcomes.borrow(), [FlowOutcome::Ended]);
}

#[test]
fn test_screen_outcome_mapped_to_flow_cancel() {
    let outcomes: Outcomes = Outcomes::default();
    let flow = Flow::new();
    flow.on_complete({
        let outcomes = outcomes.clone();
        move |outcome| outcomes.borrow_mut().push(outcome)
    });

    let entry = flow.add_node(Registration::singleton(|_| StepScreen::new()));
    let dismissed = Transition::<()>::new("dismissed");
    flow.cancel_on(entry, &dismissed);

    let screen = flow.start(entry, ());
    screen.fire(&dismissed, ()).expect("mapped cancellation");

    assert_eq!(flow.state(), FlowState::Cancelled);
    assert_eq!(*outcomes.borrow(), [FlowOutcome::Cancelled]);
}

#[test]
fn test_finish_outro_receives_payload_and_flow_handle() {
    let received: Rc<RefCell<Option<i32>>> = Rc::default();
    let flow = Flow::new();

    let entry = flow.add_node(Registration::singleton(|_| StepScreen::new()));
    let submit = Transition::<i32>::new("submit");
    flow.finish(entry, &submit, {
        let received = received.clone();
        move |handle, value| {
            *received.borrow_mut() = Some(value);
            handle.cancel();
        }
    });

    let screen = flow.start(entry, ());
    screen.fire(&submit, 42).expect("terminal dispatch");

    assert_eq!(*received.borrow(), Some(42));
    assert_eq!(flow.state(), FlowState::Cancelled);
}

#[test]
fn test_child_completion_bubbles_to_parent() {
    let parent_outcomes: Outcomes = Outcomes::default();

    let parent = Flow::new();
    parent.on_complete({
        let outcomes = parent_outcomes.clone();
        move |outcome| outcomes.borrow_mut().push(outcome)
    });
    let home = parent.add_node(Registration::singleton(|_| StepScreen::new()));
    parent.start(home, ());

    let child = Flow::new();
    child.on_complete({
        let parent = parent.handle();
        move |outcome| match outcome {
            FlowOutcome::Ended => parent.end(),
            FlowOutcome::Cancelled => parent.cancel(),
        }
    });
    let step = child.add_node(Registration::singleton(|_| StepScreen::new()));
    let screen = child.start(step, ());

    screen
        .fire(&Flow::end_transition(), ())
        .expect("child ending");

    assert_eq!(child.state(), FlowState::Ended);
    assert_eq!(parent.state(), FlowState::Ended);
    assert_eq!(*parent_outcomes.borrow(), [FlowOutcome::Ended]);
}

#[test]
fn test_dispatch_after_completion_fails() {
    let invoked: Rc<RefCell<bool>> = Rc::default();
    let flow = Flow::new();

    let entry = flow.add_node(Registration::singleton(|_| StepScreen::new()));
    let next = flow.add_node(Registration::new(|_| StepScreen::new()));
    let advance = Transition::<()>::new("advance");
    flow.connect(entry, &advance, next, {
        let invoked = invoked.clone();
        move |_: &StepScreen, _: &StepScreen| *invoked.borrow_mut() = true
    });

    let screen = flow.start(entry, ());
    screen.fire(&Flow::end_transition(), ()).expect("ending");

    let err = screen.fire(&advance, ()).unwrap_err();
    assert!(matches!(err, TransitionError::Completed));
    assert!(!*invoked.borrow());
}
