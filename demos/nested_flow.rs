// demos/nested_flow.rs
// A parent flow embeds an onboarding child flow as one of its screens; the
// child's completion bubbles to the parent through its completion callback.

use std::cell::RefCell;
use std::rc::Rc;

use waypoint::{
    Flow, FlowHandle, FlowOutcome, Navigator, Registration, Screen, Transition, TransitionError,
};

struct HomeScreen {
    start_onboarding: Transition<()>,
    navigator: RefCell<Option<Navigator<HomeScreen>>>,
}

impl HomeScreen {
    fn open_onboarding(&self) -> Result<(), TransitionError> {
        println!("[home] opening onboarding");
        self.navigator
            .borrow()
            .as_ref()
            .expect("navigator bound")
            .navigate(&self.start_onboarding, (), self)
    }
}

impl Screen for HomeScreen {
    type Input = ();

    fn bind_navigator(&self, navigator: Navigator<Self>) {
        *self.navigator.borrow_mut() = Some(navigator);
    }
}

struct WelcomeScreen {
    finished: Transition<()>,
    navigator: RefCell<Option<Navigator<WelcomeScreen>>>,
}

impl WelcomeScreen {
    fn complete(&self) -> Result<(), TransitionError> {
        println!("[welcome] onboarding done");
        self.navigator
            .borrow()
            .as_ref()
            .expect("navigator bound")
            .navigate(&self.finished, (), self)
    }
}

impl Screen for WelcomeScreen {
    type Input = ();

    fn bind_navigator(&self, navigator: Navigator<Self>) {
        *self.navigator.borrow_mut() = Some(navigator);
    }
}

/// Hosts the child flow as a screen in the parent's graph. The host owns the
/// child flow, so the child lives exactly as long as the parent's node does.
struct OnboardingHost {
    flow: Flow,
    entry: Rc<WelcomeScreen>,
}

impl OnboardingHost {
    fn new(parent: FlowHandle) -> Self {
        let finished = Transition::<()>::new("onboarding-finished");

        let flow = Flow::new();
        flow.on_complete(move |outcome| {
            println!("[onboarding] finished: {outcome:?}");
            match outcome {
                FlowOutcome::Ended => parent.end(),
                FlowOutcome::Cancelled => parent.cancel(),
            }
        });

        let welcome = flow.add_node(Registration::singleton({
            let finished = finished.clone();
            move |_| WelcomeScreen {
                finished: finished.clone(),
                navigator: RefCell::new(None),
            }
        }));
        flow.end_on(welcome, &finished);

        let entry = flow.start(welcome, ());
        Self { flow, entry }
    }
}

impl Screen for OnboardingHost {
    type Input = FlowHandle;

    fn bind_navigator(&self, _navigator: Navigator<Self>) {}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    waypoint::init();

    let start = Transition::<()>::new("start-onboarding");

    let parent = Flow::new();
    parent.on_complete(|outcome| println!("[parent] finished: {outcome:?}"));

    let home = parent.add_node(Registration::singleton({
        let start = start.clone();
        move |_| HomeScreen {
            start_onboarding: start.clone(),
            navigator: RefCell::new(None),
        }
    }));
    let onboarding = parent.add_node(Registration::singleton(OnboardingHost::new));

    let parent_handle = parent.handle();
    parent.connect_with(
        home,
        &start,
        onboarding,
        move || parent_handle.clone(),
        |_: &HomeScreen, _: &OnboardingHost| println!("[parent] onboarding flow embedded"),
    );

    let home_screen = parent.start(home, ());
    home_screen.open_onboarding()?;

    let host = parent.existing(onboarding).expect("onboarding was embedded");
    host.entry.complete()?;

    println!("[parent] child flow state: {:?}", host.flow.state());
    println!("[parent] parent flow state: {:?}", parent.state());

    Ok(())
}
