use std::rc::Rc;

use crate::screen::Screen;

/// Factory for one node's screen: how to build it from an input value, and
/// whether the built instance is shared for the flow's lifetime.
pub struct Registration<S: Screen> {
    builder: Box<dyn Fn(S::Input) -> S>,
    shared: bool,
    instance: Option<Rc<S>>,
}

impl<S: Screen> Registration<S> {
    /// A registration that builds a fresh screen from the current input on
    /// every resolve.
    pub fn new(builder: impl Fn(S::Input) -> S + 'static) -> Self {
        Self {
            builder: Box::new(builder),
            shared: false,
            instance: None,
        }
    }

    /// A registration that builds once and returns the same instance on
    /// every later resolve; inputs after the first build are ignored.
    pub fn singleton(builder: impl Fn(S::Input) -> S + 'static) -> Self {
        Self {
            builder: Box::new(builder),
            shared: true,
            instance: None,
        }
    }

    pub(crate) fn build(&mut self, input: S::Input) -> Rc<S> {
        if let Some(existing) = &self.instance {
            return Rc::clone(existing);
        }
        let screen = Rc::new((self.builder)(input));
        if self.shared {
            self.instance = Some(Rc::clone(&screen));
        }
        screen
    }

    pub(crate) fn instance(&self) -> Option<Rc<S>> {
        self.instance.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::Navigator;

    struct Probe {
        input: i32,
    }

    impl Screen for Probe {
        type Input = i32;

        fn bind_navigator(&self, _navigator: Navigator<Self>) {}
    }

    #[test]
    fn test_singleton_returns_identical_instance() {
        let mut registration = Registration::singleton(|input| Probe { input });

        let first = registration.build(1);
        let second = registration.build(2);

        assert!(Rc::ptr_eq(&first, &second));
        // Input after the first build is ignored.
        assert_eq!(second.input, 1);
    }

    #[test]
    fn test_fresh_builds_use_current_input() {
        let mut registration = Registration::new(|input| Probe { input });

        let first = registration.build(1);
        let second = registration.build(2);

        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(first.input, 1);
        assert_eq!(second.input, 2);
    }

    #[test]
    fn test_instance_tracks_singleton_cache() {
        let mut shared = Registration::singleton(|input| Probe { input });
        let mut fresh = Registration::new(|input| Probe { input });

        assert!(shared.instance().is_none());
        let built = shared.build(7);
        assert!(Rc::ptr_eq(&shared.instance().unwrap(), &built));

        fresh.build(7);
        assert!(fresh.instance().is_none());
    }
}
