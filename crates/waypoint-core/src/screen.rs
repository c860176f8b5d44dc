use crate::navigator::Navigator;

/// A unit of UI owned by a workflow node: built from an input value, and
/// handed a navigator after every build so it can report fired transitions.
pub trait Screen: 'static {
    /// Input the screen's builder consumes.
    type Input: 'static;

    /// Called after every build with the dispatch handle for the owning
    /// node. Screens typically stash the navigator and fire transitions
    /// through it from their presenter callbacks.
    fn bind_navigator(&self, navigator: Navigator<Self>)
    where
        Self: Sized;
}
