use thiserror::Error;

/// All failures a screen can observe when firing a transition.
#[derive(Debug, Error, Clone)]
pub enum TransitionError {
    /// The fired transition has no connector on its owning node.
    #[error("no connector registered for transition `{0}`")]
    NotRegistered(String),

    /// A connector exists for this identity, but it was registered with a
    /// different payload type.
    #[error("connector for transition `{0}` was registered with a different payload type")]
    TypeMismatch(String),

    /// The owning flow has already ended or been cancelled.
    #[error("flow has already completed")]
    Completed,

    /// The owning flow was dropped before the transition fired.
    #[error("flow was released before the transition fired")]
    Released,
}
