use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;

use uuid::Uuid;

/// Opaque identity of a declared transition; the connector map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransitionId(String);

impl TransitionId {
    pub(crate) fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named, typed outcome a screen can produce (e.g. "setting selected",
/// carrying the chosen `Setting`).
///
/// The identity is fixed at declaration time: clones of one transition
/// resolve to the same connector map entry, independently declared
/// transitions never collide.
pub struct Transition<P> {
    id: TransitionId,
    name: String,
    _payload: PhantomData<fn(P)>,
}

impl<P: 'static> Transition<P> {
    /// Declare a transition with a fresh unique identity.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let id = TransitionId::new(format!("{}-{}", name, Uuid::new_v4()));
        Self {
            id,
            name,
            _payload: PhantomData,
        }
    }

    /// Declare a transition with a caller-chosen identity. Two transitions
    /// sharing an identity resolve to the same connector map entry, so this
    /// is reserved for identities that must be stable across declarations.
    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: TransitionId::new(id),
            name: name.into(),
            _payload: PhantomData,
        }
    }

    pub fn id(&self) -> &TransitionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fold the payload type into a runtime tag, for contexts that store
    /// transitions of mixed payload types together.
    pub fn erased(&self) -> AnyTransition {
        AnyTransition {
            id: self.id.clone(),
            name: self.name.clone(),
            payload: TypeId::of::<P>(),
        }
    }
}

impl<P> Clone for Transition<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            _payload: PhantomData,
        }
    }
}

impl<P> fmt::Debug for Transition<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

/// A transition with its payload type reduced to a runtime tag.
#[derive(Debug, Clone)]
pub struct AnyTransition {
    id: TransitionId,
    name: String,
    payload: TypeId,
}

impl AnyTransition {
    pub fn id(&self) -> &TransitionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Recover the typed view. Yields `None` when `Q` is not the payload
    /// type this transition was declared with; at wiring time that means a
    /// mismatched declaration between producer and consumer.
    pub fn downcast<Q: 'static>(&self) -> Option<Transition<Q>> {
        (self.payload == TypeId::of::<Q>()).then(|| Transition {
            id: self.id.clone(),
            name: self.name.clone(),
            _payload: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_independent_declarations_never_collide() {
        let a = Transition::<u32>::new("next");
        let b = Transition::<u32>::new("next");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn test_clones_share_identity() {
        let a = Transition::<String>::new("save");
        let b = a.clone();
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_chosen_identity_is_stable() {
        let a = Transition::<()>::with_id("flow.end", "end");
        let b = Transition::<()>::with_id("flow.end", "end");
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_downcast_to_declared_payload_succeeds() {
        let t = Transition::<String>::new("save");
        let erased = t.erased();

        let typed = erased.downcast::<String>().expect("same payload type");
        assert_eq!(typed.id(), t.id());
        assert_eq!(typed.name(), "save");
    }

    #[test]
    fn test_downcast_to_other_payload_yields_none() {
        let t = Transition::<String>::new("save");
        let erased = t.erased();

        assert!(erased.downcast::<u32>().is_none());
        assert!(erased.downcast::<()>().is_none());
    }
}
