use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Type-map registry building concrete screen and presenter instances.
///
/// The flow engine only decides *when* and *with what input* resolution
/// happens; what gets built is declared here by the application. Factories
/// may resolve their own dependencies recursively.
#[derive(Default)]
pub struct Resolver {
    factories: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
    assisted: RefCell<HashMap<(TypeId, TypeId), Rc<dyn Any>>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `T`.
    pub fn provide<T: 'static>(&self, factory: impl Fn(&Resolver) -> Rc<T> + 'static) {
        let factory: Box<dyn Fn(&Resolver) -> Rc<T>> = Box::new(factory);
        self.factories
            .borrow_mut()
            .insert(TypeId::of::<T>(), Rc::new(factory));
    }

    /// Register a factory for `T` built from an input value of type `I`.
    pub fn provide_with<T: 'static, I: 'static>(
        &self,
        factory: impl Fn(&Resolver, I) -> Rc<T> + 'static,
    ) {
        let factory: Box<dyn Fn(&Resolver, I) -> Rc<T>> = Box::new(factory);
        self.assisted
            .borrow_mut()
            .insert((TypeId::of::<T>(), TypeId::of::<I>()), Rc::new(factory));
    }

    /// Build a `T`, or `None` when no factory was registered for it.
    pub fn resolve<T: 'static>(&self) -> Option<Rc<T>> {
        let slot = self.factories.borrow().get(&TypeId::of::<T>()).cloned()?;
        let factory = slot.downcast::<Box<dyn Fn(&Resolver) -> Rc<T>>>().ok()?;
        Some((**factory)(self))
    }

    /// Build a `T` from `input`, or `None` when no factory was registered
    /// for that pairing.
    pub fn resolve_with<T: 'static, I: 'static>(&self, input: I) -> Option<Rc<T>> {
        let slot = self
            .assisted
            .borrow()
            .get(&(TypeId::of::<T>(), TypeId::of::<I>()))
            .cloned()?;
        let factory = slot.downcast::<Box<dyn Fn(&Resolver, I) -> Rc<T>>>().ok()?;
        Some((**factory)(self, input))
    }
}
