use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

/// A single-threaded, reference-counted resource with interior mutability.
///
/// The sandbox runs on one logical execution context, so shared state between a
/// store listener and the session that drains it lives in an `StResource`
/// rather than behind a lock.
///
/// # Examples
///
/// ```
/// use voxel_sandbox::core::StResource;
///
/// let pending = StResource::new(Vec::<u32>::new());
/// let writer = pending.clone();
///
/// writer.get_mut().push(7);
/// assert_eq!(pending.take(), vec![7]);
/// assert!(pending.get().is_empty());
/// ```
///
/// # Panics
/// - Panics if a borrow is held while trying to mutably borrow
/// - Panics if a mutable borrow is held while trying to borrow
pub struct StResource<T> {
    resource: Rc<RefCell<T>>,
}

impl<T> StResource<T> {
    /// Creates a new `StResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Rc::new(RefCell::new(resource)),
        }
    }

    /// Returns a guard that allows reading the contained value.
    pub fn get(&self) -> Ref<'_, T> {
        self.resource.borrow()
    }

    /// Returns a guard that allows modifying the contained value.
    pub fn get_mut(&self) -> RefMut<'_, T> {
        self.resource.borrow_mut()
    }
}

impl<T: Default> StResource<T> {
    /// Moves the contained value out, leaving the default in its place.
    pub fn take(&self) -> T {
        std::mem::take(&mut *self.resource.borrow_mut())
    }
}

impl<T> Clone for StResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
