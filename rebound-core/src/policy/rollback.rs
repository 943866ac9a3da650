use std::ops::{Deref, DerefMut};

/// Scoped rollback over a mutable target.
///
/// The guard wraps the only live borrow of the target, so every mutation in
/// the protected region flows through it. Once armed, the restoration
/// closure runs exactly once when the guard goes out of scope, on every
/// exit path including panics, unless [`commit`](Self::commit) disarmed it
/// first.
///
/// Constructing the guard disarmed is valid: before anything was mutated
/// there is nothing to restore.
pub struct RollbackGuard<'a, T> {
    target: &'a mut T,
    restore: Option<Box<dyn FnOnce(&mut T) + 'a>>,
}

impl<'a, T> RollbackGuard<'a, T> {
    pub fn new(target: &'a mut T) -> Self {
        Self {
            target,
            restore: None,
        }
    }

    /// Register the restoration closure. Arming twice is a programming
    /// error; the earlier closure would be silently lost.
    pub fn arm(&mut self, restore: impl FnOnce(&mut T) + 'a) {
        debug_assert!(self.restore.is_none(), "rollback guard armed twice");
        self.restore = Some(Box::new(restore));
    }

    /// Cancel the pending restoration. The mutations made through the guard
    /// become permanent.
    pub fn commit(&mut self) {
        self.restore = None;
    }

    pub fn is_armed(&self) -> bool {
        self.restore.is_some()
    }
}

impl<T> Deref for RollbackGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T> DerefMut for RollbackGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T> Drop for RollbackGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore(self.target);
        }
    }
}
