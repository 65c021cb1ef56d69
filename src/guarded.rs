use parking_lot::Mutex;

/// Mutex-wrapped value holder for types too complex for a hardware atomic.
///
/// All access goes through the lock: [`access`](Guarded::access) for
/// mutation, [`read`](Guarded::read) for a snapshot copy. Concurrent calls
/// serialize behind each other.
pub struct Guarded<T> {
    value: Mutex<T>,
}

impl<T> Guarded<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
        }
    }

    /// Runs `mutator` on the value under the lock, returning its result.
    pub fn access<F, U>(&self, mutator: F) -> U
    where
        F: FnOnce(&mut T) -> U,
    {
        mutator(&mut self.value.lock())
    }

    /// Returns a copy of the value taken under the lock.
    pub fn read(&self) -> T
    where
        T: Clone,
    {
        self.value.lock().clone()
    }
}

impl<T: Default> Default for Guarded<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
