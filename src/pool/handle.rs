use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

/// One-shot "done" flag with blocking waiters.
///
/// Transitions `pending -> fulfilled` exactly once; every waiter blocked in
/// [`wait`](Completion::wait) is released by the transition, and later
/// waiters return immediately.
pub(crate) struct Completion {
    fulfilled: Mutex<bool>,
    notifier: Condvar,
}

impl Completion {
    fn new() -> Self {
        Self {
            fulfilled: Mutex::new(false),
            notifier: Condvar::new(),
        }
    }

    fn signal(&self) {
        let mut fulfilled = self.fulfilled.lock();
        *fulfilled = true;
        self.notifier.notify_all();
    }

    fn wait(&self) {
        let mut fulfilled = self.fulfilled.lock();
        while !*fulfilled {
            self.notifier.wait(&mut fulfilled);
        }
    }

    fn is_fulfilled(&self) -> bool {
        *self.fulfilled.lock()
    }
}

/// Awaitable handle to a task submitted to a thread pool.
///
/// Pairs a shared result cell with a [`Completion`], so a queue of erased
/// tasks never needs to know the concrete return types. The worker writes the
/// value into the cell before signaling, which makes the value visible to
/// every waiter released by [`wait`](TaskHandle::wait).
///
/// Tasks dropped by pool termination before a worker picked them up leave
/// their handle permanently unfulfilled.
pub struct TaskHandle<T> {
    value: Arc<Mutex<Option<T>>>,
    completion: Arc<Completion>,
}

/// Producer half of a [`TaskHandle`]. Consumed by [`fulfill`](Self::fulfill),
/// so a handle cannot be fulfilled twice.
pub(crate) struct Fulfiller<T> {
    value: Arc<Mutex<Option<T>>>,
    completion: Arc<Completion>,
}

impl<T> TaskHandle<T> {
    pub(crate) fn new() -> (Self, Fulfiller<T>) {
        let value = Arc::new(Mutex::new(None));
        let completion = Arc::new(Completion::new());
        let handle = Self {
            value: value.clone(),
            completion: completion.clone(),
        };
        let fulfiller = Fulfiller { value, completion };
        (handle, fulfiller)
    }

    /// Blocks until the task has run. Idempotent, callable from any thread.
    pub fn wait(&self) {
        self.completion.wait();
    }

    /// Blocks until the task has run, then returns its value.
    ///
    /// The value stays in the handle: every waiter gets its own clone.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.wait();
        (*self.value.lock())
            .clone()
            .expect("fulfilled task carries a value")
    }

    /// Non-blocking snapshot of the task state.
    pub fn is_fulfilled(&self) -> bool {
        self.completion.is_fulfilled()
    }
}

impl<T> Clone for TaskHandle<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            completion: self.completion.clone(),
        }
    }
}

impl<T> Fulfiller<T> {
    /// Publishes the task's value and releases every waiter.
    pub(crate) fn fulfill(self, value: T) {
        *self.value.lock() = Some(value);
        self.completion.signal();
    }
}
