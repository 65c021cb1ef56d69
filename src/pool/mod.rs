//! Thread Pool
//!
//! A fixed set of OS worker threads draining a
//! [`ProductionQueue`](crate::queue::ProductionQueue) of erased tasks.
//!
//! ## How It Works
//!
//! [`exec`](ThreadPool::exec) binds a callable into a `() -> ()` job that
//! runs the callable, writes its value into the shared cell of the returned
//! [`TaskHandle`] and signals it. The job is produced into the work queue;
//! some worker eventually consumes and invokes it. Workers never share state
//! beyond the queue.
//!
//! The work queue inherits the full [`FlushPolicy`](crate::queue::FlushPolicy)
//! machinery, enabling submit-many-then-[`complete_batch`](ThreadPool::complete_batch)
//! patterns under batching policies.
//!
//! ## Termination
//!
//! [`terminate`](ThreadPool::terminate) stops admission, wakes every idle
//! worker with no-op jobs, then joins. Workers blocked inside `consume`
//! cannot observe the `running` flag, hence the no-op injection paired with a
//! flush. Tasks already being executed run to completion; tasks nobody
//! consumed are dropped and their handles stay unfulfilled forever.
//!
//! ## Example
//!
//!```
//! use scambio::pool::ThreadPool;
//!
//! let mut pool = ThreadPool::new(2);
//!
//! let sum = pool.exec(|| 5 + 2).unwrap();
//! assert_eq!(sum.get(), 7);
//!
//! pool.terminate();
//! ```
mod error;
mod handle;

pub use error::ExecError;
pub use handle::TaskHandle;

use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
};

use crate::queue::{FlushPolicy, ProductionQueue};

/// An erased, pre-bound task. Invoking it fulfills its handle.
type Job = Box<dyn FnOnce() + Send + 'static>;

/// State shared between the pool owner and its workers.
struct PoolShared {
    running: AtomicBool,
    work_queue: ProductionQueue<Job>,
}

/// Fixed-size pool of worker threads fed by a production queue.
pub struct ThreadPool {
    shared: Arc<PoolShared>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Pool of `n_threads` workers handing every task over immediately.
    ///
    /// # Panics
    ///
    /// Panics if `n_threads` is zero.
    pub fn new(n_threads: usize) -> Self {
        Self::with_policy(n_threads, FlushPolicy::Always)
    }

    /// Pool whose work queue uses the given flush policy.
    ///
    /// # Panics
    ///
    /// Panics if `n_threads` is zero.
    pub fn with_policy(n_threads: usize, policy: FlushPolicy) -> Self {
        assert!(n_threads > 0, "a thread pool needs at least one worker");

        let shared = Arc::new(PoolShared {
            running: AtomicBool::new(true),
            work_queue: ProductionQueue::with_policy(policy),
        });

        let workers = (0..n_threads)
            .map(|i| {
                let shared = shared.clone();
                thread::Builder::new()
                    .name(format!("scambio-worker-{i}"))
                    .spawn(move || worker_loop(&shared))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        log::debug!("spawned {n_threads} pool workers");
        Self { shared, workers }
    }

    /// Submits a callable with pre-bound arguments for execution.
    ///
    /// Returns a [`TaskHandle`] resolving to the callable's value once some
    /// worker has run it.
    pub fn exec<F, T>(&self, task: F) -> Result<TaskHandle<T>, ExecError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        if !self.is_running() {
            return Err(ExecError::Terminated);
        }
        let (handle, fulfiller) = TaskHandle::new();
        self.shared
            .work_queue
            .produce(Box::new(move || fulfiller.fulfill(task())));
        Ok(handle)
    }

    /// Hands all submitted-but-hidden tasks over to the workers.
    ///
    /// The companion of batching flush policies: submit many, then flush.
    pub fn complete_batch(&self) {
        self.shared.work_queue.flush_production();
    }

    /// Stops the pool: no new admissions, idle workers woken and joined.
    ///
    /// Blocks until every worker has finished its current task. Tasks still
    /// in the queue at that point are dropped with their handles unfulfilled.
    /// Idempotent; also run by `Drop`.
    pub fn terminate(&mut self) {
        if !self.shared.running.swap(false, Ordering::AcqRel) {
            return;
        }

        // A permissive policy lets any worker that wakes against an empty
        // visible buffer perform the hand-off of the wake-up jobs itself.
        self.shared.work_queue.switch_policy(FlushPolicy::Always);
        for _ in 0..self.workers.len() {
            self.shared.work_queue.produce(Box::new(|| {}));
        }
        self.shared.work_queue.flush_production();

        log::debug!("joining {} pool workers", self.workers.len());
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::error!("worker thread panicked outside of a task");
            }
        }
    }

    /// Whether the pool still admits tasks.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// The consume/invoke loop every worker runs.
///
/// A panicking task is confined to itself: the panic is caught, the task's
/// handle stays unfulfilled and the worker keeps serving the queue.
fn worker_loop(shared: &PoolShared) {
    while shared.running.load(Ordering::Acquire) {
        let job = shared.work_queue.consume();
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            log::warn!("task panicked; worker keeps running");
        }
    }
}
