use std::{
    collections::VecDeque,
    mem,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use crossbeam_utils::CachePadded;
use parking_lot::{Condvar, Mutex};

use super::FlushPolicy;

/// Double-buffered MPMC FIFO.
///
/// `produce` only ever touches the hidden buffer and its lock, `consume` only
/// ever touches the visible buffer and its lock. The two sides meet during a
/// swap, which requires both locks and is additionally serialized by the
/// `swap_in_progress` flag.
pub struct ProductionQueue<R> {
    /// Producers' buffer. Resources pushed here are not yet observable by
    /// consumers.
    hidden: Mutex<VecDeque<R>>,
    /// Consumers' buffer. The only buffer `consume` pops from.
    visible: Mutex<VecDeque<R>>,
    policy: Mutex<FlushPolicy>,
    /// Wakes producers blocked on a full hidden buffer (bounded variant).
    producer_notifier: Condvar,
    /// Wakes consumers blocked on an empty visible buffer. Paired with the
    /// `visible` mutex.
    consumer_notifier: Condvar,
    /// Size of the visible buffer. Advisory snapshot for lock-free fast
    /// paths; refreshed under the `visible` lock.
    available: CachePadded<AtomicUsize>,
    /// Size of the hidden buffer. Advisory snapshot; refreshed under the
    /// `hidden` lock.
    unpublished: CachePadded<AtomicUsize>,
    /// Consumers currently blocked inside `consume`.
    waiting_consumers: CachePadded<AtomicUsize>,
    /// Held (true) by whichever party is mid-swap. Losing the flag means
    /// abandoning the swap, not waiting for it.
    swap_in_progress: CachePadded<AtomicBool>,
    /// A `flush_production` that could not swap yet. Honored by the next
    /// swap opportunity regardless of the policy; cleared by any swap.
    flush_pending: AtomicBool,
    capacity: Option<usize>,
}

impl<R> Default for ProductionQueue<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> ProductionQueue<R> {
    /// Unbounded queue handing over on every produce.
    pub fn new() -> Self {
        Self::with_policy(FlushPolicy::Always)
    }

    /// Unbounded queue with an explicit flush policy.
    pub fn with_policy(policy: FlushPolicy) -> Self {
        Self::build(policy, None)
    }

    /// Bounded queue: `produce` blocks while the producers' buffer holds
    /// `capacity` resources.
    pub fn bounded(capacity: usize, policy: FlushPolicy) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        Self::build(policy, Some(capacity))
    }

    fn build(policy: FlushPolicy, capacity: Option<usize>) -> Self {
        Self {
            hidden: Mutex::new(VecDeque::new()),
            visible: Mutex::new(VecDeque::new()),
            policy: Mutex::new(policy),
            producer_notifier: Condvar::new(),
            consumer_notifier: Condvar::new(),
            available: CachePadded::new(AtomicUsize::new(0)),
            unpublished: CachePadded::new(AtomicUsize::new(0)),
            waiting_consumers: CachePadded::new(AtomicUsize::new(0)),
            swap_in_progress: CachePadded::new(AtomicBool::new(false)),
            flush_pending: AtomicBool::new(false),
            capacity,
        }
    }

    /// Pushes a resource into the producers' buffer.
    ///
    /// Never blocks in the unbounded variant. In the bounded variant it waits
    /// for a swap to drain the producers' buffer below `capacity`.
    pub fn produce(&self, resource: R) {
        {
            let mut hidden = self.hidden.lock();
            if let Some(capacity) = self.capacity {
                while hidden.len() >= capacity {
                    self.producer_notifier.wait(&mut hidden);
                }
            }
            hidden.push_back(resource);
            self.unpublished.store(hidden.len(), Ordering::Release);
        }
        // Producer-side flush, outside the hidden lock so the swap can take
        // the locks in the visible-then-hidden order.
        if self.available.load(Ordering::Acquire) == 0 {
            let unpublished = self.unpublished.load(Ordering::Acquire);
            let waiting = self.waiting_consumers.load(Ordering::Acquire);
            if unpublished > 0
                && (self.flush_pending.load(Ordering::Acquire)
                    || self.policy.lock().permits(unpublished, waiting))
            {
                self.swap();
            }
        }
    }

    /// Pops the oldest visible resource, blocking while none is observable.
    ///
    /// A blocked consumer re-evaluates the flush policy on every wake-up and
    /// performs the swap itself when the policy permits.
    pub fn consume(&self) -> R {
        let mut visible = self.visible.lock();
        if let Some(resource) = visible.pop_front() {
            self.available.store(visible.len(), Ordering::Release);
            return resource;
        }
        self.waiting_consumers.fetch_add(1, Ordering::AcqRel);
        loop {
            if let Some(resource) = visible.pop_front() {
                self.available.store(visible.len(), Ordering::Release);
                self.waiting_consumers.fetch_sub(1, Ordering::AcqRel);
                return resource;
            }
            if self.swap_from_consumer(&mut visible) {
                continue;
            }
            self.consumer_notifier.wait(&mut visible);
        }
    }

    /// Hands hidden resources over regardless of the flush policy.
    ///
    /// The swap still only happens once the visible buffer is empty: handing
    /// over earlier would reorder resources across the buffers. A flush that
    /// finds visible resources stays pending and is honored by the next swap
    /// opportunity, so the flushed resources are published once consumers
    /// drain the visible buffer even under a `Never` policy.
    pub fn flush_production(&self) {
        if self.unpublished.load(Ordering::Acquire) == 0 {
            return;
        }
        self.flush_pending.store(true, Ordering::Release);
        self.swap();
    }

    /// Replaces the flush policy.
    ///
    /// Every blocked consumer is woken so a newly permissive policy takes
    /// effect without waiting for the next produce.
    pub fn switch_policy(&self, policy: FlushPolicy) {
        *self.policy.lock() = policy;
        self.consumer_notifier.notify_all();
    }

    /// Snapshot of the visible buffer size.
    pub fn available_resources(&self) -> usize {
        self.available.load(Ordering::Acquire)
    }

    /// Snapshot of the producers' buffer size.
    pub fn unpublished_resources(&self) -> usize {
        self.unpublished.load(Ordering::Acquire)
    }

    /// Swap attempt from a producer or a flush: takes the flag, then both
    /// locks in the fixed visible-then-hidden order.
    fn swap(&self) {
        if !self.begin_swap() {
            return;
        }
        let swapped = {
            let mut visible = self.visible.lock();
            let mut hidden = self.hidden.lock();
            self.exchange(&mut visible, &mut hidden)
        };
        self.end_swap(swapped);
    }

    /// Swap attempt from a consumer already holding the visible lock.
    ///
    /// The policy is evaluated here, under the consumers' lock, so policy
    /// switches and flushes interleave deterministically with the wait loop.
    fn swap_from_consumer(&self, visible: &mut VecDeque<R>) -> bool {
        let unpublished = self.unpublished.load(Ordering::Acquire);
        if unpublished == 0 {
            return false;
        }
        let waiting = self.waiting_consumers.load(Ordering::Acquire);
        if !self.flush_pending.load(Ordering::Acquire)
            && !self.policy.lock().permits(unpublished, waiting)
        {
            return false;
        }
        if !self.begin_swap() {
            // Another party owns the swap and will broadcast once done.
            return false;
        }
        let swapped = {
            let mut hidden = self.hidden.lock();
            self.exchange(visible, &mut hidden)
        };
        self.end_swap(swapped);
        swapped
    }

    fn begin_swap(&self) -> bool {
        self.swap_in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn end_swap(&self, swapped: bool) {
        self.swap_in_progress.store(false, Ordering::Release);
        if swapped {
            self.consumer_notifier.notify_all();
            self.producer_notifier.notify_all();
        }
    }

    /// The hand-off itself. Caller holds both buffer locks and the swap flag.
    fn exchange(&self, visible: &mut VecDeque<R>, hidden: &mut VecDeque<R>) -> bool {
        if !visible.is_empty() || hidden.is_empty() {
            return false;
        }
        mem::swap(visible, hidden);
        self.available.store(visible.len(), Ordering::Release);
        self.unpublished.store(hidden.len(), Ordering::Release);
        self.flush_pending.store(false, Ordering::Release);
        log::trace!("handed {} resources over to consumers", visible.len());
        true
    }
}
