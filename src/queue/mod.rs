//! Double-Buffered Production Queue
//!
//! A multi-producer multi-consumer (MPMC) FIFO that decouples the two sides
//! by splitting the queue across two internal buffers with a controlled
//! hand-off.
//!
//! ## How It Works
//!
//!```text
//!  produce ──▶ ┌────────────────────────────┐
//!              │  hidden (producers' side)  │──┐
//!              └────────────────────────────┘  │ swap
//!              ┌────────────────────────────┐  │ (policy-gated)
//!  consume ◀── │  visible (consumers' side) │◀─┘
//!              └────────────────────────────┘
//!```
//!
//! - **Producers** push into the hidden buffer under the producers' lock.
//! - **Consumers** pop from the visible buffer under the consumers' lock.
//! - When the visible buffer runs empty and the [`FlushPolicy`] permits, the
//!   two buffers are **swapped**: everything produced so far becomes visible
//!   at once, in production order.
//!
//! The two sides contend only during the swap itself, so a producer surge
//! never serializes against steady-state consumers. The flush policy decides
//! the latency/throughput trade-off of the deferred hand-off: per-resource
//! (`Always`), per-batch (`BatchesOf`), demand-driven
//! (`MaxWaitingConsumers`), manual (`Never` + `flush_production`) or
//! arbitrary (`Custom`).
//!
//! ## Synchronization
//!
//! | State | Protection | Purpose |
//! |-------|------------|---------|
//! | hidden buffer | producers' mutex | push side |
//! | visible buffer | consumers' mutex | pop side, consumer wait loop |
//! | both buffers | both locks, visible first | the swap |
//! | `swap_in_progress` | compare-and-set | at most one swap at a time |
//! | counters | atomics | lock-free snapshots for the fast paths |
//!
//! Losing the `swap_in_progress` race means abandoning the swap: whichever
//! party won will broadcast the consumers' condition variable once the new
//! resources are visible.
//!
//! ## Example
//!
//!```
//! use scambio::queue::{FlushPolicy, ProductionQueue};
//!
//! let queue = ProductionQueue::with_policy(FlushPolicy::BatchesOf(2));
//!
//! queue.produce(10);
//! assert_eq!(queue.unpublished_resources(), 1); // hidden until the batch completes
//!
//! queue.produce(5);
//! assert_eq!(queue.consume(), 10);
//! assert_eq!(queue.consume(), 5);
//! ```
mod policy;
mod production;

pub use policy::FlushPolicy;
pub use production::ProductionQueue;
